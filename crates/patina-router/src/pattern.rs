//! Route pattern parsing.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, RouterError};
use crate::priority::{self, MAX_SEGMENTS};
use crate::segment::{Segment, SegmentKind};

/// A registered route pattern.
///
/// Holds the classified segment sequence, the precomputed 19-digit
/// specificity key, and the opaque attachment `T` handed back when the
/// pattern matches. Built once at registration and never mutated.
pub struct Pattern<T> {
    raw: String,
    segments: Vec<Segment>,
    case_insensitive: bool,
    capture_vars: usize,
    max_segments: Option<usize>,
    priority: u64,
    handler: T,
}

impl<T> Pattern<T> {
    /// Parses a pattern string into its classified segments.
    ///
    /// The pattern must start with `/`. Empty chunks between separators are
    /// skipped, so a trailing `/` is permitted; the standalone `/` pattern
    /// parses to zero segments and matches only the zero-segment path.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when the pattern is malformed
    /// as a whole (missing leading `/`, more than 19 segments, adjacent `**`
    /// segments) and [`RouterError::InvalidSegment`] /
    /// [`RouterError::InvalidConstraint`] for segment-level failures.
    pub fn parse(raw: &str, case_insensitive: bool, handler: T) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(RouterError::invalid_pattern(raw, "must start with '/'"));
        }
        let mut segments = Vec::new();
        for chunk in raw.split('/') {
            if chunk.is_empty() {
                continue;
            }
            segments.push(Segment::classify(chunk, case_insensitive, raw)?);
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(RouterError::invalid_pattern(
                raw,
                format!("more than {MAX_SEGMENTS} segments"),
            ));
        }
        for pair in segments.windows(2) {
            if pair[0].kind() == SegmentKind::Greedy && pair[1].kind() == SegmentKind::Greedy {
                return Err(RouterError::invalid_pattern(raw, "adjacent `**` segments"));
            }
        }
        let capture_vars = segments.iter().filter(|s| s.kind().is_capture()).count();
        let unbounded = segments.iter().any(|s| s.kind() == SegmentKind::Greedy);
        let max_segments = if unbounded { None } else { Some(segments.len()) };
        let priority = priority::encode(&segments);
        Ok(Self {
            raw: raw.to_string(),
            segments,
            case_insensitive,
            capture_vars,
            max_segments,
            priority,
            handler,
        })
    }

    /// The pattern string exactly as registered.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classified segments, in pattern order; empty for the root `/`.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether matching ignores ASCII case.
    #[must_use]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Number of capture variables in the pattern.
    #[must_use]
    pub fn capture_vars(&self) -> usize {
        self.capture_vars
    }

    /// Maximum number of URL segments this pattern can match; `None` when a
    /// `**` segment makes it unbounded.
    #[must_use]
    pub fn max_segments(&self) -> Option<usize> {
        self.max_segments
    }

    /// The 19-digit specificity key; lower = more specific.
    #[must_use]
    pub fn priority(&self) -> u64 {
        self.priority
    }

    /// The attachment supplied at registration.
    #[must_use]
    pub fn handler(&self) -> &T {
        &self.handler
    }

    /// Upper bound on URL segments matchable from segment `idx` to the end,
    /// `None` when a greedy segment at or after `idx` makes it unbounded.
    pub(crate) fn remaining_bound(&self, idx: usize) -> Option<usize> {
        if self.segments[idx..]
            .iter()
            .any(|s| s.kind() == SegmentKind::Greedy)
        {
            None
        } else {
            Some(self.segments.len() - idx)
        }
    }

    /// Rebuilds a concrete path by substituting capture values.
    ///
    /// Returns `None` when a capture value is missing from `params` or when
    /// the pattern contains glob or wildcard segments, which cannot be
    /// reconstructed from a name/value map.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use patina_router::Pattern;
    ///
    /// let pattern = Pattern::parse("/posts/{id}", false, ()).unwrap();
    /// let params: HashMap<String, String> =
    ///     [("id".to_string(), "123".to_string())].into_iter().collect();
    /// assert_eq!(pattern.reverse(&params), Some("/posts/123".to_string()));
    /// ```
    #[must_use]
    pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment.kind() {
                SegmentKind::Literal => path.push_str(segment.raw()),
                SegmentKind::CaptureVar | SegmentKind::ConstraintCaptureVar => {
                    path.push_str(params.get(segment.name()?)?);
                }
                SegmentKind::Glob | SegmentKind::SingleWildcard | SegmentKind::Greedy => {
                    return None;
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("raw", &self.raw)
            .field("priority", &self.priority)
            .field("capture_vars", &self.capture_vars)
            .field("case_insensitive", &self.case_insensitive)
            .finish_non_exhaustive()
    }
}
