//! Pattern segment classification and per-kind matching.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RouterError};
use crate::glob::glob_match;

/// The classification of one `/`-delimited pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Plain text, matched by string comparison.
    Literal,
    /// `{name:regex}`, captured and checked against the compiled constraint.
    ConstraintCaptureVar,
    /// `{name}`, captured unconditionally.
    CaptureVar,
    /// Literal text with embedded `*`/`?` wildcards.
    Glob,
    /// `*`, exactly one URL segment of any content.
    SingleWildcard,
    /// `**`, zero or more whole URL segments.
    Greedy,
}

impl SegmentKind {
    /// Specificity rank used by the priority encoder; lower is more specific.
    #[must_use]
    pub const fn rank(self) -> u64 {
        match self {
            Self::Literal => 1,
            Self::ConstraintCaptureVar => 2,
            Self::CaptureVar => 3,
            Self::Glob => 4,
            Self::SingleWildcard => 5,
            Self::Greedy => 6,
        }
    }

    /// Returns true for the two capture-variable kinds.
    #[must_use]
    pub const fn is_capture(self) -> bool {
        matches!(self, Self::CaptureVar | Self::ConstraintCaptureVar)
    }
}

/// One classified segment of a route pattern.
///
/// Immutable once built; owned by its [`crate::Pattern`].
#[derive(Debug, Clone)]
pub struct Segment {
    raw: String,
    kind: SegmentKind,
    name: Option<String>,
    constraint: Option<Regex>,
    case_insensitive: bool,
}

impl Segment {
    /// Classifies one pattern segment.
    ///
    /// `pattern` is the full pattern string, used only for error reporting.
    /// Classification rules, in priority order: `*` alone, `**` alone,
    /// `{...}` capture forms, embedded `*`/`?` globs, then plain literals.
    pub(crate) fn classify(raw: &str, case_insensitive: bool, pattern: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(RouterError::invalid_segment(pattern, raw, "empty segment"));
        }
        if raw == "*" {
            return Ok(Self::plain(raw, SegmentKind::SingleWildcard, case_insensitive));
        }
        if raw == "**" {
            return Ok(Self::plain(raw, SegmentKind::Greedy, case_insensitive));
        }
        if raw.starts_with('{') && raw.ends_with('}') && raw.len() >= 2 {
            return Self::classify_capture(raw, case_insensitive, pattern);
        }
        if raw.contains('{') || raw.contains('}') {
            return Err(RouterError::invalid_segment(pattern, raw, "unmatched brace"));
        }
        if raw.contains('*') || raw.contains('?') {
            if raw.contains("**") {
                let reason = if raw.chars().all(|c| c == '*') {
                    "three or more consecutive wildcards"
                } else {
                    "`**` cannot be combined with other characters"
                };
                return Err(RouterError::invalid_segment(pattern, raw, reason));
            }
            return Ok(Self::plain(raw, SegmentKind::Glob, case_insensitive));
        }
        Ok(Self::plain(raw, SegmentKind::Literal, case_insensitive))
    }

    fn classify_capture(raw: &str, case_insensitive: bool, pattern: &str) -> Result<Self> {
        let inner = &raw[1..raw.len() - 1];
        let Some((name, constraint)) = inner.split_once(':') else {
            if inner.is_empty() {
                return Err(RouterError::invalid_segment(
                    pattern,
                    raw,
                    "empty capture-variable name",
                ));
            }
            return Ok(Self {
                raw: raw.to_string(),
                kind: SegmentKind::CaptureVar,
                name: Some(inner.to_string()),
                constraint: None,
                case_insensitive,
            });
        };
        if name.is_empty() {
            return Err(RouterError::invalid_segment(
                pattern,
                raw,
                "empty capture-variable name",
            ));
        }
        if constraint.is_empty() {
            return Err(RouterError::invalid_segment(
                pattern,
                raw,
                "empty regex constraint",
            ));
        }
        // The constraint must cover the whole URL segment, so it is compiled
        // anchored on both ends.
        let compiled = RegexBuilder::new(&format!("^(?:{constraint})$"))
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| RouterError::InvalidConstraint {
                pattern: pattern.to_string(),
                constraint: constraint.to_string(),
                source,
            })?;
        Ok(Self {
            raw: raw.to_string(),
            kind: SegmentKind::ConstraintCaptureVar,
            name: Some(name.to_string()),
            constraint: Some(compiled),
            case_insensitive,
        })
    }

    fn plain(raw: &str, kind: SegmentKind, case_insensitive: bool) -> Self {
        Self {
            raw: raw.to_string(),
            kind,
            name: None,
            constraint: None,
            case_insensitive,
        }
    }

    /// The segment text as written in the pattern.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The segment's classification.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The capture-variable name, for the two capture kinds.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Kind-specific match against one concrete URL segment.
    pub(crate) fn matches(&self, text: &str) -> bool {
        match self.kind {
            SegmentKind::Literal => {
                if self.case_insensitive {
                    self.raw.eq_ignore_ascii_case(text)
                } else {
                    self.raw == text
                }
            }
            SegmentKind::Glob => glob_match(&self.raw, text, self.case_insensitive),
            SegmentKind::ConstraintCaptureVar => {
                self.constraint.as_ref().is_some_and(|re| re.is_match(text))
            }
            SegmentKind::CaptureVar | SegmentKind::SingleWildcard | SegmentKind::Greedy => true,
        }
    }

    /// Whether two segments collapse into the same trie node.
    ///
    /// Literal, glob and constraint segments merge on their discriminating
    /// text (and matching case mode); the unconditional kinds merge on kind
    /// alone, so `{a}` and `{b}` share a node and capture names stay with
    /// their own patterns.
    pub(crate) fn is_equivalent(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            SegmentKind::CaptureVar | SegmentKind::SingleWildcard | SegmentKind::Greedy => true,
            SegmentKind::Literal => {
                self.case_insensitive == other.case_insensitive
                    && if self.case_insensitive {
                        self.raw.eq_ignore_ascii_case(&other.raw)
                    } else {
                        self.raw == other.raw
                    }
            }
            SegmentKind::Glob | SegmentKind::ConstraintCaptureVar => {
                self.case_insensitive == other.case_insensitive && self.raw == other.raw
            }
        }
    }
}
