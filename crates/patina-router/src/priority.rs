//! Fixed-width specificity keys for route patterns.
//!
//! Each segment contributes its kind rank as one decimal digit, in segment
//! order, and the result is padded to exactly 19 digits so keys of patterns
//! with different segment counts stay comparable. Lower key = more specific
//! pattern.

use crate::segment::{Segment, SegmentKind};

/// Maximum number of segments in a pattern. The cap keeps the priority key
/// within 19 decimal digits, which fits a `u64`.
pub(crate) const MAX_SEGMENTS: usize = 19;

/// Encodes a segment sequence into its 19-digit priority key.
///
/// Without a greedy segment the ranks are padded with trailing zero digits;
/// a zero sorts before every real rank, so a shorter pattern beats a longer
/// one sharing the same prefix. With greedy segments the padding is instead
/// distributed as runs of rank-6 digits across the greedy positions (the
/// remainder of an uneven split goes to the last greedy segment), keeping
/// greedy patterns comparable with fully concrete 19-segment ones.
pub(crate) fn encode(segments: &[Segment]) -> u64 {
    debug_assert!(segments.len() <= MAX_SEGMENTS);
    let greedy = segments
        .iter()
        .filter(|s| s.kind() == SegmentKind::Greedy)
        .count();
    let mut key: u64 = 0;
    if greedy == 0 {
        for segment in segments {
            key = key * 10 + segment.kind().rank();
        }
        for _ in segments.len()..MAX_SEGMENTS {
            key *= 10;
        }
        return key;
    }
    let extra = MAX_SEGMENTS - segments.len();
    let per_greedy = extra / greedy;
    let remainder = extra % greedy;
    let mut seen = 0;
    for segment in segments {
        if segment.kind() == SegmentKind::Greedy {
            seen += 1;
            let mut run = 1 + per_greedy;
            if seen == greedy {
                run += remainder;
            }
            for _ in 0..run {
                key = key * 10 + SegmentKind::Greedy.rank();
            }
        } else {
            key = key * 10 + segment.kind().rank();
        }
    }
    key
}
