//! Line ranges and how they map onto a concrete file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SpliceError, SpliceResult};

/// A 1-based, inclusive line range as supplied by the caller.
///
/// Bounds are signed so that the legacy policy can reproduce from-the-end
/// indexing for non-positive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    /// First line to remove (1-based).
    pub start: i64,
    /// Last line to remove (1-based, inclusive).
    pub end: i64,
}

/// How out-of-order or out-of-bounds ranges are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Require `1 <= start <= end <= line_count + 1`.
    Strict,
    /// Like `Strict`, but an `end` past the last line is clamped to it.
    #[default]
    Clamp,
    /// Never reject; compute the kept prefix and suffix with sequence-slice
    /// semantics (negative indices count from the end, overruns clamp).
    Legacy,
}

impl RangePolicy {
    /// All policies, in documentation order.
    pub const ALL: [RangePolicy; 3] = [RangePolicy::Strict, RangePolicy::Clamp, RangePolicy::Legacy];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePolicy::Strict => "strict",
            RangePolicy::Clamp => "clamp",
            RangePolicy::Legacy => "legacy",
        }
    }
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangePolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown range policy '{s}' (expected strict, clamp or legacy)"))
    }
}

/// A range mapped onto a file of known length.
///
/// The spliced file is `lines[..keep_before] + replacement + lines[resume_at..]`.
/// Under [`RangePolicy::Legacy`] `resume_at` may be smaller than
/// `keep_before`, in which case the lines in between appear twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    /// Number of leading lines kept before the replacement.
    pub keep_before: usize,
    /// Index of the first trailing line kept after the replacement.
    pub resume_at: usize,
}

impl ResolvedRange {
    /// Number of original lines discarded.
    pub fn lines_removed(&self) -> usize {
        self.resume_at.saturating_sub(self.keep_before)
    }

    /// 1-based line number where the replacement starts in the new file.
    pub fn first_line(&self) -> usize {
        self.keep_before + 1
    }
}

impl LineRange {
    /// Create a range from 1-based inclusive bounds.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Map this range onto a file with `line_count` lines.
    pub fn resolve(&self, line_count: usize, policy: RangePolicy) -> SpliceResult<ResolvedRange> {
        match policy {
            RangePolicy::Legacy => Ok(ResolvedRange {
                keep_before: slice_index(self.start.saturating_sub(1), line_count),
                resume_at: slice_index(self.end, line_count),
            }),
            RangePolicy::Strict | RangePolicy::Clamp => self.resolve_checked(line_count, policy),
        }
    }

    fn resolve_checked(&self, line_count: usize, policy: RangePolicy) -> SpliceResult<ResolvedRange> {
        let reject = |reason: &str| SpliceError::invalid_range(self.start, self.end, line_count, reason);

        if self.start < 1 {
            return Err(reject("start must be at least 1"));
        }
        if self.start > self.end {
            return Err(reject("start is after end"));
        }

        let start = positive_index(self.start);
        let end = positive_index(self.end);
        let one_past_last = line_count.saturating_add(1);

        if start > one_past_last {
            return Err(reject("start is past the end of the file"));
        }
        if end > one_past_last && policy == RangePolicy::Strict {
            return Err(reject("end is past the end of the file"));
        }
        if end > line_count && policy == RangePolicy::Clamp {
            warn!(
                end = self.end,
                line_count, "end line is past the end of the file, clamping"
            );
        }

        Ok(ResolvedRange {
            keep_before: start - 1,
            resume_at: end.min(line_count),
        })
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Convert a value already known to be positive, saturating on overflow.
fn positive_index(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Sequence-slice index normalisation: negative values count from the end,
/// everything is clamped into `0..=len`.
fn slice_index(index: i64, len: usize) -> usize {
    if index < 0 {
        let back = usize::try_from(index.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(back)
    } else {
        positive_index(index).min(len)
    }
}
