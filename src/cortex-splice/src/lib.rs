//! Cortex Splice - replace a range of lines in a text file.
//!
//! This crate replaces a contiguous, 1-based, inclusive range of lines in a
//! target file with the full text of a content file:
//! - Line terminators of kept lines are preserved byte for byte
//! - The replacement block always ends with a line terminator
//! - Configurable range validation (strict, clamp, legacy)
//! - Atomic replacement of the target (temp file + rename)
//! - Dry-run mode with a unified diff
//!
//! # Example
//!
//! ```no_run
//! use cortex_splice::splice;
//!
//! // Replace lines 10 through 14 of main.rs with the contents of block.rs.
//! let report = splice("src/main.rs", 10, 14, "block.rs").unwrap();
//! println!("{}", report.summary());
//! ```

mod error;
mod lines;
mod range;
mod splice;

pub use error::{ErrorKind, SpliceError, SpliceResult};
pub use lines::{
    LineEnding, ends_with_terminator, ensure_trailing_newline, split_lines, strip_bom,
};
pub use range::{LineRange, RangePolicy, ResolvedRange};
pub use splice::{SpliceOptions, SpliceReport, Spliced, splice_file, splice_text};

pub use cortex_utils_file_safety::MAX_FILE_SIZE;

use std::path::Path;

/// Replace lines `start..=end` of `target` with the contents of `content`.
///
/// Uses [`SpliceOptions::default`]: the [`RangePolicy::Clamp`] policy and an
/// atomic write.
pub fn splice(
    target: impl AsRef<Path>,
    start: i64,
    end: i64,
    content: impl AsRef<Path>,
) -> SpliceResult<SpliceReport> {
    splice_file(
        target.as_ref(),
        LineRange::new(start, end),
        content.as_ref(),
        &SpliceOptions::default(),
    )
}

/// Compute a splice and its diff without modifying the target.
pub fn preview(
    target: impl AsRef<Path>,
    range: LineRange,
    content: impl AsRef<Path>,
    policy: RangePolicy,
) -> SpliceResult<SpliceReport> {
    let options = SpliceOptions::dry_run().with_policy(policy);
    splice_file(target.as_ref(), range, content.as_ref(), &options)
}
