//! Splice application logic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cortex_utils_file_safety::{MAX_FILE_SIZE, atomic_write_string, validate_file_for_read_with_limit};
use serde::Serialize;
use similar::TextDiff;
use tracing::{debug, info};

use crate::error::{SpliceError, SpliceResult};
use crate::lines::{LineEnding, ends_with_terminator, ensure_trailing_newline, split_lines, strip_bom};
use crate::range::{LineRange, RangePolicy, ResolvedRange};

/// Options for splice application.
#[derive(Debug, Clone)]
pub struct SpliceOptions {
    /// How out-of-order or out-of-bounds ranges are handled.
    pub policy: RangePolicy,
    /// If true, compute the result and a diff but don't modify the target.
    pub dry_run: bool,
    /// Largest file (in bytes) that will be loaded; 0 disables the limit.
    pub max_file_size: u64,
}

impl Default for SpliceOptions {
    fn default() -> Self {
        Self {
            policy: RangePolicy::default(),
            dry_run: false,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl SpliceOptions {
    /// Create options for dry-run mode.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }

    /// Set the range policy.
    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the maximum file size.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}

/// In-memory result of a splice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    /// The full new file content.
    pub content: String,
    /// Where the replacement landed.
    pub range: ResolvedRange,
    /// Lines in the original text.
    pub original_line_count: usize,
    /// Lines contributed by the replacement block.
    pub lines_inserted: usize,
    /// Lines in the new text.
    pub new_line_count: usize,
}

/// Report of a splice applied to a file.
#[derive(Debug, Clone, Serialize)]
pub struct SpliceReport {
    /// The target file.
    pub path: PathBuf,
    /// The range as requested.
    pub range: LineRange,
    /// Policy the range was resolved under.
    pub policy: RangePolicy,
    /// 1-based line where the replacement starts in the new file.
    pub first_line: usize,
    /// Original lines discarded.
    pub lines_removed: usize,
    /// Lines contributed by the replacement.
    pub lines_inserted: usize,
    /// Line count before the splice.
    pub original_line_count: usize,
    /// Line count after the splice.
    pub new_line_count: usize,
    /// Whether the content differs from the original.
    pub changed: bool,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Unified diff of the change (dry run only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl SpliceReport {
    /// Get a summary string.
    pub fn summary(&self) -> String {
        let action = if self.dry_run {
            "Would replace"
        } else {
            "Replaced"
        };
        format!(
            "{} {} line(s) at line {} with {} line(s) in {} ({} -> {} lines)",
            action,
            self.lines_removed,
            self.first_line,
            self.lines_inserted,
            self.path.display(),
            self.original_line_count,
            self.new_line_count
        )
    }
}

/// Replace `range` in `original` with `replacement`, without touching disk.
///
/// Each kept line retains its own terminator. The replacement gets the
/// original's line ending appended when it lacks one, and a leading BOM is
/// dropped from it. An unterminated last kept line before the block is
/// terminated so the two never fuse.
///
/// [`RangePolicy::Legacy`] skips all three fixups: the replacement is taken
/// as is, a missing terminator is always `\n`, and fusing is kept.
pub fn splice_text(
    original: &str,
    range: LineRange,
    replacement: &str,
    policy: RangePolicy,
) -> SpliceResult<Spliced> {
    let lines = split_lines(original);
    let resolved = range.resolve(lines.len(), policy)?;
    debug!(
        %range,
        %policy,
        keep_before = resolved.keep_before,
        resume_at = resolved.resume_at,
        "resolved line range"
    );

    let legacy = policy == RangePolicy::Legacy;
    let ending = LineEnding::detect(original);
    let block = if legacy {
        ensure_trailing_newline(replacement, LineEnding::Lf)
    } else {
        ensure_trailing_newline(strip_bom(replacement), ending)
    };

    let pre = &lines[..resolved.keep_before];
    let post = &lines[resolved.resume_at..];

    let mut content = String::with_capacity(original.len() + block.len());
    for line in pre {
        content.push_str(line);
    }
    if !legacy && !content.is_empty() && !ends_with_terminator(&content) {
        content.push_str(ending.as_str());
    }
    content.push_str(&block);
    for line in post {
        content.push_str(line);
    }

    let lines_inserted = split_lines(&block).len();
    let new_line_count = split_lines(&content).len();
    Ok(Spliced {
        content,
        range: resolved,
        original_line_count: lines.len(),
        lines_inserted,
        new_line_count,
    })
}

/// Replace `range` in the file at `target` with the full text of `content_path`.
///
/// The target is replaced atomically; on any error it is left untouched.
pub fn splice_file(
    target: &Path,
    range: LineRange,
    content_path: &Path,
    options: &SpliceOptions,
) -> SpliceResult<SpliceReport> {
    let original = read_text(target, options.max_file_size)?;
    let replacement = read_text(content_path, options.max_file_size)?;

    let spliced = splice_text(&original, range, &replacement, options.policy)?;
    let changed = spliced.content != original;

    let diff = if options.dry_run {
        Some(unified_diff(target, &original, &spliced.content))
    } else {
        None
    };

    if !options.dry_run {
        if changed {
            atomic_write_string(target, &spliced.content).map_err(|source| {
                SpliceError::WriteError {
                    path: target.to_path_buf(),
                    source,
                }
            })?;
        } else {
            debug!(path = %target.display(), "content unchanged, skipping write");
        }
    }

    let report = SpliceReport {
        path: target.to_path_buf(),
        range,
        policy: options.policy,
        first_line: spliced.range.first_line(),
        lines_removed: spliced.range.lines_removed(),
        lines_inserted: spliced.lines_inserted,
        original_line_count: spliced.original_line_count,
        new_line_count: spliced.new_line_count,
        changed,
        dry_run: options.dry_run,
        diff,
    };
    info!("{}", report.summary());

    Ok(report)
}

/// Load a whole file as UTF-8 text after the file-safety checks.
fn read_text(path: &Path, max_file_size: u64) -> SpliceResult<String> {
    let size = validate_file_for_read_with_limit(path, max_file_size)
        .map_err(|e| SpliceError::from_file_error(path, e))?;

    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SpliceError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SpliceError::ReadError {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    debug!(path = %path.display(), size, "read file");

    String::from_utf8(bytes).map_err(|e| SpliceError::Decode {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Unified diff between the old and new content, 3 lines of context.
fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let name = path.display().to_string();
    let old_header = format!("a/{name}");
    let new_header = format!("b/{name}");

    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string()
}
