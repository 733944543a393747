//! Parse unified diff text (as produced by `git diff`).

use crate::model::{ChangeType, DiffFile, DiffHunk, DiffLine, FullDiff, LineKind};
use thiserror::Error;
use unidiff::{Hunk as UnidiffHunk, Line as UnidiffLine, PatchSet, PatchedFile};

const DEV_NULL: &str = "/dev/null";

/// Errors that can occur during diff parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse diff: {0}")]
    ParseFailed(String),
    #[error("Line {line} of hunk {header} has an unknown marker {marker:?}")]
    UnknownLineType {
        header: String,
        line: usize,
        marker: String,
    },
}

/// Parse a unified diff string into a [`FullDiff`].
///
/// `Binary files ... differ` entries become binary files without hunks.
///
/// # Example
/// ```ignore
/// let diff = parse_unified_diff(&std::fs::read_to_string("change.diff")?)?;
/// println!("Changed files: {}", diff.files.len());
/// ```
pub fn parse_unified_diff(diff_text: &str) -> Result<FullDiff, ParseError> {
    let mut patch_set = PatchSet::new();
    patch_set
        .parse(diff_text)
        .map_err(|e| ParseError::ParseFailed(e.to_string()))?;

    let mut diff = FullDiff::new();
    for patched_file in patch_set.files() {
        diff.files.push(parse_patched_file(patched_file)?);
    }

    for (source, target) in binary_entries(diff_text) {
        let path = if target == DEV_NULL { &source } else { &target };
        match diff.files.iter_mut().find(|f| &f.new_path == path) {
            Some(file) => file.is_binary = true,
            None => {
                let mut file = DiffFile::new(path.as_str());
                file.old_path = if source == DEV_NULL {
                    target.clone()
                } else {
                    source.clone()
                };
                file.change_type = determine_change_type(&source, &target);
                file.is_binary = true;
                diff.files.push(file);
            }
        }
    }

    diff.recalculate_totals();
    log::debug!(
        "Parsed diff: {} files, +{} -{}",
        diff.files.len(),
        diff.total_additions,
        diff.total_deletions
    );
    Ok(diff)
}

fn parse_patched_file(file: &PatchedFile) -> Result<DiffFile, ParseError> {
    let source = clean_path(&file.source_file);
    let target = clean_path(&file.target_file);

    // Deleted files keep their old path as the key.
    let path = if target == DEV_NULL { &source } else { &target };
    let mut diff_file = DiffFile::new(path.as_str());
    diff_file.change_type = determine_change_type(&source, &target);
    if source != DEV_NULL {
        diff_file.old_path = source.clone();
    }

    for hunk in file.hunks() {
        diff_file.hunks.push(parse_hunk(hunk)?);
    }

    diff_file.recalculate_stats();
    Ok(diff_file)
}

fn parse_hunk(hunk: &UnidiffHunk) -> Result<DiffHunk, ParseError> {
    let mut parsed = DiffHunk::with_section(
        hunk.source_start as u32,
        hunk.source_length as u32,
        hunk.target_start as u32,
        hunk.target_length as u32,
        hunk.section_header.trim(),
    );

    for (index, line) in hunk.lines().iter().enumerate() {
        if let Some(line) = parse_line(line, &parsed.header, index)? {
            parsed.lines.push(line);
        }
    }

    Ok(parsed)
}

/// Convert one hunk body line; `\ No newline at end of file` markers are dropped.
fn parse_line(
    line: &UnidiffLine,
    header: &str,
    index: usize,
) -> Result<Option<DiffLine>, ParseError> {
    let kind = match line.line_type.as_str() {
        " " | "" => LineKind::Context,
        "+" => LineKind::Insert,
        "-" => LineKind::Delete,
        "\\" => return Ok(None),
        other => {
            return Err(ParseError::UnknownLineType {
                header: header.to_string(),
                line: index + 1,
                marker: other.to_string(),
            })
        }
    };

    Ok(Some(DiffLine {
        kind,
        content: line.value.clone(),
        old_line: line.source_line_no.map(|n| n as u32),
        new_line: line.target_line_no.map(|n| n as u32),
    }))
}

fn determine_change_type(source: &str, target: &str) -> ChangeType {
    if source == DEV_NULL || source.is_empty() {
        ChangeType::Added
    } else if target == DEV_NULL || target.is_empty() {
        ChangeType::Deleted
    } else if source != target {
        ChangeType::Renamed
    } else {
        ChangeType::Modified
    }
}

/// `(source, target)` paths of every `Binary files X and Y differ` line.
fn binary_entries(diff_text: &str) -> Vec<(String, String)> {
    diff_text
        .lines()
        .filter_map(|line| {
            let body = line.strip_prefix("Binary files ")?.strip_suffix(" differ")?;
            let (source, target) = body.split_once(" and ")?;
            Some((clean_path(source), clean_path(target)))
        })
        .collect()
}

/// Clean the path by removing a/b prefixes from git diff output.
fn clean_path(path: &str) -> String {
    let path = path.trim();

    if let Some(stripped) = path.strip_prefix("a/") {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_prefix("b/") {
        return stripped.to_string();
    }

    path.to_string()
}
