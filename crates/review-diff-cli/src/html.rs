//! Standalone HTML page for rendered files.

use review_diff_core::annotate::ViewedStatus;
use review_diff_core::highlight::escape_html;
use review_diff_core::model::{CommentStatus, DiffFile, ReviewComment};
use review_diff_core::render::{
    GapRow, LineComments, LineRow, SplitCell, SplitFile, SplitRow, UnifiedFile, UnifiedRow,
};
use review_diff_core::state::{CommentStore, RenderedFile};

const PAGE_CSS: &str = r#"
body { font-family: sans-serif; margin: 1rem; }
table.diff { border-collapse: collapse; width: 100%; font-family: monospace; font-size: 12px; }
table.diff td { padding: 0 6px; vertical-align: top; white-space: pre; }
td.num { color: #888; text-align: right; user-select: none; width: 1%; }
tr.insert td.code, td.code.insert { background: #e6ffed; }
tr.delete td.code, td.code.delete { background: #ffeef0; }
tr.expanded td.code { background: #f6f8fa; }
tr.hunk td { background: #f1f8ff; color: #555; }
tr.gap td { background: #fafbfc; color: #0366d6; text-align: center; }
tr.thread td { white-space: normal; background: #fffbe6; }
.comment { border-left: 3px solid #d4a72c; margin: 4px 0; padding: 2px 8px; }
.comment.resolved { opacity: 0.6; }
.gutter { font-size: 10px; color: #d4a72c; }
.viewed { color: #28a745; }
.updated { color: #d73a49; }
"#;

/// One file of the page.
pub struct FileSection<'a> {
    pub file: &'a DiffFile,
    pub viewed: Option<ViewedStatus>,
    pub rendered: RenderedFile,
}

pub fn document(
    title: &str,
    sections: &[FileSection<'_>],
    store: &CommentStore,
    stylesheet: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(&format!("<style>{}\n{}</style>\n", PAGE_CSS, stylesheet));
    html.push_str("</head>\n<body>\n");

    let counts = store.counts();
    html.push_str(&format!(
        "<h1>{}</h1>\n<p>{} files, {} open, {} resolved, {} outdated</p>\n",
        escape_html(title),
        sections.len(),
        counts.open,
        counts.resolved,
        counts.outdated
    ));

    let project: Vec<&ReviewComment> = store.project_level().collect();
    if !project.is_empty() {
        html.push_str("<section class=\"project-comments\">\n<h2>Review comments</h2>\n");
        for comment in project {
            html.push_str(&comment_html(comment));
        }
        html.push_str("</section>\n");
    }

    for section in sections {
        html.push_str(&file_section(section, store));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn file_section(section: &FileSection<'_>, store: &CommentStore) -> String {
    let file = section.file;
    let mut html = format!(
        "<section class=\"file\" id=\"{}\">\n<h2>{} <small>{} +{} -{}</small>{}</h2>\n",
        escape_html(&file.new_path),
        escape_html(&file.display_name()),
        file.change_type.as_char(),
        file.additions,
        file.deletions,
        viewed_badge(section.viewed)
    );

    for comment in store.file_level(&file.new_path) {
        html.push_str(&comment_html(comment));
    }

    html.push_str("<table class=\"diff\">\n");
    match &section.rendered {
        RenderedFile::Unified(unified) => html.push_str(&unified_rows(unified, store)),
        RenderedFile::Split(split) => html.push_str(&split_rows(split, store)),
    }
    html.push_str("</table>\n</section>\n");
    html
}

fn viewed_badge(status: Option<ViewedStatus>) -> &'static str {
    match status {
        Some(ViewedStatus::Viewed) => " <span class=\"viewed\">viewed</span>",
        Some(ViewedStatus::Updated) => " <span class=\"updated\">updated since viewed</span>",
        _ => "",
    }
}

fn unified_rows(file: &UnifiedFile, store: &CommentStore) -> String {
    let mut html = String::new();
    for row in &file.rows {
        match row {
            UnifiedRow::HunkHeader { header, .. } => html.push_str(&format!(
                "<tr class=\"hunk\"><td colspan=\"3\">{}</td></tr>\n",
                escape_html(header)
            )),
            UnifiedRow::Line(line) => {
                html.push_str(&unified_line(line));
                html.push_str(&threads(&line.comments, store, 3));
            }
            UnifiedRow::Gap(gap) => html.push_str(&gap_row(gap, 3)),
            UnifiedRow::NoChanges => html.push_str(&notice("No changes", 3)),
            UnifiedRow::Binary => html.push_str(&notice("Binary file not shown", 3)),
            UnifiedRow::OrphanThreads(comments) => {
                html.push_str(&orphan_threads(comments, store, 3))
            }
        }
    }
    html
}

fn unified_line(line: &LineRow) -> String {
    format!(
        "<tr class=\"{}{}\"{}><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"code\">{}{}</td></tr>\n",
        line.kind.css_class(),
        if line.expanded { " expanded" } else { "" },
        match_attr(&line.match_indices),
        number(line.old_line),
        number(line.new_line),
        gutter(&line.comments),
        line.html
    )
}

fn split_rows(file: &SplitFile, store: &CommentStore) -> String {
    let mut html = String::new();
    for row in &file.rows {
        match row {
            SplitRow::HunkHeader { header, .. } => html.push_str(&format!(
                "<tr class=\"hunk\"><td colspan=\"4\">{}</td></tr>\n",
                escape_html(header)
            )),
            SplitRow::Pair { left, right } => {
                html.push_str("<tr>");
                html.push_str(&split_cell(left.as_ref()));
                html.push_str(&split_cell(right.as_ref()));
                html.push_str("</tr>\n");
                for cell in [left, right].into_iter().flatten() {
                    html.push_str(&threads(&cell.comments, store, 4));
                }
            }
            SplitRow::Gap(gap) => html.push_str(&gap_row(gap, 4)),
            SplitRow::NoChanges => html.push_str(&notice("No changes", 4)),
            SplitRow::Binary => html.push_str(&notice("Binary file not shown", 4)),
            SplitRow::OrphanThreads(comments) => {
                html.push_str(&orphan_threads(comments, store, 4))
            }
        }
    }
    html
}

fn split_cell(cell: Option<&SplitCell>) -> String {
    match cell {
        Some(cell) => format!(
            "<td class=\"num\">{}</td><td class=\"code {}{}\"{}>{}{}</td>",
            cell.line_number,
            cell.kind.css_class(),
            if cell.expanded { " expanded" } else { "" },
            match_attr(&cell.match_indices),
            gutter(&cell.comments),
            cell.html
        ),
        None => "<td class=\"num\"></td><td class=\"code empty\"></td>".to_string(),
    }
}

fn gap_row(gap: &GapRow, colspan: usize) -> String {
    let label = match (gap.loading, gap.hidden) {
        (true, _) => "Loading…".to_string(),
        (false, Some(1)) => "1 line hidden".to_string(),
        (false, Some(hidden)) => format!("{} lines hidden", hidden),
        (false, None) => "More lines below".to_string(),
    };
    let hidden_threads = match gap.comments {
        0 => String::new(),
        1 => " (1 comment)".to_string(),
        n => format!(" ({} comments)", n),
    };
    format!(
        "<tr class=\"gap\" data-gap=\"{}\"><td colspan=\"{}\">{}{}</td></tr>\n",
        gap.gap_index, colspan, label, hidden_threads
    )
}

fn notice(text: &str, colspan: usize) -> String {
    format!(
        "<tr class=\"notice\"><td colspan=\"{}\">{}</td></tr>\n",
        colspan, text
    )
}

fn number(line: Option<u32>) -> String {
    line.map(|n| n.to_string()).unwrap_or_default()
}

fn match_attr(indices: &[usize]) -> String {
    if indices.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = indices.iter().map(usize::to_string).collect();
    format!(" data-match=\"{}\"", joined.join(" "))
}

fn gutter(comments: &LineComments) -> String {
    match &comments.gutter {
        Some(indicator) if indicator.collapsed => format!(
            "<span class=\"gutter\" title=\"{}\">[{}]</span> ",
            escape_html(indicator.author.as_deref().unwrap_or("")),
            indicator.count
        ),
        _ => String::new(),
    }
}

/// Expanded threads of a line; collapsed ones only show in the gutter.
fn threads(comments: &LineComments, store: &CommentStore, colspan: usize) -> String {
    let open: Vec<&ReviewComment> = comments
        .ids
        .iter()
        .filter(|id| !store.is_collapsed(id))
        .filter_map(|id| store.get(id))
        .collect();
    if open.is_empty() {
        return String::new();
    }

    let mut html = format!("<tr class=\"thread\"><td colspan=\"{}\">", colspan);
    for comment in open {
        html.push_str(&comment_html(comment));
    }
    html.push_str("</td></tr>\n");
    html
}

/// Threads of a file that has no line rows to attach them to.
fn orphan_threads(comments: &LineComments, store: &CommentStore, colspan: usize) -> String {
    let mut html = String::new();
    if comments.gutter.as_ref().is_some_and(|g| g.collapsed) {
        html.push_str(&notice(gutter(comments).trim_end(), colspan));
    }
    html.push_str(&threads(comments, store, colspan));
    html
}

fn comment_html(comment: &ReviewComment) -> String {
    let status = match comment.status {
        CommentStatus::Open => "open",
        CommentStatus::Resolved => "resolved",
        CommentStatus::Outdated => "outdated",
    };
    let mut html = format!(
        "<div class=\"comment {}\" id=\"comment-{}\"><b>{}</b> <small>{}</small><p>{}</p>",
        status,
        escape_html(&comment.id),
        escape_html(comment.author.as_deref().unwrap_or("unknown")),
        status,
        escape_html(&comment.content)
    );
    for reply in &comment.replies {
        html.push_str(&format!(
            "<div class=\"reply\"><b>{}</b><p>{}</p></div>",
            escape_html(reply.author.as_deref().unwrap_or("unknown")),
            escape_html(&reply.content)
        ));
    }
    html.push_str("</div>\n");
    html
}
