//! Cut block-highlighted markup into independently balanced per-line fragments.
//!
//! A highlighter run over many lines at once keeps multi-line constructs
//! (block comments, strings) correctly scoped, but its markup spans cross
//! line boundaries. [`split_highlighted_lines`] closes every open tag at
//! each newline and re-opens it on the next line.

/// One open element on the tag stack.
#[derive(Debug, Clone)]
struct OpenTag {
    /// Full opening tag text, e.g. `<span class="hl-comment">`.
    open: String,
    name: String,
}

impl OpenTag {
    fn close(&self) -> String {
        format!("</{}>", self.name)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    SelfClosing,
    /// Comments, doctypes and processing instructions.
    Other,
}

fn classify(tag: &str) -> TagKind {
    if tag.starts_with("</") {
        TagKind::Close
    } else if tag.starts_with("<!") || tag.starts_with("<?") {
        TagKind::Other
    } else if tag.ends_with("/>") {
        TagKind::SelfClosing
    } else {
        TagKind::Open
    }
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect()
}

/// Byte length of the tag starting at `start` (which must be `<`).
///
/// Quoted attribute values may contain `>`. Returns `None` when the tag
/// does not terminate on the same line.
fn tag_len(input: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, c) in input[start..].char_indices().skip(1) {
        match (quote, c) {
            (_, '\n') => return None,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(offset + 1),
            (None, _) => {}
        }
    }
    None
}

struct Splitter {
    stack: Vec<OpenTag>,
    current: String,
    fragments: Vec<String>,
}

impl Splitter {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            current: String::new(),
            fragments: Vec::new(),
        }
    }

    fn close_all(&mut self) {
        for tag in self.stack.iter().rev() {
            self.current.push_str(&tag.close());
        }
    }

    fn newline(&mut self) {
        self.close_all();
        self.fragments.push(std::mem::take(&mut self.current));
        for tag in &self.stack {
            self.current.push_str(&tag.open);
        }
    }

    fn tag(&mut self, tag: &str) {
        match classify(tag) {
            TagKind::Open => {
                self.stack.push(OpenTag {
                    open: tag.to_string(),
                    name: tag_name(tag),
                });
                self.current.push_str(tag);
            }
            TagKind::Close => {
                if self.stack.pop().is_some() {
                    self.current.push_str(tag);
                } else {
                    log::debug!("Dropping unmatched closing tag {}", tag);
                }
            }
            TagKind::SelfClosing | TagKind::Other => self.current.push_str(tag),
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.stack.is_empty() {
            log::debug!(
                "Highlighted markup left {} tag(s) open, flushing",
                self.stack.len()
            );
            self.close_all();
            self.stack.clear();
        }
        self.fragments.push(self.current);
        self.fragments
    }
}

/// Split `html` (the highlighting of `line_count` lines joined by `\n`)
/// into exactly `line_count` balanced fragments.
///
/// Never fails: unmatched closing tags are dropped, tags left open at the
/// end are closed on the final fragment and an unterminated `<` is kept as text.
/// Surplus fragments (a trailing newline in the input) are folded into the
/// last fragment; missing ones are padded with empty strings.
pub fn split_highlighted_lines(html: &str, line_count: usize) -> Vec<String> {
    let mut splitter = Splitter::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '\n' => {
                splitter.newline();
                pos += 1;
            }
            '<' => match tag_len(html, pos) {
                Some(len) => {
                    splitter.tag(&html[pos..pos + len]);
                    pos += len;
                }
                None => {
                    splitter.current.push('<');
                    pos += 1;
                }
            },
            _ => {
                let next = rest
                    .find(|c| c == '\n' || c == '<')
                    .unwrap_or(rest.len());
                splitter.current.push_str(&rest[..next]);
                pos += next;
            }
        }
    }

    let mut fragments = splitter.finish();
    if line_count == 0 {
        return Vec::new();
    }
    if fragments.len() > line_count {
        let surplus: String = fragments.drain(line_count..).collect();
        fragments[line_count - 1].push_str(&surplus);
    }
    fragments.resize(line_count, String::new());
    fragments
}

/// Escape text for HTML output.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Unstyled fallback: one escaped fragment per line.
pub fn plain_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines.iter().map(|l| escape_html(l.as_ref())).collect()
}

/// Remove all tags and decode the entities produced by [`escape_html`].
pub fn strip_markup(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut pos = 0;
    while pos < fragment.len() {
        let rest = &fragment[pos..];
        if rest.starts_with('<') {
            if let Some(len) = tag_len(fragment, pos) {
                pos += len;
                continue;
            }
        }
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let next = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        text.push_str(&rest[..next]);
        pos += next;
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
