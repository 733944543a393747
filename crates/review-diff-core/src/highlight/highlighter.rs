//! Block syntax highlighter using syntect.

use super::resegment::{plain_lines, split_highlighted_lines};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Class style shared by the generated markup and the stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Highlights contiguous blocks of source and hands out one HTML fragment per line.
pub struct DiffHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    /// Highlighted fragments by (path, block) hash.
    cache: HashMap<u64, Vec<String>>,
    max_cache_size: usize,
    /// Syntax index by file extension; `None` for unrecognized languages.
    syntax_cache: HashMap<String, Option<usize>>,
    enabled: bool,
}

impl std::fmt::Debug for DiffHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffHighlighter")
            .field("cache_size", &self.cache.len())
            .field("max_cache_size", &self.max_cache_size)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for DiffHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffHighlighter {
    /// Create a highlighter with the default theme.
    pub fn new() -> Self {
        Self::with_theme_name(DEFAULT_THEME)
    }

    /// Create a highlighter with a specific theme name, falling back to the default.
    pub fn with_theme_name(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| {
                log::warn!("Unknown highlight theme {}, using {}", theme_name, DEFAULT_THEME);
                theme_set.themes.remove(DEFAULT_THEME)
            })
            .unwrap_or_default();

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            cache: HashMap::new(),
            max_cache_size: 500,
            syntax_cache: HashMap::new(),
            enabled: true,
        }
    }

    /// Set the maximum number of cached blocks.
    pub fn with_max_cache(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Turn styling on or off; when off every block is escaped plain text.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Highlight `lines` as one block and return exactly one fragment per line.
    ///
    /// Unrecognized languages and highlighter errors fall back to escaped
    /// plain text; this never fails.
    pub fn highlight_block<S: AsRef<str>>(&mut self, path: &str, lines: &[S]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        if !self.enabled {
            return plain_lines(lines);
        }

        let key = cache_key(path, lines);
        if let Some(fragments) = self.cache.get(&key) {
            return fragments.clone();
        }

        let fragments = match self.syntax_index(path) {
            Some(idx) => {
                let syntax = &self.syntax_set.syntaxes()[idx];
                match self.render_block(syntax, lines) {
                    Ok(html) => split_highlighted_lines(&html, lines.len()),
                    Err(e) => {
                        log::warn!("Highlighting {} failed, using plain text: {}", path, e);
                        plain_lines(lines)
                    }
                }
            }
            None => plain_lines(lines),
        };

        if self.cache.len() >= self.max_cache_size {
            let to_remove = (self.max_cache_size / 5).max(1);
            let keys_to_remove: Vec<_> = self.cache.keys().take(to_remove).copied().collect();
            for key in keys_to_remove {
                self.cache.remove(&key);
            }
        }
        self.cache.insert(key, fragments.clone());

        fragments
    }

    /// CSS matching the class names emitted by [`DiffHighlighter::highlight_block`].
    pub fn stylesheet(&self) -> String {
        css_for_theme_with_class_style(&self.theme, CLASS_STYLE).unwrap_or_else(|e| {
            log::warn!("Failed to build highlight stylesheet: {}", e);
            String::new()
        })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn render_block<S: AsRef<str>>(
        &self,
        syntax: &SyntaxReference,
        lines: &[S],
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in lines {
            let mut line = line.as_ref().to_string();
            line.push('\n');
            generator.parse_html_for_line_which_includes_newline(&line)?;
        }
        Ok(generator.finalize())
    }

    /// Syntax index for a file path (cached by extension).
    fn syntax_index(&mut self, path: &str) -> Option<usize> {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if let Some(&idx) = self.syntax_cache.get(&ext) {
            return idx;
        }

        let plain = self.syntax_set.find_syntax_plain_text().name.clone();
        let idx = self
            .syntax_set
            .find_syntax_by_extension(&ext)
            .filter(|s| s.name != plain)
            .and_then(|syntax| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .position(|s| s.name == syntax.name)
            });

        if idx.is_none() {
            log::debug!("No syntax for {}, highlighting disabled for this file", path);
        }
        self.syntax_cache.insert(ext, idx);
        idx
    }
}

fn cache_key<S: AsRef<str>>(path: &str, lines: &[S]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    path.hash(&mut hasher);
    for line in lines {
        line.as_ref().hash(&mut hasher);
    }
    hasher.finish()
}
