//! Search match numbering across a render pass.

/// Hands out match numbers in render order.
///
/// One sequence is threaded through every file rendered in a pass and
/// reset before the next pass, so numbering is stable and per session.
#[derive(Debug, Clone, Default)]
pub struct MatchSequence {
    next: usize,
}

impl MatchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the next match.
    pub fn next_index(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Matches numbered so far in this pass.
    pub fn count(&self) -> usize {
        self.next
    }

    /// Start a new render pass.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Number every occurrence of `query` in `text` (case-insensitive).
pub fn number_matches(text: &str, query: Option<&str>, sequence: &mut MatchSequence) -> Vec<usize> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Vec::new();
    };
    let haystack = text.to_lowercase();
    let needle = query.to_lowercase();
    haystack
        .match_indices(&needle)
        .map(|_| sequence.next_index())
        .collect()
}
