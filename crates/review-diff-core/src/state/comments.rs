//! The in-memory comment collection of a review session.

use crate::model::{
    CommentKind, CommentShapeError, CommentStatus, CommentsResponse, ReviewComment,
};
use crate::traits::CommentError;
use std::collections::HashSet;
use thiserror::Error;

/// Why the comment collection could not be loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentLoadError {
    #[error(transparent)]
    Fetch(#[from] CommentError),

    #[error(transparent)]
    Shape(#[from] CommentShapeError),
}

/// Load state of the collection. A failed load is fatal to the session view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommentLoadState {
    #[default]
    NotLoaded,
    Loaded,
    Failed(String),
}

/// Counts derived from the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentCounts {
    pub open: usize,
    pub resolved: usize,
    pub outdated: usize,
}

impl CommentCounts {
    pub fn not_resolved(&self) -> usize {
        self.open + self.outdated
    }
}

/// Gutter marker for a line carrying comment threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GutterIndicator {
    pub count: usize,
    /// Avatar of the first thread's author.
    pub avatar_url: Option<String>,
    pub author: Option<String>,
    /// Every thread on the line is collapsed.
    pub collapsed: bool,
}

/// Sole owner of the comment collection.
///
/// Every load and every mutation response replaces the whole collection;
/// nothing is merged locally.
#[derive(Debug, Clone)]
pub struct CommentStore {
    comments: Vec<ReviewComment>,
    collapsed: HashSet<String>,
    seen: HashSet<String>,
    collapse_resolved: bool,
    state: CommentLoadState,
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CommentStore {
    pub fn new(collapse_resolved: bool) -> Self {
        Self {
            comments: Vec::new(),
            collapsed: HashSet::new(),
            seen: HashSet::new(),
            collapse_resolved,
            state: CommentLoadState::NotLoaded,
        }
    }

    /// Apply the initial load. A failure moves the store into the error state.
    pub fn load(
        &mut self,
        result: Result<CommentsResponse, CommentError>,
    ) -> Result<(), CommentLoadError> {
        let outcome = result
            .map_err(CommentLoadError::from)
            .and_then(|response| response.into_comments().map_err(CommentLoadError::from));

        match outcome {
            Ok(comments) => {
                self.replace(comments);
                self.state = CommentLoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                log::warn!("Loading comments failed: {}", e);
                self.state = CommentLoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply the response of a comment mutation.
    ///
    /// On failure nothing changes and `false` is returned; the caller owns
    /// user-visible feedback.
    pub fn apply_mutation(&mut self, result: Result<CommentsResponse, CommentError>) -> bool {
        let comments = match result {
            Ok(response) => match response.into_comments() {
                Ok(comments) => comments,
                Err(e) => {
                    log::warn!("Ignoring malformed mutation response: {}", e);
                    return false;
                }
            },
            Err(e) => {
                log::warn!("Comment mutation failed: {}", e);
                return false;
            }
        };
        self.replace(comments);
        self.state = CommentLoadState::Loaded;
        true
    }

    fn replace(&mut self, comments: Vec<ReviewComment>) {
        for comment in &comments {
            if self.seen.insert(comment.id.clone())
                && self.collapse_resolved
                && comment.is_resolved()
            {
                self.collapsed.insert(comment.id.clone());
            }
        }
        let current: HashSet<&str> = comments.iter().map(|c| c.id.as_str()).collect();
        self.collapsed.retain(|id| current.contains(id.as_str()));
        self.seen.retain(|id| current.contains(id.as_str()));
        log::debug!("Comment collection replaced ({} threads)", comments.len());
        self.comments = comments;
    }

    pub fn state(&self) -> &CommentLoadState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, CommentLoadState::Failed(_))
    }

    pub fn comments(&self) -> &[ReviewComment] {
        &self.comments
    }

    pub fn get(&self, id: &str) -> Option<&ReviewComment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Inline comments on a file.
    pub fn inline_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ReviewComment> {
        self.comments.iter().filter(move |c| {
            matches!(&c.kind, CommentKind::Inline { file_path, .. } if file_path == path)
        })
    }

    /// File-level comments on a file.
    pub fn file_level<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ReviewComment> {
        self.comments.iter().filter(
            move |c| matches!(&c.kind, CommentKind::File { file_path } if file_path == path),
        )
    }

    /// Comments on the review as a whole.
    pub fn project_level(&self) -> impl Iterator<Item = &ReviewComment> {
        self.comments
            .iter()
            .filter(|c| c.kind == CommentKind::Project)
    }

    pub fn counts(&self) -> CommentCounts {
        let mut counts = CommentCounts::default();
        for comment in &self.comments {
            match comment.status {
                CommentStatus::Open => counts.open += 1,
                CommentStatus::Resolved => counts.resolved += 1,
                CommentStatus::Outdated => counts.outdated += 1,
            }
        }
        counts
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) {
        if collapsed {
            if self.get(id).is_some() {
                self.collapsed.insert(id.to_string());
            }
        } else {
            self.collapsed.remove(id);
        }
    }

    pub fn toggle_collapsed(&mut self, id: &str) {
        let collapsed = self.is_collapsed(id);
        self.set_collapsed(id, !collapsed);
    }

    /// Gutter indicator for the threads placed on one line.
    pub fn gutter_indicator(&self, ids: &[String]) -> Option<GutterIndicator> {
        let first = ids.iter().find_map(|id| self.get(id))?;
        Some(GutterIndicator {
            count: ids.len(),
            avatar_url: first.author_avatar_url.clone(),
            author: first.author.clone(),
            collapsed: ids.iter().all(|id| self.is_collapsed(id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommentType, DiffSide, ReviewCommentEntry};
    use pretty_assertions::assert_eq;

    fn entry(id: &str, status: CommentStatus) -> ReviewCommentEntry {
        ReviewCommentEntry {
            id: id.to_string(),
            file_path: Some("src/lib.rs".to_string()),
            side: Some(DiffSide::Add),
            start_line: Some(3),
            end_line: Some(3),
            status,
            content: format!("comment {}", id),
            replies: Vec::new(),
            comment_type: CommentType::Inline,
            author: Some("robin".to_string()),
            author_avatar_url: Some(format!("https://avatars.test/{}", id)),
            created_at: None,
        }
    }

    fn response(entries: Vec<ReviewCommentEntry>) -> CommentsResponse {
        CommentsResponse {
            comments: entries,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_collapses_resolved_threads() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![
                entry("1", CommentStatus::Open),
                entry("2", CommentStatus::Resolved),
            ])))
            .unwrap();

        assert_eq!(store.state(), &CommentLoadState::Loaded);
        assert!(!store.is_collapsed("1"));
        assert!(store.is_collapsed("2"));
        assert_eq!(
            store.counts(),
            CommentCounts {
                open: 1,
                resolved: 1,
                outdated: 0
            }
        );
    }

    #[test]
    fn test_collapse_only_on_first_sighting() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![entry("1", CommentStatus::Resolved)])))
            .unwrap();
        store.toggle_collapsed("1");
        assert!(!store.is_collapsed("1"));

        assert!(store.apply_mutation(Ok(response(vec![entry("1", CommentStatus::Resolved)]))));
        assert!(!store.is_collapsed("1"));

        // Resolving an already known thread does not collapse it either.
        store.apply_mutation(Ok(response(vec![
            entry("1", CommentStatus::Resolved),
            entry("3", CommentStatus::Open),
        ])));
        store.apply_mutation(Ok(response(vec![
            entry("1", CommentStatus::Resolved),
            entry("3", CommentStatus::Resolved),
        ])));
        assert!(!store.is_collapsed("3"));
    }

    #[test]
    fn test_recreated_thread_collapses_again() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![entry("1", CommentStatus::Resolved)])))
            .unwrap();
        store.toggle_collapsed("1");
        assert!(!store.is_collapsed("1"));

        assert!(store.apply_mutation(Ok(response(vec![]))));
        assert!(store.apply_mutation(Ok(response(vec![entry("1", CommentStatus::Resolved)]))));
        assert!(store.is_collapsed("1"));
    }

    #[test]
    fn test_mutation_replaces_collection() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![
                entry("1", CommentStatus::Open),
                entry("2", CommentStatus::Open),
            ])))
            .unwrap();

        assert!(store.apply_mutation(Ok(response(vec![entry("2", CommentStatus::Open)]))));
        let ids: Vec<_> = store.comments().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_failed_mutation_is_noop() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![entry("1", CommentStatus::Open)])))
            .unwrap();

        let applied = store.apply_mutation(Err(CommentError::RequestFailed("503".to_string())));
        assert!(!applied);
        assert_eq!(store.comments().len(), 1);
        assert_eq!(store.state(), &CommentLoadState::Loaded);
    }

    #[test]
    fn test_failed_load_enters_error_state() {
        let mut store = CommentStore::default();
        let mut bad = entry("1", CommentStatus::Open);
        bad.side = None;

        let result = store.load(Ok(response(vec![bad])));
        assert_eq!(
            result,
            Err(CommentLoadError::Shape(CommentShapeError::MissingSide(
                "1".to_string()
            )))
        );
        assert!(store.is_failed());
    }

    #[test]
    fn test_gutter_indicator_for_collapsed_threads() {
        let mut store = CommentStore::default();
        store
            .load(Ok(response(vec![
                entry("1", CommentStatus::Resolved),
                entry("2", CommentStatus::Resolved),
            ])))
            .unwrap();

        let ids = vec!["1".to_string(), "2".to_string()];
        let indicator = store.gutter_indicator(&ids).unwrap();
        assert_eq!(indicator.count, 2);
        assert!(indicator.collapsed);
        assert_eq!(
            indicator.avatar_url.as_deref(),
            Some("https://avatars.test/1")
        );

        store.toggle_collapsed("2");
        assert!(!store.gutter_indicator(&ids).unwrap().collapsed);
        assert_eq!(store.gutter_indicator(&[]), None);
    }

    #[test]
    fn test_file_and_project_partitions() {
        let mut store = CommentStore::default();
        let mut file = entry("f", CommentStatus::Open);
        file.comment_type = CommentType::File;
        let mut project = entry("p", CommentStatus::Open);
        project.comment_type = CommentType::Project;
        store
            .load(Ok(response(vec![
                entry("i", CommentStatus::Open),
                file,
                project,
            ])))
            .unwrap();

        assert_eq!(store.inline_for("src/lib.rs").count(), 1);
        assert_eq!(store.file_level("src/lib.rs").count(), 1);
        assert_eq!(store.project_level().count(), 1);
        assert_eq!(store.inline_for("other.rs").count(), 0);
    }
}
