//! A review session: the diff, mounted file views, comments and viewed state.

use super::{CommentStore, FileView, DEFAULT_EXPAND_STEP};
use crate::action::ViewAction;
use crate::annotate::{content_hash, viewed_status, ViewedStatus};
use crate::event::ViewEvent;
use crate::fetch::{FileContentResult, LoadToken};
use crate::highlight::DiffHighlighter;
use crate::model::{CommentAnchor, CommentsResponse, FullDiff};
use crate::render::{
    render_split, render_unified, MatchSequence, RenderContext, RowId, RowMap, SplitFile,
    UnifiedFile, ViewMode,
};
use crate::traits::CommentError;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that stop a session from rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Diff could not be loaded: {0}")]
    DiffUnavailable(String),

    #[error("Comments could not be loaded: {0}")]
    CommentsUnavailable(String),

    #[error("File not in this review: {0}")]
    UnknownFile(String),

    #[error("File view not mounted: {0}")]
    NotMounted(String),
}

/// Per-session behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub expand_step: u32,
    pub collapse_resolved: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            expand_step: DEFAULT_EXPAND_STEP,
            collapse_resolved: true,
        }
    }
}

/// A rendered file in either layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedFile {
    Unified(UnifiedFile),
    Split(SplitFile),
}

impl RenderedFile {
    pub fn row_map(&self) -> &RowMap {
        match self {
            RenderedFile::Unified(file) => &file.row_map,
            RenderedFile::Split(file) => &file.row_map,
        }
    }
}

/// Owns everything one review surface shows.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    diff: FullDiff,
    views: HashMap<String, FileView>,
    comments: CommentStore,
    /// Stored content hash per path of files marked viewed.
    viewed: HashMap<String, u32>,
    row_maps: HashMap<String, RowMap>,
    options: SessionOptions,
    next_token: u64,
    error: Option<SessionError>,
}

impl ReviewSession {
    pub fn new(diff: FullDiff, options: SessionOptions) -> Self {
        Self {
            diff,
            views: HashMap::new(),
            comments: CommentStore::new(options.collapse_resolved),
            viewed: HashMap::new(),
            row_maps: HashMap::new(),
            options,
            next_token: 0,
            error: None,
        }
    }

    /// A session whose diff failed to load. It never renders.
    pub fn failed(error: SessionError) -> Self {
        let mut session = Self::new(FullDiff::new(), SessionOptions::default());
        session.error = Some(error);
        session
    }

    /// Restore the persisted viewed map.
    pub fn with_viewed(mut self, viewed: HashMap<String, u32>) -> Self {
        self.viewed = viewed;
        self
    }

    pub fn diff(&self) -> &FullDiff {
        &self.diff
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut CommentStore {
        &mut self.comments
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Apply the initial comment load. Failure puts the session in its error state.
    ///
    /// A session already in its error state keeps the first error.
    pub fn load_comments(&mut self, result: Result<CommentsResponse, CommentError>) {
        if let Some(error) = &self.error {
            log::debug!("Skipping comment load, session failed: {}", error);
            return;
        }
        match self.comments.load(result) {
            Ok(()) => self.sync_virtual_files(),
            Err(e) => self.error = Some(SessionError::CommentsUnavailable(e.to_string())),
        }
    }

    /// Apply a comment mutation response. Failure changes nothing.
    pub fn apply_comment_mutation(
        &mut self,
        result: Result<CommentsResponse, CommentError>,
    ) -> bool {
        let applied = self.comments.apply_mutation(result);
        if applied {
            self.sync_virtual_files();
        }
        applied
    }

    fn sync_virtual_files(&mut self) {
        let diff = std::mem::take(&mut self.diff);
        self.diff = diff.with_virtual_files(self.comments.comments());
    }

    /// Mount a file view, reusing the existing one if still mounted.
    pub fn mount(&mut self, path: &str) -> Result<&mut FileView, SessionError> {
        if !self.views.contains_key(path) {
            let file = self
                .diff
                .file(path)
                .cloned()
                .ok_or_else(|| SessionError::UnknownFile(path.to_string()))?;
            self.next_token += 1;
            let token = LoadToken(self.next_token);
            log::debug!("Mounting {} with {:?}", path, token);
            self.views
                .insert(path.to_string(), FileView::new(file, token, self.options.expand_step));
        }
        self.views
            .get_mut(path)
            .ok_or_else(|| SessionError::NotMounted(path.to_string()))
    }

    /// Drop a file view. Its in-flight fetch result will be discarded.
    pub fn unmount(&mut self, path: &str) {
        if self.views.remove(path).is_some() {
            log::debug!("Unmounted {}", path);
        }
        self.row_maps.remove(path);
    }

    pub fn view(&self, path: &str) -> Option<&FileView> {
        self.views.get(path)
    }

    pub fn handle_action(
        &mut self,
        path: &str,
        action: ViewAction,
    ) -> Result<Vec<ViewEvent>, SessionError> {
        let view = self
            .views
            .get_mut(path)
            .ok_or_else(|| SessionError::NotMounted(path.to_string()))?;
        Ok(view.handle_action(action))
    }

    /// Route a fetch result to its view. Returns `false` if it was discarded.
    pub fn apply_file_content(&mut self, result: FileContentResult) -> bool {
        let FileContentResult { request, result } = result;
        match self.views.get_mut(&request.path) {
            Some(view) => view.apply_file_content(request.token, result),
            None => {
                log::debug!("Discarding content for unmounted view {}", request.path);
                false
            }
        }
    }

    pub fn viewed_status(&self, path: &str) -> Option<ViewedStatus> {
        let file = self.diff.file(path)?;
        Some(viewed_status(
            self.viewed.get(path).copied(),
            content_hash(file),
        ))
    }

    /// Mark a file viewed, returning the hash to persist.
    pub fn mark_viewed(&mut self, path: &str) -> Option<u32> {
        let hash = content_hash(self.diff.file(path)?);
        self.viewed.insert(path.to_string(), hash);
        Some(hash)
    }

    pub fn unmark_viewed(&mut self, path: &str) {
        self.viewed.remove(path);
    }

    pub fn viewed(&self) -> &HashMap<String, u32> {
        &self.viewed
    }

    /// Render a mounted file. The row map is kept for later anchor lookups.
    pub fn render_file(
        &mut self,
        path: &str,
        mode: ViewMode,
        highlighter: &mut DiffHighlighter,
        matches: &mut MatchSequence,
        query: Option<&str>,
    ) -> Result<RenderedFile, SessionError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let view = self
            .views
            .get(path)
            .ok_or_else(|| SessionError::NotMounted(path.to_string()))?;

        let mut ctx = RenderContext {
            highlighter,
            comments: &self.comments,
            matches,
            query,
        };
        let rendered = match mode {
            ViewMode::Unified => RenderedFile::Unified(render_unified(view, &mut ctx)),
            ViewMode::Split => RenderedFile::Split(render_split(view, &mut ctx)),
        };
        self.row_maps
            .insert(path.to_string(), rendered.row_map().clone());
        Ok(rendered)
    }

    /// Anchor for a selection in the last rendering of `path`.
    pub fn anchor_for_rows(&self, path: &str, from: RowId, to: RowId) -> Option<CommentAnchor> {
        self.row_maps.get(path)?.anchor_for_rows(from, to)
    }
}
