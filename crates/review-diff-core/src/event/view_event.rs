use crate::fetch::FileContentRequest;

/// Events emitted by a file view.
///
/// The view is instrumented: it emits events instead of performing side
/// effects. The orchestrator performs the I/O and feeds results back.
///
/// # Example
///
/// ```ignore
/// for event in session.handle_action("src/lib.rs", ViewAction::ExpandDown(1)) {
///     match event {
///         ViewEvent::FileContentRequested(request) => fetch_queue.submit(request),
///         ViewEvent::ExpansionChanged { .. } => needs_render = true,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The view needs the full file text. Emitted at most once per load.
    FileContentRequested(FileContentRequest),

    /// The revealed range of a gap changed.
    ExpansionChanged {
        gap_index: usize,
        /// Lines still hidden, `None` while the gap bounds are unknown.
        remaining: Option<u32>,
    },
}
