//! Events emitted by file views for the orchestrator to handle.

mod view_event;

pub use view_event::ViewEvent;
