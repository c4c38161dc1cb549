//! Bridge history display (external collaborator).
//!
//! The core never interprets records; it fetches once and holds the
//! sequence for display.

pub mod source;
pub mod view;

pub use source::{HistoryError, HistoryRecord, HistorySource, HttpHistorySource};
pub use view::HistoryView;
