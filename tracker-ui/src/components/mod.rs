//! UI Components
//!
//! Leptos components for the tracker page.

pub mod chart;
pub mod entry_form;
pub mod history_table;

pub use chart::Chart;
pub use entry_form::EntryForm;
pub use history_table::HistoryTable;
