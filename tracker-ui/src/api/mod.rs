//! API access

pub mod client;

pub use client::{fetch_entries, save_entries};
