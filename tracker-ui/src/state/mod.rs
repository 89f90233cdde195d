//! State Management
//!
//! Global application state.

pub mod global;
