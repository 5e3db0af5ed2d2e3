//! Persistence for the roster state.
//!
//! A single JSON save file, written atomically. [`SaveWorker`] runs the write
//! off the foreground thread for exit paths.

pub mod save_file;
pub mod worker;

pub use save_file::{load, save};
pub use worker::SaveWorker;
