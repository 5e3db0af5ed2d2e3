//! slipday - attendance-earned slip-day tracking.
//!
//! A gradebook export (CSV) is reduced to a [`roster::Snapshot`], reconciled
//! against the previously saved [`roster::RosterState`], and persisted
//! atomically by [`storage`]. The CLI in [`cli`] drives a session per command.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod roster;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use error::{Result, SlipError};
