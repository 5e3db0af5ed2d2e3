//! Property test suite entry point.

mod accounting_laws;
mod reconcile_properties;
mod save_file_properties;
