//! Storage layer for the expense reporter
//!
//! JSON file storage with atomic writes and automatic directory creation.

pub mod file_io;

pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
