//! Input handling module

pub mod source;

pub use source::validate_source;
