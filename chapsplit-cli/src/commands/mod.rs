//! CLI command implementations

pub mod split;

pub use split::{OutputFormat, SplitArgs};
