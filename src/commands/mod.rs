//! CLI command implementations.

pub mod label;
pub mod sweep;

pub use label::{LabelCommand, LabelReport};
pub use sweep::SweepCommand;
