//! Subcommand implementations.

pub mod completion;
pub mod create;
pub mod extract;
pub mod list;
