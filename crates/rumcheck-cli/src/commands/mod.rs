//! CLI subcommand implementations.

pub mod dump;
pub mod util;
pub mod verify;
