//! Thermodecay CLI library.
//!
//! Terminal styling and output formatting shared by the `thermodecay`
//! binary's subcommands.

pub mod output;
pub mod terminal;
