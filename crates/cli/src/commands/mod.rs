//! Subcommands.

mod run;

pub use run::Run;
