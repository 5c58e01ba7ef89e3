//! Command-line facing workflow, independent of clap.

pub mod orchestration;

pub use orchestration::{run_release, ReleaseArgs, ReleaseOutcome};
