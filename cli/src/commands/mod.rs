//! Subcommand implementations, one module per subcommand.

pub mod bump;
pub mod compare;
pub mod completions;
pub mod config;
pub mod read;

pub use bump::{BumpSource, run_bump};
pub use compare::run_compare;
pub use completions::generate_completions;
pub use config::run_config;
pub use read::run_read;
