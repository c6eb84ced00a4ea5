//! Command handlers for CLI subcommands
//!
//! Each handler receives its parsed arguments, the loaded configuration
//! where it needs one, and the output writer.

mod completions;
mod config;
mod flatten;
mod input;
mod map;

pub use completions::handle_completions;
pub use config::handle_config;
pub use flatten::handle_flatten;
pub use map::handle_map;
