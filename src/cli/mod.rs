mod args;
mod backend;

pub use args::{Cli, Commands, ConfigSubcommands};
pub use backend::{create_backend, effective_config};
