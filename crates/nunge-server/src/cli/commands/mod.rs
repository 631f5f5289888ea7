//! CLI command handlers, one per file.

mod batch;
mod fetch;
mod serve;
mod show_config;

pub use batch::run_batch;
pub use fetch::run_fetch;
pub use serve::run_serve;
pub use show_config::run_show_config;
#[cfg(test)]
pub(crate) use batch::parse_batch_file;
