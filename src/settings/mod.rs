//! Configuration loading and resolution utilities.
//!
//! `load` layers the default config files, explicit `-c` files, `SHARETREE__*`
//! environment variables and CLI flags, then returns a validated
//! [`ResolvedConfig`].

mod loader;
mod raw;
mod resolved;
mod sources;

pub use loader::load;
pub use resolved::ResolvedConfig;
