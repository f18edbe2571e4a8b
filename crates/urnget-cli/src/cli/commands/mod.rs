//! CLI command handlers, one file per command.

mod checkout;
mod id;
mod mirrors;

pub use checkout::run_checkout;
pub use id::run_id;
pub use mirrors::run_mirrors;
