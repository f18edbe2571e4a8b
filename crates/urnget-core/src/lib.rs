pub mod config;
pub mod digest;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod install;
pub mod logging;
pub mod mirrors;

pub use error::FetchError;
pub use fetcher::Fetcher;
