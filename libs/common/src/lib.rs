//! Common library for the session and artwork gateway
//!
//! This crate provides what the session decoder, the artwork adapter and the
//! gateway service share: the error vocabulary, the field-path validation
//! toolkit, and the legacy session cache clients.
//!
//! ```rust,no_run
//! use common::cache::{self, CacheConfig, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = cache::connect(&CacheConfig::from_env()?).await?;
//!     let blob = store.get("memc.sess.saatchi_legacy.abc").await?;
//!     println!("cache hit: {}", blob.is_some());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod memcached;
pub mod validation;

pub use error::{ArtworkError, ArtworkResult, SessionError, SessionResult};
pub use validation::{Checker, Violation, Violations, Vocabulary};
