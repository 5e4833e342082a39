//! Artwork catalog records
//!
//! `validate_artwork` turns an untrusted catalog payload into an
//! [`ArtworkRecord`]; [`ArtworkClient`] fetches the payload from the content
//! API and validates it.
//!
//! ```rust,no_run
//! use artwork::{ArtworkClient, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ArtworkClient::new(UpstreamConfig::default());
//!     let record = client.fetch_artwork("3353900").await?;
//!     println!("{} has {} products", record.title, record.products.len());
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod upstream;
pub mod validation;
pub mod vocabulary;

pub use model::{ArtworkRecord, FramingOption, OriginalDetails, ProductVariant};
pub use upstream::{ArtworkClient, UpstreamConfig, UpstreamStatus, classify_status};
pub use validation::validate_artwork;
