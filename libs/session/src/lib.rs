//! Legacy session decoder for the gateway
//!
//! Reads the PHP session the legacy application keeps in the shared cache and
//! turns it into a validated `SessionRecord`, or one of the `SessionError`
//! kinds when the request has no usable session.

pub mod decoder;
pub mod model;
pub mod php;

pub use decoder::{DEFAULT_KEY_PREFIX, SessionDecoder, decode_session};
pub use model::{MeasurementSystem, SessionRecord};
