//! Application state shared across handlers

use std::sync::Arc;

use artwork::ArtworkClient;
use session::SessionDecoder;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionDecoder,
    pub artworks: ArtworkClient,
    /// Name of the cookie carrying the legacy session id
    pub cookie_name: Arc<str>,
}
