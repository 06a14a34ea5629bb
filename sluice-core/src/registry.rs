//! Opaque delivery tokens for acquired media
//!
//! Every acquisition is registered here and handed back to the client
//! as a random token. The token carries no information about the file
//! behind it; resolving it is the only way from a URL back to a path,
//! so clients cannot mint tokens for files that were never acquired.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::fetch::AcquiredMedia;

/// Random handle identifying one registered acquisition.
///
/// 16 random bytes, rendered as 32 lowercase hex characters so it can
/// ride in a URL path segment without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryToken(String);

impl DeliveryToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Returns the token as its URL-safe hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory map from delivery tokens to acquired media.
///
/// Clones share the same underlying map, so one registry can be handed
/// to every request handler. Entries live for the process lifetime,
/// like the scratch files they point at.
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    entries: Arc<RwLock<HashMap<String, AcquiredMedia>>>,
}

impl MediaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers acquired media and returns the token that resolves to it.
    pub async fn register(&self, media: AcquiredMedia) -> DeliveryToken {
        let token = DeliveryToken::generate();

        debug!(
            "registered {} for delivery as {}",
            media.path.display(),
            token
        );

        let mut entries = self.entries.write().await;
        entries.insert(token.as_str().to_string(), media);
        token
    }

    /// Looks up the media behind a token taken from a request path.
    ///
    /// Returns `None` for tokens this process never issued.
    pub async fn resolve(&self, token: &str) -> Option<AcquiredMedia> {
        let entries = self.entries.read().await;
        entries.get(token).cloned()
    }
}
