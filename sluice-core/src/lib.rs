//! Sluice Core - Media acquisition and byte-range delivery
//!
//! This crate provides the building blocks for URL-to-browser media
//! streaming: range request parsing, bounded chunked file reads, the
//! acquisition engine abstraction, and the token registry that hands
//! acquired files over to the delivery layer.

pub mod config;
pub mod fetch;
pub mod mode;
pub mod range;
pub mod registry;
pub mod stream;

// Re-export main types for convenient access
pub use config::{Credentials, FetchConfig, HttpConfig, SluiceConfig};
pub use fetch::{
    AcquiredMedia, Acquirer, FetchError, FetchReport, MediaFetcher, SimulatedFetcher, YtDlpFetcher,
};
pub use mode::RuntimeMode;
pub use range::{ByteRange, ResolvedRange};
pub use registry::{DeliveryToken, MediaRegistry};
