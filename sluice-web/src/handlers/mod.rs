//! HTTP request handlers organized by functionality

pub mod fetch;
pub mod pages;
pub mod range;
pub mod stream;

// Re-export handler functions
pub use fetch::{FetchQuery, fetch_media};
pub use pages::{HomeQuery, home_page, player_page};
pub use range::{build_range_response, extract_range_header};
pub use stream::stream_media;
