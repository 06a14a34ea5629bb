//! HTTP Range request parsing and byte math for media delivery
//!
//! Handles the `bytes=start-end` subset of RFC 7233 that browser video
//! players emit, and the validation that separates full (200), partial
//! (206), and unsatisfiable (416) responses.

use thiserror::Error;

/// Byte window as requested by the client, before validation.
///
/// `end` is `None` for open-ended requests (`bytes=100-`), which run to
/// the final byte of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-", self.start),
        }
    }
}

/// Requested window that no byte of the file can satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("range {requested} cannot be satisfied by a {total_size} byte file")]
pub struct UnsatisfiableRange {
    pub requested: ByteRange,
    pub total_size: u64,
}

/// Parses a Range header value into the requested byte window.
///
/// Accepts exactly the single-window `bytes=<start>-<end>` form, with an
/// optional end. Everything else (suffix ranges, multiple windows, other
/// units, garbage) returns `None`, which callers treat as a request for
/// the whole file rather than an error.
pub fn parse_range_header(value: &str) -> Option<ByteRange> {
    let window = value.trim().strip_prefix("bytes=")?;
    let (start, end) = window.split_once('-')?;

    let start = parse_decimal(start)?;
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_decimal(end)?)
    };

    Some(ByteRange { start, end })
}

/// Strict decimal parse: digits only, so signs and whitespace that
/// `u64::from_str` tolerates still count as malformed.
fn parse_decimal(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Validated byte window within a concrete file.
///
/// Holds `start <= end < total_size` by construction: the only way to
/// obtain one is [`ResolvedRange::resolve`], so any value of this type
/// is servable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    start: u64,
    end: u64,
    total_size: u64,
}

impl ResolvedRange {
    /// Validates a requested window against the actual file size.
    ///
    /// `requested = None` (no Range header, or one that did not parse)
    /// asks for the whole file. Open-ended windows run to the last byte.
    ///
    /// # Errors
    /// `UnsatisfiableRange` when the window starts past the end of the
    /// file, ends past it, is inverted, or targets an empty file. Empty
    /// files have no servable byte, so even a whole-file request fails.
    pub fn resolve(
        requested: Option<ByteRange>,
        total_size: u64,
    ) -> Result<Self, UnsatisfiableRange> {
        let requested = requested.unwrap_or(ByteRange {
            start: 0,
            end: None,
        });
        let unsatisfiable = UnsatisfiableRange {
            requested,
            total_size,
        };

        if total_size == 0 {
            return Err(unsatisfiable);
        }

        let end = requested.end.unwrap_or(total_size - 1);
        if requested.start > end || end >= total_size {
            return Err(unsatisfiable);
        }

        Ok(Self {
            start: requested.start,
            end,
            total_size,
        })
    }

    /// First byte offset served.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte offset served (inclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes the response body will carry.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Whether the window covers less than the whole file. This is the
    /// test that separates 206 responses from plain 200s.
    pub fn is_partial(&self) -> bool {
        self.start > 0 || self.end < self.total_size - 1
    }

    /// Content-Range header value for partial responses.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}
