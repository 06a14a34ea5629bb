//! Bounded chunked file reads for HTTP delivery
//!
//! Serves a byte window of a file as a lazy chunk stream. Nothing is
//! read until the transport polls, and the file handle lives inside the
//! stream, so a disconnected client releases it by dropping the body.

use std::io::SeekFrom;
use std::path::PathBuf;

use bytes::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Upper bound on bytes read and yielded per chunk.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Opens `path` and returns a lazy stream over `length` bytes starting
/// at `offset`.
///
/// Chunks carry at most [`CHUNK_SIZE`] bytes. The stream stops exactly
/// once `length` bytes have been yielded, and ends early without error
/// if the file runs out first. A read error is yielded once and then
/// the stream ends.
///
/// # Errors
/// Fails only on open or seek. Read failures surface as stream items
/// because by then response headers are already on the wire.
pub async fn open_slice(
    path: PathBuf,
    offset: u64,
    length: u64,
) -> std::io::Result<impl Stream<Item = std::io::Result<Bytes>> + Send> {
    let mut file = File::open(&path).await?;
    file.seek(SeekFrom::Start(offset)).await?;

    Ok(futures::stream::unfold(
        (file, length),
        |(mut file, remaining)| async move {
            if remaining == 0 {
                return None;
            }

            let read_size = remaining.min(CHUNK_SIZE as u64) as usize;
            let mut buffer = vec![0u8; read_size];
            match file.read(&mut buffer).await {
                // File shorter than promised; end the stream quietly.
                Ok(0) => None,
                Ok(n) => {
                    buffer.truncate(n);
                    Some((Ok(Bytes::from(buffer)), (file, remaining - n as u64)))
                }
                Err(e) => Some((Err(e), (file, 0))),
            }
        },
    ))
}
