//! The rendered poster artifact and its streaming lifecycle.
//!
//! PNG bytes live in a uniquely named temp file from capture until the
//! response stream finishes. The `TempPath` guard rides inside the stream
//! state, so deletion happens exactly once, when the stream is dropped
//! after delivering (or abandoning) the last chunk. Deletion failures are
//! ignored by the guard itself.

use std::path::Path;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use futures::stream::Stream;
use tempfile::TempPath;
use tokio::io::AsyncReadExt;

use crate::{Error, Result};

const STREAM_CHUNK_BYTES: usize = 64 * 1024;

/// A rendered PNG poster backed by a temporary file
pub struct PosterArtifact {
    path: TempPath,
}

impl PosterArtifact {
    /// Persist PNG bytes to a fresh, uniquely named temp file
    pub async fn from_png_bytes(png: &[u8]) -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("poster-")
            .suffix(".png")
            .tempfile()?
            .into_temp_path();

        tokio::fs::write(&path, png).await?;

        Ok(Self { path })
    }

    /// Location of the backing temp file (valid until the artifact is
    /// consumed or dropped)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the artifact into a chunked byte stream. The temp file is
    /// deleted when the stream is dropped.
    pub async fn into_byte_stream(
        self,
    ) -> Result<impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static> {
        let file = tokio::fs::File::open(&self.path).await?;

        Ok(futures::stream::try_unfold(
            (file, self.path),
            |(mut file, guard)| async move {
                let mut buf = vec![0u8; STREAM_CHUNK_BYTES];
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    Ok(None)
                } else {
                    buf.truncate(n);
                    Ok(Some((buf, (file, guard))))
                }
            },
        ))
    }

    /// Consume the artifact into a `200 image/png` streaming response
    pub async fn into_png_response(self) -> Result<Response> {
        let stream = self.into_byte_stream().await?;

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from_stream(stream))
            .map_err(|e| Error::Render(format!("Failed to build response: {}", e)))
    }
}
