//! File content downloads.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use cirrus_common::{Error, PartialError};

use crate::client::GraphClient;
use crate::paths;
use crate::transport::{Header, Transport};

impl<T: Transport> GraphClient<T> {
    /// Download an item's content into memory.
    ///
    /// On failure the bytes received so far are returned with the error.
    pub async fn get_item_content(&self, id: &str) -> Result<Vec<u8>, PartialError<Vec<u8>>> {
        let mut buf = Vec::new();
        match self.get_item_content_stream(id, &mut buf).await {
            Ok(_) => Ok(buf),
            Err(partial) => Err(PartialError::new(buf, partial.error)),
        }
    }

    /// Download an item's content into `output` and return the number of
    /// bytes written.
    ///
    /// Items up to the configured chunk size are fetched with one request.
    /// Larger items are fetched in consecutive byte ranges of that size, each
    /// written before the next is requested. `output` must be empty: it is
    /// never truncated or rewound. The first failed request or write stops
    /// the download and the error is returned with the bytes written so far.
    pub async fn get_item_content_stream<W>(
        &self,
        id: &str,
        output: &mut W,
    ) -> Result<u64, PartialError<u64>>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let chunk_size = self.config.chunk_size;
        if chunk_size == 0 {
            return Err(PartialError::new(
                0,
                Error::InvalidInput("Chunk size must be greater than zero".to_string()),
            ));
        }

        let item = self
            .get_item(id)
            .await
            .map_err(|e| PartialError::new(0, e))?;

        let content = paths::content_path(id);

        if item.size <= chunk_size {
            debug!(id = %item.id, size = item.size, "Downloading in one request");
            let body = self
                .transport
                .get(&content, &[])
                .await
                .map_err(|e| PartialError::new(0, e))?;
            output
                .write_all(&body)
                .await
                .map_err(|e| PartialError::new(0, e.into()))?;
            output
                .flush()
                .await
                .map_err(|e| PartialError::new(body.len() as u64, e.into()))?;
            return Ok(body.len() as u64);
        }

        let chunks = item.size.div_ceil(chunk_size);
        let mut written = 0u64;
        for i in 0..chunks {
            // The last range may run past the end; the server clamps it.
            let start = i * chunk_size;
            let end = start + chunk_size - 1;
            info!(
                id = %item.id,
                name = %item.name,
                "Downloading bytes {}-{}/{}",
                start,
                end,
                item.size
            );

            let body = match self.transport.get(&content, &[Header::range(start, end)]).await {
                Ok(body) => body,
                Err(e) => return Err(PartialError::new(written, e)),
            };
            if let Err(e) = output.write_all(&body).await {
                return Err(PartialError::new(written, e.into()));
            }
            written += body.len() as u64;
        }

        output
            .flush()
            .await
            .map_err(|e| PartialError::new(written, e.into()))?;
        info!(id = %item.id, name = %item.name, size = written, "Download completed");
        Ok(written)
    }
}
