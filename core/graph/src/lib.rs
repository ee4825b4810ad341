//! Remote drive item layer for Cirrus.
//!
//! This crate turns the Microsoft Graph drive item API into typed
//! operations: resolving items, listing folders, downloading content and
//! changing the remote tree.
//!
//! # Design Principles
//! - Transport isolation: all network access goes through the [`Transport`]
//!   trait, so the same client runs against reqwest or a scripted transport
//! - No hidden state: each operation is a self-contained request sequence
//! - Partial results: paginated listings and chunked downloads return what
//!   they fetched together with the error that stopped them

pub mod children;
pub mod client;
pub mod config;
pub mod content;
pub mod http;
pub mod item;
pub mod memory;
pub mod mutate;
pub mod paths;
pub mod resolve;
pub mod retry;
pub mod transport;

pub use client::GraphClient;
pub use config::{GraphConfig, DEFAULT_BASE_URL, DEFAULT_CHUNK_SIZE};
pub use http::{HttpTransport, StaticToken, TokenSource};
pub use item::{
    decode_item, decode_item_value, DeletedFacet, DriveItem, FileFacet, FolderFacet, Hashes, ItemKind,
    ParentReference,
};
pub use memory::{RecordedRequest, ScriptedTransport};
pub use retry::{RetryConfig, RetryExecutor, Sleeper, TokioSleeper};
pub use transport::{Header, Method, Transport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _config = GraphConfig::default();
        let _retry = RetryConfig::default();
        let _client = GraphClient::new(ScriptedTransport::new(), GraphConfig::default());
        assert_eq!(paths::id_path(paths::ROOT_ID), "/me/drive/root");
    }
}
