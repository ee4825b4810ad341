//! Drive item client.

use std::sync::Arc;

use crate::config::GraphConfig;
use crate::retry::{Sleeper, TokioSleeper};
use crate::transport::Transport;

/// Typed access to drive items over a [`Transport`].
///
/// The client holds no per-call state: every operation is a self-contained
/// exchange with the server, so one client can serve concurrent callers.
/// Operations are grouped by concern:
/// - resolving single items (`get_item*`)
/// - reading content (`get_item_content*`)
/// - listing folders (`get_item_children*`)
/// - changing the tree (`create_folder`, `rename`, `remove`)
pub struct GraphClient<T> {
    pub(crate) transport: T,
    pub(crate) config: GraphConfig,
    pub(crate) sleeper: Arc<dyn Sleeper>,
}

impl<T: Transport> GraphClient<T> {
    /// Create a client that waits between retries on the tokio timer.
    pub fn new(transport: T, config: GraphConfig) -> Self {
        Self {
            transport,
            config,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace how the client waits between rename attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
