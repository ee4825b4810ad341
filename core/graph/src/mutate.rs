//! Tree mutations: create folder, rename/move, delete.

use serde::Serialize;
use tracing::{debug, instrument};

use cirrus_common::{Error, Result};

use crate::client::GraphClient;
use crate::item::{DriveItem, ParentReference};
use crate::paths;
use crate::retry::RetryExecutor;
use crate::transport::Transport;

/// Body of a rename/move request.
#[derive(Debug, Serialize)]
struct ItemPatch<'a> {
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    conflict_behavior: &'static str,
    name: &'a str,
    #[serde(rename = "parentReference")]
    parent: ParentReference,
}

impl<T: Transport> GraphClient<T> {
    /// Create an empty folder called `name` inside `parent_id`.
    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<DriveItem> {
        const OP: &str = "create folder";

        let payload = serde_json::to_vec(&DriveItem::new_folder(name))
            .map_err(|e| Error::mutation(OP, e.into()))?;
        let body = self
            .transport
            .post(&paths::children_path_id(parent_id), payload)
            .await
            .map_err(|e| Error::mutation(OP, e))?;

        serde_json::from_slice(&body).map_err(|e| Error::mutation(OP, e.into()))
    }

    /// Rename and/or move an item. `new_name` and `new_parent_id` describe
    /// where the item should end up; an existing item there is replaced.
    ///
    /// A failed attempt is retried once after the configured delay. If the
    /// retry fails too, its error is returned.
    #[instrument(skip(self))]
    pub async fn rename(&self, item_id: &str, new_name: &str, new_parent_id: &str) -> Result<()> {
        const OP: &str = "rename";

        let patch = serde_json::to_vec(&ItemPatch {
            conflict_behavior: "replace",
            name: new_name,
            parent: ParentReference::with_id(new_parent_id),
        })
        .map_err(|e| Error::mutation(OP, e.into()))?;
        let resource = paths::id_path(item_id);

        RetryExecutor::new(&self.config.retry, self.sleeper.as_ref())
            .execute(|attempt| {
                let resource = resource.as_str();
                let patch = patch.clone();
                async move {
                    debug!(attempt, "Sending rename patch");
                    self.transport.patch(resource, patch).await.map(|_| ())
                }
            })
            .await
            .map_err(|e| Error::mutation(OP, e))
    }

    /// Delete an item. Folders are deleted with their contents.
    pub async fn remove(&self, item_id: &str) -> Result<()> {
        self.transport
            .delete(&paths::id_path(item_id))
            .await
            .map_err(|e| Error::mutation("delete", e))
    }
}
