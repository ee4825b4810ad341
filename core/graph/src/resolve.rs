//! Single item lookups.

use tracing::debug;

use cirrus_common::{DrivePath, Result};

use crate::client::GraphClient;
use crate::item::{decode_item, DriveItem};
use crate::paths;
use crate::transport::Transport;

impl<T: Transport> GraphClient<T> {
    /// Fetch an item by ID. `"root"` is the drive root.
    pub async fn get_item(&self, id: &str) -> Result<DriveItem> {
        self.fetch_item(&paths::id_path(id)).await
    }

    /// Fetch the child called `name` of the folder `parent_id`.
    pub async fn get_item_child(&self, parent_id: &str, name: &str) -> Result<DriveItem> {
        self.fetch_item(&paths::child_path(parent_id, name)).await
    }

    /// Fetch an item by path.
    pub async fn get_item_path(&self, path: &DrivePath) -> Result<DriveItem> {
        self.fetch_item(&paths::resource_path(path)).await
    }

    async fn fetch_item(&self, resource: &str) -> Result<DriveItem> {
        debug!(resource, "Fetching item");
        let body = self.transport.get(resource, &[]).await?;
        decode_item(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_common::Error;
    use serde_json::json;

    use crate::config::GraphConfig;
    use crate::memory::ScriptedTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn test_get_root_item() {
        let transport = ScriptedTransport::new().on_body(
            Method::Get,
            "/me/drive/root",
            r#"{"id":"root","name":"root","size":100}"#,
        );
        let client = GraphClient::new(transport, GraphConfig::default());

        let item = client.get_item("root").await.unwrap();

        assert_eq!(item.id, "root");
        assert_eq!(item.name, "root");
        assert_eq!(item.size, 100);
        assert!(item.kind.is_none());
    }

    #[tokio::test]
    async fn test_get_item_child_and_path() {
        let transport = ScriptedTransport::new()
            .on_json(
                Method::Get,
                "/me/drive/items/P1:/notes%20v2.md",
                json!({"id": "C1", "name": "notes v2.md", "size": 12, "file": {}}),
            )
            .on_json(
                Method::Get,
                "/me/drive/root:/Documents/notes%20v2.md",
                json!({"id": "C1", "name": "notes v2.md", "size": 12, "file": {}}),
            );
        let client = GraphClient::new(transport, GraphConfig::default());

        let by_child = client.get_item_child("P1", "notes v2.md").await.unwrap();
        let path = DrivePath::parse("/Documents/notes v2.md").unwrap();
        let by_path = client.get_item_path(&path).await.unwrap();

        assert_eq!(by_child, by_path);
        assert!(by_child.is_file());
    }

    #[tokio::test]
    async fn test_negative_folder_size_is_not_an_error() {
        let transport = ScriptedTransport::new().on_body(
            Method::Get,
            "/me/drive/items/B1",
            r#"{"id":"B1","name":"Team Site","size":-1,"folder":{}}"#,
        );
        let client = GraphClient::new(transport, GraphConfig::default());

        let item = client.get_item("B1").await.unwrap();
        assert_eq!(item.size, 0);
        assert!(item.is_dir());
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let transport = ScriptedTransport::new()
            .on_body(Method::Get, "/me/drive/items/bad", "{not json")
            .on(Method::Get, "/me/drive/items/down", |_| {
                Err(Error::Http {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            });
        let client = GraphClient::new(transport, GraphConfig::default());

        assert!(matches!(client.get_item("bad").await, Err(Error::Decode(_))));
        assert!(matches!(
            client.get_item("down").await,
            Err(Error::Http { status: 503, .. })
        ));
        assert!(matches!(
            client.get_item("missing").await,
            Err(Error::NotFound(_))
        ));
    }
}
