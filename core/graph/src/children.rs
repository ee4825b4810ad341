//! Folder listings.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use cirrus_common::{DrivePath, Error, PartialError};

use crate::client::GraphClient;
use crate::item::{decode_item_value, DriveItem};
use crate::paths;
use crate::transport::Transport;

/// One page of a children listing.
#[derive(Debug, Deserialize)]
struct ChildrenPage {
    #[serde(rename = "value", default)]
    children: Vec<Value>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

impl<T: Transport> GraphClient<T> {
    /// Fetch all children of the folder `id`, in server order.
    ///
    /// If a page fails, the children gathered from earlier pages are
    /// returned with the error.
    pub async fn get_item_children(
        &self,
        id: &str,
    ) -> Result<Vec<DriveItem>, PartialError<Vec<DriveItem>>> {
        self.fetch_children(paths::children_path_id(id)).await
    }

    /// Fetch all children of the folder at `path`, in server order.
    pub async fn get_item_children_path(
        &self,
        path: &DrivePath,
    ) -> Result<Vec<DriveItem>, PartialError<Vec<DriveItem>>> {
        self.fetch_children(paths::children_path(path)).await
    }

    async fn fetch_children(
        &self,
        start: String,
    ) -> Result<Vec<DriveItem>, PartialError<Vec<DriveItem>>> {
        let mut fetched = Vec::new();
        let mut poll = Some(start);
        let mut page = 0u32;

        while let Some(locator) = poll.take() {
            page += 1;
            debug!(locator = %locator, page, "Fetching page of children");

            let body = match self.transport.get(&locator, &[]).await {
                Ok(body) => body,
                Err(e) => {
                    error!(locator = %locator, page, error = %e, "Error fetching children page");
                    return Err(PartialError::new(fetched, e));
                }
            };

            let result: ChildrenPage = match serde_json::from_slice(&body) {
                Ok(result) => result,
                Err(e) => {
                    error!(locator = %locator, page, error = %e, "Error parsing children page");
                    let e = Error::Decode(format!("Failed to parse children page: {}", e));
                    return Err(PartialError::new(fetched, e));
                }
            };

            debug!(
                page,
                children = result.children.len(),
                next_link = result.next_link.as_deref().unwrap_or(""),
                "Processing children page"
            );
            let children = match result
                .children
                .into_iter()
                .map(decode_item_value)
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(children) => children,
                Err(e) => {
                    error!(locator = %locator, page, error = %e, "Error parsing child item");
                    return Err(PartialError::new(fetched, e));
                }
            };
            fetched.extend(children);
            poll = result
                .next_link
                .filter(|link| !link.is_empty())
                .map(|link| self.relative_locator(link));
        }

        debug!(total = fetched.len(), pages = page, "Fetched all children");
        Ok(fetched)
    }

    /// Strip the API base URL from a continuation link so it can be read
    /// like any other relative path.
    fn relative_locator(&self, link: String) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match link.strip_prefix(base) {
            Some(rest) => rest.to_string(),
            None => link,
        }
    }
}
