//! Drive item metadata and its JSON representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use cirrus_common::{Error, Result};

/// Folder facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of direct children, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,
}

/// Content hashes reported for a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashes {
    #[serde(rename = "sha1Hash", default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(rename = "sha256Hash", default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(rename = "quickXorHash", default, skip_serializing_if = "Option::is_none")]
    pub quick_xor: Option<String>,
}

/// File facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Hashes>,
}

/// Deletion facet, present on tombstones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// What kind of entry an item is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Folder(FolderFacet),
    File(FileFacet),
    Deleted(DeletedFacet),
}

/// Reference from an item to its parent folder.
///
/// Only identifies the parent; it does not own or embed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    /// Parent item ID.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Server-side path of the parent, e.g. `/drive/root:/Documents`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    /// "personal", "business" or "documentLibrary".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
}

impl ParentReference {
    /// Reference a parent by ID only.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A remote filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireItem", into = "WireItem")]
pub struct DriveItem {
    /// Item ID, stable across renames and moves.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Size in bytes. Folders report the total size of their contents.
    pub size: u64,
    /// Folder, file or tombstone. `None` when the server sent no facet.
    pub kind: Option<ItemKind>,
    /// Parent folder, absent for the drive root.
    pub parent: Option<ParentReference>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
    /// Entity tag.
    pub etag: Option<String>,
}

impl DriveItem {
    /// Descriptor for a new, empty folder.
    pub fn new_folder(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            size: 0,
            kind: Some(ItemKind::Folder(FolderFacet::default())),
            parent: None,
            modified: None,
            etag: None,
        }
    }

    /// Check if this is a folder.
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, Some(ItemKind::Folder(_)))
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self.kind, Some(ItemKind::File(_)))
    }

    /// Check if this is a deletion marker.
    pub fn is_deleted(&self) -> bool {
        matches!(self.kind, Some(ItemKind::Deleted(_)))
    }

    /// Content hashes, for files that have them.
    pub fn hashes(&self) -> Option<&Hashes> {
        match &self.kind {
            Some(ItemKind::File(file)) => file.hashes.as_ref(),
            _ => None,
        }
    }

    /// ID of the parent folder.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent
            .as_ref()
            .map(|p| p.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Item as it appears on the wire, with one optional field per facet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    folder: Option<FolderFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<FileFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted: Option<DeletedFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_reference: Option<ParentReference>,
    #[serde(
        rename = "lastModifiedDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    modified: Option<DateTime<Utc>>,
    #[serde(rename = "eTag", default, skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
}

fn is_zero(size: &u64) -> bool {
    *size == 0
}

impl From<WireItem> for DriveItem {
    fn from(wire: WireItem) -> Self {
        // Tombstones keep the facet of what was deleted, so deletion wins.
        let kind = match (wire.deleted, wire.folder, wire.file) {
            (Some(deleted), _, _) => Some(ItemKind::Deleted(deleted)),
            (None, Some(folder), file) => {
                if file.is_some() {
                    debug!(id = %wire.id, "Item has both folder and file facets, treating as folder");
                }
                Some(ItemKind::Folder(folder))
            }
            (None, None, Some(file)) => Some(ItemKind::File(file)),
            (None, None, None) => None,
        };

        Self {
            id: wire.id,
            name: wire.name,
            size: wire.size,
            kind,
            parent: wire.parent_reference,
            modified: wire.modified,
            etag: wire.etag,
        }
    }
}

impl From<DriveItem> for WireItem {
    fn from(item: DriveItem) -> Self {
        let mut wire = WireItem {
            id: item.id,
            name: item.name,
            size: item.size,
            parent_reference: item.parent,
            modified: item.modified,
            etag: item.etag,
            ..Default::default()
        };
        match item.kind {
            Some(ItemKind::Folder(folder)) => wire.folder = Some(folder),
            Some(ItemKind::File(file)) => wire.file = Some(file),
            Some(ItemKind::Deleted(deleted)) => wire.deleted = Some(deleted),
            None => {}
        }
        wire
    }
}

/// Decode an item body.
///
/// OneDrive for Business sometimes reports a negative size for folders,
/// which does not fit the unsigned size field. When the strict decode fails
/// and the body's `size` is negative, the size is replaced with 0 and the
/// body is decoded again. Every other malformed body is a decode error.
pub fn decode_item(body: &[u8]) -> Result<DriveItem> {
    let strict_err = match serde_json::from_slice::<DriveItem>(body) {
        Ok(item) => return Ok(item),
        Err(e) => e,
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => decode_lenient(value, strict_err),
        Err(_) => Err(decode_error(strict_err)),
    }
}

/// Decode an item that is already parsed, e.g. one entry of a listing.
/// Negative sizes are handled as in [`decode_item`].
pub fn decode_item_value(value: Value) -> Result<DriveItem> {
    match DriveItem::deserialize(&value) {
        Ok(item) => Ok(item),
        Err(strict_err) => decode_lenient(value, strict_err),
    }
}

fn decode_lenient(mut value: Value, strict_err: serde_json::Error) -> Result<DriveItem> {
    if !has_negative_size(&value) {
        return Err(decode_error(strict_err));
    }

    value["size"] = Value::from(0u64);
    let item = DriveItem::deserialize(&value).map_err(|_| decode_error(strict_err))?;
    debug!(id = %item.id, name = %item.name, "Replaced negative item size with 0");
    Ok(item)
}

fn has_negative_size(value: &Value) -> bool {
    value
        .get("size")
        .and_then(Value::as_f64)
        .is_some_and(|size| size < 0.0)
}

fn decode_error(err: serde_json::Error) -> Error {
    Error::Decode(format!("Failed to parse item: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_item() {
        let item = decode_item(br#"{"id":"root","name":"root","size":100}"#).unwrap();

        assert_eq!(item.id, "root");
        assert_eq!(item.name, "root");
        assert_eq!(item.size, 100);
        assert!(item.kind.is_none());
        assert!(!item.is_dir());
        assert!(!item.is_file());
        assert!(!item.is_deleted());
        assert!(item.parent.is_none());
    }

    #[test]
    fn test_negative_size_becomes_zero() {
        let body = br#"{"id":"01ABC","name":"Shared","size":-12345,"folder":{"childCount":4}}"#;
        let item = decode_item(body).unwrap();

        assert_eq!(item.size, 0);
        assert_eq!(item.name, "Shared");
        assert_eq!(
            item.kind,
            Some(ItemKind::Folder(FolderFacet {
                child_count: Some(4)
            }))
        );
    }

    #[test]
    fn test_other_decode_failures_propagate() {
        assert!(matches!(
            decode_item(br#"{"id":"x","size":"big"}"#),
            Err(Error::Decode(_))
        ));
        assert!(matches!(decode_item(b"<html>"), Err(Error::Decode(_))));
        // A negative size does not rescue an otherwise broken body.
        assert!(matches!(
            decode_item(br#"{"id":7,"size":-1}"#),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_decode_value_negative_size() {
        let value = serde_json::json!({"id": "L1", "name": "Library", "size": -3, "folder": {}});
        let item = decode_item_value(value).unwrap();
        assert_eq!(item.size, 0);
        assert!(item.is_dir());

        let value = serde_json::json!({"id": "L2", "size": "huge"});
        assert!(matches!(decode_item_value(value), Err(Error::Decode(_))));
    }

    #[test]
    fn test_file_with_hashes_and_parent() {
        let body = br#"{
            "id": "F1",
            "name": "report.pdf",
            "size": 2048,
            "eTag": "\"{F1},3\"",
            "lastModifiedDateTime": "2024-05-01T10:20:30Z",
            "file": {
                "mimeType": "application/pdf",
                "hashes": {"quickXorHash": "qx==", "sha1Hash": "ABCD"}
            },
            "parentReference": {"id": "P1", "driveType": "personal", "path": "/drive/root:/Docs"}
        }"#;
        let item = decode_item(body).unwrap();

        assert!(item.is_file());
        assert_eq!(item.parent_id(), Some("P1"));
        let hashes = item.hashes().unwrap();
        assert_eq!(hashes.quick_xor.as_deref(), Some("qx=="));
        assert_eq!(hashes.sha1.as_deref(), Some("ABCD"));
        assert!(hashes.sha256.is_none());
        assert!(item.modified.is_some());
    }

    #[test]
    fn test_multiple_facets_are_normalized() {
        let item = decode_item(br#"{"id":"a","deleted":{"state":"deleted"},"file":{}}"#).unwrap();
        assert!(item.is_deleted());

        let item = decode_item(br#"{"id":"b","folder":{},"file":{}}"#).unwrap();
        assert!(item.is_dir());
    }

    #[test]
    fn test_new_folder_payload() {
        let json = serde_json::to_value(DriveItem::new_folder("Projects")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Projects", "folder": {}}));
    }
}
