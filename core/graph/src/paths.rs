//! Resource locators for drive items, relative to the API base URL.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use cirrus_common::DrivePath;

/// Characters left as-is inside a path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const ROOT: &str = "/me/drive/root";
const ITEMS: &str = "/me/drive/items";

/// ID of the drive root as accepted by [`id_path`].
pub const ROOT_ID: &str = "root";

fn escape(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

fn escape_path(path: &DrivePath) -> String {
    path.components()
        .iter()
        .map(|c| format!("/{}", escape(c)))
        .collect()
}

/// Locator of an item by ID. `"root"` addresses the drive root.
pub fn id_path(id: &str) -> String {
    if id == ROOT_ID {
        ROOT.to_string()
    } else {
        format!("{}/{}", ITEMS, escape(id))
    }
}

/// Locator of the child called `name` inside the folder `parent_id`.
pub fn child_path(parent_id: &str, name: &str) -> String {
    format!("{}:/{}", id_path(parent_id), escape(name))
}

/// Locator of an item by path.
pub fn resource_path(path: &DrivePath) -> String {
    if path.is_root() {
        ROOT.to_string()
    } else {
        format!("{}:{}", ROOT, escape_path(path))
    }
}

/// Children collection of a folder by ID.
pub fn children_path_id(id: &str) -> String {
    format!("{}/children", id_path(id))
}

/// Children collection of a folder by path.
pub fn children_path(path: &DrivePath) -> String {
    if path.is_root() {
        format!("{}/children", ROOT)
    } else {
        format!("{}:/children", resource_path(path))
    }
}

/// Content endpoint of a file.
pub fn content_path(id: &str) -> String {
    format!("{}/content", id_path(id))
}
