//! Manifest parsing and identifier resolution.
//!
//! Only three fields of `manifest.json` are read:
//!
//! ```json
//! {
//!   "browser_specific_settings": { "gecko": { "id": "addon@example.com" } },
//!   "name": "My Addon",
//!   "version": "1.0"
//! }
//! ```
//!
//! `applications.gecko.id` is consulted when the `browser_specific_settings`
//! id is absent or empty.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifier::is_valid_identifier;
use crate::model::AddonInfo;

/// File name of the manifest inside a package.
pub const MANIFEST_FILE: &str = "manifest.json";

const GECKO_ID_POINTERS: [&str; 2] = [
    "/browser_specific_settings/gecko/id",
    "/applications/gecko/id",
];

/// Non-empty string at `pointer`; anything else counts as absent.
fn string_at<'a>(manifest: &'a Value, pointer: &str) -> Option<&'a str> {
    manifest
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Parses manifest text into the raw identity triple.
///
/// The id is returned as found; it is not validated here. Fields that are
/// missing or not strings come back empty.
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) if the text is not valid JSON.
pub fn resolve_identity(manifest: &str) -> Result<AddonInfo> {
    // Some editors prepend a byte order mark, which serde_json rejects
    let manifest = manifest.strip_prefix('\u{feff}').unwrap_or(manifest);
    let parsed: Value = serde_json::from_str(manifest)?;

    let id = GECKO_ID_POINTERS
        .iter()
        .find_map(|pointer| string_at(&parsed, pointer))
        .unwrap_or_default();

    Ok(AddonInfo::new(
        id,
        string_at(&parsed, "/name").unwrap_or_default(),
        string_at(&parsed, "/version").unwrap_or_default(),
    ))
}

/// Returns the identifier a package should be published under.
///
/// An explicit id wins and must be valid on its own; the name-derived
/// `@<name>` form is only tried when the manifest carries no id at all.
///
/// # Example
///
/// ```
/// use xpipack::{manifest::derive_identifier, AddonInfo};
///
/// let info = AddonInfo::new("", "myext", "1");
/// assert_eq!(derive_identifier(&info).as_deref(), Some("@myext"));
///
/// let info = AddonInfo::new("not-an-id", "foo", "1");
/// assert_eq!(derive_identifier(&info), None);
/// ```
pub fn derive_identifier(info: &AddonInfo) -> Option<String> {
    if !info.id.is_empty() {
        return is_valid_identifier(&info.id).then(|| info.id.clone());
    }

    if !info.name.is_empty() {
        let candidate = format!("@{}", info.name);
        debug!(candidate = %candidate, "no explicit id, using name-derived identifier");
        return is_valid_identifier(&candidate).then_some(candidate);
    }

    None
}
