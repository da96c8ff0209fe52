use serde::{Deserialize, Serialize};

/// Identity fields taken verbatim from a manifest.
///
/// `id` is unvalidated and may be empty; see
/// [`derive_identifier`](crate::manifest::derive_identifier) for the checked form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl AddonInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Dir,
    Xpi,
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Dir => "dir",
            PackageKind::Xpi => "xpi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageKind::Dir => "Directory",
            PackageKind::Xpi => "XPI archive",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of inspecting a package location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtInfo {
    #[serde(rename = "type")]
    pub kind: PackageKind,
    #[serde(flatten)]
    pub info: AddonInfo,
}

impl ExtInfo {
    pub fn new(info: AddonInfo, kind: PackageKind) -> Self {
        Self { info, kind }
    }
}
