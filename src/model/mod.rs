//! Core data types for extension identity.
//!
//! This module contains the values produced while inspecting a package:
//!
//! - [`AddonInfo`] - The raw identity triple read from a manifest
//! - [`ExtInfo`] - An [`AddonInfo`] tagged with the package shape it came from
//! - [`PackageKind`] - Unpacked directory or `.xpi` archive
//!
//! # Example
//!
//! ```
//! use xpipack::{AddonInfo, ExtInfo, PackageKind};
//!
//! let info = AddonInfo::new("", "myext", "1.0");
//! let ext = ExtInfo::new(info, PackageKind::Dir);
//!
//! assert_eq!(ext.kind.as_str(), "dir");
//! assert_eq!(ext.info.name, "myext");
//! ```

mod addon;

pub use addon::*;
