pub mod archive;
pub mod builder;
pub mod config;
pub mod error;
pub mod identifier;
pub mod inspector;
pub mod manifest;
pub mod model;
pub mod output;

pub use builder::{build_package, PackageBuilder};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use inspector::inspect;
pub use model::{AddonInfo, ExtInfo, PackageKind};
