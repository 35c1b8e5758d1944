#![forbid(unsafe_code)]

pub mod manifest;
pub mod reader;

pub use manifest::{DistManifest, FileEntry, MANIFEST_NAME};
pub use reader::*;
