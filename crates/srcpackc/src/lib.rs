#![forbid(unsafe_code)]

pub mod archive;
pub mod build;
pub mod cli;
pub mod manifest;
pub mod metadata;
pub mod packages;
pub mod scripts;

pub use cli::BuildArgs;
pub use metadata::{MetadataError, ProjectMeta};
