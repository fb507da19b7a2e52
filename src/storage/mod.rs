//! Storage module: everything the pull does to the local filesystem.
//!
//! - [`path`] - directory token resolution, sandboxing and creation
//! - [`filename`] - exclusive, collision-free filename allocation
//! - [`verify`] - existence, readability and size checks after the fetch

pub mod filename;
pub mod path;
pub mod verify;

pub use filename::allocate;
pub use path::{existing_destinations, DestinationChoice, PathResolver, ResolvedDestination};
pub use verify::verify_download;
