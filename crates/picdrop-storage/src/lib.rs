//! Picdrop Storage Library
//!
//! This crate provides the storage abstraction for uploaded images and its
//! local filesystem implementation.
//!
//! # Stored name format
//!
//! Every stored file lives directly in the storage root as `{hex}{.ext}`: a random
//! lowercase hex identifier followed by the extension of the client's filename.
//! Files are written under a temporary dot-prefixed name and only become visible
//! under their final name once fully written. Dot-prefixed names are never served.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{NameGenerator, RandomHexNames};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
