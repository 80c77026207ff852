//! MediaStore adapter.
//!
//! Resolves a media variant and file name to the place where the bytes live,
//! and answers whether the resource is present before the server points a
//! client at it.
//!
//! # Backends
//!
//! ```text
//!            StorageLocator("original", "a1b2.jpg")
//!                         │
//!          ┌──────────────┴──────────────┐
//!          ▼                             ▼
//! ┌──────────────────┐        ┌──────────────────────┐
//! │  FileStore::Local │        │  FileStore::Remote   │
//! │  <base>/original/ │        │  <url>/original/     │
//! │  a1b2.jpg         │        │  a1b2.jpg            │
//! │  pre-flight check │        │  assumed reachable   │
//! └──────────────────┘        └──────────────────────┘
//! ```
//!
//! Only the local backend can check existence. A remote object is assumed
//! to be reachable and any failure is left to the redirect target.

mod file_store;
mod locator;

pub use file_store::{FileStore, ResolvedLocation, StoreKind};
pub use locator::{StorageLocator, ORIGINAL_PREFIX};
