//! # Pokshin Core
//!
//! The domain layer of the Pokshin archive.
//! Entities, ports, the post repository and draft store, and the composer
//! workflow. Nothing in this crate touches the network or the filesystem;
//! storage and the writing assistant are injected through the ports.

pub mod composer;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod ports;
pub mod store;

pub use composer::{Composer, ComposerView};
pub use error::{DomainError, StoreError};
pub use store::{DraftStore, PostRepository};
