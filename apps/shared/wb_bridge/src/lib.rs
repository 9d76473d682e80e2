//! Editor bridge core
//!
//! Resolves dotted property paths against a live scene and applies field,
//! array and class edits inside undoable editor actions. The editor itself is
//! reached only through the traits in [`host`].

pub mod action;
pub mod array;
pub mod class;
pub mod dispatcher;
pub mod error;
mod handlers;
pub mod host;
pub mod locator;
pub mod memory;
pub mod path;
pub mod property;
pub mod transaction;

pub use action::Action;
pub use dispatcher::Dispatcher;
pub use error::{BridgeError, ErrorKind, Result};
pub use host::{
    ComponentHandle, ContainerRef, EditorHost, EntityHandle, LocalizationEditorApi, PathEntry, WorldEditorApi,
};
pub use memory::{MemoryEditor, SceneDocument, SceneError};
pub use path::{PropertyPath, ResolvedTarget};
pub use transaction::ActionTransaction;
