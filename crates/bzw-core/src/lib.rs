//! Core types for BZFlag world files: objects, property clauses, and values.
//!
//! This crate defines the document tree that the world-file parser produces.
//! It is independent of the parser: a [`Document`] can be built by hand,
//! serialized to JSON, or written back out as world-file text through its
//! `Display` implementation.

/// Error types used throughout the crate.
pub mod error;
/// World objects, object kinds, and the document that holds them.
pub mod object;
/// Property clauses and the typed values they carry.
pub mod property;
/// Canonical world-file text output.
pub mod writer;

/// Re-export error types.
pub use error::{BzwError, BzwResult};
/// Re-export object types.
pub use object::{Document, ObjectKind, WorldObject};
/// Re-export property types.
pub use property::{FlagSpec, Point, PropertyClause, Side, TeleporterSpec, Value};

/// Byte range into the source text a node was parsed from.
pub type Span = std::ops::Range<usize>;
