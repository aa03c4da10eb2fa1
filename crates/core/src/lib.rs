//! Álamo Core - Shared types library.
//!
//! This crate provides the types used by every Álamo component:
//! - `admin` - Server-rendered administration panel for the school website
//! - `cli` - Command-line client for the same operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, news posts, categories, images, notifications
//! - [`draft`] - The post being composed and its lifecycle
//! - [`markup`] - Tag insertion for the content editor

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod draft;
pub mod markup;
pub mod types;

pub use draft::{CancelOutcome, DISCARD_PROMPT, Draft, DraftError, DraftPhase, Submission};
pub use markup::{MarkupEdit, MarkupTag, Selection};
pub use types::*;
