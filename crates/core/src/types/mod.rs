//! Core types for the Álamo admin panel.
//!
//! This module provides the domain types shared by the panel and the CLI.

pub mod id;
pub mod image;
pub mod news;
pub mod notification;

pub use id::*;
pub use image::{ImageError, ImageUpload};
pub use news::{Category, DEFAULT_CATEGORY_LABEL, Post};
pub use notification::{Notification, NotificationLevel};
