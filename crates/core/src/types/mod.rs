//! Core types for sitemap generation.
//!
//! This module provides the data model shared by the builders and the
//! storefront's data source implementation.

pub mod change_freq;
pub mod resource;

pub use change_freq::ChangeFrequency;
pub use resource::{PageCounts, ResourceItem, ResourceType};
