//! Optimized collection types for Arbor.
//!
//! This module provides:
//! - Re-exports of optimized hash collections using AHash
//! - Insertion-ordered maps hashed with AHash

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, RandomState};

/// Insertion-ordered map using AHash.
///
/// Styles and key indices are observable in declaration order, so they use this
/// instead of [`HashMap`].
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;
