//! Strongly-typed domain types for safer APIs.
//!
//! - [`GeoBounds`]: a longitude/latitude envelope with clear semantics per edge
//! - [`ParticleId`], [`SnapshotIndex`]: index newtypes that cannot be mixed up
//!
//! # Example
//!
//! ```
//! use ptrack_rs::types::{GeoBounds, ParticleId};
//!
//! let bounds = GeoBounds::new(-124.0, -122.0, 47.0, 49.0);
//! assert!(bounds.contains(-123.0, 48.0));
//!
//! let id = ParticleId::new(7);
//! assert_eq!(id.get(), 7);
//! ```

mod bounds;
mod indices;

pub use bounds::GeoBounds;
pub use indices::{ParticleId, SnapshotIndex};
