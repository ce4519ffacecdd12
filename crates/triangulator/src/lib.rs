//! Point-set triangulation core and service layer.
//!
//! Purpose
//! - `wire`: byte-exact binary codec for point sets and triangulations.
//! - `hull`: convex hull (Andrew's monotone chain) plus fan triangulation.
//! - `input`: one-time validation of untyped JSON into typed values.
//! - `service`: id validation, the upstream store trait, and the
//!   decode → triangulate → encode request pipeline with response mapping.
//!
//! The wire contract is fixed (little-endian f32 coordinates, little-endian
//! u32 counts and indices, no version tag); see `wire` for the exact layouts.
//! All operations are pure and synchronous; the crate holds no global state.

pub mod hull;
pub mod input;
pub mod service;
pub mod types;
pub mod wire;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::hull::{triangulate, TriangulateError};
    pub use crate::service::{
        PointSetId, PointSetStore, ServiceError, StoreError, Triangulator,
    };
    pub use crate::types::{Point, Triangle};
    pub use crate::wire::{
        decode_pointset, decode_triangulation, encode_pointset, encode_triangulation,
    };
}
