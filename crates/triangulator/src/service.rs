//! Request orchestration: id validation, upstream store access, and the
//! decode → triangulate → encode pipeline.
//!
//! Purpose
//! - Keep the transport out of the core: the upstream is a [`PointSetStore`]
//!   trait object decided at startup, and responses are described as a
//!   status code plus a JSON envelope instead of any framework type.
//! - One explicit context ([`Triangulator`]) constructed at startup and
//!   passed to callers; no module-level singletons.
//!
//! Failure policy
//! - Every failure maps to a distinct `(status, code)` pair; malformed data
//!   is never conflated with an unreachable upstream. Nothing is retried
//!   here; timeouts belong to the transport implementation.

use serde::Serialize;
use thiserror::Error;

use crate::hull::{self, TriangulateError};
use crate::wire::{self, DecodeError, EncodeError};

/// A validated point-set identifier (RFC 4122 textual shape).
///
/// Stored lowercase so equal ids compare equal regardless of input casing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointSetId(String);

/// The identifier does not have the UUID shape. Rejected before any store
/// access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid point-set id (expected a UUID)")]
pub struct InvalidPointSetId(pub String);

impl PointSetId {
    pub fn parse(raw: &str) -> Result<Self, InvalidPointSetId> {
        if is_uuid(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidPointSetId(raw.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PointSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 8-4-4-4-12 hex groups. Version and variant bits are not inspected; the
/// upstream owns the id space.
fn is_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &b)| match i {
        8 | 13 | 18 | 23 => b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

/// Upstream store failures, one kind per upstream status class consumed by
/// this boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("point set does not exist upstream")]
    NotFound,
    #[error("upstream rejected the request")]
    BadRequest,
    #[error("upstream store unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected upstream status {0}")]
    UnexpectedStatus(u16),
}

impl StoreError {
    /// Map an upstream HTTP status to a store failure; `200` means success
    /// (`None`). Transport implementations funnel their responses through
    /// this so the mapping lives in exactly one place.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200 => None,
            404 => Some(Self::NotFound),
            400 => Some(Self::BadRequest),
            s if s >= 500 => Some(Self::Unavailable(format!("upstream returned {s}"))),
            s => Some(Self::UnexpectedStatus(s)),
        }
    }
}

/// Fetches raw PointSet bytes by id. Implemented over HTTP in deployments
/// (`<base-url>/pointset/<id>`, short timeout); over a directory or a map in
/// tools and tests.
pub trait PointSetStore {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, StoreError>;
}

/// Any failure the request pipeline can surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidId(#[from] InvalidPointSetId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored point set is malformed: {0}")]
    MalformedPointSet(#[from] DecodeError),
    #[error(transparent)]
    Triangulation(#[from] TriangulateError),
    #[error("failed to encode the triangulation: {0}")]
    Encoding(#[from] EncodeError),
}

impl ServiceError {
    /// HTTP status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidId(_) => 400,
            Self::Store(StoreError::BadRequest) => 400,
            Self::Store(StoreError::NotFound) => 404,
            Self::Store(StoreError::Unavailable(_)) => 503,
            Self::Store(StoreError::UnexpectedStatus(_)) => 503,
            Self::MalformedPointSet(_) => 500,
            Self::Triangulation(_) => 422,
            Self::Encoding(_) => 500,
        }
    }

    /// Stable machine-readable code for the JSON envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "INVALID_POINTSET_ID",
            Self::Store(StoreError::BadRequest) => "BAD_REQUEST",
            Self::Store(StoreError::NotFound) => "POINTSET_NOT_FOUND",
            Self::Store(StoreError::Unavailable(_)) => "POINTSET_MANAGER_UNAVAILABLE",
            Self::Store(StoreError::UnexpectedStatus(_)) => "POINTSET_MANAGER_ERROR",
            Self::MalformedPointSet(_) => "INVALID_POINTSET_FORMAT",
            Self::Triangulation(_) => "DUPLICATE_POINTS",
            Self::Encoding(_) => "ENCODING_FAILED",
        }
    }

    /// JSON error envelope for the response body.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// `{ "code": ..., "message": ... }` envelope returned on every failure.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// The request-handling context: owns the upstream store handle, constructed
/// once at startup and shared by reference across request handlers.
pub struct Triangulator<S> {
    store: S,
}

impl<S: PointSetStore> Triangulator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Full request flow for `GET /triangulation/<id>`: validate the id,
    /// fetch the stored PointSet, triangulate, and re-encode as a
    /// Triangulation buffer (the octet-stream response body).
    pub fn triangulation(&self, raw_id: &str) -> Result<Vec<u8>, ServiceError> {
        let id = PointSetId::parse(raw_id)?;
        let raw = self.store.fetch(&id)?;
        let points = wire::decode_pointset(&raw)?;
        let triangles = hull::triangulate(&points)?;
        Ok(wire::encode_triangulation(&points, &triangles)?)
    }
}
