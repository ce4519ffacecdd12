//! One-time validation of untyped JSON into typed points and triangles.
//!
//! Everything behind this boundary operates on guaranteed-numeric values:
//! a document is checked exactly once, here, and either becomes a typed
//! vector or a precise error kind. No coercion of strings, no tolerance for
//! extra elements.

use serde_json::{json, Value};
use thiserror::Error;

use crate::types::{Point, Triangle};

/// Validation failures at the JSON boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The document (or a value inside it) has the wrong JSON type entirely.
    #[error("expected {expected}, found {found}")]
    InvalidInputType {
        expected: &'static str,
        found: &'static str,
    },
    /// A point is not an `[x, y]` pair.
    #[error("point {index} is not an [x, y] pair")]
    BadPointShape { index: usize },
    /// A point's coordinate is not a JSON number.
    #[error("point {index} has a non-numeric coordinate")]
    NonNumericCoordinate { index: usize },
    /// A triangle does not have exactly three indices.
    #[error("triangle {index} does not have exactly 3 indices")]
    BadArity { index: usize },
}

/// Parse `[[x, y], ...]` into a point list.
///
/// Coordinates are narrowed to f32, matching the wire precision.
pub fn pointset_from_json(doc: &Value) -> Result<Vec<Point>, InputError> {
    let items = as_array(doc, "an array of [x, y] points")?;
    let mut points = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let pair = item
            .as_array()
            .ok_or(InputError::BadPointShape { index })?;
        if pair.len() != 2 {
            return Err(InputError::BadPointShape { index });
        }
        let x = coordinate(&pair[0], index)?;
        let y = coordinate(&pair[1], index)?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}

/// Parse `[[i0, i1, i2], ...]` into a triangle list.
///
/// Index *range* against a concrete point set is the wire encoder's job;
/// here each index only has to be a non-negative integer that fits u32.
pub fn triangles_from_json(doc: &Value) -> Result<Vec<Triangle>, InputError> {
    let items = as_array(doc, "an array of [i0, i1, i2] triangles")?;
    let mut triangles = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let triple = item.as_array().ok_or(InputError::BadArity { index })?;
        if triple.len() != 3 {
            return Err(InputError::BadArity { index });
        }
        let a = vertex_index(&triple[0])?;
        let b = vertex_index(&triple[1])?;
        let c = vertex_index(&triple[2])?;
        triangles.push(Triangle::new(a, b, c));
    }
    Ok(triangles)
}

/// Render a point list as `[[x, y], ...]`.
pub fn pointset_to_json(points: &[Point]) -> Value {
    Value::Array(points.iter().map(|p| json!([p.x, p.y])).collect())
}

/// Render a triangle list as `[[i0, i1, i2], ...]`.
pub fn triangles_to_json(triangles: &[Triangle]) -> Value {
    Value::Array(triangles.iter().map(|t| json!([t.a, t.b, t.c])).collect())
}

fn as_array<'a>(doc: &'a Value, expected: &'static str) -> Result<&'a Vec<Value>, InputError> {
    doc.as_array().ok_or(InputError::InvalidInputType {
        expected,
        found: type_name(doc),
    })
}

fn coordinate(value: &Value, index: usize) -> Result<f32, InputError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or(InputError::NonNumericCoordinate { index })
}

fn vertex_index(value: &Value) -> Result<u32, InputError> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(InputError::InvalidInputType {
            expected: "a vertex index in u32 range",
            found: type_name(value),
        })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
