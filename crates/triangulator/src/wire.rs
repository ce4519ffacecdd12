//! Binary wire codec for point sets and triangulations.
//!
//! Layouts
//! - PointSet: `u32 N | N × { f32 x, f32 y }`, total `4 + 8N` bytes.
//! - Triangulation: PointSet block, then `u32 T | T × { u32 i0, u32 i1, u32 i2 }`,
//!   total `8 + 8N + 12T` bytes.
//!
//! Conventions
//! - Everything is little-endian. The format carries no version tag, so the
//!   width and endianness choices are frozen; a compliant peer must match
//!   them byte for byte.
//! - Encoding is a pure read of the input slices; decoding allocates fresh
//!   vectors owned by the caller.
//! - Buffers are pre-sized from the counts and filled by offset. Length
//!   arithmetic runs in `u64` so a hostile count cannot wrap the math.
//! - Malformed buffers are always an error; nothing is truncated or padded.

use thiserror::Error;

use crate::types::{Point, Triangle};

const COUNT_SIZE: usize = 4;
const POINT_STRIDE: usize = 8;
const TRIANGLE_STRIDE: usize = 12;

/// Encoding failures. Inputs are typed, so only count and index range can go
/// wrong here; shape errors belong to the `input` boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// More elements than the u32 count field can carry.
    #[error("{what} count {count} exceeds the u32 wire field")]
    CapacityExceeded { what: &'static str, count: usize },
    /// A triangle references a vertex outside the point set.
    #[error("triangle {triangle} references vertex {index}, but the point set has {points} points")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        points: usize,
    },
}

/// Decoding failures. `expected` is reported in bytes of the full layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer of {actual} bytes is too short to hold a count field")]
    BufferTooShort { actual: usize },
    #[error("buffer length {actual} does not match the declared layout of {expected} bytes")]
    LengthMismatch { expected: u64, actual: usize },
}

/// Encode a point set into the PointSet layout.
pub fn encode_pointset(points: &[Point]) -> Result<Vec<u8>, EncodeError> {
    let n = checked_count(points.len(), "point")?;
    let mut buf = vec![0u8; COUNT_SIZE + POINT_STRIDE * points.len()];
    buf[..COUNT_SIZE].copy_from_slice(&n.to_le_bytes());
    write_points(&mut buf, COUNT_SIZE, points);
    Ok(buf)
}

/// Decode a PointSet buffer. The buffer must contain the declared layout
/// exactly: `4 + 8N` bytes, nothing more.
pub fn decode_pointset(data: &[u8]) -> Result<Vec<Point>, DecodeError> {
    let n = read_count(data, 0)?;
    let expected = COUNT_SIZE as u64 + POINT_STRIDE as u64 * u64::from(n);
    if data.len() as u64 != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(read_points(data, COUNT_SIZE, n))
}

/// Encode a point set together with its triangle list (Triangulation layout).
///
/// Every triangle index must reference an existing vertex. The vertex block
/// always contains the full input point set, including points no triangle
/// references.
pub fn encode_triangulation(
    points: &[Point],
    triangles: &[Triangle],
) -> Result<Vec<u8>, EncodeError> {
    let n = checked_count(points.len(), "point")?;
    let t = checked_count(triangles.len(), "triangle")?;
    for (ti, tri) in triangles.iter().enumerate() {
        for index in tri.indices() {
            if u64::from(index) >= points.len() as u64 {
                return Err(EncodeError::IndexOutOfBounds {
                    triangle: ti,
                    index,
                    points: points.len(),
                });
            }
        }
    }
    let total =
        2 * COUNT_SIZE + POINT_STRIDE * points.len() + TRIANGLE_STRIDE * triangles.len();
    let mut buf = vec![0u8; total];
    buf[..COUNT_SIZE].copy_from_slice(&n.to_le_bytes());
    write_points(&mut buf, COUNT_SIZE, points);
    let tri_count_at = COUNT_SIZE + POINT_STRIDE * points.len();
    buf[tri_count_at..tri_count_at + COUNT_SIZE].copy_from_slice(&t.to_le_bytes());
    let mut off = tri_count_at + COUNT_SIZE;
    for tri in triangles {
        for index in tri.indices() {
            buf[off..off + 4].copy_from_slice(&index.to_le_bytes());
            off += 4;
        }
    }
    Ok(buf)
}

/// Decode a Triangulation buffer into its point set and triangle list.
pub fn decode_triangulation(data: &[u8]) -> Result<(Vec<Point>, Vec<Triangle>), DecodeError> {
    let n = read_count(data, 0)?;
    let vertex_end = COUNT_SIZE as u64 + POINT_STRIDE as u64 * u64::from(n);
    if (data.len() as u64) < vertex_end + COUNT_SIZE as u64 {
        return Err(DecodeError::BufferTooShort { actual: data.len() });
    }
    let t = read_count(data, vertex_end as usize)?;
    let expected = vertex_end + COUNT_SIZE as u64 + TRIANGLE_STRIDE as u64 * u64::from(t);
    if data.len() as u64 != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }
    let points = read_points(data, COUNT_SIZE, n);
    let mut triangles = Vec::with_capacity(t as usize);
    let mut off = vertex_end as usize + COUNT_SIZE;
    for _ in 0..t {
        let a = read_u32(data, off);
        let b = read_u32(data, off + 4);
        let c = read_u32(data, off + 8);
        triangles.push(Triangle::new(a, b, c));
        off += TRIANGLE_STRIDE;
    }
    Ok((points, triangles))
}

fn checked_count(len: usize, what: &'static str) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::CapacityExceeded { what, count: len })
}

fn read_count(data: &[u8], at: usize) -> Result<u32, DecodeError> {
    if data.len() < at + COUNT_SIZE {
        return Err(DecodeError::BufferTooShort { actual: data.len() });
    }
    Ok(read_u32(data, at))
}

#[inline]
fn read_u32(data: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(raw)
}

#[inline]
fn read_f32(data: &[u8], at: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[at..at + 4]);
    f32::from_le_bytes(raw)
}

fn read_points(data: &[u8], at: usize, n: u32) -> Vec<Point> {
    let mut points = Vec::with_capacity(n as usize);
    for i in 0..n as usize {
        let off = at + POINT_STRIDE * i;
        points.push(Point::new(read_f32(data, off), read_f32(data, off + 4)));
    }
    points
}

fn write_points(buf: &mut [u8], at: usize, points: &[Point]) {
    for (i, p) in points.iter().enumerate() {
        let off = at + POINT_STRIDE * i;
        buf[off..off + 4].copy_from_slice(&p.x.to_le_bytes());
        buf[off + 4..off + 8].copy_from_slice(&p.y.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;

    #[test]
    fn empty_pointset_is_four_zero_bytes() {
        let data = encode_pointset(&[]).unwrap();
        assert_eq!(data, vec![0u8; 4]);
        assert_eq!(decode_pointset(&data).unwrap(), Vec::<Point>::new());
    }

    #[test]
    fn one_point_exact_layout() {
        let data = encode_pointset(&[vector![1.0f32, 2.0f32]]).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&1.0f32.to_le_bytes());
        expected.extend_from_slice(&2.0f32.to_le_bytes());
        assert_eq!(data, expected);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        assert_eq!(
            decode_pointset(b"abc"),
            Err(DecodeError::BufferTooShort { actual: 3 })
        );
        assert_eq!(
            decode_pointset(&[]),
            Err(DecodeError::BufferTooShort { actual: 0 })
        );
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let mut data = encode_pointset(&[vector![1.0f32, 2.0f32]]).unwrap();
        data.push(0);
        assert_eq!(
            decode_pointset(&data),
            Err(DecodeError::LengthMismatch {
                expected: 12,
                actual: 13
            })
        );
        data.truncate(11);
        assert_eq!(
            decode_pointset(&data),
            Err(DecodeError::LengthMismatch {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn decode_rejects_overclaimed_count() {
        // Claims u32::MAX points with an empty body; expected length must not
        // wrap during the check.
        let data = u32::MAX.to_le_bytes().to_vec();
        assert_eq!(
            decode_pointset(&data),
            Err(DecodeError::LengthMismatch {
                expected: 4 + 8 * u64::from(u32::MAX),
                actual: 4
            })
        );
    }

    #[test]
    fn pointset_round_trip_preserves_order_and_bits() {
        let points = vec![
            vector![0.0f32, -0.0f32],
            vector![1.5f32, -2.25f32],
            vector![f32::MIN_POSITIVE, f32::MAX],
        ];
        let decoded = decode_pointset(&encode_pointset(&points).unwrap()).unwrap();
        assert_eq!(decoded.len(), points.len());
        for (p, q) in points.iter().zip(&decoded) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }

    #[test]
    fn triangulation_layout_and_round_trip() {
        let points = vec![
            vector![0.0f32, 0.0f32],
            vector![1.0f32, 0.0f32],
            vector![0.0f32, 1.0f32],
        ];
        let triangles = vec![Triangle::new(0, 1, 2)];
        let data = encode_triangulation(&points, &triangles).unwrap();
        assert_eq!(data.len(), 4 + 8 * 3 + 4 + 12);
        // Vertex block is a valid PointSet prefix.
        assert_eq!(decode_pointset(&data[..4 + 8 * 3]).unwrap(), points);
        let (dec_points, dec_triangles) = decode_triangulation(&data).unwrap();
        assert_eq!(dec_points, points);
        assert_eq!(dec_triangles, triangles);
    }

    #[test]
    fn triangulation_with_no_triangles_still_carries_vertices() {
        let points = vec![vector![3.0f32, 4.0f32]];
        let data = encode_triangulation(&points, &[]).unwrap();
        assert_eq!(data.len(), 4 + 8 + 4);
        let (dec_points, dec_triangles) = decode_triangulation(&data).unwrap();
        assert_eq!(dec_points, points);
        assert!(dec_triangles.is_empty());
    }

    #[test]
    fn encode_rejects_out_of_bounds_index() {
        let points = vec![
            vector![0.0f32, 0.0f32],
            vector![1.0f32, 0.0f32],
            vector![0.0f32, 1.0f32],
        ];
        let err = encode_triangulation(&points, &[Triangle::new(0, 1, 3)]).unwrap_err();
        assert_eq!(
            err,
            EncodeError::IndexOutOfBounds {
                triangle: 0,
                index: 3,
                points: 3
            }
        );
    }

    #[test]
    fn decode_triangulation_rejects_truncated_triangle_block() {
        let points = vec![vector![0.0f32, 0.0f32]];
        let data = encode_triangulation(&points, &[]).unwrap();
        // Drop the triangle count entirely: too short to read it.
        assert_eq!(
            decode_triangulation(&data[..data.len() - 4]),
            Err(DecodeError::BufferTooShort { actual: 12 })
        );
        // Claim one triangle but provide no indices.
        let mut lying = data.clone();
        let at = lying.len() - 4;
        lying[at..].copy_from_slice(&1u32.to_le_bytes());
        assert_eq!(
            decode_triangulation(&lying),
            Err(DecodeError::LengthMismatch {
                expected: 4 + 8 + 4 + 12,
                actual: 16
            })
        );
    }

    #[test]
    fn checked_count_caps_at_u32() {
        assert_eq!(checked_count(0, "point"), Ok(0));
        assert_eq!(checked_count(u32::MAX as usize, "point"), Ok(u32::MAX));
        assert_eq!(
            checked_count(u32::MAX as usize + 1, "point"),
            Err(EncodeError::CapacityExceeded {
                what: "point",
                count: u32::MAX as usize + 1
            })
        );
    }

    proptest! {
        #[test]
        fn prop_pointset_round_trip(coords in prop::collection::vec((-1e6f32..1e6f32, -1e6f32..1e6f32), 0..64)) {
            let points: Vec<Point> = coords.iter().map(|&(x, y)| vector![x, y]).collect();
            let data = encode_pointset(&points).unwrap();
            prop_assert_eq!(data.len(), 4 + 8 * points.len());
            prop_assert_eq!(decode_pointset(&data).unwrap(), points);
        }

        #[test]
        fn prop_triangulation_round_trip(
            coords in prop::collection::vec((-1e3f32..1e3f32, -1e3f32..1e3f32), 3..32),
            raw_tris in prop::collection::vec((0u32..3, 0u32..3, 0u32..3), 0..16),
        ) {
            let points: Vec<Point> = coords.iter().map(|&(x, y)| vector![x, y]).collect();
            // Indices drawn in [0, 3) are valid for any point set of len >= 3.
            let triangles: Vec<Triangle> = raw_tris.iter().map(|&(a, b, c)| Triangle::new(a, b, c)).collect();
            let data = encode_triangulation(&points, &triangles).unwrap();
            let (dec_points, dec_triangles) = decode_triangulation(&data).unwrap();
            prop_assert_eq!(dec_points, points);
            prop_assert_eq!(dec_triangles, triangles);
        }
    }
}
