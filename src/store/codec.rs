//! Binary trail encoding
//!
//! A trail file is a flat run of 12-byte records, one per point: x, y, z as
//! big-endian signed 32-bit integers. No header, no length, no separators.

use crate::trail::Point;

/// Bytes per encoded point
pub const RECORD_LEN: usize = 12;

/// Encode points in order
pub fn encode_points(points: &[Point]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(points.len() * RECORD_LEN);
    for p in points {
        bytes.extend_from_slice(&p.x.to_be_bytes());
        bytes.extend_from_slice(&p.y.to_be_bytes());
        bytes.extend_from_slice(&p.z.to_be_bytes());
    }
    bytes
}

/// Decode whole records, returning the points and the number of trailing
/// bytes that did not form a complete record.
pub fn decode_points(bytes: &[u8]) -> (Vec<Point>, usize) {
    let records = bytes.chunks_exact(RECORD_LEN);
    let trailing = records.remainder().len();

    let points = records
        .map(|r| {
            Point::new(
                i32::from_be_bytes([r[0], r[1], r[2], r[3]]),
                i32::from_be_bytes([r[4], r[5], r[6], r[7]]),
                i32::from_be_bytes([r[8], r[9], r[10], r[11]]),
            )
        })
        .collect();

    (points, trailing)
}
