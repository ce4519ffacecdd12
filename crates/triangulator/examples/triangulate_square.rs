//! Triangulate a unit square and show the wire layout of the result.
//!
//! Usage:
//!   cargo run -p triangulator --example triangulate_square

use nalgebra::vector;
use triangulator::hull::triangulate;
use triangulator::wire::encode_triangulation;

fn main() {
    let points = vec![
        vector![0.0f32, 0.0],
        vector![1.0f32, 0.0],
        vector![1.0f32, 1.0],
        vector![0.0f32, 1.0],
    ];
    let triangles = triangulate(&points).expect("square has no duplicate points");
    for (i, t) in triangles.iter().enumerate() {
        println!("triangle {i}: ({}, {}, {})", t.a, t.b, t.c);
    }
    let encoded = encode_triangulation(&points, &triangles).expect("fits the wire format");
    println!(
        "encoded: {} bytes ({} points, {} triangles)",
        encoded.len(),
        points.len(),
        triangles.len()
    );
}
