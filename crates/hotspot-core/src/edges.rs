//! Triangle-list to line-list edge extraction
//!
//! Used to draw the X-Ray wireframe as ordinary line geometry where the GPU
//! cannot rasterize polygons in line mode.

use std::collections::HashSet;

/// Unique undirected edges of an indexed triangle list.
///
/// Edges come out in first-seen order with their original winding. A
/// trailing partial triangle and degenerate (zero-length) edges are skipped.
pub fn unique_edges(triangles: &[u32]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for triangle in triangles.chunks_exact(3) {
        let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
        for edge in [[a, b], [b, c], [c, a]] {
            if edge[0] == edge[1] {
                continue;
            }
            let key = (edge[0].min(edge[1]), edge[0].max(edge[1]));
            if seen.insert(key) {
                edges.push(edge);
            }
        }
    }

    edges
}
