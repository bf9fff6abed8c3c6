//! Raw payload to render-ready geometry assembly
//!
//! Flattens grouped vertex/face arrays into the contiguous buffers the
//! renderer uploads, validating indices along the way and computing
//! per-vertex normals since the case service does not supply any.

use crate::assets::tooth_model::RawMeshPayload;
use crate::foundation::math::Vec3;
use thiserror::Error;

/// Errors from mesh assembly
///
/// All of these are local and recoverable: the caller treats a failed
/// variant as "no geometry available", never as a batch-fatal condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Payload carried no vertices
    #[error("mesh payload has no vertices")]
    EmptyVertices,

    /// Payload carried no faces
    #[error("mesh payload has no faces")]
    EmptyFaces,

    /// A face referenced a vertex index past the end of the vertex array
    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending face
        face: usize,
        /// The out-of-range vertex index
        index: u32,
        /// Number of vertices in the payload
        vertex_count: usize,
    },
}

/// Validated, render-ready indexed triangle mesh
///
/// All buffers are flat with stride 3: vertex `i` occupies
/// `positions[3i..3i + 3]`, and likewise for `normals`. Every value in
/// `indices` is a valid vertex index.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableGeometry {
    /// Flattened vertex positions
    pub positions: Vec<f32>,

    /// Flattened triangle indices
    pub indices: Vec<u32>,

    /// Flattened per-vertex normals, derived from face geometry
    pub normals: Vec<f32>,
}

impl RenderableGeometry {
    /// Number of vertices in the geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Assemble a raw payload into renderable geometry
///
/// Preserves vertex and face order while flattening, validates every
/// face index against the vertex count, and computes area-weighted
/// vertex normals: each triangle's un-normalized edge cross product is
/// accumulated into its three vertices, then each vertex's sum is
/// normalized. A vertex referenced by no triangle keeps a zero normal;
/// that is an acceptable degenerate case, not an error.
///
/// Pure function of its input; on error nothing partial is returned.
pub fn assemble(payload: &RawMeshPayload) -> Result<RenderableGeometry, MeshError> {
    if payload.vertices.is_empty() {
        return Err(MeshError::EmptyVertices);
    }
    if payload.faces.is_empty() {
        return Err(MeshError::EmptyFaces);
    }

    let vertex_count = payload.vertices.len();

    // Validate before allocating output buffers so failure never leaves
    // partially built geometry behind.
    for (face_idx, face) in payload.faces.iter().enumerate() {
        for &index in face {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
    }

    let mut positions = Vec::with_capacity(vertex_count * 3);
    for vertex in &payload.vertices {
        positions.extend_from_slice(vertex);
    }

    let mut indices = Vec::with_capacity(payload.faces.len() * 3);
    for face in &payload.faces {
        indices.extend_from_slice(face);
    }

    let normals = compute_vertex_normals(&payload.vertices, &payload.faces);

    Ok(RenderableGeometry {
        positions,
        indices,
        normals,
    })
}

/// Accumulate face cross products into per-vertex normals
///
/// Indices must already be validated against the vertex count.
fn compute_vertex_normals(vertices: &[[f32; 3]], faces: &[[u32; 3]]) -> Vec<f32> {
    let mut accumulated = vec![Vec3::zeros(); vertices.len()];

    for face in faces {
        let a = Vec3::from(vertices[face[0] as usize]);
        let b = Vec3::from(vertices[face[1] as usize]);
        let c = Vec3::from(vertices[face[2] as usize]);

        // Magnitude is twice the triangle area, which weights the
        // contribution of larger faces more heavily.
        let face_normal = (b - a).cross(&(c - a));

        for &index in face {
            accumulated[index as usize] += face_normal;
        }
    }

    let mut normals = Vec::with_capacity(vertices.len() * 3);
    for sum in &accumulated {
        let normal = if sum.norm() > f32::EPSILON {
            sum.normalize()
        } else {
            // Unreferenced vertex, or degenerate faces cancelled out
            Vec3::zeros()
        };
        normals.extend_from_slice(normal.as_slice());
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit square in the XY plane, counter-clockwise winding seen from +Z
    fn flat_square() -> RawMeshPayload {
        RawMeshPayload::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    fn tetrahedron() -> RawMeshPayload {
        RawMeshPayload::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn test_buffer_sizes_match_input() {
        let payload = tetrahedron();
        let geometry = assemble(&payload).unwrap();

        assert_eq!(geometry.positions.len(), payload.vertices.len() * 3);
        assert_eq!(geometry.indices.len(), payload.faces.len() * 3);
        assert_eq!(geometry.normals.len(), geometry.positions.len());
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.triangle_count(), 4);

        let vertex_count = geometry.vertex_count() as u32;
        assert!(geometry.indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn test_flattening_preserves_order() {
        let payload = flat_square();
        let geometry = assemble(&payload).unwrap();

        for (i, vertex) in payload.vertices.iter().enumerate() {
            assert_eq!(&geometry.positions[3 * i..3 * i + 3], vertex.as_slice());
        }
        for (i, face) in payload.faces.iter().enumerate() {
            assert_eq!(&geometry.indices[3 * i..3 * i + 3], face.as_slice());
        }
    }

    #[test]
    fn test_flatten_regroup_roundtrip() {
        let payload = flat_square();
        let geometry = assemble(&payload).unwrap();

        let regrouped: Vec<[f32; 3]> = geometry
            .positions
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        assert_eq!(regrouped, payload.vertices);
    }

    #[test]
    fn test_flat_square_normals_point_up() {
        let geometry = assemble(&flat_square()).unwrap();

        for chunk in geometry.normals.chunks_exact(3) {
            assert_relative_eq!(chunk[0], 0.0, epsilon = 1e-6);
            assert_relative_eq!(chunk[1], 0.0, epsilon = 1e-6);
            assert_relative_eq!(chunk[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let geometry = assemble(&tetrahedron()).unwrap();

        for chunk in geometry.normals.chunks_exact(3) {
            let norm = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let payload = RawMeshPayload::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [5.0, 5.0, 5.0], // not referenced by any face
            ],
            vec![[0, 1, 2]],
        );
        let geometry = assemble(&payload).unwrap();

        assert_eq!(&geometry.normals[9..12], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_vertices_rejected() {
        let payload = RawMeshPayload::new(vec![], vec![[0, 1, 2]]);
        assert_eq!(assemble(&payload), Err(MeshError::EmptyVertices));
    }

    #[test]
    fn test_empty_faces_rejected() {
        let payload = RawMeshPayload::new(vec![[0.0, 0.0, 0.0]], vec![]);
        assert_eq!(assemble(&payload), Err(MeshError::EmptyFaces));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let payload = RawMeshPayload::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2], [0, 2, 7]],
        );

        assert_eq!(
            assemble(&payload),
            Err(MeshError::IndexOutOfRange {
                face: 1,
                index: 7,
                vertex_count: 3,
            })
        );
    }
}
