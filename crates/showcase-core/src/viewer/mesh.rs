//! Triangle meshes for the viewer's primitive shapes.

use super::scene::GeometryDesc;
use glam::Vec3;
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn base(&self) -> u16 {
        self.vertices.len() as u16
    }

    /// Append a quad `a b c d` wound counter-clockwise as seen from `normal`.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let b = self.base();
        self.vertices
            .extend(corners.iter().map(|&p| Vertex::new(p, normal)));
        self.indices
            .extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
    }
}

impl GeometryDesc {
    pub fn build(&self) -> MeshData {
        match *self {
            GeometryDesc::Box {
                width,
                height,
                depth,
            } => box_mesh(Vec3::new(width, height, depth) * 0.5),
            GeometryDesc::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => cylinder_mesh(radius_top, radius_bottom, height, segments.max(3)),
            GeometryDesc::Plane { width, height } => {
                let (hx, hy) = (width * 0.5, height * 0.5);
                let mut m = MeshData::default();
                m.push_quad(
                    [
                        Vec3::new(-hx, -hy, 0.0),
                        Vec3::new(hx, -hy, 0.0),
                        Vec3::new(hx, hy, 0.0),
                        Vec3::new(-hx, hy, 0.0),
                    ],
                    Vec3::Z,
                );
                m
            }
        }
    }
}

fn box_mesh(half: Vec3) -> MeshData {
    // (normal, u, v) with u x v == normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let mut m = MeshData::default();
    for (n, u, v) in FACES {
        let c = n * half;
        let u = u * half;
        let v = v * half;
        m.push_quad([c - u - v, c + u - v, c + u + v, c - u + v], n);
    }
    m
}

fn cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    let mut m = MeshData::default();

    // side: one ring of vertices at each end, seam duplicated
    let side_base = m.base();
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (s, c) = theta.sin_cos();
        let normal = Vec3::new(s, slope, c).normalize();
        m.vertices.push(Vertex::new(
            Vec3::new(radius_top * s, half, radius_top * c),
            normal,
        ));
        m.vertices.push(Vertex::new(
            Vec3::new(radius_bottom * s, -half, radius_bottom * c),
            normal,
        ));
    }
    for i in 0..segments as u16 {
        let top0 = side_base + i * 2;
        let bot0 = top0 + 1;
        let top1 = top0 + 2;
        let bot1 = top0 + 3;
        m.indices
            .extend_from_slice(&[top0, bot0, bot1, top0, bot1, top1]);
    }

    for (y, r, n) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        if r <= 0.0 {
            continue;
        }
        let center = m.base();
        m.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), n));
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (s, c) = theta.sin_cos();
            m.vertices
                .push(Vertex::new(Vec3::new(r * s, y, r * c), n));
        }
        for i in 0..segments as u16 {
            let a = center + 1 + i;
            let b = a + 1;
            if n.y > 0.0 {
                m.indices.extend_from_slice(&[center, a, b]);
            } else {
                m.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_normal(m: &MeshData, t: usize) -> Vec3 {
        let p = |i: usize| Vec3::from_array(m.vertices[m.indices[t * 3 + i] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn box_has_24_vertices_and_outward_winding() {
        let m = GeometryDesc::Box {
            width: 4.0,
            height: 0.2,
            depth: 2.0,
        }
        .build();
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.indices.len(), 36);
        for t in 0..12 {
            let n = Vec3::from_array(m.vertices[m.indices[t * 3] as usize].normal);
            assert!(tri_normal(&m, t).dot(n) > 0.0, "triangle {t} faces inward");
        }
        for v in &m.vertices {
            assert!(v.position[0].abs() <= 2.0 + 1e-6);
            assert!(v.position[1].abs() <= 0.1 + 1e-6);
            assert!(v.position[2].abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn cylinder_is_closed_and_indices_in_range() {
        let m = GeometryDesc::Cylinder {
            radius_top: 0.3,
            radius_bottom: 0.2,
            height: 0.8,
            segments: 16,
        }
        .build();
        // side quads + two caps
        assert_eq!(m.indices.len(), 16 * 6 + 2 * 16 * 3);
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
        for t in 0..m.indices.len() / 3 {
            let n = Vec3::from_array(m.vertices[m.indices[t * 3] as usize].normal);
            assert!(tri_normal(&m, t).dot(n) > 0.0);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let m = GeometryDesc::Plane {
            width: 20.0,
            height: 20.0,
        }
        .build();
        assert_eq!(m.index_count(), 6);
        assert!(tri_normal(&m, 0).z > 0.0);
        assert!(tri_normal(&m, 1).z > 0.0);
    }
}
