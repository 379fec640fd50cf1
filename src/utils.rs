use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::model::ModelBounds;

/// Mesh vertex. `color.a` is the emissive weight: 0 is fully lit, 1 ignores
/// lighting (the phone screen).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Axis-aligned bounds of all vertices, None for an empty mesh
    pub fn bounds(&self) -> Option<ModelBounds> {
        let first = Vec3::from_array(self.vertices.first()?.pos);
        let (min, max) = self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from_array(v.pos);
            (min.min(p), max.max(p))
        });
        Some(ModelBounds::new(min, max))
    }

    /// Quad with corners `center -u -v`, `+u -v`, `+u +v`, `-u +v`;
    /// counter-clockwise seen from the side `u x v` points to.
    fn push_quad(&mut self, center: Vec3, u: Vec3, v: Vec3, color: [f32; 4]) {
        let normal = u.cross(v).normalize().to_array();
        let base = self.vertices.len() as u32;
        for corner in [center - u - v, center + u - v, center + u + v, center - u + v] {
            self.vertices.push(Vertex { pos: corner.to_array(), normal, color });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

const BODY_COLOR: [f32; 4] = [0.08, 0.08, 0.09, 0.0];
const SCREEN_COLOR: [f32; 4] = [0.12, 0.45, 0.95, 1.0];
const Z_SCREEN_LIFT: f32 = 0.002;

/// Width, height and depth of the stand-in handset, roughly a large phone in decimetres.
pub const PHONE_SIZE: [f32; 3] = [0.77, 1.6, 0.083];

/// Stand-in phone: a closed slab with an emissive screen on its -Z face.
/// Dimensions are in model units; placement rescales it anyway.
pub fn create_phone_mesh(width: f32, height: f32, depth: f32) -> Mesh {
    let mut mesh = Mesh::empty();
    let h = Vec3::new(width, height, depth) * 0.5;
    let (x, y, z) = (Vec3::X * h.x, Vec3::Y * h.y, Vec3::Z * h.z);

    mesh.push_quad(x, y, z, BODY_COLOR);
    mesh.push_quad(-x, z, y, BODY_COLOR);
    mesh.push_quad(y, z, x, BODY_COLOR);
    mesh.push_quad(-y, x, z, BODY_COLOR);
    mesh.push_quad(z, x, y, BODY_COLOR);
    mesh.push_quad(-z, y, x, BODY_COLOR);

    // Screen floats just off the back of the slab, inset from the edges
    let screen_center = -Z_SCREEN_LIFT * Vec3::Z - z;
    mesh.push_quad(screen_center, y * 0.94, x * 0.9, SCREEN_COLOR);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_mesh_layout() {
        let mesh = create_phone_mesh(0.77, 1.6, 0.08);
        assert_eq!(mesh.vertices.len(), 7 * 4);
        assert_eq!(mesh.indices.len(), 7 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_faces_wind_outward() {
        let mesh = create_phone_mesh(1.0, 2.0, 0.5);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].pos));
            let face_normal = (b - a).cross(c - a).normalize();
            let stored = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(stored) > 0.99);
            // Outward: normal points away from the slab centre
            assert!(face_normal.dot((a + b + c) / 3.0) > 0.0);
        }
    }

    #[test]
    fn test_screen_faces_minus_z() {
        let mesh = create_phone_mesh(1.0, 2.0, 0.5);
        let screen: Vec<_> = mesh.vertices.iter().filter(|v| v.color[3] == 1.0).collect();
        assert_eq!(screen.len(), 4);
        assert!(screen.iter().all(|v| v.normal[2] < -0.999 && v.pos[2] < -0.25));
    }

    #[test]
    fn test_bounds() {
        let mesh = create_phone_mesh(1.0, 2.0, 0.5);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.max_dim() - 2.0).abs() < 1e-6);
        assert!(bounds.center().length() < 0.01);
        assert!(Mesh::empty().bounds().is_none());
    }
}
