use crate::cloth::Cloth;
use crate::error::{ClothError, ClothResult};

/// GPU-compatible vertex: 32 bytes, position + normal + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// How a renderer should draw the cloth. Has no effect on simulation.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DrawMode {
    Nodes = 0,
    Lines = 1,
    #[default]
    Faces = 2,
}

impl DrawMode {
    pub fn from_code(code: u8) -> ClothResult<Self> {
        match code {
            0 => Ok(DrawMode::Nodes),
            1 => Ok(DrawMode::Lines),
            2 => Ok(DrawMode::Faces),
            other => Err(ClothError::UnknownDrawMode(other)),
        }
    }
}

/// Fill `out` with one vertex per node, positions in world space.
pub fn write_vertices(cloth: &Cloth, out: &mut Vec<ClothVertex>) {
    let particles = cloth.particles();
    out.clear();
    out.reserve(particles.count);
    for i in 0..particles.count {
        let p = cloth.world_position(i).as_vec3();
        let n = particles.normal[i].as_vec3();
        let uv = particles.tex_coord[i].as_vec2();
        out.push(ClothVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        });
    }
}

/// Edge list for line rendering: each triangle `(a, b, c)` becomes
/// `a-b, b-c, c-a`.
pub fn line_indices(faces: &[u32]) -> Vec<u32> {
    let mut lines = Vec::with_capacity(faces.len() * 2);
    for tri in faces.chunks_exact(3) {
        lines.extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
    }
    lines
}

/// Raw bytes of a vertex buffer, ready for upload.
pub fn vertex_bytes(vertices: &[ClothVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
