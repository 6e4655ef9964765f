#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

/// Two triangles over the four vertices produced by [`sprite_quad`].
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Center-anchored quad in canvas space (y down). The top-left corner sits at
/// `center - floor(size / 2)` so every edge lands on a whole pixel, odd sizes
/// included. Vertex order is top-left, top-right, bottom-right, bottom-left.
pub fn sprite_quad(center: (i32, i32), size: (u32, u32)) -> [SpriteVertex; 4] {
    let (w, h) = (size.0 as i32, size.1 as i32);
    let left = (center.0 - w.div_euclid(2)) as f32;
    let top = (center.1 - h.div_euclid(2)) as f32;
    let right = left + w as f32;
    let bottom = top + h as f32;
    let color = [1.0, 1.0, 1.0, 1.0];

    [
        SpriteVertex {
            position: [left, top],
            tex_coords: [0.0, 0.0],
            color,
        },
        SpriteVertex {
            position: [right, top],
            tex_coords: [1.0, 0.0],
            color,
        },
        SpriteVertex {
            position: [right, bottom],
            tex_coords: [1.0, 1.0],
            color,
        },
        SpriteVertex {
            position: [left, bottom],
            tex_coords: [0.0, 1.0],
            color,
        },
    ]
}
