//! CPU-side quad mesh. Quads are emitted back to front; each becomes four
//! vertices and six indices, and consecutive quads sharing a texture slot
//! merge into a single draw call.

use glam::Vec2;

use crate::vertex::SpriteVertex;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture_slot: usize,
    pub index_start: u32,
    pub index_count: u32,
}

/// An axis-aligned quad in normalized device coordinates (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSpec {
    pub texture_slot: usize,
    pub min: Vec2,
    pub max: Vec2,
    pub color: [f32; 4],
}

#[derive(Debug, Default)]
pub struct QuadMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl QuadMesh {
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
            draw_calls: Vec::with_capacity(quads),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn add_quad(&mut self, spec: QuadSpec) {
        let base_index = self.vertices.len() as u32;

        // Texture v runs top to bottom, NDC y bottom to top.
        self.vertices.push(SpriteVertex {
            position: [spec.min.x, spec.min.y],
            tex_coords: [0.0, 1.0],
            color: spec.color,
        });
        self.vertices.push(SpriteVertex {
            position: [spec.max.x, spec.min.y],
            tex_coords: [1.0, 1.0],
            color: spec.color,
        });
        self.vertices.push(SpriteVertex {
            position: [spec.max.x, spec.max.y],
            tex_coords: [1.0, 0.0],
            color: spec.color,
        });
        self.vertices.push(SpriteVertex {
            position: [spec.min.x, spec.max.y],
            tex_coords: [0.0, 0.0],
            color: spec.color,
        });

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(spec.texture_slot, draw_start, 6);
    }

    fn push_draw_call(&mut self, texture_slot: usize, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.texture_slot == texture_slot && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_slot,
            index_start,
            index_count,
        });
    }
}
