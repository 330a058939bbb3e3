//! CPU-side quad batch rebuilt every frame.
//!
//! Each copy becomes four vertices and six indices. Draw calls are merged when
//! consecutive quads use the same texture, so sprites that share an image
//! collapse into a single `draw_indexed` call.

use fg_core::Rect;

use crate::vertex::SpriteVertex;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone)]
pub struct DrawCall<T> {
    pub texture: T,
    pub key: u64,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct QuadBatch<T> {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall<T>>,
}

impl<T> QuadBatch<T> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            draw_calls: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.draw_calls.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// `key` identifies the texture; equal keys may share a draw call.
    pub fn push_quad(&mut self, texture: T, key: u64, dest: Rect, uv: [f32; 4]) {
        let x0 = dest.x as f32;
        let y0 = dest.y as f32;
        let x1 = x0 + dest.w as f32;
        let y1 = y0 + dest.h as f32;
        let [u0, v0, u1, v1] = uv;
        let base_index = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            SpriteVertex::new(x0, y0, u0, v0),
            SpriteVertex::new(x1, y0, u1, v0),
            SpriteVertex::new(x1, y1, u1, v1),
            SpriteVertex::new(x0, y1, u0, v1),
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(texture, key, draw_start, 6);
    }

    fn push_draw_call(&mut self, texture: T, key: u64, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.key == key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture,
            key,
            index_start,
            index_count,
        });
    }
}

impl<T> Default for QuadBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    #[test]
    fn quad_covers_destination_rect() {
        let mut batch = QuadBatch::new();
        batch.push_quad((), 1, Rect::new(10, 20, 20, 20), FULL_UV);

        let positions: Vec<[f32; 2]> = batch.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[10.0, 20.0], [30.0, 20.0], [30.0, 40.0], [10.0, 40.0]]
        );
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(batch.vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(batch.vertices[2].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn consecutive_quads_with_same_texture_merge() {
        let mut batch = QuadBatch::new();
        for i in 0..3 {
            batch.push_quad("test", 7, Rect::new(i * 20, 0, 20, 20), FULL_UV);
        }
        assert_eq!(batch.quad_count(), 3);
        assert_eq!(batch.draw_calls.len(), 1);
        assert_eq!(batch.draw_calls[0].index_count, 18);
    }

    #[test]
    fn texture_switch_starts_new_draw_call() {
        let mut batch = QuadBatch::new();
        batch.push_quad("test", 1, Rect::new(0, 0, 20, 20), FULL_UV);
        batch.push_quad("bot", 2, Rect::new(0, 0, 20, 20), FULL_UV);
        batch.push_quad("test", 1, Rect::new(0, 0, 20, 20), FULL_UV);

        let keys: Vec<u64> = batch.draw_calls.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![1, 2, 1]);
        assert_eq!(batch.draw_calls[2].index_start, 12);
    }

    #[test]
    fn clear_empties_everything() {
        let mut batch = QuadBatch::new();
        batch.push_quad((), 1, Rect::new(0, 0, 20, 20), FULL_UV);
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.quad_count(), 0);
        assert!(batch.indices.is_empty());
    }
}
