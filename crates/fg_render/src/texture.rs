use std::path::Path;

use fg_core::Rect;
use wgpu::util::DeviceExt;

use crate::error::RenderError;

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, RenderError> {
        let img = image::open(path).map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path.display().to_string();
        Ok(Self::from_image(device, queue, &img, &label))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
    ) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Nearest filtering keeps pixel art crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// `[u0, v0, u1, v1]` for a pixel rectangle of this texture.
    pub fn uv_rect(&self, src: Rect) -> [f32; 4] {
        uv_rect(src, self.width, self.height)
    }
}

/// Pixel rectangle to normalized UVs; v grows downward like image rows.
pub fn uv_rect(src: Rect, width: u32, height: u32) -> [f32; 4] {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    [
        src.x as f32 / w,
        src.y as f32 / h,
        (src.x as f32 + src.w as f32) / w,
        (src.y as f32 + src.h as f32) / h,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sprite_region_of_square_texture() {
        assert_eq!(uv_rect(Rect::new(0, 0, 20, 20), 20, 20), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn region_of_larger_texture() {
        assert_eq!(
            uv_rect(Rect::new(0, 0, 20, 20), 40, 80),
            [0.0, 0.0, 0.5, 0.25]
        );
    }

    #[test]
    fn region_beyond_small_texture_extends_past_one() {
        // Clamp-to-edge sampling stretches the border texels.
        let uv = uv_rect(Rect::new(0, 0, 20, 20), 10, 10);
        assert_eq!(uv, [0.0, 0.0, 2.0, 2.0]);
    }
}
