//! wgpu implementation of `fg_core::RenderBackend`.
//!
//! `clear` starts a new quad batch, `copy` appends one quad per sprite, and
//! `present` streams the batch into GPU buffers and submits a single render
//! pass. Buffers grow (power-of-two) but never shrink.

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use fg_core::{Rect, RenderBackend};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::batch::QuadBatch;
use crate::camera::Camera2D;
use crate::error::RenderError;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

pub struct GpuSpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
    key: u64,
}

/// Handle stored in the texture cache. Frames in flight hold a clone until
/// `present` so the cache stays the only long-lived owner.
pub type SpriteTexture = Rc<GpuSpriteTexture>;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

pub struct SpriteRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    pipeline: SpritePipeline,
    camera: Camera2D,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    batch: QuadBatch<SpriteTexture>,
    next_texture_key: u64,
}

impl SpriteRenderer {
    /// `world_size` is the logical drawing area in pixels, independent of the
    /// physical surface size.
    pub fn new(window: Arc<Window>, world_size: (u32, u32)) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(window.clone())?;
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera = Camera2D::new(world_size.0, world_size.1);

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 4);
        let index_buffer = create_index_buffer(&gpu.device, 6);

        log::info!(
            "Sprite renderer ready: world {}x{}, surface {}x{} ({:?})",
            world_size.0,
            world_size.1,
            gpu.size.0,
            gpu.size.1,
            gpu.surface_format
        );

        Ok(Self {
            window,
            gpu,
            pipeline,
            camera,
            camera_buffer,
            camera_bind_group,
            vertex_buffer,
            index_buffer,
            mesh_vertex_capacity: 4,
            mesh_index_capacity: 6,
            batch: QuadBatch::new(),
            next_texture_key: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        log::info!("Surface resized to {}x{}", width, height);
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        if vertex_count > self.mesh_vertex_capacity {
            let new_capacity = vertex_count.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, new_capacity);
            self.mesh_vertex_capacity = new_capacity;
            log::debug!("Vertex buffer grown to {} vertices", new_capacity);
        }
        if index_count > self.mesh_index_capacity {
            let new_capacity = index_count.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, new_capacity);
            self.mesh_index_capacity = new_capacity;
            log::debug!("Index buffer grown to {} indices", new_capacity);
        }
    }

    fn upload_batch(&mut self) {
        self.ensure_mesh_capacity(self.batch.vertices.len(), self.batch.indices.len());
        if !self.batch.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.batch.vertices),
            );
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.batch.indices));
        }
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );
    }
}

impl RenderBackend for SpriteRenderer {
    type Texture = SpriteTexture;
    type Error = RenderError;

    fn load_texture(&mut self, path: &Path) -> Result<SpriteTexture, RenderError> {
        let texture = Texture::from_path(&self.gpu.device, &self.gpu.queue, path)?;
        let bind_group = self
            .pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        self.next_texture_key += 1;
        log::info!(
            "Texture '{}' uploaded ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(Rc::new(GpuSpriteTexture {
            texture,
            bind_group,
            key: self.next_texture_key,
        }))
    }

    fn clear(&mut self) {
        self.batch.clear();
    }

    fn copy(&mut self, texture: &SpriteTexture, src: Rect, dest: Rect) {
        let uv = texture.texture.uv_rect(src);
        self.batch.push_quad(Rc::clone(texture), texture.key, dest, uv);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let Some((output, view)) = self.gpu.begin_frame()? else {
            self.batch.clear();
            return Ok(());
        };

        self.upload_batch();

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !self.batch.is_empty() {
                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for draw in &self.batch.draw_calls {
                    render_pass.set_bind_group(1, &draw.texture.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        log::trace!(
            "Frame: {} quads in {} draw calls",
            self.batch.quad_count(),
            self.batch.draw_calls.len()
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        self.batch.clear();
        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
