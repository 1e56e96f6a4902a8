//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::scene::Scene;
use super::shapes::tessellate;
use super::vertex::{Vertex, colors};

/// Map a playfield point to normalized device coordinates
///
/// The playfield is scaled uniformly to fit the surface and centered, so its
/// aspect ratio survives any surface shape. Playfield y grows downward.
pub fn playfield_to_ndc(point: Vec2, playfield: Vec2, surface: (u32, u32)) -> Vec2 {
    let surface = Vec2::new(surface.0.max(1) as f32, surface.1.max(1) as f32);
    let scale = (surface.x / playfield.x).min(surface.y / playfield.y);
    let offset = (point - playfield / 2.0) * scale;
    Vec2::new(offset.x / (surface.x / 2.0), -offset.y / (surface.y / 2.0))
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Playfield size for coordinate mapping
    pub playfield: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        playfield: Vec2,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fall-dodge-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder until the first frame uploads real geometry
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            playfield,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn upload(&mut self, scene: &Scene) {
        let vertices: Vec<Vertex> = scene
            .shapes()
            .flat_map(tessellate)
            .map(|v| {
                let ndc = playfield_to_ndc(
                    Vec2::new(v.position[0], v.position[1]),
                    self.playfield,
                    self.size,
                );
                Vertex::new(ndc.x, ndc.y, v.color)
            })
            .collect();

        self.vertex_count = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        if (bytes.len() as wgpu::BufferAddress) <= self.vertex_buffer.size() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        } else {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        }
    }

    /// Tessellate the scene's shapes and draw them over the background
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.upload(scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYFIELD: Vec2 = Vec2::new(600.0, 1200.0);

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_matching_aspect_fills_surface() {
        let size = (300, 600);
        assert!(close(playfield_to_ndc(Vec2::ZERO, PLAYFIELD, size), Vec2::new(-1.0, 1.0)));
        assert!(close(playfield_to_ndc(PLAYFIELD, PLAYFIELD, size), Vec2::new(1.0, -1.0)));
        assert!(close(
            playfield_to_ndc(PLAYFIELD / 2.0, PLAYFIELD, size),
            Vec2::ZERO
        ));
    }

    #[test]
    fn test_wide_surface_pillarboxes() {
        // Square surface: height limits, width shrinks to half
        let size = (1000, 1000);
        let top_left = playfield_to_ndc(Vec2::ZERO, PLAYFIELD, size);
        assert!(close(top_left, Vec2::new(-0.5, 1.0)));
    }

    #[test]
    fn test_tall_surface_letterboxes() {
        let size = (600, 2400);
        let bottom_right = playfield_to_ndc(PLAYFIELD, PLAYFIELD, size);
        assert!(close(bottom_right, Vec2::new(1.0, -0.5)));
    }

    #[test]
    fn test_zero_surface_does_not_divide_by_zero() {
        let ndc = playfield_to_ndc(Vec2::ZERO, PLAYFIELD, (0, 0));
        assert!(ndc.is_finite());
    }
}
