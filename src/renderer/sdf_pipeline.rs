//! SDF-based WebGPU render pipeline
//!
//! Draws the whole scene in the fragment shader: a filled circle for the
//! ball and a capsule for the paddle, on a white background.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::sim::Snapshot;
use crate::tuning::Tuning;

// ============================================================================
// GPU DATA STRUCTURES (must match scene.wgsl)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    resolution: [f32; 2], // offset 0, physical pixels
    scale: f32,           // offset 8, device pixel ratio
    has_bat: f32,         // offset 12
    ball: [f32; 4],       // offset 16: x, y, size, unused (CSS px)
    bat: [f32; 4],        // offset 32: x, top, width, height (CSS px)
}

impl SceneUniform {
    /// Build the uniform for one frame.
    ///
    /// The paddle is drawn `bat_bottom_inset` above the bottom edge rather
    /// than at its simulated y.
    pub fn from_snapshot(snapshot: &Snapshot, tuning: &Tuning, size: (u32, u32), scale: f32) -> Self {
        let ball = snapshot.ball;
        let (has_bat, bat) = match snapshot.bat {
            Some(bat) => (
                1.0,
                [
                    bat.pos.x,
                    snapshot.bounds.height - tuning.bat_bottom_inset,
                    bat.size,
                    tuning.bat_height(),
                ],
            ),
            None => (0.0, [0.0; 4]),
        };

        Self {
            resolution: [size.0 as f32, size.1 as f32],
            scale,
            has_bat,
            ball: [ball.pos.x, ball.pos.y, ball.size, 0.0],
            bat,
        }
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    /// Device pixel ratio
    pub scale: f32,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        scale: f32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::debug!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene"),
            contents: bytemuck::bytes_of(&SceneUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene_buffer,
            bind_group,
            size: (width, height),
            scale,
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

    /// Upload the snapshot and draw one frame
    pub fn render(&mut self, snapshot: &Snapshot, tuning: &Tuning) -> Result<(), wgpu::SurfaceError> {
        let scene = SceneUniform::from_snapshot(snapshot, tuning, self.size, self.scale);
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Ball, Bat, Bounds, SessionState};
    use glam::Vec2;

    fn snapshot(bat: Option<Bat>) -> Snapshot {
        Snapshot {
            bounds: Bounds::new(400.0, 800.0),
            ball: Ball {
                pos: Vec2::new(10.0, 20.0),
                vel: Vec2::new(0.1, 0.1),
                size: 50.0,
            },
            bat,
            state: SessionState::default(),
        }
    }

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 48);
    }

    #[test]
    fn test_bat_drawn_above_bottom_edge() {
        let bat = Bat {
            pos: Vec2::new(150.0, 800.0),
            size: 100.0,
        };
        let u = SceneUniform::from_snapshot(&snapshot(Some(bat)), &Tuning::default(), (800, 1600), 2.0);
        assert_eq!(u.resolution, [800.0, 1600.0]);
        assert_eq!(u.scale, 2.0);
        assert_eq!(u.has_bat, 1.0);
        assert_eq!(u.ball, [10.0, 20.0, 50.0, 0.0]);
        assert_eq!(u.bat[0], 150.0);
        assert_eq!(u.bat[1], 764.0);
        assert_eq!(u.bat[2], 100.0);
        assert!((u.bat[3] - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_bat_variant() {
        let u = SceneUniform::from_snapshot(&snapshot(None), &Tuning::default(), (400, 800), 1.0);
        assert_eq!(u.has_bat, 0.0);
        assert_eq!(u.bat, [0.0; 4]);
    }
}
