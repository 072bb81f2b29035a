use crate::device::{GpuContext, DEPTH_FORMAT};
use bytemuck::{Pod, Zeroable};
use loanscape_core::{Color, Error, LineSegment, Result, Scene, BACKGROUND_COLOR};
use nalgebra::{Matrix4, Vector3};
use std::sync::Arc;
use winit::window::Window;

/// Per-point instance data. Each instance is expanded into a camera-facing
/// quad by the vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointInstance {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Endpoint of an axis or grid line
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
    pub point_style: [f32; 4],
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Edge length of a point quad in world units
    pub point_size: f32,
    pub point_opacity: f32,
    pub background_color: Color,
    /// Requested multisample count. Falls back to 1 when the surface format
    /// cannot be multisampled at this count.
    pub sample_count: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 1.75,
            point_opacity: 0.8,
            background_color: BACKGROUND_COLOR,
            sample_count: 4,
        }
    }
}

/// Use `requested` samples when supported, otherwise render single-sampled
pub fn resolve_sample_count(requested: u32, supported: impl Fn(u32) -> bool) -> u32 {
    if requested > 1 && supported(requested) {
        requested
    } else {
        1
    }
}

/// egui output to composite over the 3D frame
pub struct OverlayFrame<'a> {
    pub paint_jobs: &'a [egui::ClippedPrimitive],
    pub textures_delta: &'a egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Remaps nalgebra's OpenGL clip depth (-1..1) to wgpu's (0..1)
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Instance data for every point of the scene, in dataset order
pub fn point_instances(scene: &Scene) -> Vec<PointInstance> {
    scene
        .points
        .positions()
        .iter()
        .zip(scene.points.colors())
        .map(|(p, c)| PointInstance {
            position: [p.x, p.y, p.z],
            color: c.to_linear(),
        })
        .collect()
}

/// Two vertices per segment, for a line-list topology
pub fn line_vertices(segments: &[LineSegment]) -> Vec<LineVertex> {
    segments
        .iter()
        .flat_map(|s| {
            let color = s.color.to_linear();
            [
                LineVertex {
                    position: [s.start.x, s.start.y, s.start.z],
                    color,
                },
                LineVertex {
                    position: [s.end.x, s.end.y, s.end.z],
                    color,
                },
            ]
        })
        .collect()
}

struct SceneBuffers {
    points: Option<wgpu::Buffer>,
    point_count: u32,
    lines: Option<wgpu::Buffer>,
    line_vertex_count: u32,
}

/// Renders the uploaded scene and an optional egui overlay into a window
pub struct SceneRenderer {
    pub gpu_context: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    geometry: Option<SceneBuffers>,
    overlay_renderer: egui_wgpu::Renderer,
    config: RenderConfig,
}

impl SceneRenderer {
    /// Create a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let size = window.inner_size();
        let (gpu_context, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let format_features = gpu_context
            .adapter
            .get_texture_format_features(surface_config.format);
        let sample_count = resolve_sample_count(config.sample_count, |count| {
            format_features.flags.sample_count_supported(count)
        });
        if sample_count != config.sample_count {
            log::warn!(
                "{}x multisampling unsupported for {:?}, rendering without it",
                config.sample_count,
                surface_config.format
            );
        }

        let camera_uniform = CameraUniform {
            view_proj: Matrix4::identity().into(),
            right: [1.0, 0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0, 0.0],
            point_style: [config.point_size, config.point_opacity, 0.0, 0.0],
        };

        let camera_buffer = gpu_context.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let device = &gpu_context.device;
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let point_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            PipelineKind {
                label: "Point Render Pipeline",
                vertex_entry: "vs_point",
                fragment_entry: "fs_point",
                buffer: PointInstance::desc(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
            },
            surface_config.format,
            sample_count,
        );

        let line_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            PipelineKind {
                label: "Line Render Pipeline",
                vertex_entry: "vs_line",
                fragment_entry: "fs_line",
                buffer: LineVertex::desc(),
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::REPLACE,
            },
            surface_config.format,
            sample_count,
        );

        let overlay_renderer =
            egui_wgpu::Renderer::new(device, surface_config.format, None, 1);
        let (width, height) = (surface_config.width, surface_config.height);
        let depth_view = gpu_context.create_depth_view(width, height, sample_count);
        let msaa_view =
            gpu_context.create_msaa_view(width, height, surface_config.format, sample_count);

        Ok(Self {
            gpu_context,
            surface,
            surface_config,
            point_pipeline,
            line_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            depth_view,
            msaa_view,
            sample_count,
            geometry: None,
            overlay_renderer,
            config,
        })
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Multisample count actually in use
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Upload the static scene geometry. Replaces anything uploaded before.
    pub fn upload_scene(&mut self, scene: &Scene) {
        let instances = point_instances(scene);
        let lines = line_vertices(&scene.line_segments());

        let points = (!instances.is_empty()).then(|| {
            self.gpu_context.create_buffer_init(
                "Point Instance Buffer",
                &instances,
                wgpu::BufferUsages::VERTEX,
            )
        });
        let line_buffer = (!lines.is_empty()).then(|| {
            self.gpu_context
                .create_buffer_init("Line Vertex Buffer", &lines, wgpu::BufferUsages::VERTEX)
        });

        log::debug!(
            "Uploaded {} point instances and {} line vertices",
            instances.len(),
            lines.len()
        );

        self.geometry = Some(SceneBuffers {
            points,
            point_count: instances.len() as u32,
            lines: line_buffer,
            line_vertex_count: lines.len() as u32,
        });
    }

    /// Update the camera uniform. `right` and `up` orient the point quads.
    pub fn update_camera(
        &mut self,
        view_matrix: Matrix4<f32>,
        proj_matrix: Matrix4<f32>,
        right: Vector3<f32>,
        up: Vector3<f32>,
    ) {
        let view_proj = opengl_to_wgpu_matrix() * proj_matrix * view_matrix;
        self.camera_uniform.view_proj = view_proj.into();
        self.camera_uniform.right = [right.x, right.y, right.z, 0.0];
        self.camera_uniform.up = [up.x, up.y, up.z, 0.0];

        self.gpu_context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface
                .configure(&self.gpu_context.device, &self.surface_config);
            self.depth_view = self.gpu_context.create_depth_view(
                new_size.width,
                new_size.height,
                self.sample_count,
            );
            self.msaa_view = self.gpu_context.create_msaa_view(
                new_size.width,
                new_size.height,
                self.surface_config.format,
                self.sample_count,
            );
        }
    }

    /// Render one frame: axes and grid, then points, then the overlay
    pub fn render(&mut self, overlay: Option<&OverlayFrame<'_>>) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface
                    .configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {e:?}"))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu_context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Render Encoder"),
            });

        {
            let [r, g, b] = self.config.background_color.to_linear();
            // Multisampled frames resolve into the surface texture.
            let (target, resolve_target, store) = match &self.msaa_view {
                Some(msaa_view) => (msaa_view, Some(&view), wgpu::StoreOp::Discard),
                None => (&view, None, wgpu::StoreOp::Store),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            if let Some(geometry) = &self.geometry {
                if let Some(lines) = &geometry.lines {
                    render_pass.set_pipeline(&self.line_pipeline);
                    render_pass.set_vertex_buffer(0, lines.slice(..));
                    render_pass.draw(0..geometry.line_vertex_count, 0..1);
                }
                if let Some(points) = &geometry.points {
                    render_pass.set_pipeline(&self.point_pipeline);
                    render_pass.set_vertex_buffer(0, points.slice(..));
                    render_pass.draw(0..6, 0..geometry.point_count);
                }
            }
        }

        let mut command_buffers = match overlay {
            Some(overlay) => self.draw_overlay(&mut encoder, &view, overlay),
            None => Vec::new(),
        };
        command_buffers.push(encoder.finish());

        self.gpu_context.queue.submit(command_buffers);
        output.present();

        if let Some(overlay) = overlay {
            for id in &overlay.textures_delta.free {
                self.overlay_renderer.free_texture(id);
            }
        }

        Ok(())
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        overlay: &OverlayFrame<'_>,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: overlay.pixels_per_point,
        };

        for (id, delta) in &overlay.textures_delta.set {
            self.overlay_renderer
                .update_texture(&self.gpu_context.device, &self.gpu_context.queue, *id, delta);
        }
        let buffers = self.overlay_renderer.update_buffers(
            &self.gpu_context.device,
            &self.gpu_context.queue,
            encoder,
            overlay.paint_jobs,
            &screen,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.overlay_renderer
                .render(&mut render_pass, overlay.paint_jobs, &screen);
        }

        buffers
    }
}

struct PipelineKind<'a> {
    label: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    buffer: wgpu::VertexBufferLayout<'a>,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    kind: PipelineKind<'_>,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(kind.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: kind.vertex_entry,
            buffers: &[kind.buffer],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: kind.fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(kind.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: kind.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use loanscape_core::{Dataset, LoanStatus, Point3f, Record, APPROVED_COLOR, X_AXIS_COLOR};
    use nalgebra::Vector4;

    #[test]
    fn test_point_instances_follow_dataset_order() {
        let dataset = Dataset::from_records(vec![
            Record::new("A", 0.0, 0.0, 0.0, LoanStatus::Approved),
            Record::new("B", 10.0, 10.0, 10.0, LoanStatus::Rejected),
        ]);
        let scene = Scene::from_dataset(Arc::new(dataset));
        let instances = point_instances(&scene);

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].position, [-150.0, -100.0, -100.0]);
        assert_eq!(instances[0].color, APPROVED_COLOR.to_linear());
        assert_eq!(instances[1].position, [150.0, 100.0, 100.0]);
    }

    #[test]
    fn test_line_vertices_pairs() {
        let segments = [LineSegment::new(
            Point3f::new(-1.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            X_AXIS_COLOR,
        )];
        let vertices = line_vertices(&segments);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [-1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[0].color, vertices[1].color);
    }

    #[test]
    fn test_sample_count_falls_back_when_unsupported() {
        assert_eq!(RenderConfig::default().sample_count, 4);
        assert_eq!(resolve_sample_count(4, |n| n == 4), 4);
        assert_eq!(resolve_sample_count(4, |n| n == 1), 1);
        assert_eq!(resolve_sample_count(1, |_| true), 1);
        assert_eq!(resolve_sample_count(0, |_| true), 1);
    }

    #[test]
    fn test_depth_remap() {
        let m = opengl_to_wgpu_matrix();
        let near = m * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(near.z, 0.0);
        assert_relative_eq!(far.z, 1.0);
    }

    #[test]
    fn test_uniform_layout_is_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<PointInstance>(), 24);
    }
}
