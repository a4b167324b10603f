//! wgpu renderer for graph geometry and the orientation HUD

use crate::device::GpuContext;
use bytemuck::{Pod, Zeroable};
use graphview_core::{RenderableGraph, Result};
use nalgebra::Matrix4;
use std::sync::Arc;
use winit::window::Window;

/// Vertex data for graph and HUD rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GraphVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl GraphVertex {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GraphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
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

/// Uniform block shared by every draw: camera and model transforms
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct TransformUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(view_proj: Matrix4<f32>, model: Matrix4<f32>) -> Self {
        Self {
            view_proj: view_proj.into(),
            model: model.into(),
        }
    }
}

/// Matrices for one draw target (the graph or the HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view_proj: Matrix4<f32>,
    pub model: Matrix4<f32>,
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// sRGB background color
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    pub draw_points: bool,
    /// Normalized (xmin, ymin, xmax, ymax) with the origin at the bottom-left
    pub hud_viewport: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: [0.95, 0.95, 0.95, 1.0],
            enable_depth_test: true,
            draw_points: true,
            hud_viewport: [0.0, 0.0, 0.2, 0.2],
        }
    }
}

/// X, Y and Z shaft colors of the HUD axes (red, yellow, green)
pub const HUD_AXIS_COLORS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];

/// Unit axes from the origin as a line list
pub fn hud_axes_vertices() -> Vec<GraphVertex> {
    let mut vertices = Vec::with_capacity(6);
    for (axis, color) in HUD_AXIS_COLORS.iter().enumerate() {
        let mut tip = [0.0; 3];
        tip[axis] = 1.0;
        vertices.push(GraphVertex::new([0.0; 3], *color));
        vertices.push(GraphVertex::new(tip, *color));
    }
    vertices
}

/// Convert an sRGB channel to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert graph geometry to render vertices carrying the style color.
/// With `linear_output` the color is converted for an sRGB render target.
pub fn graph_to_vertices(graph: &RenderableGraph, linear_output: bool) -> Vec<GraphVertex> {
    let color = if linear_output {
        graph.style.color.map(srgb_to_linear)
    } else {
        graph.style.color
    };

    graph
        .points
        .iter()
        .map(|p| GraphVertex::new([p.x, p.y, p.z], color))
        .collect()
}

/// Pixel rectangle (x, y, width, height) of a normalized bottom-left viewport
/// on a target with a top-left origin
pub fn viewport_rect(viewport: [f32; 4], width: u32, height: u32) -> [f32; 4] {
    let [xmin, ymin, xmax, ymax] = viewport;
    let (w, h) = (width as f32, height as f32);
    [xmin * w, (1.0 - ymax) * h, (xmax - xmin) * w, (ymax - ymin) * h]
}

struct GraphBuffers {
    vertices: wgpu::Buffer,
    vertex_count: u32,
    indices: Option<(wgpu::Buffer, u32)>,
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Renders the graph (lines + points) and the HUD axes overlay into a window
pub struct GraphRenderer {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub config: RenderConfig,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    hud_buffer: wgpu::Buffer,
    hud_bind_group: wgpu::BindGroup,
    hud_axes: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    graph: Option<GraphBuffers>,
}

impl GraphRenderer {
    /// Create a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window.clone())?;
        let gpu_context = GpuContext::new(instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| graphview_core::Error::Gpu("Surface reports no formats".to_string()))?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let bind_group_layout =
            gpu_context
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                    label: Some("transform_bind_group_layout"),
                });

        let identity = TransformUniform::new(Matrix4::identity(), Matrix4::identity());
        let (scene_buffer, scene_bind_group) =
            Self::create_uniform(&gpu_context, &bind_group_layout, &identity, "Scene");
        let (hud_buffer, hud_bind_group) =
            Self::create_uniform(&gpu_context, &bind_group_layout, &identity, "HUD");

        let shader =
            gpu_context.create_shader_module("Graph Shader", include_str!("shaders/graph.wgsl"));

        let pipeline_layout =
            gpu_context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Graph Render Pipeline Layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

        let line_pipeline = Self::create_pipeline(
            &gpu_context,
            &pipeline_layout,
            &shader,
            surface_config.format,
            wgpu::PrimitiveTopology::LineList,
            config.enable_depth_test,
        );
        let point_pipeline = Self::create_pipeline(
            &gpu_context,
            &pipeline_layout,
            &shader,
            surface_config.format,
            wgpu::PrimitiveTopology::PointList,
            config.enable_depth_test,
        );

        let linear = surface_format.is_srgb();
        let axes: Vec<GraphVertex> = hud_axes_vertices()
            .into_iter()
            .map(|v| {
                let color = if linear { v.color.map(srgb_to_linear) } else { v.color };
                GraphVertex::new(v.position, color)
            })
            .collect();
        let hud_axes =
            gpu_context.create_buffer_init("HUD Axes Vertex Buffer", &axes, wgpu::BufferUsages::VERTEX);

        let depth_view = Self::create_depth_view(&gpu_context, &surface_config);

        Ok(Self {
            gpu_context,
            surface,
            surface_config,
            config,
            line_pipeline,
            point_pipeline,
            scene_buffer,
            scene_bind_group,
            hud_buffer,
            hud_bind_group,
            hud_axes,
            depth_view,
            graph: None,
        })
    }

    fn create_uniform(
        gpu_context: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        initial: &TransformUniform,
        label: &str,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu_context.create_buffer_init(
            &format!("{} Transform Buffer", label),
            std::slice::from_ref(initial),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let bind_group = gpu_context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some(&format!("{} Transform Bind Group", label)),
            });
        (buffer, bind_group)
    }

    fn create_pipeline(
        gpu_context: &GpuContext,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        enable_depth_test: bool,
    ) -> wgpu::RenderPipeline {
        gpu_context
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("Graph {:?} Pipeline", topology)),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: "vs_main",
                    buffers: &[GraphVertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: enable_depth_test,
                    depth_compare: if enable_depth_test {
                        wgpu::CompareFunction::LessEqual
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            })
    }

    fn create_depth_view(
        gpu_context: &GpuContext,
        surface_config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = gpu_context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: surface_config.width,
                height: surface_config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Upload graph geometry; replaces any previous graph
    pub fn set_graph(&mut self, graph: &RenderableGraph) {
        let vertices = graph_to_vertices(graph, self.surface_config.format.is_srgb());
        let indices = graph.line_indices();

        let vertex_buffer = self.gpu_context.create_buffer_init(
            "Graph Vertex Buffer",
            &vertices,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = (!indices.is_empty()).then(|| {
            let buffer = self.gpu_context.create_buffer_init(
                "Graph Index Buffer",
                &indices,
                wgpu::BufferUsages::INDEX,
            );
            (buffer, indices.len() as u32)
        });

        log::debug!(
            "Uploaded {} points and {} lines",
            vertices.len(),
            graph.line_count()
        );

        self.graph = Some(GraphBuffers {
            vertices: vertex_buffer,
            vertex_count: vertices.len() as u32,
            indices: index_buffer,
        });
    }

    /// Current surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface
                .configure(&self.gpu_context.device, &self.surface_config);
            self.depth_view = Self::create_depth_view(&self.gpu_context, &self.surface_config);
        }
    }

    /// Render one frame: the graph, then the HUD axes in their viewport
    pub fn render(&mut self, scene: &FrameMatrices, hud: &FrameMatrices) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface
                    .configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let queue = &self.gpu_context.queue;
        queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&TransformUniform::new(scene.view_proj, scene.model)),
        );
        queue.write_buffer(
            &self.hud_buffer,
            0,
            bytemuck::bytes_of(&TransformUniform::new(hud.view_proj, hud.model)),
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu_context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Graph Render Encoder"),
                });

        let background = self.background();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Graph Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(graph) = &self.graph {
                render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
                render_pass.set_vertex_buffer(0, graph.vertices.slice(..));

                if let Some((indices, count)) = &graph.indices {
                    render_pass.set_pipeline(&self.line_pipeline);
                    render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..*count, 0, 0..1);
                }

                if self.config.draw_points && graph.vertex_count > 0 {
                    render_pass.set_pipeline(&self.point_pipeline);
                    render_pass.draw(0..graph.vertex_count, 0..1);
                }
            }
        }

        {
            let mut hud_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let [x, y, w, h] = viewport_rect(
                self.config.hud_viewport,
                self.surface_config.width,
                self.surface_config.height,
            );
            if w >= 1.0 && h >= 1.0 {
                hud_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                hud_pass.set_pipeline(&self.line_pipeline);
                hud_pass.set_bind_group(0, &self.hud_bind_group, &[]);
                hud_pass.set_vertex_buffer(0, self.hud_axes.slice(..));
                hud_pass.draw(0..6, 0..1);
            }
        }

        self.gpu_context
            .queue
            .submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }

    fn background(&self) -> wgpu::Color {
        let [r, g, b, a] = self.config.background_color;
        let channel = |c: f64| {
            if self.surface_config.format.is_srgb() {
                srgb_to_linear(c as f32) as f64
            } else {
                c
            }
        };
        wgpu::Color {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a,
        }
    }
}
