//! wgpu renderer.
//!
//! [`GpuState`] owns the surface, the two line pipelines and every mesh buffer.
//! It implements [`MeshStore`], so the frame driver uploads geometry straight
//! into GPU buffers, and then [`GpuState::render`] replays the frame's draw list.
//!
//! Bind groups:
//! - group 0: `{ projection, model }`, written once per frame
//! - group 1: `{ scale }`, one slot per distinct scale in the frame, selected
//!   per draw with a dynamic offset

mod egui_integration;
mod mesh;
pub mod shaders;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tracing::info;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use egui_integration::{EguiFrameOutput, EguiIntegration};

use crate::drawable::{BufferUsage, Color, DrawList, MeshId, MeshStore, Position, Topology};
use crate::driver::Frame;
use crate::error::GpuError;
use mesh::MeshArena;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scale slots allocated up front; grows if a frame uses more distinct scales.
const INITIAL_DRAW_SLOTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    scale: f32,
    _padding: [f32; 3],
}

const DRAW_UNIFORMS_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

/// Distinct scales in first-use order, and the slot each command uses.
pub(crate) fn assign_scale_slots(draws: &DrawList) -> (Vec<f32>, Vec<usize>) {
    let mut scales: Vec<f32> = Vec::new();
    let slots = draws
        .iter()
        .map(|cmd| {
            let scale = cmd.params.scale;
            match scales.iter().position(|s| s.to_bits() == scale.to_bits()) {
                Some(slot) => slot,
                None => {
                    scales.push(scale);
                    scales.len() - 1
                }
            }
        })
        .collect();
    (scales, slots)
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    line_list_pipeline: wgpu::RenderPipeline,
    line_strip_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    draw_bind_group_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_slot_stride: u64,
    draw_slots: usize,
    depth_texture: wgpu::TextureView,
    meshes: MeshArena,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        // Fail on a broken stage before touching the device.
        shaders::validate_program(shaders::VERTEX_SOURCE, shaders::FRAGMENT_SOURCE)?;

        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(adapter = %adapter_info.name, backend = ?adapter_info.backend, "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Translucent grid lines should add up linearly, as in a plain framebuffer.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::IncompatibleSurface)?;
        info!(format = ?surface_format, "Surface format");

        let config = wgpu::SurfaceConfiguration {
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
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms {
                projection: identity,
                model: identity,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
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
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let draw_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Params Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(DRAW_UNIFORMS_SIZE),
                },
                count: None,
            }],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_slot_stride = wgpu::util::align_to(DRAW_UNIFORMS_SIZE, alignment);
        let (draw_buffer, draw_bind_group) = create_draw_slots(
            &device,
            &draw_bind_group_layout,
            draw_slot_stride,
            INITIAL_DRAW_SLOTS,
        );

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::VERTEX_SOURCE.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::FRAGMENT_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &draw_bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_list_pipeline = create_line_pipeline(
            &device,
            &pipeline_layout,
            &vertex_module,
            &fragment_module,
            config.format,
            wgpu::PrimitiveTopology::LineList,
        );
        let line_strip_pipeline = create_line_pipeline(
            &device,
            &pipeline_layout,
            &vertex_module,
            &fragment_module,
            config.format,
            wgpu::PrimitiveTopology::LineStrip,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            line_list_pipeline,
            line_strip_pipeline,
            scene_buffer,
            scene_bind_group,
            draw_bind_group_layout,
            draw_buffer,
            draw_bind_group,
            draw_slot_stride,
            draw_slots: INITIAL_DRAW_SLOTS,
            depth_texture,
            meshes: MeshArena::default(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Number of live meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
        }
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, &self.config);
    }

    fn write_uniforms(&mut self, frame: &Frame, scales: &[f32]) {
        let scene = SceneUniforms {
            projection: frame.projection.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
        };
        self.queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        if scales.len() > self.draw_slots {
            let slots = scales.len().next_power_of_two();
            let (buffer, bind_group) =
                create_draw_slots(&self.device, &self.draw_bind_group_layout, self.draw_slot_stride, slots);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_slots = slots;
        }

        let stride = self.draw_slot_stride as usize;
        let mut data = vec![0u8; stride * scales.len()];
        for (i, &scale) in scales.iter().enumerate() {
            let params = DrawUniforms {
                scale,
                _padding: [0.0; 3],
            };
            data[i * stride..i * stride + DRAW_UNIFORMS_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&params));
        }
        if !data.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &data);
        }
    }

    /// Execute one frame, then draw the control panel on top if given.
    pub fn render(
        &mut self,
        frame: &Frame,
        mut ui: Option<(&mut EguiIntegration, &EguiFrameOutput)>,
    ) -> Result<(), wgpu::SurfaceError> {
        let (scales, slots) = assign_scale_slots(&frame.draws);
        self.write_uniforms(frame, &scales);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: ui.as_ref().map_or(1.0, |(_, out)| out.pixels_per_point),
        };
        if let Some((egui, out)) = ui.as_mut() {
            egui.prepare(&self.device, &self.queue, &mut encoder, *out, &screen);
        }

        // Scene pass
        {
            let [r, g, b, a] = frame.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let vp = frame.viewport;
            let fits = vp.x + vp.width <= self.config.width && vp.y + vp.height <= self.config.height;
            if !vp.is_empty() && fits {
                render_pass.set_viewport(
                    vp.x as f32,
                    vp.y as f32,
                    vp.width as f32,
                    vp.height as f32,
                    0.0,
                    1.0,
                );
                render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

                for (cmd, slot) in frame.draws.iter().zip(slots) {
                    let Some(mesh) = self.meshes.get(cmd.mesh) else {
                        continue;
                    };
                    let Some((positions, colors)) = mesh.buffers() else {
                        continue;
                    };
                    let count = cmd.vertex_count.min(mesh.vertex_count());
                    if count == 0 {
                        continue;
                    }

                    let pipeline = match cmd.topology {
                        Topology::LineList => &self.line_list_pipeline,
                        Topology::LineStrip => &self.line_strip_pipeline,
                    };
                    let offset = (slot as u64 * self.draw_slot_stride) as wgpu::DynamicOffset;
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                    render_pass.set_vertex_buffer(0, positions.slice(..));
                    render_pass.set_vertex_buffer(1, colors.slice(..));
                    render_pass.draw(0..count, 0..1);
                }
            }
        }

        // UI pass
        if let Some((egui, out)) = ui.as_mut() {
            let mut ui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("UI Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            egui.render(&mut ui_pass, *out, &screen);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some((egui, out)) = ui {
            egui.cleanup(out);
        }

        Ok(())
    }
}

impl MeshStore for GpuState {
    fn create_mesh(&mut self, usage: BufferUsage) -> MeshId {
        self.meshes.create(usage)
    }

    fn upload(&mut self, mesh: MeshId, positions: &[Position], colors: &[Color]) {
        self.meshes.upload(&self.device, &self.queue, mesh, positions, colors);
    }

    fn destroy_mesh(&mut self, mesh: MeshId) {
        self.meshes.destroy(mesh);
    }
}

fn create_draw_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Params Buffer"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Params Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(DRAW_UNIFORMS_SIZE),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_line_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    // src * alpha + dst
    let additive = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match topology {
            wgpu::PrimitiveTopology::LineStrip => "Line Strip Pipeline",
            _ => "Line List Pipeline",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some(shaders::VERTEX_ENTRY),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Position>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Color>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x4,
                    }],
                },
            ],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some(shaders::FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::{DrawCommand, DrawParams};

    fn command(index: u32, scale: f32) -> DrawCommand {
        DrawCommand {
            mesh: MeshId(index),
            topology: Topology::LineList,
            vertex_count: 2,
            params: DrawParams::with_scale(scale),
        }
    }

    #[test]
    fn test_scale_slots_are_shared() {
        let mut draws = DrawList::new();
        for (i, scale) in [1.0, 1.0, 0.1, 0.1, 1.0].into_iter().enumerate() {
            draws.push(command(i as u32, scale));
        }
        let (scales, slots) = assign_scale_slots(&draws);
        assert_eq!(scales, vec![1.0, 0.1]);
        assert_eq!(slots, vec![0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_empty_draw_list_needs_no_slots() {
        let (scales, slots) = assign_scale_slots(&DrawList::new());
        assert!(scales.is_empty());
        assert!(slots.is_empty());
    }

    #[test]
    fn test_draw_uniforms_fit_binding() {
        assert_eq!(DRAW_UNIFORMS_SIZE, 16);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 128);
    }
}
