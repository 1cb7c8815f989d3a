use crate::dom::ListenerSet;
use glam::{Mat4, Vec3};
use showcase_core::constants::{SHADOW_MAP_SIZE, VIEWER_MAX_DRAW_ITEMS};
use showcase_core::viewer::{
    FrameView, GraphicsBackend, LightKind, MaterialDesc, MeshData, Vertex,
};
use showcase_core::ViewerError;
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;
use web_sys as web;

static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
static SHADOW_WGSL: &str = include_str!("../../shaders/shadow.wgsl");

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;
// dynamic uniform offsets must be 256-byte aligned
const MODEL_STRIDE: u64 = 256;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    eye_fog: [f32; 4],
    background: [f32; 4],
    ambient: [f32; 4],
    key_dir: [f32; 4],
    key_color: [f32; 4],
    fill_dir: [f32; 4],
    fill_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    color_rough: [f32; 4],
    params: [f32; 4],
}

impl From<&MaterialDesc> for MaterialUniform {
    fn from(m: &MaterialDesc) -> Self {
        Self {
            color_rough: m.color.extend(m.roughness).to_array(),
            params: [m.metalness, 0.0, 0.0, 0.0],
        }
    }
}

pub struct GpuGeometry {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

pub struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct Attachments {
    msaa: wgpu::Texture,
    msaa_view: wgpu::TextureView,
    depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl Attachments {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let (msaa, msaa_view) =
            render_texture(device, "msaa_color", width, height, format, MSAA_SAMPLES);
        let (depth, depth_view) =
            render_texture(device, "depth", width, height, DEPTH_FORMAT, MSAA_SAMPLES);
        Self {
            msaa,
            msaa_view,
            depth,
            depth_view,
        }
    }

    fn destroy(&self) {
        self.msaa.destroy();
        self.depth.destroy();
    }
}

fn render_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

fn uniform_entry(binding: u32, dynamic: Option<u64>) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic.is_some(),
            min_binding_size: dynamic.and_then(NonZeroU64::new),
        },
        count: None,
    }
}

/// Convert an sRGB colour to linear light, scaled by `intensity`.
fn linear(c: Vec3, intensity: f32) -> [f32; 4] {
    let l = c.powf(2.2) * intensity;
    [l.x, l.y, l.z, 0.0]
}

/// WebGPU renderer for the product viewer, drawing into a canvas it owns.
pub struct WebGpuBackend {
    canvas: web::HtmlCanvasElement,
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    attachments: Attachments,

    shadow_texture: wgpu::Texture,
    shadow_view: wgpu::TextureView,
    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    shadow_globals_bg: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bg: wgpu::BindGroup,
    material_bgl: wgpu::BindGroupLayout,

    scene_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,

    controls: ListenerSet,
    released: bool,
}

impl WebGpuBackend {
    pub async fn new(canvas: web::HtmlCanvasElement) -> Result<Self, ViewerError> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| ViewerError::Unsupported(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| ViewerError::Unsupported("no WebGPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("viewer_device"),
                },
                None,
            )
            .await
            .map_err(|e| ViewerError::Unsupported(format!("request_device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| ViewerError::Unsupported("surface has no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let attachments = Attachments::new(&device, format, width, height);

        // shadow map, sampled with depth comparison
        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        // bind group layouts
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[
                uniform_entry(0, None),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let shadow_globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_globals_bgl"),
            entries: &[uniform_entry(0, None)],
        });
        let model_size = std::mem::size_of::<ModelUniform>() as u64;
        let model_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bgl"),
            entries: &[uniform_entry(0, Some(model_size))],
        });
        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[uniform_entry(0, None)],
        });

        // buffers and bind groups
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_globals_bg"),
            layout: &shadow_globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("models"),
            size: MODEL_STRIDE * VIEWER_MAX_DRAW_ITEMS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bg"),
            layout: &model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: NonZeroU64::new(model_size),
                }),
            }],
        });

        // pipelines
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_WGSL.into()),
        });
        let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &model_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let shadow_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pl"),
            bind_group_layouts: &[&shadow_globals_bgl, &model_bgl],
            push_constant_ranges: &[],
        });
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_pl),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: MSAA_SAMPLES,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&shadow_pl),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: None,
            cache: None,
            multiview: None,
        });

        log::info!(
            "[viewer] WebGPU ready: {:?}, {}x{}",
            format,
            width,
            height
        );

        Ok(Self {
            canvas,
            surface: Some(surface),
            device,
            queue,
            config,
            attachments,
            shadow_texture,
            shadow_view,
            globals_buffer,
            globals_bg,
            shadow_globals_bg,
            model_buffer,
            model_bg,
            material_bgl,
            scene_pipeline,
            shadow_pipeline,
            controls: ListenerSet::new(),
            released: false,
        })
    }

    /// Pointer/wheel listeners torn down with the camera controls.
    pub fn controls_mut(&mut self) -> &mut ListenerSet {
        &mut self.controls
    }

    fn write_globals<G, M>(&self, frame: &FrameView<'_, G, M>) {
        let mut ambient = Vec3::ZERO;
        let mut key: Option<(Vec3, [f32; 4])> = None;
        let mut fill: Option<(Vec3, [f32; 4])> = None;
        for light in frame.lights {
            match light.kind {
                LightKind::Ambient => ambient += light.color.powf(2.2) * light.intensity,
                LightKind::Directional {
                    position,
                    cast_shadow,
                } => {
                    let entry = (position, linear(light.color, light.intensity));
                    if cast_shadow && key.is_none() {
                        key = Some(entry);
                    } else if fill.is_none() {
                        fill = Some(entry);
                    }
                }
            }
        }
        let (key_pos, key_color) = key.unwrap_or((Vec3::Y, [0.0; 4]));
        let (fill_pos, fill_color) = fill.unwrap_or((Vec3::Y, [0.0; 4]));
        let has_shadow = frame.shadow_view_proj.is_some();

        let g = Globals {
            view_proj: frame.view_proj.to_cols_array_2d(),
            light_view_proj: frame
                .shadow_view_proj
                .unwrap_or(Mat4::IDENTITY)
                .to_cols_array_2d(),
            eye_fog: frame.eye.extend(frame.fog_density).to_array(),
            background: frame.background.extend(1.0).to_array(),
            ambient: ambient.extend(if has_shadow { 1.0 } else { 0.0 }).to_array(),
            key_dir: key_pos.normalize_or_zero().extend(0.0).to_array(),
            key_color,
            fill_dir: fill_pos.normalize_or_zero().extend(0.0).to_array(),
            fill_color,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&g));
    }

    fn write_models<G, M>(&self, frame: &FrameView<'_, G, M>) {
        let mut data = vec![0u8; MODEL_STRIDE as usize * frame.items.len()];
        for (i, item) in frame.items.iter().enumerate() {
            let u = ModelUniform {
                model: item.model.to_cols_array_2d(),
                normal: item.model.inverse().transpose().to_cols_array_2d(),
                flags: [if item.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            };
            let start = i * MODEL_STRIDE as usize;
            let bytes = bytemuck::bytes_of(&u);
            data[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !data.is_empty() {
            self.queue.write_buffer(&self.model_buffer, 0, &data);
        }
    }
}

impl GraphicsBackend for WebGpuBackend {
    type Geometry = GpuGeometry;
    type Material = GpuMaterial;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GpuGeometry, ViewerError> {
        if mesh.vertices.is_empty() || mesh.vertices.len() > u16::MAX as usize {
            return Err(ViewerError::Resource {
                what: "geometry",
                reason: format!("{} vertices", mesh.vertices.len()),
            });
        }
        let vertices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertices"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        // u16 index data must be padded to 4 bytes
        let mut index_data: Vec<u16> = mesh.indices.clone();
        if index_data.len() % 2 == 1 {
            index_data.push(0);
        }
        let indices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_indices"),
                contents: bytemuck::cast_slice(&index_data),
                usage: wgpu::BufferUsages::INDEX,
            });
        Ok(GpuGeometry {
            vertices,
            indices,
            index_count: mesh.index_count(),
        })
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<GpuMaterial, ViewerError> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("material"),
                contents: bytemuck::bytes_of(&MaterialUniform::from(desc)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bg"),
            layout: &self.material_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Ok(GpuMaterial { buffer, bind_group })
    }

    fn update_material(&mut self, material: &GpuMaterial, desc: &MaterialDesc) {
        self.queue.write_buffer(
            &material.buffer,
            0,
            bytemuck::bytes_of(&MaterialUniform::from(desc)),
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.released || (width == self.config.width && height == self.config.height) {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
        self.attachments.destroy();
        self.attachments = Attachments::new(&self.device, self.config.format, width, height);
    }

    fn render(
        &mut self,
        frame: &FrameView<'_, GpuGeometry, GpuMaterial>,
    ) -> Result<(), ViewerError> {
        let Some(surface) = &self.surface else {
            return Err(ViewerError::Render("surface released".into()));
        };
        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(ViewerError::Render(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_globals(frame);
        self.write_models(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("viewer_encoder"),
            });

        if frame.shadow_view_proj.is_some() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.shadow_globals_bg, &[]);
            for (i, item) in frame.items.iter().enumerate() {
                if !item.cast_shadow {
                    continue;
                }
                pass.set_bind_group(1, &self.model_bg, &[(i as u64 * MODEL_STRIDE) as u32]);
                pass.set_vertex_buffer(0, item.geometry.vertices.slice(..));
                pass.set_index_buffer(item.geometry.indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..item.geometry.index_count, 0, 0..1);
            }
        }

        {
            let bg = frame.background.powf(2.2);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.attachments.msaa_view,
                    resolve_target: Some(&view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.x as f64,
                            g: bg.y as f64,
                            b: bg.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.attachments.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.globals_bg, &[]);
            for (i, item) in frame.items.iter().enumerate() {
                pass.set_bind_group(1, &self.model_bg, &[(i as u64 * MODEL_STRIDE) as u32]);
                pass.set_bind_group(2, &item.material.bind_group, &[]);
                pass.set_vertex_buffer(0, item.geometry.vertices.slice(..));
                pass.set_index_buffer(item.geometry.indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..item.geometry.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release_geometry(&mut self, geometry: GpuGeometry) {
        geometry.vertices.destroy();
        geometry.indices.destroy();
    }

    fn release_material(&mut self, material: GpuMaterial) {
        material.buffer.destroy();
    }

    fn release_controls(&mut self) {
        self.controls.clear();
    }

    fn release_renderer(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.surface = None;
        self.attachments.destroy();
        self.shadow_texture.destroy();
        self.globals_buffer.destroy();
        self.model_buffer.destroy();
        self.device.destroy();
    }

    fn detach_surface(&mut self) {
        self.canvas.remove();
    }
}
