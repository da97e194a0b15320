use super::context::GpuContext;
use super::mesh::Mesh;
use super::pipeline::{BackgroundUniforms, RenderPipelines, Uniforms};
use crate::asset::ModelData;
use crate::scene::{Background, SceneContext, TextureData};
use glam::Mat4;

struct ModelMesh {
    mesh: Mesh,
    transform: Mat4,
    base_color: [f32; 4],
}

struct Panorama {
    bind_group: wgpu::BindGroup,
}

/// Draws one [`SceneContext`]: the backdrop, then the model's meshes.
pub struct SceneRenderer {
    pipelines: RenderPipelines,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_alignment: u32,
    capacity: usize,
    background_buffer: wgpu::Buffer,
    background_bind_group: wgpu::BindGroup,
    panorama: Option<Panorama>,
    clear_color: wgpu::Color,
    meshes: Vec<ModelMesh>,
}

impl SceneRenderer {
    pub fn new(context: &GpuContext, background: &Background) -> Self {
        let pipelines = RenderPipelines::new(context);
        let uniform_alignment = context.device.limits().min_uniform_buffer_offset_alignment;

        let capacity = 1;
        let uniform_buffer = Self::create_uniform_buffer(&context.device, uniform_alignment, capacity);
        let bind_group = pipelines.create_model_bind_group(&context.device, &uniform_buffer);

        let background_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Background Uniform Buffer"),
            size: std::mem::size_of::<BackgroundUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let background_bind_group = pipelines.create_background_bind_group(&context.device, &background_buffer);

        let mut renderer = Self {
            pipelines,
            uniform_buffer,
            bind_group,
            uniform_alignment,
            capacity,
            background_buffer,
            background_bind_group,
            panorama: None,
            clear_color: wgpu::Color::WHITE,
            meshes: Vec::new(),
        };
        renderer.set_background(context, background);
        renderer
    }

    fn align_to(size: u32, alignment: u32) -> u32 {
        (size + alignment - 1) & !(alignment - 1)
    }

    fn aligned_uniform_size(&self) -> u32 {
        Self::align_to(std::mem::size_of::<Uniforms>() as u32, self.uniform_alignment)
    }

    fn create_uniform_buffer(device: &wgpu::Device, alignment: u32, capacity: usize) -> wgpu::Buffer {
        let aligned_size = Self::align_to(std::mem::size_of::<Uniforms>() as u32, alignment);
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dynamic Uniform Buffer"),
            size: aligned_size as u64 * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn set_background(&mut self, context: &GpuContext, background: &Background) {
        match background {
            Background::Color(rgb) => {
                self.panorama = None;
                self.clear_color = clear_color(*rgb);
            }
            Background::Equirect(texture) => {
                self.panorama = Some(self.upload_panorama(context, texture));
            }
        }
    }

    fn upload_panorama(&self, context: &GpuContext, data: &TextureData) -> Panorama {
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Panorama Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Panorama Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Panorama {
            bind_group: self
                .pipelines
                .create_panorama_bind_group(&context.device, &view, &sampler),
        }
    }

    /// Replaces whatever model was uploaded before.
    pub fn upload_model(&mut self, context: &GpuContext, model: &ModelData) {
        self.meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(i, data)| ModelMesh {
                mesh: Mesh::from_data(&context.device, &format!("Model Mesh {i}"), &data.vertices, &data.indices),
                transform: data.transform,
                base_color: data.base_color,
            })
            .collect();

        if self.meshes.len() > self.capacity {
            self.capacity = self.meshes.len();
            self.uniform_buffer = Self::create_uniform_buffer(&context.device, self.uniform_alignment, self.capacity);
            self.bind_group = self
                .pipelines
                .create_model_bind_group(&context.device, &self.uniform_buffer);
        }
    }

    pub fn render(&self, context: &GpuContext, view: &wgpu::TextureView, scene: &SceneContext) {
        let camera = &scene.camera;
        let view_proj = camera.view_projection();

        if self.panorama.is_some() {
            let uniforms = BackgroundUniforms {
                inv_view_proj: view_proj.inverse().to_cols_array_2d(),
                camera_position: camera.position.extend(1.0).to_array(),
            };
            context
                .queue
                .write_buffer(&self.background_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let model_matrix = scene
            .model()
            .map(|model| model.transform.to_matrix())
            .unwrap_or(Mat4::IDENTITY);
        let radiance = scene.light.radiance();
        let aligned_size = self.aligned_uniform_size() as usize;

        let mut uniform_data = vec![0u8; aligned_size * self.meshes.len()];
        for (i, model_mesh) in self.meshes.iter().enumerate() {
            let [r, g, b, a] = model_mesh.base_color;
            let uniforms = Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
                model: (model_matrix * model_mesh.transform).to_cols_array_2d(),
                color: [r * radiance[0], g * radiance[1], b * radiance[2], a],
            };
            let offset = i * aligned_size;
            let bytes = bytemuck::bytes_of(&uniforms);
            uniform_data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        if !uniform_data.is_empty() {
            context.queue.write_buffer(&self.uniform_buffer, 0, &uniform_data);
        }

        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(context.color_attachment(view, self.clear_color))],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(panorama) = &self.panorama {
                render_pass.set_pipeline(&self.pipelines.background_pipeline);
                render_pass.set_bind_group(0, &self.background_bind_group, &[]);
                render_pass.set_bind_group(1, &panorama.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            if scene.model().is_some() {
                render_pass.set_pipeline(&self.pipelines.model_pipeline);
                for (i, model_mesh) in self.meshes.iter().enumerate() {
                    let offset = (i * aligned_size) as u32;
                    render_pass.set_bind_group(0, &self.bind_group, &[offset]);
                    model_mesh.mesh.draw(&mut render_pass);
                }
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Background colours are given in sRGB; the clear value is linear.
fn clear_color([r, g, b]: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: srgb_to_linear(r),
        g: srgb_to_linear(g),
        b: srgb_to_linear(b),
        a: 1.0,
    }
}

fn srgb_to_linear(c: f32) -> f64 {
    let c = f64::from(c.clamp(0.0, 1.0));
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
