//! GPU side of a [`Scene`].
//!
//! [`Viewer`] uploads a scene once: every distinct (geometry, material) pair
//! becomes one mesh and one instance buffer, so repeated parts such as the
//! stool legs are drawn with a single instanced call. Each frame only the
//! instance data that actually changed is rewritten.
//!
//! # Key types
//!
//! - [`Viewer`] owns the [`Context`] and all uploaded resources and
//!   implements [`Canvas`]
//! - [`Render`] collects what a frame draws, [`Instanced`] is one draw call

use std::{collections::HashMap, iter, sync::Arc};

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    assembly::Diorama,
    camera::Camera,
    config::ViewerConfig,
    context::Context,
    data_structures::{
        geometry::Geometry,
        instance::InstanceRaw,
        material::Material,
        model::{DrawModel, Mesh},
        scene_graph::{ObjectId, Scene},
        texture::{Texture, create_default_sampler},
    },
    error::SceneError,
    pipelines::basic::{MaterialUniform, mk_scene_pipeline},
    render_loop::Canvas,
    resources::{mesh::load_geometry, texture::decode_texture, texture::material_layout},
};

/// One instanced draw: a mesh, the material it is drawn with and
/// `amount` instances.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a Mesh,
    pub material: &'a wgpu::BindGroup,
    pub amount: u32,
}

/// What to draw in a frame.
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single instanced draw
/// - `Defaults(Vec<Instanced>)` renders a batch of them
/// - `Composed(Vec<Render>)` recursively renders a composition
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flattens the tree into draw order.
    pub(crate) fn collect(self, basics: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(basics)),
            Render::None => (),
        }
    }
}

/// A material on the GPU: its uniform plus the texture currently bound.
#[derive(Debug)]
struct GpuMaterial {
    uniform: wgpu::Buffer,
    #[allow(unused)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material: &Material,
        texture: Texture,
    ) -> Self {
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material Buffer", material.name)),
            contents: bytemuck::cast_slice(&[MaterialUniform::from(material)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = mk_material_bind_group(device, layout, &material.name, &texture, &uniform);
        Self {
            uniform,
            texture,
            bind_group,
        }
    }

    fn set_texture(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        texture: Texture,
    ) {
        self.bind_group = mk_material_bind_group(device, layout, name, &texture, &self.uniform);
        self.texture = texture;
    }
}

fn mk_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    name: &str,
    texture: &Texture,
    uniform: &wgpu::Buffer,
) -> wgpu::BindGroup {
    // Only depth textures come without a sampler
    let sampler = texture
        .sampler
        .clone()
        .unwrap_or_else(|| create_default_sampler(device));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform.as_entire_binding(),
            },
        ],
        label: Some(&format!("{name} material bind group")),
    })
}

/// Objects that share geometry and material.
#[derive(Debug)]
struct Batch {
    material: Arc<Material>,
    mesh: Mesh,
    members: Vec<ObjectId>,
    uploaded: Vec<InstanceRaw>,
    instance_buffer: wgpu::Buffer,
}

impl Batch {
    /// Rewrites the instance buffer if any member moved. Members that left
    /// the scene keep their last uploaded transform.
    fn sync(&mut self, queue: &wgpu::Queue, scene: &Scene) -> bool {
        let mut changed = false;
        for (raw, id) in self.uploaded.iter_mut().zip(&self.members) {
            if let Some(object) = scene.object(*id) {
                let current = object.transform.to_raw();
                if *raw != current {
                    *raw = current;
                    changed = true;
                }
            }
        }
        if changed {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.uploaded));
        }
        changed
    }
}

/// A scene uploaded to the GPU, ready to be drawn into the window.
#[derive(Debug)]
pub struct Viewer {
    pub(crate) ctx: Context,
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    materials: HashMap<String, GpuMaterial>,
    batches: Vec<Batch>,
}

impl Viewer {
    pub async fn new(
        window: Arc<Window>,
        config: &ViewerConfig,
        diorama: &Diorama,
    ) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config, &diorama.camera, &diorama.scene).await?;
        let material_layout = material_layout(&ctx.device);
        let pipeline = mk_scene_pipeline(
            &ctx.device,
            &ctx.config,
            &material_layout,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        );

        let mut viewer = Self {
            ctx,
            pipeline,
            material_layout,
            materials: HashMap::new(),
            batches: Vec::new(),
        };
        for material in diorama.registry.iter() {
            viewer.upload_material(material);
        }
        viewer.upload_scene(&diorama.scene);
        log::info!(
            "Uploaded {} objects in {} draw batches with {} materials",
            diorama.scene.object_count(),
            viewer.batches.len(),
            viewer.materials.len()
        );
        Ok(viewer)
    }

    fn upload_material(&mut self, material: &Material) {
        // White placeholder until the texture arrives; it is also the fallback
        let placeholder = Texture::solid_colour(
            &self.ctx.device,
            &self.ctx.queue,
            [255, 255, 255, 255],
            &format!("{} placeholder", material.name),
        );
        let gpu = GpuMaterial::new(&self.ctx.device, &self.material_layout, material, placeholder);
        self.materials.insert(material.name.clone(), gpu);
    }

    fn upload_scene(&mut self, scene: &Scene) {
        let mut groups: Vec<(&Geometry, &Arc<Material>, &str, Vec<ObjectId>, Vec<InstanceRaw>)> =
            Vec::new();
        for (id, object) in scene.objects() {
            let raw = object.transform.to_raw();
            match groups.iter_mut().find(|(geometry, material, ..)| {
                **geometry == object.geometry && Arc::ptr_eq(*material, &object.material)
            }) {
                Some((.., members, raws)) => {
                    members.push(id);
                    raws.push(raw);
                }
                None => groups.push((
                    &object.geometry,
                    &object.material,
                    object.name.as_str(),
                    vec![id],
                    vec![raw],
                )),
            }
        }

        let device = &self.ctx.device;
        for (geometry, material, name, members, uploaded) in groups {
            let Some(mesh) = load_geometry(device, name, geometry) else {
                continue;
            };
            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} Instance Buffer")),
                contents: bytemuck::cast_slice(&uploaded),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            self.batches.push(Batch {
                material: material.clone(),
                mesh,
                members,
                uploaded,
                instance_buffer,
            });
        }
    }

    /// Decodes `bytes` and binds them as the texture of `material`.
    pub fn apply_texture(
        &mut self,
        material: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<(), SceneError> {
        let texture = decode_texture(&self.ctx.device, &self.ctx.queue, bytes, path)?;
        let gpu = self
            .materials
            .get_mut(material)
            .ok_or_else(|| SceneError::Configuration(format!("material '{material}' is not uploaded")))?;
        gpu.set_texture(&self.ctx.device, &self.material_layout, material, texture);
        log::info!("Texture {path} bound to material '{material}'");
        Ok(())
    }

    pub fn window(&self) -> &Window {
        self.ctx.window()
    }

    pub fn request_redraw(&self) {
        self.ctx.window.request_redraw();
    }

    pub fn reconfigure(&mut self) {
        self.ctx.reconfigure();
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    fn on_render(&self) -> Render<'_> {
        Render::Composed(
            self.batches
                .iter()
                .filter_map(|batch| {
                    let material = self.materials.get(&batch.material.name)?;
                    Some(Render::Default(Instanced {
                        instance: &batch.instance_buffer,
                        mesh: &batch.mesh,
                        material: &material.bind_group,
                        amount: batch.members.len() as u32,
                    }))
                })
                .collect(),
        )
    }

    fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut basics: Vec<Instanced> = Vec::new();
            self.on_render().collect(&mut basics);

            render_pass.set_pipeline(&self.pipeline);
            for instanced in basics {
                if instanced.amount == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_mesh_instanced(
                    instanced.mesh,
                    instanced.material,
                    0..instanced.amount,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Canvas for Viewer {
    type Error = wgpu::SurfaceError;

    fn set_size(&mut self, width: u32, height: u32) {
        self.ctx.resize_surface(width, height);
    }

    /// Uploads the camera and any moved objects, then draws one frame.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error> {
        // Keep the frame scheduler going
        self.ctx.window.request_redraw();

        if !self.ctx.is_surface_configured() {
            return Ok(());
        }

        self.ctx.camera.write(&self.ctx.queue, camera);
        for batch in &mut self.batches {
            batch.sync(&self.ctx.queue, scene);
        }
        self.draw()
    }
}
