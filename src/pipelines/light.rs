use cgmath::{Vector3, Zero};
use wgpu::util::DeviceExt;

use crate::data_structures::scene_graph::{LightKind, LightSource, Scene};

/// Upper bound of point and directional lights the shader iterates over.
pub const MAX_LIGHTS: usize = 8;

/// One point or directional light as the shader sees it.
///
/// `position.w` is 1 for point lights and 0 for directional ones, whose
/// `position` is the direction the light comes from. `colour.w` holds the
/// point light's range, 0 meaning unbounded.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    pub colour: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
    pub count: u32,
    // Uniforms require 16 byte (4 float) spacing
    _padding: [u32; 3],
}

fn scaled(colour: [f32; 3], intensity: f32) -> [f32; 3] {
    colour.map(|c| c * intensity)
}

impl LightsUniform {
    /// Ambient lights are summed, the rest fill the light array in scene
    /// order. Lights beyond [`MAX_LIGHTS`] are dropped with a warning.
    pub fn from_lights<'a>(lights: impl IntoIterator<Item = &'a LightSource>) -> Self {
        let mut uniform = Self {
            ambient: [0.0; 4],
            lights: [GpuLight::default(); MAX_LIGHTS],
            count: 0,
            _padding: [0; 3],
        };
        for light in lights {
            let [r, g, b] = scaled(light.colour, light.intensity);
            let (w, position) = match light.kind {
                LightKind::Ambient => {
                    uniform.ambient[0] += r;
                    uniform.ambient[1] += g;
                    uniform.ambient[2] += b;
                    continue;
                }
                LightKind::Point => (1.0, light.position.unwrap_or_else(Vector3::zero)),
                LightKind::Directional => (0.0, light.position.unwrap_or_else(Vector3::unit_y)),
            };
            let slot = uniform.count as usize;
            if slot == MAX_LIGHTS {
                log::warn!("Only {MAX_LIGHTS} lights are supported, ignoring {:?}", light.kind);
                continue;
            }
            uniform.lights[slot] = GpuLight {
                position: [position.x, position.y, position.z, w],
                colour: [r, g, b, light.distance.unwrap_or(0.0)],
            };
            uniform.count += 1;
        }
        uniform
    }

    pub fn from_scene(scene: &Scene) -> Self {
        Self::from_lights(scene.lights())
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let uniform = LightsUniform::from_scene(scene);
        let buffer = mk_buffer(device, &uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, uniform: &LightsUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Lights Buffer"),
        contents: bytemuck::cast_slice(std::slice::from_ref(uniform)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("lights_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("lights_bind_group"),
    })
}
