use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::Geometry,
    model::{Mesh, MeshData},
};

/// Uploads tessellated geometry. Returns `None` for empty meshes, which wgpu
/// refuses to bind.
pub fn upload_mesh(device: &wgpu::Device, name: &str, data: &MeshData) -> Option<Mesh> {
    if data.indices.is_empty() {
        log::warn!("Mesh {name} has no triangles and is not uploaded");
        return None;
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Vertex Buffer")),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Index Buffer")),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Some(Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: data.indices.len() as u32,
    })
}

pub fn load_geometry(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Option<Mesh> {
    upload_mesh(device, name, &geometry.tessellate())
}
