use std::path::Path;

use crate::{data_structures::texture, error::SceneError};

/// Layout of a material bind group: colour texture, its sampler and the
/// material uniform.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &str, file_name: &str) -> Result<reqwest::Url, SceneError> {
    let load_error = |reason: String| SceneError::ResourceLoad {
        path: file_name.to_string(),
        reason,
    };
    let origin = web_sys::window()
        .ok_or_else(|| load_error("no browser window".to_string()))?
        .location()
        .origin()
        .map_err(|_| load_error("page origin is not readable".to_string()))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, asset_root.trim_matches('/')))
        .map_err(|e| load_error(e.to_string()))?;
    base.join(file_name).map_err(|e| load_error(e.to_string()))
}

/// Reads `<asset_root>/<file_name>`: from disk on native, over HTTP relative
/// to the page origin on the web.
pub async fn load_binary(asset_root: &str, file_name: &str) -> Result<Vec<u8>, SceneError> {
    let load_error = |reason: String| SceneError::ResourceLoad {
        path: file_name.to_string(),
        reason,
    };

    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| load_error(e.to_string()))?;
        response
            .bytes()
            .await
            .map_err(|e| load_error(e.to_string()))?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = Path::new(asset_root).join(file_name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| load_error(format!("{}: {e}", path.display())))?
    };

    Ok(data)
}

/// File extension of `file_name`, used as a decoding hint.
pub fn format_hint(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|ext| ext.to_str())
}

/// Decodes loaded bytes into a texture, reporting failures as resource errors.
pub fn decode_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bytes: &[u8],
    file_name: &str,
) -> Result<texture::Texture, SceneError> {
    texture::Texture::from_bytes(device, queue, bytes, file_name, format_hint(file_name)).map_err(
        |e| SceneError::ResourceLoad {
            path: file_name.to_string(),
            reason: e.to_string(),
        },
    )
}
