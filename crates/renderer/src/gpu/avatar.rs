use std::path::{Path, PathBuf};

use image::GenericImageView;
use wgpu::util::{DeviceExt, TextureDataOrder};

/// Why the avatar asset could not be turned into a particle field.
///
/// Any of these is terminal for the render session: the field is never
/// constructed and every frame becomes a no-op. The reason is logged once at
/// start-up; the windowed host additionally treats it as a fatal
/// configuration error.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("failed to open avatar image at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("avatar image at {} has a zero dimension ({width}x{height})", path.display())]
    ZeroDimension { path: PathBuf, width: u32, height: u32 },
}

/// GPU-resident avatar image plus the fixed sampler the fragment stage uses.
///
/// Immutable after load; lives for the renderer's lifetime.
pub(crate) struct AvatarTexture {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

/// Decodes the avatar image and uploads it as an RGBA8 texture.
///
/// The texture keeps its stored (gamma-encoded) values and is sampled raw;
/// no vertical flip is applied, so texture rows follow the source scan order
/// the particle grid was built from.
pub(crate) fn load_avatar(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<AvatarTexture, AvatarError> {
    let image = image::open(path).map_err(|source| AvatarError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AvatarError::ZeroDimension {
            path: path.to_path_buf(),
            width,
            height,
        });
    }
    let rgba = image.to_rgba8();

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("avatar texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &rgba,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    Ok(AvatarTexture {
        _texture: texture,
        view,
        sampler,
        width,
        height,
    })
}
