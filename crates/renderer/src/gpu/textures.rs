//! Texture promotion for host images.
//!
//! Each discovered image owns one slot that starts out pending and resolves
//! to a [`TextureRecord`] exactly once, whenever the host reports its load
//! completion. Resolution is idempotent per image: duplicate completions are
//! ignored rather than producing a second texture. Slots that never resolve
//! are simply absent from the draw set; nothing waits on them.

use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::gpu::pipeline::QuadPipeline;
use crate::gpu::uniforms::QuadUniforms;
use crate::host::{ImageId, LoadedImage};

/// GPU-resident copy of a host image plus its per-draw resources.
pub(crate) struct TextureRecord {
    pub image: ImageId,
    pub natural_width: u32,
    pub natural_height: u32,
    _texture: wgpu::Texture,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub texture_bind_group: wgpu::BindGroup,
}

/// Tracks which image slots have resolved; the idempotence gate.
#[derive(Debug, Clone)]
pub(crate) struct PendingSet {
    resolved: Vec<bool>,
}

impl PendingSet {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            resolved: vec![false; count],
        }
    }

    /// Claims the slot for resolution. Returns false when the slot is out of
    /// range or has already resolved, in which case the caller must not
    /// create another texture.
    pub(crate) fn try_resolve(&mut self, index: usize) -> bool {
        match self.resolved.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_resolved(&self, index: usize) -> bool {
        self.resolved.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn resolved_count(&self) -> usize {
        self.resolved.iter().filter(|slot| **slot).count()
    }
}

/// Owns the sampler and the per-image texture slots.
pub(crate) struct TextureLoader {
    pending: PendingSet,
    records: Vec<Option<TextureRecord>>,
    sampler: wgpu::Sampler,
}

impl TextureLoader {
    pub(crate) fn new(device: &wgpu::Device, image_count: usize) -> Self {
        // Images are assumed non-power-of-two sized: clamp on both axes,
        // linear filtering in both directions.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("photowall sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pending: PendingSet::new(image_count),
            records: (0..image_count).map(|_| None).collect(),
            sampler,
        }
    }

    /// Promotes a completed image load into a texture record, reporting
    /// whether a new record was created. A duplicate completion for an
    /// already-resolved image is logged and dropped.
    pub(crate) fn resolve(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &QuadPipeline,
        loaded: LoadedImage,
    ) -> bool {
        let index = loaded.image_index();
        if loaded.width == 0 || loaded.height == 0 {
            tracing::warn!(image = index, "ignoring image with zero extent");
            return false;
        }
        let expected = loaded.width as usize * loaded.height as usize * 4;
        if loaded.pixels.len() != expected {
            tracing::warn!(
                image = index,
                expected,
                actual = loaded.pixels.len(),
                "ignoring image with malformed pixel payload"
            );
            return false;
        }
        if !self.pending.try_resolve(index) {
            tracing::debug!(image = index, "duplicate load completion ignored");
            return false;
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(&format!("image texture #{index}")),
                size: wgpu::Extent3d {
                    width: loaded.width,
                    height: loaded.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &loaded.pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("image uniforms #{index}")),
            contents: bytemuck::bytes_of(&QuadUniforms::new()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("image uniform bind group #{index}")),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("image texture bind group #{index}")),
            layout: &pipeline.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let record = TextureRecord {
            image: loaded.id,
            natural_width: loaded.width,
            natural_height: loaded.height,
            _texture: texture,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
        };
        tracing::info!(
            image = index,
            width = record.natural_width,
            height = record.natural_height,
            "promoted image to texture"
        );
        self.records[index] = Some(record);
        true
    }

    /// Resolved records in discovery order; pending slots are skipped.
    pub(crate) fn resolved(&self) -> impl Iterator<Item = (usize, &TextureRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }

    pub(crate) fn resolved_count(&self) -> usize {
        self.pending.resolved_count()
    }
}

impl LoadedImage {
    fn image_index(&self) -> usize {
        self.id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolving_twice_claims_the_slot_once() {
        let mut set = PendingSet::new(3);
        assert!(set.try_resolve(1));
        assert!(!set.try_resolve(1), "second completion must be a no-op");
        assert!(set.is_resolved(1));
        assert_eq!(set.resolved_count(), 1);
    }

    #[test]
    fn out_of_range_slots_never_resolve() {
        let mut set = PendingSet::new(2);
        assert!(!set.try_resolve(2));
        assert!(!set.is_resolved(2));
    }

    #[test]
    fn only_first_completions_count_as_new_promotions() {
        // The reactive policy arms a redraw only when a poll actually
        // promoted something; duplicates must not re-arm it.
        let mut set = PendingSet::new(2);
        let claims = [set.try_resolve(0), set.try_resolve(0), set.try_resolve(1)];
        let promoted = claims.iter().filter(|claimed| **claimed).count();
        assert_eq!(promoted, 2);
    }

    #[test]
    fn unresolved_slots_stay_out_of_the_draw_set() {
        let mut set = PendingSet::new(4);
        set.try_resolve(0);
        set.try_resolve(2);
        let drawn: Vec<usize> = (0..4).filter(|&index| set.is_resolved(index)).collect();
        // Discovery order, stalled images simply absent.
        assert_eq!(drawn, [0, 2]);
    }
}
