//! Vertex buffers for every drawable.
//!
//! Each mesh owns a position buffer (`vec3<f32>` per vertex) and a color buffer
//! (`vec4<f32>` per vertex). Uploads rewrite the buffers in place with
//! `queue.write_buffer`; a buffer is only reallocated when the new data no
//! longer fits.

use crate::drawable::{BufferUsage, Color, MeshId, Position};

/// Smallest allocation for dynamic meshes, in vertices.
const MIN_DYNAMIC_CAPACITY: u64 = 64;

const POSITION_STRIDE: u64 = std::mem::size_of::<Position>() as u64;
const COLOR_STRIDE: u64 = std::mem::size_of::<Color>() as u64;

/// Vertex capacity to allocate for `needed` vertices.
///
/// Static meshes are sized exactly. Dynamic meshes double until they fit.
pub(crate) fn grow_capacity(usage: BufferUsage, current: u64, needed: u64) -> u64 {
    match usage {
        BufferUsage::Static => needed,
        BufferUsage::Dynamic => {
            let mut capacity = current.max(MIN_DYNAMIC_CAPACITY);
            while capacity < needed {
                capacity *= 2;
            }
            capacity
        }
    }
}

pub(crate) struct GpuMesh {
    usage: BufferUsage,
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    /// Allocated vertices.
    capacity: u64,
    vertex_count: u32,
}

impl GpuMesh {
    /// Position and color buffers, `None` before the first non-empty upload.
    pub(crate) fn buffers(&self) -> Option<(&wgpu::Buffer, &wgpu::Buffer)> {
        self.buffers.as_ref().map(|(p, c)| (p, c))
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Slot map of GPU meshes addressed by [`MeshId`].
#[derive(Default)]
pub(crate) struct MeshArena {
    slots: Vec<Option<GpuMesh>>,
    free: Vec<u32>,
}

impl MeshArena {
    pub(crate) fn create(&mut self, usage: BufferUsage) -> MeshId {
        let mesh = GpuMesh {
            usage,
            buffers: None,
            capacity: 0,
            vertex_count: 0,
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(mesh);
                MeshId(index)
            }
            None => {
                self.slots.push(Some(mesh));
                MeshId(self.slots.len() as u32 - 1)
            }
        }
    }

    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: MeshId,
        positions: &[Position],
        colors: &[Color],
    ) {
        let Some(mesh) = self.slots.get_mut(id.index()).and_then(Option::as_mut) else {
            tracing::warn!(mesh = id.index(), "Upload to released mesh ignored");
            return;
        };

        mesh.vertex_count = positions.len() as u32;
        if positions.is_empty() {
            return;
        }

        let needed = positions.len() as u64;
        if mesh.buffers.is_none() || needed > mesh.capacity {
            let capacity = grow_capacity(mesh.usage, mesh.capacity, needed);
            mesh.buffers = Some((
                create_vertex_buffer(device, "Position Buffer", capacity * POSITION_STRIDE),
                create_vertex_buffer(device, "Color Buffer", capacity * COLOR_STRIDE),
            ));
            mesh.capacity = capacity;
        }

        if let Some((position_buffer, color_buffer)) = &mesh.buffers {
            queue.write_buffer(position_buffer, 0, bytemuck::cast_slice(positions));
            queue.write_buffer(color_buffer, 0, bytemuck::cast_slice(colors));
        }
    }

    pub(crate) fn destroy(&mut self, id: MeshId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if let Some(mesh) = slot.take() {
                if let Some((positions, colors)) = mesh.buffers {
                    positions.destroy();
                    colors.destroy();
                }
                self.free.push(id.0);
            }
        }
    }

    pub(crate) fn get(&self, id: MeshId) -> Option<&GpuMesh> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

fn create_vertex_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_capacity_is_exact() {
        assert_eq!(grow_capacity(BufferUsage::Static, 0, 42), 42);
        assert_eq!(grow_capacity(BufferUsage::Static, 100, 42), 42);
    }

    #[test]
    fn test_dynamic_capacity_doubles() {
        assert_eq!(grow_capacity(BufferUsage::Dynamic, 0, 1), 64);
        assert_eq!(grow_capacity(BufferUsage::Dynamic, 64, 65), 128);
        assert_eq!(grow_capacity(BufferUsage::Dynamic, 128, 1000), 1024);
    }
}
