//! Drawable primitives and the seam between scene geometry and the GPU.
//!
//! A [`Drawable`] owns a handle to a pair of vertex buffers (positions and
//! per-vertex colors) living in a [`MeshStore`], plus the line topology used to
//! draw them. Drawing does not talk to the GPU directly: it records a
//! [`DrawCommand`] into a [`DrawList`], which the renderer replays inside a
//! render pass. Each command carries its own [`DrawParams`], so the scale used by
//! one draw never leaks into the next.
//!
//! The wgpu renderer implements [`MeshStore`] with real buffers;
//! [`MemoryMeshStore`] keeps everything on the CPU and is what tests and
//! benchmarks use.

/// Vertex position, three floats per vertex.
pub type Position = [f32; 3];

/// RGBA color in `[0, 1]`, four floats per vertex.
pub type Color = [f32; 4];

/// How consecutive vertices are joined into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every pair of vertices is an independent segment.
    LineList,
    /// Every vertex connects to the previous one.
    LineStrip,
}

/// Performance hint describing how often a mesh is re-uploaded.
///
/// Has no observable effect on what gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Uploaded once at startup (grids, axes).
    Static,
    /// Re-uploaded every frame (tracers).
    Dynamic,
}

/// Handle to a mesh owned by a [`MeshStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub(crate) u32);

impl MeshId {
    /// Slot index inside the owning store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Backend storage for vertex buffers.
pub trait MeshStore {
    /// Allocate an empty mesh.
    fn create_mesh(&mut self, usage: BufferUsage) -> MeshId;

    /// Replace the contents of both buffers of `mesh`.
    ///
    /// `positions` and `colors` always have the same length.
    fn upload(&mut self, mesh: MeshId, positions: &[Position], colors: &[Color]);

    /// Release the buffers of `mesh`. The id must not be used afterwards.
    fn destroy_mesh(&mut self, mesh: MeshId);
}

/// Per-draw render parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Uniform scale applied to vertex positions before the model transform.
    pub scale: f32,
}

impl DrawParams {
    pub fn with_scale(scale: f32) -> Self {
        Self { scale }
    }
}

impl Default for DrawParams {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub topology: Topology,
    pub vertex_count: u32,
    pub params: DrawParams,
}

/// Ordered draw calls for one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// A mesh handle plus the state needed to draw it.
#[derive(Debug)]
pub struct Drawable {
    mesh: MeshId,
    topology: Topology,
    usage: BufferUsage,
    vertex_count: u32,
}

impl Drawable {
    /// Allocate an empty drawable in `store`.
    pub fn new<S: MeshStore + ?Sized>(store: &mut S, topology: Topology, usage: BufferUsage) -> Self {
        let mesh = store.create_mesh(usage);
        Self {
            mesh,
            topology,
            usage,
            vertex_count: 0,
        }
    }

    /// Push both buffers to the backend.
    pub fn upload<S: MeshStore + ?Sized>(&mut self, store: &mut S, positions: &[Position], colors: &[Color]) {
        debug_assert_eq!(
            positions.len(),
            colors.len(),
            "position and color buffers must stay congruent"
        );
        store.upload(self.mesh, positions, colors);
        self.vertex_count = positions.len() as u32;
    }

    /// Record a draw call. Empty drawables record nothing.
    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        if self.vertex_count == 0 {
            return;
        }
        list.push(DrawCommand {
            mesh: self.mesh,
            topology: self.topology,
            vertex_count: self.vertex_count,
            params,
        });
    }

    /// Free the backend buffers.
    pub fn release<S: MeshStore + ?Sized>(self, store: &mut S) {
        store.destroy_mesh(self.mesh);
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Vertices in the last upload.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Contents of a mesh held by [`MemoryMeshStore`].
#[derive(Debug, Clone)]
pub struct MemoryMesh {
    pub usage: BufferUsage,
    pub positions: Vec<Position>,
    pub colors: Vec<Color>,
    /// Number of uploads received.
    pub uploads: usize,
}

/// CPU-only [`MeshStore`] that keeps the last uploaded contents of every mesh.
#[derive(Debug, Default)]
pub struct MemoryMeshStore {
    meshes: Vec<Option<MemoryMesh>>,
    free: Vec<u32>,
    total_uploads: usize,
}

impl MemoryMeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mesh: MeshId) -> Option<&MemoryMesh> {
        self.meshes.get(mesh.index()).and_then(Option::as_ref)
    }

    /// Meshes created and not yet destroyed.
    pub fn live_meshes(&self) -> usize {
        self.meshes.iter().filter(|m| m.is_some()).count()
    }

    /// Uploads received across all meshes, destroyed ones included.
    pub fn total_uploads(&self) -> usize {
        self.total_uploads
    }
}

impl MeshStore for MemoryMeshStore {
    fn create_mesh(&mut self, usage: BufferUsage) -> MeshId {
        let mesh = MemoryMesh {
            usage,
            positions: Vec::new(),
            colors: Vec::new(),
            uploads: 0,
        };
        match self.free.pop() {
            Some(slot) => {
                self.meshes[slot as usize] = Some(mesh);
                MeshId(slot)
            }
            None => {
                self.meshes.push(Some(mesh));
                MeshId(self.meshes.len() as u32 - 1)
            }
        }
    }

    fn upload(&mut self, mesh: MeshId, positions: &[Position], colors: &[Color]) {
        if let Some(Some(m)) = self.meshes.get_mut(mesh.index()) {
            m.positions.clear();
            m.positions.extend_from_slice(positions);
            m.colors.clear();
            m.colors.extend_from_slice(colors);
            m.uploads += 1;
            self.total_uploads += 1;
        }
    }

    fn destroy_mesh(&mut self, mesh: MeshId) {
        if let Some(slot) = self.meshes.get_mut(mesh.index()) {
            if slot.take().is_some() {
                self.free.push(mesh.0);
            }
        }
    }
}
