//! Tracers and the tracer cloud.
//!
//! A [`Tracer`] is one trajectory's trailing history drawn as a line strip. It
//! keeps at most `max_length` points, evicting the oldest first, and re-uploads
//! its buffers on every append. A [`TracerCloud`] owns a resizable, ordered set of
//! tracers and advances all of them one integration step at a time.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::drawable::{BufferUsage, Color, DrawList, DrawParams, Drawable, MeshStore, Position, Topology};
use crate::integrator::{Euler, OdeSystem};

/// Trail capacity of a freshly created tracer.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// One trajectory's bounded trail.
#[derive(Debug)]
pub struct Tracer {
    drawable: Drawable,
    positions: VecDeque<Position>,
    colors: VecDeque<Color>,
    max_length: usize,
    color: Color,
}

impl Tracer {
    /// Empty tracer drawn in `color`.
    pub fn new<S: MeshStore + ?Sized>(store: &mut S, color: Color) -> Self {
        Self {
            drawable: Drawable::new(store, Topology::LineStrip, BufferUsage::Dynamic),
            positions: VecDeque::new(),
            colors: VecDeque::new(),
            max_length: DEFAULT_MAX_LENGTH,
            color,
        }
    }

    /// Tracer with a random opaque color, seeded with one point drawn uniformly
    /// from `[0, extent)^3`.
    pub fn spawn_random<S, R>(store: &mut S, rng: &mut R, extent: f32) -> Self
    where
        S: MeshStore + ?Sized,
        R: Rng,
    {
        let color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>(), 1.0];
        let mut tracer = Self::new(store, color);
        let start = Vec3::new(
            rng.gen::<f32>() * extent,
            rng.gen::<f32>() * extent,
            rng.gen::<f32>() * extent,
        );
        tracer.update(store, start);
        tracer
    }

    /// Append `point`, evict from the front while over capacity, re-upload.
    pub fn update<S: MeshStore + ?Sized>(&mut self, store: &mut S, point: Vec3) {
        self.positions.push_back(point.to_array());
        self.colors.push_back(self.color);

        while self.positions.len() > self.max_length {
            self.positions.pop_front();
        }
        while self.colors.len() > self.max_length {
            self.colors.pop_front();
        }

        let positions = self.positions.make_contiguous();
        let colors = self.colors.make_contiguous();
        self.drawable.upload(store, positions, colors);
    }

    /// Newest point, if any.
    pub fn last_point(&self) -> Option<Vec3> {
        self.positions.back().map(|p| Vec3::from_array(*p))
    }

    /// Points from oldest to newest.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.iter().map(|p| Vec3::from_array(*p))
    }

    pub fn colors(&self) -> impl Iterator<Item = &Color> + '_ {
        self.colors.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Takes effect on the next [`update`](Self::update); existing points stay until then.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        self.drawable.draw(list, params);
    }

    pub fn release<S: MeshStore + ?Sized>(self, store: &mut S) {
        self.drawable.release(store);
    }
}

/// Ordered, externally sized collection of tracers.
#[derive(Debug, Default)]
pub struct TracerCloud {
    tracers: Vec<Tracer>,
}

impl TracerCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow with `factory` or shrink from the end until there are `target` tracers.
    ///
    /// Removed tracers are released, not pooled.
    pub fn resize<S, F>(&mut self, target: usize, store: &mut S, mut factory: F)
    where
        S: MeshStore + ?Sized,
        F: FnMut(&mut S) -> Tracer,
    {
        while self.tracers.len() < target {
            let tracer = factory(&mut *store);
            self.tracers.push(tracer);
        }
        while self.tracers.len() > target {
            if let Some(tracer) = self.tracers.pop() {
                tracer.release(store);
            }
        }
    }

    /// Set the trail capacity of every current tracer.
    pub fn set_max_length(&mut self, max_length: usize) {
        for tracer in &mut self.tracers {
            tracer.set_max_length(max_length);
        }
    }

    /// Append `(fx(p), fy(p), fz(p))` to every tracer, where `p` is its newest point
    /// or the origin for an empty tracer.
    pub fn integrate_with<S, Fx, Fy, Fz>(&mut self, store: &mut S, fx: Fx, fy: Fy, fz: Fz)
    where
        S: MeshStore + ?Sized,
        Fx: Fn(f32, f32, f32) -> f32,
        Fy: Fn(f32, f32, f32) -> f32,
        Fz: Fn(f32, f32, f32) -> f32,
    {
        for tracer in &mut self.tracers {
            let p = tracer.last_point().unwrap_or(Vec3::ZERO);
            let next = Vec3::new(fx(p.x, p.y, p.z), fy(p.x, p.y, p.z), fz(p.x, p.y, p.z));
            tracer.update(store, next);
        }
    }

    /// One fixed step of `system` for every tracer.
    pub fn advance<S, O>(&mut self, store: &mut S, integrator: &Euler, system: &O)
    where
        S: MeshStore + ?Sized,
        O: OdeSystem + ?Sized,
    {
        let (fx, fy, fz) = integrator.axis_functions(system);
        self.integrate_with(store, fx, fy, fz);
    }

    /// Draw every tracer in insertion order.
    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        for tracer in &self.tracers {
            tracer.draw(list, params);
        }
    }

    pub fn len(&self) -> usize {
        self.tracers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty()
    }

    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tracer> {
        self.tracers.iter()
    }

    /// Total points across all trails.
    pub fn point_count(&self) -> usize {
        self.tracers.iter().map(Tracer::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::MemoryMeshStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_update_uploads_every_time() {
        let mut store = MemoryMeshStore::new();
        let mut tracer = Tracer::new(&mut store, [1.0, 0.0, 0.0, 1.0]);
        tracer.update(&mut store, Vec3::X);
        tracer.update(&mut store, Vec3::Y);

        let mesh = store.get(tracer.drawable().mesh()).unwrap();
        assert_eq!(mesh.uploads, 2);
        assert_eq!(mesh.usage, BufferUsage::Dynamic);
        assert_eq!(mesh.positions, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(mesh.colors.len(), 2);
    }

    #[test]
    fn test_upload_stays_ordered_after_wraparound() {
        let mut store = MemoryMeshStore::new();
        let mut tracer = Tracer::new(&mut store, [1.0; 4]);
        tracer.set_max_length(3);
        for i in 0..10 {
            tracer.update(&mut store, Vec3::splat(i as f32));
        }
        let mesh = store.get(tracer.drawable().mesh()).unwrap();
        assert_eq!(mesh.positions, vec![[7.0; 3], [8.0; 3], [9.0; 3]]);
    }

    #[test]
    fn test_zero_max_length_empties_the_trail() {
        let mut store = MemoryMeshStore::new();
        let mut tracer = Tracer::new(&mut store, [1.0; 4]);
        tracer.set_max_length(0);
        tracer.update(&mut store, Vec3::ONE);
        assert!(tracer.is_empty());
        assert_eq!(tracer.drawable().vertex_count(), 0);
    }

    #[test]
    fn test_spawn_random_stays_in_extent() {
        let mut store = MemoryMeshStore::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let tracer = Tracer::spawn_random(&mut store, &mut rng, 10.0);
            assert_eq!(tracer.len(), 1);
            let p = tracer.last_point().unwrap();
            assert!(p.cmpge(Vec3::ZERO).all() && p.cmplt(Vec3::splat(10.0)).all());
            assert_eq!(tracer.color()[3], 1.0);
        }
    }

    #[test]
    fn test_empty_tracer_integrates_from_origin() {
        let mut store = MemoryMeshStore::new();
        let mut cloud = TracerCloud::new();
        cloud.resize(1, &mut store, |s| Tracer::new(s, [1.0; 4]));
        cloud.integrate_with(&mut store, |x, _, _| x + 1.0, |_, y, _| y + 2.0, |_, _, z| z + 3.0);
        assert_eq!(cloud.tracers()[0].last_point(), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_shrinking_releases_meshes() {
        let mut store = MemoryMeshStore::new();
        let mut cloud = TracerCloud::new();
        cloud.resize(5, &mut store, |s| Tracer::new(s, [1.0; 4]));
        assert_eq!(store.live_meshes(), 5);
        cloud.resize(2, &mut store, |s| Tracer::new(s, [1.0; 4]));
        assert_eq!(store.live_meshes(), 2);
        cloud.resize(0, &mut store, |s| Tracer::new(s, [1.0; 4]));
        assert!(cloud.is_empty());
        assert_eq!(store.live_meshes(), 0);
    }
}
