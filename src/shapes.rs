//! Static reference geometry: the three grid planes and the RGB axes.
//!
//! Both are generated once from closed-form vertex lists, uploaded with
//! [`BufferUsage::Static`] and never touched again.

use crate::drawable::{BufferUsage, Color, DrawList, DrawParams, Drawable, MeshStore, Position, Topology};

/// Default grid line color. Overlapping lines accumulate under additive blending.
pub const GRID_COLOR: Color = [1.0, 1.0, 1.0, 0.05];

pub const AXIS_X_COLOR: Color = [1.0, 0.0, 0.0, 1.0];
pub const AXIS_Y_COLOR: Color = [0.0, 1.0, 0.0, 1.0];
pub const AXIS_Z_COLOR: Color = [0.0, 0.0, 1.0, 1.0];

/// Which coordinate plane a grid covers, named by the axis it is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// The `x = 0` plane, spanned by Y and Z.
    X,
    /// The `y = 0` plane, spanned by X and Z.
    Y,
    /// The `z = 0` plane, spanned by X and Y.
    Z,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::X, Plane::Y, Plane::Z];

    /// Indices of the two coordinates that vary within the plane.
    fn spanning_axes(self) -> (usize, usize) {
        match self {
            Plane::X => (1, 2),
            Plane::Y => (0, 2),
            Plane::Z => (0, 1),
        }
    }
}

/// Immutable line list with its CPU-side copy kept for inspection.
#[derive(Debug)]
pub struct LineSet {
    drawable: Drawable,
    positions: Vec<Position>,
    colors: Vec<Color>,
}

impl LineSet {
    fn build<S: MeshStore + ?Sized>(store: &mut S, positions: Vec<Position>, colors: Vec<Color>) -> Self {
        let mut drawable = Drawable::new(store, Topology::LineList, BufferUsage::Static);
        drawable.upload(store, &positions, &colors);
        Self {
            drawable,
            positions,
            colors,
        }
    }

    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        self.drawable.draw(list, params);
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }
}

/// Square grid of unit-spaced lines centred on the origin.
#[derive(Debug)]
pub struct Grid {
    plane: Plane,
    size: u32,
    lines: LineSet,
}

impl Grid {
    /// Grid spanning `[-size, size]` along both in-plane axes.
    pub fn new<S: MeshStore + ?Sized>(store: &mut S, plane: Plane, size: u32) -> Self {
        Self::with_color(store, plane, size, GRID_COLOR)
    }

    pub fn with_color<S: MeshStore + ?Sized>(store: &mut S, plane: Plane, size: u32, color: Color) -> Self {
        let (u, v) = plane.spanning_axes();
        let s = size as f32;
        let mut positions = Vec::with_capacity((2 * size as usize + 1) * 4);

        for i in -(size as i64)..=(size as i64) {
            let i = i as f32;

            // Line running along `u` at offset `i` on `v`.
            let mut a = [0.0; 3];
            let mut b = [0.0; 3];
            a[u] = -s;
            b[u] = s;
            a[v] = i;
            b[v] = i;
            positions.push(a);
            positions.push(b);

            // Line running along `v` at offset `i` on `u`.
            let mut a = [0.0; 3];
            let mut b = [0.0; 3];
            a[v] = -s;
            b[v] = s;
            a[u] = i;
            b[u] = i;
            positions.push(a);
            positions.push(b);
        }

        let colors = vec![color; positions.len()];
        Self {
            plane,
            size,
            lines: LineSet::build(store, positions, colors),
        }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn lines(&self) -> &LineSet {
        &self.lines
    }

    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        self.lines.draw(list, params);
    }
}

/// Red, green and blue segments along X, Y and Z.
#[derive(Debug)]
pub struct Axes {
    size: f32,
    lines: LineSet,
}

impl Axes {
    /// Each axis runs from `-size` to `size`.
    pub fn new<S: MeshStore + ?Sized>(store: &mut S, size: f32) -> Self {
        let positions = vec![
            [-size, 0.0, 0.0],
            [size, 0.0, 0.0],
            [0.0, -size, 0.0],
            [0.0, size, 0.0],
            [0.0, 0.0, -size],
            [0.0, 0.0, size],
        ];
        let colors = vec![
            AXIS_X_COLOR,
            AXIS_X_COLOR,
            AXIS_Y_COLOR,
            AXIS_Y_COLOR,
            AXIS_Z_COLOR,
            AXIS_Z_COLOR,
        ];
        Self {
            size,
            lines: LineSet::build(store, positions, colors),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn lines(&self) -> &LineSet {
        &self.lines
    }

    pub fn draw(&self, list: &mut DrawList, params: DrawParams) {
        self.lines.draw(list, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::MemoryMeshStore;

    #[test]
    fn test_grid_lies_in_its_plane() {
        let mut store = MemoryMeshStore::new();
        for (plane, fixed) in [(Plane::X, 0), (Plane::Y, 1), (Plane::Z, 2)] {
            let grid = Grid::new(&mut store, plane, 3);
            assert!(grid.lines().positions().iter().all(|p| p[fixed] == 0.0));
        }
    }

    #[test]
    fn test_grid_is_uploaded_once_as_static() {
        let mut store = MemoryMeshStore::new();
        let grid = Grid::new(&mut store, Plane::Z, 1);
        let mesh = store.get(grid.lines().drawable().mesh()).unwrap();
        assert_eq!(mesh.uploads, 1);
        assert_eq!(mesh.usage, BufferUsage::Static);
        assert_eq!(mesh.positions.len(), 12);
    }

    #[test]
    fn test_zero_size_grid_is_a_point_cross() {
        let mut store = MemoryMeshStore::new();
        let grid = Grid::new(&mut store, Plane::Y, 0);
        assert_eq!(grid.lines().segment_count(), 2);
        assert!(grid.lines().positions().iter().all(|p| *p == [0.0; 3]));
    }
}
