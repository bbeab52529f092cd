//! Behavioural properties of tracers, the cloud, geometry and navigation,
//! checked against the CPU mesh store.

use std::f32::consts::{FRAC_PI_2, PI};

use lorenz_tracers::config::CameraConfig;
use lorenz_tracers::input::{NavMode, Navigation};
use lorenz_tracers::math::multiply_point;
use lorenz_tracers::prelude::*;
use lorenz_tracers::shapes::{AXIS_X_COLOR, AXIS_Y_COLOR, AXIS_Z_COLOR, GRID_COLOR};

fn tracer_with_points(store: &mut MemoryMeshStore, n: usize) -> Tracer {
    let mut tracer = Tracer::new(store, [0.5, 0.5, 0.5, 1.0]);
    for i in 0..n {
        tracer.update(store, Vec3::splat(i as f32));
    }
    tracer
}

#[test]
fn trail_never_exceeds_max_length() {
    let mut store = MemoryMeshStore::new();
    let mut tracer = Tracer::new(&mut store, [1.0; 4]);
    tracer.set_max_length(4);

    for i in 0..20 {
        let p = Vec3::new(i as f32, 0.0, 0.0);
        tracer.update(&mut store, p);
        assert!(tracer.len() <= 4);
        assert_eq!(tracer.last_point(), Some(p));
    }

    // Full trail: oldest evicted, newest appended.
    let before: Vec<Vec3> = tracer.points().collect();
    tracer.update(&mut store, Vec3::Y);
    let after: Vec<Vec3> = tracer.points().collect();
    assert_eq!(&after[..3], &before[1..]);
    assert_eq!(after[3], Vec3::Y);

    let mesh = store.get(tracer.drawable().mesh()).unwrap();
    assert_eq!(mesh.positions.len(), mesh.colors.len());
}

#[test]
fn cloud_shrinks_from_the_end_and_grows_by_appending() {
    let mut store = MemoryMeshStore::new();
    let mut cloud = TracerCloud::new();
    let mut next = 0.0;
    let mut factory = |s: &mut MemoryMeshStore| {
        next += 1.0;
        Tracer::new(s, [next, 0.0, 0.0, 1.0])
    };

    cloud.resize(5, &mut store, &mut factory);
    let reds = |cloud: &TracerCloud| cloud.iter().map(|t| t.color()[0]).collect::<Vec<_>>();
    assert_eq!(reds(&cloud), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

    cloud.resize(3, &mut store, &mut factory);
    assert_eq!(reds(&cloud), vec![1.0, 2.0, 3.0]);

    cloud.resize(5, &mut store, &mut factory);
    assert_eq!(reds(&cloud), vec![1.0, 2.0, 3.0, 6.0, 7.0]);
    assert_eq!(store.live_meshes(), 5);
}

#[test]
fn max_length_trims_lazily() {
    let mut store = MemoryMeshStore::new();
    let mut cloud = TracerCloud::new();
    cloud.resize(3, &mut store, |s| tracer_with_points(s, 10));

    cloud.set_max_length(5);
    for tracer in cloud.iter() {
        assert_eq!(tracer.len(), 10, "no retroactive trim");
        assert_eq!(tracer.max_length(), 5);
    }

    cloud.integrate_with(&mut store, |x, _, _| x, |_, y, _| y, |_, _, z| z);
    for tracer in cloud.iter() {
        assert_eq!(tracer.len(), 5);
        assert_eq!(store.get(tracer.drawable().mesh()).unwrap().positions.len(), 5);
    }
}

#[test]
fn max_length_above_current_length_keeps_points() {
    let mut store = MemoryMeshStore::new();
    let mut cloud = TracerCloud::new();
    cloud.resize(2, &mut store, |s| tracer_with_points(s, 3));
    cloud.set_max_length(5);
    for tracer in cloud.iter() {
        assert_eq!(tracer.len(), 3);
    }
}

#[test]
fn identity_step_duplicates_last_point() {
    let mut store = MemoryMeshStore::new();
    let mut cloud = TracerCloud::new();
    cloud.resize(4, &mut store, |s| tracer_with_points(s, 2));

    cloud.integrate_with(&mut store, |x, _, _| x, |_, y, _| y, |_, _, z| z);

    for tracer in cloud.iter() {
        let points: Vec<Vec3> = tracer.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], points[1]);
    }
}

#[test]
fn lorenz_euler_step_from_one_one_one() {
    let next = Euler::new(0.01).advance(&Lorenz::new(10.0, 28.0, 8.0 / 3.0), Vec3::ONE);
    assert!((next.x - 1.0).abs() < 1e-6);
    assert!((next.y - 1.26).abs() < 1e-6);
    assert!((next.z - (1.0 + 0.01 * (1.0 - 8.0 / 3.0))).abs() < 1e-6);
    assert!((next.z - 0.983_333).abs() < 1e-5);

    // Same result through the cloud.
    let mut store = MemoryMeshStore::new();
    let mut cloud = TracerCloud::new();
    cloud.resize(1, &mut store, |s| {
        let mut t = Tracer::new(s, [1.0; 4]);
        t.update(s, Vec3::ONE);
        t
    });
    cloud.advance(&mut store, &Euler::default(), &Lorenz::default());
    let last = cloud.tracers()[0].last_point().unwrap();
    assert!(last.abs_diff_eq(next, 1e-6));
}

#[test]
fn x_grid_of_size_two() {
    let mut store = MemoryMeshStore::new();
    let grid = Grid::new(&mut store, Plane::X, 2);
    let lines = grid.lines();

    assert_eq!(lines.segment_count(), 10);
    assert!(lines.colors().iter().all(|c| *c == GRID_COLOR));
    assert_eq!(GRID_COLOR, [1.0, 1.0, 1.0, 0.05]);

    let mut along_y = Vec::new();
    let mut along_z = Vec::new();
    for segment in lines.positions().chunks(2) {
        let (a, b) = (segment[0], segment[1]);
        assert_eq!(a[0], 0.0);
        assert_eq!(b[0], 0.0);
        if a[2] == b[2] {
            assert_eq!((a[1], b[1]), (-2.0, 2.0));
            along_y.push(a[2]);
        } else {
            assert_eq!(a[1], b[1]);
            assert_eq!((a[2], b[2]), (-2.0, 2.0));
            along_z.push(a[1]);
        }
    }
    let offsets = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
    assert_eq!(along_y, offsets);
    assert_eq!(along_z, offsets);
}

#[test]
fn axes_are_three_rgb_segments() {
    let mut store = MemoryMeshStore::new();
    let axes = Axes::new(&mut store, 7.0);
    let lines = axes.lines();
    assert_eq!(lines.segment_count(), 3);

    let expected = [AXIS_X_COLOR, AXIS_Y_COLOR, AXIS_Z_COLOR];
    for (axis, segment) in lines.positions().chunks(2).enumerate() {
        let a = Vec3::from_array(segment[0]);
        let b = Vec3::from_array(segment[1]);
        assert_eq!((b - a).length(), 14.0);
        assert_eq!(a + b, Vec3::ZERO);
        assert_eq!(b[axis], 7.0);
        assert_eq!(lines.colors()[2 * axis], expected[axis]);
        assert_eq!(lines.colors()[2 * axis][3], 1.0);
    }
}

#[test]
fn pan_is_rotated_by_current_orbit() {
    let config = CameraConfig::default();
    let mut camera = CameraState {
        x_offset: 0.0,
        y_offset: 0.0,
        z_offset: 0.0,
        x_rotation: FRAC_PI_2,
        y_rotation: PI,
    };
    let nav = Navigation {
        mode: NavMode::Pan,
        cursor_delta: Vec2::new(10.0, 5.0),
        wheel_delta: 0.0,
    };

    camera.update(&nav, &config);

    let raw = Vec3::new(0.4, -0.2, 0.0);
    let rotated = camera.offset();
    assert!(rotated.abs_diff_eq(Vec3::new(-0.4, 0.0, -0.2), 1e-5));
    assert!(!rotated.abs_diff_eq(raw, 1e-3));
    assert_eq!((camera.x_rotation, camera.y_rotation), (FRAC_PI_2, PI));

    let expected = multiply_point(
        lorenz_tracers::math::orbit_rotation(FRAC_PI_2, PI),
        Vec4::new(0.4, -0.2, 0.0, 0.0),
    );
    assert!(rotated.abs_diff_eq(expected.truncate(), 1e-6));
}

#[test]
fn orbit_accumulates_rotation_directly() {
    let config = CameraConfig::default();
    let mut camera = CameraState::default();
    let start = camera;
    let nav = Navigation {
        mode: NavMode::Orbit,
        cursor_delta: Vec2::new(10.0, 5.0),
        wheel_delta: 0.0,
    };
    camera.update(&nav, &config);
    assert!((camera.y_rotation - start.y_rotation - 0.1).abs() < 1e-6);
    assert!((camera.x_rotation - start.x_rotation - 0.05).abs() < 1e-6);
    assert_eq!(camera.offset(), start.offset());
}
