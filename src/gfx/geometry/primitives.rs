//! Meshes for gizmo handles and test scenes.
//!
//! Handle shapes are built along +Z so that a single rotation lines them up
//! with any of the three axes. Normals point outward.

use super::GeometryData;
use std::f32::consts::{PI, TAU};

/// Unit cube centered on the origin, 24 vertices so each face keeps a flat normal.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]]),
        ([0.0, 0.0, -1.0], [[-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, -0.5, -0.5]]),
        ([-1.0, 0.0, 0.0], [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]]),
        ([1.0, 0.0, 0.0], [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]]),
        ([0.0, 1.0, 0.0], [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]]),
        ([0.0, -1.0, 0.0], [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]]),
    ];

    for (normal, corners) in faces {
        let base = data.vertices.len() as u32;
        for corner in corners {
            data.vertices.push(corner);
            data.normals.push(normal);
        }
        // Two counter-clockwise triangles per face
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Ball of the given radius around the origin, poles on ±Y.
pub fn generate_sphere(radius: f32, slices: u32, stacks: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let slices = slices.max(3);
    let stacks = stacks.max(2);

    for stack in 0..=stacks {
        let (sin_polar, cos_polar) = (stack as f32 * PI / stacks as f32).sin_cos();
        for slice in 0..=slices {
            let (sin_az, cos_az) = (slice as f32 * TAU / slices as f32).sin_cos();
            let n = [sin_polar * cos_az, cos_polar, sin_polar * sin_az];
            data.vertices.push([n[0] * radius, n[1] * radius, n[2] * radius]);
            data.normals.push(n);
        }
    }

    stitch_grid(&mut data, 0, stacks, slices);
    data
}

/// Generate a capped cylinder along +Z, from z=0 to z=`height`
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    // Side vertices, bottom/top pairs
    for i in 0..=segs {
        let (sin_a, cos_a) = (i as f32 * TAU / segs as f32).sin_cos();
        let x = radius * cos_a;
        let y = radius * sin_a;

        data.vertices.push([x, y, 0.0]);
        data.normals.push([cos_a, sin_a, 0.0]);
        data.vertices.push([x, y, height]);
        data.normals.push([cos_a, sin_a, 0.0]);
    }

    for i in 0..segs {
        let (lo, hi) = (i * 2, i * 2 + 1);
        let (lo_next, hi_next) = (lo + 2, hi + 2);
        data.indices
            .extend_from_slice(&[lo, lo_next, hi, hi, lo_next, hi_next]);
    }

    add_cap(&mut data, radius, 0.0, segs, false);
    add_cap(&mut data, radius, height, segs, true);

    data
}

/// Generate a cone along +Z with its base at z=0 and its apex at z=`height`
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let slant = (radius * radius + height * height).sqrt().max(f32::EPSILON);
    let (n_radial, n_z) = (height / slant, radius / slant);

    for i in 0..=segs {
        let (sin_a, cos_a) = (i as f32 * TAU / segs as f32).sin_cos();
        let normal = [cos_a * n_radial, sin_a * n_radial, n_z];

        data.vertices.push([radius * cos_a, radius * sin_a, 0.0]);
        data.normals.push(normal);
        data.vertices.push([0.0, 0.0, height]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let base_current = i * 2;
        let apex = base_current + 1;
        let base_next = (i + 1) * 2;
        data.indices.extend_from_slice(&[base_current, base_next, apex]);
    }

    add_cap(&mut data, radius, 0.0, segs, false);

    data
}

/// Ring in the XY plane around +Z, swept counter-clockwise from +X.
///
/// `arc` is the swept angle in radians: `PI` is the half ring the rotate
/// handles use, `TAU` the full ring shown in section-plane mode.
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    arc: f32,
    major_segments: u32,
    minor_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let major_segs = major_segments.max(3);
    let minor_segs = minor_segments.max(3);
    let arc = arc.clamp(f32::EPSILON, TAU);

    for i in 0..=major_segs {
        let u = i as f32 * arc / major_segs as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=minor_segs {
            let (sin_v, cos_v) = (j as f32 * TAU / minor_segs as f32).sin_cos();

            let ring = major_radius + minor_radius * cos_v;
            data.vertices
                .push([ring * cos_u, ring * sin_u, minor_radius * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
        }
    }

    stitch_grid(&mut data, 0, major_segs, minor_segs);
    data
}

/// Generate a translate-handle arrow along +Z: a shaft from the origin and a cone tip
pub fn generate_arrow(
    shaft_radius: f32,
    shaft_length: f32,
    tip_radius: f32,
    tip_length: f32,
    segments: u32,
) -> GeometryData {
    let mut data = generate_cylinder(shaft_radius, shaft_length, segments);
    let tip = generate_cone(tip_radius, tip_length, segments);
    data.append(&tip, [0.0, 0.0, shaft_length]);
    data
}

/// Indexes a `(rows + 1) x (cols + 1)` vertex grid starting at `first` as quads.
fn stitch_grid(data: &mut GeometryData, first: u32, rows: u32, cols: u32) {
    let stride = cols + 1;
    for row in 0..rows {
        for col in 0..cols {
            let a = first + row * stride + col;
            let b = a + stride;
            data.indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }
}

/// Closes a ring of side vertices at height `z` with a triangle fan.
fn add_cap(data: &mut GeometryData, radius: f32, z: f32, segs: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 0.0, 1.0] } else { [0.0, 0.0, -1.0] };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, 0.0, z]);
    data.normals.push(normal);

    let rim_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let (sin_a, cos_a) = (i as f32 * TAU / segs as f32).sin_cos();
        data.vertices.push([radius * cos_a, radius * sin_a, z]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let current = rim_start + i;
        let next = current + 1;
        if facing_up {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}
