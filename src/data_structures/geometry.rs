//! Primitive geometry descriptors and their CPU tessellation.
//!
//! A [`Geometry`] only records the shape and its dimensions. It carries no
//! material and no placement, so the same descriptor can be shared by any
//! number of placed objects. Constructors validate their input and never
//! touch the GPU; [`Geometry::tessellate`] turns a descriptor into a
//! [`MeshData`] triangle list that `resources::mesh` uploads later.
//!
//! Shapes are centred on the origin with Y pointing up. Planes lie in the XY
//! plane facing +Z, cylinders, cones and spheres are symmetric around Y.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::{
    data_structures::model::{MeshData, ModelVertex},
    error::SceneError,
};

/// Default tessellation of round shapes when the caller does not care.
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 32;

/// The kinds of primitives the builder knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Plane,
    Box,
    Cylinder,
    Cone,
    Sphere,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Plane => "plane",
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::Sphere => "sphere",
        }
    }
}

/// Immutable shape descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Plane {
        width: f32,
        height: f32,
    },
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

fn positive(shape: ShapeKind, param: &str, value: f32) -> Result<f32, SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::geometry(
            shape.name(),
            format!("{param} must be a positive finite number, got {value}"),
        ))
    }
}

fn segments(shape: ShapeKind, param: &str, value: u32, min: u32) -> Result<u32, SceneError> {
    if value >= min {
        Ok(value)
    } else {
        Err(SceneError::geometry(
            shape.name(),
            format!("{param} must be at least {min}, got {value}"),
        ))
    }
}

impl Geometry {
    pub fn plane(width: f32, height: f32) -> Result<Self, SceneError> {
        let kind = ShapeKind::Plane;
        Ok(Self::Plane {
            width: positive(kind, "width", width)?,
            height: positive(kind, "height", height)?,
        })
    }

    /// A box. Named `cuboid` to stay clear of `std::boxed::Box`.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Self, SceneError> {
        let kind = ShapeKind::Box;
        Ok(Self::Cuboid {
            width: positive(kind, "width", width)?,
            height: positive(kind, "height", height)?,
            depth: positive(kind, "depth", depth)?,
        })
    }

    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Result<Self, SceneError> {
        let kind = ShapeKind::Cylinder;
        Ok(Self::Cylinder {
            radius_top: positive(kind, "radius_top", radius_top)?,
            radius_bottom: positive(kind, "radius_bottom", radius_bottom)?,
            height: positive(kind, "height", height)?,
            radial_segments: segments(kind, "radial_segments", radial_segments, 3)?,
        })
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Result<Self, SceneError> {
        let kind = ShapeKind::Cone;
        Ok(Self::Cone {
            radius: positive(kind, "radius", radius)?,
            height: positive(kind, "height", height)?,
            radial_segments: segments(kind, "radial_segments", radial_segments, 3)?,
        })
    }

    pub fn sphere(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Result<Self, SceneError> {
        let kind = ShapeKind::Sphere;
        Ok(Self::Sphere {
            radius: positive(kind, "radius", radius)?,
            width_segments: segments(kind, "width_segments", width_segments, 3)?,
            height_segments: segments(kind, "height_segments", height_segments, 2)?,
        })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Plane { .. } => ShapeKind::Plane,
            Geometry::Cuboid { .. } => ShapeKind::Box,
            Geometry::Cylinder { .. } => ShapeKind::Cylinder,
            Geometry::Cone { .. } => ShapeKind::Cone,
            Geometry::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Plane { width, height } => quad(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(width / 2.0, 0.0, 0.0),
                Vector3::new(0.0, height / 2.0, 0.0),
            ),
            Geometry::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width / 2.0, height / 2.0, depth / 2.0),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => frustum(radius_top, radius_bottom, height, radial_segments),
            Geometry::Cone {
                radius,
                height,
                radial_segments,
            } => frustum(0.0, radius, height, radial_segments),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
        }
    }
}

/// Quad spanned by the half extents `u` and `v`; the face normal is `u × v`.
fn quad(center: Vector3<f32>, u: Vector3<f32>, v: Vector3<f32>) -> MeshData {
    let normal: [f32; 3] = u.cross(v).normalize().into();
    let corners = [
        (center - u - v, [0.0, 1.0]),
        (center + u - v, [1.0, 1.0]),
        (center + u + v, [1.0, 0.0]),
        (center - u + v, [0.0, 0.0]),
    ];
    MeshData {
        vertices: corners
            .into_iter()
            .map(|(p, uv)| ModelVertex::new(p.into(), uv, normal))
            .collect(),
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

fn cuboid(hx: f32, hy: f32, hz: f32) -> MeshData {
    let faces = [
        // +Z, -Z
        (Vector3::new(0.0, 0.0, hz), Vector3::new(hx, 0.0, 0.0), Vector3::new(0.0, hy, 0.0)),
        (Vector3::new(0.0, 0.0, -hz), Vector3::new(-hx, 0.0, 0.0), Vector3::new(0.0, hy, 0.0)),
        // +X, -X
        (Vector3::new(hx, 0.0, 0.0), Vector3::new(0.0, 0.0, -hz), Vector3::new(0.0, hy, 0.0)),
        (Vector3::new(-hx, 0.0, 0.0), Vector3::new(0.0, 0.0, hz), Vector3::new(0.0, hy, 0.0)),
        // +Y, -Y
        (Vector3::new(0.0, hy, 0.0), Vector3::new(hx, 0.0, 0.0), Vector3::new(0.0, 0.0, -hz)),
        (Vector3::new(0.0, -hy, 0.0), Vector3::new(hx, 0.0, 0.0), Vector3::new(0.0, 0.0, hz)),
    ];
    faces
        .into_iter()
        .fold(MeshData::default(), |mut mesh, (center, u, v)| {
            mesh.append(quad(center, u, v));
            mesh
        })
}

/// Side wall plus caps. A zero `radius_top` yields a cone without a top cap.
fn frustum(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let n = radial_segments;
    let mut mesh = MeshData::default();

    // Side wall: ring of bottom vertices followed by a ring of top vertices.
    for (y, radius, v) in [(-half, radius_bottom, 1.0), (half, radius_top, 0.0)] {
        for i in 0..=n {
            let u = i as f32 / n as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = Vector3::new(sin, slope, cos).normalize();
            mesh.vertices.push(ModelVertex::new(
                [radius * sin, y, radius * cos],
                [u, v],
                normal.into(),
            ));
        }
    }
    let top = n + 1;
    for i in 0..n {
        mesh.indices.extend([i, i + 1, top + i + 1]);
        if radius_top > 0.0 {
            mesh.indices.extend([top + i + 1, top + i, i]);
        }
    }

    if radius_top > 0.0 {
        mesh.append(cap(half, radius_top, n, true));
    }
    mesh.append(cap(-half, radius_bottom, n, false));
    mesh
}

fn cap(y: f32, radius: f32, n: u32, facing_up: bool) -> MeshData {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };
    let mut mesh = MeshData::default();
    mesh.vertices
        .push(ModelVertex::new([0.0, y, 0.0], [0.5, 0.5], normal));
    for i in 0..=n {
        let (sin, cos) = (i as f32 / n as f32 * TAU).sin_cos();
        mesh.vertices.push(ModelVertex::new(
            [radius * sin, y, radius * cos],
            [sin * 0.5 + 0.5, cos * 0.5 + 0.5],
            normal,
        ));
    }
    for i in 1..=n {
        if facing_up {
            mesh.indices.extend([0, i, i + 1]);
        } else {
            mesh.indices.extend([0, i + 1, i]);
        }
    }
    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let row = width_segments + 1;
    let mut mesh = MeshData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let normal = Vector3::new(-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
            mesh.vertices.push(ModelVertex::new(
                (normal * radius).into(),
                [u, v],
                normal.normalize().into(),
            ));
        }
    }
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend([a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend([b, c, d]);
            }
        }
    }
    mesh
}
