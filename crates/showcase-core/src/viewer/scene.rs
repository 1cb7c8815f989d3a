//! Static description of the product viewer scene.

use glam::Vec3;
use std::f32::consts::FRAC_PI_2;
use std::f32::consts::FRAC_PI_4;

/// Convert a 0xRRGGBB colour to normalised sRGB components.
#[inline]
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryDesc {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Y-aligned, centred on the origin.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// In the XY plane, facing +Z.
    Plane { width: f32, height: f32 },
}

/// Roughness/metalness material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDesc {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl MaterialDesc {
    pub fn new(hex: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: rgb(hex),
            roughness,
            metalness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Table,
    Leg,
    Vase,
    Block,
    Ground,
}

impl PropKind {
    /// Whether the rotate buttons turn this prop.
    pub fn rotatable(&self) -> bool {
        !matches!(self, PropKind::Ground)
    }

    /// Whether the prop is made of the selectable wood finish.
    pub fn is_wood(&self) -> bool {
        matches!(self, PropKind::Table | PropKind::Leg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropDesc {
    pub kind: PropKind,
    /// Index into [`SceneDesc::geometries`].
    pub geometry: usize,
    /// Index into [`SceneDesc::materials`].
    pub material: usize,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Light shining from `position` toward the origin.
    Directional { position: Vec3, cast_shadow: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDesc {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDesc {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneDesc {
    pub background: Vec3,
    pub fog_density: f32,
    pub camera: CameraDesc,
    pub geometries: Vec<GeometryDesc>,
    pub materials: Vec<MaterialDesc>,
    pub props: Vec<PropDesc>,
    pub lights: Vec<LightDesc>,
}

const LEG_POSITIONS: [[f32; 3]; 4] = [
    [-1.8, -0.85, 0.8],  // front left
    [1.8, -0.85, 0.8],   // front right
    [-1.8, -0.85, -0.8], // back left
    [1.8, -0.85, -0.8],  // back right
];

impl SceneDesc {
    /// The furniture vignette: a table with four legs, a vase and a wood
    /// block on top, over a ground plane.
    pub fn showcase() -> Self {
        let geometries = vec![
            GeometryDesc::Box {
                width: 4.0,
                height: 0.2,
                depth: 2.0,
            },
            GeometryDesc::Box {
                width: 0.2,
                height: 1.5,
                depth: 0.2,
            },
            GeometryDesc::Cylinder {
                radius_top: 0.3,
                radius_bottom: 0.2,
                height: 0.8,
                segments: 16,
            },
            GeometryDesc::Box {
                width: 0.7,
                height: 0.4,
                depth: 0.7,
            },
            GeometryDesc::Plane {
                width: 20.0,
                height: 20.0,
            },
        ];
        let materials = vec![
            MaterialDesc::new(0x9c7c5d, 0.8, 0.2),
            MaterialDesc::new(0x8a6c4d, 0.7, 0.1),
            MaterialDesc::new(0xd4c8b8, 0.5, 0.3),
            MaterialDesc::new(0xbf9780, 0.9, 0.1),
            MaterialDesc::new(0xf5f1ed, 0.9, 0.0),
        ];

        let solid = |kind, geometry, material, position: Vec3, rotation: Vec3| PropDesc {
            kind,
            geometry,
            material,
            position,
            rotation,
            cast_shadow: true,
            receive_shadow: true,
        };

        let mut props = vec![solid(PropKind::Table, 0, 0, Vec3::ZERO, Vec3::ZERO)];
        props.extend(
            LEG_POSITIONS
                .iter()
                .map(|p| solid(PropKind::Leg, 1, 1, Vec3::from_array(*p), Vec3::ZERO)),
        );
        props.push(solid(
            PropKind::Vase,
            2,
            2,
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::ZERO,
        ));
        props.push(solid(
            PropKind::Block,
            3,
            3,
            Vec3::new(1.0, 0.3, 0.0),
            Vec3::new(0.0, FRAC_PI_4, 0.0),
        ));
        props.push(PropDesc {
            kind: PropKind::Ground,
            geometry: 4,
            material: 4,
            position: Vec3::new(0.0, -1.6, 0.0),
            rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
            cast_shadow: false,
            receive_shadow: true,
        });

        let lights = vec![
            LightDesc {
                kind: LightKind::Ambient,
                color: Vec3::ONE,
                intensity: 0.6,
            },
            LightDesc {
                kind: LightKind::Directional {
                    position: Vec3::new(5.0, 5.0, 5.0),
                    cast_shadow: true,
                },
                color: Vec3::ONE,
                intensity: 0.8,
            },
            LightDesc {
                kind: LightKind::Directional {
                    position: Vec3::new(-5.0, -2.0, -5.0),
                    cast_shadow: false,
                },
                color: rgb(0xf5f1ed),
                intensity: 0.4,
            },
        ];

        Self {
            background: rgb(0xf7f3ef),
            fog_density: 0.035,
            camera: CameraDesc {
                fov_y_deg: 45.0,
                near: 0.1,
                far: 1000.0,
                position: Vec3::new(0.0, 1.0, 5.0),
                target: Vec3::ZERO,
            },
            geometries,
            materials,
            props,
            lights,
        }
    }

    /// The shadow-casting directional light, if any.
    pub fn shadow_light(&self) -> Option<&LightDesc> {
        self.lights.iter().find(|l| {
            matches!(
                l.kind,
                LightKind::Directional {
                    cast_shadow: true,
                    ..
                }
            )
        })
    }
}
