/// Cube faces, face rotations and the on-face button layout
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::error::{MenuError, Result};
use crate::navigation::Slot;

/// Distance from the cube centre to the plane buttons sit on
pub const SURFACE_OFFSET: f32 = 0.45;

/// Distance from the face centre to a button's anchor
pub const BUTTON_OFFSET: f32 = 0.35;

const LAYOUT_EPSILON: f32 = 1e-5;

/// One of the six cube faces, numbered as in menu files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Face {
    Front = 0,
    Left = 1,
    Back = 2,
    Right = 3,
    Top = 4,
    Bottom = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Left,
        Face::Back,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Euler rotation (radians, XYZ order) that turns this face towards the viewer
    pub fn rotation(self) -> Vector3<f32> {
        match self {
            Face::Front => Vector3::new(0.0, 0.0, 0.0),
            Face::Left => Vector3::new(0.0, FRAC_PI_2, 0.0),
            Face::Back => Vector3::new(0.0, PI, 0.0),
            Face::Right => Vector3::new(0.0, -FRAC_PI_2, 0.0),
            Face::Top => Vector3::new(FRAC_PI_2, 0.0, 0.0),
            Face::Bottom => Vector3::new(-FRAC_PI_2, 0.0, 0.0),
        }
    }

    /// Outward normal of the face in cube-local space
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Face::Front => Vector3::z(),
            Face::Left => -Vector3::x(),
            Face::Back => -Vector3::z(),
            Face::Right => Vector3::x(),
            Face::Top => Vector3::y(),
            Face::Bottom => -Vector3::y(),
        }
    }

    /// Matrix mapping front-facing coordinates onto this face in cube-local space
    pub fn to_local(self) -> Matrix4<f32> {
        Transform::rotation_matrix(&self.rotation()).transpose()
    }
}

impl TryFrom<u8> for Face {
    type Error = MenuError;

    fn try_from(index: u8) -> Result<Self> {
        Face::ALL
            .get(index as usize)
            .copied()
            .ok_or(MenuError::InvalidFace(index))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.index()
    }
}

/// The rendered cube's rotation and position, written every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeObject {
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl CubeObject {
    /// A cube at the origin with `face` turned towards the viewer
    pub fn facing(face: Face) -> Self {
        Self {
            rotation: face.rotation(),
            position: Vector3::zeros(),
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix for an XYZ Euler triple, the three.js default order
    pub fn rotation_matrix(rotation: &Vector3<f32>) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    pub fn translation_matrix(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
    }

    /// Translation applied after rotation
    pub fn model_matrix(position: &Vector3<f32>, rotation: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation_matrix(position) * Self::rotation_matrix(rotation)
    }
}

/// Where a button sits relative to the cube centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonPlacement {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl ButtonPlacement {
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }
}

/// Unit direction from the face centre towards a slot, as seen from the front
fn slot_direction(slot: Slot) -> (f32, f32) {
    match slot {
        Slot::Top => (0.0, 1.0),
        Slot::Right => (1.0, 0.0),
        Slot::Bottom => (0.0, -1.0),
        Slot::Left => (-1.0, 0.0),
    }
}

/// Label roll so side labels read along their edge
fn slot_roll(slot: Slot) -> f32 {
    match slot {
        Slot::Top | Slot::Bottom => 0.0,
        Slot::Right => -FRAC_PI_2,
        Slot::Left => FRAC_PI_2,
    }
}

/// Lookup table `(face, slot) -> placement` covering all 6 x 4 attachment points
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    placements: [[ButtonPlacement; 4]; 6],
}

impl ButtonLayout {
    /// Layout with buttons `BUTTON_OFFSET` from each face centre, on the
    /// `SURFACE_OFFSET` plane
    pub fn standard() -> Self {
        let placements = Face::ALL.map(|face| {
            let to_local = face.to_local();
            // Face rotations are single-axis, so negating the angles inverts them
            let face_inverse = -face.rotation();

            Slot::ALL.map(|slot| {
                let (dx, dy) = slot_direction(slot);
                let on_front =
                    Vector3::new(dx * BUTTON_OFFSET, dy * BUTTON_OFFSET, SURFACE_OFFSET);

                ButtonPlacement {
                    position: to_local.transform_vector(&on_front),
                    rotation: face_inverse + Vector3::new(0.0, 0.0, slot_roll(slot)),
                }
            })
        });

        Self { placements }
    }

    pub fn placement(&self, face: Face, slot: Slot) -> &ButtonPlacement {
        &self.placements[face.index() as usize][slot.index()]
    }

    /// Check every attachment point: once its face is snapped to the front,
    /// the button must sit on the front plane at its slot and read upright
    /// apart from the slot's roll.
    pub fn validate(&self) -> Result<()> {
        for face in Face::ALL {
            let to_front = Transform::rotation_matrix(&face.rotation());

            for slot in Slot::ALL {
                let placement = self.placement(face, slot);
                let (dx, dy) = slot_direction(slot);
                let expected =
                    Vector3::new(dx * BUTTON_OFFSET, dy * BUTTON_OFFSET, SURFACE_OFFSET);

                let on_front = to_front.transform_vector(&placement.position);
                if (on_front - expected).norm() > LAYOUT_EPSILON {
                    return Err(MenuError::Layout(format!(
                        "{:?}/{:?} button is off its face plane",
                        face, slot
                    )));
                }

                let orientation = to_front * Transform::rotation_matrix(&placement.rotation);
                let upright = Transform::rotation_matrix(&Vector3::new(0.0, 0.0, slot_roll(slot)));
                if (orientation - upright).norm() > LAYOUT_EPSILON {
                    return Err(MenuError::Layout(format!(
                        "{:?}/{:?} button is not aligned with its face",
                        face, slot
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self::standard()
    }
}
