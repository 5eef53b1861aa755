/// Rotation-snap controller
///
/// Drives the cube's rotation from wherever it currently is to the rotation
/// of a target face, eased over a fixed duration. Only one snap runs at a
/// time: requests made while a snap is in flight are dropped rather than
/// retargeted or queued.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transform::{CubeObject, Face};

/// Timing for a snap, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub duration_ms: f64,
    /// Pause after the rotation lands before the snap counts as finished
    pub settle_delay_ms: f64,
}

impl SnapConfig {
    /// Total time a snap keeps navigation locked
    pub fn lockout_ms(&self) -> f64 {
        self.duration_ms + self.settle_delay_ms
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            settle_delay_ms: 25.0,
        }
    }
}

/// Ease-in-out cubic: `4t³` for the first half, `1 - (-2t + 2)³ / 2` after
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapPhase {
    Idle,
    Animating,
    /// Rotation has landed; waiting out the settle delay since `since_ms`
    Settling { since_ms: f64 },
}

/// Snap bookkeeping, owned by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub phase: SnapPhase,
    pub start_rotation: Vector3<f32>,
    pub target_rotation: Vector3<f32>,
    pub start_ms: f64,
    pub target_face: Face,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            phase: SnapPhase::Idle,
            start_rotation: Vector3::zeros(),
            target_rotation: Vector3::zeros(),
            start_ms: 0.0,
            target_face: Face::Front,
        }
    }
}

impl AnimationState {
    pub fn is_animating(&self) -> bool {
        self.phase != SnapPhase::Idle
    }
}

/// What a call to [`SnapController::update_rotation`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapStatus {
    Idle,
    Animating { progress: f32 },
    Settling,
    Completed(Face),
}

pub type SnapCallback = Box<dyn FnMut(Face)>;

pub struct SnapController {
    config: SnapConfig,
    state: AnimationState,
    object: Option<CubeObject>,
    on_complete: Option<SnapCallback>,
}

impl SnapController {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            state: AnimationState::default(),
            object: None,
            on_complete: None,
        }
    }

    /// Register a callback fired once per finished snap
    pub fn set_on_complete(&mut self, callback: impl FnMut(Face) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Attach the object to drive. Its current rotation becomes the resting
    /// rotation until the next snap.
    pub fn bind(&mut self, object: CubeObject) {
        self.state.target_rotation = object.rotation;
        self.object = Some(object);
    }

    /// Detach the object, abandoning any snap in flight
    pub fn unbind(&mut self) -> Option<CubeObject> {
        self.state.phase = SnapPhase::Idle;
        self.object.take()
    }

    pub fn object(&self) -> Option<&CubeObject> {
        self.object.as_ref()
    }

    pub fn object_mut(&mut self) -> Option<&mut CubeObject> {
        self.object.as_mut()
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Rotation the object rests at once the last snap finished
    pub fn rest_rotation(&self) -> Vector3<f32> {
        self.state.target_rotation
    }

    /// Start a snap towards `face`. Returns false when a snap is already
    /// running or no object is bound.
    pub fn snap_to_face(&mut self, face: Face, now_ms: f64) -> bool {
        if self.state.is_animating() {
            debug!(?face, "snap ignored, already animating");
            return false;
        }
        let Some(object) = self.object.as_ref() else {
            debug!(?face, "snap ignored, no object bound");
            return false;
        };

        self.state = AnimationState {
            phase: SnapPhase::Animating,
            start_rotation: object.rotation,
            target_rotation: face.rotation(),
            start_ms: now_ms,
            target_face: face,
        };
        debug!(?face, start_ms = now_ms, "snap started");
        true
    }

    /// Advance the snap to `now_ms`
    pub fn update_rotation(&mut self, now_ms: f64) -> SnapStatus {
        let Some(object) = self.object.as_mut() else {
            return SnapStatus::Idle;
        };

        match self.state.phase {
            SnapPhase::Idle => SnapStatus::Idle,
            SnapPhase::Settling { since_ms } => {
                if now_ms - since_ms >= self.config.settle_delay_ms {
                    self.finish()
                } else {
                    SnapStatus::Settling
                }
            }
            SnapPhase::Animating => {
                let progress = if self.config.duration_ms > 0.0 {
                    ((now_ms - self.state.start_ms) / self.config.duration_ms).clamp(0.0, 1.0)
                        as f32
                } else {
                    1.0
                };

                if progress < 1.0 {
                    let eased = ease_in_out_cubic(progress);
                    object.rotation = self
                        .state
                        .start_rotation
                        .zip_map(&self.state.target_rotation, |start, end| {
                            lerp(start, end, eased)
                        });
                    return SnapStatus::Animating { progress };
                }

                object.rotation = self.state.target_rotation;
                if self.config.settle_delay_ms > 0.0 {
                    self.state.phase = SnapPhase::Settling { since_ms: now_ms };
                    SnapStatus::Settling
                } else {
                    self.finish()
                }
            }
        }
    }

    fn finish(&mut self) -> SnapStatus {
        let face = self.state.target_face;
        self.state.phase = SnapPhase::Idle;
        debug!(?face, "snap complete");

        if let Some(callback) = self.on_complete.as_mut() {
            callback(face);
        }
        SnapStatus::Completed(face)
    }
}
