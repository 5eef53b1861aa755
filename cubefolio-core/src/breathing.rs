/// Idle "breathing" motion applied while no snap is running
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::snap::lerp;
use crate::transform::CubeObject;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    /// Peak vertical offset
    pub bounce_amplitude: f32,
    /// Bounce angular speed, radians per second
    pub bounce_speed: f32,
    /// Peak tilt on the x and z axes, radians
    pub wobble_amplitude: f32,
    pub wobble_speed: f32,
    /// Fraction of the remaining distance covered each frame
    pub smoothing: f32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            bounce_amplitude: 0.05,
            bounce_speed: 1.0,
            wobble_amplitude: 0.02,
            wobble_speed: 0.5,
            smoothing: 0.1,
        }
    }
}

/// Pose the breathing motion is heading towards at a given time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathingPose {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Breathing {
    config: BreathingConfig,
}

impl Breathing {
    pub fn new(config: BreathingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BreathingConfig {
        &self.config
    }

    /// Sinusoidal target around `rest_rotation` at `elapsed_secs`
    pub fn pose(&self, rest_rotation: &Vector3<f32>, elapsed_secs: f64) -> BreathingPose {
        let c = &self.config;
        let bounce_phase = (elapsed_secs * c.bounce_speed as f64) as f32;
        let wobble_phase = (elapsed_secs * c.wobble_speed as f64) as f32;

        BreathingPose {
            position: Vector3::new(0.0, bounce_phase.sin() * c.bounce_amplitude, 0.0),
            rotation: Vector3::new(
                rest_rotation.x + wobble_phase.cos() * c.wobble_amplitude,
                rest_rotation.y,
                rest_rotation.z + wobble_phase.sin() * c.wobble_amplitude,
            ),
        }
    }

    /// Move `object` one smoothing step towards the pose, so breathing picks
    /// up from wherever the last snap left it.
    pub fn apply(&self, object: &mut CubeObject, rest_rotation: &Vector3<f32>, elapsed_secs: f64) {
        let pose = self.pose(rest_rotation, elapsed_secs);
        let t = self.config.smoothing;

        object.position = object.position.zip_map(&pose.position, |from, to| lerp(from, to, t));
        object.rotation = object.rotation.zip_map(&pose.rotation, |from, to| lerp(from, to, t));
    }
}
