use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};

/// A desired orientation and force with feed-forward body rates and gains,
/// issued by an upstream attitude controller.
#[derive(Clone, Debug, PartialEq)]
pub struct AttitudeCommand {
    /// Desired orientation of the body in the world frame.
    pub orientation: UnitQuaternion<f64>,

    /// Desired force in the world frame (in N).
    pub force: Vector3<f64>,

    /// Feed-forward body angular velocity (in radians/second).
    pub angular_velocity: Vector3<f64>,

    /// Proportional gain on the rotation error.
    pub k_r: Vector3<f64>,

    /// Proportional gain on the angular velocity error.
    pub k_om: Vector3<f64>,

    pub enable_motors: bool,

    /// Roll and pitch offsets (in degrees) added in attitude mode.
    pub angle_corrections: Vector2<f64>,

    /// Time the command was issued (in seconds).
    pub stamp: f64,
}

impl Default for AttitudeCommand {
    fn default() -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
            force: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            k_r: Vector3::zeros(),
            k_om: Vector3::zeros(),
            enable_motors: false,
            angle_corrections: Vector2::zeros(),
            stamp: 0.,
        }
    }
}

impl AttitudeCommand {
    /// Create a command from a raw (possibly non-unit) orientation quaternion.
    pub fn new(orientation: Quaternion<f64>, stamp: f64) -> Self {
        Self {
            orientation: normalize_orientation(orientation),
            stamp,
            ..Self::default()
        }
    }

    /// Builder method to set `force` and return `self`
    pub fn with_force(mut self, force: Vector3<f64>) -> Self {
        self.force = force;
        self
    }

    /// Builder method to set `angular_velocity` and return `self`
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Builder method to set `k_r` and `k_om` and return `self`
    pub fn with_gains(mut self, k_r: Vector3<f64>, k_om: Vector3<f64>) -> Self {
        self.k_r = k_r;
        self.k_om = k_om;
        self
    }

    /// Builder method to set `enable_motors` and return `self`
    pub fn with_motors_enabled(mut self, enable_motors: bool) -> Self {
        self.enable_motors = enable_motors;
        self
    }

    /// Builder method to set `angle_corrections` and return `self`
    pub fn with_angle_corrections(mut self, angle_corrections: Vector2<f64>) -> Self {
        self.angle_corrections = angle_corrections;
        self
    }
}

/// A pose and body rate sample from the vehicle's odometry.
#[derive(Clone, Debug, PartialEq)]
pub struct OdometrySample {
    /// Time of the sample (in seconds).
    pub stamp: f64,

    pub orientation: UnitQuaternion<f64>,

    /// Body-frame angular velocity (in radians/second).
    pub angular_velocity: Vector3<f64>,
}

impl OdometrySample {
    pub fn new(stamp: f64, orientation: Quaternion<f64>, angular_velocity: Vector3<f64>) -> Self {
        Self {
            stamp,
            orientation: normalize_orientation(orientation),
            angular_velocity,
        }
    }
}

/// Low-level output consumed by the vehicle's onboard controller.
///
/// `roll` and `pitch` are angles in degrees in attitude mode,
/// or body rates in degrees/second in rate mode.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActuatorCommand {
    pub roll: f64,
    pub pitch: f64,
    pub thrust: u16,

    /// Yaw rate (in degrees/second).
    pub yaw_rate: f64,
}

impl ActuatorCommand {
    pub const ZERO: Self = Self {
        roll: 0.,
        pitch: 0.,
        thrust: 0,
        yaw_rate: 0.,
    };

    /// A command with every axis at zero except `thrust`.
    pub fn thrust_only(thrust: u16) -> Self {
        Self {
            thrust,
            ..Self::ZERO
        }
    }
}

/// Normalize a received quaternion, falling back to the identity rotation
/// when it has no usable direction.
pub fn normalize_orientation(q: Quaternion<f64>) -> UnitQuaternion<f64> {
    let norm = q.norm();
    if norm.is_finite() && norm > f64::EPSILON {
        UnitQuaternion::from_quaternion(q)
    } else {
        log::warn!("Replacing malformed orientation {:?} with identity", q.coords);
        UnitQuaternion::identity()
    }
}
