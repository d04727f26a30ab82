use nalgebra::{UnitQuaternion, Vector3};

const GRAVITY: f64 = 9.81;

/// Square-root curve mapping thrust (in grams) to a normalized actuator value:
/// `c1 + c2 * sqrt(c3 + grams)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustCurve {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl ThrustCurve {
    pub fn new(c1: f64, c2: f64, c3: f64) -> Self {
        Self { c1, c2, c3 }
    }

    /// Normalized actuator output for a thrust in grams.
    pub fn normalized(&self, grams: f64) -> f64 {
        self.c1 + self.c2 * (self.c3 + grams).sqrt()
    }
}

/// Maps a desired force onto the integer thrust scale of the actuator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustController {
    pub curve: ThrustCurve,

    /// Lowest output, enough to overcome motor stiction.
    pub min: u16,

    /// Output at a normalized thrust of 1.
    pub max: u16,
}

impl ThrustController {
    /// Calculate the collective thrust command for a desired force (in N)
    /// at the current attitude.
    pub fn thrust_control(&self, force_cmd: &Vector3<f64>, attitude: &UnitQuaternion<f64>) -> u16 {
        // 1. Project the desired force onto the body z-axis, the vehicle can't push downwards
        let body_z = attitude.to_rotation_matrix().matrix().column(2).into_owned();
        let thrust = force_cmd.dot(&body_z).max(0.);

        // 2. Convert from Newtons to grams and apply the thrust curve
        let output = self.curve.normalized(force_to_grams(thrust)) * self.max as f64;

        self.constrain(output)
    }

    fn constrain(&self, output: f64) -> u16 {
        if output.is_nan() {
            return self.min;
        }
        output.max(self.min as f64).min(self.max as f64).round() as u16
    }
}

/// Convert a force in Newtons to the mass (in grams) it would lift.
pub fn force_to_grams(force: f64) -> f64 {
    force * 1000. / GRAVITY
}
