use crate::command::OdometrySample;
use nalgebra::{UnitQuaternion, Vector3};

/// Smallest time step (in seconds) used to difference angular velocity.
pub const MIN_DT: f64 = 1e-6;

/// Tracks the vehicle orientation and body rates from odometry
/// and estimates angular acceleration by finite differencing.
#[derive(Clone, Debug)]
pub struct OrientationEstimator {
    orientation: UnitQuaternion<f64>,
    angular_velocity: Vector3<f64>,
    // Reference sample for differencing, only advanced past the dt guard
    previous_angular_velocity: Vector3<f64>,
    angular_acceleration: Vector3<f64>,
    last_stamp: f64,
    is_initialised: bool,
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            previous_angular_velocity: Vector3::zeros(),
            angular_acceleration: Vector3::zeros(),
            last_stamp: 0.,
            is_initialised: false,
        }
    }
}

impl OrientationEstimator {
    pub fn update(&mut self, sample: &OdometrySample) {
        if self.is_initialised {
            let dt = sample.stamp - self.last_stamp;

            // Hold the previous estimate for duplicate or out of order stamps
            if dt > MIN_DT {
                self.angular_acceleration =
                    (sample.angular_velocity - self.previous_angular_velocity) / dt;
                self.previous_angular_velocity = sample.angular_velocity;
                self.last_stamp = sample.stamp;
            }
        } else {
            self.is_initialised = true;
            self.previous_angular_velocity = sample.angular_velocity;
            self.last_stamp = sample.stamp;
            self.angular_acceleration = Vector3::zeros();
        }

        self.orientation = sample.orientation;
        self.angular_velocity = sample.angular_velocity;
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    /// Latest body angular velocity (in radians/second).
    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity
    }

    /// Estimated body angular acceleration (in radians/second^2).
    pub fn angular_acceleration(&self) -> Vector3<f64> {
        self.angular_acceleration
    }

    /// Stamp of the last sample accepted for differencing.
    pub fn last_stamp(&self) -> f64 {
        self.last_stamp
    }

    pub fn is_initialised(&self) -> bool {
        self.is_initialised
    }
}

#[cfg(test)]
mod tests {
    use super::OrientationEstimator;
    use crate::command::OdometrySample;
    use approx::assert_relative_eq;
    use nalgebra::{Quaternion, UnitQuaternion, Vector3};

    fn sample(stamp: f64, w: Vector3<f64>) -> OdometrySample {
        OdometrySample::new(stamp, Quaternion::identity(), w)
    }

    #[test]
    fn first_sample_seeds_zero_acceleration() {
        let mut estimator = OrientationEstimator::default();
        assert!(!estimator.is_initialised());

        estimator.update(&sample(1., Vector3::new(1., 2., 3.)));

        assert!(estimator.is_initialised());
        assert_eq!(estimator.angular_acceleration(), Vector3::zeros());
        assert_eq!(estimator.angular_velocity(), Vector3::new(1., 2., 3.));
        assert_eq!(estimator.last_stamp(), 1.);
    }

    #[test]
    fn it_differences_angular_velocity() {
        let mut estimator = OrientationEstimator::default();
        estimator.update(&sample(1., Vector3::new(0., 0., 0.)));
        estimator.update(&sample(1.1, Vector3::new(1., -2., 0.5)));

        let accel = estimator.angular_acceleration();
        assert_relative_eq!(accel.x, 10., epsilon = 1e-9);
        assert_relative_eq!(accel.y, -20., epsilon = 1e-9);
        assert_relative_eq!(accel.z, 5., epsilon = 1e-9);
    }

    #[test]
    fn near_duplicate_stamps_hold_the_estimate() {
        let mut estimator = OrientationEstimator::default();
        estimator.update(&sample(1., Vector3::zeros()));
        estimator.update(&sample(2., Vector3::new(1., 0., 0.)));
        let accel = estimator.angular_acceleration();

        estimator.update(&sample(2. + 5e-7, Vector3::new(100., 0., 0.)));
        assert_eq!(estimator.angular_acceleration(), accel);
        assert_eq!(estimator.last_stamp(), 2.);

        // The rejected sample is not used as the next reference
        estimator.update(&sample(3., Vector3::new(2., 0., 0.)));
        assert_relative_eq!(estimator.angular_acceleration().x, 1., epsilon = 1e-9);
    }

    #[test]
    fn orientation_always_advances() {
        let mut estimator = OrientationEstimator::default();
        estimator.update(&sample(1., Vector3::zeros()));

        let yawed = Quaternion::new(0., 0., 0., 1.);
        estimator.update(&OdometrySample::new(1., yawed, Vector3::new(0., 0., 4.)));

        assert_eq!(estimator.orientation(), UnitQuaternion::from_quaternion(yawed));
        assert_eq!(estimator.angular_velocity(), Vector3::new(0., 0., 4.));
        assert_eq!(estimator.angular_acceleration(), Vector3::zeros());
    }
}
