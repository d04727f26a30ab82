//! Control laws mapping an [`AttitudeCommand`] onto an [`ActuatorCommand`].
//!
//! [`CommandTranslator`] combines the [`attitude`], [`thrust`], [`yaw`] and
//! [`body_rate`] controllers for the selected [`ControlMode`].

pub mod attitude;
pub use attitude::roll_pitch_control;

pub mod body_rate;
pub use body_rate::body_rate_control;

pub mod thrust;
pub use thrust::{ThrustController, ThrustCurve};

pub mod yaw;
pub use yaw::{wrap_pi, yaw_rate_control};

use crate::command::{ActuatorCommand, AttitudeCommand};
use crate::estimator::OrientationEstimator;

/// What the roll and pitch axes of an [`ActuatorCommand`] carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlMode {
    /// Roll and pitch angles in degrees.
    #[default]
    Attitude,

    /// Roll and pitch body rates in degrees/second.
    Rate,
}

#[derive(Clone, Debug)]
pub struct CommandTranslator {
    pub mode: ControlMode,
    pub thrust: ThrustController,

    /// Gain on the estimated angular acceleration in rate mode.
    pub ang_acc_d_gain: f64,
}

impl CommandTranslator {
    pub fn new(mode: ControlMode, thrust: ThrustController, ang_acc_d_gain: f64) -> Self {
        Self {
            mode,
            thrust,
            ang_acc_d_gain,
        }
    }

    /// Translate a command against the current orientation feedback.
    pub fn translate(
        &self,
        cmd: &AttitudeCommand,
        estimator: &OrientationEstimator,
    ) -> ActuatorCommand {
        let attitude = estimator.orientation();

        let yaw_cmd = attitude::yaw(&cmd.orientation.to_rotation_matrix());
        let yaw = attitude::yaw(&attitude.to_rotation_matrix());
        let yaw_rate = yaw_rate_control(yaw_cmd, yaw, cmd.k_r.z, cmd.angular_velocity.z);

        let thrust = self.thrust.thrust_control(&cmd.force, &attitude);

        let (roll, pitch) = match self.mode {
            ControlMode::Attitude => {
                let (roll, pitch) = roll_pitch_control(&cmd.orientation, &attitude);
                (roll + cmd.angle_corrections.x, pitch + cmd.angle_corrections.y)
            }
            ControlMode::Rate => body_rate_control(
                &cmd.angular_velocity,
                &estimator.angular_velocity(),
                &estimator.angular_acceleration(),
                &cmd.k_om,
                self.ang_acc_d_gain,
            ),
        };

        ActuatorCommand {
            roll,
            pitch,
            thrust,
            yaw_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandTranslator, ControlMode, ThrustController, ThrustCurve};
    use crate::command::{AttitudeCommand, OdometrySample};
    use crate::estimator::OrientationEstimator;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};

    fn translator(mode: ControlMode) -> CommandTranslator {
        CommandTranslator::new(
            mode,
            ThrustController {
                curve: ThrustCurve::new(0.2, 0.05, 1.),
                min: 10000,
                max: 60000,
            },
            0.1,
        )
    }

    #[test]
    fn hover_command_at_level_attitude() {
        let cmd = AttitudeCommand::new(Quaternion::identity(), 0.)
            .with_force(Vector3::new(0., 0., 5.))
            .with_motors_enabled(true);

        let out = translator(ControlMode::Attitude).translate(&cmd, &OrientationEstimator::default());
        assert_abs_diff_eq!(out.roll, 0., epsilon = 1e-9);
        assert_abs_diff_eq!(out.pitch, 0., epsilon = 1e-9);
        assert_abs_diff_eq!(out.yaw_rate, 0., epsilon = 1e-9);
        assert_eq!(out.thrust, 60000);
    }

    #[test]
    fn attitude_mode_adds_angle_corrections() {
        let q = UnitQuaternion::from_euler_angles(5f64.to_radians(), 0., 0.);
        let cmd = AttitudeCommand::new(q.into_inner(), 0.)
            .with_angle_corrections(Vector2::new(1.5, -2.));

        let out = translator(ControlMode::Attitude).translate(&cmd, &OrientationEstimator::default());
        assert_abs_diff_eq!(out.roll, 6.5, epsilon = 1e-9);
        assert_abs_diff_eq!(out.pitch, -2., epsilon = 1e-9);
    }

    #[test]
    fn rate_mode_uses_estimated_rates() {
        let mut estimator = OrientationEstimator::default();
        estimator.update(&OdometrySample::new(0., Quaternion::identity(), Vector3::zeros()));
        estimator.update(&OdometrySample::new(
            0.5,
            Quaternion::identity(),
            Vector3::new(0.5, 1., 0.),
        ));

        let cmd = AttitudeCommand::new(Quaternion::identity(), 0.)
            .with_angular_velocity(Vector3::new(1., 1., 0.))
            .with_gains(Vector3::zeros(), Vector3::new(2., 2., 0.))
            .with_angle_corrections(Vector2::new(30., 30.));

        let out = translator(ControlMode::Rate).translate(&cmd, &estimator);

        // Acceleration is (1, 2, 0): 2 * 0.5 - 0.1 and 2 * 0 - 0.2
        assert_abs_diff_eq!(out.roll, 0.9f64.to_degrees(), epsilon = 1e-9);
        assert_abs_diff_eq!(out.pitch, (-0.2f64).to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn yaw_rate_follows_heading_error() {
        let cmd_q = UnitQuaternion::from_euler_angles(0., 0., 0.3);
        let cmd = AttitudeCommand::new(cmd_q.into_inner(), 0.)
            .with_angular_velocity(Vector3::new(0., 0., 0.1))
            .with_gains(Vector3::new(0., 0., 2.), Vector3::zeros());

        let out = translator(ControlMode::Attitude).translate(&cmd, &OrientationEstimator::default());
        assert_abs_diff_eq!(out.yaw_rate, (-2. * 0.3 - 0.1f64).to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn outputs_are_finite_for_arbitrary_attitudes() {
        let t = translator(ControlMode::Attitude);
        let angles = [-3.1, -1.2, -0.3, 0., 0.7, 1.5, 3.1];
        for &r in &angles {
            for &y in &angles {
                let cmd = AttitudeCommand::new(
                    UnitQuaternion::from_euler_angles(r, y * 0.4, y).into_inner(),
                    0.,
                );
                let mut estimator = OrientationEstimator::default();
                estimator.update(&OdometrySample::new(
                    0.,
                    UnitQuaternion::from_euler_angles(y * 0.1, r * 0.2, r).into_inner(),
                    Vector3::zeros(),
                ));

                let out = t.translate(&cmd, &estimator);
                assert!(out.roll.is_finite() && out.pitch.is_finite() && out.yaw_rate.is_finite());
                assert!((10000..=60000).contains(&out.thrust));
            }
        }
    }
}
