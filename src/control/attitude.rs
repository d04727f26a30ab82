use nalgebra::{Rotation3, UnitQuaternion, Vector3};

/// Heading (in radians) of a rotation, measured from the world x-axis.
pub fn yaw(rotation: &Rotation3<f64>) -> f64 {
    rotation[(1, 0)].atan2(rotation[(0, 0)])
}

/// Calculate the roll and pitch commands (in degrees) for a desired attitude
/// relative to the heading the vehicle currently has.
///
/// Roll/pitch and yaw are actuated independently, so the desired rotation is
/// first re-expressed at the current yaw to remove yaw coupling.
pub fn roll_pitch_control(
    attitude_cmd: &UnitQuaternion<f64>,
    attitude: &UnitQuaternion<f64>,
) -> (f64, f64) {
    let rotation_cmd = attitude_cmd.to_rotation_matrix();
    let rotation = attitude.to_rotation_matrix();

    // 1. Rotate the commanded attitude about z by the heading difference
    let heading = Rotation3::from_axis_angle(
        &Vector3::z_axis(),
        yaw(&rotation) - yaw(&rotation_cmd),
    );
    let rotation_cmd = rotation_cmd * heading;

    // 2. Extract the ZYX euler angles of the re-expressed attitude
    let pitch = -rotation_cmd[(2, 0)].clamp(-1., 1.).asin();
    let roll = rotation_cmd[(2, 1)].atan2(rotation_cmd[(2, 2)]);

    (roll.to_degrees(), pitch.to_degrees())
}
