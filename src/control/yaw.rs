use core::f64::consts::PI;

/// Wrap an angle difference from [-2PI, 2PI] into (-PI, PI].
pub fn wrap_pi(angle: f64) -> f64 {
    if angle > PI {
        angle - 2. * PI
    } else if angle <= -PI {
        angle + 2. * PI
    } else {
        angle
    }
}

/// Calculate the yaw-rate command in degrees/second to reach the commanded yaw
/// from the current yaw (in radians), with gain `k_yaw` and a feed-forward rate
/// in radians/second.
pub fn yaw_rate_control(yaw_cmd: f64, yaw: f64, k_yaw: f64, yaw_rate_ff: f64) -> f64 {
    // 1. Calculate the error in yaw between the commanded and current yaw.
    let yaw_error = wrap_pi(yaw_cmd - yaw);

    // 2. Output the yaw rate from the error and feed forward
    (-k_yaw * yaw_error - yaw_rate_ff).to_degrees()
}
