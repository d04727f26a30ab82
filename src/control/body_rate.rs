use nalgebra::Vector3;

/// Calculate the roll-rate and pitch-rate commands in degrees/second.
///
/// A proportional term on the body rate error is damped by the estimated
/// angular acceleration scaled by `d_gain`.
pub fn body_rate_control(
    body_rate_cmd: &Vector3<f64>,
    body_rate: &Vector3<f64>,
    angular_acceleration: &Vector3<f64>,
    k_p: &Vector3<f64>,
    d_gain: f64,
) -> (f64, f64) {
    let p_term = k_p.component_mul(&(body_rate_cmd - body_rate));
    let d_term = angular_acceleration * d_gain;
    let rate = p_term - d_term;

    (rate.x.to_degrees(), rate.y.to_degrees())
}
