use crate::control::{CommandTranslator, ControlMode, ThrustController, ThrustCurve};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),

    #[error("parameter `{0}` must be finite")]
    NotFinite(&'static str),

    #[error("parameter `{0}` must not be negative")]
    Negative(&'static str),

    #[error("thrust_pwm_min ({min}) is above thrust_pwm_max ({max})")]
    ThrustRange { min: u16, max: u16 },

    #[error("invalid parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable configuration for one vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Vehicle name, used to address its control packet service.
    pub mav_name: String,

    pub kp_yaw_rate: f64,
    pub thrust_curve: ThrustCurve,
    pub ang_acc_d_gain: f64,

    /// Command silence after which the last command is replayed.
    pub command_timeout: Duration,

    /// Brushless vehicles need explicit arm and disarm packets.
    pub is_brushless: bool,

    pub control_mode: ControlMode,
    pub thrust_min: u16,
    pub thrust_max: u16,

    /// Wait between powering the vehicle off and on again after a disarm.
    pub power_cycle_settle: Duration,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load parameters from a JSON object keyed by parameter name.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Params = serde_json::from_str(json)?;
        params.into_builder().build()
    }

    /// Name of the service that accepts control packets for this vehicle.
    pub fn packet_service(&self) -> String {
        format!("/{}/send_packet", self.mav_name)
    }

    pub fn translator(&self) -> CommandTranslator {
        CommandTranslator::new(
            self.control_mode,
            ThrustController {
                curve: self.thrust_curve,
                min: self.thrust_min,
                max: self.thrust_max,
            },
            self.ang_acc_d_gain,
        )
    }
}

pub struct ConfigBuilder {
    mav_name: Option<String>,
    kp_yaw_rate: Option<f64>,
    c1: Option<f64>,
    c2: Option<f64>,
    c3: Option<f64>,
    ang_acc_d_gain: Option<f64>,
    command_timeout: f64,
    is_brushless: bool,
    control_mode: ControlMode,
    thrust_min: u16,
    thrust_max: u16,
    power_cycle_settle: f64,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            mav_name: None,
            kp_yaw_rate: None,
            c1: None,
            c2: None,
            c3: None,
            ang_acc_d_gain: None,
            command_timeout: 0.1,
            is_brushless: false,
            control_mode: ControlMode::Attitude,
            thrust_min: 10000,
            thrust_max: 60000,
            power_cycle_settle: 0.5,
        }
    }
}

impl ConfigBuilder {
    pub fn mav_name(mut self, name: impl Into<String>) -> Self {
        self.mav_name = Some(name.into());
        self
    }

    pub fn kp_yaw_rate(mut self, kp: f64) -> Self {
        self.kp_yaw_rate = Some(kp);
        self
    }

    pub fn thrust_curve(mut self, c1: f64, c2: f64, c3: f64) -> Self {
        self.c1 = Some(c1);
        self.c2 = Some(c2);
        self.c3 = Some(c3);
        self
    }

    pub fn ang_acc_d_gain(mut self, gain: f64) -> Self {
        self.ang_acc_d_gain = Some(gain);
        self
    }

    /// Command timeout in seconds.
    pub fn command_timeout(mut self, seconds: f64) -> Self {
        self.command_timeout = seconds;
        self
    }

    pub fn brushless(mut self, is_brushless: bool) -> Self {
        self.is_brushless = is_brushless;
        self
    }

    pub fn control_mode(mut self, mode: ControlMode) -> Self {
        self.control_mode = mode;
        self
    }

    pub fn thrust_range(mut self, min: u16, max: u16) -> Self {
        self.thrust_min = min;
        self.thrust_max = max;
        self
    }

    /// Power cycle settle time in seconds.
    pub fn power_cycle_settle(mut self, seconds: f64) -> Self {
        self.power_cycle_settle = seconds;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mav_name = self.mav_name.ok_or(ConfigError::Missing("mav_name"))?;
        let kp_yaw_rate = required("kp_yaw_rate", self.kp_yaw_rate)?;
        let c1 = required("c1", self.c1)?;
        let c2 = required("c2", self.c2)?;
        let c3 = required("c3", self.c3)?;
        let ang_acc_d_gain = required("ang_acc_d_gain", self.ang_acc_d_gain)?;

        if self.thrust_min > self.thrust_max {
            return Err(ConfigError::ThrustRange {
                min: self.thrust_min,
                max: self.thrust_max,
            });
        }

        Ok(Config {
            mav_name,
            kp_yaw_rate,
            thrust_curve: ThrustCurve::new(c1, c2, c3),
            ang_acc_d_gain,
            command_timeout: seconds("so3_cmd_timeout", self.command_timeout)?,
            is_brushless: self.is_brushless,
            control_mode: self.control_mode,
            thrust_min: self.thrust_min,
            thrust_max: self.thrust_max,
            power_cycle_settle: seconds("power_cycle_settle", self.power_cycle_settle)?,
        })
    }
}

fn required(name: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(name))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite(name))
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() {
        Err(ConfigError::NotFinite(name))
    } else if value < 0. {
        Err(ConfigError::Negative(name))
    } else {
        Ok(Duration::from_secs_f64(value))
    }
}

/// Flat parameter set as supplied by the host.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    mav_name: Option<String>,
    kp_yaw_rate: Option<f64>,
    c1: Option<f64>,
    c2: Option<f64>,
    c3: Option<f64>,
    ang_acc_d_gain: Option<f64>,
    so3_cmd_timeout: Option<f64>,
    is_brushless: Option<bool>,
    send_ctbr_cmds: Option<bool>,
    thrust_pwm_min: Option<u16>,
    thrust_pwm_max: Option<u16>,
    power_cycle_settle: Option<f64>,
}

impl Params {
    fn into_builder(self) -> ConfigBuilder {
        let mut builder = ConfigBuilder {
            mav_name: self.mav_name,
            kp_yaw_rate: self.kp_yaw_rate,
            c1: self.c1,
            c2: self.c2,
            c3: self.c3,
            ang_acc_d_gain: self.ang_acc_d_gain,
            ..ConfigBuilder::default()
        };

        if let Some(timeout) = self.so3_cmd_timeout {
            builder.command_timeout = timeout;
        }
        if let Some(is_brushless) = self.is_brushless {
            builder.is_brushless = is_brushless;
        }
        if self.send_ctbr_cmds == Some(true) {
            builder.control_mode = ControlMode::Rate;
        }
        if let Some(min) = self.thrust_pwm_min {
            builder.thrust_min = min;
        }
        if let Some(max) = self.thrust_pwm_max {
            builder.thrust_max = max;
        }
        if let Some(settle) = self.power_cycle_settle {
            builder.power_cycle_settle = settle;
        }
        builder
    }
}
