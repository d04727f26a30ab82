//! # so3-flight-bridge
//! Translate high level attitude/force commands into the low level commands
//! of a small quad-rotor flight controller.
//!
//! [`Session`] holds the state for one vehicle: the [`OrientationEstimator`]
//! fed by odometry, the [`CommandTranslator`] control laws, the
//! [`ArmingStateMachine`] that warms up the motors and the [`CommandWatchdog`]
//! that replays the last command when the command source stalls.
//!
//! [`hal`] contains the traits for the control packet link and the actuator
//! command sink. [`dispatch`] runs a session from tokio channels.
//!
//! ```
//! use so3_flight_bridge::{ActuatorCommand, AttitudeCommand, Channel, Config, ControlLink};
//! use so3_flight_bridge::{ControlPacket, LinkError, Published, Session, SystemClock};
//! use nalgebra::{Quaternion, Vector3};
//!
//! struct Radio;
//!
//! impl ControlLink for Radio {
//!     fn send(&mut self, _packet: &ControlPacket) -> Result<(), LinkError> {
//!         Ok(())
//!     }
//! }
//!
//! let config = Config::builder()
//!     .mav_name("cf1")
//!     .kp_yaw_rate(1.)
//!     .thrust_curve(0.2, 0.05, 1.)
//!     .ang_acc_d_gain(0.)
//!     .build()?;
//!
//! let mut session = Session::new(config, Radio, Vec::<Published>::new(), SystemClock);
//!
//! // The first enabled command is a zero command on the ramp channel
//! let cmd = AttitudeCommand::new(Quaternion::identity(), 0.)
//!     .with_force(Vector3::new(0., 0., 0.3))
//!     .with_motors_enabled(true);
//! assert!(session.handle_command(cmd).is_none());
//! assert_eq!(session.actuator()[0], (Channel::Ramp, ActuatorCommand::ZERO));
//! # Ok::<(), so3_flight_bridge::ConfigError>(())
//! ```

pub mod arming;
pub use arming::{ArmState, ArmingStateMachine};

pub mod clock;
pub use clock::{StdDelay, SystemClock};

pub mod command;
pub use command::{ActuatorCommand, AttitudeCommand, OdometrySample};

pub mod config;
pub use config::{Config, ConfigBuilder, ConfigError};

pub mod control;
pub use control::{CommandTranslator, ControlMode};

pub mod dispatch;

mod error;
pub use error::Error;

pub mod estimator;
pub use estimator::OrientationEstimator;

pub mod hal;
pub use hal::{Actuator, Channel, ControlLink, LinkError, Published};

pub mod packet;
pub use packet::ControlPacket;

pub mod session;
pub use session::{PowerCycle, Session};

pub mod watchdog;
pub use watchdog::{CachedCommand, CommandWatchdog};
