use crate::arming::{ArmingStateMachine, RampCommand};
use crate::clock::now_seconds;
use crate::command::{ActuatorCommand, AttitudeCommand, OdometrySample};
use crate::config::Config;
use crate::control::CommandTranslator;
use crate::estimator::OrientationEstimator;
use crate::hal::{transmit, Actuator, Channel, ControlLink};
use crate::packet::ControlPacket;
use crate::watchdog::CommandWatchdog;
use crate::Error;
use embedded_hal::blocking::delay::DelayMs;
use embedded_time::Clock;
use std::time::Duration;

/// Power off, settle, power on sequence owed to a vehicle after disarming.
///
/// No other command may be handled for the vehicle until it completes.
#[must_use = "the vehicle stays latched disarmed until it is power cycled"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerCycle {
    settle: Duration,
}

impl PowerCycle {
    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn power_off<L: ControlLink>(&self, link: &mut L) -> bool {
        transmit(link, ControlPacket::PowerOff)
    }

    pub fn power_on<L: ControlLink>(self, link: &mut L) -> bool {
        transmit(link, ControlPacket::PowerOn)
    }

    /// Complete the sequence, blocking on `delay` while the vehicle settles.
    pub fn run<L, D>(self, link: &mut L, delay: &mut D)
    where
        L: ControlLink,
        D: DelayMs<u16>,
    {
        self.power_off(link);
        delay.delay_ms(u16::try_from(self.settle.as_millis()).unwrap_or(u16::MAX));
        self.power_on(link);
    }
}

/// Command translation state for a single vehicle.
///
/// Commands and odometry must be dispatched one at a time.
pub struct Session<L, A, C> {
    config: Config,
    estimator: OrientationEstimator,
    translator: CommandTranslator,
    arming: ArmingStateMachine,
    watchdog: CommandWatchdog,
    link: L,
    actuator: A,
    clock: C,
}

impl<L, A, C> Session<L, A, C>
where
    L: ControlLink,
    A: Actuator,
    C: Clock<T = u64>,
{
    pub fn new(config: Config, link: L, actuator: A, clock: C) -> Self {
        log::info!(
            "{}: thrust curve c1 {:.2}, c2 {:.2}, c3 {:.2}, range {}..{}",
            config.mav_name,
            config.thrust_curve.c1,
            config.thrust_curve.c2,
            config.thrust_curve.c3,
            config.thrust_min,
            config.thrust_max,
        );
        log::info!(
            "{}: {:?} mode, kp yaw rate {:.2}, angular acceleration D gain {:.2}, command timeout {:?}",
            config.mav_name,
            config.control_mode,
            config.kp_yaw_rate,
            config.ang_acc_d_gain,
            config.command_timeout,
        );
        if config.is_brushless {
            log::info!("{}: arming through {}", config.mav_name, config.packet_service());
        }

        Self {
            estimator: OrientationEstimator::default(),
            translator: config.translator(),
            arming: ArmingStateMachine::new(config.is_brushless),
            watchdog: CommandWatchdog::new(config.command_timeout),
            config,
            link,
            actuator,
            clock,
        }
    }

    /// Handle an attitude command, publishing the resulting actuator commands.
    ///
    /// Returns the power cycle the caller must complete if this command disarmed the vehicle.
    pub fn handle_command(&mut self, cmd: AttitudeCommand) -> Option<PowerCycle> {
        let step = self.arming.step(cmd.enable_motors);

        if let Some(packet) = step.arm {
            transmit(&mut self.link, packet);
        }

        if let Some(ramp) = step.ramp {
            let output = match ramp {
                RampCommand::Zero => ActuatorCommand::ZERO,
                RampCommand::MinThrust => ActuatorCommand::thrust_only(self.config.thrust_min),
            };
            self.actuator.output(Channel::Ramp, output);
        }

        // During the minimum thrust ramp both outputs are published
        if step.translate {
            let output = self.translator.translate(&cmd, &self.estimator);
            self.actuator.output(Channel::Primary, output);
        }

        if let Some(packet) = step.disarm {
            transmit(&mut self.link, packet);
        }

        self.watchdog.record(&cmd);

        step.power_cycle.then(|| {
            log::info!("{}: power cycling to clear the disarmed latch", self.config.mav_name);
            PowerCycle {
                settle: self.config.power_cycle_settle,
            }
        })
    }

    /// Handle a command, blocking on `delay` for any power cycle it triggers.
    pub fn handle_command_blocking<D: DelayMs<u16>>(&mut self, cmd: AttitudeCommand, delay: &mut D) {
        if let Some(power_cycle) = self.handle_command(cmd) {
            power_cycle.run(&mut self.link, delay);
        }
    }

    /// Update orientation feedback, replaying the last command if the command source has stalled.
    pub fn handle_odometry(&mut self, sample: OdometrySample) -> Result<Option<PowerCycle>, Error> {
        self.estimator.update(&sample);

        let now = now_seconds(&self.clock)?;
        let Some(cmd) = self.watchdog.stale(now).cloned() else {
            return Ok(None);
        };

        log::debug!(
            "{}: replaying command from {:.3}s, {:.3}s without a command",
            self.config.mav_name,
            cmd.stamp,
            now - cmd.stamp,
        );
        Ok(self.handle_command(cmd))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn estimator(&self) -> &OrientationEstimator {
        &self.estimator
    }

    pub fn arming(&self) -> &ArmingStateMachine {
        &self.arming
    }

    pub fn watchdog(&self) -> &CommandWatchdog {
        &self.watchdog
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}
