//! Motor arming, ramp-up and disarm sequencing.
//!
//! The actuator firmware sits in a deadband near zero thrust and only accepts
//! real commands after a warm-up: three zero commands followed by seven
//! commands at minimum thrust. Once disarmed, the firmware latches that state
//! until the vehicle is power cycled.

use crate::packet::ControlPacket;

/// Number of zero commands sent after the motors are enabled.
pub const RAMP_ZERO_CYCLES: u32 = 3;

/// Cycle count at which ramping ends and only translated commands are sent.
pub const RAMP_END: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArmState {
    #[default]
    Disarmed,
    RampZero,
    RampMin,
    Ready,
}

impl ArmState {
    fn from_cycle(cycle: u32) -> Self {
        if cycle < RAMP_ZERO_CYCLES {
            ArmState::RampZero
        } else if cycle < RAMP_END {
            ArmState::RampMin
        } else {
            ArmState::Ready
        }
    }
}

/// Placeholder command to publish on the ramp channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RampCommand {
    Zero,
    MinThrust,
}

/// Side effects and outputs of one command cycle, in the order they apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArmingStep {
    /// Arm request sent before any output of an enabling cycle.
    pub arm: Option<ControlPacket>,

    pub ramp: Option<RampCommand>,

    /// Whether the translated command is published on the primary channel.
    pub translate: bool,

    /// Disarm request sent after the ramp output of a disabling cycle.
    pub disarm: Option<ControlPacket>,

    /// Whether the vehicle must be power cycled after disarming.
    pub power_cycle: bool,
}

#[derive(Clone, Debug)]
pub struct ArmingStateMachine {
    state: ArmState,
    cycle: u32,
    is_armed: bool,
    requires_arming: bool,
}

impl ArmingStateMachine {
    /// Create a disarmed state machine.
    /// `requires_arming` gates the arm, disarm and power cycle side effects.
    pub fn new(requires_arming: bool) -> Self {
        Self {
            state: ArmState::Disarmed,
            cycle: 0,
            is_armed: false,
            requires_arming,
        }
    }

    pub fn state(&self) -> ArmState {
        self.state
    }

    /// Commands handled since the motors were last enabled.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn is_armed(&self) -> bool {
        self.is_armed
    }

    /// Advance the state machine for a command with the given motor flag.
    ///
    /// The armed flag follows intent, regardless of whether the
    /// resulting packets are delivered.
    pub fn step(&mut self, motors_enabled: bool) -> ArmingStep {
        if motors_enabled {
            self.enable()
        } else {
            self.disable()
        }
    }

    fn enable(&mut self) -> ArmingStep {
        let mut step = ArmingStep::default();

        if self.requires_arming && !self.is_armed {
            step.arm = Some(ControlPacket::Arm(true));
            self.is_armed = true;
        }

        if self.state == ArmState::Disarmed {
            self.state = ArmState::RampZero;
            self.cycle = 0;
        }

        match self.state {
            ArmState::RampZero => step.ramp = Some(RampCommand::Zero),
            ArmState::RampMin => {
                step.ramp = Some(RampCommand::MinThrust);
                step.translate = true;
            }
            ArmState::Ready | ArmState::Disarmed => step.translate = true,
        }

        self.cycle = self.cycle.saturating_add(1);
        self.state = ArmState::from_cycle(self.cycle);

        step
    }

    fn disable(&mut self) -> ArmingStep {
        let mut step = ArmingStep {
            ramp: Some(RampCommand::Zero),
            ..ArmingStep::default()
        };

        if self.requires_arming && self.is_armed {
            step.disarm = Some(ControlPacket::Arm(false));
            step.power_cycle = true;
            self.is_armed = false;
        }

        self.cycle = 0;
        self.state = ArmState::Disarmed;

        step
    }
}

#[cfg(test)]
mod tests {
    use super::{ArmState, ArmingStateMachine, RampCommand};
    use crate::packet::ControlPacket;

    #[test]
    fn enabling_ramps_zero_then_min_then_ready() {
        let mut arming = ArmingStateMachine::new(false);

        for cycle in 0..3 {
            assert_eq!(arming.cycle(), cycle);
            let step = arming.step(true);
            assert_eq!(step.ramp, Some(RampCommand::Zero));
            assert!(!step.translate);
        }
        assert_eq!(arming.state(), ArmState::RampMin);

        for cycle in 3..10 {
            assert_eq!(arming.cycle(), cycle);
            let step = arming.step(true);
            assert_eq!(step.ramp, Some(RampCommand::MinThrust));
            assert!(step.translate);
        }
        assert_eq!(arming.state(), ArmState::Ready);

        for _ in 0..100 {
            let step = arming.step(true);
            assert_eq!(step.ramp, None);
            assert!(step.translate);
        }
        assert_eq!(arming.cycle(), 110);
    }

    #[test]
    fn brushless_arms_once() {
        let mut arming = ArmingStateMachine::new(true);

        let step = arming.step(true);
        assert_eq!(step.arm, Some(ControlPacket::Arm(true)));
        assert!(arming.is_armed());

        for _ in 0..20 {
            assert_eq!(arming.step(true).arm, None);
        }
    }

    #[test]
    fn brushed_never_sends_packets() {
        let mut arming = ArmingStateMachine::new(false);

        assert_eq!(arming.step(true).arm, None);
        assert!(!arming.is_armed());

        let step = arming.step(false);
        assert_eq!(step.disarm, None);
        assert!(!step.power_cycle);
        assert_eq!(step.ramp, Some(RampCommand::Zero));
    }

    #[test]
    fn disabling_disarms_and_power_cycles() {
        let mut arming = ArmingStateMachine::new(true);
        for _ in 0..12 {
            arming.step(true);
        }

        let step = arming.step(false);
        assert_eq!(step.ramp, Some(RampCommand::Zero));
        assert!(!step.translate);
        assert_eq!(step.disarm, Some(ControlPacket::Arm(false)));
        assert!(step.power_cycle);
        assert_eq!(arming.state(), ArmState::Disarmed);
        assert_eq!(arming.cycle(), 0);
        assert!(!arming.is_armed());

        // Already disarmed
        let step = arming.step(false);
        assert_eq!(step.disarm, None);
        assert!(!step.power_cycle);
    }

    #[test]
    fn disabling_mid_ramp_restarts_the_ramp() {
        let mut arming = ArmingStateMachine::new(true);
        for _ in 0..5 {
            arming.step(true);
        }
        assert_eq!(arming.state(), ArmState::RampMin);

        arming.step(false);

        let step = arming.step(true);
        assert_eq!(step.arm, Some(ControlPacket::Arm(true)));
        assert_eq!(step.ramp, Some(RampCommand::Zero));
        assert_eq!(arming.state(), ArmState::RampZero);
    }
}
