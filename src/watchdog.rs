use crate::command::AttitudeCommand;
use std::time::Duration;

/// The last received command and the time it was recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedCommand {
    pub command: AttitudeCommand,

    /// Stamp of the command (in seconds).
    pub stamp: f64,
}

/// Detects a stalled command source so the last command can be replayed
/// before the vehicle firmware cuts the motors.
#[derive(Clone, Debug)]
pub struct CommandWatchdog {
    timeout: f64,
    cached: Option<CachedCommand>,
}

impl CommandWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: timeout.as_secs_f64(),
            cached: None,
        }
    }

    /// Cache a handled command, replayed or not.
    ///
    /// The recorded time is the command's own stamp, so a replay
    /// never refreshes it.
    pub fn record(&mut self, command: &AttitudeCommand) {
        self.cached = Some(CachedCommand {
            command: command.clone(),
            stamp: command.stamp,
        });
    }

    pub fn cached(&self) -> Option<&CachedCommand> {
        self.cached.as_ref()
    }

    /// Returns the command to replay if none has been recorded for `timeout` at `now` (in seconds).
    pub fn stale(&self, now: f64) -> Option<&AttitudeCommand> {
        self.cached
            .as_ref()
            .filter(|cached| now - cached.stamp >= self.timeout)
            .map(|cached| &cached.command)
    }
}

#[cfg(test)]
mod tests {
    use super::CommandWatchdog;
    use crate::command::AttitudeCommand;
    use nalgebra::Quaternion;
    use std::time::Duration;

    #[test]
    fn nothing_to_replay_before_the_first_command() {
        let watchdog = CommandWatchdog::new(Duration::from_millis(100));
        assert!(watchdog.stale(1e9).is_none());
    }

    #[test]
    fn it_detects_timeout() {
        let mut watchdog = CommandWatchdog::new(Duration::from_millis(100));
        let cmd = AttitudeCommand::new(Quaternion::identity(), 10.);
        watchdog.record(&cmd);

        assert!(watchdog.stale(10.05).is_none());
        assert_eq!(watchdog.stale(10.2), Some(&cmd));
        assert_eq!(watchdog.stale(12.), Some(&cmd));
    }

    #[test]
    fn replaying_keeps_the_original_stamp() {
        let mut watchdog = CommandWatchdog::new(Duration::from_millis(100));
        watchdog.record(&AttitudeCommand::new(Quaternion::identity(), 10.));

        let replay = watchdog.stale(11.).cloned().unwrap();
        watchdog.record(&replay);

        assert_eq!(watchdog.cached().unwrap().stamp, 10.);
        assert!(watchdog.stale(11.01).is_some());
    }

    #[test]
    fn newer_command_resets_timeout() {
        let mut watchdog = CommandWatchdog::new(Duration::from_millis(100));
        watchdog.record(&AttitudeCommand::new(Quaternion::identity(), 10.));
        watchdog.record(&AttitudeCommand::new(Quaternion::identity(), 11.));
        assert!(watchdog.stale(11.05).is_none());
    }
}
