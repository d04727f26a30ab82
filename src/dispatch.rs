//! Serialized dispatch of the command and odometry streams for one [`Session`].
//!
//! Commands arrive on a bounded queue. Odometry arrives on a watch channel so
//! only the latest sample is kept while a dispatch is in progress. Power cycles
//! wait on a tokio timer and hold back both streams until the vehicle is
//! powered on again.

use crate::command::{ActuatorCommand, AttitudeCommand, OdometrySample};
use crate::hal::{Actuator, Channel, ControlLink, Published};
use crate::session::{PowerCycle, Session};
use crate::Error;
use embedded_time::Clock;
use tokio::sync::{mpsc, watch};

/// Producer ends of a session's inbound streams.
pub struct Inbound {
    pub commands: mpsc::Sender<AttitudeCommand>,
    pub odometry: watch::Sender<Option<OdometrySample>>,
}

/// Consumer ends of a session's inbound streams.
pub struct Receivers {
    pub commands: mpsc::Receiver<AttitudeCommand>,
    pub odometry: watch::Receiver<Option<OdometrySample>>,
}

/// Create the inbound streams with room for `capacity` queued commands.
pub fn channels(capacity: usize) -> (Inbound, Receivers) {
    let (command_tx, command_rx) = mpsc::channel(capacity);
    let (odometry_tx, odometry_rx) = watch::channel(None);

    (
        Inbound {
            commands: command_tx,
            odometry: odometry_tx,
        },
        Receivers {
            commands: command_rx,
            odometry: odometry_rx,
        },
    )
}

impl Actuator for mpsc::UnboundedSender<Published> {
    fn output(&mut self, channel: Channel, command: ActuatorCommand) {
        if self.send((channel, command)).is_err() {
            log::warn!("Dropping {:?} command, no subscriber", channel);
        }
    }
}

/// Dispatch both streams into `session` until the command stream closes.
///
/// Returns the session so its final state can be inspected.
pub async fn run<L, A, C>(
    mut session: Session<L, A, C>,
    receivers: Receivers,
) -> Result<Session<L, A, C>, Error>
where
    L: ControlLink,
    A: Actuator,
    C: Clock<T = u64>,
{
    let Receivers {
        mut commands,
        mut odometry,
    } = receivers;
    let mut odometry_open = true;

    loop {
        let power_cycle = tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(cmd) => session.handle_command(cmd),
                None => break,
            },
            changed = odometry.changed(), if odometry_open => match changed {
                Ok(()) => {
                    let sample = odometry.borrow_and_update().clone();
                    match sample {
                        Some(sample) => session.handle_odometry(sample)?,
                        None => None,
                    }
                }
                Err(_) => {
                    odometry_open = false;
                    None
                }
            },
        };

        if let Some(power_cycle) = power_cycle {
            complete(&mut session, power_cycle).await;
        }
    }

    log::info!("{}: command stream closed", session.config().mav_name);
    Ok(session)
}

async fn complete<L, A, C>(session: &mut Session<L, A, C>, power_cycle: PowerCycle)
where
    L: ControlLink,
    A: Actuator,
    C: Clock<T = u64>,
{
    power_cycle.power_off(session.link_mut());
    tokio::time::sleep(power_cycle.settle()).await;
    power_cycle.power_on(session.link_mut());
}
