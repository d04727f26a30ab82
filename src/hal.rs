//! Traits for the collaborators a [`Session`](crate::Session) drives.

use crate::command::ActuatorCommand;
use crate::packet::ControlPacket;

/// Failure to deliver a [`ControlPacket`].
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("control link unavailable: {0}")]
    Unavailable(String),

    #[error("packet rejected by the vehicle")]
    Rejected,
}

/// Request/response primitive that transmits a control packet to the vehicle.
pub trait ControlLink {
    /// Send a packet and wait for it to be acknowledged.
    fn send(&mut self, packet: &ControlPacket) -> Result<(), LinkError>;
}

impl<T> ControlLink for &mut T
where
    T: ControlLink + ?Sized,
{
    fn send(&mut self, packet: &ControlPacket) -> Result<(), LinkError> {
        (**self).send(packet)
    }
}

/// Output stream an [`ActuatorCommand`] is published on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Translated commands, every dispatch once the motors are ramping.
    Primary,

    /// Ramp-stage placeholders and the zero command on disarm.
    Ramp,
}

/// An actuator command and the channel it was published on.
pub type Published = (Channel, ActuatorCommand);

/// Sink for computed actuator commands.
pub trait Actuator {
    fn output(&mut self, channel: Channel, command: ActuatorCommand);
}

/// Collects every published command in order.
impl Actuator for Vec<Published> {
    fn output(&mut self, channel: Channel, command: ActuatorCommand) {
        self.push((channel, command));
    }
}

impl<T> Actuator for &mut T
where
    T: Actuator + ?Sized,
{
    fn output(&mut self, channel: Channel, command: ActuatorCommand) {
        (**self).output(channel, command)
    }
}

/// Transmit a packet once, logging the outcome instead of failing.
///
/// Returns `true` if the vehicle acknowledged the packet.
pub fn transmit<L: ControlLink>(link: &mut L, packet: ControlPacket) -> bool {
    match link.send(&packet) {
        Ok(()) => {
            log::info!("Sent {:?}", packet);
            true
        }
        Err(error) => {
            log::error!("Failed to send {:?}: {}", packet, error);
            false
        }
    }
}
