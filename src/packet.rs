/// An out-of-band control packet for the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPacket {
    /// Arm (`true`) or disarm (`false`) the motors.
    Arm(bool),
    PowerOff,
    PowerOn,
}

// Port 13 (platform) shifted into the header byte
const PLATFORM_HEADER: u8 = 0xDC;
const PLATFORM_ARM_CHANNEL: u8 = 0x01;

const SYSTEM_HEADER: u8 = 0xFF;
const SYSTEM_POWER: u8 = 0xFE;
const SYSOFF: u8 = 0x02;
const SYSON: u8 = 0x03;

impl ControlPacket {
    pub fn header(&self) -> u8 {
        match self {
            ControlPacket::Arm(_) => PLATFORM_HEADER,
            ControlPacket::PowerOff | ControlPacket::PowerOn => SYSTEM_HEADER,
        }
    }

    pub fn payload(&self) -> [u8; 2] {
        match self {
            ControlPacket::Arm(arm) => [PLATFORM_ARM_CHANNEL, *arm as u8],
            ControlPacket::PowerOff => [SYSTEM_POWER, SYSOFF],
            ControlPacket::PowerOn => [SYSTEM_POWER, SYSON],
        }
    }

    /// Header followed by the payload.
    pub fn to_bytes(&self) -> [u8; 3] {
        let [a, b] = self.payload();
        [self.header(), a, b]
    }
}
