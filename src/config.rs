//! Connection settings for the EZT-430i controller.
//!
//! The defaults are the values known to work with the controller. They are read once, when the
//! serial port is opened and the [`Ezt430i`](crate::instrument::Ezt430i) is created.

use fugit::{ExtU32, MillisDurationU32};

/// Serial parity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

/// Serial link and pacing configuration for one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChamberConfig {
    pub baud_rate: u32,
    pub parity: Parity,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    /// Per transaction timeout of the serial port.
    pub timeout: MillisDurationU32,
    /// Time the controller needs to settle after every register transaction.
    pub command_delay: MillisDurationU32,
    /// Modbus unit ID of the controller.
    pub unit_id: u8,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            parity: Parity::None,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            timeout: 300.millis(),
            command_delay: 500.millis(),
            unit_id: 0x01,
        }
    }
}

impl ChamberConfig {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_command_delay(mut self, command_delay: MillisDurationU32) -> Self {
        self.command_delay = command_delay;
        self
    }

    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controller() {
        let config = ChamberConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.timeout.to_millis(), 300);
        assert_eq!(config.command_delay.to_millis(), 500);
        assert_eq!(config.unit_id, 1);
    }

    #[test]
    fn overrides_leave_other_fields() {
        let config = ChamberConfig::default()
            .with_command_delay(250.millis())
            .with_unit_id(7);
        assert_eq!(config.command_delay.to_millis(), 250);
        assert_eq!(config.unit_id, 7);
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout.to_millis(), 300);
    }

    #[test]
    fn framing_overrides() {
        let config = ChamberConfig::default()
            .with_data_bits(DataBits::Seven)
            .with_stop_bits(StopBits::Two)
            .with_parity(Parity::Even);
        assert_eq!(config.data_bits, DataBits::Seven);
        assert_eq!(config.stop_bits, StopBits::Two);
        assert_eq!(config.parity, Parity::Even);
    }
}
