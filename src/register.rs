//! This module is used to define the registers of the EZT-430i controller.
//!
//! Addresses are taken from the EZT-430i communications manual. Only the registers needed to run
//! a chamber are mapped.
use modular_bitfield::prelude::*;
use strum_macros::EnumIter;

use crate::scaling::RegisterFormat;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u16)]
pub enum Ezt430iRegister {
    /// __R__ - Controller status.
    /// * `0` - Offline/busy.
    /// * `>0` - Ready.
    Status = 0,
    /// __R/W__ - Event status. Bit 0 is event 1, up to bit 5 for event 6.
    ///
    /// See [`EventRegister`].
    Events = 12,
    /// __R/W__ - Loop 1 process value, typically the chamber temperature.
    ///
    /// Value is i16 in tenths. E.g. -20.5 => `-205`.
    Loop1Pv = 35,
    /// __R/W__ - Loop 1 setpoint.
    Loop1Sp = 36,
    /// __R__ - Loop 1 mode and operation status bits. (Table B10 in the manual.)
    Loop1ModeOperation = 38,
    /// __R__ - Loop 1 error status.
    ///
    /// See [`ControllerError`] for the known codes.
    Loop1Error = 39,
    /// __R/W__ - Loop 2 process value, typically the relative humidity.
    Loop2Pv = 40,
    /// __R/W__ - Loop 2 setpoint.
    Loop2Sp = 41,
    /// __R__ - Loop 2 mode and operation status bits.
    Loop2ModeOperation = 43,
    /// __R__ - Loop 2 error status.
    Loop2Error = 44,
}

impl Ezt430iRegister {
    /// The value format of this register.
    pub const fn format(&self) -> RegisterFormat {
        match self {
            Self::Loop1Pv | Self::Loop1Sp | Self::Loop2Pv | Self::Loop2Sp => {
                RegisterFormat::TENTHS_SIGNED
            }
            _ => RegisterFormat::RAW,
        }
    }
}

impl From<Ezt430iRegister> for u16 {
    fn from(value: Ezt430iRegister) -> Self {
        value as u16
    }
}

/// Independent control loops of the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
pub enum Loop {
    /// Loop 1.
    Temperature,
    /// Loop 2.
    Humidity,
}

impl Loop {
    pub const fn process_value(&self) -> Ezt430iRegister {
        match self {
            Loop::Temperature => Ezt430iRegister::Loop1Pv,
            Loop::Humidity => Ezt430iRegister::Loop2Pv,
        }
    }

    pub const fn setpoint(&self) -> Ezt430iRegister {
        match self {
            Loop::Temperature => Ezt430iRegister::Loop1Sp,
            Loop::Humidity => Ezt430iRegister::Loop2Sp,
        }
    }

    pub const fn mode_operation(&self) -> Ezt430iRegister {
        match self {
            Loop::Temperature => Ezt430iRegister::Loop1ModeOperation,
            Loop::Humidity => Ezt430iRegister::Loop2ModeOperation,
        }
    }

    pub const fn error(&self) -> Ezt430iRegister {
        match self {
            Loop::Temperature => Ezt430iRegister::Loop1Error,
            Loop::Humidity => Ezt430iRegister::Loop2Error,
        }
    }
}

/// Loop error codes as reported by the loop error registers.
#[derive(Debug, EnumIter, PartialEq, Eq, Clone, Copy)]
#[repr(u16)]
pub enum ControllerError {
    NoError = 0,
    IllegalSetupValues = 4,
    BadFunctionCode = 10,
    RegisterOutOfRange = 11,
    WriteReadOnlyData = 14,
    OutOfRangeData = 15,
    HoldbackTimeOut = 25,
    AutoTuneError = 26,
    InputTypeRequiresCalibration = 27,
    EepromError = 29,
    ColdJunctionFailure = 30,
    SensorBreak = 39,
    AToDFailure = 40,
}

impl ControllerError {
    /// Text shown by the controller for this code.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NoError => "No Error",
            Self::IllegalSetupValues => "Illegal Setup Values",
            Self::BadFunctionCode => "Comm Error - Bad Function Code",
            Self::RegisterOutOfRange => "Comm Error - Register Out of Range",
            Self::WriteReadOnlyData => "Comm Error - Write Read Only Data",
            Self::OutOfRangeData => "Comm Error - Out of Range Data",
            Self::HoldbackTimeOut => "Holdback Time Out",
            Self::AutoTuneError => "Auto Tune Error",
            Self::InputTypeRequiresCalibration => "Input Type Requires Calibration",
            Self::EepromError => "EEPROM Error",
            Self::ColdJunctionFailure => "Cold Junction Failure",
            Self::SensorBreak => "Sensor Break",
            Self::AToDFailure => "A to D failure",
        }
    }
}

impl TryFrom<u16> for ControllerError {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ControllerError as CE;
        match value {
            0 => Ok(CE::NoError),
            4 => Ok(CE::IllegalSetupValues),
            10 => Ok(CE::BadFunctionCode),
            11 => Ok(CE::RegisterOutOfRange),
            14 => Ok(CE::WriteReadOnlyData),
            15 => Ok(CE::OutOfRangeData),
            25 => Ok(CE::HoldbackTimeOut),
            26 => Ok(CE::AutoTuneError),
            27 => Ok(CE::InputTypeRequiresCalibration),
            29 => Ok(CE::EepromError),
            30 => Ok(CE::ColdJunctionFailure),
            39 => Ok(CE::SensorBreak),
            40 => Ok(CE::AToDFailure),
            other => Err(other),
        }
    }
}

/// Look up the description of a raw loop error code.
pub fn error_description(code: u16) -> &'static str {
    ControllerError::try_from(code)
        .map(|error| error.description())
        .unwrap_or("Unknown Error")
}

/// Number of user events on the controller.
pub const EVENT_COUNT: u8 = 6;

/// Contents of the event status register.
#[bitfield(bits = 16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRegister {
    /// Event 1, used by the chamber as its power switch.
    pub event1: bool,
    pub event2: bool,
    pub event3: bool,
    pub event4: bool,
    pub event5: bool,
    pub event6: bool,
    #[skip]
    __: B10,
}

impl EventRegister {
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bytes(raw.to_le_bytes())
    }

    pub fn raw(&self) -> u16 {
        u16::from_le_bytes(self.into_bytes())
    }

    /// State of the event at zero based `index`. `None` if there is no such event.
    pub fn bit(&self, index: u8) -> Option<bool> {
        event_mask(index).map(|mask| self.is_set(mask))
    }

    /// Copy of this register with one event changed, all other bits untouched.
    pub fn with_bit(&self, index: u8, on: bool) -> Option<Self> {
        event_mask(index).map(|mask| self.with_mask(mask, on))
    }

    /// `true` if any bit of `mask` is set.
    pub fn is_set(&self, mask: u16) -> bool {
        self.raw() & mask != 0
    }

    /// Copy of this register with the bits of `mask` set or cleared.
    pub fn with_mask(&self, mask: u16, on: bool) -> Self {
        let raw = if on {
            self.raw() | mask
        } else {
            self.raw() & !mask
        };
        Self::from_raw(raw)
    }
}

/// Bit mask of the event at zero based `index`. `None` if there is no such event.
pub fn event_mask(index: u8) -> Option<u16> {
    (index < EVENT_COUNT).then(|| 1 << index)
}

/// Used to be less ambiguous and whether something is on or off.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    #[default]
    Off = 0x00,
    /// Enabled.
    On = 0x01,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// Controller readiness as reported by the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyStatus {
    /// Status register is non-zero.
    Ready,
    /// Status register is zero, the controller is offline or busy.
    Busy,
}

impl From<bool> for BusyStatus {
    /// `true` means ready, as returned by [`Ezt430i::read_status`](crate::instrument::Ezt430i::read_status).
    fn from(ready: bool) -> Self {
        if ready {
            BusyStatus::Ready
        } else {
            BusyStatus::Busy
        }
    }
}
