//! This crate provides an interface for controlling Cincinnati Sub-Zero (CSZ) climate chambers
//! which use the EZT-430i controller.
//!
//! It is split in two layers:
//! * [`instrument::Ezt430i`] - register level access to the controller: status, events, and the
//!   process value, setpoint, mode and error registers of both control loops.
//! * [`chamber::McbChamber`] - chamber level control of an MCB-1.2 chamber, including a blocking
//!   temperature ramp which waits for an estimated ramp time.
//!
//! Chamber models which this has been used with:
//! * MCB-1.2-.33-H/AC
//!
//! It uses Modbus RTU under the hood, over RS-232 or RS-485. See [`transport::RtuTransport`].
//!
//! The serial port used for controller comms should be configured like so:
//! * Baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//! * Timeout: 300ms
//!
//! See [`config::ChamberConfig`] for these defaults.
//!
//! Manuals:
//! * EZT-430i User's Manual
//! * EZT-430i Communications Manual

pub mod chamber;
pub mod config;
pub mod error;
pub mod instrument;
pub mod ramp;
pub mod register;
pub mod scaling;
pub mod transport;

#[cfg(test)]
mod mock_serial;
#[cfg(test)]
mod mock_transport;
