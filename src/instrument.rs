//! Register level driver for the EZT-430i controller.
//!
//! [`Ezt430i`] maps controller operations onto holding registers and paces every transaction.

use embedded_hal::delay::DelayNs;
use fugit::MillisDurationU32;

use crate::{
    config::ChamberConfig,
    error::{Error, Result, TransportError},
    register::{EventRegister, Ezt430iRegister, Loop, event_mask},
    transport::ModbusTransport,
};

/// Register level driver for the EZT-430i controller.
///
/// You can create one over any [`ModbusTransport`], usually an
/// [`RtuTransport`](crate::transport::RtuTransport), plus a [`DelayNs`] provider.
///
/// The controller needs time to settle between serial transactions. Every register read or
/// write is followed by the configured command delay before the method returns, so a method
/// doing a read-modify-write waits twice.
///
/// The driver does no locking. If several threads share one controller, wrap it in a mutex.
pub struct Ezt430i<T: ModbusTransport, D: DelayNs> {
    transport: T,
    delay: D,
    command_delay: MillisDurationU32,
}

impl<T: ModbusTransport, D: DelayNs> Ezt430i<T, D> {
    /// Create a new driver. Only the command delay of `config` is used here.
    pub fn new(transport: T, delay: D, config: &ChamberConfig) -> Self {
        Self {
            transport,
            delay,
            command_delay: config.command_delay,
        }
    }

    pub fn command_delay(&self) -> MillisDurationU32 {
        self.command_delay
    }

    /// Return `true` if the controller is ready, `false` if it is offline or busy.
    pub fn read_status(&mut self) -> Result<bool, T::Error> {
        Ok(self.read_raw(Ezt430iRegister::Status)? > 0)
    }

    /// Read the whole event status register. Bit 0 is event 1.
    pub fn read_events(&mut self) -> Result<u16, T::Error> {
        self.read_raw(Ezt430iRegister::Events)
    }

    /// Overwrite the whole event status register.
    pub fn write_events(&mut self, events: u16) -> Result<(), T::Error> {
        self.write_raw(Ezt430iRegister::Events, events)
    }

    /// Read the state of the event at zero based `index`.
    pub fn get_event(&mut self, index: u8) -> Result<bool, T::Error> {
        let mask = checked_event_mask(index)?;
        Ok(EventRegister::from_raw(self.read_events()?).is_set(mask))
    }

    /// Set the event at zero based `index` to `value` (`0` or `1`). Other events are not touched.
    ///
    /// The controller has no single bit write, so this reads the event register and writes the
    /// modified register back.
    pub fn set_event(&mut self, index: u8, value: u16) -> Result<(), T::Error> {
        let on = match value {
            0 => false,
            1 => true,
            _ => return Err(Error::InvalidArgument("event value must be 0 or 1")),
        };
        let mask = checked_event_mask(index)?;

        let events = EventRegister::from_raw(self.read_events()?).with_mask(mask, on);
        self.write_events(events.raw())
    }

    /// Read the process value of `control_loop`, one decimal place.
    pub fn read_loop_pv(&mut self, control_loop: Loop) -> Result<f32, T::Error> {
        self.read_value(control_loop.process_value())
    }

    /// Write the process value of `control_loop`, one decimal place.
    pub fn write_loop_pv(&mut self, control_loop: Loop, value: f32) -> Result<(), T::Error> {
        self.write_value(control_loop.process_value(), value)
    }

    /// Read the setpoint of `control_loop`, one decimal place.
    pub fn read_loop_sp(&mut self, control_loop: Loop) -> Result<f32, T::Error> {
        self.read_value(control_loop.setpoint())
    }

    /// Write the setpoint of `control_loop`, rounded to one decimal place.
    pub fn write_loop_sp(&mut self, control_loop: Loop, value: f32) -> Result<(), T::Error> {
        self.write_value(control_loop.setpoint(), value)
    }

    /// Read the raw mode/operation bits of `control_loop`. See table B10 in the manual.
    pub fn read_loop_mode(&mut self, control_loop: Loop) -> Result<u16, T::Error> {
        self.read_raw(control_loop.mode_operation())
    }

    /// Read the raw error code of `control_loop`.
    ///
    /// Use [`error_description`](crate::register::error_description) to get the text.
    pub fn read_loop_error(&mut self, control_loop: Loop) -> Result<u16, T::Error> {
        self.read_raw(control_loop.error())
    }

    /// Block on the delay provider. Used by the chamber to wait out a ramp.
    pub(crate) fn wait(&mut self, duration: MillisDurationU32) {
        self.delay.delay_ms(duration.to_millis());
    }

    /// Give back the transport and the delay provider.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn read_value(&mut self, register: Ezt430iRegister) -> Result<f32, T::Error> {
        let raw = self.read_raw(register)?;
        Ok(register.format().decode(raw))
    }

    fn write_value(&mut self, register: Ezt430iRegister, value: f32) -> Result<(), T::Error> {
        let raw = register
            .format()
            .encode(value)
            .ok_or(Error::InvalidArgument("value out of register range"))?;
        self.write_raw(register, raw)
    }

    fn read_raw(&mut self, register: Ezt430iRegister) -> Result<u16, T::Error> {
        let raw = self.paced(|transport| transport.read_holding(register.into()))?;
        log::debug!("read {register:?} = {raw:#06x}");
        Ok(raw)
    }

    fn write_raw(&mut self, register: Ezt430iRegister, raw: u16) -> Result<(), T::Error> {
        log::debug!("write {register:?} = {raw:#06x}");
        self.paced(|transport| transport.write_holding(register.into(), raw))
    }

    /// Run one transaction, then wait the command delay whatever the outcome.
    fn paced<R>(
        &mut self,
        transaction: impl FnOnce(&mut T) -> core::result::Result<R, TransportError<T::Error>>,
    ) -> Result<R, T::Error> {
        let result = transaction(&mut self.transport);
        self.delay.delay_ms(self.command_delay.to_millis());
        Ok(result?)
    }
}

fn checked_event_mask<I: embedded_io::Error>(index: u8) -> Result<u16, I> {
    event_mask(index).ok_or(Error::InvalidArgument("event index out of range"))
}

/// [`DelayNs`] provider which blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}
