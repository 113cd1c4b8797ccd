//! Chamber level control of a Cincinnati Sub-Zero MCB-1.2 climate chamber.
//!
//! Loop 1 of the EZT-430i drives the chamber temperature, loop 2 the humidity. Event 1 switches
//! the chamber on and off.

use embedded_hal::delay::DelayNs;

use crate::{
    error::{Error, PreconditionError, Result},
    instrument::Ezt430i,
    ramp::{RampEstimate, estimate_ramp_time},
    register::{BusyStatus, Loop, State, error_description},
    transport::ModbusTransport,
};

/// Zero based index of the event used as the chamber power switch.
const POWER_EVENT: u8 = 0;

/// Progress of [`McbChamber::ramp_temperature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampState {
    /// No ramp started yet.
    #[default]
    Idle,
    /// Setpoint written and chamber switched on, not waiting for it.
    Ramping,
    /// Waited out the estimated ramp time.
    Done,
    /// The last ramp attempt failed.
    Faulted,
}

/// MCB-1.2 climate chamber.
pub struct McbChamber<T: ModbusTransport, D: DelayNs> {
    instrument: Ezt430i<T, D>,
    ramp_state: RampState,
}

impl<T: ModbusTransport, D: DelayNs> McbChamber<T, D> {
    pub fn new(instrument: Ezt430i<T, D>) -> Self {
        Self {
            instrument,
            ramp_state: RampState::Idle,
        }
    }

    /// Direct register access to the controller.
    pub fn instrument(&mut self) -> &mut Ezt430i<T, D> {
        &mut self.instrument
    }

    pub fn release(self) -> Ezt430i<T, D> {
        self.instrument
    }

    /// Read the target temperature (loop 1 setpoint).
    pub fn temperature_target(&mut self) -> Result<f32, T::Error> {
        self.instrument.read_loop_sp(Loop::Temperature)
    }

    /// Write the target temperature (loop 1 setpoint).
    ///
    /// Does not switch the chamber on or wait for anything. To ramp the chamber use
    /// [`Self::ramp_temperature`].
    pub fn set_temperature_target(&mut self, temperature_c: f32) -> Result<(), T::Error> {
        self.instrument.write_loop_sp(Loop::Temperature, temperature_c)
    }

    /// Read the current chamber temperature (loop 1 process value).
    pub fn temperature_current(&mut self) -> Result<f32, T::Error> {
        self.instrument.read_loop_pv(Loop::Temperature)
    }

    /// Read the current relative humidity (loop 2 process value).
    pub fn humidity_current(&mut self) -> Result<f32, T::Error> {
        self.instrument.read_loop_pv(Loop::Humidity)
    }

    /// Read the target relative humidity (loop 2 setpoint).
    pub fn humidity_target(&mut self) -> Result<f32, T::Error> {
        self.instrument.read_loop_sp(Loop::Humidity)
    }

    /// Write the target relative humidity (loop 2 setpoint).
    pub fn set_humidity_target(&mut self, humidity: f32) -> Result<(), T::Error> {
        self.instrument.write_loop_sp(Loop::Humidity, humidity)
    }

    pub fn busy_status(&mut self) -> Result<BusyStatus, T::Error> {
        Ok(BusyStatus::from(self.instrument.read_status()?))
    }

    /// Raw loop 1 error code. `0` means no error.
    pub fn error_status(&mut self) -> Result<u16, T::Error> {
        self.instrument.read_loop_error(Loop::Temperature)
    }

    /// Loop 1 error as text.
    pub fn error_description(&mut self) -> Result<&'static str, T::Error> {
        Ok(error_description(self.error_status()?))
    }

    /// Raw loop 1 mode and operation bits.
    pub fn mode_operation(&mut self) -> Result<u16, T::Error> {
        self.instrument.read_loop_mode(Loop::Temperature)
    }

    pub fn power(&mut self) -> Result<State, T::Error> {
        Ok(State::from(self.instrument.get_event(POWER_EVENT)?))
    }

    pub fn set_power(&mut self, state: impl Into<State>) -> Result<(), T::Error> {
        let state: State = state.into();
        self.instrument.set_event(POWER_EVENT, state as u16)
    }

    pub fn ramp_state(&self) -> RampState {
        self.ramp_state
    }

    /// Ramp the chamber to `target_c`: write the setpoint and switch the chamber on.
    ///
    /// The chamber must be ready and loop 1 free of errors, otherwise nothing is written.
    ///
    /// With `wait` set, the current temperature is read first and the call then blocks for the
    /// estimated ramp time, which can be many minutes. This is a timed sleep: the temperature is
    /// not watched while waiting, so the chamber may not be at the target yet when this returns.
    /// Callers who need to cancel or confirm should call with `wait` unset and poll
    /// [`Self::temperature_current`] themselves.
    ///
    /// Returns the estimate waited for, if any.
    pub fn ramp_temperature(
        &mut self,
        target_c: f32,
        wait: bool,
    ) -> Result<Option<RampEstimate>, T::Error> {
        let result = self.try_ramp(target_c, wait);
        if result.is_err() {
            self.ramp_state = RampState::Faulted;
        }
        result
    }

    fn try_ramp(&mut self, target_c: f32, wait: bool) -> Result<Option<RampEstimate>, T::Error> {
        if self.busy_status()? != BusyStatus::Ready {
            return Err(PreconditionError::Busy.into());
        }
        let error = self.error_status()?;
        if error != 0 {
            return Err(PreconditionError::LoopError(error).into());
        }

        let estimate = if wait {
            let start_c = self.temperature_current()?;
            let estimate = estimate_ramp_time(start_c, target_c).ok_or(Error::InvalidArgument(
                "temperature outside the fitted ramp curves",
            ))?;
            Some(estimate)
        } else {
            None
        };

        self.set_temperature_target(target_c)?;
        self.set_power(State::On)?;
        self.ramp_state = RampState::Ramping;

        if let Some(estimate) = estimate {
            log::info!(
                "ramping to {target_c} °C ({:?}), waiting {:.0} s",
                estimate.direction(),
                estimate.seconds()
            );
            self.instrument.wait(estimate.duration());
            self.ramp_state = RampState::Done;
            log::info!("ramp to {target_c} °C done");
        } else {
            log::info!("ramping to {target_c} °C");
        }
        Ok(estimate)
    }
}
