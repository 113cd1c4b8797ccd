//! Our error types for the chamber driver.

use thiserror::Error;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Top level error for chamber and controller operations.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Transport error: {0}")]
    Transport(TransportError<I>),
    /// Raised before any register is touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Precondition failed: {0}")]
    Precondition(PreconditionError),
}

/// Failures of the Modbus RTU link itself.
#[derive(Error, Debug)]
pub enum TransportError<I: embedded_io::Error> {
    #[error("Serial communication error")]
    Serial(I),
    #[error("Modbus protocol error: {0:?}")]
    Modbus(rmodbus::ErrorKind),
    #[error("Communication timeout")]
    Timeout,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Response did not fit in the frame buffer")]
    BufferOverflow,
}

/// Chamber state which forbids starting a temperature ramp.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("controller reports busy")]
    Busy,
    #[error("temperature loop reports error code {0}")]
    LoopError(u16),
}

impl<I: embedded_io::Error> From<TransportError<I>> for Error<I> {
    fn from(err: TransportError<I>) -> Self {
        Error::Transport(err)
    }
}

impl<I: embedded_io::Error> From<rmodbus::ErrorKind> for TransportError<I> {
    fn from(err: rmodbus::ErrorKind) -> Self {
        TransportError::Modbus(err)
    }
}

impl<I: embedded_io::Error> From<PreconditionError> for Error<I> {
    fn from(err: PreconditionError) -> Self {
        Error::Precondition(err)
    }
}
