//! We use this mocking module in unit tests to emulate the serial link to the controller.

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Every request frame written to the port.
    write_buffer: heapless::Vec<u8, 256>,
    /// Queued controller responses, read back in order.
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
    /// Report a timeout instead of `WouldBlock` once the queued responses run out.
    timeout_when_empty: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MockSerialError {
    /// Simulated timeout error
    Timeout,
    /// Simulated buffer overflow
    BufferOverflow,
    /// Generic simulated error for testing
    SimulatedError,
    /// Would block - no data available
    WouldBlock,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(if self.timeout_when_empty {
                MockSerialError::Timeout
            } else {
                MockSerialError::WouldBlock
            });
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = core::cmp::min(buf.len(), available_bytes);
        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
            timeout_when_empty: false,
        }
    }

    /// Set the data that will be returned when read() is called
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }

    pub fn set_timeout_when_empty(&mut self, timeout: bool) {
        self.timeout_when_empty = timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn test_write_data() {
        let mut mock = MockSerial::new();
        let frame = [0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A];

        let result = mock.write(&frame);
        assert_eq!(result, Ok(frame.len()));
        assert_eq!(mock.written_data(), frame);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = vec![0u8; 300]; // Larger than 256 byte capacity

        let result = mock.write(&large_data);
        assert_eq!(result, Err(MockSerialError::BufferOverflow));
    }

    #[test]
    fn test_read_partial_data() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Long response data").unwrap();

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer), Ok(5));
        assert_eq!(&buffer, b"Long ");
    }

    #[test]
    fn test_read_after_data_exhausted() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Hi").unwrap();

        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer), Ok(2));
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::WouldBlock));

        mock.set_timeout_when_empty(true);
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::Timeout));
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert_eq!(mock.write(b"test"), Err(MockSerialError::SimulatedError));
        assert_eq!(mock.flush(), Err(MockSerialError::SimulatedError));
        assert!(mock.written_data().is_empty());

        mock.set_read_data(b"test data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::SimulatedError));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(MockSerialError::Timeout.kind(), embedded_io::ErrorKind::TimedOut);
        assert_eq!(
            MockSerialError::BufferOverflow.kind(),
            embedded_io::ErrorKind::OutOfMemory
        );
        assert_eq!(MockSerialError::SimulatedError.kind(), embedded_io::ErrorKind::Other);
    }
}
