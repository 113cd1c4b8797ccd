//! Modbus RTU transport.
//!
//! [`ModbusTransport`] is the seam between the register driver and the wire. [`RtuTransport`]
//! implements it over any interface which implements [embedded_io::Read] & [embedded_io::Write].

use embedded_io::Error as _;

use crate::error::TransportError;

/// Holding register access to a single Modbus slave.
///
/// Implementations perform exactly one transaction per call and never retry.
pub trait ModbusTransport {
    type Error: embedded_io::Error;

    /// Read a single holding register.
    fn read_holding(&mut self, address: u16) -> Result<u16, TransportError<Self::Error>>;

    /// Write a single holding register.
    fn write_holding(&mut self, address: u16, value: u16)
    -> Result<(), TransportError<Self::Error>>;
}

/// Read holding response for one register: unit_id + function + byte_count + 2 data bytes + 2 CRC.
const READ_SINGLE_RESPONSE_LEN: usize = 7;
/// A write single register response echoes the 8 byte request.
const WRITE_SINGLE_RESPONSE_LEN: usize = 8;

/// Modbus RTU master bound to one serial interface and one unit ID.
pub struct RtuTransport<S: embedded_io::Read + embedded_io::Write, const L: usize = 128> {
    interface: S,
    unit_id: u8,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> RtuTransport<S, L> {
    /// Create a new transport. Returns `None` if `unit_id` is not a valid slave address (1-247).
    pub fn new(interface: S, unit_id: u8) -> Option<Self> {
        if !(1..=247).contains(&unit_id) {
            return None;
        }
        Some(Self { interface, unit_id })
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    /// Give back the serial interface.
    pub fn release(self) -> S {
        self.interface
    }

    /// Read up to `len` response bytes into `buff`.
    ///
    /// We never ask the interface for more than is missing, so a following response already
    /// sitting in the receive buffer is left alone. A timeout after some bytes arrived ends the
    /// frame early: exception responses are shorter than normal ones, rmodbus sorts them out.
    fn receive(
        &mut self,
        buff: &mut heapless::Vec<u8, L>,
        len: usize,
    ) -> Result<(), TransportError<S::Error>> {
        let mut temp_buf = [0u8; 8];
        while buff.len() < len {
            let wanted = core::cmp::min(temp_buf.len(), len - buff.len());
            match self.interface.read(&mut temp_buf[..wanted]) {
                Ok(0) => return Err(TransportError::InvalidResponse),
                Ok(bytes_read) => {
                    buff.extend_from_slice(&temp_buf[..bytes_read])
                        .map_err(|_| TransportError::BufferOverflow)?;
                }
                Err(e) => {
                    return match e.kind() {
                        embedded_io::ErrorKind::TimedOut if buff.is_empty() => {
                            Err(TransportError::Timeout)
                        }
                        embedded_io::ErrorKind::TimedOut => Ok(()),
                        _ => Err(TransportError::Serial(e)),
                    };
                }
            }
        }
        Ok(())
    }
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> ModbusTransport
    for RtuTransport<S, L>
{
    type Error = S::Error;

    fn read_holding(&mut self, address: u16) -> Result<u16, TransportError<S::Error>> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut req = rmodbus::client::ModbusRequest::new(self.unit_id, rmodbus::ModbusProto::Rtu);
        req.generate_get_holdings(address, 1, &mut buff)?;

        self.interface
            .write_all(&buff)
            .map_err(TransportError::Serial)?;

        // Reuse same buffer when reading back
        buff.clear();
        self.receive(&mut buff, READ_SINGLE_RESPONSE_LEN)?;

        // Checks unit ID, function code and CRC, and turns exception responses into their code.
        let mut parsed_data: heapless::Vec<u16, 4> = heapless::Vec::new();
        req.parse_u16(&buff, &mut parsed_data)?;

        parsed_data
            .first()
            .copied()
            .ok_or(TransportError::InvalidResponse)
    }

    fn write_holding(&mut self, address: u16, value: u16) -> Result<(), TransportError<S::Error>> {
        let mut request: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut response: heapless::Vec<u8, L> = heapless::Vec::new();

        let mut req = rmodbus::client::ModbusRequest::new(self.unit_id, rmodbus::ModbusProto::Rtu);
        req.generate_set_holding(address, value, &mut request)?;

        self.interface
            .write_all(&request)
            .map_err(TransportError::Serial)?;

        self.receive(&mut response, WRITE_SINGLE_RESPONSE_LEN)?;
        if request.as_slice() != response.as_slice() {
            // Exception responses end early on the timeout, rmodbus reports their code.
            req.parse_ok(&response)?;
            return Err(TransportError::InvalidResponse);
        }
        Ok(())
    }
}
