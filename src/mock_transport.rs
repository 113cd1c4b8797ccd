//! Register level test doubles for the driver and chamber tests.

use std::collections::HashMap;

use crate::{error::TransportError, mock_serial::MockSerialError, transport::ModbusTransport};

/// Fake controller: a holding register store which records every transaction.
#[derive(Default)]
pub struct MockTransport {
    registers: HashMap<u16, u16>,
    /// Every `(address, value)` written, in order.
    writes: Vec<(u16, u16)>,
    /// Every address read, in order.
    reads: Vec<u16>,
    /// When set, every transaction fails with a timeout.
    offline: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register(mut self, address: impl Into<u16>, value: u16) -> Self {
        self.registers.insert(address.into(), value);
        self
    }

    pub fn register(&self, address: impl Into<u16>) -> u16 {
        self.registers.get(&address.into()).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> &[(u16, u16)] {
        &self.writes
    }

    pub fn reads(&self) -> &[u16] {
        &self.reads
    }

    pub fn transactions(&self) -> usize {
        self.reads.len() + self.writes.len()
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }
}

impl ModbusTransport for MockTransport {
    type Error = MockSerialError;

    fn read_holding(&mut self, address: u16) -> Result<u16, TransportError<Self::Error>> {
        if self.offline {
            return Err(TransportError::Timeout);
        }
        self.reads.push(address);
        Ok(self.register(address))
    }

    fn write_holding(
        &mut self,
        address: u16,
        value: u16,
    ) -> Result<(), TransportError<Self::Error>> {
        if self.offline {
            return Err(TransportError::Timeout);
        }
        self.writes.push((address, value));
        self.registers.insert(address, value);
        Ok(())
    }
}

/// Delay provider which only records what was asked of it.
#[derive(Default)]
pub struct MockDelay {
    /// Each `delay_ms` request, in order.
    pub ms_calls: Vec<u32>,
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.total_ns += ms as u64 * 1_000_000;
    }
}
