use std::env;

use csz_chamber::{
    chamber::McbChamber,
    config::{ChamberConfig, DataBits, Parity, StopBits},
    instrument::{Ezt430i, StdDelay},
    transport::RtuTransport,
};
use inquire::Select;
use serialport::SerialPort;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            std::io::ErrorKind::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

fn open_port(port_name: &str, config: &ChamberConfig) -> serialport::Result<Box<dyn SerialPort>> {
    let parity = match config.parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    };
    let data_bits = match config.data_bits {
        DataBits::Five => serialport::DataBits::Five,
        DataBits::Six => serialport::DataBits::Six,
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    };
    let stop_bits = match config.stop_bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    };
    serialport::new(port_name, config.baud_rate)
        .parity(parity)
        .stop_bits(stop_bits)
        .data_bits(data_bits)
        .timeout(std::time::Duration::from_millis(
            config.timeout.to_millis() as u64,
        ))
        .open()
}

/// Usage: `chamber [PORT] [TARGET_C]`
fn main() {
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });
    let target_c: Option<f32> = env::args()
        .nth(2)
        .map(|arg| arg.parse().expect("Target temperature must be a number"));

    println!("Using port: {}", port_name);

    let config = ChamberConfig::default();
    let port = open_port(&port_name, &config).expect("Failed to open serial port");
    let transport: RtuTransport<PortWrapper, 128> =
        RtuTransport::new(PortWrapper(port), config.unit_id).expect("Invalid Modbus unit ID");
    let mut chamber = McbChamber::new(Ezt430i::new(transport, StdDelay, &config));

    println!("Status: {:?}", chamber.busy_status().unwrap());
    println!("Loop 1 error: {}", chamber.error_description().unwrap());
    println!("Mode/operation: {:#06x}", chamber.mode_operation().unwrap());
    println!("Power: {:?}", chamber.power().unwrap());
    println!(
        "Temperature: {:.1} °C (target {:.1} °C)",
        chamber.temperature_current().unwrap(),
        chamber.temperature_target().unwrap()
    );
    println!("Humidity: {:.1} %", chamber.humidity_current().unwrap());

    if let Some(target_c) = target_c {
        match chamber.ramp_temperature(target_c, true) {
            Ok(Some(estimate)) => println!(
                "Waited {:.0} s, temperature now {:.1} °C",
                estimate.seconds(),
                chamber.temperature_current().unwrap()
            ),
            Ok(None) => {}
            Err(err) => eprintln!("Ramp failed: {err}"),
        }
    }
}
