pub mod command;
pub mod config;
pub mod error;
pub mod fault;

use crate::command::Command;
use crate::config::{Config, StatusCheck};
use crate::fault::{FaultHandler, Quantity};
use crc::{Algorithm, Crc};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;
use error::{Result, SHTError};
use log::{debug, trace, warn};
use std::fmt::Debug;

pub mod prelude {
    pub use super::{
        command::Command,
        config::{Config, StatusCheck},
        error::SHTError,
        fault::{FaultHandler, PanicOnFault, Quantity},
        DeviceAddr, Reading, SHT31,
    };
}

const CRC_ALGORITHM: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0x92,
    residue: 0x00,
};

const CRC: Crc<u8> = Crc::<u8>::new(&CRC_ALGORITHM);

// 2**16 - 1
const CONVERSION_DENOM: f32 = 65535f32;

// Celsius offset and span
const CELSIUS_PAIR: (f32, f32) = (45f32, 175f32);

/// The temperature and humidity sensor
#[derive(Debug)]
pub struct SHT31<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    reading: Reading,
}

/// Represents the reading gotten from the sensor, temperature in °C and humidity in %RH
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub temperature: f32,
    pub humidity: f32,
}

/// The two supported I2C addresses
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum DeviceAddr {
    #[default]
    AD0 = 0x44,
    AD1 = 0x45,
}

/// CRC-8 used by the sensor on every word it sends
pub fn crc8(bytes: &[u8]) -> u8 {
    CRC.checksum(bytes)
}

fn merge_bytes(a: u8, b: u8) -> u16 {
    ((a as u16) << 8) | b as u16
}

fn verify_data(buffer: [u8; 6]) -> Result<()> {
    let temp_result = crc8(&[buffer[0], buffer[1]]);
    if temp_result != buffer[2] {
        return Err(SHTError::InvalidTemperatureChecksumError {
            bytes_start: buffer[0],
            bytes_end: buffer[1],
            expected_checksum: buffer[2],
            calculated_checksum: temp_result,
        });
    }

    let humidity_result = crc8(&[buffer[3], buffer[4]]);
    if humidity_result != buffer[5] {
        return Err(SHTError::InvalidHumidityChecksumError {
            bytes_start: buffer[3],
            bytes_end: buffer[4],
            expected_checksum: buffer[5],
            calculated_checksum: humidity_result,
        });
    }

    Ok(())
}

fn verify_status(buffer: [u8; 3]) -> Result<u16> {
    let status_result = crc8(&[buffer[0], buffer[1]]);
    if status_result != buffer[2] {
        return Err(SHTError::InvalidStatusChecksumError {
            bytes_start: buffer[0],
            bytes_end: buffer[1],
            expected_checksum: buffer[2],
            calculated_checksum: status_result,
        });
    }
    Ok(merge_bytes(buffer[0], buffer[1]))
}

/// Converts a raw temperature word to °C
pub fn convert_temperature(word: u16) -> f32 {
    let (sub, mul) = CELSIUS_PAIR;
    mul * (word as f32 / CONVERSION_DENOM) - sub
}

/// Converts a raw humidity word to %RH
pub fn convert_humidity(word: u16) -> f32 {
    100f32 * word as f32 / CONVERSION_DENOM
}

fn process_data(buffer: [u8; 6]) -> Result<Reading> {
    verify_data(buffer)?;

    Ok(Reading {
        temperature: convert_temperature(merge_bytes(buffer[0], buffer[1])),
        humidity: convert_humidity(merge_bytes(buffer[3], buffer[4])),
    })
}

impl<I2C, D, E> SHT31<I2C, D>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E>,
    E: Debug,
    D: DelayMs<u32>,
{
    /// Create a new sensor at the default address, resetting it in the process
    pub fn new(i2c: I2C, delay: D) -> Result<Self> {
        Self::with_config(i2c, delay, Config::default())
    }

    /// Create a new sensor with the given configuration.
    /// Soft resets the device, waits for it to restart and reads its status word.
    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Result<Self> {
        let mut sensor = Self {
            i2c,
            delay,
            address: config.address as u8,
            reading: Reading::default(),
        };

        sensor.reset()?;

        // The status word is not interpreted, reading it only confirms the device answers
        match config.status_check {
            StatusCheck::Discard => {
                let buffer = sensor.read_status_frame()?;
                trace!("SHT31 discarded status frame {:02x?}", buffer);
            }
            StatusCheck::Verify => {
                let status = sensor.read_status()?;
                debug!("SHT31 status {:#06x}", status);
            }
        }

        Ok(sensor)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// The last successful reading, no bus traffic involved
    pub fn last_reading(&self) -> Reading {
        self.reading
    }

    /// Releases the bus and delay, destroying the driver
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Restarts the sensor and waits until it can be addressed again
    pub fn reset(&mut self) -> Result<()> {
        self.send(Command::SoftReset)
    }

    /// Reads the raw status register, verified against its checksum
    pub fn read_status(&mut self) -> Result<u16> {
        let buffer = self.read_status_frame()?;
        verify_status(buffer)
    }

    /// Performs a full measurement cycle. Both values are committed or neither is.
    pub fn acquire_measurement(&mut self) -> Result<Reading> {
        self.send(Command::MeasureHighRepeatability)?;

        let mut buffer = [0; 6];
        self.i2c_read(&mut buffer)?;
        trace!("SHT31 measurement frame {:02x?}", buffer);

        let reading = process_data(buffer).map_err(|err| {
            warn!("SHT31 {}", err);
            err
        })?;
        self.reading = reading;
        debug!(
            "SHT31 read {}°C {}%RH",
            reading.temperature, reading.humidity
        );

        Ok(reading)
    }

    /// Measures and returns the temperature in °C
    pub fn read_temperature(&mut self) -> Result<f32> {
        self.acquire_measurement().map(|reading| reading.temperature)
    }

    /// Measures and returns the relative humidity in %
    pub fn read_humidity(&mut self) -> Result<f32> {
        self.acquire_measurement().map(|reading| reading.humidity)
    }

    /// Measures the temperature, handing any failure to the fault handler
    pub fn read_temperature_or_halt<F: FaultHandler>(&mut self, fault: &mut F) -> f32 {
        match self.read_temperature() {
            Ok(temperature) => temperature,
            Err(err) => fault.hard_fault(&Quantity::Temperature.fault_message(&err)),
        }
    }

    /// Measures the humidity, handing any failure to the fault handler
    pub fn read_humidity_or_halt<F: FaultHandler>(&mut self, fault: &mut F) -> f32 {
        match self.read_humidity() {
            Ok(humidity) => humidity,
            Err(err) => fault.hard_fault(&Quantity::Humidity.fault_message(&err)),
        }
    }

    fn read_status_frame(&mut self) -> Result<[u8; 3]> {
        self.send(Command::ReadStatus)?;
        let mut buffer = [0; 3];
        self.i2c_read(&mut buffer)?;
        Ok(buffer)
    }

    /// Writes the command and blocks for as long as the sensor needs to process it
    fn send(&mut self, command: Command) -> Result<()> {
        debug!("SHT31 {:?} ({:#06x})", command, command.opcode());
        self.i2c_write(&command.to_bytes())?;

        let settle = command.settle_ms();
        if settle > 0 {
            self.delay.delay_ms(settle);
        }
        Ok(())
    }

    fn i2c_write(&mut self, bytes: &[u8]) -> Result<()> {
        match self.i2c.write(self.address, bytes) {
            Ok(res) => Ok(res),
            Err(err) => {
                warn!("SHT31 write failed: {:?}", err);
                Err(SHTError::WriteI2CError)
            }
        }
    }

    fn i2c_read(&mut self, buffer: &mut [u8]) -> Result<()> {
        match self.i2c.read(self.address, buffer) {
            Ok(res) => Ok(res),
            Err(err) => {
                warn!("SHT31 read failed: {:?}", err);
                Err(SHTError::ReadI2CError)
            }
        }
    }
}
