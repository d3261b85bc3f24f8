use crate::DeviceAddr;

/// What to do with the status word read right after the soft reset
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum StatusCheck {
    /// Read the reply and drop it, the read only paces the restart
    #[default]
    Discard,
    /// Fail construction when the status checksum does not match
    Verify,
}

/// Settings applied when the driver is constructed
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub address: DeviceAddr,
    pub status_check: StatusCheck,
}

impl Config {
    /// Change the sensor's I2C address
    pub fn with_address(mut self, address: DeviceAddr) -> Self {
        self.address = address;
        self
    }

    pub fn with_status_check(mut self, status_check: StatusCheck) -> Self {
        self.status_check = status_check;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.address as u8, 0x44);
        assert_eq!(config.status_check, StatusCheck::Discard);
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .with_address(DeviceAddr::AD1)
            .with_status_check(StatusCheck::Verify);
        assert_eq!(config.address as u8, 0x45);
        assert_eq!(config.status_check, StatusCheck::Verify);
    }
}
