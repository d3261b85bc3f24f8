/// Commands understood by the driver, each a 16 bit opcode
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Command {
    /// Restarts the sensor without power cycling it
    SoftReset = 0x30A2,
    /// Requests the 16 bit status register followed by its checksum
    ReadStatus = 0xF32D,
    /// Single shot measurement, high repeatability, clock stretching disabled
    MeasureHighRepeatability = 0x2400,
}

impl Command {
    pub fn opcode(self) -> u16 {
        self as u16
    }

    /// Opcode as it goes on the wire, MSB first
    pub fn to_bytes(self) -> [u8; 2] {
        self.opcode().to_be_bytes()
    }

    /// Milliseconds the sensor needs before it can be addressed again
    pub fn settle_ms(self) -> u32 {
        match self {
            Command::SoftReset => 10,
            // Worst case conversion time for high repeatability
            Command::MeasureHighRepeatability => 50,
            Command::ReadStatus => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Command::SoftReset, [0x30, 0xA2])]
    #[case(Command::ReadStatus, [0xF3, 0x2D])]
    #[case(Command::MeasureHighRepeatability, [0x24, 0x00])]
    fn msb_first(#[case] command: Command, #[case] bytes: [u8; 2]) {
        assert_eq!(command.to_bytes(), bytes);
    }

    #[test]
    fn settle_times() {
        assert_eq!(Command::SoftReset.settle_ms(), 10);
        assert_eq!(Command::MeasureHighRepeatability.settle_ms(), 50);
    }
}
