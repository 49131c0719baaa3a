//! Byte transport to the display controller
//!
//! The controller speaks a write-only serial protocol where every
//! byte is tagged by the D/C line as either a command or display
//! data. [`LcdInterface`] captures exactly that capability plus the
//! hardware reset pulse; [`SpiInterface`] is the stock
//! `embedded-hal` implementation over an SPI device and two pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Tag deciding the D/C line level for one transferred byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteKind {
    /// Control command for the controller's command decoder.
    Command,
    /// Pixel data written to display RAM.
    Data,
}

/// Transport-level failure, flattened so drivers stay generic over a
/// single error shape regardless of the bus and pin types underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The serial bus rejected a write.
    Bus,
    /// A control pin could not be driven.
    Pin,
}

/// Write-only byte transport to the display chip.
pub trait LcdInterface {
    /// Send one byte, tagged as command or data.
    fn send(&mut self, kind: ByteKind, byte: u8) -> Result<(), TransportError>;

    /// Pulse the reset line, with coarse uncalibrated delays before
    /// and after the pulse. Only used during initialization.
    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), TransportError>;
}

/// SPI transport: D/C pin low for commands, high for data; the
/// chip-enable framing is the [`SpiDevice`]'s job.
pub struct SpiInterface<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI, DC, RST> SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST> LcdInterface for SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    fn send(&mut self, kind: ByteKind, byte: u8) -> Result<(), TransportError> {
        match kind {
            ByteKind::Command => self.dc.set_low().map_err(|_| TransportError::Pin)?,
            ByteKind::Data => self.dc.set_high().map_err(|_| TransportError::Pin)?,
        }
        self.spi.write(&[byte]).map_err(|_| TransportError::Bus)
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), TransportError> {
        self.rst.set_high().map_err(|_| TransportError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_low().map_err(|_| TransportError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| TransportError::Pin)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::vec::Vec;

    #[derive(Default)]
    struct FakeSpi {
        written: Vec<u8>,
    }

    impl embedded_hal::spi::ErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let embedded_hal::spi::Operation::Write(bytes) = op {
                    self.written.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    /// Records every level driven onto the pin.
    #[derive(Default)]
    struct FakePin {
        levels: Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn dc_line_tracks_byte_kind() {
        let mut iface = SpiInterface::new(FakeSpi::default(), FakePin::default(), FakePin::default());

        iface.send(ByteKind::Command, 0x21).unwrap();
        iface.send(ByteKind::Data, 0xA5).unwrap();

        assert_eq!(iface.dc.levels, [false, true]);
        assert_eq!(iface.spi.written, [0x21, 0xA5]);
    }

    #[test]
    fn hard_reset_pulses_low_then_high() {
        let mut iface = SpiInterface::new(FakeSpi::default(), FakePin::default(), FakePin::default());

        iface.hard_reset(&mut NoDelay).unwrap();

        assert_eq!(iface.rst.levels, [true, false, true]);
    }
}
