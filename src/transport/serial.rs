//! [`Transport`] adapter for `embedded-hal` serial ports
//!
//! The `embedded-hal` 0.2 serial traits have no "bytes available" query, so
//! the adapter keeps a single byte of look-ahead: `available()` performs a
//! non-blocking read and parks the byte until `read_byte()` hands it out.

use embedded_hal::serial::{Read, Write};

use super::traits::Transport;

/// Serial port wrapped as a modem transport
pub struct SerialTransport<S> {
    serial: S,
    pending: Option<u8>,
}

impl<S> SerialTransport<S> {
    /// Wrap a serial port
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            pending: None,
        }
    }

    /// Release the serial port. A parked look-ahead byte is dropped.
    pub fn release(self) -> S {
        self.serial
    }
}

impl<S, E> Transport for SerialTransport<S>
where
    S: Read<u8, Error = E> + Write<u8, Error = E>,
{
    type Error = E;

    fn available(&mut self) -> usize {
        if self.pending.is_none() {
            // Framing/overrun errors count as "nothing to read"
            self.pending = self.serial.read().ok();
        }
        usize::from(self.pending.is_some())
    }

    fn read_byte(&mut self) -> Option<u8> {
        match self.pending.take() {
            Some(byte) => Some(byte),
            None => self.serial.read().ok(),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            nb::block!(self.serial.write(byte))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(self.serial.flush())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Debug, PartialEq)]
    struct Fault;

    struct LoopbackPort {
        rx: VecDeque<nb::Result<u8, Fault>>,
        tx: Vec<u8>,
    }

    impl Read<u8> for LoopbackPort {
        type Error = Fault;

        fn read(&mut self) -> nb::Result<u8, Fault> {
            self.rx.pop_front().unwrap_or(Err(nb::Error::WouldBlock))
        }
    }

    impl Write<u8> for LoopbackPort {
        type Error = Fault;

        fn write(&mut self, word: u8) -> nb::Result<(), Fault> {
            self.tx.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Fault> {
            Ok(())
        }
    }

    #[test]
    fn test_lookahead_byte_is_not_lost() {
        let port = LoopbackPort {
            rx: VecDeque::from([Ok(b'A'), Err(nb::Error::Other(Fault)), Ok(b'B')]),
            tx: Vec::new(),
        };
        let mut transport = SerialTransport::new(port);

        assert_eq!(transport.available(), 1);
        assert_eq!(transport.available(), 1);
        assert_eq!(transport.read_byte(), Some(b'A'));

        // A read error surfaces as "no byte"
        assert_eq!(transport.available(), 0);
        assert_eq!(transport.read_byte(), Some(b'B'));
        assert_eq!(transport.read_byte(), None);
    }

    #[test]
    fn test_write_passes_bytes_through() {
        let port = LoopbackPort {
            rx: VecDeque::new(),
            tx: Vec::new(),
        };
        let mut transport = SerialTransport::new(port);
        transport.write(b"AT\r").unwrap();
        transport.flush().unwrap();
        assert_eq!(transport.release().tx, b"AT\r");
    }
}
