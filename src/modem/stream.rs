//! Packet buffering and the byte-stream interface

use super::LoRaModem;
use crate::error::ModemError;
use crate::transport::traits::{ByteStream, Clock, Transport};

impl<T: Transport, C: Clock, const N: usize> LoRaModem<T, C, N> {
    /// Start a new outbound packet, discarding anything not yet sent
    pub fn begin_packet(&mut self) {
        self.tx.clear();
    }

    /// Append one byte to the outbound packet
    pub fn write_byte(&mut self, byte: u8) -> bool {
        self.tx.put(byte)
    }

    /// Send the buffered outbound packet
    pub fn end_packet(&mut self, confirmed: bool) -> Result<usize, ModemError> {
        let mut buffer = [0u8; N];
        let size = self.tx.get_slice(&mut buffer);
        self.send(&buffer[..size], confirmed)
    }

    /// Number of received bytes ready to read
    pub fn parse_packet(&mut self) -> usize {
        ByteStream::available(self)
    }

    /// Take one received byte
    pub fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match ByteStream::read(self, &mut byte) {
            1 => Some(byte[0]),
            _ => None,
        }
    }

    /// Look at the next received byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Joined, or holding received data
    pub fn connected(&mut self) -> bool {
        ByteStream::available(self) > 0 || self.joined
    }
}

impl<T: Transport, C: Clock, const N: usize> ByteStream for LoRaModem<T, C, N> {
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.tx.put_slice(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.port.clock().yield_now();
        self.maintain();
        self.rx.get_slice(buf)
    }

    fn available(&mut self) -> usize {
        self.port.clock().yield_now();
        if !self.rx.readable() {
            self.maintain();
        }
        self.rx.size()
    }

    fn flush(&mut self) {
        if self.port.transport().flush().is_err() {
            warn!("transport flush failed");
        }
    }
}
