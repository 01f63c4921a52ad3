use core::time::Duration;

/// Byte-stream device the modem is attached to
///
/// The driver never assumes message boundaries from the transport; it
/// rebuilds them from the byte stream itself.
pub trait Transport {
    /// Error type for write operations
    type Error;

    /// Number of bytes that can be read without blocking
    fn available(&mut self) -> usize;

    /// Read one byte. `None` means no valid byte this time around.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write all bytes
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Wait until written bytes have left the device
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Monotonic time source with a cooperative yield point
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&mut self) -> Duration;

    /// Give other cooperative work sharing this thread a chance to run
    fn yield_now(&mut self) {}

    /// Spin for `duration`, yielding on every iteration
    fn delay(&mut self, duration: Duration) {
        let start = self.now();
        while self.now().saturating_sub(start) < duration {
            self.yield_now();
        }
    }
}

/// Stream-like face of the modem session
///
/// Outbound bytes are buffered until the packet is closed; inbound bytes
/// are the payload of received downlinks.
pub trait ByteStream {
    /// Queue bytes for the current outbound packet, returns how many fit
    fn write(&mut self, bytes: &[u8]) -> usize;

    /// Copy buffered inbound bytes into `buf`, returns how many were copied
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Number of inbound bytes ready to read
    fn available(&mut self) -> usize;

    /// Flush the underlying transport
    fn flush(&mut self);
}
