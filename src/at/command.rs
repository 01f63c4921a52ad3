use core::fmt::Write as _;

use heapless::String;

use super::AtPort;
use crate::log;
use crate::transport::traits::{Clock, Transport};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Typed command argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// Decimal text
    Int(i64),
    /// `1` or `0`
    Bool(bool),
    /// Verbatim text
    Str(&'a str),
    /// Verbatim bytes
    Bytes(&'a [u8]),
    /// Upper-case hex pairs, two characters per byte
    Hex(&'a [u8]),
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<u16> for Arg<'_> {
    fn from(value: u16) -> Self {
        Arg::Int(value.into())
    }
}

impl From<u8> for Arg<'_> {
    fn from(value: u8) -> Self {
        Arg::Int(value.into())
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Bytes(value)
    }
}

impl Arg<'_> {
    /// Feed the wire form of this argument to `out`
    pub fn encode<F: FnMut(&[u8])>(&self, out: &mut F) {
        match *self {
            Arg::Int(value) => {
                let mut text: String<20> = String::new();
                // i64::MIN is 20 characters, always fits
                let _ = write!(text, "{}", value);
                out(text.as_bytes());
            }
            Arg::Bool(value) => out(if value { b"1" } else { b"0" }),
            Arg::Str(value) => out(value.as_bytes()),
            Arg::Bytes(value) => out(value),
            Arg::Hex(value) => {
                for byte in value {
                    out(&[
                        HEX_DIGITS[usize::from(byte >> 4)],
                        HEX_DIGITS[usize::from(byte & 0x0F)],
                    ]);
                }
            }
        }
    }
}

/// Serialize `<prefix><name><arg><delimiter><arg>...<terminator>` into `out`
///
/// `name` carries its own separator (`"+BAND="`, `"+UTX "`, `"+DEV?"`), so
/// the formatter only joins the arguments.
pub fn encode_command<F: FnMut(&[u8])>(
    prefix: &str,
    name: &str,
    args: &[Arg<'_>],
    delimiter: u8,
    terminator: &str,
    out: &mut F,
) {
    out(prefix.as_bytes());
    out(name.as_bytes());
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out(&[delimiter]);
        }
        arg.encode(out);
    }
    out(terminator.as_bytes());
}

impl<T: Transport, C: Clock> AtPort<T, C> {
    /// Write a command line, flush and yield once
    ///
    /// Transport failures are not reported here; the response wait that
    /// follows sees them as a timeout.
    pub fn send_command(&mut self, name: &str, args: &[Arg<'_>]) {
        let dialect = self.dialect;
        let transport = &mut self.transport;
        let mut failed = false;
        encode_command(
            dialect.command_prefix,
            name,
            args,
            dialect.arg_delimiter,
            dialect.line_terminator,
            &mut |chunk: &[u8]| {
                if !failed && transport.write(chunk).is_err() {
                    failed = true;
                }
            },
        );
        if self.transport.flush().is_err() {
            failed = true;
        }
        if failed {
            warn!("transport write failed for {=str}", name);
        }
        debug!("AT{=str}", name);
        self.clock.yield_now();
    }

    /// Write raw bytes after a command line (uplink payload)
    pub fn send_raw(&mut self, bytes: &[u8]) {
        if self.transport.write(bytes).is_err() || self.transport.flush().is_err() {
            warn!("transport write failed for {=usize} payload bytes", bytes.len());
        }
        trace!("raw {=str}", log::text(bytes));
    }
}
