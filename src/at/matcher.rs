//! Response matcher
//!
//! Command replies and unsolicited receive frames share a single byte
//! stream with no out-of-band framing, so the matcher works one byte at a
//! time: every byte is appended to an accumulation buffer and the buffer's
//! tail is compared against the terminal patterns, then against the
//! dialect's receive marker. A receive frame is drained completely into the
//! inbound queue before matching resumes.

use core::time::Duration;

use heapless::{String, Vec};

use super::dialect::FrameLayout;
use super::response::{MatchOutcome, PatternSet};
use super::AtPort;
use crate::fifo::ByteFifo;
use crate::log;
use crate::transport::traits::{Clock, Transport};

/// Hard upper bound on one accumulated response
pub const MAX_RESPONSE_LEN: usize = 256;

/// Longest value field read after a `+OK=` reply
pub const MAX_FIELD_LEN: usize = 64;

/// What a single byte did to the accumulation buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Nothing recognized yet
    Pending,
    /// Terminal pattern at this 1-based slot
    Matched(usize),
    /// The receive marker just completed
    InlineFrame,
    /// Buffer limit reached
    Overflow,
}

/// Append `byte` and classify the new tail
pub(crate) fn step<const M: usize>(
    data: &mut Vec<u8, M>,
    byte: u8,
    limit: usize,
    patterns: &PatternSet<'_>,
    receive_marker: &str,
) -> Step {
    if data.len() >= limit || data.push(byte).is_err() {
        return Step::Overflow;
    }
    if let Some(index) = patterns.match_suffix(data.as_slice()) {
        return Step::Matched(index);
    }
    if !receive_marker.is_empty() && data.ends_with(receive_marker.as_bytes()) {
        return Step::InlineFrame;
    }
    Step::Pending
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl<T: Transport, C: Clock> AtPort<T, C> {
    /// Wait up to `timeout` for one of `patterns` to end the response
    ///
    /// Receive frames met on the way are moved into `rx`. Whatever text is
    /// left unmatched when the wait gives up is discarded.
    pub fn wait_response<const N: usize>(
        &mut self,
        timeout: Duration,
        patterns: &PatternSet<'_>,
        rx: &mut ByteFifo<N>,
    ) -> MatchOutcome {
        let start = self.clock.now();
        let limit = self.config.max_response_len.min(MAX_RESPONSE_LEN);
        let marker = self.dialect.receive_marker;
        let mut data: Vec<u8, MAX_RESPONSE_LEN> = Vec::new();

        let outcome = 'wait: loop {
            self.clock.yield_now();
            while self.transport.available() > 0 {
                let byte = match self.transport.read_byte() {
                    Some(byte) => byte,
                    None => break,
                };
                match step(&mut data, byte, limit, patterns, marker) {
                    Step::Pending => {}
                    Step::Matched(index) => break 'wait MatchOutcome::Matched(index),
                    Step::Overflow => {
                        warn!("response exceeded {=usize} bytes", limit);
                        break 'wait MatchOutcome::NoMatch;
                    }
                    Step::InlineFrame => {
                        data.clear();
                        self.drain_inline_frame(rx);
                    }
                }
            }
            if self.clock.now().saturating_sub(start) >= timeout {
                break MatchOutcome::NoMatch;
            }
        };

        if outcome == MatchOutcome::NoMatch {
            let residue = log::text(&data).trim();
            if !residue.is_empty() {
                debug!("unhandled: {=str}", residue);
            }
        }
        outcome
    }

    /// Next byte from the transport, spinning until `timeout` after `start`
    fn next_byte(&mut self, start: Duration, timeout: Duration) -> Option<u8> {
        loop {
            if self.transport.available() > 0 {
                if let Some(byte) = self.transport.read_byte() {
                    return Some(byte);
                }
            }
            if self.clock.now().saturating_sub(start) >= timeout {
                return None;
            }
            self.clock.yield_now();
        }
    }

    fn skip_through(&mut self, delimiter: u8, start: Duration, timeout: Duration) -> bool {
        while let Some(byte) = self.next_byte(start, timeout) {
            if byte == delimiter {
                return true;
            }
        }
        false
    }

    fn read_through<const M: usize>(
        &mut self,
        delimiter: u8,
        start: Duration,
        timeout: Duration,
    ) -> Option<String<M>> {
        let mut field: String<M> = String::new();
        let mut fits = true;
        loop {
            let byte = self.next_byte(start, timeout)?;
            if byte == delimiter {
                return fits.then_some(field);
            }
            if fits && field.push(char::from(byte)).is_err() {
                fits = false;
            }
        }
    }

    /// Discard input up to and including `delimiter`
    pub fn skip_until(&mut self, delimiter: u8) -> bool {
        let start = self.clock.now();
        self.skip_through(delimiter, start, self.config.field_timeout)
    }

    /// Read a value up to (not including) `delimiter`
    ///
    /// `None` on timeout or when the value does not fit [`MAX_FIELD_LEN`].
    pub fn read_until(&mut self, delimiter: u8) -> Option<String<MAX_FIELD_LEN>> {
        let start = self.clock.now();
        self.read_through(delimiter, start, self.config.field_timeout)
    }

    /// Move one receive frame from the transport into `rx`
    ///
    /// The frame is staged first and only lands in `rx` when it was read
    /// completely and fits; otherwise it is dropped as a whole.
    fn drain_inline_frame<const N: usize>(&mut self, rx: &mut ByteFifo<N>) {
        let start = self.clock.now();
        let timeout = self.config.frame_timeout;
        let mut staged: Vec<u8, N> = Vec::new();

        let complete = match self.dialect.frame_layout {
            FrameLayout::LengthPrefixed {
                port_delimiter,
                length_terminator,
                line_breaks,
            } => {
                if !self.skip_through(port_delimiter, start, timeout) {
                    warn!("receive frame: no port field");
                    return;
                }
                let length = match self
                    .read_through::<10>(length_terminator, start, timeout)
                    .and_then(|field| field.trim().parse::<usize>().ok())
                {
                    Some(length) => length,
                    None => {
                        warn!("receive frame: bad length field");
                        return;
                    }
                };
                for _ in 0..line_breaks {
                    if !self.skip_through(b'\n', start, timeout) {
                        warn!("receive frame: framing timed out");
                        return;
                    }
                }
                let mut fits = true;
                for _ in 0..length {
                    match self.next_byte(start, timeout) {
                        Some(byte) => {
                            if fits && staged.push(byte).is_err() {
                                fits = false;
                            }
                        }
                        None => {
                            warn!("receive frame: payload timed out");
                            return;
                        }
                    }
                }
                fits
            }
            FrameLayout::HexLine {
                port_delimiter,
                terminator,
                line_breaks,
            } => {
                if !self.skip_through(port_delimiter, start, timeout) {
                    warn!("receive frame: no port field");
                    return;
                }
                let mut valid = true;
                let mut high: Option<u8> = None;
                loop {
                    let byte = match self.next_byte(start, timeout) {
                        Some(byte) => byte,
                        None => {
                            warn!("receive frame: payload timed out");
                            return;
                        }
                    };
                    if byte == terminator {
                        break;
                    }
                    match (hex_value(byte), high.take()) {
                        (Some(low), Some(hi)) => {
                            if staged.push((hi << 4) | low).is_err() {
                                valid = false;
                            }
                        }
                        (Some(nibble), None) => high = Some(nibble),
                        (None, _) => valid = false,
                    }
                }
                for _ in 0..line_breaks {
                    if !self.skip_through(b'\n', start, timeout) {
                        warn!("receive frame: framing timed out");
                        return;
                    }
                }
                valid && high.is_none()
            }
        };

        if !complete || staged.len() > rx.writable_capacity() {
            warn!("receive frame dropped ({=usize} bytes)", staged.len());
            return;
        }
        rx.put_slice(&staged);
        trace!("received {=usize} bytes", staged.len());
    }
}
