//! High-level modem session
//!
//! This module provides the main interface to an AT-command LoRaWAN modem.
//! It sequences command exchanges, owns the inbound and outbound payload
//! queues and turns matched responses into results. Every wait is a
//! cooperative spin: the [`Clock`] yield point runs on each pass.

use core::str::FromStr;
use core::time::Duration;

use heapless::String;

use crate::at::matcher::MAX_FIELD_LEN;
use crate::at::response::{self, MatchOutcome, PatternSet};
use crate::at::{Arg, AtPort, Dialect, PayloadEncoding, PayloadLimit};
use crate::config::modem::{Band, JoinMode, ModemConfig};
use crate::error::ModemError;
use crate::fifo::ByteFifo;
use crate::transport::traits::{Clock, Transport};

mod settings;
mod stream;

/// Default payload queue capacity
pub const DEFAULT_QUEUE_SIZE: usize = 256;

/// Longest firmware identity kept by the session: `<dev> <ver>`
pub const MAX_VERSION_LEN: usize = 2 * MAX_FIELD_LEN + 1;

/// Reply value read after `+OK=`
pub type Value = String<MAX_FIELD_LEN>;

/// Map a status outcome to a result
fn status(outcome: MatchOutcome) -> Result<(), ModemError> {
    match outcome {
        MatchOutcome::Matched(1) => Ok(()),
        MatchOutcome::Matched(index) => Err(ModemError::from_status_index(index)),
        MatchOutcome::NoMatch => Err(ModemError::Timeout),
    }
}

/// AT-command LoRaWAN modem session
///
/// `N` is the capacity of each payload queue; `N - 1` bytes are usable.
pub struct LoRaModem<T, C, const N: usize = DEFAULT_QUEUE_SIZE> {
    port: AtPort<T, C>,
    rx: ByteFifo<N>,
    tx: ByteFifo<N>,
    joined: bool,
    fw_version: String<MAX_VERSION_LEN>,
    compatibility_mode: bool,
    max_payload: usize,
    last_poll: Duration,
}

impl<T: Transport, C: Clock, const N: usize> LoRaModem<T, C, N> {
    /// Create a new session
    pub fn new(transport: T, mut clock: C, dialect: Dialect, config: ModemConfig) -> Self {
        let last_poll = clock.now();
        let max_payload = match dialect.payload_limit {
            PayloadLimit::Fixed(size) => size,
            PayloadLimit::Query => 0,
        };
        Self {
            port: AtPort::new(transport, clock, dialect, config),
            rx: ByteFifo::new(),
            tx: ByteFifo::new(),
            joined: false,
            fw_version: String::new(),
            compatibility_mode: false,
            max_payload,
            last_poll,
        }
    }

    /// Active dialect
    pub fn dialect(&self) -> &Dialect {
        self.port.dialect()
    }

    /// Active configuration
    pub fn config(&self) -> &ModemConfig {
        self.port.config()
    }

    /// Whether the last join attempt succeeded
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Firmware identity learned by [`version`](Self::version)
    pub fn firmware_version(&self) -> &str {
        &self.fw_version
    }

    /// Whether the modem runs older firmware than the dialect's latest
    pub fn compatibility_mode(&self) -> bool {
        self.compatibility_mode
    }

    /// Force the response grammar used for plain exchanges
    pub fn set_compatibility_mode(&mut self, enabled: bool) {
        self.compatibility_mode = enabled;
    }

    /// Whether the modem runs the vendor firmware family
    pub fn is_arduino_fw(&self) -> bool {
        self.fw_version.contains(self.port.dialect().firmware_identifier)
    }

    /// Release transport and clock
    pub fn release(self) -> (T, C) {
        self.port.release()
    }

    // exchange helpers

    fn default_patterns(&self) -> PatternSet<'static> {
        PatternSet::default_for(self.compatibility_mode)
    }

    pub(crate) fn wait(&mut self, timeout: Duration, patterns: &PatternSet<'_>) -> MatchOutcome {
        self.port.wait_response(timeout, patterns, &mut self.rx)
    }

    /// Send one command and wait for the default status patterns
    pub(crate) fn exchange(&mut self, name: &str, args: &[Arg<'_>]) -> Result<(), ModemError> {
        self.port.send_command(name, args);
        let patterns = self.default_patterns();
        let timeout = self.config().exchange_timeout;
        status(self.wait(timeout, &patterns))
    }

    /// Send a query and read the value of its `+OK=<value>\r` reply
    pub(crate) fn query(&mut self, name: &str) -> Result<Value, ModemError> {
        self.port.send_command(name, &[]);
        let timeout = self.config().exchange_timeout;
        status(self.wait(timeout, &PatternSet::expect(response::OK_VALUE)))?;
        self.port.read_until(b'\r').ok_or(ModemError::InvalidResponse)
    }

    /// [`query`](Self::query) parsed into a number
    pub(crate) fn query_parsed<V: FromStr>(&mut self, name: &str) -> Result<V, ModemError> {
        let value = self.query(name)?;
        value.trim().parse().map_err(|_| ModemError::InvalidResponse)
    }

    /// Numeric status query answered as `+OK...=<value>\r`
    fn status_query(&mut self, name: &str) -> Result<usize, ModemError> {
        self.port.send_command(name, &[]);
        let patterns = self.default_patterns();
        let timeout = self.config().query_timeout;
        status(self.wait(timeout, &patterns))?;
        if !self.port.skip_until(b'=') {
            return Err(ModemError::Timeout);
        }
        self.port
            .read_until(b'\r')
            .and_then(|value| value.trim().parse().ok())
            .ok_or(ModemError::InvalidResponse)
    }

    // initialization

    /// Bring the modem up and select the frequency plan
    pub fn begin(&mut self, band: Band) -> Result<(), ModemError> {
        self.init()?;
        self.configure_band(band)
    }

    /// Synchronize with the modem and learn its firmware version
    pub fn init(&mut self) -> Result<(), ModemError> {
        self.auto_baud()?;
        self.version();
        self.compatibility_mode = self.fw_version.as_str() != self.port.dialect().latest_firmware;
        debug!(
            "firmware {=str}, compatibility mode {=bool}",
            self.fw_version.as_str(),
            self.compatibility_mode
        );
        self.refresh_max_payload_size();
        Ok(())
    }

    /// Probe with bare `AT` until the modem answers or the budget runs out
    pub fn auto_baud(&mut self) -> Result<(), ModemError> {
        let config = *self.config();
        let start = self.port.clock().now();
        while self.port.clock().now().saturating_sub(start) < config.autobaud_timeout {
            self.port.send_command("", &[]);
            let answered = self
                .wait(config.autobaud_probe, &PatternSet::ok_error())
                .is_ok();
            self.port.clock().delay(config.autobaud_backoff);
            if answered {
                return Ok(());
            }
        }
        Err(ModemError::Timeout)
    }

    /// Query device and firmware version; the result is kept on the session
    pub fn version(&mut self) -> &str {
        let mut version: String<MAX_VERSION_LEN> = String::new();
        // Each value fits MAX_FIELD_LEN, so both always fit
        if let Ok(device) = self.query("+DEV?") {
            let _ = version.push_str(&device);
        }
        if let Ok(firmware) = self.query("+VER?") {
            if version.push(' ').is_err() || version.push_str(&firmware).is_err() {
                warn!("firmware version truncated");
            }
        }
        self.fw_version = version;
        &self.fw_version
    }

    /// Reboot the modem and run [`init`](Self::init) again
    pub fn restart(&mut self) -> Result<(), ModemError> {
        self.auto_baud()?;
        self.port.send_command("+REBOOT", &[]);
        let config = *self.config();
        let event = self.port.dialect().reboot_event;
        status(self.wait(config.reboot_timeout, &PatternSet::expect(event)))?;
        self.port.clock().delay(config.reboot_settle);
        self.init()
    }

    // activation

    fn join(&mut self, timeout: Duration) -> bool {
        self.port.send_command("+JOIN", &[]);
        let event = self.port.dialect().join_event;
        self.wait(timeout, &PatternSet::expect(event)).is_ok()
    }

    /// Join with over-the-air activation
    ///
    /// Every configuration exchange must succeed; their failures are
    /// returned as errors. The join itself answers `Ok(false)` when the
    /// network did not accept the device within `timeout`.
    pub fn join_otaa(
        &mut self,
        app_eui: &str,
        app_key: &str,
        dev_eui: Option<&str>,
        timeout: Duration,
    ) -> Result<bool, ModemError> {
        self.port.clock().yield_now();
        self.rx.clear();
        self.change_mode(JoinMode::Otaa)?;
        self.set_app_eui(app_eui)?;
        self.set_app_key(app_key)?;
        if let Some(dev_eui) = dev_eui {
            self.set_dev_eui(dev_eui)?;
        }

        let mut joined = self.join(timeout);
        if joined && self.port.dialect().verify_otaa_join {
            joined = self.join_status()? == 1;
        }
        self.joined = joined;
        debug!("OTAA join: {=bool}", joined);
        if joined {
            self.refresh_max_payload_size();
        }

        let settle = self.config().join_settle;
        self.port.clock().delay(settle);
        Ok(joined)
    }

    /// Join with the configuration timeout
    pub fn join_otaa_default(
        &mut self,
        app_eui: &str,
        app_key: &str,
        dev_eui: Option<&str>,
    ) -> Result<bool, ModemError> {
        let timeout = self.config().join_timeout;
        self.join_otaa(app_eui, app_key, dev_eui, timeout)
    }

    /// Activate by personalization
    ///
    /// The join event is not authoritative for ABP; the answer comes from
    /// the modem's join status.
    pub fn join_abp(
        &mut self,
        dev_addr: &str,
        nwk_skey: &str,
        app_skey: &str,
        timeout: Duration,
    ) -> Result<bool, ModemError> {
        self.port.clock().yield_now();
        self.rx.clear();
        self.change_mode(JoinMode::Abp)?;
        self.set_dev_addr(dev_addr)?;
        self.set_nwk_skey(nwk_skey)?;
        self.set_app_skey(app_skey)?;

        self.join(timeout);
        let joined = self.join_status()? == 1;
        self.joined = joined;
        debug!("ABP join: {=bool}", joined);
        if joined {
            self.refresh_max_payload_size();
        }
        Ok(joined)
    }

    /// Network join state as reported by `AT+NJS?`
    pub fn join_status(&mut self) -> Result<usize, ModemError> {
        self.status_query("+NJS?")
    }

    // data

    /// Largest uplink payload the modem accepts, as last learned
    ///
    /// Dialects that query the limit report 0 until [`init`](Self::init)
    /// or a successful join has asked the modem.
    pub fn max_payload_size(&self) -> usize {
        self.max_payload
    }

    /// Ask the modem for its payload limit and keep the answer
    ///
    /// A failed `+MSIZE?` query leaves the limit at 0, so every non-empty
    /// uplink is refused until the next successful refresh.
    pub fn refresh_max_payload_size(&mut self) -> usize {
        self.max_payload = match self.port.dialect().payload_limit {
            PayloadLimit::Fixed(size) => size,
            PayloadLimit::Query => self.status_query("+MSIZE?").unwrap_or_else(|error| {
                warn!("payload size query failed: {=i16}", error.code());
                0
            }),
        };
        self.max_payload
    }

    /// Transmit an uplink and return the number of bytes sent
    ///
    /// A payload over the size limit fails with
    /// [`ModemError::PayloadTooLarge`] before any command is written.
    pub fn send(&mut self, payload: &[u8], confirmed: bool) -> Result<usize, ModemError> {
        if payload.len() > self.max_payload {
            return Err(ModemError::PayloadTooLarge);
        }

        let dialect = *self.port.dialect();
        let command = if confirmed {
            dialect.confirmed_send
        } else {
            dialect.unconfirmed_send
        };
        match dialect.payload_encoding {
            PayloadEncoding::RawAfterLength => {
                self.port.send_command(command, &[Arg::from(payload.len())]);
                self.port.send_raw(payload);
            }
            PayloadEncoding::HexArgument => {
                self.port.send_command(command, &[Arg::Hex(payload)]);
            }
        }

        let timeout = self.config().exchange_timeout;
        let result = status(self.wait(timeout, &PatternSet::status()));
        let result = match (result, dialect.send_confirmation) {
            (Ok(()), Some(marker)) if confirmed => {
                let timeout = self.config().confirm_timeout;
                status(self.wait(timeout, &PatternSet::expect(marker)))
            }
            (result, _) => result,
        };
        if let Err(error) = result {
            debug!("uplink failed: {=i16}", error.code());
        }
        result.map(|()| payload.len())
    }

    /// Set the minimum keep-alive poll interval in seconds
    pub fn min_poll_interval(&mut self, secs: u32) {
        self.port.config_mut().poll_interval = Duration::from_secs(secs.into());
    }

    /// Send an empty unconfirmed uplink if the poll interval has elapsed
    ///
    /// This lets the modem deliver pending downlinks. Returns whether a poll
    /// was sent.
    pub fn poll(&mut self) -> Result<bool, ModemError> {
        let now = self.port.clock().now();
        if now.saturating_sub(self.last_poll) < self.config().poll_interval {
            return Ok(false);
        }
        self.last_poll = now;
        self.send(&[], false)?;
        Ok(true)
    }

    /// Drain bytes already waiting on the transport
    ///
    /// Receive frames among them end up in the inbound queue; anything else
    /// is discarded.
    pub fn maintain(&mut self) {
        let timeout = self.config().maintain_timeout;
        let patterns = self.default_patterns();
        while self.port.transport().available() > 0 {
            self.wait(timeout, &patterns);
        }
    }
}
