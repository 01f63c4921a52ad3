//! AT command engine
//!
//! This module contains the request/response machinery shared by every
//! modem operation:
//! - Command emission from tagged arguments
//! - Terminal pattern sets and match outcomes
//! - The byte-at-a-time response matcher with inline frame extraction
//! - Protocol dialect presets

/// Command emitter
pub mod command;

/// Protocol dialect configuration
pub mod dialect;

/// Response matcher
pub mod matcher;

/// Terminal patterns and outcomes
pub mod response;

pub use command::Arg;
pub use dialect::{Dialect, FrameLayout, PayloadEncoding, PayloadLimit};
pub use response::{MatchOutcome, PatternSet};

use crate::config::modem::ModemConfig;
use crate::transport::traits::{Clock, Transport};

/// A transport and clock speaking one dialect
///
/// Emission lives in [`command`], waiting and field reads in [`matcher`].
pub struct AtPort<T, C> {
    transport: T,
    clock: C,
    dialect: Dialect,
    config: ModemConfig,
}

impl<T: Transport, C: Clock> AtPort<T, C> {
    /// Create a new port
    pub fn new(transport: T, clock: C, dialect: Dialect, config: ModemConfig) -> Self {
        Self {
            transport,
            clock,
            dialect,
            config,
        }
    }

    /// Active dialect
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Active timing configuration
    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Mutable timing configuration
    pub fn config_mut(&mut self) -> &mut ModemConfig {
        &mut self.config
    }

    /// Underlying transport
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Underlying clock
    pub fn clock(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Release transport and clock
    pub fn release(self) -> (T, C) {
        (self.transport, self.clock)
    }
}
