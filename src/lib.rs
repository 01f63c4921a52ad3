//! AT-command LoRaWAN modem driver in Rust
//!
//! This crate drives a LoRaWAN modem that speaks a text AT command set over
//! a byte stream (UART). The modem runs the LoRaWAN stack itself; the driver
//! sequences commands, matches replies and extracts received downlinks that
//! arrive inline with command responses.
//!
//! # Features
//! - OTAA and ABP activation
//! - Confirmed and unconfirmed uplinks with typed error results
//! - Downlink payload buffering through a bounded byte queue
//! - Several firmware dialects, with automatic compatibility mode
//! - Adapter for `embedded-hal` serial ports
//! - No unsafe code, no allocation
//!
//! # Example
//! ```no_run
//! use core::time::Duration;
//! use lorawan_modem::{
//!     at::Dialect,
//!     config::{Band, ModemConfig},
//!     modem::LoRaModem,
//!     transport::{Clock, Transport},
//! };
//!
//! # fn run<T: Transport, C: Clock>(transport: T, clock: C) {
//! let mut modem: LoRaModem<T, C> =
//!     LoRaModem::new(transport, clock, Dialect::arduino(), ModemConfig::default());
//!
//! modem.begin(Band::EU868).unwrap();
//! let joined = modem
//!     .join_otaa("0000000000000000", "00000000000000000000000000000000", None, Duration::from_secs(60))
//!     .unwrap();
//!
//! if joined {
//!     modem.send(b"Hello, LoRaWAN!", false).unwrap();
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod log;

/// AT command engine
pub mod at;

/// Session configuration
pub mod config;

/// Error type
pub mod error;

/// Bounded byte queue
pub mod fifo;

/// High-level modem session
pub mod modem;

/// Transport abstraction
pub mod transport;

pub use error::ModemError;
pub use fifo::ByteFifo;
pub use modem::LoRaModem;
