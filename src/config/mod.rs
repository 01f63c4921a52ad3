//! Modem configuration
//!
//! This module contains types for configuring the modem session and the
//! radio settings exposed by the AT command set. It includes:
//! - Time budgets and buffer limits
//! - Band, RF output, activation mode and device class selectors

/// Session configuration and radio setting selectors
pub mod modem;

pub use modem::{Band, DeviceClass, JoinMode, ModemConfig, RfMode};
