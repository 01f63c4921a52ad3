/// Transport, clock and stream traits
pub mod traits;

/// `embedded-hal` serial adapter
pub mod serial;

/// Host clock
#[cfg(feature = "std")]
pub mod std_clock;

pub use traits::{ByteStream, Clock, Transport};
pub use serial::SerialTransport;
#[cfg(feature = "std")]
pub use std_clock::StdClock;
