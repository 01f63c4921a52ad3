//! Modem error type

/// Outcome of a failed modem operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    /// No terminal pattern matched before the deadline
    Timeout,
    /// Generic `+ERR`
    Protocol,
    /// `+ERR_PARAM`
    Parameter,
    /// `+ERR_BUSY`
    Busy,
    /// `+ERR_PARAM_OVERFLOW`
    Overflow,
    /// `+ERR_NO_NETWORK`
    NoNetwork,
    /// `+ERR_RX`
    Rx,
    /// `+ERR_UNKNOWN`
    Unknown,
    /// Payload longer than the modem accepts; nothing was sent
    PayloadTooLarge,
    /// A reply value could not be parsed
    InvalidResponse,
}

impl ModemError {
    /// Map a matched status slot (2..=8 of the status pattern set)
    pub fn from_status_index(index: usize) -> Self {
        match index {
            2 => ModemError::Protocol,
            3 => ModemError::Parameter,
            4 => ModemError::Busy,
            5 => ModemError::Overflow,
            6 => ModemError::NoNetwork,
            7 => ModemError::Rx,
            8 => ModemError::Unknown,
            _ => ModemError::InvalidResponse,
        }
    }

    /// Legacy signed error code
    ///
    /// `-1` timeout, `-2..=-8` the matched status slot, `-20` payload too
    /// long, `-21` unparsable reply.
    pub fn code(self) -> i16 {
        match self {
            ModemError::Timeout => -1,
            ModemError::Protocol => -2,
            ModemError::Parameter => -3,
            ModemError::Busy => -4,
            ModemError::Overflow => -5,
            ModemError::NoNetwork => -6,
            ModemError::Rx => -7,
            ModemError::Unknown => -8,
            ModemError::PayloadTooLarge => -20,
            ModemError::InvalidResponse => -21,
        }
    }
}

impl core::fmt::Display for ModemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ModemError::Timeout => "timed out waiting for the modem",
            ModemError::Protocol => "modem reported an error",
            ModemError::Parameter => "invalid parameter",
            ModemError::Busy => "modem busy",
            ModemError::Overflow => "parameter overflow",
            ModemError::NoNetwork => "not joined to a network",
            ModemError::Rx => "receive error",
            ModemError::Unknown => "unknown modem error",
            ModemError::PayloadTooLarge => "payload too large",
            ModemError::InvalidResponse => "unexpected reply",
        };
        f.write_str(text)
    }
}
