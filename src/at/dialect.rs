//! Protocol dialects
//!
//! Modem firmware revisions share the same command/response shape but
//! differ in markers, inline frame layout and payload handling. A
//! [`Dialect`] captures those differences and is chosen once when the
//! session is built.

/// How the payload of an inline receive frame is laid out after its marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameLayout {
    /// `<port><port_delimiter><len><length_terminator>`, then `line_breaks`
    /// newline characters, then exactly `len` raw payload bytes
    LengthPrefixed {
        /// Ends the port field
        port_delimiter: u8,
        /// Ends the length field
        length_terminator: u8,
        /// Newlines to skip before the payload starts
        line_breaks: u8,
    },
    /// `<port><port_delimiter><hex pairs><terminator>`, then `line_breaks`
    /// newline characters. The payload length is implied by the hex text.
    HexLine {
        /// Ends the port field
        port_delimiter: u8,
        /// Ends the hex payload
        terminator: u8,
        /// Newlines to skip after the terminator
        line_breaks: u8,
    },
}

/// How an uplink payload travels with the send command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadEncoding {
    /// Byte count as the argument, raw payload written after the command line
    RawAfterLength,
    /// Hex-encoded payload as the argument
    HexArgument,
}

/// Where the maximum uplink payload size comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadLimit {
    /// Known up front
    Fixed(usize),
    /// Asked from the modem with `AT+MSIZE?` at init and after a join
    Query,
}

/// Protocol dialect configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Full version string of the newest firmware; anything else runs in
    /// compatibility mode
    pub latest_firmware: &'static str,
    /// Substring identifying the vendor firmware family
    pub firmware_identifier: &'static str,
    /// Prefix written before every command name
    pub command_prefix: &'static str,
    /// Terminates every command line
    pub line_terminator: &'static str,
    /// Separates multiple command arguments
    pub arg_delimiter: u8,
    /// Introduces an unsolicited receive frame
    pub receive_marker: &'static str,
    /// Layout of the receive frame after the marker
    pub frame_layout: FrameLayout,
    /// Unconfirmed uplink command
    pub unconfirmed_send: &'static str,
    /// Confirmed uplink command
    pub confirmed_send: &'static str,
    /// Uplink payload encoding
    pub payload_encoding: PayloadEncoding,
    /// Maximum uplink payload
    pub payload_limit: PayloadLimit,
    /// Second marker a confirmed uplink must see after OK
    pub send_confirmation: Option<&'static str>,
    /// Event announcing a successful join
    pub join_event: &'static str,
    /// Event announcing the modem came back from a reboot
    pub reboot_event: &'static str,
    /// Confirm an OTAA join with an explicit status query
    pub verify_otaa_join: bool,
}

impl Dialect {
    /// Current vendor firmware
    pub const fn arduino() -> Self {
        Self {
            latest_firmware: "ARD-078 1.1.9",
            firmware_identifier: "ARD-078",
            command_prefix: "AT",
            line_terminator: "\r",
            arg_delimiter: b',',
            receive_marker: "+RECV=",
            frame_layout: FrameLayout::LengthPrefixed {
                port_delimiter: b',',
                length_terminator: b'\r',
                line_breaks: 2,
            },
            unconfirmed_send: "+UTX ",
            confirmed_send: "+CTX ",
            payload_encoding: PayloadEncoding::RawAfterLength,
            payload_limit: PayloadLimit::Fixed(64),
            send_confirmation: None,
            join_event: "+EVENT=1,1",
            reboot_event: "+EVENT=0,0",
            verify_otaa_join: false,
        }
    }

    /// Stock firmware: payload limit and join state have to be asked for
    pub const fn legacy() -> Self {
        Self {
            payload_limit: PayloadLimit::Query,
            verify_otaa_join: true,
            ..Self::arduino()
        }
    }

    /// Firmware reporting downlinks as hex text events
    pub const fn hex_events() -> Self {
        Self {
            receive_marker: "+EVT:",
            frame_layout: FrameLayout::HexLine {
                port_delimiter: b':',
                terminator: b'\r',
                line_breaks: 1,
            },
            unconfirmed_send: "+SEND=",
            confirmed_send: "+CSEND=",
            payload_encoding: PayloadEncoding::HexArgument,
            send_confirmation: Some("+ACK\r"),
            ..Self::arduino()
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::arduino()
    }
}
