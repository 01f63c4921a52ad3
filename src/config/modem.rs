use core::time::Duration;

/// Frequency plan, numbered as the modem expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Band {
    /// Asia 923 MHz
    AS923 = 0,
    /// Australia 915 MHz
    AU915 = 1,
    /// Europe 868 MHz
    EU868 = 5,
    /// Korea 920 MHz
    KR920 = 6,
    /// India 865 MHz
    IN865 = 7,
    /// US 915 MHz
    US915 = 8,
    /// US 915 MHz, hybrid sub-band
    US915Hybrid = 9,
}

/// RF output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RfMode {
    /// RFO pin
    Rfo = 0,
    /// PA_BOOST pin
    PaBoost = 1,
}

/// Activation method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum JoinMode {
    /// Activation by personalization
    Abp = 0,
    /// Over-the-air activation
    Otaa = 1,
}

/// LoRaWAN device class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    /// Class A: Uplink followed by two receive windows
    A,
    /// Class B: Scheduled receive slots (beaconing)
    B,
    /// Class C: Continuously listening except when transmitting
    C,
}

impl DeviceClass {
    /// Letter used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::A => "A",
            DeviceClass::B => "B",
            DeviceClass::C => "C",
        }
    }
}

/// Session time budgets and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemConfig {
    /// Wait for a plain command reply
    pub exchange_timeout: Duration,
    /// Wait for the join event
    pub join_timeout: Duration,
    /// Pause after a join before the modem accepts traffic
    pub join_settle: Duration,
    /// Wait for the second marker of a confirmed uplink
    pub confirm_timeout: Duration,
    /// Minimum time between keep-alive polls
    pub poll_interval: Duration,
    /// Wait used by each drain pass of `maintain`
    pub maintain_timeout: Duration,
    /// Total budget for the initial `AT` probe loop
    pub autobaud_timeout: Duration,
    /// Wait for a single `AT` probe reply
    pub autobaud_probe: Duration,
    /// Pause between and after `AT` probes
    pub autobaud_backoff: Duration,
    /// Wait for the modem to come back after `AT+REBOOT`
    pub reboot_timeout: Duration,
    /// Pause after the reboot event
    pub reboot_settle: Duration,
    /// Wait for `AT+MSIZE?` and `AT+NJS?` replies
    pub query_timeout: Duration,
    /// Budget for reading one value field after `+OK=`
    pub field_timeout: Duration,
    /// Budget for draining one receive frame
    pub frame_timeout: Duration,
    /// Accumulated reply length after which a wait gives up
    ///
    /// Capped at [`MAX_RESPONSE_LEN`](crate::at::matcher::MAX_RESPONSE_LEN);
    /// larger values behave like the cap.
    pub max_response_len: usize,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            exchange_timeout: Duration::from_secs(1),
            join_timeout: Duration::from_secs(60),
            join_settle: Duration::from_secs(1),
            confirm_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(300),
            maintain_timeout: Duration::from_millis(100),
            autobaud_timeout: Duration::from_secs(10),
            autobaud_probe: Duration::from_millis(200),
            autobaud_backoff: Duration::from_millis(100),
            reboot_timeout: Duration::from_secs(10),
            reboot_settle: Duration::from_secs(1),
            query_timeout: Duration::from_secs(2),
            field_timeout: Duration::from_secs(1),
            frame_timeout: Duration::from_secs(1),
            max_response_len: 256,
        }
    }
}

impl ModemConfig {
    /// Set the keep-alive poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the join timeout
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Set the plain exchange timeout
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }
}
