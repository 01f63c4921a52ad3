//! Terminal patterns and match outcomes

/// Success marker. Matched without a line terminator so that `+OK=<value>`
/// replies resolve as soon as the prefix arrives.
pub const OK: &str = "+OK";
/// Prefix of a successful query reply; the value follows up to `\r`
pub const OK_VALUE: &str = "+OK=";
/// Generic failure
pub const ERROR: &str = "+ERR\r";
/// Invalid parameter
pub const ERROR_PARAM: &str = "+ERR_PARAM\r";
/// Modem busy
pub const ERROR_BUSY: &str = "+ERR_BUSY\r";
/// Parameter overflow
pub const ERROR_OVERFLOW: &str = "+ERR_PARAM_OVERFLOW\r";
/// Not joined to a network
pub const ERROR_NO_NETWORK: &str = "+ERR_NO_NETWORK\r";
/// Receive failure
pub const ERROR_RX: &str = "+ERR_RX\r";
/// Unclassified failure
pub const ERROR_UNKNOWN: &str = "+ERR_UNKNOWN\r";

/// Maximum number of candidate patterns in one wait
pub const MAX_PATTERNS: usize = 8;

/// All status markers in slot order. The slot index doubles as the
/// legacy numeric error code (negated).
pub const STATUS_PATTERNS: [&str; MAX_PATTERNS] = [
    OK,
    ERROR,
    ERROR_PARAM,
    ERROR_BUSY,
    ERROR_OVERFLOW,
    ERROR_NO_NETWORK,
    ERROR_RX,
    ERROR_UNKNOWN,
];

/// Ordered set of terminal patterns
///
/// Slots are checked in order and the first one that is a suffix of the
/// accumulated text wins, so more specific patterns must come first when
/// two of them can end the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSet<'a> {
    slots: [Option<&'a str>; MAX_PATTERNS],
}

impl<'a> PatternSet<'a> {
    /// Set with every slot unused
    pub const fn empty() -> Self {
        Self {
            slots: [None; MAX_PATTERNS],
        }
    }

    /// Fill slots from the front. Patterns past the eighth are ignored.
    pub fn from_patterns(patterns: &[&'a str]) -> Self {
        let mut set = Self::empty();
        for (slot, pattern) in set.slots.iter_mut().zip(patterns) {
            *slot = Some(*pattern);
        }
        set
    }

    /// OK followed by the generic error
    pub fn ok_error() -> Self {
        Self::from_patterns(&[OK, ERROR])
    }

    /// Every status marker
    pub fn status() -> PatternSet<'static> {
        PatternSet::from_patterns(&STATUS_PATTERNS)
    }

    /// Wait for `pattern`, with the generic error in slot 2
    pub fn expect(pattern: &'a str) -> Self {
        Self::from_patterns(&[pattern, ERROR])
    }

    /// Default set for a plain command exchange
    pub fn default_for(compatibility_mode: bool) -> PatternSet<'static> {
        if compatibility_mode {
            PatternSet::ok_error()
        } else {
            PatternSet::status()
        }
    }

    /// Replace a slot (1-based). Out-of-range slots are ignored.
    pub fn with(mut self, index: usize, pattern: Option<&'a str>) -> Self {
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.slots.get_mut(i)) {
            *slot = pattern;
        }
        self
    }

    /// Pattern at a 1-based slot
    pub fn get(&self, index: usize) -> Option<&'a str> {
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i).copied().flatten())
    }

    /// 1-based index of the first slot whose pattern ends `text`
    pub fn match_suffix(&self, text: &[u8]) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(p) if text.ends_with(p.as_bytes())))
            .map(|i| i + 1)
    }
}

/// Result of waiting for a terminal pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatchOutcome {
    /// 1-based slot index of the pattern that ended the wait
    Matched(usize),
    /// Deadline passed or the response outgrew the accumulation buffer
    NoMatch,
}

impl MatchOutcome {
    /// Matched slot index, if any
    pub fn index(self) -> Option<usize> {
        match self {
            MatchOutcome::Matched(index) => Some(index),
            MatchOutcome::NoMatch => None,
        }
    }

    /// Whether slot 1 matched
    pub fn is_ok(self) -> bool {
        self == MatchOutcome::Matched(1)
    }
}
