//! Account control state
//!
//! The `userAccountControl` attribute is a bitmask; the two values the
//! engine writes are directory-specific magic numbers, kept as named
//! constants rather than re-derived per call.

/// NORMAL_ACCOUNT flag (0x0200).
pub const NORMAL_ACCOUNT: u32 = 0x0200;

/// ACCOUNTDISABLE flag (0x0002).
pub const ACCOUNT_DISABLE: u32 = 0x0002;

/// Canonical `userAccountControl` for an enabled account: 512.
pub const ACCOUNT_ENABLED: u32 = NORMAL_ACCOUNT;

/// Canonical `userAccountControl` for a disabled account: 514.
pub const ACCOUNT_DISABLED: u32 = NORMAL_ACCOUNT | ACCOUNT_DISABLE;

/// Enabled/disabled state of a directory account.
///
/// Both states are initial (an account is discovered already in one or the
/// other) and terminal; the only transitions are the ones
/// `set_account_state` performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Enabled,
    Disabled,
}

impl AccountState {
    /// The canonical wire value for this state.
    ///
    /// Writing this value overwrites the whole bitmask; any other flags
    /// already set on the entry (e.g. DONT_EXPIRE_PASSWORD) are discarded.
    /// Known limitation, kept from the tool this replaces.
    #[must_use]
    pub fn to_control(self) -> u32 {
        match self {
            AccountState::Enabled => ACCOUNT_ENABLED,
            AccountState::Disabled => ACCOUNT_DISABLED,
        }
    }

    /// Decode a `userAccountControl` value.
    ///
    /// Disabled iff the ACCOUNTDISABLE bit is set. Real directory values
    /// carry additional flags; those are ignored here, never assumed to be
    /// absent.
    #[must_use]
    pub fn from_control(value: u32) -> Self {
        if value & ACCOUNT_DISABLE != 0 {
            AccountState::Disabled
        } else {
            AccountState::Enabled
        }
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountState::Enabled => write!(f, "enabled"),
            AccountState::Disabled => write!(f, "disabled"),
        }
    }
}
