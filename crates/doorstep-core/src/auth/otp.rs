//! OTP input assembly and the resend cooldown.
//!
//! The 6-digit code is collected as six independent single-character cells
//! so the host UI can auto-advance on type, move back on backspace, and
//! distribute a pasted string. Both types are pure and synchronous; wall
//! clocks and key events belong to the caller.

/// Number of cells in a verification code.
pub const OTP_LENGTH: usize = 6;

/// Ticks (seconds) a resend stays disabled after a successful send.
pub const RESEND_COOLDOWN_TICKS: u32 = 60;

/// Six single-character cells plus a focus index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtpInput {
    cells: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Cell contents; `None` for an empty or out-of-range index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// Type a character into the focused cell.
    ///
    /// Digits overwrite the cell and advance focus, clamped at the last
    /// cell. Anything else is ignored.
    pub fn type_char(&mut self, input: char) {
        if !input.is_ascii_digit() {
            return;
        }
        self.cells[self.focus] = Some(input);
        if self.focus < OTP_LENGTH - 1 {
            self.focus += 1;
        }
    }

    /// Backspace: clear a filled cell in place, or move focus left from an
    /// empty one.
    pub fn backspace(&mut self) {
        if self.cells[self.focus].is_some() {
            self.cells[self.focus] = None;
        } else if self.focus > 0 {
            self.focus -= 1;
        }
    }

    /// Distribute pasted text from the focused cell.
    ///
    /// Non-digits are stripped, overflow past the last cell is discarded,
    /// and focus lands on the last cell that received a digit.
    pub fn paste(&mut self, text: &str) {
        let start = self.focus;
        let mut last_filled = None;
        for (offset, digit) in text.chars().filter(char::is_ascii_digit).enumerate() {
            let index = start + offset;
            if index >= OTP_LENGTH {
                break;
            }
            self.cells[index] = Some(digit);
            last_filled = Some(index);
        }
        if let Some(index) = last_filled {
            self.focus = index;
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The assembled code, only once every cell is filled. Partial codes
    /// never reach the transport.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.cells.iter().flatten().collect())
        } else {
            None
        }
    }
}

/// Local countdown gating the resend control.
///
/// Purely a UI affordance: reaching zero re-enables the control but says
/// nothing about the server-side rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCooldown {
    remaining: u32,
}

impl ResendCooldown {
    /// A cooldown already counting down, as on screen entry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: RESEND_COOLDOWN_TICKS,
        }
    }

    /// An expired cooldown; the resend control is enabled.
    #[must_use]
    pub const fn ready() -> Self {
        Self { remaining: 0 }
    }

    /// Cooldown state a given number of seconds after a resend.
    #[must_use]
    pub fn from_elapsed(elapsed_secs: u64) -> Self {
        let elapsed = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
        Self {
            remaining: RESEND_COOLDOWN_TICKS.saturating_sub(elapsed),
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// One-second tick; never goes below zero.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Reset to the full interval after every successful resend.
    pub fn restart(&mut self) {
        self.remaining = RESEND_COOLDOWN_TICKS;
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new()
    }
}
