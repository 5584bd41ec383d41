//! Pure toggle state, independent of any document.

use crate::variant::Variant;

/// Where the toggle stands relative to the detected variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// Page shows its authored variant
    Original,
    /// Page shows the opposite variant
    Converted,
    /// No conversion engine at mount; terminal
    Disabled,
}

/// Detected/current variant pair and the transitions between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSession {
    detected: Variant,
    current: Variant,
    disabled: bool,
}

impl ToggleSession {
    /// Start in `Original` showing `detected`
    pub fn new(detected: Variant) -> Self {
        Self {
            detected,
            current: detected,
            disabled: false,
        }
    }

    /// Variant the page was authored in
    pub fn detected(&self) -> Variant {
        self.detected
    }

    /// Variant currently displayed
    pub fn current(&self) -> Variant {
        self.current
    }

    pub fn state(&self) -> ToggleState {
        if self.disabled {
            ToggleState::Disabled
        } else if self.current == self.detected {
            ToggleState::Original
        } else {
            ToggleState::Converted
        }
    }

    pub fn is_converted(&self) -> bool {
        self.state() == ToggleState::Converted
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enter the terminal `Disabled` state
    pub fn disable(&mut self) {
        self.current = self.detected;
        self.disabled = true;
    }

    /// Flip between the detected variant and its opposite.
    ///
    /// Returns the variant to display next, or `None` when disabled.
    pub fn toggle(&mut self) -> Option<Variant> {
        if self.disabled {
            return None;
        }
        self.current = if self.current == self.detected {
            self.detected.opposite()
        } else {
            self.detected
        };
        Some(self.current)
    }
}
