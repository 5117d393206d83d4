//! Panel open/close state machine.
//!
//! ```text
//!  Closed --open()--> Opening --(settle)--> Open
//!    ^                                       |
//!    +---(settle)-- Closing <--close()-------+
//! ```
//!
//! `Opening` and `Closing` are animation states that always run to
//! completion. Calls that arrive mid-transition are not applied immediately:
//! the last one is remembered as the pending intent and applied once the
//! transition settles, if it disagrees with the state just reached.

use serde::{Deserialize, Serialize};

/// Panel lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl PanelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Closed => "closed",
            PanelState::Opening => "opening",
            PanelState::Open => "open",
            PanelState::Closing => "closing",
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, PanelState::Opening | PanelState::Closing)
    }

    /// Whether the panel is open or on its way there
    pub fn targets_open(&self) -> bool {
        matches!(self, PanelState::Opening | PanelState::Open)
    }
}

/// What a caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelIntent {
    Open,
    Close,
    Toggle,
}

/// A transition that has just begun; the caller runs its entry actions and
/// arranges for [`LifecycleController::settle`] after the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opening,
    Closing,
}

impl Transition {
    pub fn state(&self) -> PanelState {
        match self {
            Transition::Opening => PanelState::Opening,
            Transition::Closing => PanelState::Closing,
        }
    }
}

#[derive(Debug, Default)]
pub struct LifecycleController {
    state: PanelState,
    /// Resolved target (`true` = open) requested during a transition
    pending_open: Option<bool>,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.targets_open()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_open.is_some()
    }

    /// Apply an intent. Returns the transition that starts now, if any.
    pub fn request(&mut self, intent: PanelIntent) -> Option<Transition> {
        let want_open = match intent {
            PanelIntent::Open => true,
            PanelIntent::Close => false,
            // Judged against where the panel is heading
            PanelIntent::Toggle => !self.pending_open.unwrap_or(self.state.targets_open()),
        };

        if self.state.is_transitioning() {
            log::debug!(
                "[lifecycle] {:?} requested while {}; deferred",
                intent,
                self.state.as_str()
            );
            self.pending_open = Some(want_open);
            return None;
        }

        self.begin(want_open)
    }

    /// Finish the running transition. Returns the follow-up transition when
    /// a deferred request disagrees with the settled state.
    pub fn settle(&mut self) -> Option<Transition> {
        self.state = match self.state {
            PanelState::Opening => PanelState::Open,
            PanelState::Closing => PanelState::Closed,
            settled => settled,
        };

        let pending = self.pending_open.take()?;
        self.begin(pending)
    }

    /// Jump straight to `Closed` (teardown)
    pub fn reset(&mut self) {
        self.state = PanelState::Closed;
        self.pending_open = None;
    }

    fn begin(&mut self, want_open: bool) -> Option<Transition> {
        let transition = match (self.state, want_open) {
            (PanelState::Closed, true) => Transition::Opening,
            (PanelState::Open, false) => Transition::Closing,
            _ => return None,
        };
        self.state = transition.state();
        Some(transition)
    }
}
