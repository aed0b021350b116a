//! Countdown state machine shared by every action button.
//!
//! A delayed trigger walks `Idle -> Counting(3) -> Counting(2) -> Counting(1)`
//! with one second between steps and fires on the tick after `Counting(1)`.
//! The machine only says what should happen next; scheduling the one-second
//! wait and performing the effect are the caller's job.

use std::time::Duration;

use crate::types::ActionKind;

pub const COUNTDOWN_START: u8 = 3;
pub const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Counting(u8),
}

/// What the caller should do after a trigger or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Deliver a countdown tick for this kind after the duration.
    Wait(Duration),
    /// Perform the action's effect now. The request is already back to Idle.
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequest {
    kind: ActionKind,
    state: ActionState,
}

impl ActionRequest {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, state: ActionState::Idle }
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// A trigger while counting is ignored; the running countdown fires once.
    pub fn trigger(&mut self, delay_enabled: bool) -> Option<Step> {
        match self.state {
            ActionState::Counting(_) => None,
            ActionState::Idle if delay_enabled => {
                self.state = ActionState::Counting(COUNTDOWN_START);
                Some(Step::Wait(COUNTDOWN_STEP))
            }
            ActionState::Idle => Some(Step::Fire),
        }
    }

    /// Countdown re-entry. Stale ticks on an idle request do nothing.
    pub fn tick(&mut self) -> Option<Step> {
        match self.state {
            ActionState::Idle => None,
            ActionState::Counting(n) if n <= 1 => {
                self.state = ActionState::Idle;
                Some(Step::Fire)
            }
            ActionState::Counting(n) => {
                self.state = ActionState::Counting(n - 1);
                Some(Step::Wait(COUNTDOWN_STEP))
            }
        }
    }

    pub fn label(&self) -> String {
        match self.state {
            ActionState::Idle => self.kind.resting_label().to_string(),
            ActionState::Counting(n) => format!("{} in {}", self.kind.countdown_verb(), n),
        }
    }
}

/// One request per [`ActionKind`], alive for the whole session.
#[derive(Debug, Clone)]
pub struct ActionScheduler {
    requests: [ActionRequest; 9],
}

impl Default for ActionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self { requests: ActionKind::ALL.map(ActionRequest::new) }
    }

    pub fn trigger(&mut self, kind: ActionKind, delay_enabled: bool) -> Option<Step> {
        self.requests[kind.index()].trigger(delay_enabled)
    }

    pub fn tick(&mut self, kind: ActionKind) -> Option<Step> {
        self.requests[kind.index()].tick()
    }

    pub fn state(&self, kind: ActionKind) -> ActionState {
        self.requests[kind.index()].state()
    }

    pub fn label(&self, kind: ActionKind) -> String {
        self.requests[kind.index()].label()
    }

    pub fn requests(&self) -> &[ActionRequest] {
        &self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_trigger_counts_down_then_fires_once() {
        let mut r = ActionRequest::new(ActionKind::CopyXY);
        assert_eq!(r.label(), "Copy XY");

        assert_eq!(r.trigger(true), Some(Step::Wait(COUNTDOWN_STEP)));
        assert_eq!(r.state(), ActionState::Counting(3));
        assert_eq!(r.label(), "Copy in 3");

        assert_eq!(r.tick(), Some(Step::Wait(COUNTDOWN_STEP)));
        assert_eq!(r.label(), "Copy in 2");

        assert_eq!(r.tick(), Some(Step::Wait(COUNTDOWN_STEP)));
        assert_eq!(r.label(), "Copy in 1");

        assert_eq!(r.tick(), Some(Step::Fire));
        assert_eq!(r.state(), ActionState::Idle);
        assert_eq!(r.label(), "Copy XY");

        assert_eq!(r.tick(), None);
    }

    #[test]
    fn exactly_three_waits_per_trigger() {
        for kind in ActionKind::ALL {
            let mut r = ActionRequest::new(kind);
            let mut waits = 0;
            let mut step = r.trigger(true);
            while let Some(Step::Wait(d)) = step {
                assert_eq!(d, Duration::from_secs(1));
                waits += 1;
                step = r.tick();
            }
            assert_eq!(step, Some(Step::Fire), "{kind:?}");
            assert_eq!(waits, 3, "{kind:?}");
        }
    }

    #[test]
    fn undelayed_trigger_fires_immediately() {
        let mut r = ActionRequest::new(ActionKind::LogAll);
        assert_eq!(r.trigger(false), Some(Step::Fire));
        assert_eq!(r.state(), ActionState::Idle);
        assert_eq!(r.label(), "Log All");
    }

    #[test]
    fn retrigger_while_counting_is_ignored() {
        let mut r = ActionRequest::new(ActionKind::SetOrigin);
        r.trigger(true);
        r.tick();
        assert_eq!(r.trigger(true), None);
        assert_eq!(r.trigger(false), None);
        assert_eq!(r.label(), "Setting in 2");
        r.tick();
        assert_eq!(r.tick(), Some(Step::Fire));
    }

    #[test]
    fn countdown_labels_per_kind() {
        let mut s = ActionScheduler::new();
        s.trigger(ActionKind::LogRGBHex, true);
        s.trigger(ActionKind::SetOrigin, true);
        assert_eq!(s.label(ActionKind::LogRGBHex), "Log in 3");
        assert_eq!(s.label(ActionKind::SetOrigin), "Setting in 3");
        assert_eq!(s.label(ActionKind::CopyRGBHex), "Copy RGB Hex");
        assert_eq!(s.state(ActionKind::CopyRGBHex), ActionState::Idle);
    }

    #[test]
    fn kinds_are_independent() {
        let mut s = ActionScheduler::new();
        s.trigger(ActionKind::CopyRGB, true);
        assert_eq!(s.trigger(ActionKind::LogRGB, false), Some(Step::Fire));
        assert_eq!(s.state(ActionKind::CopyRGB), ActionState::Counting(3));
        assert_eq!(s.tick(ActionKind::LogRGB), None);
        assert_eq!(s.requests().len(), ActionKind::ALL.len());
    }
}
