// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use log::{info, warn};

use crate::hid_provider::{LockCommandSink, LOCK_SHORTCUT};
use crate::indicator_provider::{IndicatorColor, IndicatorDriver};
use crate::presence_utils::PresenceState;

/// Side effects owed for one cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransitionEffects {
    /// Sent every cycle.
    pub indicator: IndicatorColor,
    /// Only set on a confirmed Near to Far departure.
    pub lock: bool,
}

/// Maps the previous and current presence to the effects of this cycle.
pub fn transition_effects(last: PresenceState, current: PresenceState) -> TransitionEffects {
    TransitionEffects {
        indicator: IndicatorColor::from(current),
        lock: last == PresenceState::Near && current == PresenceState::Far,
    }
}

/// Turns presence changes into lock commands and presence levels into
/// indicator colors.
pub struct TransitionActionDispatcher {
    last_state: PresenceState,
}

impl Default for TransitionActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionActionDispatcher {
    pub fn new() -> Self {
        TransitionActionDispatcher { last_state: PresenceState::Offline }
    }

    pub fn last_state(&self) -> PresenceState {
        self.last_state
    }

    /// Delivers this cycle's effects. Output failures are logged and
    /// dropped; a lost lock command is not replayed.
    pub fn dispatch(
        &mut self,
        current: PresenceState,
        indicator: &mut dyn IndicatorDriver,
        lock_sink: &mut dyn LockCommandSink,
    ) -> TransitionEffects {
        let effects = transition_effects(self.last_state, current);
        if current != self.last_state {
            info!("Presence {:?} -> {:?}", self.last_state, current);
        }
        if effects.lock {
            match lock_sink.send_lock_shortcut() {
                Ok(()) => info!("Beacon left, sent {}.", LOCK_SHORTCUT),
                Err(e) => warn!("Lock command lost: {}", e),
            }
        }
        if let Err(e) = indicator.set_color(effects.indicator) {
            warn!("Indicator update skipped: {}", e);
        }
        self.last_state = current;
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LockError;
    use crate::presence_utils::PresenceState::*;

    #[derive(Default)]
    struct Outputs {
        colors: Vec<IndicatorColor>,
        offline: bool,
    }

    impl IndicatorDriver for Outputs {
        fn set_color(&mut self, color: IndicatorColor) -> Result<(), LockError> {
            if self.offline {
                return Err(LockError::OutputUnavailable(String::from("led")));
            }
            self.colors.push(color);
            Ok(())
        }
    }

    struct Keyboard {
        locks: usize,
        offline: bool,
    }

    impl LockCommandSink for Keyboard {
        fn send_lock_shortcut(&mut self) -> Result<(), LockError> {
            if self.offline {
                return Err(LockError::OutputUnavailable(String::from("usb")));
            }
            self.locks += 1;
            Ok(())
        }

        fn type_text(&mut self, _text: &str) -> Result<(), LockError> {
            Ok(())
        }
    }

    fn run(states: &[PresenceState]) -> (Outputs, Keyboard) {
        let mut dispatcher = TransitionActionDispatcher::new();
        let mut outputs = Outputs::default();
        let mut keyboard = Keyboard { locks: 0, offline: false };
        for state in states {
            dispatcher.dispatch(*state, &mut outputs, &mut keyboard);
        }
        (outputs, keyboard)
    }

    #[test]
    fn lock_only_on_near_to_far() {
        let all = [Near, Far, Offline];
        for last in all {
            for current in all {
                let effects = transition_effects(last, current);
                assert_eq!(effects.lock, last == Near && current == Far, "{last:?} -> {current:?}");
                assert_eq!(effects.indicator, IndicatorColor::from(current));
            }
        }
    }

    #[test]
    fn indicator_follows_level_every_cycle() {
        let (outputs, _) = run(&[Offline, Near, Near, Far, Offline]);
        assert_eq!(
            outputs.colors,
            vec![
                IndicatorColor::Neutral,
                IndicatorColor::Positive,
                IndicatorColor::Positive,
                IndicatorColor::Alert,
                IndicatorColor::Neutral,
            ]
        );
    }

    #[test]
    fn lock_fires_once_per_departure() {
        let (_, keyboard) = run(&[Near, Near, Far, Far, Far, Near, Far, Offline, Far]);
        assert_eq!(keyboard.locks, 2);
    }

    #[test]
    fn no_lock_without_confirmed_presence() {
        let (_, keyboard) = run(&[Offline, Far, Far, Offline, Near, Offline, Far]);
        assert_eq!(keyboard.locks, 0);
    }

    #[test]
    fn failed_lock_is_not_retried() {
        let mut dispatcher = TransitionActionDispatcher::new();
        let mut outputs = Outputs::default();
        let mut keyboard = Keyboard { locks: 0, offline: true };
        dispatcher.dispatch(Near, &mut outputs, &mut keyboard);
        assert!(dispatcher.dispatch(Far, &mut outputs, &mut keyboard).lock);
        keyboard.offline = false;
        assert!(!dispatcher.dispatch(Far, &mut outputs, &mut keyboard).lock);
        assert_eq!(keyboard.locks, 0);
        assert_eq!(dispatcher.last_state(), Far);
    }

    #[test]
    fn indicator_failure_still_advances_state() {
        let mut dispatcher = TransitionActionDispatcher::new();
        let mut outputs = Outputs { offline: true, ..Default::default() };
        let mut keyboard = Keyboard { locks: 0, offline: false };
        dispatcher.dispatch(Near, &mut outputs, &mut keyboard);
        dispatcher.dispatch(Far, &mut outputs, &mut keyboard);
        assert!(outputs.colors.is_empty());
        assert_eq!(keyboard.locks, 1);
        assert_eq!(dispatcher.last_state(), Far);
    }
}
