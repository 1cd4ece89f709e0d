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

use log::debug;

use crate::presence_utils::{
    PresenceState, SignalSample, DEFAULT_HYSTERESIS, DEFAULT_STALENESS_CYCLES,
};
use crate::threshold::Threshold;

/// Tuning of the presence classifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Clamp bound `H` of the hysteresis counter. Must be at least 1.
    pub hysteresis: i32,
    /// Empty cycles tolerated before forcing `Offline`. Must be at least 1.
    pub staleness_cycles: u32,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        ClassifierOptions {
            hysteresis: DEFAULT_HYSTERESIS,
            staleness_cycles: DEFAULT_STALENESS_CYCLES,
        }
    }
}

/// Everything the classifier remembers between cycles.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ClassifierState {
    pub presence: PresenceState,
    /// Always within `[-H, +H]`.
    pub hysteresis_counter: i32,
    /// Consecutive cycles without a sample.
    pub stale_cycles: u32,
}

/// Advances the classifier by one cycle.
///
/// A sample moves the hysteresis counter one step towards Near or Far; the
/// presence only flips once the counter sits on a clamp bound. A missing
/// sample ages the state, and once `staleness_cycles` empty cycles have
/// accumulated the beacon is forced `Offline` with the counter parked on the
/// Far bound, so that Near has to be re-earned through the full hysteresis.
pub fn next_classifier_state(
    state: ClassifierState,
    sample: Option<SignalSample>,
    threshold: Threshold,
    options: ClassifierOptions,
) -> ClassifierState {
    let bound = options.hysteresis;
    let mut next = state;
    match sample {
        Some(sample) => {
            next.stale_cycles = 0;
            if threshold.is_near(sample.rssi) {
                next.hysteresis_counter = (state.hysteresis_counter + 1).min(bound);
                if next.hysteresis_counter == bound {
                    next.presence = PresenceState::Near;
                }
            } else {
                next.hysteresis_counter = (state.hysteresis_counter - 1).max(-bound);
                if next.hysteresis_counter == -bound {
                    next.presence = PresenceState::Far;
                }
            }
        }
        None => {
            next.stale_cycles = state.stale_cycles.saturating_add(1);
            if next.stale_cycles >= options.staleness_cycles {
                next.presence = PresenceState::Offline;
                next.hysteresis_counter = -bound;
            }
        }
    }
    next
}

/// Stateful wrapper around [`next_classifier_state`] holding the runtime
/// threshold.
pub struct PresenceClassifier {
    state: ClassifierState,
    threshold: Threshold,
    options: ClassifierOptions,
}

impl PresenceClassifier {
    pub fn new(options: ClassifierOptions, threshold: Threshold) -> Self {
        PresenceClassifier { state: ClassifierState::default(), threshold, options }
    }

    /// Runs one classification cycle with the freshest sample, if any.
    pub fn on_cycle(&mut self, sample: Option<SignalSample>) -> PresenceState {
        self.state = next_classifier_state(self.state, sample, self.threshold, self.options);
        if let Some(sample) = sample {
            debug!(
                "RSSI: {} | State: {:?} | Counter: {} | Stale: {}",
                sample.rssi,
                self.state.presence,
                self.state.hysteresis_counter,
                self.state.stale_cycles
            );
        }
        self.state.presence
    }

    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn presence(&self) -> PresenceState {
        self.state.presence
    }
}
