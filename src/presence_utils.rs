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

use std::time::{Duration, Instant};

/// Number of consistent samples needed to move the hysteresis counter from
/// zero to a clamp bound.
pub const DEFAULT_HYSTERESIS: i32 = 2;
/// Consecutive empty cycles after which the beacon is considered offline.
pub const DEFAULT_STALENESS_CYCLES: u32 = 100;
/// Amount a single calibration press moves the threshold.
pub const DEFAULT_CALIBRATION_STEP: i32 = 5;
/// Pacing of the control loop.
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(100);
/// Beacon tracked when no address is configured.
pub const DEFAULT_TARGET_ADDRESS: &str = "de:39:e5:a9:1e:49";

/// Presence of the tracked beacon in terms of actionability.
#[derive(Debug, Default, Eq, Hash, Copy, Clone, PartialEq)]
pub enum PresenceState {
    /// Signal at or above the threshold for long enough.
    Near,
    /// Signal below the threshold for long enough.
    Far,
    /// No sample for the staleness limit, or nothing confirmed yet.
    #[default]
    Offline,
}

/// A single RSSI reading of the tracked beacon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignalSample {
    /// Received signal strength in dBm.
    pub rssi: i8,
    /// Monotonic time the advertisement was observed.
    pub observed_at: Instant,
}

impl SignalSample {
    /// Builds a sample observed now.
    pub fn new(rssi: i8) -> Self {
        SignalSample { rssi, observed_at: Instant::now() }
    }
}
