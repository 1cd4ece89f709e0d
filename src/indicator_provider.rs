// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::LockError;
use crate::presence_utils::PresenceState;

/// Logical colors of the status LED.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorColor {
    /// Beacon confirmed near (green).
    Positive,
    /// Beacon confirmed far (red).
    Alert,
    /// Beacon offline, LED dark.
    Neutral,
}

impl From<PresenceState> for IndicatorColor {
    fn from(state: PresenceState) -> Self {
        match state {
            PresenceState::Near => IndicatorColor::Positive,
            PresenceState::Far => IndicatorColor::Alert,
            PresenceState::Offline => IndicatorColor::Neutral,
        }
    }
}

/// Renders the presence state. Called once per cycle, so implementations
/// must be idempotent and must not block.
pub trait IndicatorDriver: Send {
    fn set_color(&mut self, color: IndicatorColor) -> Result<(), LockError>;
}
