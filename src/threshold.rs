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

use std::fmt;

/// Lowest threshold accepted from storage.
pub const MIN_PERSISTED_THRESHOLD: i32 = -127;
/// Highest threshold accepted from storage.
pub const MAX_PERSISTED_THRESHOLD: i32 = 0;

/// RSSI boundary between Near and Far, in dBm.
///
/// Runtime calibration may move the value anywhere; only values coming back
/// from storage are checked against
/// [`MIN_PERSISTED_THRESHOLD`]..=[`MAX_PERSISTED_THRESHOLD`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(i32);

impl Threshold {
    /// Threshold used when storage holds nothing usable.
    pub const DEFAULT: Threshold = Threshold(-60);

    /// Wraps a raw value without validation.
    pub const fn new(value: i32) -> Self {
        Threshold(value)
    }

    /// Raw dBm value.
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Whether `raw` may have been written by a healthy store.
    pub fn is_valid(raw: i32) -> bool {
        (MIN_PERSISTED_THRESHOLD..=MAX_PERSISTED_THRESHOLD).contains(&raw)
    }

    /// Interprets a value read from storage, substituting `fallback` for
    /// corrupt or uninitialized contents.
    pub fn from_persisted(raw: i32, fallback: Threshold) -> Self {
        if Self::is_valid(raw) {
            Threshold(raw)
        } else {
            fallback
        }
    }

    /// Returns the threshold moved by `delta` dBm.
    pub fn offset(&self, delta: i32) -> Self {
        Threshold(self.0.saturating_add(delta))
    }

    /// Whether `rssi` counts as evidence that the beacon is near.
    pub fn is_near(&self, rssi: i8) -> bool {
        i32::from(rssi) >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_persisted_accepts_every_valid_value() {
        for raw in MIN_PERSISTED_THRESHOLD..=MAX_PERSISTED_THRESHOLD {
            assert_eq!(Threshold::from_persisted(raw, Threshold::DEFAULT).value(), raw);
        }
    }

    #[test]
    fn from_persisted_rejects_values_outside_range() {
        let corrupt = (i8::MIN as i32..=i8::MAX as i32)
            .filter(|raw| !Threshold::is_valid(*raw))
            .chain([i32::MIN, -128, 1, 255, 0xFFFF, i32::MAX]);
        for raw in corrupt {
            assert_eq!(Threshold::from_persisted(raw, Threshold::DEFAULT), Threshold::DEFAULT);
        }
    }

    #[test]
    fn offset_is_unclamped_at_runtime() {
        let threshold = Threshold::new(-125).offset(-5);
        assert_eq!(threshold.value(), -130);
        assert!(!Threshold::is_valid(threshold.value()));
        assert_eq!(Threshold::new(0).offset(5).value(), 5);
        assert_eq!(Threshold::new(i32::MAX).offset(5).value(), i32::MAX);
    }

    #[test]
    fn is_near_includes_threshold() {
        let threshold = Threshold::DEFAULT;
        assert!(threshold.is_near(-60));
        assert!(threshold.is_near(-10));
        assert!(!threshold.is_near(-61));
        assert!(!Threshold::new(200).is_near(i8::MAX));
    }
}
