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

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::beacon_address::BeaconAddress;
use crate::error::LockError;
use crate::presence_classifier::ClassifierOptions;
use crate::presence_utils::*;
use crate::threshold::Threshold;

const DEFAULT_THRESHOLD_STORE_PATH: &str = "rssi_threshold.json";

/// Engine configuration, parsed from JSON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineOptions {
    pub target_address: String,
    pub hysteresis: i32,
    pub staleness_cycles: u32,
    pub default_threshold: i32,
    pub calibration_step: i32,
    pub cycle_period_millis: u64,
    /// Type the new threshold after each calibration press.
    pub echo_threshold: bool,
    pub threshold_store_path: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            target_address: String::from(DEFAULT_TARGET_ADDRESS),
            hysteresis: DEFAULT_HYSTERESIS,
            staleness_cycles: DEFAULT_STALENESS_CYCLES,
            default_threshold: Threshold::DEFAULT.value(),
            calibration_step: DEFAULT_CALIBRATION_STEP,
            cycle_period_millis: DEFAULT_CYCLE_PERIOD.as_millis() as u64,
            echo_threshold: true,
            threshold_store_path: PathBuf::from(DEFAULT_THRESHOLD_STORE_PATH),
        }
    }
}

impl EngineOptions {
    /// Reads and validates options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|err| LockError::InvalidOptions(format!("{}: {}", path.display(), err)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, LockError> {
        let options: EngineOptions = serde_json::from_str(contents)
            .map_err(|err| LockError::InvalidOptions(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), LockError> {
        self.target()?;
        if self.hysteresis < 1 {
            return Err(LockError::InvalidOptions(format!(
                "hysteresis must be at least 1, got {}",
                self.hysteresis
            )));
        }
        if self.staleness_cycles < 1 {
            return Err(LockError::InvalidOptions(String::from(
                "stalenessCycles must be at least 1",
            )));
        }
        if self.calibration_step < 1 {
            return Err(LockError::InvalidOptions(format!(
                "calibrationStep must be at least 1, got {}",
                self.calibration_step
            )));
        }
        if self.cycle_period_millis < 1 {
            return Err(LockError::InvalidOptions(String::from(
                "cyclePeriodMillis must be at least 1",
            )));
        }
        if !Threshold::is_valid(self.default_threshold) {
            return Err(LockError::InvalidOptions(format!(
                "defaultThreshold {} is outside [-127, 0]",
                self.default_threshold
            )));
        }
        Ok(())
    }

    pub fn target(&self) -> Result<BeaconAddress, LockError> {
        self.target_address.parse()
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            hysteresis: self.hysteresis,
            staleness_cycles: self.staleness_cycles,
        }
    }

    pub fn default_threshold(&self) -> Threshold {
        Threshold::new(self.default_threshold)
    }

    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_millis)
    }
}
