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
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::LockError;
use crate::threshold::Threshold;

/// Non-volatile home of the RSSI threshold. Implementations store the raw
/// value; validation happens in [`load_threshold`].
pub trait CalibrationStore: Send {
    fn load(&self) -> Result<i32, LockError>;

    fn save(&mut self, value: i32) -> Result<(), LockError>;
}

/// Reads the persisted threshold, substituting `fallback` when the store is
/// empty, unreadable or holds a value outside the persisted range.
pub fn load_threshold(store: &dyn CalibrationStore, fallback: Threshold) -> Threshold {
    match store.load() {
        Ok(raw) if Threshold::is_valid(raw) => Threshold::new(raw),
        Ok(raw) => {
            info!("Stored RSSI threshold {} is out of range, using {}.", raw, fallback);
            fallback
        }
        Err(e) => {
            info!("No usable stored RSSI threshold ({}), using {}.", e, fallback);
            fallback
        }
    }
}

/// On-disk layout of [`FileCalibrationStore`].
#[derive(Serialize, Deserialize)]
struct JsonData {
    rssi_threshold: i32,
}

/// Keeps the threshold in a small JSON document on the local filesystem.
pub struct FileCalibrationStore {
    path: PathBuf,
}

impl FileCalibrationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCalibrationStore { path: path.into() }
    }
}

impl CalibrationStore for FileCalibrationStore {
    fn load(&self) -> Result<i32, LockError> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|err| LockError::Storage(format!("{}: {}", self.path.display(), err)))?;
        let data: JsonData = serde_json::from_str(&contents)
            .map_err(|err| LockError::Storage(format!("{}: {}", self.path.display(), err)))?;

        Ok(data.rssi_threshold)
    }

    fn save(&mut self, value: i32) -> Result<(), LockError> {
        let contents = serde_json::to_string(&JsonData { rssi_threshold: value })
            .map_err(|err| LockError::Storage(err.to_string()))?;
        // Write to a sibling file first so a crash never leaves half a document.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, contents)
            .and_then(|_| fs::rename(&staging, &self.path))
            .map_err(|err| LockError::Storage(format!("{}: {}", self.path.display(), err)))
    }
}

/// Volatile store, shared between clones. Used by the emulator and tests.
#[derive(Clone, Default)]
pub struct MemoryCalibrationStore {
    value: Arc<Mutex<Option<i32>>>,
}

impl MemoryCalibrationStore {
    pub fn new(initial: Option<i32>) -> Self {
        MemoryCalibrationStore { value: Arc::new(Mutex::new(initial)) }
    }
}

impl CalibrationStore for MemoryCalibrationStore {
    fn load(&self) -> Result<i32, LockError> {
        let value = self.value.lock().map_err(|err| LockError::Storage(err.to_string()))?;
        value.ok_or_else(|| LockError::Storage(String::from("uninitialized")))
    }

    fn save(&mut self, value: i32) -> Result<(), LockError> {
        let mut slot = self.value.lock().map_err(|err| LockError::Storage(err.to_string()))?;
        *slot = Some(value);
        Ok(())
    }
}
