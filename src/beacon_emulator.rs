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

use std::thread::{self, sleep, JoinHandle};
use std::time::Duration;

use log::info;

use crate::ble_scan_provider::{BleScanCallback, ScanResult};

/// What the mock scanner reports during one scan window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScanStep {
    /// The beacon advertised with this RSSI.
    Seen(i8),
    /// The beacon was not heard.
    Missed,
}

/// A user who walks up to the desk, sits for a while, leaves, and takes the
/// beacon out of radio range.
pub fn walk_away_script() -> Vec<ScanStep> {
    let mut script = Vec::new();
    script.extend([-80, -75, -68, -62].map(ScanStep::Seen));
    script.extend([-52, -55, -50, -58, -54, -61, -53, -56].map(ScanStep::Seen));
    script.extend([-63, -67, -72, -78, -84, -90].map(ScanStep::Seen));
    script.extend(std::iter::repeat(ScanStep::Missed).take(120));
    script
}

/// Starts a mock BLE scanner thread that replays `script`, one step per
/// `interval`, into `callback`.
pub fn start_scan(
    callback: BleScanCallback,
    script: Vec<ScanStep>,
    interval: Duration,
) -> JoinHandle<()> {
    info!("Mock BLE scanner starts");
    thread::spawn(move || {
        let target = callback.target();
        for step in script {
            sleep(interval);
            if let ScanStep::Seen(rssi) = step {
                info!("BLE scanner received advertisement from {} at {} dBm.", target, rssi);
                callback.on_scan_result(ScanResult::new(target, rssi));
            }
        }
        info!("Mock BLE scanner finished its script");
    })
}
