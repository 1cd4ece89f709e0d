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

use std::sync::Arc;
use std::time::Instant;

use log::trace;
use tokio::sync::watch;

use crate::beacon_address::BeaconAddress;
use crate::presence_utils::SignalSample;

/// An advertisement reported by the platform scanner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub address: BeaconAddress,
    pub rssi: i8,
    pub observed_at: Instant,
}

impl ScanResult {
    pub fn new(address: BeaconAddress, rssi: i8) -> Self {
        Self { address, rssi, observed_at: Instant::now() }
    }
}

/// Creates the single-slot sample channel between the scanner and the engine.
pub fn sample_channel(target: BeaconAddress) -> (BleScanCallback, SampleReceiver) {
    let (sample_tx, sample_rx) = watch::channel::<Option<SignalSample>>(None);
    (BleScanCallback { target, sample_tx: Arc::new(sample_tx) }, SampleReceiver { sample_rx })
}

/// Handed to the platform scanner, which may call it from any thread.
/// Only advertisements from the target beacon are kept, and a newer sample
/// overwrites one the engine has not consumed yet.
#[derive(Clone)]
pub struct BleScanCallback {
    target: BeaconAddress,
    sample_tx: Arc<watch::Sender<Option<SignalSample>>>,
}

impl BleScanCallback {
    pub fn on_scan_result(&self, result: ScanResult) {
        if result.address != self.target {
            return;
        }
        trace!("BLE scan callback stored RSSI {}.", result.rssi);
        // send_replace succeeds even after the engine is gone.
        self.sample_tx.send_replace(Some(SignalSample {
            rssi: result.rssi,
            observed_at: result.observed_at,
        }));
    }

    pub fn target(&self) -> BeaconAddress {
        self.target
    }
}

/// Engine side of the sample channel.
pub struct SampleReceiver {
    sample_rx: watch::Receiver<Option<SignalSample>>,
}

impl SampleReceiver {
    /// Takes the freshest sample stored since the previous poll, without
    /// waiting.
    pub fn poll(&mut self) -> Option<SignalSample> {
        match self.sample_rx.has_changed() {
            Ok(true) => *self.sample_rx.borrow_and_update(),
            // No new sample, or every callback dropped.
            Ok(false) | Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: BeaconAddress = BeaconAddress::new([0xde, 0x39, 0xe5, 0xa9, 0x1e, 0x49]);
    const OTHER: BeaconAddress = BeaconAddress::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);

    #[test]
    fn poll_is_empty_before_any_scan_result() {
        let (_callback, mut receiver) = sample_channel(TARGET);
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn poll_consumes_sample_once() {
        let (callback, mut receiver) = sample_channel(TARGET);
        callback.on_scan_result(ScanResult::new(TARGET, -50));
        assert_eq!(receiver.poll().map(|sample| sample.rssi), Some(-50));
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn latest_sample_wins() {
        let (callback, mut receiver) = sample_channel(TARGET);
        callback.on_scan_result(ScanResult::new(TARGET, -50));
        callback.on_scan_result(ScanResult::new(TARGET, -80));
        assert_eq!(receiver.poll().map(|sample| sample.rssi), Some(-80));
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn other_devices_are_ignored() {
        let (callback, mut receiver) = sample_channel(TARGET);
        callback.on_scan_result(ScanResult::new(OTHER, -30));
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn callback_works_from_another_thread() {
        let (callback, mut receiver) = sample_channel(TARGET);
        let scanner_callback = callback.clone();
        std::thread::spawn(move || scanner_callback.on_scan_result(ScanResult::new(TARGET, -42)))
            .join()
            .unwrap();
        assert_eq!(receiver.poll().map(|sample| sample.rssi), Some(-42));
        assert_eq!(callback.target(), TARGET);
    }
}
