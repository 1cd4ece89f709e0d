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

#![cfg_attr(
    not(test),
    deny(clippy::indexing_slicing, clippy::unwrap_used, clippy::panic, clippy::expect_used)
)]

//! Tracks the RSSI of one BLE beacon, classifies it as Near, Far or Offline,
//! and sends the desktop lock shortcut when the beacon walks away.

pub mod action_dispatcher;
pub mod beacon_address;
pub mod beacon_emulator;
pub mod ble_scan_provider;
pub mod calibration_controller;
pub mod calibration_store;
pub mod engine;
pub mod error;
pub mod hid_provider;
pub mod indicator_provider;
pub mod input_provider;
pub mod options;
pub mod output_emulator;
pub mod presence_classifier;
pub mod presence_utils;
pub mod threshold;


use log::info;

use crate::ble_scan_provider::{sample_channel, BleScanCallback};
use crate::calibration_controller::CalibrationController;
use crate::calibration_store::CalibrationStore;
use crate::engine::Engine;
use crate::error::LockError;
use crate::hid_provider::LockCommandSink;
use crate::indicator_provider::IndicatorDriver;
use crate::input_provider::{input_channel, InputProvider};
use crate::options::EngineOptions;

/// The engine plus the handles its collaborators use to feed it.
pub struct ProximityLock {
    pub engine: Engine,
    pub ble_scan_callback: BleScanCallback,
    pub input_provider: InputProvider,
}

impl ProximityLock {
    pub fn new(
        options: &EngineOptions,
        store: Box<dyn CalibrationStore>,
        indicator: Box<dyn IndicatorDriver>,
        lock_sink: Box<dyn LockCommandSink>,
    ) -> Result<Self, LockError> {
        options.validate()?;
        let target = options.target()?;
        info!("Tracking RSSI of {}", target);
        let (ble_scan_callback, sample_rx) = sample_channel(target);
        let (input_provider, input_rx) = input_channel();
        let calibration = CalibrationController::new(
            store,
            options.default_threshold(),
            options.calibration_step,
            options.echo_threshold,
        );
        Ok(Self {
            engine: Engine::new(
                input_rx,
                sample_rx,
                options.classifier_options(),
                calibration,
                indicator,
                lock_sink,
                options.cycle_period(),
            ),
            ble_scan_callback,
            input_provider,
        })
    }
}
