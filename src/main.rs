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

//! Runs the engine against a scripted beacon and logging outputs.
//! Usage: `proximity_lock [options.json]`.

use std::process::ExitCode;
use std::thread::sleep;

use log::error;

use proximity_lock::beacon_emulator::{self, walk_away_script};
use proximity_lock::calibration_store::FileCalibrationStore;
use proximity_lock::error::LockError;
use proximity_lock::options::EngineOptions;
use proximity_lock::output_emulator::{LogIndicator, LogKeyboard};
use proximity_lock::ProximityLock;

fn run() -> Result<(), LockError> {
    let options = match std::env::args().nth(1) {
        Some(path) => EngineOptions::from_file(path)?,
        None => EngineOptions::default(),
    };
    let ProximityLock { mut engine, ble_scan_callback, input_provider } = ProximityLock::new(
        &options,
        Box::new(FileCalibrationStore::new(&options.threshold_store_path)),
        Box::<LogIndicator>::default(),
        Box::new(LogKeyboard),
    )?;

    let period = options.cycle_period();
    let engine_thread = std::thread::spawn(move || engine.run());
    let scanner = beacon_emulator::start_scan(ble_scan_callback, walk_away_script(), period);

    // Calibrate once while the user sits at the desk.
    sleep(period * 8);
    input_provider.decrease();
    input_provider.increase();

    if scanner.join().is_err() {
        error!("Mock BLE scanner panicked.");
    }
    input_provider.stop();
    engine_thread
        .join()
        .map_err(|_| LockError::System(String::from("engine thread panicked")))?
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
