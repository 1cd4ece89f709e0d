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

use std::time::Duration;

use log::{error, info};
use tokio::runtime::Builder;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{self, MissedTickBehavior};

use crate::action_dispatcher::{TransitionActionDispatcher, TransitionEffects};
use crate::ble_scan_provider::SampleReceiver;
use crate::calibration_controller::CalibrationController;
use crate::error::LockError;
use crate::hid_provider::LockCommandSink;
use crate::indicator_provider::IndicatorDriver;
use crate::input_provider::InputEvent;
use crate::presence_classifier::{ClassifierOptions, PresenceClassifier};
use crate::presence_utils::PresenceState;

/// Result of a single control cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed { presence: PresenceState, effects: TransitionEffects },
    Stopped,
}

/// The control loop: calibration input, then sample, then classification,
/// then dispatch, once per cycle period.
pub struct Engine {
    // Receive events from the input Provider.
    input_rx: mpsc::Receiver<InputEvent>,
    sample_rx: SampleReceiver,
    classifier: PresenceClassifier,
    dispatcher: TransitionActionDispatcher,
    calibration: CalibrationController,
    indicator: Box<dyn IndicatorDriver>,
    lock_sink: Box<dyn LockCommandSink>,
    cycle_period: Duration,
}

impl Engine {
    pub fn new(
        input_rx: mpsc::Receiver<InputEvent>,
        sample_rx: SampleReceiver,
        classifier_options: ClassifierOptions,
        calibration: CalibrationController,
        indicator: Box<dyn IndicatorDriver>,
        lock_sink: Box<dyn LockCommandSink>,
        cycle_period: Duration,
    ) -> Self {
        Self {
            input_rx,
            sample_rx,
            classifier: PresenceClassifier::new(classifier_options, calibration.threshold()),
            dispatcher: TransitionActionDispatcher::new(),
            calibration,
            indicator,
            lock_sink,
            cycle_period,
        }
    }

    /// Blocks the calling thread until a stop event arrives.
    pub fn run(&mut self) -> Result<(), LockError> {
        info!("Run proximity lock engine.");
        Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|err| LockError::System(err.to_string()))?
            .block_on(self.poll_cycles());
        Ok(())
    }

    /// Runs cycles at a fixed cadence until stopped.
    pub async fn poll_cycles(&mut self) {
        let mut ticker = time::interval(self.cycle_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.run_cycle() == CycleOutcome::Stopped {
                info!("Engine stopped");
                break;
            }
        }
    }

    /// Runs one cycle without waiting on anything.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if !self.process_input_events() {
            return CycleOutcome::Stopped;
        }
        let sample = self.sample_rx.poll();
        let presence = self.classifier.on_cycle(sample);
        let effects =
            self.dispatcher.dispatch(presence, self.indicator.as_mut(), self.lock_sink.as_mut());
        CycleOutcome::Completed { presence, effects }
    }

    pub fn classifier(&self) -> &PresenceClassifier {
        &self.classifier
    }

    // Returns false once the engine should stop.
    fn process_input_events(&mut self) -> bool {
        loop {
            match self.input_rx.try_recv() {
                Ok(InputEvent::Calibration(event)) => {
                    match self.calibration.handle(event, self.lock_sink.as_mut()) {
                        Ok(threshold) => self.classifier.set_threshold(threshold),
                        Err(e) => error!("Calibration {:?} not applied: {}", event, e),
                    }
                }
                Ok(InputEvent::Stop) => return false,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    info!("All input Providers are gone.");
                    return false;
                }
            }
        }
    }
}
