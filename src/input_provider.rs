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

use log::{debug, error};
use tokio::sync::mpsc;

const INPUT_EVENT_CHANNEL_BUF_SIZE: usize = 16;

/// A debounced button press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CalibrationEvent {
    /// Raise the threshold, so Near needs a stronger signal.
    Increase,
    /// Lower the threshold, so Near is reached from farther away.
    Decrease,
}

/// Events delivered to the engine between cycles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Calibration(CalibrationEvent),
    Stop,
}

pub fn input_channel() -> (InputProvider, mpsc::Receiver<InputEvent>) {
    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(INPUT_EVENT_CHANNEL_BUF_SIZE);
    (InputProvider { input_event_tx: input_tx }, input_rx)
}

/// Button driver and host side of the engine. Never blocks, so it is safe
/// to call from interrupt-like callbacks as well as from async code.
#[derive(Clone)]
pub struct InputProvider {
    input_event_tx: mpsc::Sender<InputEvent>,
}

impl InputProvider {
    pub fn increase(&self) {
        self.send(InputEvent::Calibration(CalibrationEvent::Increase));
    }

    pub fn decrease(&self) {
        self.send(InputEvent::Calibration(CalibrationEvent::Decrease));
    }

    pub fn stop(&self) {
        self.send(InputEvent::Stop);
    }

    fn send(&self, event: InputEvent) {
        if let Err(e) = self.input_event_tx.try_send(event) {
            error!("Input Provider failed to send {:?}: {}", event, e);
        } else {
            debug!("Input Provider sent {:?}.", event);
        }
    }
}
