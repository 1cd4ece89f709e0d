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

use log::info;

use crate::error::LockError;
use crate::hid_provider::{LockCommandSink, LOCK_SHORTCUT};
use crate::indicator_provider::{IndicatorColor, IndicatorDriver};

/// Indicator that logs color changes instead of driving an LED.
#[derive(Default)]
pub struct LogIndicator {
    shown: Option<IndicatorColor>,
}

impl IndicatorDriver for LogIndicator {
    fn set_color(&mut self, color: IndicatorColor) -> Result<(), LockError> {
        if self.shown != Some(color) {
            info!("LED shows {:?}.", color);
            self.shown = Some(color);
        }
        Ok(())
    }
}

/// Keyboard that logs keystrokes instead of sending HID reports.
#[derive(Default)]
pub struct LogKeyboard;

impl LockCommandSink for LogKeyboard {
    fn send_lock_shortcut(&mut self) -> Result<(), LockError> {
        info!("Keyboard presses {}.", LOCK_SHORTCUT);
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), LockError> {
        info!("Keyboard types {:?}.", text);
        Ok(())
    }
}
