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

use log::{info, warn};

use crate::calibration_store::{load_threshold, CalibrationStore};
use crate::error::LockError;
use crate::hid_provider::LockCommandSink;
use crate::input_provider::CalibrationEvent;
use crate::threshold::Threshold;

/// Owns the runtime threshold and keeps the store in step with it.
pub struct CalibrationController {
    store: Box<dyn CalibrationStore>,
    threshold: Threshold,
    step: i32,
    echo: bool,
}

impl CalibrationController {
    /// Loads the persisted threshold, falling back to `default` when it is
    /// missing or corrupt. Nothing is written back until the first press.
    pub fn new(store: Box<dyn CalibrationStore>, default: Threshold, step: i32, echo: bool) -> Self {
        let threshold = load_threshold(store.as_ref(), default);
        info!("Loaded RSSI threshold: {}", threshold);
        CalibrationController { store, threshold, step, echo }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn increase(&mut self) -> Result<Threshold, LockError> {
        self.adjust(self.step)
    }

    pub fn decrease(&mut self) -> Result<Threshold, LockError> {
        self.adjust(-self.step)
    }

    /// Applies a button press and types the new value through `echo_sink`.
    /// On a storage failure the threshold is left untouched.
    pub fn handle(
        &mut self,
        event: CalibrationEvent,
        echo_sink: &mut dyn LockCommandSink,
    ) -> Result<Threshold, LockError> {
        let threshold = match event {
            CalibrationEvent::Increase => self.increase()?,
            CalibrationEvent::Decrease => self.decrease()?,
        };
        info!("RSSI threshold is {} after {:?}", threshold, event);
        if self.echo {
            if let Err(e) = echo_sink.type_text(&format!("{} ", threshold)) {
                warn!("Threshold echo dropped: {}", e);
            }
        }
        Ok(threshold)
    }

    // The store is written before the runtime value moves.
    fn adjust(&mut self, delta: i32) -> Result<Threshold, LockError> {
        let candidate = self.threshold.offset(delta);
        self.store.save(candidate.value())?;
        self.threshold = candidate;
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration_store::MemoryCalibrationStore;

    #[derive(Default)]
    struct RecordingSink {
        typed: Vec<String>,
        fail: bool,
    }

    impl LockCommandSink for RecordingSink {
        fn send_lock_shortcut(&mut self) -> Result<(), LockError> {
            Ok(())
        }

        fn type_text(&mut self, text: &str) -> Result<(), LockError> {
            if self.fail {
                return Err(LockError::OutputUnavailable(String::from("usb detached")));
            }
            self.typed.push(text.to_string());
            Ok(())
        }
    }

    struct FailingStore;

    impl CalibrationStore for FailingStore {
        fn load(&self) -> Result<i32, LockError> {
            Ok(-50)
        }

        fn save(&mut self, _value: i32) -> Result<(), LockError> {
            Err(LockError::Storage(String::from("flash busy")))
        }
    }

    fn controller(store: &MemoryCalibrationStore, echo: bool) -> CalibrationController {
        CalibrationController::new(Box::new(store.clone()), Threshold::DEFAULT, 5, echo)
    }

    #[test]
    fn new_uses_default_for_empty_store() {
        let store = MemoryCalibrationStore::default();
        assert_eq!(controller(&store, true).threshold(), Threshold::DEFAULT);
        // Loading never writes back.
        assert!(store.load().is_err());
    }

    #[test]
    fn increase_and_decrease_persist() {
        let store = MemoryCalibrationStore::new(Some(-60));
        let mut controller = controller(&store, true);
        assert_eq!(controller.increase(), Ok(Threshold::new(-55)));
        assert_eq!(store.load(), Ok(-55));
        assert_eq!(controller.decrease(), Ok(Threshold::new(-60)));
        assert_eq!(controller.decrease(), Ok(Threshold::new(-65)));
        assert_eq!(store.load(), Ok(-65));
        assert_eq!(load_threshold(&store, Threshold::DEFAULT), Threshold::new(-65));
    }

    #[test]
    fn adjustment_beyond_persisted_range_reloads_as_default() {
        let store = MemoryCalibrationStore::new(Some(0));
        let mut controller = controller(&store, false);
        assert_eq!(controller.increase(), Ok(Threshold::new(5)));
        assert_eq!(store.load(), Ok(5));
        let reloaded = CalibrationController::new(Box::new(store.clone()), Threshold::DEFAULT, 5, false);
        assert_eq!(reloaded.threshold(), Threshold::DEFAULT);
    }

    #[test]
    fn handle_echoes_new_value() {
        let store = MemoryCalibrationStore::new(Some(-60));
        let mut controller = controller(&store, true);
        let mut sink = RecordingSink::default();
        controller.handle(CalibrationEvent::Decrease, &mut sink).unwrap();
        controller.handle(CalibrationEvent::Increase, &mut sink).unwrap();
        controller.handle(CalibrationEvent::Increase, &mut sink).unwrap();
        assert_eq!(sink.typed, vec!["-65 ", "-60 ", "-55 "]);
    }

    #[test]
    fn handle_without_echo_types_nothing() {
        let store = MemoryCalibrationStore::new(Some(-60));
        let mut controller = controller(&store, false);
        let mut sink = RecordingSink::default();
        assert_eq!(controller.handle(CalibrationEvent::Increase, &mut sink), Ok(Threshold::new(-55)));
        assert!(sink.typed.is_empty());
    }

    #[test]
    fn echo_failure_does_not_undo_adjustment() {
        let store = MemoryCalibrationStore::new(Some(-60));
        let mut controller = controller(&store, true);
        let mut sink = RecordingSink { fail: true, ..Default::default() };
        assert_eq!(controller.handle(CalibrationEvent::Increase, &mut sink), Ok(Threshold::new(-55)));
        assert_eq!(store.load(), Ok(-55));
    }

    #[test]
    fn failed_save_leaves_threshold_unchanged() {
        let mut controller =
            CalibrationController::new(Box::new(FailingStore), Threshold::DEFAULT, 5, true);
        assert_eq!(controller.threshold(), Threshold::new(-50));
        let mut sink = RecordingSink::default();
        assert!(matches!(
            controller.handle(CalibrationEvent::Increase, &mut sink),
            Err(LockError::Storage(_))
        ));
        assert_eq!(controller.threshold(), Threshold::new(-50));
        assert!(sink.typed.is_empty());
    }
}
