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

use thiserror::Error;

/// Library error type.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Clone)]
pub enum LockError {
    /// Reported when a beacon address string is not six colon-separated
    /// hexadecimal octets.
    #[error("invalid beacon address: {0}")]
    InvalidAddress(String),
    /// Reported when engine options are out of range or cannot be parsed.
    #[error("invalid engine options: {0}")]
    InvalidOptions(String),
    /// Reported when the calibration store cannot be read or written.
    #[error("calibration storage error: {0}")]
    Storage(String),
    /// Reported by an output collaborator (indicator or HID keyboard) whose
    /// channel is currently unavailable. Never retried by the engine.
    #[error("output unavailable: {0}")]
    OutputUnavailable(String),
    /// Wrapper around runtime-level failures, e.g. the async runtime could
    /// not be built.
    #[error("system-level error: {0}")]
    System(String),
}
