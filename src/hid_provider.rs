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

use std::fmt;

use crate::error::LockError;

/// Modifier keys the lock shortcut may hold down.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Modifier {
    LeftGui,
    LeftCtrl,
    LeftAlt,
    LeftShift,
}

/// A modifier+key combination pressed and released as one stroke.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifier: Modifier,
    pub key: char,
}

/// Desktop lock shortcut (Super+L).
pub const LOCK_SHORTCUT: KeyChord = KeyChord { modifier: Modifier::LeftGui, key: 'l' };

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}+{}", self.modifier, self.key)
    }
}

/// Keyboard emulation consumed by the engine. Both operations are
/// fire-and-forget; an `Err` only tells the caller the keystrokes were lost.
pub trait LockCommandSink: Send {
    /// Presses and releases [`LOCK_SHORTCUT`].
    fn send_lock_shortcut(&mut self) -> Result<(), LockError>;

    /// Types `text` followed by a release of all keys.
    fn type_text(&mut self, text: &str) -> Result<(), LockError>;
}
