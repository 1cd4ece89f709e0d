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
use std::str::FromStr;

use crate::error::LockError;

/// 48-bit BLE address of the tracked beacon, most significant octet first.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct BeaconAddress([u8; 6]);

impl BeaconAddress {
    /// `BeaconAddress` constructor.
    pub const fn new(octets: [u8; 6]) -> Self {
        BeaconAddress(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for BeaconAddress {
    type Err = LockError;

    /// Parses the `aa:bb:cc:dd:ee:ff` notation, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| LockError::InvalidAddress(format!("too few octets in {s:?}")))?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(LockError::InvalidAddress(format!("bad octet {part:?} in {s:?}")));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|err| LockError::InvalidAddress(format!("{s:?}: {err}")))?;
        }
        if parts.next().is_some() {
            return Err(LockError::InvalidAddress(format!("too many octets in {s:?}")));
        }
        Ok(BeaconAddress(octets))
    }
}

impl fmt::Display for BeaconAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl From<BeaconAddress> for u64 {
    fn from(addr: BeaconAddress) -> Self {
        addr.0.iter().fold(0u64, |acc, octet| (acc << 8) | u64::from(*octet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lower_and_upper_case() {
        let lower: BeaconAddress = "de:39:e5:a9:1e:49".parse().unwrap();
        let upper: BeaconAddress = "DE:39:E5:A9:1E:49".parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.octets(), [0xde, 0x39, 0xe5, 0xa9, 0x1e, 0x49]);
    }

    #[test]
    fn display_round_trips_canonical_form() {
        let addr: BeaconAddress = "DE:39:E5:A9:1E:49".parse().unwrap();
        assert_eq!(addr.to_string(), "de:39:e5:a9:1e:49");
    }

    #[test]
    fn into_u64() {
        let addr = BeaconAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        let raw: u64 = addr.into();
        assert_eq!(raw, 0x112233445566);
    }

    #[test]
    fn reject_malformed_addresses() {
        for bad in ["", "de:39:e5:a9:1e", "de:39:e5:a9:1e:49:00", "de:39:e5:a9:1e:4", "zz:39:e5:a9:1e:49", "de-39-e5-a9-1e-49"] {
            assert!(
                matches!(bad.parse::<BeaconAddress>(), Err(LockError::InvalidAddress(_))),
                "{bad:?} should not parse"
            );
        }
    }
}
