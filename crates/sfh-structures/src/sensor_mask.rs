// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::SensorKind;

/// Bitset over [`SensorKind`], laid out like the firmware capability mask.
///
/// Bits with no matching kind are kept in the raw value so the mask can be logged exactly as
/// it was read, but iteration only yields known kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorMask(u32);

impl SensorMask {
    pub const EMPTY: SensorMask = SensorMask(0);

    /// Union of every known kind's bit.
    pub const KNOWN_BITS: u32 = SensorKind::Accelerometer.mask_bit()
        | SensorKind::Gyroscope.mask_bit()
        | SensorKind::Magnetometer.mask_bit()
        | SensorKind::LidSwitch.mask_bit()
        | SensorKind::AmbientLight.mask_bit();

    pub const fn from_bits(bits: u32) -> Self {
        SensorMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, kind: SensorKind) -> bool {
        self.0 & kind.mask_bit() != 0
    }

    pub fn insert(&mut self, kind: SensorKind) {
        self.0 |= kind.mask_bit();
    }

    pub fn remove(&mut self, kind: SensorKind) {
        self.0 &= !kind.mask_bit();
    }

    pub const fn with(self, kind: SensorKind) -> Self {
        SensorMask(self.0 | kind.mask_bit())
    }

    /// Bits set in the mask that name no known sensor.
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::KNOWN_BITS
    }

    pub fn iter(self) -> SensorMaskIter {
        SensorMaskIter {
            mask: self,
            position: 0,
        }
    }

    pub fn len(self) -> usize {
        self.iter().count()
    }
}

impl FromIterator<SensorKind> for SensorMask {
    fn from_iter<T: IntoIterator<Item = SensorKind>>(iter: T) -> Self {
        let mut mask = SensorMask::EMPTY;
        for kind in iter {
            mask.insert(kind);
        }
        mask
    }
}

impl IntoIterator for SensorMask {
    type Item = SensorKind;
    type IntoIter = SensorMaskIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for SensorMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x} [", self.0)?;
        for (index, kind) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, "]")
    }
}

/// Present kinds in ascending identifier order.
#[derive(Debug, Clone)]
pub struct SensorMaskIter {
    mask: SensorMask,
    position: usize,
}

impl Iterator for SensorMaskIter {
    type Item = SensorKind;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < SensorKind::ALL.len() {
            let kind = SensorKind::ALL[self.position];
            self.position += 1;
            if self.mask.contains(kind) {
                return Some(kind);
            }
        }
        None
    }
}
