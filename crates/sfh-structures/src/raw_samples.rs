// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Number of 32-bit words the firmware writes per sample vector.
pub const RAW_SAMPLE_WORDS: usize = 4;

/// Fixed-point divisor applied by the firmware to every raw sample word.
pub const FIRMWARE_DIVISOR: i32 = 1000;

/// One raw sample vector as written by the coprocessor into a DMA buffer.
///
/// Words are signed fixed-point values stored in unsigned registers; [`RawSamples::scaled`]
/// reinterprets the bits as `i32` and divides by [`FIRMWARE_DIVISOR`], truncating toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RawSamples(pub [u32; RAW_SAMPLE_WORDS]);

impl RawSamples {
    pub const fn new(words: [u32; RAW_SAMPLE_WORDS]) -> Self {
        RawSamples(words)
    }

    /// Builds a sample vector from signed values, as the firmware would store them.
    pub fn from_signed(values: [i32; RAW_SAMPLE_WORDS]) -> Self {
        RawSamples(values.map(|value| value as u32))
    }

    pub const fn words(&self) -> &[u32; RAW_SAMPLE_WORDS] {
        &self.0
    }

    pub const fn raw(&self, index: usize) -> i32 {
        self.0[index] as i32
    }

    pub const fn scaled(&self, index: usize) -> i32 {
        self.raw(index) / FIRMWARE_DIVISOR
    }
}

impl From<[u32; RAW_SAMPLE_WORDS]> for RawSamples {
    fn from(words: [u32; RAW_SAMPLE_WORDS]) -> Self {
        RawSamples(words)
    }
}
