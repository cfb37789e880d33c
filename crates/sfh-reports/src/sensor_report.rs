// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use byteorder::{ByteOrder, LittleEndian};
use sfh_structures::{SfhError, SfhResult};

/// A packed, little-endian report with a fixed wire length.
pub trait SensorReport: Sized {
    /// Number of bytes the packed report occupies, report id included.
    const ENCODED_LEN: usize;

    /// Write every field in wire order. The writer holds exactly `ENCODED_LEN` bytes.
    fn write_fields(&self, writer: &mut FieldWriter<'_>);

    /// Read every field in wire order. The reader holds exactly `ENCODED_LEN` bytes.
    fn read_fields(reader: &mut FieldReader<'_>) -> Self;

    /// Serialize into the front of `destination`, returning the number of bytes written.
    ///
    /// A destination shorter than `ENCODED_LEN` is rejected before any byte is written.
    fn try_write_to_byte_slice(&self, destination: &mut [u8]) -> SfhResult<usize> {
        if destination.len() < Self::ENCODED_LEN {
            return Err(SfhError::InsufficientBuffer {
                required: Self::ENCODED_LEN,
                available: destination.len(),
            });
        }
        let mut writer = FieldWriter::new(&mut destination[..Self::ENCODED_LEN]);
        self.write_fields(&mut writer);
        debug_assert_eq!(writer.position(), Self::ENCODED_LEN);
        Ok(Self::ENCODED_LEN)
    }

    fn try_read_from_byte_slice(source: &[u8]) -> SfhResult<Self> {
        if source.len() < Self::ENCODED_LEN {
            return Err(SfhError::InsufficientBuffer {
                required: Self::ENCODED_LEN,
                available: source.len(),
            });
        }
        let mut reader = FieldReader::new(&source[..Self::ENCODED_LEN]);
        Ok(Self::read_fields(&mut reader))
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; Self::ENCODED_LEN];
        let mut writer = FieldWriter::new(&mut bytes);
        self.write_fields(&mut writer);
        bytes
    }
}

/// Sequential little-endian writer over a pre-sized slice.
pub struct FieldWriter<'a> {
    bytes: &'a mut [u8],
    position: usize,
}

impl<'a> FieldWriter<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        FieldWriter { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn advance(&mut self, width: usize) -> &mut [u8] {
        let start = self.position;
        self.position += width;
        &mut self.bytes[start..start + width]
    }

    pub fn put_u8(&mut self, value: u8) {
        self.advance(1)[0] = value;
    }

    pub fn put_u16(&mut self, value: u16) {
        LittleEndian::write_u16(self.advance(2), value);
    }

    pub fn put_i16(&mut self, value: i16) {
        LittleEndian::write_i16(self.advance(2), value);
    }

    pub fn put_u32(&mut self, value: u32) {
        LittleEndian::write_u32(self.advance(4), value);
    }

    pub fn put_i32(&mut self, value: i32) {
        LittleEndian::write_i32(self.advance(4), value);
    }
}

/// Sequential little-endian reader over a pre-sized slice.
pub struct FieldReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        FieldReader { bytes, position: 0 }
    }

    fn advance(&mut self, width: usize) -> &'a [u8] {
        let bytes = self.bytes;
        let start = self.position;
        self.position += width;
        &bytes[start..start + width]
    }

    pub fn get_u8(&mut self) -> u8 {
        self.advance(1)[0]
    }

    pub fn get_u16(&mut self) -> u16 {
        LittleEndian::read_u16(self.advance(2))
    }

    pub fn get_i16(&mut self) -> i16 {
        LittleEndian::read_i16(self.advance(2))
    }

    pub fn get_u32(&mut self) -> u32 {
        LittleEndian::read_u32(self.advance(4))
    }

    pub fn get_i32(&mut self) -> i32 {
        LittleEndian::read_i32(self.advance(4))
    }
}
