// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Schema parser for HID report descriptors.
//!
//! Walks the short items of a descriptor, keeps the global item state (including push/pop),
//! checks that collections are balanced and tallies how many bits each report id carries for
//! input, output and feature main items. Long items are rejected; none of the sensor
//! descriptors use them.

use sfh_structures::{SfhError, SfhResult};

const ITEM_TYPE_MAIN: u8 = 0;
const ITEM_TYPE_GLOBAL: u8 = 1;
const ITEM_TYPE_LOCAL: u8 = 2;

const MAIN_INPUT: u8 = 0x8;
const MAIN_OUTPUT: u8 = 0x9;
const MAIN_COLLECTION: u8 = 0xA;
const MAIN_FEATURE: u8 = 0xB;
const MAIN_END_COLLECTION: u8 = 0xC;

const GLOBAL_USAGE_PAGE: u8 = 0x0;
const GLOBAL_REPORT_SIZE: u8 = 0x7;
const GLOBAL_REPORT_ID: u8 = 0x8;
const GLOBAL_REPORT_COUNT: u8 = 0x9;
const GLOBAL_PUSH: u8 = 0xA;
const GLOBAL_POP: u8 = 0xB;

const LOCAL_USAGE: u8 = 0x0;
const LOCAL_MAX_TAG: u8 = 0xA;

const LONG_ITEM_PREFIX: u8 = 0xFE;

/// Bit totals of one report id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportLayout {
    /// Report id, or 0 when the descriptor declares none.
    pub report_id: u8,
    pub input_bits: u32,
    pub output_bits: u32,
    pub feature_bits: u32,
}

impl ReportLayout {
    fn byte_len(&self, bits: u32) -> usize {
        if bits == 0 {
            return 0;
        }
        let prefix = usize::from(self.report_id != 0);
        (bits as usize).div_ceil(8) + prefix
    }

    /// Wire length of the input report, report id byte included.
    pub fn input_len(&self) -> usize {
        self.byte_len(self.input_bits)
    }

    pub fn output_len(&self) -> usize {
        self.byte_len(self.output_bits)
    }

    /// Wire length of the feature report, report id byte included.
    pub fn feature_len(&self) -> usize {
        self.byte_len(self.feature_bits)
    }
}

/// Result of parsing a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSummary {
    /// Reports in order of first declaration.
    pub reports: Vec<ReportLayout>,
    /// Usage page and usage of the first top-level collection.
    pub top_level_usage: Option<(u16, u16)>,
    pub collection_count: usize,
    pub max_collection_depth: usize,
}

impl DescriptorSummary {
    pub fn report(&self, report_id: u8) -> Option<&ReportLayout> {
        self.reports.iter().find(|layout| layout.report_id == report_id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GlobalState {
    usage_page: u16,
    report_size: u32,
    report_count: u32,
    report_id: Option<u8>,
}

struct Item {
    item_type: u8,
    tag: u8,
    value: u32,
}

fn malformed(offset: usize, message: impl std::fmt::Display) -> SfhError {
    SfhError::MalformedDescriptor(format!("offset {}: {}", offset, message))
}

fn read_item(bytes: &[u8], offset: usize) -> SfhResult<(Item, usize)> {
    let prefix = bytes[offset];
    if prefix == LONG_ITEM_PREFIX {
        return Err(malformed(offset, "long items are not supported"));
    }
    let size = match prefix & 0x03 {
        3 => 4,
        size => size as usize,
    };
    let data = bytes
        .get(offset + 1..offset + 1 + size)
        .ok_or_else(|| malformed(offset, format!("item needs {} data bytes", size)))?;
    let value = data
        .iter()
        .enumerate()
        .fold(0u32, |acc, (index, byte)| acc | (u32::from(*byte) << (8 * index)));
    Ok((
        Item {
            item_type: (prefix >> 2) & 0x03,
            tag: prefix >> 4,
            value,
        },
        1 + size,
    ))
}

/// Parse and validate a report descriptor.
pub fn parse_descriptor(bytes: &[u8]) -> SfhResult<DescriptorSummary> {
    if bytes.is_empty() {
        return Err(SfhError::MalformedDescriptor("empty descriptor".to_string()));
    }

    let mut summary = DescriptorSummary::default();
    let mut globals = GlobalState::default();
    let mut global_stack: Vec<GlobalState> = Vec::new();
    let mut last_usage: Option<u16> = None;
    let mut depth = 0usize;
    let mut offset = 0usize;

    while offset < bytes.len() {
        let (item, consumed) = read_item(bytes, offset)?;
        match item.item_type {
            ITEM_TYPE_MAIN => {
                match item.tag {
                    MAIN_INPUT | MAIN_OUTPUT | MAIN_FEATURE => {
                        if globals.report_size == 0 {
                            return Err(malformed(offset, "main item before a report size"));
                        }
                        let bits = globals
                            .report_size
                            .checked_mul(globals.report_count)
                            .ok_or_else(|| malformed(offset, "report size overflow"))?;
                        let report_id = globals.report_id.unwrap_or(0);
                        let has_unnumbered = summary.reports.iter().any(|r| r.report_id == 0);
                        if (report_id == 0 && summary.reports.iter().any(|r| r.report_id != 0))
                            || (report_id != 0 && has_unnumbered)
                        {
                            return Err(malformed(offset, "numbered and unnumbered reports mixed"));
                        }
                        let layout = match summary
                            .reports
                            .iter_mut()
                            .position(|layout| layout.report_id == report_id)
                        {
                            Some(index) => &mut summary.reports[index],
                            None => {
                                summary.reports.push(ReportLayout {
                                    report_id,
                                    ..ReportLayout::default()
                                });
                                let last = summary.reports.len() - 1;
                                &mut summary.reports[last]
                            }
                        };
                        match item.tag {
                            MAIN_INPUT => layout.input_bits += bits,
                            MAIN_OUTPUT => layout.output_bits += bits,
                            _ => layout.feature_bits += bits,
                        }
                    }
                    MAIN_COLLECTION => {
                        if depth == 0 && summary.top_level_usage.is_none() {
                            summary.top_level_usage =
                                Some((globals.usage_page, last_usage.unwrap_or(0)));
                        }
                        depth += 1;
                        summary.collection_count += 1;
                        summary.max_collection_depth = summary.max_collection_depth.max(depth);
                    }
                    MAIN_END_COLLECTION => {
                        if depth == 0 {
                            return Err(malformed(offset, "end collection without open collection"));
                        }
                        depth -= 1;
                    }
                    tag => return Err(malformed(offset, format!("unknown main item tag {:#x}", tag))),
                }
                last_usage = None;
            }
            ITEM_TYPE_GLOBAL => match item.tag {
                GLOBAL_USAGE_PAGE => globals.usage_page = item.value as u16,
                GLOBAL_REPORT_SIZE => globals.report_size = item.value,
                GLOBAL_REPORT_COUNT => globals.report_count = item.value,
                GLOBAL_REPORT_ID => {
                    if item.value == 0 || item.value > u32::from(u8::MAX) {
                        return Err(malformed(offset, format!("invalid report id {}", item.value)));
                    }
                    globals.report_id = Some(item.value as u8);
                }
                GLOBAL_PUSH => global_stack.push(globals),
                GLOBAL_POP => {
                    globals = global_stack
                        .pop()
                        .ok_or_else(|| malformed(offset, "pop without push"))?;
                }
                // Logical/physical extents, unit exponent and unit only shape values.
                0x1..=0x6 => {}
                tag => return Err(malformed(offset, format!("unknown global item tag {:#x}", tag))),
            },
            ITEM_TYPE_LOCAL => match item.tag {
                LOCAL_USAGE => last_usage = Some(item.value as u16),
                tag if tag <= LOCAL_MAX_TAG => {}
                tag => return Err(malformed(offset, format!("unknown local item tag {:#x}", tag))),
            },
            _ => return Err(malformed(offset, "reserved item type")),
        }
        offset += consumed;
    }

    if depth != 0 {
        return Err(SfhError::MalformedDescriptor(format!(
            "{} collection(s) left open",
            depth
        )));
    }
    if summary.reports.is_empty() {
        return Err(SfhError::MalformedDescriptor(
            "descriptor declares no reports".to_string(),
        ));
    }
    Ok(summary)
}
