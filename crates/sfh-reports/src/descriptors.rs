// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Compiled-in report descriptors.
//!
//! Every sensor describes one report id carrying a feature report and an input report. The
//! feature report always starts with the common property block (connection type, reporting
//! state, power state, sensor state, report interval) and the input report with the common
//! state/event block; only the collection header and the kind-specific fields differ, so the
//! descriptors are assembled at compile time from shared parts.

const fn parts_len(parts: &[&[u8]]) -> usize {
    let mut total = 0;
    let mut part = 0;
    while part < parts.len() {
        total += parts[part].len();
        part += 1;
    }
    total
}

const fn assemble<const N: usize>(parts: &[&[u8]]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut written = 0;
    let mut part = 0;
    while part < parts.len() {
        let bytes = parts[part];
        let mut index = 0;
        while index < bytes.len() {
            out[written] = bytes[index];
            written += 1;
            index += 1;
        }
        part += 1;
    }
    assert!(written == N, "descriptor parts do not fill the declared length");
    out
}

/// Feature items shared by every sensor: connection type, reporting state, power state,
/// sensor state (8-bit selectors) and the 32-bit report interval.
const COMMON_FEATURE_ITEMS: &[u8] = &[
    0x05, 0x20, //                  usage page (sensors)
    0x0A, 0x09, 0x03, //            property: connection type
    0x15, 0x00, 0x25, 0x02, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02, //                  collection (logical)
    0x0A, 0x30, 0x08, 0x0A, 0x31, 0x08, 0x0A, 0x32, 0x08,
    0xB1, 0x00, //                  feature (data, array, abs)
    0xC0,
    0x0A, 0x16, 0x03, //            property: reporting state
    0x15, 0x00, 0x25, 0x05, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02,
    0x0A, 0x40, 0x08, 0x0A, 0x41, 0x08, 0x0A, 0x42, 0x08,
    0x0A, 0x43, 0x08, 0x0A, 0x44, 0x08, 0x0A, 0x45, 0x08,
    0xB1, 0x00,
    0xC0,
    0x0A, 0x19, 0x03, //            property: power state
    0x15, 0x00, 0x25, 0x05, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02,
    0x0A, 0x50, 0x08, 0x0A, 0x51, 0x08, 0x0A, 0x52, 0x08,
    0x0A, 0x53, 0x08, 0x0A, 0x54, 0x08, 0x0A, 0x55, 0x08,
    0xB1, 0x00,
    0xC0,
    0x0A, 0x01, 0x02, //            sensor state
    0x15, 0x00, 0x25, 0x06, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02,
    0x0A, 0x00, 0x08, 0x0A, 0x01, 0x08, 0x0A, 0x02, 0x08, 0x0A, 0x03, 0x08,
    0x0A, 0x04, 0x08, 0x0A, 0x05, 0x08, 0x0A, 0x06, 0x08,
    0xB1, 0x00,
    0xC0,
    0x0A, 0x0E, 0x03, //            property: report interval
    0x15, 0x00, 0x27, 0xFF, 0xFF, 0xFF, 0xFF,
    0x75, 0x20, 0x95, 0x01, 0x55, 0x00,
    0xB1, 0x02, //                  feature (data, var, abs)
];

/// Input items shared by every sensor: sensor state and sensor event selectors.
const COMMON_INPUT_ITEMS: &[u8] = &[
    0x05, 0x20,
    0x0A, 0x01, 0x02, //            sensor state
    0x15, 0x00, 0x25, 0x06, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02,
    0x0A, 0x00, 0x08, 0x0A, 0x01, 0x08, 0x0A, 0x02, 0x08, 0x0A, 0x03, 0x08,
    0x0A, 0x04, 0x08, 0x0A, 0x05, 0x08, 0x0A, 0x06, 0x08,
    0x81, 0x00, //                  input (data, array, abs)
    0xC0,
    0x0A, 0x02, 0x02, //            sensor event
    0x15, 0x00, 0x25, 0x05, 0x75, 0x08, 0x95, 0x01,
    0xA1, 0x02,
    0x0A, 0x10, 0x08, 0x0A, 0x11, 0x08, 0x0A, 0x12, 0x08,
    0x0A, 0x13, 0x08, 0x0A, 0x14, 0x08, 0x0A, 0x15, 0x08,
    0x81, 0x00,
    0xC0,
];

const END_COLLECTION: &[u8] = &[0xC0];

// Accelerometer 3D, report id 1.
const ACCELEROMETER_PARTS: &[&[u8]] = &[
    &[0x05, 0x20, 0x09, 0x73, 0xA1, 0x00, 0x85, 0x01],
    COMMON_FEATURE_ITEMS,
    &[
        0x0A, 0x52, 0x14, //        change sensitivity (abs)
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x52, 0x24, //        maximum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x52, 0x34, //        minimum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
    ],
    COMMON_INPUT_ITEMS,
    &[
        0x0A, 0x53, 0x04, //        acceleration x
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0xFF,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
        0x0A, 0x54, 0x04, //        acceleration y
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0xFF,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
        0x0A, 0x55, 0x04, //        acceleration z
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
        0x0A, 0x51, 0x04, //        motion state (shake)
        0x15, 0x00, 0x25, 0x01, 0x75, 0x08, 0x95, 0x01, 0x81, 0x02,
    ],
    END_COLLECTION,
];

// Gyrometer 3D, report id 2.
const GYROSCOPE_PARTS: &[&[u8]] = &[
    &[0x05, 0x20, 0x09, 0x76, 0xA1, 0x00, 0x85, 0x02],
    COMMON_FEATURE_ITEMS,
    &[
        0x0A, 0x56, 0x14,
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x56, 0x24,
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x56, 0x34,
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
    ],
    COMMON_INPUT_ITEMS,
    &[
        0x0A, 0x57, 0x04, //        angular velocity x
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
        0x0A, 0x58, 0x04, //        angular velocity y
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
        0x0A, 0x59, 0x04, //        angular velocity z
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0E, 0x81, 0x02,
    ],
    END_COLLECTION,
];

// Compass 3D, report id 3.
const MAGNETOMETER_PARTS: &[&[u8]] = &[
    &[0x05, 0x20, 0x09, 0x83, 0xA1, 0x00, 0x85, 0x03],
    COMMON_FEATURE_ITEMS,
    &[
        0x0A, 0x71, 0x14, //        heading change sensitivity
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x71, 0x24, //        heading maximum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
        0x0A, 0x71, 0x34, //        heading minimum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
        0x0A, 0x84, 0x14, //        flux change sensitivity
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0x84, 0x24, //        flux maximum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
        0x0A, 0x84, 0x34, //        flux minimum
        0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
    ],
    COMMON_INPUT_ITEMS,
    &[
        0x0A, 0x85, 0x04, //        flux x
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0D, 0x81, 0x02,
        0x0A, 0x86, 0x04, //        flux y
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0D, 0x81, 0x02,
        0x0A, 0x87, 0x04, //        flux z
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x55, 0x0D, 0x81, 0x02,
        0x0A, 0x88, 0x04, //        accuracy
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x75, 0x20, 0x95, 0x01, 0x81, 0x02,
    ],
    END_COLLECTION,
];

// Ambient light, report id 4.
const AMBIENT_LIGHT_PARTS: &[&[u8]] = &[
    &[0x05, 0x20, 0x09, 0x41, 0xA1, 0x00, 0x85, 0x04],
    COMMON_FEATURE_ITEMS,
    &[
        0x0A, 0xD1, 0xE4, //        illuminance change sensitivity (percent of range)
        0x15, 0x00, 0x26, 0x10, 0x27, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0E, 0xB1, 0x02,
        0x0A, 0xD1, 0x24, //        maximum
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
        0x0A, 0xD1, 0x34, //        minimum
        0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x55, 0x0F, 0xB1, 0x02,
    ],
    COMMON_INPUT_ITEMS,
    &[
        0x0A, 0xD1, 0x04, //        illuminance
        0x17, 0x00, 0x00, 0x01, 0x80, 0x27, 0xFF, 0xFF, 0xFF, 0x7F,
        0x55, 0x0F, 0x75, 0x20, 0x95, 0x01, 0x81, 0x02,
    ],
    END_COLLECTION,
];

// Lid switch on the vendor page, report id 0x11. Feature report carries the common block only.
const LID_SWITCH_PARTS: &[&[u8]] = &[
    &[
        0x06, 0x43, 0xFF, //        usage page (vendor 0xFF43)
        0x0A, 0x02, 0x02, //        usage (lid switch)
        0xA1, 0x01, //              collection (application)
        0x85, 0x11,
    ],
    COMMON_FEATURE_ITEMS,
    COMMON_INPUT_ITEMS,
    &[
        0x06, 0x43, 0xFF,
        0x0A, 0x03, 0x02, //        usage (lid state)
        0x15, 0x00, 0x25, 0x01, 0x75, 0x08, 0x95, 0x01, 0x81, 0x02,
    ],
    END_COLLECTION,
];

pub static ACCELEROMETER: [u8; parts_len(ACCELEROMETER_PARTS)] = assemble(ACCELEROMETER_PARTS);
pub static GYROSCOPE: [u8; parts_len(GYROSCOPE_PARTS)] = assemble(GYROSCOPE_PARTS);
pub static MAGNETOMETER: [u8; parts_len(MAGNETOMETER_PARTS)] = assemble(MAGNETOMETER_PARTS);
pub static AMBIENT_LIGHT: [u8; parts_len(AMBIENT_LIGHT_PARTS)] = assemble(AMBIENT_LIGHT_PARTS);
pub static LID_SWITCH: [u8; parts_len(LID_SWITCH_PARTS)] = assemble(LID_SWITCH_PARTS);
