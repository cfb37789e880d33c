// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod test_descriptors {
    use sfh_reports::{descriptor, descriptor_size, handler, parse_descriptor};
    use sfh_structures::SensorKind;

    #[test]
    fn test_descriptor_size_matches_bytes() {
        for kind in SensorKind::ALL {
            assert_eq!(descriptor_size(kind), descriptor(kind).len(), "{}", kind);
        }
    }

    #[test]
    fn test_every_descriptor_parses() {
        for kind in SensorKind::ALL {
            let summary = parse_descriptor(descriptor(kind))
                .unwrap_or_else(|err| panic!("{} descriptor rejected: {}", kind, err));
            assert_eq!(summary.reports.len(), 1, "{}", kind);
            let (usage_page, _) = summary.top_level_usage.unwrap();
            let expected_page = match kind {
                SensorKind::LidSwitch => 0xFF43,
                _ => 0x0020,
            };
            assert_eq!(usage_page, expected_page, "{}", kind);
        }
    }

    #[test]
    fn test_parsed_sizes_match_encoder() {
        for kind in SensorKind::ALL {
            let summary = parse_descriptor(descriptor(kind)).unwrap();
            let layout = summary.report(kind.default_report_id()).unwrap();
            let handler = handler(kind);
            assert_eq!(layout.feature_len(), handler.feature_report_len(), "{}", kind);
            assert_eq!(layout.input_len(), handler.input_report_len(), "{}", kind);
            assert_eq!(layout.output_len(), 0, "{}", kind);
        }
    }

    #[test]
    fn test_descriptors_are_stable() {
        assert_eq!(descriptor_size(SensorKind::Accelerometer), 358);
        assert_eq!(descriptor_size(SensorKind::Gyroscope), 345);
        assert_eq!(descriptor_size(SensorKind::Magnetometer), 414);
        assert_eq!(descriptor_size(SensorKind::AmbientLight), 301);
    }
}

#[cfg(test)]
mod test_feature_reports {
    use sfh_reports::{feature_report, feature_report_vec, CommonFeatures, SensorReport};
    use sfh_structures::{SensorKind, SfhError};

    #[test]
    fn test_report_id_preserved() {
        for kind in SensorKind::ALL {
            for report_id in [0u8, 1, 4, 0x11, 0x7F, 0xFF] {
                let bytes = feature_report_vec(kind, report_id).unwrap();
                let common = CommonFeatures::try_read_from_byte_slice(&bytes).unwrap();
                assert_eq!(common.report_id, report_id);
                assert_eq!(common.connection_type, 0x01);
                assert_eq!(common.report_state, 0x41);
                assert_eq!(common.power_state, 0x51);
                assert_eq!(common.sensor_state, 0x05);
                assert_eq!(common.report_interval, 0x50);
            }
        }
    }

    #[test]
    fn test_short_buffer_untouched() {
        let mut out = [0xAAu8; 14];
        let result = feature_report(SensorKind::Accelerometer, 1, &mut out);
        assert_eq!(
            result,
            Err(SfhError::InsufficientBuffer {
                required: 15,
                available: 14
            })
        );
        assert!(out.iter().all(|byte| *byte == 0xAA));
    }

    #[test]
    fn test_larger_buffer_written_at_front() {
        let mut out = [0xAAu8; 32];
        let written = feature_report(SensorKind::LidSwitch, 0x11, &mut out).unwrap();
        assert_eq!(written, 9);
        assert_eq!(out[0], 0x11);
        assert!(out[9..].iter().all(|byte| *byte == 0xAA));
    }
}

#[cfg(test)]
mod test_input_reports {
    use sfh_reports::sensors::accelerometer::AccelerometerInputReport;
    use sfh_reports::sensors::magnetometer::MagnetometerInputReport;
    use sfh_reports::{input_report, input_report_vec, CommonInputs, SensorReport};
    use sfh_structures::{RawSamples, SensorKind, SfhError};

    #[test]
    fn test_accelerometer_scenario() {
        let samples = RawSamples::from_signed([3000, -2000, 9800, 1]);
        let bytes = input_report_vec(SensorKind::Accelerometer, 1, &samples).unwrap();
        let report = AccelerometerInputReport::try_read_from_byte_slice(&bytes).unwrap();
        assert_eq!(report.accel_x, 3);
        assert_eq!(report.accel_y, -2);
        assert_eq!(report.accel_z, 9);
        assert_eq!(report.shake_detection, 0);
    }

    #[test]
    fn test_input_reports_are_pure() {
        let samples = RawSamples::from_signed([-45_500, 12_345, 999, -1]);
        for kind in SensorKind::ALL {
            let first = input_report_vec(kind, 3, &samples).unwrap();
            let second = input_report_vec(kind, 3, &samples).unwrap();
            assert_eq!(first, second);
            let common = CommonInputs::try_read_from_byte_slice(&first).unwrap();
            assert_eq!(common.report_id, 3);
            assert_eq!(common.sensor_state, 0x02);
            assert_eq!(common.event_type, 0x04);
        }
    }

    #[test]
    fn test_scaling_truncates_toward_zero() {
        let values = [-45_500, 12_345, 999, -1999];
        let samples = RawSamples::from_signed(values);
        let bytes = input_report_vec(SensorKind::Magnetometer, 3, &samples).unwrap();
        let report = MagnetometerInputReport::try_read_from_byte_slice(&bytes).unwrap();
        assert_eq!(
            [report.flux_x, report.flux_y, report.flux_z, report.accuracy],
            values.map(|raw| raw / 1000)
        );
        assert_eq!(report.flux_x, -45);
        assert_eq!(report.accuracy, -1);
    }

    #[test]
    fn test_input_short_buffer_untouched() {
        let mut out = [0x55u8; 3];
        let result = input_report(SensorKind::LidSwitch, 0x11, &RawSamples::default(), &mut out);
        assert!(matches!(
            result,
            Err(SfhError::InsufficientBuffer {
                required: 4,
                available: 3
            })
        ));
        assert_eq!(out, [0x55; 3]);
    }
}
