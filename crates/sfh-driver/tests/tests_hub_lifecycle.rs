// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sfh_driver::{
    CollectingTransport, CommandEncoding, HubConfig, MaskSource, PlatformIdentity,
    ReportTransport, SensorHub,
};
use sfh_hal::{offsets, HostDmaAllocator, RecordingRegisters, RegisterEvent};
use sfh_reports::ReportType;
use sfh_structures::{RawSamples, SensorKind, SensorMask, SfhError, SfhResult};

struct Fixture {
    registers: RecordingRegisters,
    allocator: Arc<HostDmaAllocator>,
    transport: Arc<CollectingTransport>,
    hub: SensorHub<RecordingRegisters>,
}

fn fixture(status: u32, config: HubConfig) -> Fixture {
    let registers = RecordingRegisters::with_status(status);
    let allocator = Arc::new(HostDmaAllocator::new());
    let transport = Arc::new(CollectingTransport::new());
    let hub = SensorHub::new(
        registers.clone(),
        allocator.clone(),
        transport.clone(),
        config,
    );
    Fixture {
        registers,
        allocator,
        transport,
        hub,
    }
}

fn fast_polling() -> HubConfig {
    HubConfig {
        poll_interval: Duration::from_millis(5),
        sensor_mask_override: None,
    }
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

fn command_words(registers: &RecordingRegisters) -> Vec<u32> {
    registers.writes_to(offsets::C2P_MSG0)
}

#[cfg(test)]
mod test_session_lifecycle {
    use super::*;

    #[test]
    fn test_open_close_balance() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Gyroscope).unwrap();
        assert!(f.hub.is_open(SensorKind::Gyroscope));
        assert_eq!(f.allocator.outstanding(), 1);

        assert!(f.hub.close(SensorKind::Gyroscope));
        assert!(!f.hub.is_open(SensorKind::Gyroscope));
        assert_eq!(f.allocator.outstanding(), 0);
        assert_eq!(f.allocator.total_allocations(), 1);

        // one enable, one disable
        assert_eq!(command_words(&f.registers), vec![0x00C8_0101, 0x0000_0102]);
    }

    #[test]
    fn test_double_close_is_noop() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Accelerometer).unwrap();
        assert!(f.hub.close(SensorKind::Accelerometer));
        let writes_after_first_close = f.registers.writes().len();

        assert!(!f.hub.close(SensorKind::Accelerometer));
        assert!(!f.hub.close(SensorKind::Magnetometer));
        assert_eq!(f.registers.writes().len(), writes_after_first_close);
        assert_eq!(f.allocator.outstanding(), 0);
    }

    #[test]
    fn test_session_already_open() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Magnetometer).unwrap();
        assert_eq!(
            f.hub.open(SensorKind::Magnetometer),
            Err(SfhError::SessionAlreadyOpen(SensorKind::Magnetometer))
        );
        assert_eq!(f.allocator.outstanding(), 1);
        f.hub.remove();
    }

    #[test]
    fn test_allocation_failure_is_isolated() {
        let f = fixture(0x1, HubConfig::default());
        f.allocator.fail_next_allocations(1);
        assert!(matches!(
            f.hub.open(SensorKind::Accelerometer),
            Err(SfhError::ResourceExhausted(_))
        ));
        assert_eq!(f.allocator.outstanding(), 0);
        assert!(command_words(&f.registers).is_empty());

        f.hub.open(SensorKind::Gyroscope).unwrap();
        assert_eq!(f.hub.open_sensors(), vec![SensorKind::Gyroscope]);
        f.hub.remove();
    }

    #[test]
    fn test_remove_stops_everything_and_clears_registers() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Accelerometer).unwrap();
        f.hub.open(SensorKind::LidSwitch).unwrap();
        f.registers.clear_log();

        f.hub.remove();
        assert!(f.hub.open_sensors().is_empty());
        assert_eq!(f.allocator.outstanding(), 0);

        let commands = command_words(&f.registers);
        assert_eq!(commands, vec![0x0000_0002, 0x0000_0F02, 0x0000_0008]);

        for offset in offsets::C2P_ALL.into_iter().chain(offsets::P2C_RESPONSE) {
            assert_eq!(f.registers.value(offset), 0, "register {:#x}", offset);
        }
        assert_eq!(f.registers.value(offsets::P2C_MSG3), 0x1);
    }

    #[test]
    fn test_drop_removes_open_sessions() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::AmbientLight).unwrap();
        let allocator = f.allocator.clone();
        let registers = f.registers.clone();
        drop(f);

        assert_eq!(allocator.outstanding(), 0);
        assert_eq!(command_words(&registers).last(), Some(&0x0000_0008));
    }
}

#[cfg(test)]
mod test_command_encoding {
    use super::*;

    #[test]
    fn test_enable_writes_address_before_command() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Accelerometer).unwrap();
        let address = f.allocator.live_device_addresses()[0];

        let events = f.registers.events();
        assert_eq!(
            &events[..5],
            &[
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG2,
                    value: address as u32
                },
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG3,
                    value: (address >> 32) as u32
                },
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG1,
                    value: 0x41
                },
                RegisterEvent::Barrier,
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG0,
                    value: 0x00C8_0001
                },
            ]
        );
        f.hub.remove();
    }

    #[test]
    fn test_v2_memory_type_only_for_ambient_light() {
        let f = fixture(0x2, HubConfig::default());
        f.hub.open(SensorKind::AmbientLight).unwrap();
        f.hub.open(SensorKind::Accelerometer).unwrap();
        assert_eq!(f.hub.mailbox().encoding(), Some(CommandEncoding::V2));

        let commands = command_words(&f.registers);
        let als = commands[0];
        let accel = commands[1];
        assert_eq!(als & 0xF, 1);
        assert_eq!((als >> 15) & 1, 1);
        assert_eq!((als >> 16) & 0xFF, 19);
        assert_eq!((als >> 24) & 0xFF, 200);
        assert_eq!((accel >> 15) & 1, 0);
        assert_eq!((accel >> 8) & 0x7F, 16);
        f.hub.remove();
    }

    #[test]
    fn test_unsupported_version_falls_back_to_v1() {
        let f = fixture(0b10100, HubConfig::default());
        let summary = f.hub.probe(None);
        assert_eq!(f.hub.mailbox().encoding(), Some(CommandEncoding::V1));
        assert_eq!(summary.opened, vec![SensorKind::Accelerometer]);
        assert_eq!(command_words(&f.registers), vec![0x00C8_0001]);
        f.hub.remove();
    }
}

#[cfg(test)]
mod test_probe {
    use super::*;

    #[test]
    fn test_probe_opens_firmware_mask() {
        let status = (SensorKind::Accelerometer.mask_bit() | SensorKind::LidSwitch.mask_bit()) << 4
            | 0x1;
        let f = fixture(status, HubConfig::default());
        let summary = f.hub.probe(None);
        assert_eq!(summary.source, MaskSource::Firmware);
        assert_eq!(
            summary.opened,
            vec![SensorKind::Accelerometer, SensorKind::LidSwitch]
        );
        assert!(summary.failed.is_empty());
        assert_eq!(f.allocator.outstanding(), 2);
        f.hub.remove();
    }

    #[test]
    fn test_override_wins_over_empty_firmware_mask() {
        let config = HubConfig {
            sensor_mask_override: Some(SensorMask::from_bits(0b111)),
            ..HubConfig::default()
        };
        let f = fixture(0, config);
        let summary = f.hub.probe(None);
        assert_eq!(summary.mask.bits(), 0b111);
        assert_eq!(summary.source, MaskSource::Override);
        assert_eq!(summary.opened.len(), 3);
        f.hub.remove();
    }

    #[test]
    fn test_quirk_used_when_firmware_reports_nothing() {
        let f = fixture(0x1, HubConfig::default());
        let platform = PlatformIdentity::new("HP", "8496", "92.48");
        let summary = f.hub.probe(Some(&platform));
        assert!(matches!(summary.source, MaskSource::Quirk(_)));
        assert_eq!(
            summary.opened,
            vec![
                SensorKind::Accelerometer,
                SensorKind::Magnetometer,
                SensorKind::LidSwitch
            ]
        );
        f.hub.remove();
    }

    #[test]
    fn test_empty_mask_probe_succeeds_with_nothing_open() {
        let f = fixture(0x1, HubConfig::default());
        let summary = f.hub.probe(None);
        assert_eq!(summary.source, MaskSource::Empty);
        assert!(summary.opened.is_empty());
        assert!(command_words(&f.registers).is_empty());
    }

    #[test]
    fn test_probe_continues_past_failed_sensor() {
        let status = (SensorKind::Accelerometer.mask_bit() | SensorKind::Gyroscope.mask_bit()) << 4;
        let f = fixture(status, HubConfig::default());
        f.allocator.fail_next_allocations(1);
        let summary = f.hub.probe(None);
        assert_eq!(summary.opened, vec![SensorKind::Gyroscope]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, SensorKind::Accelerometer);
        f.hub.remove();
    }
}

#[cfg(test)]
mod test_polling {
    use super::*;

    #[test]
    fn test_polling_delivers_decoded_samples() {
        let f = fixture(0x1, fast_polling());
        f.hub.open(SensorKind::Accelerometer).unwrap();
        let address = f.allocator.live_device_addresses()[0];
        let samples = RawSamples::from_signed([3000, -2000, 1000, 0]);
        f.allocator
            .write_device_words(address, samples.words())
            .unwrap();

        let delivered = wait_until(Duration::from_secs(5), || {
            f.transport
                .reports_for(SensorKind::Accelerometer)
                .iter()
                .any(|report| report.get(3..7) == Some(&3i32.to_le_bytes()[..]))
        });
        assert!(delivered, "no report with the written sample arrived");

        let (latest, polls) = f.hub.session_status(SensorKind::Accelerometer).unwrap();
        assert_eq!(latest, Some(samples));
        assert!(polls >= 1);

        let report = f.hub.input_report(SensorKind::Accelerometer, 1).unwrap();
        assert_eq!(report[0], 1);
        assert_eq!(&report[3..7], &3i32.to_le_bytes());
        assert_eq!(&report[7..11], &(-2i32).to_le_bytes());
        assert_eq!(&report[11..15], &1i32.to_le_bytes());
        f.hub.remove();
    }

    struct PanickingTransport;

    impl ReportTransport for PanickingTransport {
        fn deliver_input_report(&self, kind: SensorKind, _report: &[u8]) -> SfhResult<()> {
            panic!("{} report rejected", kind);
        }
    }

    #[test]
    fn test_panicking_transport_keeps_buffer_until_close() {
        let registers = RecordingRegisters::with_status(0x1);
        let allocator = Arc::new(HostDmaAllocator::new());
        let hub = SensorHub::new(
            registers.clone(),
            allocator.clone(),
            Arc::new(PanickingTransport),
            fast_polling(),
        );
        hub.open(SensorKind::Accelerometer).unwrap();

        let polled = wait_until(Duration::from_secs(5), || {
            matches!(hub.session_status(SensorKind::Accelerometer), Ok((_, polls)) if polls >= 3)
        });
        assert!(polled, "polling stopped after a panicking run");
        assert_eq!(allocator.outstanding(), 1);
        assert_eq!(command_words(&registers), vec![0x0005_0001]);

        assert!(hub.close(SensorKind::Accelerometer));
        assert_eq!(command_words(&registers), vec![0x0005_0001, 0x0000_0002]);
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_no_reports_after_close() {
        let f = fixture(0x1, fast_polling());
        f.hub.open(SensorKind::Gyroscope).unwrap();
        assert!(wait_until(Duration::from_secs(5), || !f.transport.is_empty()));

        f.hub.close(SensorKind::Gyroscope);
        let delivered = f.transport.len();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(f.transport.len(), delivered);
    }
}

#[cfg(test)]
mod test_raw_requests {
    use super::*;

    #[test]
    fn test_feature_and_input_requests() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::AmbientLight).unwrap();

        let feature = f
            .hub
            .raw_request(SensorKind::AmbientLight, 4, ReportType::Feature)
            .unwrap();
        assert_eq!(feature[0], 4);

        // nothing polled yet: all-zero samples
        let input = f
            .hub
            .raw_request(SensorKind::AmbientLight, 4, ReportType::Input)
            .unwrap();
        assert_eq!(input[0], 4);
        assert_eq!(
            input,
            sfh_reports::input_report_vec(SensorKind::AmbientLight, 4, &RawSamples::default())
                .unwrap()
        );
        f.hub.remove();
    }

    #[test]
    fn test_invalid_requests() {
        let f = fixture(0x1, HubConfig::default());
        f.hub.open(SensorKind::Accelerometer).unwrap();
        assert!(matches!(
            f.hub
                .raw_request(SensorKind::Accelerometer, 1, ReportType::Output),
            Err(SfhError::InvalidArgument(_))
        ));
        assert!(matches!(
            f.hub
                .raw_request(SensorKind::Accelerometer, 9, ReportType::Input),
            Err(SfhError::InvalidArgument(_))
        ));
        assert_eq!(
            f.hub.input_report(SensorKind::Gyroscope, 2),
            Err(SfhError::SensorNotOpen(SensorKind::Gyroscope))
        );
        f.hub.remove();
    }
}
