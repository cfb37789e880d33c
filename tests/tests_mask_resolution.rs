// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh::driver::mask::{resolve, resolve_mask, CAPABILITY_MASK_SHIFT};
use sfh::driver::quirks::QUIRKS;
use sfh::prelude::*;

fn hp_envy() -> PlatformIdentity {
    PlatformIdentity::new("HP", "8497", "92.48")
}

fn unknown_board() -> PlatformIdentity {
    PlatformIdentity::new("LENOVO", "LNVNB161216", "SDK0J40697 WIN")
}

#[cfg(test)]
mod test_documented_scenarios {
    use super::*;

    #[test]
    fn test_shifted_register_selects_accelerometer() {
        let mask = resolve_mask(0b10100, None, None);
        assert_eq!(mask.bits(), 0b1);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![SensorKind::Accelerometer]);
    }

    #[test]
    fn test_override_with_empty_register() {
        let override_mask = SensorMask::from_bits(0b111);
        for platform in [None, Some(hp_envy()), Some(unknown_board())] {
            let mask = resolve_mask(0, Some(override_mask), platform.as_ref());
            assert_eq!(mask.bits(), 0b111);
        }
    }
}

#[cfg(test)]
mod test_resolution_order {
    use super::*;

    #[test]
    fn test_override_always_wins() {
        let registers = [0u32, 0x11, 0b10100, 0xFFFF_FFF0];
        let overrides = [0u32, 0b1, 0b111, SensorKind::AmbientLight.mask_bit()];
        for raw in registers {
            for bits in overrides {
                let resolved = resolve(raw, Some(SensorMask::from_bits(bits)), Some(&hp_envy()));
                assert_eq!(resolved.mask.bits(), bits, "raw {:#x}", raw);
                assert_eq!(resolved.source, MaskSource::Override);
            }
        }
    }

    #[test]
    fn test_nonzero_register_beats_quirks() {
        for kind in SensorKind::ALL {
            let raw = (kind.mask_bit() << CAPABILITY_MASK_SHIFT) | 0x1;
            let resolved = resolve(raw, None, Some(&hp_envy()));
            assert_eq!(resolved.source, MaskSource::Firmware);
            assert_eq!(resolved.mask.iter().collect::<Vec<_>>(), vec![kind]);
        }
    }

    #[test]
    fn test_version_bits_alone_count_as_empty() {
        for version in 0..16u32 {
            let resolved = resolve(version, None, None);
            assert_eq!(resolved.source, MaskSource::Empty, "version {}", version);
            assert!(resolved.mask.is_empty());
        }
    }

    #[test]
    fn test_every_quirk_entry_is_reachable() {
        for entry in QUIRKS.iter() {
            let platform =
                PlatformIdentity::new(entry.vendor, entry.board_name, entry.board_version);
            let resolved = resolve(0, None, Some(&platform));
            assert_eq!(resolved.source, MaskSource::Quirk(entry.ident));
            assert_eq!(resolved.mask, entry.sensor_mask);
        }
    }

    #[test]
    fn test_unmatched_platform_resolves_empty() {
        let resolved = resolve(0, None, Some(&unknown_board()));
        assert_eq!(resolved.source, MaskSource::Empty);
        assert!(resolved.mask.is_empty());

        let near_miss = PlatformIdentity::new("HP", "8496", "92.49");
        assert!(resolve_mask(0, None, Some(&near_miss)).is_empty());
    }
}
