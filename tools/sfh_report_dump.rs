// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Report descriptor and report dumper.
//!
//! Resolves a sensor mask from the command line and configuration, then prints every enabled
//! kind's descriptor (hex plus the report sizes the schema parser finds) and its default
//! feature report. Raw sample words, when given, are decoded into each kind's input report.
//! `--simulate` runs the same kinds through a host-memory hub and prints the polled reports.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use sfh::config::{load_config, parse_mask};
use sfh::driver::{resolve, CollectingTransport, HubConfig, PlatformIdentity, SensorHub};
use sfh::hal::{HostDmaAllocator, RecordingRegisters};
use sfh::observability::{debug_flags_help, init_logging, parse_debug_flags};
use sfh::reports::{descriptor, feature_report_vec, input_report_vec, parse_descriptor};
use sfh::structures::{RawSamples, SensorKind, SensorMask, RAW_SAMPLE_WORDS};
use tracing::{info, warn};

const SIMULATION_TIMEOUT: Duration = Duration::from_secs(2);

struct Args {
    config: Option<PathBuf>,
    mask: Option<u32>,
    status: u32,
    platform: Option<PlatformIdentity>,
    samples: Option<RawSamples>,
    simulate: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: sfh_report_dump [--config <path>] [--mask <bits>] [--status <raw>]\n\
         \x20                      [--board <vendor>,<name>,<version>] [--simulate]\n\
         \x20                      [<sample word> ...]\n\n\
         Masks and status values accept decimal, 0x hex or 0b binary.\n\
         Up to {} signed sample words are decoded into every input report.\n\n{}",
        RAW_SAMPLE_WORDS,
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        mask: None,
        status: 0,
        platform: None,
        samples: None,
        simulate: false,
    };
    let mut words: Vec<i32> = Vec::new();

    let mut argv = env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                let value = argv.next().unwrap_or_else(|| usage_and_exit());
                args.config = Some(PathBuf::from(value));
            }
            "--mask" => {
                let value = argv.next().unwrap_or_else(|| usage_and_exit());
                args.mask = Some(parse_mask(&value).context("--mask")?);
            }
            "--status" => {
                let value = argv.next().unwrap_or_else(|| usage_and_exit());
                args.status = parse_mask(&value).context("--status")?;
            }
            "--board" => {
                let value = argv.next().unwrap_or_else(|| usage_and_exit());
                let parts: Vec<&str> = value.split(',').map(str::trim).collect();
                let [vendor, name, version] = parts.as_slice() else {
                    bail!("--board expects <vendor>,<name>,<version>, got {:?}", value);
                };
                args.platform = Some(PlatformIdentity::new(*vendor, *name, *version));
            }
            "--simulate" => args.simulate = true,
            "-h" | "--help" => usage_and_exit(),
            flag if flag.starts_with("--debug-") => {}
            other => {
                let word = other
                    .parse::<i32>()
                    .with_context(|| format!("unknown argument or sample word {:?}", other))?;
                words.push(word);
            }
        }
    }

    if words.len() > RAW_SAMPLE_WORDS {
        bail!(
            "at most {} sample words, got {}",
            RAW_SAMPLE_WORDS,
            words.len()
        );
    }
    if !words.is_empty() {
        let mut values = [0i32; RAW_SAMPLE_WORDS];
        values[..words.len()].copy_from_slice(&words);
        args.samples = Some(RawSamples::from_signed(values));
    }
    Ok(args)
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

fn dump_kind(kind: SensorKind, samples: Option<&RawSamples>) -> Result<()> {
    let report_id = kind.default_report_id();
    let bytes = descriptor(kind);
    let summary =
        parse_descriptor(bytes).with_context(|| format!("{} descriptor does not parse", kind))?;

    println!("== {} (report id {:#04x}) ==", kind, report_id);
    println!("descriptor: {} bytes", bytes.len());
    for chunk in bytes.chunks(16) {
        println!("  {}", hex(chunk));
    }
    for layout in &summary.reports {
        println!(
            "  report {:#04x}: feature {} bytes, input {} bytes, output {} bytes",
            layout.report_id,
            layout.feature_len(),
            layout.input_len(),
            layout.output_len()
        );
    }

    let feature = feature_report_vec(kind, report_id)?;
    println!("feature report: {}", hex(&feature));
    if let Some(samples) = samples {
        let input = input_report_vec(kind, report_id, samples)?;
        println!("input report:   {}", hex(&input));
    }
    println!();
    Ok(())
}

fn simulate(config: HubConfig, status: u32, mask: SensorMask, samples: RawSamples) -> Result<()> {
    let registers = RecordingRegisters::with_status(status);
    let allocator = Arc::new(HostDmaAllocator::new());
    let transport = Arc::new(CollectingTransport::new());
    let hub = SensorHub::new(
        registers,
        allocator.clone(),
        transport.clone(),
        HubConfig {
            sensor_mask_override: Some(mask),
            ..config
        },
    );

    let summary = hub.probe(None);
    for (kind, err) in &summary.failed {
        warn!("{} did not open: {}", kind, err);
    }
    for address in allocator.live_device_addresses() {
        allocator.write_device_words(address, samples.words())?;
    }

    let deadline = Instant::now() + SIMULATION_TIMEOUT;
    while Instant::now() < deadline
        && summary
            .opened
            .iter()
            .any(|kind| transport.reports_for(*kind).is_empty())
    {
        thread::sleep(Duration::from_millis(10));
    }

    println!("== simulated polling ({} command layout) ==", hub.mailbox().select_encoding());
    for kind in &summary.opened {
        match transport.reports_for(*kind).last() {
            Some(report) => println!("{:>14}: {}", kind.name(), hex(report)),
            None => println!("{:>14}: no report within {:?}", kind.name(), SIMULATION_TIMEOUT),
        }
    }
    println!("{}", hub.mailbox().capture_response());
    hub.remove();
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = load_config(args.config.as_deref(), None::<&HashMap<String, String>>)
        .context("loading configuration")?;
    let debug_flags = parse_debug_flags();
    let _logging = init_logging(&config.logging, &debug_flags)?;

    let override_mask = args
        .mask
        .map(SensorMask::from_bits)
        .or_else(|| config.driver.mask_override());
    let resolved = resolve(args.status, override_mask, args.platform.as_ref());
    info!("Resolved mask {} ({:?})", resolved.mask, resolved.source);
    if resolved.mask.is_empty() {
        println!("No sensors enabled; pass --mask or --status");
        return Ok(());
    }

    for kind in resolved.mask {
        dump_kind(kind, args.samples.as_ref())?;
    }

    if args.simulate {
        let samples = args.samples.unwrap_or_default();
        simulate(
            HubConfig::from(&config.driver),
            args.status,
            resolved.mask,
            samples,
        )?;
    }
    Ok(())
}
