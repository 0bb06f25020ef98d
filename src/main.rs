//! Weft - MIDI events from wearable fabric sensors

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use weft::calibrate::{CalibrationStore, FileStore};
use weft::config;
use weft::engine::{list_ports, CollectSink, Engine, MidiOut};
use weft::sensors::ReplaySource;
use weft::{NUM_BEND, NUM_KEYS};

mod cli;

use cli::{Cli, Commands};

const BEND_LABELS: [&str; NUM_BEND] = ["right", "left", "middle"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config: config_path,
            replay,
            port,
            tick,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let cfg = config::load_config(&config_path)?;

            let store = FileStore::open(&cfg.touch.store_path, NUM_KEYS)?;
            let scripted = replay.is_some();
            let mut source = match &replay {
                Some(path) => {
                    println!("Replaying frames from {:?}...", path);
                    ReplaySource::from_file(path)?
                }
                None => ReplaySource::new(vec![]),
            };

            let midi_channel = cfg.events.midi_channel;
            let mut engine = Engine::new(cfg, &mut source, Box::new(store))?;
            let mut sink = MidiOut::connect(port.as_deref(), midi_channel)?;

            let running = Arc::new(AtomicBool::new(true));
            {
                let running = Arc::clone(&running);
                ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
            }

            println!("Polling every {} ms (Ctrl-C to stop)...", tick);
            while running.load(Ordering::SeqCst) {
                engine.tick(&mut source, &mut sink, Instant::now())?;
                if scripted && source.is_exhausted() {
                    break;
                }
                source.advance();
                std::thread::sleep(Duration::from_millis(tick));
            }
            println!("Stopped.");
        }

        Commands::Monitor {
            config: config_path,
            replay,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let cfg = config::load_config(&config_path)?;

            let store = FileStore::open(&cfg.touch.store_path, NUM_KEYS)?;
            let mut source = match &replay {
                Some(path) => ReplaySource::from_file(path)?,
                None => ReplaySource::new(vec![]),
            };

            let key_notes = cfg.events.key_notes.clone();
            let mut engine = Engine::new(cfg, &mut source, Box::new(store))?;
            let mut sink = CollectSink::default();

            loop {
                engine.tick(&mut source, &mut sink, Instant::now())?;
                if source.is_exhausted() {
                    break;
                }
                source.advance();
            }

            println!("\nBend channels:");
            for (i, label) in BEND_LABELS.iter().enumerate() {
                let channel = engine.bend_channel(i);
                println!(
                    "  {}: baseline {:.1}, range [{:.1}, {:.1}], bent: {}, frozen: {}",
                    label,
                    channel.baseline(),
                    channel.min_seen(),
                    channel.max_seen(),
                    channel.is_bent(),
                    channel.is_frozen()
                );
            }

            let stretch = engine.stretch_channel();
            println!(
                "Stretch: output {:.1}, range [{:.1}, {:.1}], stretched: {}",
                stretch.output(),
                stretch.min_seen(),
                stretch.max_seen(),
                engine.is_stretched()
            );

            println!("Keys:");
            for i in 0..NUM_KEYS {
                let key = engine.key_channel(i);
                println!(
                    "  {:2}: note {:3}, min capacitance {:3}, active: {}",
                    i,
                    key_notes[i],
                    key.min_cap(),
                    key.is_active()
                );
            }

            println!("\nEvents emitted: {}", sink.events.len());
            for event in &sink.events {
                println!("  {:?}", event);
            }
        }

        Commands::Ports => {
            println!("Available MIDI output ports:\n");

            let ports = list_ports()?;
            if ports.is_empty() {
                println!("  (none)");
            } else {
                for port in ports {
                    println!("  - {}", port);
                }
            }
        }

        Commands::Wipe {
            config: config_path,
        } => {
            let cfg = config::load_config(&config_path)?;
            let mut store = FileStore::open(&cfg.touch.store_path, NUM_KEYS)?;
            store.wipe()?;
            println!("Calibration store {:?} reset.", cfg.touch.store_path);
        }

        Commands::Check {
            config: config_path,
        } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Input voltage: {} V", cfg.sensor.input_voltage);
                    println!(
                        "  Reference resistance: {} ohm",
                        cfg.sensor.reference_resistance
                    );
                    println!("  Calibration alpha: {}", cfg.calibration.alpha);
                    println!(
                        "  Bend threshold ratio: {}",
                        cfg.calibration.bend_threshold_ratio
                    );
                    println!(
                        "  Filter: {}",
                        if cfg.calibration.filter.enabled {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    );
                    println!("  MIDI channel: {}", cfg.events.midi_channel);
                    println!("  Drum note: {}", cfg.events.drum_note);
                    println!("  Key notes: {:?}", cfg.events.key_notes);
                    println!("  Store path: {:?}", cfg.touch.store_path);
                }
                Err(e) => {
                    println!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../weft.example.yaml");

            let path = "weft.yaml";
            if std::path::Path::new(path).exists() {
                println!("weft.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created weft.yaml with example configuration.");
            }
        }
    }

    Ok(())
}
