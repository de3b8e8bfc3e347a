//! kopad — play text drum patterns and scale sequences on the EP-133 K.O. II.
//!
//! ```bash
//! # list MIDI outputs
//! kopad ports
//!
//! # play a pattern file (or stdin) at 100 BPM
//! kopad drum beat.txt --bpm 100
//!
//! # degrees of A minor pentatonic, 0 is a rest
//! kopad scale-play A minor_pentatonic A 1 3 5 0 -2 1
//!
//! # log the notes instead of sending them
//! kopad --dry-run drum beat.txt
//!
//! # clock the device at 98 BPM for 30 seconds
//! kopad clock --bpm 98 --seconds 30
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kopad::controller::{parse_note_step, Controller};
use kopad::error::seconds;
use kopad::midi::{list_ports, Config, MidiOut, PortSelector};
use kopad::pad::{pad_help, PadChannel};
use kopad::playback::{DeviceSink, LogSink, MidiChannel, PlaybackReport, Session};
use kopad::scale::{scale_help, ScaleSequence};
use kopad::{NoteInput, Result};

/// Text drum patterns and scale sequences to MIDI for the EP-133 K.O. II
#[derive(Parser)]
#[command(name = "kopad")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ~/.kopad/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output port name, exact or substring
    #[arg(long, global = true)]
    port: Option<String>,

    /// Output port index (see `kopad ports`)
    #[arg(long, global = true)]
    port_index: Option<usize>,

    /// MIDI channel, 1-16
    #[arg(long, global = true)]
    channel: Option<u8>,

    /// Log notes instead of sending MIDI
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List MIDI output ports
    Ports,

    /// Play a single note by number (36) or name (C3)
    Note {
        note: NoteInput,
        #[arg(long)]
        velocity: Option<u8>,
        /// Hold time in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Play notes in order, each `note[:velocity[:seconds]]`
    Sequence {
        #[arg(required = true)]
        steps: Vec<String>,
    },

    /// Play a text drum pattern from a file, or stdin when omitted or `-`
    Drum {
        file: Option<PathBuf>,
        #[arg(long)]
        bpm: Option<f64>,
    },

    /// List sound categories
    Categories,

    /// List the sounds in a category
    Sounds { category: String },

    /// Show the default pad assignment
    Pads,

    /// List available scales
    Scales,

    /// Show which note each pad plays for a scale
    ScaleMap {
        /// Pad channel, A-D
        group: PadChannel,
        scale: String,
        root: String,
        #[arg(long)]
        octave: Option<i32>,
    },

    /// Play scale degrees (1-based, 0 = rest, negative = below the root)
    ScalePlay {
        /// Pad channel, A-D
        group: PadChannel,
        scale: String,
        root: String,
        #[arg(required = true, allow_negative_numbers = true)]
        degrees: Vec<i32>,
        #[arg(long)]
        octave: Option<i32>,
        #[arg(long)]
        velocity: Option<u8>,
        /// Hold time in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Silence between notes in seconds
        #[arg(long)]
        gap: Option<f64>,
    },

    /// Switch the sample on the channel with a program change, 0-127
    Program { program: u8 },

    /// Send MIDI clock (start, 24 pulses per beat, stop)
    Clock {
        #[arg(long)]
        bpm: Option<f64>,
        /// Seconds to run the clock
        #[arg(long, default_value_t = 4.0)]
        seconds: f64,
    },

    /// Explain the drum pattern notation
    HelpPattern,

    /// Explain pad labels, notes and the default kit
    HelpPads,

    /// Explain scale mode
    HelpScales,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load().unwrap_or_default(),
    };
    let channel = match cli.channel {
        Some(n) => MidiChannel::new(n)?,
        None => config.midi_channel,
    };
    let velocity = |v: Option<u8>| v.unwrap_or(config.velocity);
    let duration = |d: Option<f64>| seconds(d.unwrap_or(config.note_duration));

    match &cli.command {
        Command::Ports => {
            let ports = list_ports()?;
            if cli.json {
                return print_json(&ports);
            }
            if ports.is_empty() {
                println!("no MIDI output ports");
            }
            for (i, name) in ports.iter().enumerate() {
                println!("{i}: {name}");
            }
            Ok(())
        }
        Command::Categories => {
            let controller = Controller::new(LogSink::new());
            let categories = controller.list_sound_categories();
            if cli.json {
                return print_json(&categories);
            }
            for c in categories {
                println!("{:<20} {} sounds", c.name, c.sounds);
            }
            Ok(())
        }
        Command::Sounds { category } => {
            let sounds = Controller::new(LogSink::new()).list_sounds_in_category(category)?;
            if cli.json {
                return print_json(&sounds);
            }
            for s in sounds {
                println!("{:>4}  {}", s.id, s.name);
            }
            Ok(())
        }
        Command::Pads => {
            let layout = Controller::new(LogSink::new()).default_pad_configuration();
            if cli.json {
                return print_json(&layout);
            }
            for channel in layout {
                println!("Channel {}", channel.channel);
                for row in channel.rows {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|p| format!("{:<3} {:>2} {:<16}", p.pad.to_string(), p.note, p.sound_name))
                        .collect();
                    println!("  {}", cells.join(" | "));
                }
            }
            Ok(())
        }
        Command::Scales => {
            let scales = Controller::new(LogSink::new()).list_available_scales();
            if cli.json {
                return print_json(&scales);
            }
            for s in scales {
                println!("{:<18} {}", s.name, s.description);
            }
            Ok(())
        }
        Command::ScaleMap {
            group,
            scale,
            root,
            octave,
        } => {
            let mapping = Controller::new(LogSink::new()).scale_mapping(
                *group,
                scale,
                root,
                octave.unwrap_or(config.octave),
            )?;
            if cli.json {
                return print_json(&mapping);
            }
            println!(
                "{} scale in {} (octave {}) on channel {}",
                mapping.scale, mapping.root, mapping.octave, mapping.channel
            );
            for (pad, note) in &mapping.pads {
                println!("  {:<3} {:>3}  {}", pad.to_string(), note.note, note.note_name);
            }
            Ok(())
        }
        Command::HelpPattern => {
            print!("{}", kopad::pattern::pattern_help());
            Ok(())
        }
        Command::HelpPads => {
            print!("{}", pad_help());
            Ok(())
        }
        Command::HelpScales => {
            print!("{}", scale_help());
            Ok(())
        }
        Command::Program { program } => {
            with_controller(&cli, &config, channel, |c| c.program_change(*program, None))?;
            println!("sent program change {program} on channel {channel}");
            Ok(())
        }
        Command::Clock { bpm, seconds: secs } => {
            let bpm = bpm.unwrap_or(config.bpm);
            let run_for = seconds(*secs)?;
            let report = with_controller(&cli, &config, channel, |c| c.send_clock(bpm, run_for))?;
            if cli.json {
                return print_json(&report);
            }
            println!("{report}");
            Ok(())
        }
        Command::Note {
            note,
            velocity: v,
            duration: d,
        } => {
            let (hold, vel) = (duration(*d)?, velocity(*v));
            let report = with_controller(&cli, &config, channel, |c| {
                c.play_note(note, vel, hold, None)
            })?;
            print_report(&report, cli.json)
        }
        Command::Sequence { steps } => {
            let hold = duration(None)?;
            let notes = steps
                .iter()
                .map(|s| parse_note_step(s, config.velocity, hold))
                .collect::<Result<Vec<_>>>()?;
            let report = with_controller(&cli, &config, channel, |c| c.play_pattern(&notes, None))?;
            print_report(&report, cli.json)
        }
        Command::Drum { file, bpm } => {
            let text = read_pattern(file.as_ref())?;
            let bpm = bpm.unwrap_or(config.bpm);
            let report =
                with_controller(&cli, &config, channel, |c| c.play_drum_pattern(&text, bpm))?;
            print_report(&report, cli.json)
        }
        Command::ScalePlay {
            group,
            scale,
            root,
            degrees,
            octave,
            velocity: v,
            duration: d,
            gap,
        } => {
            let sequence = ScaleSequence {
                channel: *group,
                scale,
                root,
                octave: octave.unwrap_or(config.octave),
                degrees,
                velocity: velocity(*v),
                duration: duration(*d)?,
                gap: seconds(gap.unwrap_or(config.note_gap))?,
            };
            let report = with_controller(&cli, &config, channel, |c| {
                c.play_scale_sequence(&sequence)
            })?;
            print_report(&report, cli.json)
        }
    }
}

/// Open the output (or a log sink for dry runs) and run `f` against it,
/// stopping between steps on Ctrl-C.
fn with_controller<T>(
    cli: &Cli,
    config: &Config,
    channel: MidiChannel,
    f: impl FnOnce(&mut Controller<Box<dyn DeviceSink>>) -> Result<T>,
) -> Result<T> {
    let sink: Box<dyn DeviceSink> = if cli.dry_run {
        info!("dry run: notes are logged, not sent");
        Box::new(LogSink::new())
    } else {
        let selector = PortSelector::from_options(
            cli.port.clone().or_else(|| config.device_name.clone()),
            cli.port_index.or(config.port_index),
        );
        Box::new(MidiOut::connect(&selector)?)
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        warn!(error = %e, "cannot install Ctrl-C handler");
    }

    let session = Session::new(sink)
        .with_channel(channel)
        .with_cancel_flag(cancel);
    let mut controller = Controller::with_session(session);
    f(&mut controller)
}

fn read_pattern(file: Option<&PathBuf>) -> Result<String> {
    let mut text = String::new();
    match file {
        Some(path) if path.as_os_str() != "-" => {
            text = std::fs::read_to_string(path).map_err(|e| kopad::Error::Input {
                path: path.clone(),
                source: e,
            })?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| kopad::Error::Input {
                    path: PathBuf::from("-"),
                    source: e,
                })?;
        }
    }
    Ok(text)
}

fn print_report(report: &PlaybackReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("{report}");
    for (reference, note) in &report.recognized {
        println!("  {reference} -> {note}");
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(kopad::Error::Json)?;
    println!("{text}");
    Ok(())
}
