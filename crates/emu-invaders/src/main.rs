//! Space Invaders board emulator - headless runner.
//!
//! Usage: emu-invaders --roms <dir> [--frames <n>] [--config <file>]
//!        [--press <button>@<frame>] [--dump-frame <file>] [--query <path>]
//!        [--realtime] [--log-level <level>]

use std::fs;
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use emu_core::Observable;
use emu_invaders::{Button, Invaders, InvadersConfig, RomSet};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Frames a scripted button press is held for.
const PRESS_HOLD_FRAMES: u64 = 5;

struct CliArgs {
    roms: Option<PathBuf>,
    frames: u64,
    config_path: Option<PathBuf>,
    dump_frame: Option<PathBuf>,
    queries: Vec<String>,
    presses: Vec<(Button, u64)>,
    realtime: bool,
    log_level: LevelFilter,
}

fn print_usage() {
    eprintln!("Usage: emu-invaders [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --roms <dir>             Directory holding invaders.h/.g/.f/.e");
    eprintln!("  --frames <n>             Number of frames to run [default: 120]");
    eprintln!("  --config <file>          JSON board configuration");
    eprintln!("  --press <button>@<frame> Press a button at a frame (repeatable)");
    eprintln!("                           buttons: coin, p1-start, p2-start, p1-fire, p1-left,");
    eprintln!("                           p1-right, p2-fire, p2-left, p2-right, tilt");
    eprintln!("  --dump-frame <file>      Write the final 1-bpp framebuffer snapshot");
    eprintln!("  --query <path>           Print an observable value at exit (repeatable)");
    eprintln!("  --realtime               Pace frames at the configured refresh rate");
    eprintln!("  --log-level <level>      off, error, warn, info, debug, trace [default: warn]");
}

fn parse_press(text: &str) -> Option<(Button, u64)> {
    let (button, frame) = text.split_once('@')?;
    Some((button.parse().ok()?, frame.parse().ok()?))
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        roms: None,
        frames: 120,
        config_path: None,
        dump_frame: None,
        queries: Vec::new(),
        presses: Vec::new(),
        realtime: false,
        log_level: LevelFilter::Warn,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--roms" => {
                i += 1;
                cli.roms = args.get(i).map(PathBuf::from);
            }
            "--frames" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.frames = s.parse().unwrap_or(120);
                }
            }
            "--config" => {
                i += 1;
                cli.config_path = args.get(i).map(PathBuf::from);
            }
            "--dump-frame" => {
                i += 1;
                cli.dump_frame = args.get(i).map(PathBuf::from);
            }
            "--query" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.queries.push(s.clone());
                }
            }
            "--press" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    match parse_press(s) {
                        Some(press) => cli.presses.push(press),
                        None => {
                            eprintln!("Invalid --press value: {s} (expected <button>@<frame>)");
                            process::exit(1);
                        }
                    }
                }
            }
            "--realtime" => {
                cli.realtime = true;
            }
            "--log-level" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    match s.parse() {
                        Ok(level) => cli.log_level = level,
                        Err(_) => {
                            eprintln!("Invalid log level: {s}");
                            process::exit(1);
                        }
                    }
                }
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_logging(level: LevelFilter) {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level));

    let result = match config {
        Ok(config) => log4rs::init_config(config).map(|_| ()).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {e}");
    }
}

fn load_config(cli: &CliArgs) -> InvadersConfig {
    match cli.config_path {
        Some(ref path) => match InvadersConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => InvadersConfig::default(),
    }
}

fn make_invaders(cli: &CliArgs, config: &InvadersConfig) -> Invaders {
    let Some(ref dir) = cli.roms else {
        eprintln!("No ROM directory given (use --roms <dir>)");
        process::exit(1);
    };
    let roms = match RomSet::from_dir(dir) {
        Ok(roms) => roms,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    match Invaders::new(config, &roms) {
        Ok(invaders) => invaders,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = parse_args();
    init_logging(cli.log_level);

    let config = load_config(&cli);
    let mut invaders = make_invaders(&cli, &config);
    for &(button, frame) in &cli.presses {
        invaders
            .input_queue()
            .enqueue_button(button, frame, PRESS_HOLD_FRAMES);
    }

    let fps = u32::try_from(config.frames_per_second).unwrap_or(60).max(1);
    let frame_time = Duration::from_secs(1) / fps;
    for _ in 0..cli.frames {
        let started = Instant::now();
        invaders.run_frame();
        if cli.realtime {
            if let Some(remaining) = frame_time.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    let unimplemented = invaders.cpu().unimplemented_count();
    if unimplemented > 0 {
        log::warn!("{unimplemented} unimplemented opcodes executed");
    }
    log::info!(
        "ran {} frames, {} cycles",
        invaders.frame_count(),
        invaders.total_ticks().get()
    );

    if let Some(ref path) = cli.dump_frame {
        if let Err(e) = fs::write(path, invaders.frame()) {
            eprintln!("Frame dump error: {e}");
            process::exit(1);
        }
        eprintln!("Frame saved to {}", path.display());
    }

    for path in &cli.queries {
        match invaders.query(path) {
            Some(value) => println!("{path} = {value}"),
            None => println!("{path} = <unknown>"),
        }
    }
}
