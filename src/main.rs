//! Smart Sign Trainer - sign language games and camera practice for kids
//!
//! Single-binary, self-contained CLI application.
//! Uses Candle for hand landmark detection and kNN sign classification.

mod cli;
mod content;
mod recognize;
mod screens;
mod session;
mod storage;

use clap::Parser;
use cli::display::Display;
use cli::input::InputHandler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recognize::{CaptureSession, HandposeModel, ReplayCamera};
use screens::AppStats;
use std::error::Error;
use std::path::Path;
use storage::LocalStore;

#[derive(Parser, Debug)]
#[command(name = "Smart Sign Trainer")]
#[command(about = "Sign language games and camera practice for kids")]
struct Args {
    /// Data directory for the profile and trained examples
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    /// Path to detector weights
    #[arg(short, long, default_value = "models/handpose.bin")]
    model: String,

    /// Directory of replay frames standing in for the camera
    #[arg(short, long, default_value = "data/camera")]
    frames: String,

    /// Seed for reproducible shuffles
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("🤟 Smart Sign Trainer v0.1.0");
    println!(
        "Data: {} | Model: {} | Frames: {}",
        args.data_dir, args.model, args.frames
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = LocalStore::open(Path::new(&args.data_dir))?;

    // Camera practice resources; the screens run without them, degraded
    let mut capture = CaptureSession::new(store.clone());
    let detector = HandposeModel::load(&args.model)?;
    if detector.is_loaded() {
        if args.debug {
            let net = detector.config();
            println!(
                "✓ Landmark model: {}x{} input, {} hidden units",
                net.input_side, net.input_side, net.hidden_size
            );
        }
        capture.attach_detector(Box::new(detector));
    }
    match ReplayCamera::open(Path::new(&args.frames)) {
        Ok(camera) => {
            if args.debug {
                println!("✓ Camera replay: {} frames", camera.frame_count());
            }
            capture.attach_camera(Box::new(camera));
        }
        Err(e) => {
            eprintln!("⚠ Camera unavailable: {}", e);
        }
    }
    let restored = capture.initialize()?;
    if args.debug && restored > 0 {
        println!("✓ Restored examples for {} signs", restored);
    }

    // Initialize display
    let display = Display::simple()?;
    display.clear()?;

    // Initialize input handler
    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();

    let mut stats = AppStats::default();
    let menu = [
        "📖 Learn Signs",
        "🔍 Identify the Sign",
        "⏰ Beat the Timer",
        "🧩 Match the Signs",
        "🎥 Practice with Camera",
        "🧒 My Profile",
    ];
    let mut dirty = true;

    // Home menu loop
    'home: loop {
        if dirty {
            dirty = false;
            let profile = store.load_profile().unwrap_or_default();
            display.clear()?;
            display.show_title(&format!("🤟 Smart Sign, hello {}!", profile.name))?;
            display.show_prompt("What shall we do today?")?;
            let lines: Vec<String> = menu
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}) {}", i + 1, item))
                .collect();
            display.show_lines(&lines, 4)?;
            display.show_help(11, "1-6 choose  |  Esc quit")?;
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                break 'home;
            }
            if let Some(choice) = InputHandler::digit_choice(&key) {
                match choice {
                    0 => screens::learn::run_learn(&display, &input)?,
                    1 => {
                        if let Some(report) =
                            screens::games::run_identify(&display, &input, &mut rng)?
                        {
                            stats.record(&report);
                        }
                    }
                    2 => {
                        if let Some(report) =
                            screens::games::run_timer(&display, &input, &mut rng)?
                        {
                            stats.record(&report);
                        }
                    }
                    3 => {
                        if let Some(report) =
                            screens::games::run_match(&display, &input, &mut rng)?
                        {
                            stats.record(&report);
                        }
                    }
                    4 => {
                        // Leaving practice releases the camera, so reopen it
                        if !capture.has_camera() {
                            if let Ok(camera) = ReplayCamera::open(Path::new(&args.frames)) {
                                capture.attach_camera(Box::new(camera));
                            }
                        }
                        screens::capture::run_practice(&display, &input, &mut capture)?;
                    }
                    5 => screens::profile::run_profile(&display, &input, &store, &stats)?,
                    _ => continue,
                }
                dirty = true;
            }
        }
    }

    // Cleanup
    InputHandler::disable_raw_mode()?;
    display.shutdown()?;

    // Summary
    println!("\n🎉 See you next time!");
    if stats.games_played > 0 {
        println!(
            "📊 Today: {} games | {} stars | best score {}",
            stats.games_played, stats.total_stars, stats.best_score
        );
    }
    if capture.total_examples() > 0 {
        println!("🧠 Trained examples saved: {}", capture.total_examples());
    }
    println!("🤟 Thanks for practicing!");

    Ok(())
}
