//! Command-line driver: loads a `.bog` file, runs the scheduler for a
//! bounded duration, and prints every dispatched event.

use bog::{AudioCallbacks, Scheduler, TermArena};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bog", about = "Run a Bog live-coding program for a fixed duration")]
struct Cli {
    /// Path to a .bog source file.
    file: PathBuf,

    /// Tempo in beats per minute.
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// How long to run, in seconds.
    #[arg(long, default_value_t = 4.0)]
    seconds: f64,

    /// Scheduler lookahead window, in seconds.
    #[arg(long, default_value_t = 0.2)]
    lookahead: f64,

    /// Sampling grid resolution, in seconds.
    #[arg(long, default_value_t = 0.05)]
    subdivision: f64,

    /// Swing amount in [0, 1).
    #[arg(long, default_value_t = 0.0)]
    swing: f64,
}

struct PrintingCallbacks;

impl AudioCallbacks for PrintingCallbacks {
    fn kick(&mut self, time: f64, vel: f64) {
        println!("t={:.3} kick vel={:.2}", time, vel);
    }
    fn snare(&mut self, time: f64, vel: f64) {
        println!("t={:.3} snare vel={:.2}", time, vel);
    }
    fn hat(&mut self, time: f64, vel: f64) {
        println!("t={:.3} hat vel={:.2}", time, vel);
    }
    fn clap(&mut self, time: f64, vel: f64) {
        println!("t={:.3} clap vel={:.2}", time, vel);
    }
    fn noise(&mut self, time: f64, vel: f64) {
        println!("t={:.3} noise vel={:.2}", time, vel);
    }
    fn sine(&mut self, time: f64, note: f64, vel: f64) {
        println!("t={:.3} sine note={:.2} vel={:.2}", time, note, vel);
    }
    fn square(&mut self, time: f64, note: f64, vel: f64) {
        println!("t={:.3} square note={:.2} vel={:.2}", time, note, vel);
    }
    fn triangle(&mut self, time: f64, note: f64, vel: f64) {
        println!("t={:.3} triangle note={:.2} vel={:.2}", time, note, vel);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {}: {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };

    let arena = TermArena::new();
    let mut scheduler = Scheduler::new(&arena, cli.bpm, cli.lookahead, cli.subdivision, cli.swing);
    if let Err(e) = scheduler.set_program(&source) {
        eprintln!("failed to parse {}: {}", cli.file.display(), e);
        std::process::exit(1);
    }
    scheduler.start();

    let mut callbacks = PrintingCallbacks;
    let total_ticks = (cli.seconds / cli.subdivision.max(0.001)).ceil() as u64;
    bog::runtime::run_for(&mut scheduler, cli.subdivision, total_ticks, &mut callbacks).await;
}
