use anyhow::{Context, Result};
use clap::Parser;
use sightline::camera::SyntheticCamera;
use sightline::classify::{LabelTable, LumaClassifier};
use sightline::cli::Cli;
use sightline::config::Config;
use sightline::defaults;
use sightline::pipeline::{GestureEvent, Pipeline, PipelineHandle, StdoutDisplay};
use sightline::speech::{NullSynthesizer, SpdSynthesizer, SpeechSynthesizer};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Demo label set when no label file is configured. Paired with the
/// brightness classifier: indices run dark to bright.
const DEMO_LABELS: [&str; 10] = [
    "night",
    "cellar",
    "dusk",
    "indoors",
    "overcast",
    "shade",
    "daylight",
    "open sky",
    "snowfield",
    "floodlight",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(min_interval) = cli.min_interval {
        config.pipeline.min_interval_ms = min_interval.as_millis() as u64;
    }
    if let Some(display_top) = cli.display_top {
        config.pipeline.display_top = display_top;
    }
    if cli.quiet {
        config.pipeline.quiet = true;
    }
    if cli.no_speech {
        config.speech.enabled = false;
    }
    if let Some(labels) = cli.labels {
        config.labels.path = Some(labels);
    }

    let labels = match &config.labels.path {
        Some(path) => LabelTable::from_file(path)
            .with_context(|| format!("loading labels from {}", path.display()))?,
        None => LabelTable::from_lines(DEMO_LABELS),
    };
    anyhow::ensure!(!labels.is_empty(), "label table is empty");

    let camera = Box::new(SyntheticCamera::new(config.camera.width, config.camera.height));
    let classifier = Arc::new(LumaClassifier::new(labels.len(), defaults::TOP_K));
    let synthesizer: Arc<dyn SpeechSynthesizer> = if config.speech.enabled {
        Arc::new(SpdSynthesizer::system().with_command(&config.speech.command))
    } else {
        Arc::new(NullSynthesizer)
    };

    let handle = Pipeline::new(config.pipeline_config())
        .start(
            camera,
            classifier,
            labels,
            Box::new(StdoutDisplay),
            synthesizer,
        )
        .context("starting pipeline")?;

    if let Some(duration) = cli.duration {
        std::thread::sleep(duration);
    } else {
        run_gesture_loop(&handle)?;
    }

    handle.stop();
    println!();
    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. sightline.toml in the working directory, if present
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(Path::new("sightline.toml"))?
    };
    Ok(config.with_env_overrides())
}

/// Read gesture commands from stdin until quit or EOF.
///
/// `press` and `release` drive the speech toggle the way a touch long-press
/// would; `tap` exercises the no-op gesture path.
fn run_gesture_loop(handle: &PipelineHandle) -> Result<()> {
    eprintln!("sightline: commands: press, release, tap, quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "press" => handle.gesture(GestureEvent::PressBegin),
            "release" => handle.gesture(GestureEvent::PressEnd),
            "tap" => {
                handle.gesture(GestureEvent::TapBegin);
                handle.gesture(GestureEvent::TapEnd);
            }
            "quit" | "q" => break,
            "" => {}
            other => eprintln!("sightline: unknown command `{other}`"),
        }
        if !handle.is_running() {
            break;
        }
    }
    Ok(())
}
