use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use deskpet::app::{APP_NAME, PetApp};
use deskpet::config::PetConfig;
use deskpet::model::geometry::EdgeMode;
use deskpet::pipeline::discover;
use deskpet::pipeline::prepare::{PrepareOptions, prepare_dir};

#[derive(Parser)]
#[command(name = "deskpet", version, about = "An animated desktop pet")]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "DESKPET_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct RunArgs {
    /// Directory of .gif / .png sprites
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Seconds to stay put before floating again
    #[arg(long)]
    rest_time: Option<f64>,

    /// Let the pet roam over the taskbar area too
    #[arg(long)]
    include_taskbar: bool,

    #[arg(long, value_enum)]
    edge: Option<EdgeMode>,

    /// Scale factor applied to every sprite at load time
    #[arg(long)]
    scale: Option<f32>,

    /// Seed for reproducible motion
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn apply(&self, config: &mut PetConfig) {
        if let Some(rest) = self.rest_time {
            config.motion.rest_time_secs = rest;
        }
        if self.include_taskbar {
            config.window.exclude_taskbar = false;
        }
        if let Some(edge) = self.edge {
            config.motion.edge = edge;
        }
        if let Some(scale) = self.scale {
            config.sprites.scale = scale;
        }
        if self.seed.is_some() {
            config.motion.seed = self.seed;
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resize every GIF in a directory to a square sprite
    Prepare {
        input: PathBuf,
        output: PathBuf,
        /// Edge length in pixels
        #[arg(long)]
        size: Option<u32>,
        /// Per-frame delay in milliseconds
        #[arg(long)]
        delay: Option<u32>,
        /// Worker threads, 0 for one per core
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Command::InitConfig { force }) => init_config(config_path, force),
        Some(Command::Prepare {
            input,
            output,
            size,
            delay,
            threads,
        }) => {
            let config = PetConfig::load(config_path)?.validated();
            let options = PrepareOptions::new()
                .with_size(size.unwrap_or(config.prepare.size))
                .with_delay(delay.unwrap_or(config.prepare.delay_ms))
                .with_threads(threads.unwrap_or(config.prepare.thread_count));
            run_prepare(&input, &output, &options)
        }
        None => {
            let mut config = PetConfig::load(config_path)?;
            cli.run.apply(&mut config);
            run_pet(config.validated(), cli.run.sprites)
        }
    }
}

fn run_pet(config: PetConfig, sprite_dir: Option<PathBuf>) -> Result<()> {
    let sources = discover::sprite_sources(&config.sprites, sprite_dir.as_deref())?;

    let options = eframe::NativeOptions {
        viewport: PetApp::viewport(),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| Ok(Box::new(PetApp::new(config, sources)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}

fn run_prepare(input: &Path, output: &Path, options: &PrepareOptions) -> Result<()> {
    let report = prepare_dir(input, output, options)?;
    info!(
        "done: {} written, {} failed",
        report.written.len(),
        report.failed.len()
    );
    if report.written.is_empty() && !report.failed.is_empty() {
        bail!("No GIF could be prepared");
    }
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PetConfig::default_path()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    PetConfig::default().save_to_file(&path)?;
    info!("Wrote {}", path.display());
    Ok(())
}
