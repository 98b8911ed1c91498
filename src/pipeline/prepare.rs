// Batch resize of GIF sprites to a uniform square size

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, Frame};
use log::{info, warn};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::gif::decode_gif;

#[derive(Debug, Clone)]
pub struct PrepareOptions {
    pub size: u32,
    pub delay_ms: u32,
    pub thread_count: usize,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            size: 200,
            delay_ms: 100,
            thread_count: 0,
        }
    }
}

impl PrepareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }
}

#[derive(Debug, Default)]
pub struct PrepareReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Resizes every frame of `input` and writes a looping GIF to `output`.
/// Returns the number of frames written.
pub fn resize_gif(input: &Path, output: &Path, options: &PrepareOptions) -> Result<usize> {
    let frames = decode_gif(input)?;
    let count = frames.len();
    let delay = Delay::from_numer_denom_ms(options.delay_ms, 1);

    let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames.into_iter().map(|frame| {
        let resized =
            image::imageops::resize(&frame.image, options.size, options.size, FilterType::Lanczos3);
        Frame::from_parts(resized, 0, 0, delay)
    }))?;

    Ok(count)
}

fn find_gifs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut gifs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gif"))
        {
            gifs.push(path.to_path_buf());
        }
    }
    Ok(gifs)
}

/// Resizes every GIF found under `input_dir` into `output_dir`, flattening
/// subdirectories.
pub fn prepare_dir(input_dir: &Path, output_dir: &Path, options: &PrepareOptions) -> Result<PrepareReport> {
    fs::create_dir_all(output_dir)?;

    let gifs = find_gifs(input_dir)?;
    info!("Found {} GIF files in {}", gifs.len(), input_dir.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.thread_count)
        .build()
        .context("Failed to start worker pool")?;

    let results: Vec<_> = pool.install(|| {
        gifs.par_iter()
            .map(|input| {
                let output = output_dir.join(input.file_name().unwrap_or_default());
                let result = resize_gif(input, &output, options);
                (input.clone(), output, result)
            })
            .collect()
    });

    let mut report = PrepareReport::default();
    for (input, output, result) in results {
        match result {
            Ok(frames) => {
                info!("  ✓ {} ({} frames)", output.display(), frames);
                report.written.push(output);
            }
            Err(e) => {
                warn!("  ✗ {}: {:#}", input.display(), e);
                report.failed.push((input, format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}
