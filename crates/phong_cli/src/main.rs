use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use phong_renderer::{load_scene, render, Progress, RenderConfig, SceneDescription};

/// Render a scene file to a plain-text PPM image
#[derive(Parser, Debug)]
#[command(name = "phong", version, about)]
struct Cli {
    /// Scene description file
    input: PathBuf,

    /// Output image; `.ppm` is appended when missing
    output: PathBuf,

    /// Image width in pixels (overrides the scene)
    #[arg(requires = "height")]
    width: Option<u32>,

    /// Image height in pixels
    height: Option<u32>,

    /// Samples per pixel
    #[arg(requires = "height")]
    samples: Option<u32>,

    /// Seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,

    /// Cast shadow rays from the exact hit point
    #[arg(long)]
    hard_shadows: bool,

    /// Number of row batches rendered in parallel
    #[arg(long, default_value_t = phong_renderer::DEFAULT_BATCH_COUNT)]
    batches: u32,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            soft_shadows: !self.hard_shadows,
            batch_count: self.batches,
            seed: self.seed,
            ..Default::default()
        }
    }

    /// Apply command line overrides after the scene has been loaded.
    fn apply_overrides(&self, scene: &mut SceneDescription) {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            scene.set_resolution(width, height);
        }
        if let Some(samples) = self.samples {
            scene.samples_per_pixel = samples;
        }
    }
}

/// `path` with `.ppm` appended unless it already ends in it.
fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "ppm") {
        return path.to_path_buf();
    }

    let mut name = OsString::from(path.as_os_str());
    name.push(".ppm");
    PathBuf::from(name)
}

fn progress_bar(rows: u32) -> ProgressBar {
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} rows {eta_precise}",
    ) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let mut scene = load_scene(&cli.input)
        .with_context(|| format!("Failed to load scene {}", cli.input.display()))?;
    cli.apply_overrides(&mut scene);
    let output = output_path(&cli.output);

    log::info!(
        "Rendering {} -> {} ({}x{}, {} spp)",
        cli.input.display(),
        output.display(),
        scene.width,
        scene.height,
        scene.samples_per_pixel
    );

    let rows = scene.height;
    let bar = progress_bar(rows);
    let reporter = bar.clone();
    let progress = Progress::with_callback(move |remaining| {
        reporter.set_position(rows.saturating_sub(remaining) as u64);
    });

    let start = Instant::now();
    let image = render(&scene, &cli.render_config(), &progress).context("Render failed")?;
    bar.finish_and_clear();

    image
        .save_ppm(&output, scene.samples_per_pixel)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Done in {:?}", start.elapsed());
    Ok(())
}
