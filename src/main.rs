//! Render a scene of spheres to an image file
use std::path::PathBuf;

use clap::Parser;
use indicatif::ProgressBar;
use ray_casting::prelude::*;

/// Cast one ray per pixel through a sphere scene and save the frame
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// YAML scene file. The built-in demo scene is used when omitted.
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 700)]
    width: u32,

    #[arg(long, default_value_t = 700)]
    height: u32,

    /// Render one pixel in every `quality` along each axis
    #[arg(short, long, default_value_t = 1)]
    quality: u32,

    /// Show a progress bar over columns
    #[arg(long)]
    progress: bool,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::demo(),
    };
    let renderer = Renderer::new(RenderConfig {
        width: args.width,
        height: args.height,
        quality: args.quality,
    })?;
    let mut surface = renderer.surface().with_output(&args.output);

    let stats = if args.progress {
        let columns = args.width.div_ceil(args.quality);
        let bar = ProgressBar::new(columns as u64);
        let stats = renderer.render_with_progress(&scene, &mut surface, || bar.inc(1))?;
        bar.finish();
        stats
    } else {
        renderer.render(&scene, &mut surface)?
    };

    println!("{} rays in {:?}", stats.pixels_written, stats.elapsed);
    Ok(())
}
