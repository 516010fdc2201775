use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dotmap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single map frame as a PNG.
    Frame(FrameArgs),
    /// Render an animated frame sequence as numbered PNGs.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene JSON (markers + style). Omit for the built-in demo scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 450)]
    height: u32,

    /// Animation clock time; 0 renders the rest pose.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Scene JSON (markers + style). Omit for the built-in demo scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 450)]
    height: u32,

    /// Number of frames to render.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Output directory for frame_NNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn read_scene(path: Option<&Path>) -> anyhow::Result<dotmap::MapScene> {
    let Some(path) = path else {
        return Ok(demo_scene());
    };
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let scene: dotmap::MapScene =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

/// The stock scene: fifteen major cities, connected in listing order.
fn demo_scene() -> dotmap::MapScene {
    let cities = [
        (40.7128, -74.006),   // New York
        (34.0522, -118.2437), // Los Angeles
        (51.5074, -0.1278),   // London
        (-33.8688, 151.2093), // Sydney
        (48.8566, 2.3522),    // Paris
        (35.6762, 139.6503),  // Tokyo
        (55.7558, 37.6176),   // Moscow
        (39.9042, 116.4074),  // Beijing
        (28.6139, 77.209),    // New Delhi
        (-23.5505, -46.6333), // Sao Paulo
        (1.3521, 103.8198),   // Singapore
        (25.2048, 55.2708),   // Dubai
        (52.52, 13.405),      // Berlin
        (19.4326, -99.1332),  // Mexico City
        (-26.2041, 28.0473),  // Johannesburg
    ];
    let markers = cities
        .iter()
        .map(|&(lat, lng)| dotmap::GeoPoint::new(lat, lng, 0.3))
        .collect();
    dotmap::MapScene::new(markers, dotmap::MapStyle::default())
}

fn make_renderer(
    scene: dotmap::MapScene,
    width: u32,
    height: u32,
) -> anyhow::Result<dotmap::MapRenderer<dotmap::FixedViewport>> {
    let settings = dotmap::RenderSettings {
        clear_rgba: Some([18, 20, 28, 255]),
    };
    // The one error boundary: a scene that fails to construct is reported
    // here and never panics.
    dotmap::MapRenderer::new(dotmap::FixedViewport::new(width, height), scene, settings)
        .context("initialize map renderer")
}

fn write_png(frame: &dotmap::FrameRGBA, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let mut renderer = make_renderer(scene, args.width, args.height)?;

    renderer.draw_frame_at(dotmap::PulseClock::at(args.time))?;
    write_png(&renderer.frame(), &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let mut renderer = make_renderer(scene, args.width, args.height)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for i in 0..args.frames {
        renderer.tick().context("render animation tick")?;
        let out = args.out_dir.join(format!("frame_{i:04}.png"));
        write_png(&renderer.frame(), &out)?;
    }

    eprintln!(
        "wrote {} frames to {}",
        args.frames,
        args.out_dir.display()
    );
    Ok(())
}
