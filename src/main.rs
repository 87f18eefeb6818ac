use clap::{Parser, Subcommand};
use simple_snap::capture::{CaptureBackend, CommandCapture, ImportCapture};
use simple_snap::config::{self, SnapConfig};
use simple_snap::imaging::{Brightness, LightingFilter, loader};
use simple_snap::session::Session;
use simple_snap::store::{ImageStore, PhotoRef};
use simple_snap::worker::{self, SaveJob};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-snap")]
#[command(about = "Capture a photo, brighten it, save it")]
#[command(long_about = "\
Capture a photo, brighten it, save it

An external collaborator produces the photo bytes: the configured
[capture] command writing to the path simple-snap hands it, or an
existing file imported with --from.

Session flow:

  capture    photo_<YYYYMMDD_HHmmss>.jpg lands in the pictures directory
  preview    decode bounded by the preview viewport, not the source size
  adjust     brightness 0-200 maps to a multiply/add lighting filter
             (100 = unchanged; below darkens, above brightens)
  save       a background worker re-encodes the full-resolution JPEG in
             place, reporting \"photo saved\" or \"photo not saved\"

Failure detail goes to the log; run with RUST_LOG=debug to see it.

Run 'simple-snap gen-config' to generate a documented snap.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./snap.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory captured photos land in (overrides the config)
    #[arg(long, global = true)]
    pictures_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a full session: capture, adjust, save
    Shoot(ShootArgs),
    /// Capture only; prints the new photo's path
    Capture(CaptureArgs),
    /// Render the adjusted, viewport-bounded preview to a PNG
    Preview(PreviewArgs),
    /// Re-save an existing photo with a brightness adjustment
    Adjust(AdjustArgs),
    /// Print a stock snap.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ShootArgs {
    /// Brightness 0-200 (100 = unchanged)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=200))]
    brightness: u32,

    /// Import FILE as the capture instead of running the capture command
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,

    /// Print a machine-readable session summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct CaptureArgs {
    /// Import FILE as the capture instead of running the capture command
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Photo to preview
    #[arg(long)]
    photo: PathBuf,

    /// Brightness 0-200 (100 = unchanged)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=200))]
    brightness: u32,

    /// Output PNG path
    #[arg(long)]
    out: PathBuf,
}

#[derive(clap::Args)]
struct AdjustArgs {
    /// Photo to adjust (overwritten in place)
    #[arg(long)]
    photo: PathBuf,

    /// Brightness 0-200 (100 = unchanged)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=200))]
    brightness: u32,
}

#[derive(serde::Serialize)]
struct ShootSummary {
    photo: PathBuf,
    brightness: u32,
    saved: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut snap_config = config::resolve(cli.config.as_deref())?;
    if let Some(dir) = &cli.pictures_dir {
        snap_config.storage.pictures_dir = Some(dir.clone());
    }

    match cli.command {
        Command::Shoot(args) => shoot(&snap_config, args)?,
        Command::Capture(args) => capture_only(&snap_config, args.from)?,
        Command::Preview(args) => preview(&snap_config, args)?,
        Command::Adjust(args) => adjust(&snap_config, args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn shoot(snap_config: &SnapConfig, args: ShootArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = capture_backend(snap_config, args.from)?;
    let mut session = Session::new(
        ImageStore::new(snap_config.storage.effective_pictures_dir()),
        backend,
        snap_config.preview.viewport(),
        snap_config.save.quality(),
    );

    let photo = session.capture()?;
    println!("==> Captured {}", photo.path().display());

    session.set_brightness(Brightness::new(args.brightness))?;
    let outcome = session.save_blocking()?;

    if args.json {
        let summary = ShootSummary {
            photo: photo.path().to_path_buf(),
            brightness: session.brightness().value(),
            saved: outcome.is_saved(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", outcome.message());
    }
    Ok(())
}

fn capture_only(
    snap_config: &SnapConfig,
    from: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = capture_backend(snap_config, from)?;
    let store = ImageStore::new(snap_config.storage.effective_pictures_dir());

    let photo = store.allocate()?;
    backend.capture(photo.path())?;
    println!("{}", photo.path().display());
    Ok(())
}

fn preview(snap_config: &SnapConfig, args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut rendered = loader::load_scaled_to_fit(&args.photo, snap_config.preview.viewport())?;
    LightingFilter::for_brightness(Brightness::new(args.brightness)).apply_to_rgba(&mut rendered);

    rendered.save(&args.out)?;
    println!(
        "==> Preview {}x{} → {}",
        rendered.width(),
        rendered.height(),
        args.out.display()
    );
    Ok(())
}

fn adjust(snap_config: &SnapConfig, args: AdjustArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pending = worker::spawn(SaveJob {
        photo: PhotoRef::existing(&args.photo),
        filter: LightingFilter::for_brightness(Brightness::new(args.brightness)),
        quality: snap_config.save.quality(),
        store: ImageStore::new(snap_config.storage.effective_pictures_dir()),
    });
    println!("{}", pending.wait().message());
    Ok(())
}

/// Pick the capture collaborator for this invocation: an explicit `--from`
/// import wins over the configured command.
fn capture_backend(
    snap_config: &SnapConfig,
    from: Option<PathBuf>,
) -> Result<Box<dyn CaptureBackend>, Box<dyn std::error::Error>> {
    if let Some(source) = from {
        return Ok(Box::new(ImportCapture::new(source)));
    }
    match &snap_config.capture.command {
        Some(command) => Ok(Box::new(CommandCapture::new(command.as_str()))),
        None => Err(
            "no capture command configured; set [capture] command in snap.toml or pass --from FILE"
                .into(),
        ),
    }
}
