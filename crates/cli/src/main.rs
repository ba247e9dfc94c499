use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};

use facecapture_core::capture::infrastructure::still_image_source::StillImageSource;
use facecapture_core::detection::domain::detect_outcome::DetectOutcome;
use facecapture_core::model::infrastructure::model_resolver;
use facecapture_core::overlay::infrastructure::raster_canvas::RasterCanvas;
use facecapture_core::pipeline::face_capture_session::FaceCaptureSession;
use facecapture_core::pipeline::model_loader::LOAD_FAILED_MESSAGE;
use facecapture_core::shared::config::CaptureConfig;
use facecapture_core::shared::constants::IMAGE_EXTENSIONS;
use facecapture_core::shared::notifier::LogNotifier;

/// Face detection, capture and verification against a remote service.
#[derive(Parser)]
#[command(name = "face-capture")]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verification service base URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Primary model location (directory, .onnx file or URL).
    #[arg(long, global = true)]
    models_path: Option<String>,

    /// Fallback model location, tried once when the primary fails.
    #[arg(long, global = true)]
    fallback_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect faces in an image and print their boxes as JSON.
    Detect {
        input: PathBuf,

        /// Write the input with the face guide drawn over it.
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
    /// Capture an image and submit it for verification.
    Verify {
        input: PathBuf,

        /// Flip the capture horizontally (selfie view).
        #[arg(long)]
        mirror: bool,
    },
    /// Register an image as the face of the authenticated account.
    Enroll {
        input: PathBuf,

        /// Bearer token of the account.
        #[arg(long)]
        token: String,

        #[arg(long)]
        mirror: bool,
    },
    /// Download the model from the fallback location into the primary one.
    FetchModels,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Command::Detect { input, overlay } => {
            validate_image(&input)?;
            run_detect(&config, &input, overlay.as_deref())
        }
        Command::Verify { input, mirror } => {
            validate_image(&input)?;
            config.mirror |= mirror;
            let session = FaceCaptureSession::from_config(&config, Arc::new(LogNotifier));
            let result = session.verify_capture(&mut StillImageSource::open(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Enroll {
            input,
            token,
            mirror,
        } => {
            validate_image(&input)?;
            config.mirror |= mirror;
            let session = FaceCaptureSession::from_config(&config, Arc::new(LogNotifier));
            let result = session.enroll_capture(&mut StillImageSource::open(&input)?, &token)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::FetchModels => run_fetch_models(&config),
    }
}

fn load_config(cli: &Cli) -> Result<CaptureConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => CaptureConfig::load(path)?,
        None => CaptureConfig::default(),
    }
    .with_env();

    if let Some(url) = &cli.api_base_url {
        config.api_base_url = url.clone();
    }
    if let Some(path) = &cli.models_path {
        config.models.primary = path.clone();
    }
    if let Some(url) = &cli.fallback_url {
        config.models.fallback = url.clone();
    }
    Ok(config)
}

fn run_detect(
    config: &CaptureConfig,
    input: &Path,
    overlay: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = FaceCaptureSession::from_config(config, Arc::new(LogNotifier));
    if !load_with_progress(&mut session) {
        return Err(LOAD_FAILED_MESSAGE.into());
    }

    let mut source = StillImageSource::open(input)?;
    let base = image::open(input)?.to_rgb8();
    let mut canvas = RasterCanvas::new(base.width(), base.height());

    let outcome = session.track(&mut source, &mut canvas);
    if let DetectOutcome::Failed(reason) = &outcome {
        log::warn!("Detection failed: {reason}");
    }

    let boxes: Vec<serde_json::Value> = outcome
        .faces()
        .iter()
        .map(|d| {
            serde_json::json!({
                "x": d.bbox.x,
                "y": d.bbox.y,
                "width": d.bbox.width,
                "height": d.bbox.height,
                "score": d.score,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&boxes)?);

    if let Some(path) = overlay {
        let composed = canvas
            .composite_over(&base)
            .ok_or("overlay size does not match the input image")?;
        composed.save(path)?;
        log::info!("Overlay written to {}", path.display());
    }
    Ok(())
}

fn run_fetch_models(config: &CaptureConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dest = PathBuf::from(&config.models.primary);
    if model_resolver::is_remote(&config.models.primary) {
        return Err(format!(
            "Primary model location must be a local directory, got {}",
            config.models.primary
        )
        .into());
    }

    log::info!("Fetching model from {}", config.models.fallback);
    let path = model_resolver::download_to(&config.models.fallback, &dest, &download_progress)?;
    eprintln!();
    log::info!("Model written to {}", path.display());
    Ok(())
}

/// Loads the model, printing progress from a watcher thread.
fn load_with_progress(session: &mut FaceCaptureSession) -> bool {
    let (tx, rx) = crossbeam_channel::unbounded::<u8>();
    let watcher = thread::spawn(move || {
        for pct in rx {
            eprint!("\rLoading face detection model... {pct}%");
        }
        eprintln!();
    });

    let loaded = session.load_model(Some(&tx));
    drop(tx);
    let _ = watcher.join();
    loaded
}

fn validate_image(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if !is_image(input) {
        return Err(format!(
            "Input must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            input.display()
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
