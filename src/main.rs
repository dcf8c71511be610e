//! checkcam command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use checkcam::capture::{CaptureFailure, FacingMode};
use checkcam::config::Config;

/// Parse and validate JPEG quality (0.0-1.0)
fn parse_quality(s: &str) -> Result<f32, String> {
    let quality: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&quality) {
        return Err(format!(
            "Quality must be between 0.0 and 1.0, got {}",
            quality
        ));
    }
    Ok(quality)
}

/// Parse and validate resolution (WIDTHxHEIGHT format)
fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 1280x720)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    if width > 7680 || height > 4320 {
        return Err("Resolution exceeds maximum supported (7680x4320)".to_string());
    }
    Ok((width, height))
}

/// Parse a camera facing preference
fn parse_facing(s: &str) -> Result<FacingMode, String> {
    s.parse()
}

/// checkcam: camera capture for check-in and lead photos
#[derive(Parser)]
#[command(name = "checkcam")]
#[command(version, about = "Capture check-in and lead photos from a camera")]
#[command(after_help = "EXAMPLES:
    # Check whether a usable camera exists
    checkcam probe

    # Capture one frame with defaults
    checkcam snapshot

    # Tag the capture with a lead id at reduced quality
    checkcam snapshot --tag lead-42 --quality 0.6 -o lead-42.jpg

    # Prefer the rear camera at 1280x720
    checkcam snapshot --facing environment -r 1280x720")]
struct Cli {
    /// Custom config file path (default: ~/.config/checkcam/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe camera availability and list input devices
    ///
    /// The probe is advisory: some platforms under-report devices until
    /// permission is granted, so `snapshot` may still succeed after a
    /// negative probe.
    Probe,

    /// Acquire a session, capture one frame, and write it to disk
    Snapshot {
        /// Output file path
        #[arg(long, short = 'o', default_value = "snapshot.jpg")]
        output: PathBuf,

        /// JPEG quality (0.0-1.0). Default: 0.8 (or from config file)
        #[arg(long, short = 'q', value_parser = parse_quality)]
        quality: Option<f32>,

        /// Preferred resolution (WIDTHxHEIGHT, e.g. 1280x720)
        #[arg(long, short = 'r', value_parser = parse_resolution)]
        resolution: Option<(u32, u32)>,

        /// Camera facing preference (user, environment)
        #[arg(long, value_parser = parse_facing)]
        facing: Option<FacingMode>,

        /// Camera device index (overrides config)
        #[arg(long, short = 'd')]
        device: Option<u32>,

        /// Association tag recorded on the captured image
        #[arg(long)]
        tag: Option<String>,
    },
}

/// Format a classified failure with its suggested fallback actions.
fn format_failure(failure: &CaptureFailure) -> String {
    let mut text = failure.message.clone();
    if !failure.fallbacks.is_empty() {
        text.push_str("\n\nYou can try:");
        for fallback in &failure.fallbacks {
            text.push_str(&format!("\n  - {}: {}", fallback.label, fallback.description));
        }
    }
    text
}

#[cfg(feature = "native")]
fn run_probe(config: &Config) -> Result<(), String> {
    use checkcam::capture::probe_availability;
    use checkcam::platform::native::NativePlatform;

    let platform = NativePlatform::new(config.camera.device);
    let report = probe_availability(&platform);

    if report.available {
        println!("Camera available.");
    } else {
        let reason = report.reason.map(|r| r.code()).unwrap_or("unknown");
        println!("No usable camera ({}).", reason);
        if let Some(err) = &report.error {
            println!("  Underlying error: {}", err);
        }
        println!("  The probe is advisory; acquisition may still succeed.");
    }

    if report.devices.is_empty() {
        println!("No input devices reported.");
    } else {
        println!("Devices:");
        for device in &report.devices {
            println!("  {}", device);
        }
    }
    Ok(())
}

#[cfg(feature = "native")]
#[allow(clippy::too_many_arguments)]
fn run_snapshot(
    config: &Config,
    output: PathBuf,
    quality: Option<f32>,
    resolution: Option<(u32, u32)>,
    facing: Option<FacingMode>,
    device: Option<u32>,
    tag: Option<String>,
) -> Result<(), String> {
    use checkcam::capture::{
        capture_frame, probe_availability, CaptureOptions, Resolution, SessionManager,
    };
    use checkcam::platform::native::NativePlatform;

    let device_index = device.unwrap_or(config.camera.device);
    let mut constraints = config.constraints().map_err(|e| e.to_string())?;
    if let Some((width, height)) = resolution {
        constraints.ideal = Resolution::new(width, height);
        constraints.max = Resolution::new(
            constraints.max.width.max(width),
            constraints.max.height.max(height),
        );
    }
    if let Some(facing) = facing {
        constraints.facing = facing;
    }
    let quality = quality.unwrap_or_else(|| config.quality());

    let mut manager = SessionManager::new(NativePlatform::new(device_index));

    // Advisory only; proceed with acquisition either way
    let report = probe_availability(manager.platform());
    if !report.available {
        log::warn!(
            "probe reports no usable camera ({:?}), attempting acquisition anyway",
            report.reason
        );
    }

    let options = CaptureOptions { quality, tag };
    let image = {
        let session = manager
            .acquire(Some(&constraints))
            .map_err(|f| format_failure(&f))?;
        capture_frame(session.preview(), &options).map_err(|f| format_failure(&f))?
    };
    manager.release();

    std::fs::write(&output, &image.bytes)
        .map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;

    println!(
        "Captured {}x{} frame ({} bytes) to {}",
        image.width,
        image.height,
        image.bytes.len(),
        output.display()
    );
    if let Some(tag) = &image.tag {
        println!("  Tag: {}", tag);
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn run_probe(_config: &Config) -> Result<(), String> {
    Err("checkcam was built without the native camera backend (enable the 'native' feature)"
        .to_string())
}

#[cfg(not(feature = "native"))]
#[allow(clippy::too_many_arguments)]
fn run_snapshot(
    _config: &Config,
    _output: PathBuf,
    _quality: Option<f32>,
    _resolution: Option<(u32, u32)>,
    _facing: Option<FacingMode>,
    _device: Option<u32>,
    _tag: Option<String>,
) -> Result<(), String> {
    Err("checkcam was built without the native camera backend (enable the 'native' feature)"
        .to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // Explicit --config must exist and parse; the default path falls back
    // to defaults with a warning.
    let config = if let Some(path) = cli.config.as_deref() {
        match Config::load(Some(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        }
    };

    let result = match cli.command {
        Commands::Probe => run_probe(&config),
        Commands::Snapshot {
            output,
            quality,
            resolution,
            facing,
            device,
            tag,
        } => run_snapshot(&config, output, quality, resolution, facing, device, tag),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
