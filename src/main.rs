//! Afterimage CLI
//!
//! Command-line interface for running the motion trail pipeline
//! against a camera or the synthetic mock source.

use afterimage::capture::{FileConfig, MockSource, VideoSource};
use afterimage::runtime::{RuntimeError, TrailRuntime};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "metrics")]
use afterimage::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig, MetricsSnapshot};

/// Publish a metrics snapshot every this many ticks.
#[cfg(feature = "metrics")]
const METRICS_PUBLISH_EVERY: u64 = 30;

/// Real-time temporal multi-exposure effect for live video.
#[derive(Parser, Debug)]
#[command(name = "afterimage", version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trail duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// History layers blended per output frame.
    #[arg(long)]
    samples: Option<u32>,

    /// Number of frames to render before exiting.
    #[arg(long)]
    frames: Option<u32>,

    /// Run until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Logical surface width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Logical surface height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Display scale factor.
    #[arg(long)]
    scale: Option<f32>,

    /// Capture from a real camera instead of the mock source.
    #[cfg(feature = "camera")]
    #[arg(long)]
    camera: bool,

    /// Camera device index.
    #[cfg(feature = "camera")]
    #[arg(long)]
    device: Option<u32>,

    /// List available cameras and exit.
    #[cfg(feature = "camera")]
    #[arg(long)]
    list_cameras: bool,

    /// Metrics server port (0 to disable).
    #[cfg(feature = "metrics")]
    #[arg(long)]
    metrics_port: Option<u16>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    apply_overrides(&mut config, &args);

    info!("Afterimage v{}", afterimage::VERSION);

    #[cfg(feature = "camera")]
    if args.list_cameras {
        let cameras = afterimage::capture::list_cameras();
        if cameras.is_empty() {
            println!("No cameras found");
        }
        for cam in cameras {
            println!("{}: {} ({})", cam.index, cam.name, cam.description);
        }
        return;
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || {
            running.store(false, Ordering::Relaxed);
        }) {
            warn!(error = %e, "failed to install interrupt handler");
        }
    }

    #[cfg(feature = "camera")]
    {
        if args.camera {
            run_session(afterimage::capture::CameraSource::new(), &config, &running);
            return;
        }
        info!("using the synthetic mock source (pass --camera for real input)");
    }
    #[cfg(not(feature = "camera"))]
    info!("using the synthetic mock source (build with --features camera for real input)");

    run_session(MockSource::new(), &config, &running);
}

/// Folds command-line flags over the loaded configuration.
fn apply_overrides(config: &mut FileConfig, args: &Args) {
    if let Some(duration) = args.duration {
        config.effect.history_secs = duration;
    }
    if let Some(samples) = args.samples {
        config.effect.sample_count = samples;
    }
    if let Some(frames) = args.frames {
        config.output.frame_count = frames;
        config.output.continuous = false;
    }
    if args.continuous {
        config.output.continuous = true;
    }
    if let Some(width) = args.width {
        config.display.width = width;
    }
    if let Some(height) = args.height {
        config.display.height = height;
    }
    if let Some(scale) = args.scale {
        config.display.scale_factor = scale;
    }
    #[cfg(feature = "camera")]
    if let Some(device) = args.device {
        config.capture.device_id = device;
    }
    #[cfg(feature = "metrics")]
    if let Some(port) = args.metrics_port {
        config.output.metrics_port = port;
    }
}

fn run_session<S: VideoSource>(source: S, config: &FileConfig, running: &AtomicBool) {
    let mut runtime = match TrailRuntime::start(source, config) {
        Ok(runtime) => runtime,
        Err(RuntimeError::Source(e)) => {
            eprintln!("Could not access the video source: {}", e);
            eprintln!("Check that a camera is connected and permissions are granted.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to start pipeline: {}", e);
            std::process::exit(1);
        }
    };

    #[cfg(feature = "metrics")]
    let metrics = start_metrics_server(config.output.metrics_port);

    let frame_budget = if config.output.continuous {
        None
    } else {
        Some(config.output.frame_count as u64)
    };

    let result = runtime.run_with(running, frame_budget, |rt| {
        #[cfg(feature = "metrics")]
        if let Some(registry) = &metrics {
            if rt.stats().ticks % METRICS_PUBLISH_EVERY == 0 {
                let snapshot = MetricsSnapshot::from_state(
                    rt.stats(),
                    rt.params(),
                    rt.store(),
                    rt.surface(),
                );
                registry.update(&snapshot);
            }
        }
        #[cfg(not(feature = "metrics"))]
        let _ = rt;
    });

    if let Err(e) = result {
        eprintln!("Pipeline failed: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "metrics")]
    if let Some(registry) = &metrics {
        let snapshot = MetricsSnapshot::from_state(
            runtime.stats(),
            runtime.params(),
            runtime.store(),
            runtime.surface(),
        );
        registry.update(&snapshot);
    }

    let stats = runtime.shutdown();
    println!(
        "Rendered {} frames ({} captured, {} idle ticks)",
        stats.composites, stats.frames_captured, stats.idle_ticks
    );
}

/// Spawns the metrics exporter on its own thread, returning the
/// registry handle the render loop publishes into. Returns `None`
/// when the port is 0 or the server cannot be created.
#[cfg(feature = "metrics")]
fn start_metrics_server(port: u16) -> Option<Arc<MetricsRegistry>> {
    if port == 0 {
        return None;
    }

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "failed to create metrics registry");
            return None;
        }
    };
    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    let handle = server.registry();

    std::thread::spawn(move || match tokio::runtime::Runtime::new() {
        Ok(rt) => {
            if let Err(e) = rt.block_on(server.run()) {
                tracing::error!(error = %e, "metrics server failed");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to start metrics runtime"),
    });

    Some(handle)
}
