//! tfkit - render colormaps and opacity maps to lookup-texture PNGs
//!
//! This is the main entry point for the tfkit command-line tool.

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{error, info};

use tfkit::config::{ColormapSource, RenderJob};
use tfkit::{
    init_tracing, log_error, log_operation_end, log_operation_start, save_png, Colormap, Config,
    OpacityMap, Session, TfError,
};

const COLORMAP_NAME: &str = "colormap";
const OPACITY_NAME: &str = "opacity";

fn main() -> Result<()> {
    // Load configuration
    let (config, job) = Config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    init_tracing(&config.log_level);
    info!("Starting tfkit v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let start = Instant::now();
    log_operation_start("render", Some(&job.output.display().to_string()));
    let mut session = Session::new(config);

    render(&mut session, &job).map_err(|e| {
        if let Some(err) = e.downcast_ref::<TfError>() {
            log_error(err, "render");
        } else {
            error!("Render failed: {:#}", e);
        }
        e
    })?;

    log_operation_end("render", start, true);
    Ok(())
}

fn render(session: &mut Session, job: &RenderJob) -> Result<()> {
    let colormap = match &job.colormap {
        ColormapSource::Preset(name) => {
            info!(preset = %name, "Rendering preset");
            Colormap::Linear(tfkit::LinearColormap::new(name))
        }
        ColormapSource::File(path) => {
            info!(path = %path.display(), "Loading colormap");
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read colormap {}", path.display()))?;
            Colormap::from_json(&text)
                .with_context(|| format!("Failed to parse colormap {}", path.display()))?
        }
    };
    session.register_colormap(COLORMAP_NAME, colormap);

    let opacity = match &job.opacity {
        Some(path) => {
            info!(path = %path.display(), "Loading opacity map");
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read opacity map {}", path.display()))?;
            let map = OpacityMap::from_json(&text)
                .with_context(|| format!("Failed to parse opacity map {}", path.display()))?;
            session.register_opacity_map(OPACITY_NAME, map);
            Some(OPACITY_NAME)
        }
        None => None,
    };

    let texture = session.texture_checked(COLORMAP_NAME, opacity)?;
    save_png(&texture.read(), &job.output, job.grayscale)
        .with_context(|| format!("Failed to write {}", job.output.display()))?;
    texture.mark_uploaded();

    info!(
        output = %job.output.display(),
        width = session.config.texture.width,
        height = session.config.texture.height,
        "Texture rendered"
    );
    Ok(())
}
