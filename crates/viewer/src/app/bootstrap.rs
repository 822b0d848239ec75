use std::path::Path;

use gamecam::{resolve_app_paths, LoopConfig, Picture, PictureError, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError, ViewerConfig};
use super::demo_scene::{checker_picture, DemoScene};

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Picture(#[from] PictureError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== gamecam viewer startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        config_path = %paths.config_path.display(),
        "paths_resolved"
    );
    let viewer_config = load_config(&paths.config_path)?;
    wire(viewer_config, &paths.assets_dir)
}

fn wire(viewer_config: ViewerConfig, assets_dir: &Path) -> Result<AppWiring, BootstrapError> {
    let picture = match &viewer_config.picture {
        Some(relative) => Picture::load(assets_dir.join(relative))?,
        None => checker_picture(),
    };
    let scene = DemoScene::new(
        viewer_config.camera_center,
        viewer_config.camera_zoom,
        viewer_config.pan_speed,
        viewer_config.zoom_step,
        picture,
    );
    let config = LoopConfig {
        window_title: viewer_config.window_title,
        window_width: viewer_config.window_width,
        window_height: viewer_config.window_height,
        clear_color: viewer_config.clear_color,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(scene),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
