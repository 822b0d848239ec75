use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
mod camera;
mod color;
mod geom;
mod output;
mod picture;

pub use app::{
    run_app, AppError, Frame, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    Renderer, Scene, SceneCommand, Viewport,
};
pub use camera::{validate_zoom, Camera, CameraError};
pub use color::Color;
pub use geom::{Rect, Vec2};
pub use output::VideoOutput;
pub use picture::{Picture, PictureError};

pub const ROOT_ENV_VAR: &str = "GAMECAM_ROOT";
pub const CONFIG_FILE_NAME: &str = "viewer.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub config_path: PathBuf,
}

impl AppPaths {
    fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        let config_path = assets_dir.join(CONFIG_FILE_NAME);
        Self {
            root,
            assets_dir,
            config_path,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "{env_var} is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/gamecam\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the project root from `GAMECAM_ROOT`, or by walking up from the
/// running executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match env::var(ROOT_ENV_VAR) {
        Ok(value) => resolve_env_root(Path::new(&value))?,
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_upward(&exe_dir)?
        }
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    Ok(AppPaths::from_root(root))
}

fn resolve_env_root(raw: &Path) -> Result<PathBuf, StartupError> {
    let normalized = normalize_path(raw);
    if is_repo_marker(&normalized) {
        Ok(normalized)
    } else {
        Err(StartupError::InvalidEnvRoot {
            path: normalized,
            env_var: ROOT_ENV_VAR,
        })
    }
}

fn find_root_upward(start_dir: &Path) -> Result<PathBuf, StartupError> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: normalize_path(start_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
