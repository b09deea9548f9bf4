use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "mathdash";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().join("logs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_scoped_to_the_app() {
        if let Some(path) = AppDirs::config_path() {
            assert!(path.ends_with("config.json"));
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
        if let Some(dir) = AppDirs::log_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
    }
}
