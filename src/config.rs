use std::env;
use std::path::{Path, PathBuf};

/// Filesystem layout of the core, resolved from the environment.
///
/// - `TS_CORE_HOME`: data directory (default `%LOCALAPPDATA%/TsCore`, else the working directory)
/// - `TS_CORE_TM_FILE`: translation memory file (default `<home>/translation_memory.json`)
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub home: PathBuf,
    pub projects_dir: PathBuf,
    pub tm_file: PathBuf,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let home = if let Ok(home) = env::var("TS_CORE_HOME") {
            PathBuf::from(home)
        } else if let Ok(local) = env::var("LOCALAPPDATA") {
            PathBuf::from(local).join("TsCore")
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        };

        let mut config = Self::with_home(&home);
        if let Ok(tm) = env::var("TS_CORE_TM_FILE") {
            config.tm_file = PathBuf::from(tm);
        }
        config
    }

    pub fn with_home(home: &Path) -> Self {
        CoreConfig {
            home: home.to_path_buf(),
            projects_dir: home.join("Projects"),
            tm_file: home.join("translation_memory.json"),
        }
    }
}
