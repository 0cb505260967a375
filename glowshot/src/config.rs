use anyhow::{Context, Result, bail};
use log::debug;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const APP_NAME: &str = "glowshot";

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    /// JSON file holding the named presets
    #[derivative(Default(value = "presets_path_default()"))]
    pub presets_path: PathBuf,

    /// Where edited photos (or the archive) are written. Unlike
    /// `presets_path`, a relative path is taken from the working directory
    /// so output lands next to where the command runs.
    #[derivative(Default(value = "PathBuf::from(\"edited\")"))]
    pub output_dir: PathBuf,

    #[derivative(Default(value = "photo_effect::DEFAULT_JPEG_QUALITY"))]
    pub jpeg_quality: u8,

    /// Pack the outputs into one `.tar.gz` instead of loose files
    pub archive: bool,

    /// Process the photos of a batch on all cores
    #[derivative(Default(value = "true"))]
    pub parallel: bool,
}

impl Config {
    /// Loads the configuration from `path`, or from the platform config
    /// directory when no path is given.
    pub fn init(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => default_config_dir().join(format!("{APP_NAME}.toml")),
        };

        if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {} failed", dir.display()))?;
        }

        let mut config = Config {
            config_path,
            ..Default::default()
        };
        config.load().with_context(|| "load config file failed")?;
        debug!("{:?}", config);

        Ok(config)
    }

    /// Loads configuration from file or creates default if not exists
    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    *self = c;

                    Ok(())
                }
                Err(e) => {
                    log::warn!(
                        "invalid config {}, fall back to defaults: {e}",
                        self.config_path.display()
                    );
                    self.is_first_run = true;

                    if let Some(bak_file) = &self.config_path.as_os_str().to_str() {
                        _ = fs::copy(&self.config_path, format!("{}.bak", bak_file));
                    }

                    self.save()
                }
            },
            Err(_) => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| format!("save config {} failed", self.config_path.display()))?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }

    /// Resolve relative settings against the directory of the config file.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn presets_file(&self) -> PathBuf {
        self.resolve_path(&self.presets_path)
    }

    /// Output directory for a batch: `overridden` when given, else
    /// `output_dir`. Both stay relative to the working directory.
    pub fn output_path(&self, overridden: Option<&Path>) -> PathBuf {
        overridden.unwrap_or(self.output_dir.as_path()).to_path_buf()
    }
}

fn default_config_dir() -> PathBuf {
    AppDirs::new(Some(APP_NAME), true)
        .map(|dirs| dirs.config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn presets_path_default() -> PathBuf {
    PathBuf::from("presets.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glowshot.toml");

        let config = Config::init(Some(path.clone())).unwrap();
        assert!(config.is_first_run);
        assert!(path.exists());
        assert_eq!(config.jpeg_quality, photo_effect::DEFAULT_JPEG_QUALITY);
        assert!(config.parallel);
        assert!(!config.archive);

        let again = Config::init(Some(path)).unwrap();
        assert!(!again.is_first_run);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glowshot.toml");
        fs::write(&path, "jpeg_quality = 70\narchive = true\n").unwrap();

        let config = Config::init(Some(path)).unwrap();
        assert_eq!(config.jpeg_quality, 70);
        assert!(config.archive);
        assert_eq!(config.output_dir, PathBuf::from("edited"));
    }

    #[test]
    fn test_invalid_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glowshot.toml");
        fs::write(&path, "jpeg_quality = \"loud\"").unwrap();

        let config = Config::init(Some(path.clone())).unwrap();
        assert!(config.is_first_run);
        assert_eq!(config.jpeg_quality, photo_effect::DEFAULT_JPEG_QUALITY);
        assert!(dir.path().join("glowshot.toml.bak").exists());
    }

    #[test]
    fn test_presets_file_is_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::init(Some(dir.path().join("glowshot.toml"))).unwrap();
        assert_eq!(config.presets_file(), dir.path().join("presets.json"));
    }

    #[test]
    fn test_output_dir_is_relative_to_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::init(Some(dir.path().join("glowshot.toml"))).unwrap();

        assert_eq!(config.output_path(None), PathBuf::from("edited"));
        assert_eq!(
            config.output_path(Some(Path::new("out/today"))),
            PathBuf::from("out/today")
        );
        assert_ne!(config.output_path(None), config.resolve_path(&config.output_dir));
    }
}
