//! User configuration at ~/.config/blocktime/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{BlockTimeError, BlockTimeResult};
use crate::generator::{DEFAULT_END_HOUR, DEFAULT_START_HOUR};
use crate::geometry::TimelineGeometry;
use crate::placement::{EventPlacement, PlacementConfig};

static DEFAULT_DATA_DIR: &str = "~/blocktime";
static DEFAULT_EXPORT_DIR: &str = "~/blocktime/export";
static DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
static DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
static DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Every key can be overridden from the environment, e.g.
/// `BLOCKTIME__TIMELINE__HOUR_HEIGHT=60`.
const ENV_PREFIX: &str = "BLOCKTIME";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockTimeConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default)]
    pub timeline: TimelineConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Default for BlockTimeConfig {
    fn default() -> Self {
        BlockTimeConfig {
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            timeline: TimelineConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

/// Timeline layout. Lengths are in points.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub hour_height: f64,
    pub min_event_height: f64,
    pub edge_tolerance: f64,
    pub snap_minutes: u32,
    pub column_width: f64,
    pub event_inset: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        let placement = PlacementConfig::default();
        TimelineConfig {
            hour_height: 90.0,
            min_event_height: placement.min_event_height,
            edge_tolerance: placement.edge_tolerance,
            snap_minutes: placement.snap_minutes,
            column_width: placement.column_width,
            event_inset: placement.event_inset,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> BlockTimeResult<()> {
        if !(self.hour_height.is_finite() && self.hour_height > 0.0) {
            return Err(BlockTimeError::Config(format!(
                "timeline.hour_height must be positive, got {}",
                self.hour_height
            )));
        }
        if self.snap_minutes == 0 {
            return Err(BlockTimeError::Config("timeline.snap_minutes must be at least 1".into()));
        }
        if self.min_event_height < 0.0 || self.edge_tolerance < 0.0 || self.event_inset < 0.0 {
            return Err(BlockTimeError::Config("timeline lengths cannot be negative".into()));
        }
        Ok(())
    }

    pub fn geometry(&self) -> TimelineGeometry {
        TimelineGeometry::new(self.hour_height)
    }

    pub fn placement(&self) -> BlockTimeResult<EventPlacement> {
        self.validate()?;
        Ok(EventPlacement::new(
            self.geometry(),
            PlacementConfig {
                min_event_height: self.min_event_height,
                edge_tolerance: self.edge_tolerance,
                snap_minutes: self.snap_minutes,
                column_width: self.column_width,
                event_inset: self.event_inset,
            },
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_tokens: u32,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_tokens: 1000,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

impl GeneratorConfig {
    pub fn api_key(&self) -> BlockTimeResult<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                BlockTimeError::Config(format!(
                    "No API key found. Set the {} environment variable.",
                    self.api_key_env
                ))
            })
    }
}

impl BlockTimeConfig {
    pub fn config_path() -> BlockTimeResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BlockTimeError::Config("Could not determine config directory".into()))?
            .join("blocktime");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file on
    /// first run.
    pub fn load() -> BlockTimeResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus environment overrides.
    pub fn load_from(path: &Path) -> BlockTimeResult<Self> {
        let config: BlockTimeConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| BlockTimeError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| BlockTimeError::Config(e.to_string()))?;

        config.timeline.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn export_path(&self) -> PathBuf {
        expand(&self.export_dir)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> BlockTimeResult<()> {
        let timeline = TimelineConfig::default();
        let generator = GeneratorConfig::default();
        let contents = format!(
            "\
# Block Time configuration

# Where events and templates are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Where `blocktime export` writes .ics files:
# export_dir = \"{DEFAULT_EXPORT_DIR}\"

[timeline]
# hour_height = {}
# min_event_height = {}
# edge_tolerance = {}
# snap_minutes = {}
# column_width = {}
# event_inset = {}

[generator]
# endpoint = \"{}\"
# model = \"{}\"
# api_key_env = \"{}\"
# max_tokens = {}
# start_hour = {}
# end_hour = {}
",
            timeline.hour_height,
            timeline.min_event_height,
            timeline.edge_tolerance,
            timeline.snap_minutes,
            timeline.column_width,
            timeline.event_inset,
            generator.endpoint,
            generator.model,
            generator.api_key_env,
            generator.max_tokens,
            generator.start_hour,
            generator.end_hour,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BlockTimeError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BlockTimeError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = BlockTimeConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("~/blocktime"));
        assert_eq!(config.timeline.hour_height, 90.0);
        assert_eq!(config.timeline.snap_minutes, 5);
        assert_eq!(config.generator.max_tokens, 1000);
        assert_eq!(config.generator.start_hour, 9);
    }

    #[test]
    fn default_file_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocktime").join("config.toml");

        BlockTimeConfig::create_default_config(&path).unwrap();
        let config = BlockTimeConfig::load_from(&path).unwrap();

        assert_eq!(config.timeline.column_width, 340.0);
        assert_eq!(config.generator.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/bt\"\n\n[timeline]\nhour_height = 60.0\n\n[generator]\nend_hour = 18\n",
        )
        .unwrap();

        let config = BlockTimeConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/bt"));
        assert_eq!(config.timeline.hour_height, 60.0);
        assert_eq!(config.timeline.min_event_height, 30.0);
        assert_eq!(config.generator.end_hour, 18);
        assert_eq!(config.generator.start_hour, 9);
    }

    #[test]
    fn rejects_non_positive_hour_height() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timeline]\nhour_height = 0.0\n").unwrap();

        assert!(matches!(
            BlockTimeConfig::load_from(&path),
            Err(BlockTimeError::Config(_))
        ));
    }

    #[test]
    fn placement_carries_timeline_values() {
        let timeline = TimelineConfig {
            hour_height: 60.0,
            snap_minutes: 15,
            ..TimelineConfig::default()
        };
        let placement = timeline.placement().unwrap();

        assert_eq!(placement.geometry().hour_height(), 60.0);
        assert_eq!(placement.config().snap_minutes, 15);
        assert_eq!(placement.column_height(), 1440.0);
    }

    #[test]
    fn tilde_paths_expand() {
        let config = BlockTimeConfig::default();
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
        assert!(config.export_path().ends_with("blocktime/export"));
    }
}
