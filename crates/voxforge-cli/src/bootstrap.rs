//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the studio is wired together for the
//! CLI adapter:
//! - Settings are resolved (defaults, JSON file, env/flags) and validated
//! - The simulated backend and terminal progress emitter are chosen
//! - The studio service is started on the current Tokio runtime
//!
//! Command handlers receive the composed context and talk to the studio
//! through [`StudioPort`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxforge_core::ports::{StudioEventEmitter, StudioPort};
use voxforge_core::settings::{SettingsUpdate, StudioSettings, validate_settings};
use voxforge_studio::{SimulatedBackend, StudioService};

use crate::error::CliError;
use crate::presentation::TerminalProgress;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Effective studio settings.
    pub settings: StudioSettings,
    /// Settings file that was layered in, if any.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Config with built-in defaults only.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            settings: StudioSettings::with_defaults(),
            config_path: None,
        }
    }

    /// Resolve settings from every source, lowest precedence first:
    /// defaults, the JSON file at `config_path`, then `latency_ms`
    /// (flag or `VOXFORGE_LATENCY_MS`).
    pub fn from_sources(
        config_path: Option<&Path>,
        latency_ms: Option<u64>,
    ) -> Result<Self, CliError> {
        let mut settings = StudioSettings::with_defaults();

        if let Some(path) = config_path {
            let file = StudioSettings::load_json(path)?;
            settings.overlay(&file);
            tracing::debug!(path = %path.display(), "Loaded settings file");
        }

        if let Some(latency) = latency_ms {
            settings.merge(&SettingsUpdate {
                latency_ms: Some(Some(latency)),
                ..SettingsUpdate::default()
            });
        }

        validate_settings(&settings)?;

        Ok(Self {
            settings,
            config_path: config_path.map(Path::to_path_buf),
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The studio facade.
    pub studio: Arc<dyn StudioPort>,
    /// Settings the studio was built with.
    pub config: CliConfig,
}

impl CliContext {
    /// Access the studio.
    #[must_use]
    pub fn studio(&self) -> &Arc<dyn StudioPort> {
        &self.studio
    }

    /// Access the effective settings.
    #[must_use]
    pub const fn settings(&self) -> &StudioSettings {
        &self.config.settings
    }
}

/// Bootstrap the CLI application with terminal progress bars.
///
/// Must be called from within a Tokio runtime: the studio spawns its
/// background tasks here.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    bootstrap_with_emitter(config, Box::new(TerminalProgress::new()))
}

/// Bootstrap with an explicit event emitter.
pub fn bootstrap_with_emitter(
    config: CliConfig,
    emitter: Box<dyn StudioEventEmitter>,
) -> Result<CliContext, CliError> {
    validate_settings(&config.settings)?;

    let studio = StudioService::new(
        config.settings.clone(),
        Arc::new(SimulatedBackend::new()),
        emitter,
    );

    Ok(CliContext {
        studio: Arc::new(studio),
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use voxforge_core::ports::NoopEmitter;
    use voxforge_core::settings::SettingsError;

    #[test]
    fn defaults_only() {
        let config = CliConfig::from_sources(None, None).unwrap();
        assert_eq!(config.settings, StudioSettings::with_defaults());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "latency_ms": 3000, "history_capacity": 10 }}"#).unwrap();

        let config = CliConfig::from_sources(Some(file.path()), Some(1500)).unwrap();
        assert_eq!(config.settings.latency_ms, Some(1500));
        assert_eq!(config.settings.history_capacity, Some(10));
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "history_capacity": 0 }}"#).unwrap();

        let err = CliConfig::from_sources(Some(file.path()), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            CliError::from(SettingsError::InvalidHistoryCapacity(0)).to_string()
        );
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn bootstrap_builds_a_working_studio() {
        tokio_test::block_on(async {
            let ctx =
                bootstrap_with_emitter(CliConfig::default(), Box::new(NoopEmitter::new())).unwrap();
            let status = ctx.studio().status().await;
            assert_eq!(status.history_capacity, 50);
            assert_eq!(status.voice_count, 6);
        });
    }
}
