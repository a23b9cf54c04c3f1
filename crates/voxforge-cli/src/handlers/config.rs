//! Config command handler.

use anyhow::Result;
use voxforge_core::settings::{StudioSettings, validate_settings};

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;

/// Execute the config command.
///
/// `show` prints the effective settings on stdout; the source file, if any,
/// goes to stderr so the JSON can be piped.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if let Some(path) = &ctx.config.config_path {
                eprintln!("# from {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(ctx.settings())?);
            Ok(())
        }
        ConfigCommand::Validate { path } => {
            let settings = StudioSettings::load_json(&path).map_err(CliError::from)?;
            validate_settings(&settings).map_err(CliError::from)?;
            println!("✓ {} is valid", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::bootstrap::{CliConfig, bootstrap_with_emitter};
    use voxforge_core::ports::NoopEmitter;

    fn validate(contents: &str) -> Result<()> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();

        tokio_test::block_on(async {
            let ctx =
                bootstrap_with_emitter(CliConfig::default(), Box::new(NoopEmitter::new())).unwrap();
            execute(
                &ctx,
                ConfigCommand::Validate {
                    path: file.path().to_path_buf(),
                },
            )
        })
    }

    #[test]
    fn validate_accepts_good_file() {
        assert!(validate(r#"{ "latency_ms": 500 }"#).is_ok());
    }

    #[test]
    fn validate_reports_config_errors() {
        let err = validate(r#"{ "latency_ms": 0 }"#).unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), 78);

        let err = validate("not json").unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 78);
    }
}
