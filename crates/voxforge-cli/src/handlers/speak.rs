//! Speak command handler.
//!
//! One-shot generation: submit, wait for the outcome, print it. Ctrl+C
//! cancels the pending job instead of killing the process mid-job.

use anyhow::Result;
use voxforge_core::domain::{ParameterSet, SynthesisResult};
use voxforge_core::ports::{StudioError, StudioPort};

use crate::bootstrap::CliContext;
use crate::commands::SpeakArgs;
use crate::error::CliError;
use crate::presentation::print_result;

/// Execute the speak command.
pub async fn execute(ctx: &CliContext, args: SpeakArgs) -> Result<()> {
    let SpeakArgs {
        text,
        voice,
        tuning,
        json,
    } = args;
    let parameters = tuning.to_parameters(&voice);

    let result = generate_interruptible(ctx.studio().as_ref(), text, parameters)
        .await
        .map_err(CliError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Generate, cancelling the job if the user presses Ctrl+C first.
pub(crate) async fn generate_interruptible(
    studio: &dyn StudioPort,
    text: String,
    parameters: ParameterSet,
) -> Result<SynthesisResult, StudioError> {
    until_interrupted(studio.generate(text, parameters), ctrl_c(), studio.cancel()).await
}

/// Resolves on Ctrl+C; never resolves if the signal cannot be watched.
pub(crate) async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Drive `job` to its outcome, requesting `cancel` once `interrupt` fires.
///
/// The job is still awaited after an interrupt: a cancelled job reports
/// [`StudioError::Cancelled`], while one that finished before the cancel
/// landed reports its real outcome.
pub(crate) async fn until_interrupted<T, J, I, C>(
    job: J,
    interrupt: I,
    cancel: C,
) -> Result<T, StudioError>
where
    J: Future<Output = Result<T, StudioError>>,
    I: Future<Output = ()>,
    C: Future<Output = bool>,
{
    tokio::pin!(job);
    tokio::select! {
        outcome = &mut job => outcome,
        () = interrupt => {
            if cancel.await {
                tracing::info!("Job cancelled by user");
            } else {
                tracing::debug!("Job finished before it could be cancelled");
            }
            job.await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap_with_emitter};
    use voxforge_core::ports::NoopEmitter;
    use voxforge_core::settings::StudioSettings;

    fn fast_config() -> CliConfig {
        CliConfig {
            settings: StudioSettings {
                latency_ms: Some(10),
                ..StudioSettings::with_defaults()
            },
            config_path: None,
        }
    }

    #[test]
    fn generate_completes_without_interrupt() {
        tokio_test::block_on(async {
            let ctx = bootstrap_with_emitter(fast_config(), Box::new(NoopEmitter::new())).unwrap();
            let result = generate_interruptible(
                ctx.studio().as_ref(),
                "Hello world".to_string(),
                ParameterSet::for_voice("adam-deep"),
            )
            .await
            .unwrap();

            assert_eq!(result.source_request.text(), "Hello world");
            assert_eq!(ctx.studio().history().await.len(), 1);
        });
    }

    #[test]
    fn interrupt_cancels_pending_job() {
        tokio_test::block_on(async {
            let ctx =
                bootstrap_with_emitter(CliConfig::default(), Box::new(NoopEmitter::new())).unwrap();
            let studio = ctx.studio().as_ref();

            let outcome = until_interrupted(
                studio.generate("Stop me".to_string(), ParameterSet::for_voice("preset_1")),
                tokio::time::sleep(std::time::Duration::from_millis(50)),
                studio.cancel(),
            )
            .await;

            assert_eq!(outcome.unwrap_err(), StudioError::Cancelled);
            assert!(studio.history().await.is_empty());
        });
    }

    #[test]
    fn interrupt_after_completion_keeps_the_result() {
        tokio_test::block_on(async {
            let job = async {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok::<_, StudioError>("generated-audio.mp3")
            };

            // The cancel finds nothing pending, so the job's own outcome wins.
            let outcome = until_interrupted(job, std::future::ready(()), async { false }).await;
            assert_eq!(outcome, Ok("generated-audio.mp3"));
        });
    }

    #[test]
    fn unknown_voice_maps_to_usage_error() {
        tokio_test::block_on(async {
            let ctx = bootstrap_with_emitter(fast_config(), Box::new(NoopEmitter::new())).unwrap();
            let err = generate_interruptible(
                ctx.studio().as_ref(),
                "Hello".to_string(),
                ParameterSet::for_voice("nobody"),
            )
            .await
            .unwrap_err();
            assert_eq!(CliError::from(err).exit_code(), 2);
        });
    }
}
