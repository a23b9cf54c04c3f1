//! Terminal progress bars driven by studio events.
//!
//! Bars draw to stderr, so `--json` output on stdout stays clean.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use voxforge_core::events::{JobState, StudioEvent};
use voxforge_core::ports::StudioEventEmitter;

/// Event emitter rendering synthesis and training progress with `indicatif`.
#[derive(Clone, Default)]
pub struct TerminalProgress {
    bar: Arc<Mutex<Option<ProgressBar>>>,
}

impl TerminalProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn create_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:<12} [{bar:30.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(&self, message: &str) {
        let mut guard = self.lock();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(Self::create_bar(message));
    }

    fn update(&self, percent: u8, message: Option<&str>) {
        let guard = self.lock();
        if let Some(pb) = guard.as_ref() {
            pb.set_position(u64::from(percent));
            if let Some(message) = message {
                pb.set_message(message.to_string());
            }
        }
    }

    fn finish(&self) {
        if let Some(pb) = self.lock().take() {
            pb.finish_and_clear();
        }
    }

    fn abandon(&self, message: &str) {
        if let Some(pb) = self.lock().take() {
            pb.abandon_with_message(message.to_string());
        }
    }
}

impl StudioEventEmitter for TerminalProgress {
    fn emit(&self, event: StudioEvent) {
        match event {
            StudioEvent::SynthesisState {
                state: JobState::Pending,
            } => self.start("generating"),
            StudioEvent::SynthesisState { .. } => {}
            StudioEvent::SynthesisProgress { percent, .. } => self.update(percent, None),
            StudioEvent::SynthesisCompleted { .. } | StudioEvent::TrainingCompleted { .. } => {
                self.finish();
            }
            StudioEvent::SynthesisFailed { error, .. } => self.abandon(&format!("failed: {error}")),
            StudioEvent::SynthesisCancelled { .. } | StudioEvent::TrainingCancelled { .. } => {
                self.abandon("cancelled");
            }
            StudioEvent::TrainingProgress {
                percent, status, ..
            } => {
                if percent == 0 {
                    self.start(status.to_string().as_str());
                } else {
                    self.update(percent, Some(status.to_string().as_str()));
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn StudioEventEmitter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxforge_core::events::TrainingStatus;

    #[test]
    fn bar_lifecycle_follows_events() {
        let progress = TerminalProgress::new();
        progress.emit(StudioEvent::SynthesisState {
            state: JobState::Pending,
        });
        assert!(progress.lock().is_some());

        progress.emit(StudioEvent::SynthesisProgress { job: 1, percent: 40 });
        assert_eq!(progress.lock().as_ref().map(ProgressBar::position), Some(40));

        progress.emit(StudioEvent::SynthesisCancelled { job: 1 });
        assert!(progress.lock().is_none());
    }

    #[test]
    fn training_progress_starts_and_updates() {
        let progress = TerminalProgress::new();
        progress.emit(StudioEvent::TrainingProgress {
            job: 1,
            percent: 0,
            status: TrainingStatus::Training,
        });
        progress.emit(StudioEvent::TrainingProgress {
            job: 1,
            percent: 60,
            status: TrainingStatus::Processing,
        });
        assert_eq!(progress.lock().as_ref().map(ProgressBar::position), Some(60));
    }
}
