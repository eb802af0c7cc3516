use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mofneb::engine::progress::{Progress, ProgressCallback};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders engine progress events as a single indicatif bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    skipped: Arc<AtomicUsize>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Starting...");
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            skipped: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `SiteSkipped` events seen so far.
    pub fn skipped_sites(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let skipped = self.skipped.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message("✓ Done");
                }
                Progress::TaskStart { total_steps } => {
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_style(Self::bar_style());
                    pb.set_message("Sites");
                }
                Progress::TaskIncrement => pb.inc(1),
                Progress::TaskFinish => {
                    let total = pb.length().unwrap_or(0);
                    pb.set_position(total);
                    pb.finish();
                }
                Progress::SiteSkipped { symbol, index } => {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    pb.println(format!("  ! no clear direction at {} #{}", symbol, index));
                }
                Progress::Message(msg) => {
                    if pb.is_finished() {
                        pb.set_message(msg);
                    } else {
                        pb.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
