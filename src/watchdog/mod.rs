mod copier;
mod engine;
mod namer;
mod scan;
mod selector;

use anyhow::Result;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{Config, QUICKSAVE_KEY, QUICKSAVE_KEY_HOLD};
use crate::desktop::{ActiveWindowOracle, SaveTrigger};
use engine::DecisionEngine;

/// One file in the save directory, as of this tick's snapshot
#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub path: PathBuf,
    pub last_modified: SystemTime,
}

/// The authoritative quicksave chosen for this tick
#[derive(Debug, Clone)]
pub struct QuicksaveObservation {
    pub path: PathBuf,
    pub last_modified: SystemTime,
}

/// Drives one save-directory: polls on a fixed interval, archives changed
/// quicksaves and asks the game for a new one when the last save goes stale.
pub struct Watchdog<O, T> {
    config: Config,
    engine: DecisionEngine,
    oracle: O,
    trigger: T,
}

impl<O, T> Watchdog<O, T>
where
    O: ActiveWindowOracle,
    T: SaveTrigger,
{
    pub fn new(config: Config, oracle: O, trigger: T) -> Self {
        let engine = DecisionEngine::new(
            config.archive_copy_enabled,
            config.save_trigger_enabled,
            config.trigger_duration(),
        );
        Self {
            config,
            engine,
            oracle,
            trigger,
        }
    }

    /// Poll until `shutdown` flips. Each tick runs to completion before the
    /// next sleep begins, so ticks never overlap; shutdown is only observed
    /// between ticks, during the sleep.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Watching '{}' every {:.1}s",
            self.config.save_directory.display(),
            self.config.poll_interval
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_duration()) => {}
                _ = shutdown.changed() => {
                    info!("Shutdown requested, stopping watchdog");
                    return Ok(());
                }
            }
            self.tick();
        }
    }

    fn tick(&mut self) {
        self.tick_at(SystemTime::now());
    }

    /// One full pass: focus gate, scan, select, decide, act. Every failure
    /// inside is reported and turns the rest of the tick (or the offending
    /// action) into a no-op; nothing propagates out.
    fn tick_at(&mut self, now: SystemTime) {
        let title = match self.oracle.foreground_window_title() {
            Ok(title) => title,
            Err(e) => {
                warn!("Skipping this tick because the focused window is unknown: {e:#}");
                return;
            }
        };

        // Unfocused means the whole tick is skipped, scanning and archiving
        // included, not just the keystroke.
        if title != self.config.process_name {
            info!(
                "Skipping this tick because {} was not in focus",
                self.config.process_name
            );
            return;
        }

        let files = match scan::list_files(&self.config.save_directory) {
            Ok(files) => files,
            Err(e) => {
                warn!("Skipping this tick because the save directory scan failed: {e:#}");
                return;
            }
        };

        let Some(observation) = selector::select_quicksave(&files) else {
            info!(
                "Skipping this tick because no quicksaves were found in '{}'",
                self.config.save_directory.display()
            );
            return;
        };

        let age = now
            .duration_since(observation.last_modified)
            .unwrap_or_default();
        let plan = self.engine.plan(&observation, now);

        if plan.archive {
            let dest = namer::next_archive_path(&files, &observation.path);
            info!(
                "Copying '{}' to '{}' because the quicksave was modified {:.1?} ago",
                observation.path.display(),
                dest.display(),
                age
            );
            match copier::copy_locked(&observation.path, &dest) {
                Ok(bytes) => {
                    debug!("Archived {} bytes", bytes);
                    self.engine.mark_archived(observation.last_modified);
                }
                Err(e) => {
                    warn!("Archive copy failed, will retry next tick: {e}");
                }
            }
        }

        if plan.trigger {
            info!(
                "Sending {} to {} because the quicksave was modified {:.1?} ago",
                QUICKSAVE_KEY, self.config.process_name, age
            );
            if let Err(e) = self.trigger.press_and_release(QUICKSAVE_KEY, QUICKSAVE_KEY_HOLD) {
                warn!("Failed to inject {}: {e:#}", QUICKSAVE_KEY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs::File;
    use std::path::Path;
    use std::time::Duration;

    struct FakeOracle(&'static str);

    impl ActiveWindowOracle for FakeOracle {
        fn foreground_window_title(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FakeTrigger {
        fired: Cell<usize>,
    }

    impl FakeTrigger {
        fn new() -> Self {
            Self { fired: Cell::new(0) }
        }
    }

    impl SaveTrigger for FakeTrigger {
        fn press_and_release(&self, _key: &str, _hold: Duration) -> Result<()> {
            self.fired.set(self.fired.get() + 1);
            Ok(())
        }
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            save_directory: dir.to_path_buf(),
            process_name: "Starfield".to_string(),
            ..Config::default()
        }
    }

    fn write_with_mtime(path: &Path, contents: &[u8], mtime: SystemTime) {
        std::fs::write(path, contents).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_unfocused_tick_is_fully_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now();
        write_with_mtime(&dir.path().join("Quicksave0_x.sfs"), b"blob", t0);

        let mut watchdog = Watchdog::new(
            config_for(dir.path()),
            FakeOracle("Some Other Window"),
            FakeTrigger::new(),
        );
        watchdog.tick_at(t0 + Duration::from_secs(600));

        // Not even seeded: the scan itself was suppressed
        assert_eq!(watchdog.engine.last_archived(), None);
        assert_eq!(watchdog.trigger.fired.get(), 0);
    }

    #[test]
    fn test_empty_directory_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut watchdog = Watchdog::new(
            config_for(dir.path()),
            FakeOracle("Starfield"),
            FakeTrigger::new(),
        );
        watchdog.tick_at(SystemTime::now());

        assert_eq!(watchdog.engine.last_archived(), None);
        assert_eq!(watchdog.trigger.fired.get(), 0);
    }

    #[test]
    fn test_changed_quicksave_is_archived_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now();
        let quicksave = dir.path().join("Quicksave0_2024.sfs");
        write_with_mtime(&quicksave, b"first save", t0);
        write_with_mtime(&dir.path().join("Save1_a.sfs"), b"a", t0);
        write_with_mtime(&dir.path().join("Save3_b.sfs"), b"b", t0);

        let mut watchdog = Watchdog::new(
            config_for(dir.path()),
            FakeOracle("Starfield"),
            FakeTrigger::new(),
        );

        // Tick 1 only seeds the baseline
        watchdog.tick_at(t0 + Duration::from_secs(1));
        assert!(!dir.path().join("Save4_2024.sfs").exists());

        // Game rewrites the quicksave
        let t1 = t0 + Duration::from_secs(5);
        write_with_mtime(&quicksave, b"second save", t1);

        watchdog.tick_at(t0 + Duration::from_secs(11));
        let archive = dir.path().join("Save4_2024.sfs");
        assert_eq!(std::fs::read(&archive).unwrap(), b"second save");
        assert_eq!(watchdog.engine.last_archived(), Some(t1));
        assert_eq!(watchdog.trigger.fired.get(), 0);
    }

    #[test]
    fn test_stale_quicksave_fires_trigger_each_tick() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now();
        write_with_mtime(&dir.path().join("Quicksave0_x.sfs"), b"blob", t0);

        let mut watchdog = Watchdog::new(
            config_for(dir.path()),
            FakeOracle("Starfield"),
            FakeTrigger::new(),
        );

        watchdog.tick_at(t0 + Duration::from_secs(1));
        assert_eq!(watchdog.trigger.fired.get(), 0);

        watchdog.tick_at(t0 + Duration::from_secs(121));
        assert_eq!(watchdog.trigger.fired.get(), 1);

        // Still stale, fires again; no deduplication by design
        watchdog.tick_at(t0 + Duration::from_secs(131));
        assert_eq!(watchdog.trigger.fired.get(), 2);
    }

    #[tokio::test]
    async fn test_run_exits_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let watchdog = Watchdog::new(
            config_for(dir.path()),
            FakeOracle("Starfield"),
            FakeTrigger::new(),
        );

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(watchdog.run(rx));
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("run did not exit after shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}
