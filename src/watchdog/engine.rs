use std::time::{Duration, SystemTime};
use tracing::debug;

use super::QuicksaveObservation;

/// What a tick decided to do. Both actions can fire on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickPlan {
    /// Copy the quicksave to a numbered archive
    pub archive: bool,
    /// Inject the quicksave key into the game
    pub trigger: bool,
}

impl TickPlan {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-tick decision state machine.
///
/// The only state surviving across ticks is the mtime of the last quicksave
/// we archived. `None` means unseeded: the first quicksave we ever see
/// becomes the baseline instead of a new event, so a save that predates the
/// watchdog is never archived. The baseline advances only through
/// [`DecisionEngine::mark_archived`], after a copy actually succeeded, which
/// makes failed copies retry on every following tick.
#[derive(Debug)]
pub struct DecisionEngine {
    last_archived: Option<SystemTime>,
    archive_enabled: bool,
    trigger_enabled: bool,
    trigger_interval: Duration,
}

impl DecisionEngine {
    pub fn new(archive_enabled: bool, trigger_enabled: bool, trigger_interval: Duration) -> Self {
        Self {
            last_archived: None,
            archive_enabled,
            trigger_enabled,
            trigger_interval,
        }
    }

    pub fn last_archived(&self) -> Option<SystemTime> {
        self.last_archived
    }

    /// Record a successful archive copy of the quicksave written at `t`.
    pub fn mark_archived(&mut self, t: SystemTime) {
        self.last_archived = Some(t);
    }

    /// Decide this tick's actions for the observed quicksave.
    ///
    /// The trigger condition is re-evaluated from the quicksave's unmodified
    /// mtime every tick, so once past the threshold it keeps firing each
    /// tick until the game writes a new quicksave. That matches the original
    /// behavior and is intentional.
    pub fn plan(&mut self, observation: &QuicksaveObservation, now: SystemTime) -> TickPlan {
        let Some(last_archived) = self.last_archived else {
            debug!(
                "Seeding baseline from '{}'; treating it as pre-existing, not new",
                observation.path.display()
            );
            self.last_archived = Some(observation.last_modified);
            return TickPlan::none();
        };

        // Any mtime difference counts as a change, even a step backwards;
        // the game only ever rewrites the quicksave in place.
        let archive = self.archive_enabled && observation.last_modified != last_archived;

        let stale_for = now
            .duration_since(observation.last_modified)
            .unwrap_or(Duration::ZERO);
        let trigger = self.trigger_enabled && stale_for >= self.trigger_interval;

        TickPlan { archive, trigger }
    }
}
