//! Replay engine: drive a model through a script and snapshot each step.

use crate::error::{SnapError, SnapResult};
use crate::model::{Effect, Model};
use crate::sanitize::sanitize;
use crate::script::{load_script, Script};
use crate::snapshot::{SnapshotMode, SnapshotOutcome, SnapshotSuite, VerifyFn};
use gent_core::Set;
use serde::{Deserialize, Serialize};

/// Effect-driven updates allowed per settle before the fuse trips
pub const DEFAULT_SETTLE_LIMIT: usize = 100;

/// Extension of event script files
pub const DEFAULT_SCRIPT_EXTENSION: &str = "txt";

/// Replay engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// How golden files are treated
    pub mode: SnapshotMode,
    /// Maximum effect-driven updates in one settle
    pub settle_limit: usize,
    /// Script file extension, without the dot
    pub script_extension: String,
}

impl ReplayConfig {
    /// Default config with the mode taken from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_mode(SnapshotMode::from_env())
    }

    /// Set the snapshot mode
    #[must_use]
    pub fn with_mode(mut self, mode: SnapshotMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the settle limit
    #[must_use]
    pub fn with_settle_limit(mut self, limit: usize) -> Self {
        self.settle_limit = limit;
        self
    }

    /// Set the script file extension
    #[must_use]
    pub fn with_script_extension(mut self, extension: impl Into<String>) -> Self {
        self.script_extension = extension.into();
        self
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            mode: SnapshotMode::Verify,
            settle_limit: DEFAULT_SETTLE_LIMIT,
            script_extension: DEFAULT_SCRIPT_EXTENSION.to_string(),
        }
    }
}

/// Summary of a finished replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Run identifier the script was loaded for
    pub run_id: String,
    /// Sanitized snapshot names, in the order they were taken
    pub snapshots: Vec<String>,
    /// What each snapshot did with its golden file
    pub outcomes: Vec<SnapshotOutcome>,
    /// Key events delivered from the script
    pub events_delivered: usize,
    /// Effect-driven updates across all settles
    pub settle_steps: usize,
}

/// Name of snapshot `index` in run `run_id`, before sanitizing
#[must_use]
pub fn snapshot_name(run_id: &str, index: usize) -> String {
    format!("{}_{:03}", run_id, index)
}

/// Drives a [`Model`] through an event script
///
/// Snapshot 0 is the view after init has settled; snapshot `n` is the view
/// after group `n - 1` of the script has been delivered and settled.
#[derive(Debug)]
pub struct ReplayEngine<'s> {
    suite: &'s SnapshotSuite,
    config: ReplayConfig,
}

impl<'s> ReplayEngine<'s> {
    /// Create an engine over a snapshot suite
    #[must_use]
    pub fn new(suite: &'s SnapshotSuite) -> Self {
        Self {
            suite,
            config: ReplayConfig::default(),
        }
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Force effects and apply their messages until none remain
    ///
    /// Returns the settled model and the number of updates applied.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::NonConvergent`] once `settle_limit` updates have
    /// been applied and the chain still produces a message
    pub fn settle<M: Model>(&self, model: M, effect: Effect<M::Msg>) -> SnapResult<(M, usize)> {
        let mut model = model;
        let mut effect = effect;
        let mut steps = 0;

        while let Some(msg) = effect.force() {
            if steps >= self.config.settle_limit {
                tracing::warn!(iterations = steps, "effect chain did not settle");
                return Err(SnapError::NonConvergent { iterations: steps });
            }
            let (next, next_effect) = model.update(msg);
            model = next;
            effect = next_effect;
            steps += 1;
        }

        Ok((model, steps))
    }

    /// Replay the script for `run_id`, snapshotting after every settle point
    ///
    /// # Errors
    ///
    /// Any error aborts the replay: a missing script, an effect chain that
    /// never settles, or a golden file that cannot be read or written.
    /// View mismatches are not errors; they go to `equal`.
    pub fn replay<M: Model>(
        &self,
        model: M,
        run_id: &str,
        equal: VerifyFn<'_>,
    ) -> SnapResult<ReplayReport> {
        let script = load_script(
            self.suite.fs(),
            self.suite.root(),
            run_id,
            &self.config.script_extension,
        )?;
        self.replay_script(model, run_id, &script, equal)
    }

    /// Replay an already loaded script
    ///
    /// # Errors
    ///
    /// Same as [`ReplayEngine::replay`], minus script loading
    pub fn replay_script<M: Model>(
        &self,
        model: M,
        run_id: &str,
        script: &Script,
        equal: VerifyFn<'_>,
    ) -> SnapResult<ReplayReport> {
        let mut taken = Set::new();
        let mut report = ReplayReport {
            run_id: run_id.to_string(),
            snapshots: Vec::with_capacity(script.len() + 1),
            outcomes: Vec::with_capacity(script.len() + 1),
            events_delivered: 0,
            settle_steps: 0,
        };

        let effect = model.init();
        // Rendering must work before any update has happened.
        let _ = model.view();
        let (mut model, steps) = self.settle(model, effect)?;
        report.settle_steps += steps;
        self.take_snapshot(&model, 0, &mut taken, &mut report, equal)?;

        for (i, group) in script.groups().iter().enumerate() {
            for event in group {
                let (next, effect) = model.update(M::Msg::from(event.clone()));
                let (settled, steps) = self.settle(next, effect)?;
                model = settled;
                report.events_delivered += 1;
                report.settle_steps += steps;
            }
            self.take_snapshot(&model, i + 1, &mut taken, &mut report, equal)?;
        }

        tracing::debug!(
            run_id,
            snapshots = report.snapshots.len(),
            events = report.events_delivered,
            settle_steps = report.settle_steps,
            "replay finished"
        );
        Ok(report)
    }

    fn take_snapshot<M: Model>(
        &self,
        model: &M,
        index: usize,
        taken: &mut Set<String>,
        report: &mut ReplayReport,
        equal: VerifyFn<'_>,
    ) -> SnapResult<()> {
        let name = sanitize(&snapshot_name(&report.run_id, index));
        if !taken.add(name.clone()) {
            return Err(SnapError::DuplicateSnapshot { name });
        }
        let outcome = self
            .suite
            .new_snapshot(&name, self.config.mode, equal)
            .run(&model.view())?;
        report.snapshots.push(name);
        report.outcomes.push(outcome);
        Ok(())
    }
}

/// Replay `run_id` and panic on any harness failure
///
/// This is the entry point for tests. Setup failures (missing script,
/// runaway effects, unwritable golden files) are never recovered from.
/// Mismatches are left to `equal`.
///
/// # Panics
///
/// Panics if the replay returns an error
pub fn run_snapshots<M: Model>(
    suite: &SnapshotSuite,
    model: M,
    mode: SnapshotMode,
    run_id: &str,
    equal: VerifyFn<'_>,
) -> ReplayReport {
    let engine = ReplayEngine::new(suite).with_config(ReplayConfig::default().with_mode(mode));
    match engine.replay(model, run_id, equal) {
        Ok(report) => report,
        Err(err) => panic!("snapshot replay {} aborted: {}", run_id, err),
    }
}
