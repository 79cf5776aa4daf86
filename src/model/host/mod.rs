//! Orchestration of a running world.
//!
//! A [`GameHost`] owns the current [`WorldStep`], the host RNG and the
//! best/selected creature tracking. Front ends drive it through
//! [`GameHost::next_step`] and listen to [`CreatureChange`] notifications.

use crate::model::config::AppConfig;
use biotope_core::step::{ActionReport, WorldStep};
use biotope_core::Metrics;
use biotope_data::{CreatureId, StepAction};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod init;
pub mod update;

pub use biotope_core::init_logging;
pub use diagnostics::{CreatureInfo, GatherFlags, NodeInfo};

/// Which tracked creature changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Best,
    Selected,
}

/// A reassignment of the best or selected creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureChange {
    pub kind: ChangeKind,
    pub old: Option<CreatureId>,
    pub new: Option<CreatureId>,
}

type Subscriber = Box<dyn FnMut(&CreatureChange) + Send>;

/// Everything one call to [`GameHost::next_step`] produced.
#[derive(Debug, Clone, Default)]
pub struct StepResult {
    pub tick: u64,
    /// Actions chosen for the next tick, one per living creature.
    pub actions: Vec<StepAction>,
    /// Outcome of executing the previous tick's actions.
    pub report: ActionReport,
    pub removed_creatures: usize,
    pub removed_food: usize,
    pub aged_out: usize,
    pub food_spawned: bool,
    pub diagnostics: Vec<CreatureInfo>,
}

/// Totals for one run of [`GameHost::run_generation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u64,
    pub ticks: u64,
    pub peak_population: usize,
    pub births: usize,
    pub deaths: usize,
    pub best_creature: Option<CreatureId>,
    pub extinct: bool,
}

pub struct GameHost {
    pub config: AppConfig,
    pub step: WorldStep,
    pub tick: u64,
    pub generation: u64,
    pub metrics: Metrics,
    rng: ChaCha8Rng,
    seed: u64,
    pending_actions: Vec<StepAction>,
    best_creature: Option<CreatureId>,
    selected_creature: Option<CreatureId>,
    subscribers: Vec<Subscriber>,
}

impl GameHost {
    #[must_use]
    pub fn best_creature(&self) -> Option<CreatureId> {
        self.best_creature
    }

    #[must_use]
    pub fn selected_creature(&self) -> Option<CreatureId> {
        self.selected_creature
    }

    /// Seed behind the per-creature RNG streams.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Actions queued for the next [`GameHost::advance`].
    #[must_use]
    pub fn pending_actions(&self) -> &[StepAction] {
        &self.pending_actions
    }

    /// Registers a callback for best/selected reassignments.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&CreatureChange) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Marks a creature for inspection. Notifies only when the value changes.
    pub fn set_selected_creature(&mut self, id: Option<CreatureId>) {
        let old = self.selected_creature;
        if old != id {
            self.selected_creature = id;
            self.notify(ChangeKind::Selected, old, id);
        }
    }

    fn set_best_creature(&mut self, id: Option<CreatureId>) {
        let old = self.best_creature;
        if old != id {
            self.best_creature = id;
            self.notify(ChangeKind::Best, old, id);
        }
    }

    fn notify(&mut self, kind: ChangeKind, old: Option<CreatureId>, new: Option<CreatureId>) {
        let change = CreatureChange { kind, old, new };
        tracing::debug!(?kind, ?old, ?new, "Tracked creature changed");
        for subscriber in &mut self.subscribers {
            subscriber(&change);
        }
    }
}
