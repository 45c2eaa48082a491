use std::time::Duration;

use grid_skirmish_core::{CellCoord, Presenter, UnitId};

/// Presenter that narrates engine side effects through the log.
#[derive(Debug, Default)]
pub(crate) struct LogPresenter {
    attacks: usize,
    moves: usize,
    deaths: usize,
}

impl LogPresenter {
    pub(crate) const fn attacks(&self) -> usize {
        self.attacks
    }

    pub(crate) const fn moves(&self) -> usize {
        self.moves
    }

    pub(crate) const fn deaths(&self) -> usize {
        self.deaths
    }
}

impl Presenter for LogPresenter {
    fn on_attack(&mut self, attacker: UnitId, target: UnitId) {
        self.attacks += 1;
        tracing::debug!(%attacker, %target, "attack");
    }

    fn on_move(&mut self, unit: UnitId, destination: CellCoord, step_duration: Duration) {
        self.moves += 1;
        tracing::debug!(%unit, %destination, ?step_duration, "move");
    }

    fn on_death(&mut self, unit: UnitId) {
        self.deaths += 1;
        tracing::info!(%unit, "unit died");
    }
}
