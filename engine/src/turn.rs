//! Processing of a single turn.

use grid_skirmish_core::{CellCoord, Combatant, Event, Outcome, TeamId, UnitId, UnitState};
use grid_skirmish_system_combat::{self as combat, Outcome as StrikeOutcome};
use grid_skirmish_system_movement::StepRequest;
use grid_skirmish_system_targeting::{closest_opponent, Target};

use crate::{Engine, EngineError, TurnReport};

impl<U: Combatant> Engine<U> {
    pub(crate) fn run_turn(
        &mut self,
        out: &mut Vec<Event>,
    ) -> Result<Option<TurnReport>, EngineError> {
        if self.active.len() < 2 {
            self.finish(Outcome::NotEnoughUnits, out);
            return Ok(None);
        }

        self.turn += 1;
        out.push(Event::TurnStarted { turn: self.turn });
        let mut report = TurnReport {
            turn: self.turn,
            ..TurnReport::default()
        };

        for slot in 0..self.active.len() {
            let id = self.active[slot];
            let Some(seeker) = self.snapshot(id) else {
                continue;
            };
            if !seeker.alive {
                continue;
            }

            let candidates = self.active.iter().filter_map(|other| self.snapshot(*other));
            match closest_opponent(&seeker, candidates) {
                None => {
                    if let Some(unit) = self.unit_mut(id) {
                        unit.halt();
                    }
                    tracing::warn!(unit = %id, "no opponent left to engage; halting");
                    out.push(Event::UnitHalted { unit: id });
                    report.halted += 1;
                }
                Some(target) if target.within_reach(seeker.attack_range) => {
                    self.attack(id, seeker.attack_power, target, &mut report, out)?;
                }
                Some(target) => {
                    self.step_toward(id, seeker.position, target, &mut report, out)?;
                }
            }
        }

        self.active.retain(|id| !self.kill_list.contains(id));
        self.kill_list.clear();

        let remaining = self.active.len();
        let winner = self
            .tally
            .iter()
            .find(|(_, count)| **count > 0 && **count == remaining)
            .map(|(team, _)| *team);
        if let Some(team) = winner {
            let outcome = Outcome::Victory { team };
            self.finish(outcome, out);
            report.outcome = Some(outcome);
        }

        tracing::debug!(
            turn = report.turn,
            attacks = report.attacks,
            moves = report.moves,
            deaths = report.deaths.len(),
            "turn processed"
        );
        Ok(Some(report))
    }

    fn attack(
        &mut self,
        attacker: UnitId,
        damage: f32,
        target: Target,
        report: &mut TurnReport,
        out: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if let Some(unit) = self.unit_mut(attacker) {
            unit.set_state(UnitState::Attacking);
        }
        let Some(victim) = self.unit_mut(target.unit) else {
            tracing::warn!(unit = %target.unit, "attack target is not registered");
            return Ok(());
        };

        let strike = combat::strike(damage, victim);
        let team = victim.team();
        out.push(Event::UnitAttacked {
            attacker,
            target: target.unit,
            damage: strike.damage,
            remaining_health: strike.remaining_health,
        });
        report.attacks += 1;

        if strike.outcome == StrikeOutcome::Killed {
            self.handle_killed(target.unit, team, attacker, target.position, report, out)?;
        }
        Ok(())
    }

    fn handle_killed(
        &mut self,
        victim: UnitId,
        team: TeamId,
        killer: UnitId,
        position: CellCoord,
        report: &mut TurnReport,
        out: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if self.grid.occupant(position)? == Some(victim) {
            let _ = self.grid.vacate(position)?;
        }
        self.kill_list.push(victim);
        self.decrement_tally(team);
        tracing::debug!(unit = %victim, %killer, "unit killed");
        out.push(Event::UnitDied {
            unit: victim,
            team,
            killer,
        });
        report.deaths.push(victim);
        Ok(())
    }

    fn step_toward(
        &mut self,
        id: UnitId,
        from: CellCoord,
        target: Target,
        report: &mut TurnReport,
        out: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        let request = StepRequest {
            unit: id,
            from,
            target: target.unit,
            target_position: target.position,
        };

        let Some(to) = self.selector.next_cell(&self.grid, &request)? else {
            tracing::warn!(unit = %id, target = %target.unit, "no cell brings the unit closer");
            out.push(Event::MoveBlocked {
                unit: id,
                target: target.unit,
            });
            report.blocked += 1;
            return Ok(());
        };

        let _ = self.grid.vacate(from)?;
        self.grid.occupy(to, id)?;
        if let Some(unit) = self.unit_mut(id) {
            unit.set_position(to);
            unit.set_state(UnitState::Moving);
        }
        out.push(Event::UnitMoved {
            unit: id,
            from,
            to,
            step_duration: self.time_step,
        });
        report.moves += 1;
        Ok(())
    }
}
