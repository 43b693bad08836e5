use tokio::time::{Duration, Instant};

use crate::communication::messages::ControllerEvent;
use crate::control_system::conflicts::conflicts_of;
use crate::control_system::timing::clear_all;
use crate::models::intersection::{IntersectionState, Mode};
use crate::models::movement::{Approach, MovementKey, Status};

/// A deferred caution-to-stop transition for one movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRelease {
    pub movement: MovementKey,
    pub expected: Status,
    pub generation: u64,
    pub due: Instant,
}

/// Operator override: toggles single movements, stops their conflicts and
/// lets released movements drop to stop after a dwell.
#[derive(Debug)]
pub struct ManualController {
    release_delay: Duration,
    generations: [u64; 8],
    pending: Vec<PendingRelease>,
}

impl ManualController {
    pub fn new(release_delay: Duration) -> Self {
        Self {
            release_delay,
            generations: [0; 8],
            pending: Vec::new(),
        }
    }

    /// Switches the state to manual: every countdown zeroed, every movement
    /// stopped, all-red shown. Any releases still queued are dropped.
    pub fn enter(&mut self, state: &mut IntersectionState) -> ControllerEvent {
        self.cancel_all();
        clear_all(&mut state.directions);
        state.mode = Mode::Manual;
        state.current_direction = Approach::North;
        state.all_red_phase = true;
        log::info!("Manual override engaged, all movements stopped");
        ControllerEvent::ModeChanged(Mode::Manual)
    }

    /// Toggles one movement on operator request.
    ///
    /// A stopped movement goes to go and every conflicting movement is
    /// stopped on the spot; any other status drops to caution and a release
    /// to stop is queued for `release_delay` later.
    pub fn grant(
        &mut self,
        state: &mut IntersectionState,
        movement: MovementKey,
        now: Instant,
    ) -> Option<ControllerEvent> {
        if state.mode != Mode::Manual {
            log::debug!("Grant of {} ignored outside manual mode", movement);
            return None;
        }

        let previous = state.directions[movement.approach].status(movement.turn);
        let next = if previous == Status::Stop {
            Status::Go
        } else {
            Status::Caution
        };
        state.directions[movement.approach].set_status(movement.turn, next);
        let generation = self.bump(movement);

        if previous != Status::Stop {
            self.pending.push(PendingRelease {
                movement,
                expected: next,
                generation,
                due: now + self.release_delay,
            });
        }

        let mut stopped = Vec::new();
        if next == Status::Go {
            for &other in conflicts_of(movement) {
                let dir = &mut state.directions[other.approach];
                if dir.status(other.turn) != Status::Stop {
                    dir.set_status(other.turn, Status::Stop);
                    stopped.push(other);
                }
            }
            state.current_direction = movement.approach;
        }

        log::info!("Manual {} -> {} (was {})", movement, next, previous);
        if !stopped.is_empty() {
            let names: Vec<String> = stopped.iter().map(|m| m.to_string()).collect();
            log::info!("Stopped conflicting movements: {}", names.join(", "));
        }

        Some(ControllerEvent::Granted {
            movement,
            status: next,
            stopped,
        })
    }

    /// Applies every release due at `now`. A release whose movement has been
    /// commanded again since, or whose status moved on, is dropped.
    pub fn fire_due(&mut self, state: &mut IntersectionState, now: Instant) -> Vec<ControllerEvent> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|release| release.due <= now);
        self.pending = waiting;

        let mut events = Vec::new();
        for release in due {
            let movement = release.movement;
            let dir = &mut state.directions[movement.approach];
            let stale = release.generation != self.generations[movement.index()]
                || dir.status(movement.turn) != release.expected;
            if stale {
                log::debug!("Stale release of {} skipped", movement);
                continue;
            }
            dir.set_status(movement.turn, Status::Stop);
            log::info!("Manual {} released to STOP", movement);
            events.push(ControllerEvent::Released { movement });
        }
        events
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|release| release.due).min()
    }

    pub fn pending(&self) -> &[PendingRelease] {
        &self.pending
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending releases", self.pending.len());
        }
        self.pending.clear();
    }

    fn bump(&mut self, movement: MovementKey) -> u64 {
        let slot = &mut self.generations[movement.index()];
        *slot += 1;
        *slot
    }
}
