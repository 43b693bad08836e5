use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::communication::messages::{Command, ControllerEvent};
use crate::config::ControllerConfig;
use crate::control_system::manual::ManualController;
use crate::control_system::scheduler;
use crate::models::intersection::{IntersectionState, Mode};
use crate::models::movement::{Approach, MovementKey};
use crate::monitoring::phase_log::PhaseRecorder;
use crate::storage::settings::{TimingPlan, TimingPlanStore};

const COMMAND_BUFFER: usize = 32;

/// Owns the single live intersection state and serialises every mutation:
/// scheduler ticks, operator commands and deferred manual releases.
pub struct TrafficLightController<S> {
    state: IntersectionState,
    manual: ManualController,
    store: S,
    config: ControllerConfig,
    recorder: Option<PhaseRecorder>,
}

impl<S: TimingPlanStore> TrafficLightController<S> {
    pub fn new(store: S, config: ControllerConfig) -> Self {
        let recorder = config.phase_log.clone().map(PhaseRecorder::new);
        Self {
            state: IntersectionState::new(),
            manual: ManualController::new(config.release_delay()),
            store,
            config,
            recorder,
        }
    }

    pub fn state(&self) -> &IntersectionState {
        &self.state
    }

    pub fn manual(&self) -> &ManualController {
        &self.manual
    }

    /// Brings the freshly created controller up in its initial mode.
    pub fn start(&mut self) {
        match self.state.mode {
            Mode::Automated => self.enter_automated(),
            Mode::Manual => {
                let event = self.manual.enter(&mut self.state);
                self.emit(event);
            }
        }
    }

    /// Switches operating mode. Re-selecting the current mode changes nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.state.mode {
            log::debug!("Already in {} mode", mode);
            return;
        }
        match mode {
            Mode::Automated => self.enter_automated(),
            Mode::Manual => {
                let event = self.manual.enter(&mut self.state);
                self.emit(event);
            }
        }
    }

    pub fn grant(&mut self, approach: Approach, is_left_turn: bool, now: Instant) {
        let movement = MovementKey::new(approach, is_left_turn);
        if let Some(event) = self.manual.grant(&mut self.state, movement, now) {
            self.emit(event);
        }
    }

    pub fn set_show_all_timers(&mut self, show: bool) {
        self.state.show_all_timers = show;
    }

    pub fn tick(&mut self) {
        if let Some(event) = scheduler::tick(&mut self.state) {
            self.emit(event);
        }
    }

    pub fn fire_due_releases(&mut self, now: Instant) {
        for event in self.manual.fire_due(&mut self.state, now) {
            self.emit(event);
        }
    }

    pub fn next_release_due(&self) -> Option<Instant> {
        self.manual.next_due()
    }

    /// Applies one operator command. Returns `false` on shutdown.
    pub fn apply(&mut self, command: Command, now: Instant) -> bool {
        match command {
            Command::SetMode(mode) => self.set_mode(mode),
            Command::Grant {
                approach,
                is_left_turn,
            } => self.grant(approach, is_left_turn, now),
            Command::SetShowAllTimers(show) => self.set_show_all_timers(show),
            Command::Shutdown => return false,
        }
        true
    }

    fn enter_automated(&mut self) {
        self.manual.cancel_all();
        let plan = self.store.load().unwrap_or_else(|| {
            log::info!("No stored timing settings, using built-in plan");
            TimingPlan::default()
        });
        let event = scheduler::start_automated(&mut self.state, &plan);
        self.emit(ControllerEvent::ModeChanged(Mode::Automated));
        self.emit(event);
    }

    fn emit(&self, event: ControllerEvent) {
        if let Some(recorder) = &self.recorder {
            if let Err(e) = recorder.record(&event) {
                log::warn!("Failed to record {} event: {}", event.kind(), e);
            }
        }
    }
}

impl<S: TimingPlanStore + Send + 'static> TrafficLightController<S> {
    /// Runs the dispatch loop until a shutdown command arrives or every
    /// command sender is dropped. Publishes a snapshot after each mutation.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<IntersectionState>,
    ) -> Self {
        let period = self.config.tick_period();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        snapshots.send_replace(self.state.clone());

        loop {
            let automated = self.state.mode == Mode::Automated;
            let release_due = self.manual.next_due();

            tokio::select! {
                _ = ticker.tick(), if automated => {
                    self.tick();
                }
                _ = time::sleep_until(release_due.unwrap_or_else(Instant::now)), if release_due.is_some() => {
                    self.fire_due_releases(Instant::now());
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if !self.apply(command, Instant::now()) {
                        break;
                    }
                    if !automated && self.state.mode == Mode::Automated {
                        // one full period before the first countdown step
                        ticker.reset();
                    }
                }
            }

            snapshots.send_replace(self.state.clone());
        }

        log::info!("Controller loop stopped");
        self
    }

    /// Starts the controller and spawns its loop on the current runtime.
    pub fn spawn(mut self) -> ControllerHandle<S> {
        self.start();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.state.clone());
        let join = tokio::spawn(self.run(command_rx, snapshot_tx));
        ControllerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            join,
        }
    }
}

/// Client side of a spawned controller.
pub struct ControllerHandle<S> {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<IntersectionState>,
    join: JoinHandle<TrafficLightController<S>>,
}

impl<S> ControllerHandle<S> {
    /// Queues a command; `false` once the loop has stopped.
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub fn snapshot(&self) -> IntersectionState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<IntersectionState> {
        self.snapshots.clone()
    }

    /// Stops the loop and hands the controller back.
    pub async fn shutdown(self) -> Option<TrafficLightController<S>> {
        let _ = self.commands.send(Command::Shutdown).await;
        match self.join.await {
            Ok(controller) => Some(controller),
            Err(e) => {
                log::error!("Controller task failed: {}", e);
                None
            }
        }
    }
}
