//! Asynchronous driver that feeds player input and timers into the controller.

use std::future;

use log::{debug, info};
use origin_defence_core::{Event, GameSnapshot, PlayerInput};
use tokio::{
    sync::{mpsc, watch},
    time::{self, MissedTickBehavior},
};

use crate::TurnController;

/// Presentation hook notified after every batch of state changes.
pub trait Observer {
    /// Receives the events of a batch together with the state they produced.
    fn observe(&mut self, events: &[Event], snapshot: &GameSnapshot);
}

/// Single-task session that owns the controller for its whole lifetime.
///
/// Inputs, the attack alert and the pursuit ticks are multiplexed on one
/// `select!` loop, so the controller is never accessed concurrently.
#[derive(Debug)]
pub struct Session<O> {
    controller: TurnController,
    observer: O,
    events: Vec<Event>,
}

impl<O: Observer> Session<O> {
    /// Creates a session around an existing controller.
    #[must_use]
    pub fn new(controller: TurnController, observer: O) -> Self {
        Self {
            controller,
            observer,
            events: Vec::new(),
        }
    }

    /// Processes inputs until `Quit`, a closed input channel or a shutdown signal.
    ///
    /// Returns the controller so callers can inspect the final state. An
    /// attack interrupted by shutdown is abandoned mid-flight.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<PlayerInput>,
        mut shutdown: watch::Receiver<bool>,
    ) -> TurnController {
        info!("{}", origin_defence_world::query::welcome_banner(self.controller.world()));
        self.publish();

        loop {
            tokio::select! {
                biased;
                () = stop_requested(&mut shutdown) => break,
                input = inputs.recv() => {
                    let Some(input) = input.filter(|input| *input != PlayerInput::Quit) else {
                        break;
                    };
                    self.controller.handle_input(input, &mut self.events);
                    self.publish();
                    if self.controller.phase().is_attack()
                        && !self.resolve_attack(&mut inputs, &mut shutdown).await
                    {
                        break;
                    }
                }
            }
        }

        info!("session ended");
        self.controller
    }

    async fn resolve_attack(
        &mut self,
        inputs: &mut mpsc::Receiver<PlayerInput>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        let config = self.controller.config().clone();

        let alert = time::sleep(config.alert_duration());
        tokio::pin!(alert);
        loop {
            tokio::select! {
                biased;
                () = stop_requested(shutdown) => return false,
                input = inputs.recv() => {
                    if !self.reject_during_attack(input) {
                        return false;
                    }
                }
                () = &mut alert => break,
            }
        }
        let _ = self.controller.finish_alert(&mut self.events);
        self.publish();

        if self.controller.creep_count() > 0 {
            let mut ticker = time::interval(config.tick_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = stop_requested(shutdown) => return false,
                    input = inputs.recv() => {
                        if !self.reject_during_attack(input) {
                            return false;
                        }
                    }
                    _ = ticker.tick() => {
                        let remaining = self
                            .controller
                            .pursuit_tick(config.tick_interval(), &mut self.events);
                        self.publish();
                        if !remaining {
                            break;
                        }
                    }
                }
            }
        }

        let _ = self.controller.finish_attack(&mut self.events);
        self.publish();
        true
    }

    fn reject_during_attack(&mut self, input: Option<PlayerInput>) -> bool {
        match input {
            None | Some(PlayerInput::Quit) => {
                debug!("attack abandoned");
                false
            }
            Some(input) => {
                self.controller.handle_input(input, &mut self.events);
                self.publish();
                true
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = self.controller.snapshot();
        self.observer.observe(&self.events, &snapshot);
        self.events.clear();
    }
}

async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let stopped = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !stopped {
        future::pending::<()>().await;
    }
}
