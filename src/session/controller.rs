//! Work/short-break/long-break state machine.
//!
//! The controller owns the current [`Timer`] and drains its event channel
//! synchronously after every operation. Each timer carries an id, and events
//! from a timer that has since been replaced are dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::event::{SessionEvent, TransitionReason};
use crate::notification::{Notifier, NotifyOptions, COMPLETION_TAG, COMPLETION_TITLE};
use crate::storage::SessionStore;
use crate::sync::SessionSync;
use crate::timer::{Clock, Timer, TimerEvent};
use crate::types::{Mode, SavedSession, SessionRecord, SessionState, TimerConfig};

/// External services the controller reports to.
#[derive(Clone)]
pub struct Gateways {
    pub storage: Arc<dyn SessionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub sync: Arc<dyn SessionSync>,
}

/// Drives mode transitions on timer completion.
pub struct SessionController {
    config: TimerConfig,
    state: SessionState,
    timer: Timer,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    clock: Arc<dyn Clock>,
    gateways: Gateways,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    next_timer_id: u64,
}

impl SessionController {
    /// Creates a controller in `Work` mode with zeroed counters.
    pub fn new(config: TimerConfig, clock: Arc<dyn Clock>, gateways: Gateways) -> Self {
        Self::with_state(config, SessionState::default(), clock, gateways)
    }

    /// Creates a controller from the saved config and session.
    ///
    /// Missing or invalid saved data falls back to defaults. The restored
    /// timer is always paused; a timer that was running when saved resumes
    /// from its saved remaining time.
    pub fn restore(clock: Arc<dyn Clock>, gateways: Gateways) -> Self {
        let config = gateways.storage.restore_config().unwrap_or_default();
        let saved = gateways.storage.restore_session();
        let state = saved
            .as_ref()
            .map(SavedSession::session_state)
            .unwrap_or_default();

        let mut controller = Self::with_state(config, state, clock, gateways);

        if let Some(saved) = saved {
            let elapsed_ms = if saved.timer_running {
                let duration = i64::from(controller.timer.duration_seconds());
                (duration - i64::from(saved.timer_remaining_seconds)) * 1000
            } else {
                saved.timer_accumulated_paused_ms
            };
            controller.timer.restore_elapsed(elapsed_ms);
            info!(
                mode = state.mode.as_str(),
                completed = state.completed_work_sessions,
                "Session restored"
            );
        }

        controller
    }

    fn with_state(
        config: TimerConfig,
        state: SessionState,
        clock: Arc<dyn Clock>,
        gateways: Gateways,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let timer = Timer::new(
            1,
            config.duration_for(state.mode),
            Arc::clone(&clock),
            timer_tx.clone(),
        );
        gateways
            .notifier
            .configure(config.sound_enabled, config.notification_enabled);

        Self {
            config,
            state,
            timer,
            timer_tx,
            timer_rx,
            clock,
            gateways,
            events: None,
            next_timer_id: 2,
        }
    }

    /// Returns a receiver for [`SessionEvent`]s, replacing any earlier one.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    // ------------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------------

    /// Starts a paused timer or pauses a running one.
    pub fn toggle(&mut self) {
        if self.timer.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn start(&mut self) {
        if self.timer.is_running() {
            return;
        }

        self.timer.start();
        self.publish(SessionEvent::Started {
            mode: self.state.mode,
        });
        self.process_timer_events();
        self.save_state();
    }

    pub fn pause(&mut self) {
        if !self.timer.is_running() {
            return;
        }

        self.timer.pause();
        self.publish(SessionEvent::Paused {
            mode: self.state.mode,
        });
        self.save_state();
    }

    /// Rewinds the current interval to its full duration, paused.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.publish(SessionEvent::Reset {
            mode: self.state.mode,
        });
        self.process_timer_events();
        self.save_state();
    }

    /// Moves to the next mode without counting, notifying or syncing.
    pub fn skip(&mut self) {
        self.timer.pause();
        let from = self.state.mode;
        let to = self.next_mode(from);
        self.switch_mode(to, TransitionReason::Skipped);
        self.save_state();
    }

    /// Replaces the configuration and restarts the current interval from zero.
    ///
    /// Counters and mode are kept. The config is persisted; the session
    /// snapshot is not.
    ///
    /// # Errors
    ///
    /// Returns the validation message and changes nothing if `config` is invalid.
    pub fn apply_settings(&mut self, config: TimerConfig) -> Result<(), String> {
        config.validate()?;

        self.timer.pause();
        self.gateways
            .notifier
            .configure(config.sound_enabled, config.notification_enabled);
        self.gateways.storage.save_config(&config);
        self.config = config;

        self.timer = self.new_timer(self.state.mode);
        self.publish(SessionEvent::Tick {
            mode: self.state.mode,
            remaining_seconds: self.timer.remaining_seconds(),
        });
        debug!("Settings applied");
        Ok(())
    }

    /// Runs one scheduler frame. Returns whether the timer is still running.
    pub fn on_frame(&mut self) -> bool {
        self.timer.frame();
        self.process_timer_events();
        self.timer.is_running()
    }

    /// Persists the current session snapshot.
    pub fn save_state(&self) {
        self.gateways.storage.save_session(&self.snapshot());
    }

    /// Returns the snapshot written by [`save_state`](Self::save_state).
    pub fn snapshot(&self) -> SavedSession {
        SavedSession {
            mode: self.state.mode,
            completed_work_sessions: self.state.completed_work_sessions,
            total_focus_seconds: self.state.total_focus_seconds,
            timer_running: self.timer.is_running(),
            timer_remaining_seconds: self.timer.remaining_seconds(),
            timer_accumulated_paused_ms: self.timer.accumulated_paused_ms(),
            timer_start_epoch_ms: self.timer.start_epoch_ms(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.state.completed_work_sessions
    }

    pub fn total_focus_seconds(&self) -> u64 {
        self.state.total_focus_seconds
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn process_timer_events(&mut self) {
        while let Ok(event) = self.timer_rx.try_recv() {
            if event.timer_id() != self.timer.id() {
                debug!(
                    stale_id = event.timer_id(),
                    current_id = self.timer.id(),
                    "dropping event from replaced timer"
                );
                continue;
            }

            match event {
                TimerEvent::Tick {
                    remaining_seconds, ..
                } => self.publish(SessionEvent::Tick {
                    mode: self.state.mode,
                    remaining_seconds,
                }),
                TimerEvent::Completed { .. } => self.handle_completion(),
            }
        }
    }

    fn handle_completion(&mut self) {
        let from = self.state.mode;

        if from == Mode::Work {
            let work = self.config.work_duration;
            self.state.completed_work_sessions += 1;
            self.state.total_focus_seconds += u64::from(work);

            let end_ts = self.clock.now_ms() / 1000;
            self.gateways.sync.submit(SessionRecord::work(end_ts, work));

            info!(
                completed = self.state.completed_work_sessions,
                total_focus_seconds = self.state.total_focus_seconds,
                "Work session completed"
            );
            self.publish(SessionEvent::WorkSessionCompleted {
                completed_work_sessions: self.state.completed_work_sessions,
                total_focus_seconds: self.state.total_focus_seconds,
            });
        }

        let to = self.next_mode(from);
        self.switch_mode(to, TransitionReason::Completed);

        self.gateways.notifier.play_bell();
        self.gateways.notifier.notify(
            COMPLETION_TITLE,
            &NotifyOptions {
                body: format!("次は {} です", to.label()),
                tag: COMPLETION_TAG.to_string(),
            },
        );

        if self.config.auto_start && self.timer.duration_seconds() > 0 {
            self.timer.start();
            self.publish(SessionEvent::Started { mode: to });
        }

        self.save_state();
    }

    fn switch_mode(&mut self, to: Mode, reason: TransitionReason) {
        let from = self.state.mode;
        self.state.mode = to;
        self.timer = self.new_timer(to);

        debug!(from = from.as_str(), to = to.as_str(), ?reason, "mode changed");
        self.publish(SessionEvent::ModeChanged { from, to, reason });
        self.publish(SessionEvent::Tick {
            mode: to,
            remaining_seconds: self.timer.remaining_seconds(),
        });
    }

    fn next_mode(&self, from: Mode) -> Mode {
        match from {
            Mode::Work => {
                let interval = self.config.effective_long_break_interval();
                if self.state.completed_work_sessions % interval == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        }
    }

    fn new_timer(&mut self, mode: Mode) -> Timer {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        Timer::new(
            id,
            self.config.duration_for(mode),
            Arc::clone(&self.clock),
            self.timer_tx.clone(),
        )
    }

    fn publish(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("session event receiver dropped");
            }
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
