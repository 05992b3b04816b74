//! Interactive session loop.
//!
//! Multiplexes scheduler frames (only while the timer runs), user commands
//! and a shutdown signal on a single task, and renders after every step.

use std::future::Future;
use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::display::Display;
use crate::session::{SessionController, SessionEvent};
use crate::timer::FrameScheduler;

// ============================================================================
// UserCommand
// ============================================================================

/// Keyboard commands of the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Toggle,
    Reset,
    Skip,
    Quit,
}

impl UserCommand {
    /// Parses one input line. An empty line or a space toggles.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => Some(Self::Toggle),
            "r" | "R" => Some(Self::Reset),
            "s" | "S" => Some(Self::Skip),
            "q" | "Q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Reads commands from stdin on a dedicated thread.
///
/// End of input is reported as [`UserCommand::Quit`]. The thread is detached
/// so a pending read never holds up shutdown.
pub fn spawn_stdin_commands() -> mpsc::UnboundedReceiver<UserCommand> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("入力の読み取りに失敗しました: {}", e);
                        break;
                    }
                };
                match UserCommand::parse(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                    None => Display::show_controls(),
                }
            }
            let _ = tx.send(UserCommand::Quit);
        });

    if let Err(e) = spawned {
        warn!("入力スレッドを起動できませんでした: {}", e);
    }

    rx
}

// ============================================================================
// SessionRunner
// ============================================================================

/// Drives a [`SessionController`] from a frame scheduler and user input.
pub struct SessionRunner<S: FrameScheduler> {
    controller: SessionController,
    scheduler: S,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    render: bool,
}

impl<S: FrameScheduler> SessionRunner<S> {
    pub fn new(mut controller: SessionController, scheduler: S) -> Self {
        let events = controller.subscribe();
        Self {
            controller,
            scheduler,
            events,
            render: true,
        }
    }

    /// Disables terminal output.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.render = false;
        self
    }

    /// Runs until quit, end of commands or `shutdown` resolves.
    ///
    /// The session is saved before returning the controller.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<UserCommand>,
        shutdown: impl Future<Output = ()>,
    ) -> SessionController {
        tokio::pin!(shutdown);
        self.render_line();

        loop {
            let running = self.controller.is_running();

            tokio::select! {
                biased;

                () = &mut shutdown => {
                    debug!("Shutdown requested");
                    break;
                }
                command = commands.recv() => match command {
                    Some(UserCommand::Quit) | None => break,
                    Some(command) => self.handle_command(command),
                },
                () = self.scheduler.next_frame(), if running => {
                    self.controller.on_frame();
                }
            }

            self.flush_events();
        }

        self.controller.save_state();
        if self.render {
            Display::show_summary(
                self.controller.completed_work_sessions(),
                self.controller.total_focus_seconds(),
            );
        }
        self.controller
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    fn handle_command(&mut self, command: UserCommand) {
        debug!(?command, "user command");
        match command {
            UserCommand::Toggle => self.controller.toggle(),
            UserCommand::Reset => self.controller.reset(),
            UserCommand::Skip => self.controller.skip(),
            UserCommand::Quit => {}
        }
    }

    fn flush_events(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            changed = true;
            if self.render {
                Display::show_event(&event);
            }
        }
        if changed {
            self.render_line();
        }
    }

    fn render_line(&self) {
        if self.render {
            Display::show_timer_line(
                self.controller.mode(),
                self.controller.remaining_seconds(),
                self.controller.progress(),
                self.controller.is_running(),
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
