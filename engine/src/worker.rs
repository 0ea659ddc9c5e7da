//! Background thread that owns the simulation and steps it periodically.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{EngineError, SinkError};
use crate::session::{Command, Session};
use crate::snapshot::Snapshot;
use crate::ticker::Ticker;

/// Receives a snapshot after every step, randomize or edit.
pub trait SnapshotSink: Send + 'static {
    fn deliver(&mut self, snapshot: Snapshot) -> Result<(), SinkError>;
}

impl SnapshotSink for Sender<Snapshot> {
    fn deliver(&mut self, snapshot: Snapshot) -> Result<(), SinkError> {
        self.send(snapshot).map_err(|_| SinkError::SurfaceUnavailable)
    }
}

/// Handle to the simulation thread. All grid mutation happens on that one
/// thread, in the order commands are sent.
pub struct Worker {
    commands: Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Starts the thread. An invalid `config` is rejected before spawning.
    pub fn spawn<S: SnapshotSink>(config: Config, sink: S) -> Result<Self, EngineError> {
        let session = Session::new(config)?;
        let (commands, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("life-worker".into())
            .spawn(move || run(session, Ticker::new(config.step_interval), receiver, sink))?;
        Ok(Worker {
            commands,
            handle: Some(handle),
        })
    }

    pub fn send(&self, command: Command) -> Result<(), EngineError> {
        self.commands.send(command).map_err(|_| EngineError::WorkerStopped)
    }

    /// Releases the grid and waits for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.commands.send(Command::Destroyed);
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("simulation worker panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S: SnapshotSink>(mut session: Session, mut ticker: Ticker, commands: Receiver<Command>, mut sink: S) {
    info!("simulation worker started");
    loop {
        let next = match ticker.remaining() {
            Some(wait) => match commands.recv_timeout(wait) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        let changed = match next {
            Some(Command::Shutdown) => break,
            Some(command) => session.apply(command),
            None => {
                ticker.disarm();
                session.tick()
            }
        };

        if changed {
            emit(&session, &mut sink);
        }

        // Re-arm only after the previous step has fully completed; a pause
        // drops whatever was pending.
        if !session.is_running() {
            ticker.disarm();
        } else if !ticker.is_armed() {
            ticker.arm();
        }
    }
    debug!("simulation worker stopped");
}

fn emit<S: SnapshotSink>(session: &Session, sink: &mut S) {
    let Some(snapshot) = session.snapshot() else {
        return;
    };
    let generation = snapshot.generation;
    if let Err(err) = sink.deliver(snapshot) {
        warn!("skipped frame for generation {generation}: {err}");
    }
}
