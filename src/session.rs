//! Single-task event loop hosting the engine.
//!
//! All simulation state lives inside one tokio task. Hosts talk to it through
//! a [`SessionHandle`]: commands go in over an unbounded channel, frames come
//! out through a `watch` channel and camera commands through a `broadcast`
//! channel. Nothing here is shared behind a lock.

use std::{ops::ControlFlow, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};

use crate::{
    engine::Engine,
    follow::{CameraCommand, CameraEvent, FollowState, LocationFollow},
    geo::Coordinate,
    world::WorldSnapshot,
};

/// Supplies the player position at the start of each tick.
pub trait PositionSource: Send {
    fn current(&mut self) -> Option<Coordinate>;
}

impl<F> PositionSource for F
where
    F: FnMut() -> Option<Coordinate> + Send,
{
    fn current(&mut self) -> Option<Coordinate> {
        self()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub snapshot: WorldSnapshot,
    pub follow: FollowState,
    pub emitted_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("game session has stopped")]
    Closed,
}

enum SessionCommand {
    SetPositionSource(Box<dyn PositionSource>),
    Start,
    Pause,
    Reset,
    AttachView,
    Camera(CameraEvent),
    Shutdown,
}

#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    frames: watch::Receiver<Frame>,
    camera: broadcast::Sender<CameraCommand>,
}

impl SessionHandle {
    /// Replaces the default source, which reads the latest location passed
    /// to [`SessionHandle::on_location_update`].
    pub fn set_player_position_source(
        &self,
        source: impl PositionSource + 'static,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::SetPositionSource(Box::new(source)))
    }

    pub fn start_game(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Start)
    }

    pub fn pause_game(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Pause)
    }

    pub fn reset_game(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Reset)
    }

    /// A new map view was attached.
    pub fn attach_view(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::AttachView)
    }

    pub fn on_user_camera_gesture(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Camera(CameraEvent::UserGesture))
    }

    pub fn on_recenter_requested(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Camera(CameraEvent::RecenterRequested))
    }

    pub fn on_location_update(&self, location: Coordinate) -> Result<(), SessionError> {
        self.send(SessionCommand::Camera(CameraEvent::LocationUpdate(location)))
    }

    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown)
    }

    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub fn latest_frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    pub fn camera_commands(&self) -> broadcast::Receiver<CameraCommand> {
        self.camera.subscribe()
    }

    fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }
}

/// Spawns the session task. The timer is not armed until `start_game`.
pub fn spawn(
    engine: Engine,
    follow: LocationFollow,
    tick_period: Duration,
) -> (SessionHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let initial = Frame {
        snapshot: engine.snapshot(),
        follow: follow.state(),
        emitted_at: Utc::now(),
    };
    let (frame_tx, frame_rx) = watch::channel(initial);
    let (camera_tx, _) = broadcast::channel(64);

    let session = Session {
        engine,
        follow,
        tick_period,
        timer: None,
        source: None,
        latest: None,
        commands: command_rx,
        frames: frame_tx,
        camera: camera_tx.clone(),
    };
    let task = tokio::spawn(session.run());

    let handle = SessionHandle {
        commands: command_tx,
        frames: frame_rx,
        camera: camera_tx,
    };
    (handle, task)
}

struct Session {
    engine: Engine,
    follow: LocationFollow,
    tick_period: Duration,
    timer: Option<Interval>,
    source: Option<Box<dyn PositionSource>>,
    /// Last-value-wins cell fed by location updates.
    latest: Option<Coordinate>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    frames: watch::Sender<Frame>,
    camera: broadcast::Sender<CameraCommand>,
}

impl Session {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if self.apply(command).is_break() {
                        break;
                    }
                }
                _ = next_tick(&mut self.timer) => self.on_tick(),
            }
        }
        tracing::debug!("game session stopped");
    }

    fn apply(&mut self, command: SessionCommand) -> ControlFlow<()> {
        match command {
            SessionCommand::SetPositionSource(source) => self.source = Some(source),
            SessionCommand::Start => self.arm(),
            SessionCommand::Pause => {
                self.timer = None;
                tracing::debug!("ticking paused");
            }
            SessionCommand::Reset => {
                self.timer = None;
                self.engine.reset();
                self.publish();
                self.arm();
            }
            SessionCommand::AttachView => {
                self.follow.attach();
                self.publish();
            }
            SessionCommand::Camera(event) => {
                if let CameraEvent::LocationUpdate(location) = event {
                    self.latest = Some(location);
                }
                let before = self.follow.state();
                if let Some(command) = self.follow.handle(event) {
                    // No subscribers is fine.
                    let _ = self.camera.send(command);
                }
                if self.follow.state() != before {
                    tracing::debug!(follow = ?self.follow.state(), "follow state changed");
                    self.publish();
                }
            }
            SessionCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Drops any armed timer before arming a new one, so at most one tick
    /// chain exists. The first tick fires immediately.
    fn arm(&mut self) {
        self.timer = None;
        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(interval);
    }

    /// A failed tick pauses the timer but keeps the session alive; the next
    /// `start_game` retries.
    fn on_tick(&mut self) {
        let player = match self.source.as_mut() {
            Some(source) => source.current(),
            None => self.latest,
        };
        match self.engine.tick(player) {
            Ok(Some(summary)) => {
                self.publish();
                if summary.game_over {
                    self.timer = None;
                }
            }
            Ok(None) => self.timer = None,
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "tick failed, ticking paused");
                self.timer = None;
                self.publish();
            }
        }
    }

    fn publish(&self) {
        self.frames.send_replace(Frame {
            snapshot: self.engine.snapshot(),
            follow: self.follow.state(),
            emitted_at: Utc::now(),
        });
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
