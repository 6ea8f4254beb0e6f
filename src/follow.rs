//! Decides whether the viewport tracks the player or stays where the user
//! dragged it.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

pub const DEFAULT_RECENTER_ZOOM: f32 = 18.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowState {
    #[default]
    FollowPlayer,
    FreeView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// The user dragged or pinched the map.
    UserGesture,
    /// The user pressed the "my location" control.
    RecenterRequested,
    LocationUpdate(Coordinate),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraCommand {
    Recenter { target: Coordinate, zoom: f32 },
}

#[derive(Debug, Clone)]
pub struct LocationFollow {
    state: FollowState,
    last_location: Option<Coordinate>,
    zoom: f32,
}

impl LocationFollow {
    pub fn new(zoom: f32) -> Self {
        Self {
            state: FollowState::FollowPlayer,
            last_location: None,
            zoom,
        }
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn last_location(&self) -> Option<Coordinate> {
        self.last_location
    }

    /// A new map view was attached; tracking starts over in follow mode.
    pub fn attach(&mut self) {
        self.state = FollowState::FollowPlayer;
    }

    pub fn handle(&mut self, event: CameraEvent) -> Option<CameraCommand> {
        match event {
            CameraEvent::UserGesture => {
                if self.state == FollowState::FollowPlayer {
                    self.state = FollowState::FreeView;
                }
                None
            }
            CameraEvent::RecenterRequested => {
                self.state = FollowState::FollowPlayer;
                self.recenter()
            }
            CameraEvent::LocationUpdate(location) => {
                self.last_location = Some(location);
                match self.state {
                    FollowState::FollowPlayer => self.recenter(),
                    FollowState::FreeView => None,
                }
            }
        }
    }

    fn recenter(&self) -> Option<CameraCommand> {
        self.last_location.map(|target| CameraCommand::Recenter {
            target,
            zoom: self.zoom,
        })
    }
}

impl Default for LocationFollow {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTER_ZOOM)
    }
}
