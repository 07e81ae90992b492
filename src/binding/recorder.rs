//! Host implementations that record every callback.
//!
//! [`RecordingHost`] and [`RecordingOverlay`] append a [`HostCallback`] to a
//! shared [`CallbackLog`] for every call the engine makes. The scenario runner
//! prints the log as JSON lines; tests assert on it directly.

use crate::domain::Position;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use super::{Host, OverlayHandle, OverlayHost};

/// One call made by the engine into a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum HostCallback {
    PositionChanged {
        position: Position,
    },
    EnterOverlay {
        /// `None` when the overlay host declined.
        handle: Option<OverlayHandle>,
    },
    ActivationDelta {
        handle: OverlayHandle,
        position: Position,
        activated: bool,
    },
    ExitOverlay {
        handle: OverlayHandle,
    },
}

/// Shared, single-threaded callback log.
#[derive(Debug, Clone, Default)]
pub struct CallbackLog(Rc<RefCell<Vec<HostCallback>>>);

impl CallbackLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, callback: HostCallback) {
        self.0.borrow_mut().push(callback);
    }

    /// Removes and returns everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<HostCallback> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<HostCallback> {
        self.0.borrow().clone()
    }

    /// Positions reported through `on_position_changed`, in call order.
    #[must_use]
    pub fn changed_positions(&self) -> Vec<Position> {
        self.0
            .borrow()
            .iter()
            .filter_map(|cb| match cb {
                HostCallback::PositionChanged { position } => Some(*position),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// [`Host`] that records redraw hints.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    log: CallbackLog,
}

impl RecordingHost {
    #[must_use]
    pub const fn new(log: CallbackLog) -> Self {
        Self { log }
    }

    #[must_use]
    pub const fn log(&self) -> &CallbackLog {
        &self.log
    }
}

impl Host for RecordingHost {
    fn on_position_changed(&mut self, position: Position) {
        self.log.push(HostCallback::PositionChanged { position });
    }
}

/// [`OverlayHost`] that records overlay traffic and hands out sequential handles.
#[derive(Debug, Clone)]
pub struct RecordingOverlay {
    log: CallbackLog,
    next_handle: u64,
    accept: bool,
    open: Option<OverlayHandle>,
}

impl RecordingOverlay {
    /// Creates an overlay host that accepts every enter request.
    #[must_use]
    pub const fn new(log: CallbackLog) -> Self {
        Self {
            log,
            next_handle: 1,
            accept: true,
            open: None,
        }
    }

    /// Creates an overlay host that declines every enter request.
    #[must_use]
    pub const fn declining(log: CallbackLog) -> Self {
        Self {
            log,
            next_handle: 1,
            accept: false,
            open: None,
        }
    }

    /// Handle of the overlay currently shown, if any.
    #[must_use]
    pub const fn open_handle(&self) -> Option<OverlayHandle> {
        self.open
    }
}

impl OverlayHost for RecordingOverlay {
    fn request_enter_overlay(&mut self) -> Option<OverlayHandle> {
        let handle = self.accept.then(|| {
            let handle = OverlayHandle::new(self.next_handle);
            self.next_handle += 1;
            handle
        });
        self.open = handle;
        self.log.push(HostCallback::EnterOverlay { handle });
        handle
    }

    fn on_activation_delta(&mut self, handle: OverlayHandle, position: Position, activated: bool) {
        self.log.push(HostCallback::ActivationDelta {
            handle,
            position,
            activated,
        });
    }

    fn request_exit_overlay(&mut self, handle: OverlayHandle) {
        if self.open == Some(handle) {
            self.open = None;
        }
        self.log.push(HostCallback::ExitOverlay { handle });
    }
}
