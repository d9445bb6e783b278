//! One in-progress manipulation of an event rectangle.
//!
//! `Idle -> Dragging -> Committed | Cancelled`. Each drag step feeds the
//! previous rectangle and a delta into [`EventPlacement`]; committing calls
//! [`EventPlacement::commit_rect`] exactly once, cancelling never does.

use crate::error::{BlockTimeError, BlockTimeResult};
use crate::placement::{EventPlacement, Rect};
use crate::time_of_day::TimeSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    ResizeTop,
    ResizeBottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging {
        kind: GestureKind,
        origin: Rect,
        current: Rect,
    },
    Committed(TimeSpan),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Gesture<'a> {
    placement: &'a EventPlacement,
    state: GestureState,
}

impl<'a> Gesture<'a> {
    pub fn new(placement: &'a EventPlacement) -> Self {
        Gesture {
            placement,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn begin(&mut self, kind: GestureKind, rect: Rect) -> BlockTimeResult<()> {
        match self.state {
            GestureState::Idle => {
                self.state = GestureState::Dragging {
                    kind,
                    origin: rect,
                    current: rect,
                };
                Ok(())
            }
            other => Err(invalid("begin", &other)),
        }
    }

    /// Apply one incremental delta and return the rectangle to draw.
    pub fn drag(&mut self, delta_y: f64) -> BlockTimeResult<Rect> {
        let GestureState::Dragging {
            kind,
            origin,
            current,
        } = self.state
        else {
            return Err(invalid("drag", &self.state));
        };

        let next = match kind {
            GestureKind::Move => self.placement.apply_move(current, delta_y),
            GestureKind::ResizeTop => self.placement.apply_top_resize(current, delta_y),
            GestureKind::ResizeBottom => self.placement.apply_bottom_resize(current, delta_y),
        };

        self.state = GestureState::Dragging {
            kind,
            origin,
            current: next,
        };
        Ok(next)
    }

    /// Finish the gesture, producing the snapped times to persist.
    pub fn end(&mut self) -> BlockTimeResult<TimeSpan> {
        let GestureState::Dragging { current, .. } = self.state else {
            return Err(invalid("end", &self.state));
        };

        let span = self.placement.commit_rect(current);
        self.state = GestureState::Committed(span);
        Ok(span)
    }

    /// Abandon the gesture. Returns the rectangle the event started from so
    /// the caller can restore it.
    pub fn cancel(&mut self) -> BlockTimeResult<Rect> {
        let GestureState::Dragging { origin, .. } = self.state else {
            return Err(invalid("cancel", &self.state));
        };

        self.state = GestureState::Cancelled;
        Ok(origin)
    }
}

fn invalid(action: &str, state: &GestureState) -> BlockTimeError {
    let name = match state {
        GestureState::Idle => "idle",
        GestureState::Dragging { .. } => "dragging",
        GestureState::Committed(_) => "committed",
        GestureState::Cancelled => "cancelled",
    };
    BlockTimeError::Gesture(format!("cannot {action} while {name}"))
}
