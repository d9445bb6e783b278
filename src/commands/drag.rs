use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::gesture::{Gesture, GestureKind};
use blocktime_core::placement::{EventPlacement, Rect};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::{render_event, render_rect};

pub fn run(
    config: &BlockTimeConfig,
    day: NaiveDate,
    id: &str,
    kind: GestureKind,
    deltas: &[f64],
    cancel: bool,
) -> Result<()> {
    let mut session = super::open_session(config, day)?;
    let id = super::resolve_event_id(&session, id)?;
    let origin = session.rect_of(&id)?;

    let placement = *session.placement();
    let (released, committed) = replay(&placement, kind, origin, deltas, cancel)?;

    let Some(rect) = committed else {
        println!("{} {}", "Cancelled, back at".dimmed(), render_rect(&released));
        return Ok(());
    };

    session.commit_gesture(&id, rect)?;
    if let Some(event) = session.event(&id) {
        println!("{}", "Updated:".yellow());
        println!("{}", render_event(event, day));
    }
    Ok(())
}

/// Run a gesture over `deltas`. Returns the rectangle at release and, when
/// the gesture ended rather than being cancelled, the rectangle to commit.
fn replay(
    placement: &EventPlacement,
    kind: GestureKind,
    origin: Rect,
    deltas: &[f64],
    cancel: bool,
) -> Result<(Rect, Option<Rect>)> {
    let mut gesture = Gesture::new(placement);
    gesture.begin(kind, origin)?;

    let mut current = origin;
    for delta in deltas {
        current = gesture.drag(*delta)?;
        tracing::debug!(delta, y = current.y, height = current.height, "drag step");
    }

    if cancel {
        let restored = gesture.cancel()?;
        return Ok((restored, None));
    }

    gesture.end()?;
    Ok((current, Some(current)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(y: f64, height: f64) -> Rect {
        Rect {
            x: 8.0,
            y,
            width: 324.0,
            height,
        }
    }

    #[test]
    fn steps_accumulate() {
        let placement = EventPlacement::default();
        let (released, committed) =
            replay(&placement, GestureKind::Move, rect(900.0, 90.0), &[10.0, 20.0, -5.0], false).unwrap();

        assert_eq!(released.y, 925.0);
        assert_eq!(committed, Some(released));
    }

    #[test]
    fn cancel_returns_origin() {
        let placement = EventPlacement::default();
        let origin = rect(900.0, 90.0);
        let (released, committed) =
            replay(&placement, GestureKind::ResizeBottom, origin, &[45.0], true).unwrap();

        assert_eq!(released, origin);
        assert!(committed.is_none());
    }
}
