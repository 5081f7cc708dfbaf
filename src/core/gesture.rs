use crate::config::GestureSettings;
use crate::models::{Decision, Direction};

/// Drag state of the card on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging { delta_x: f64 },
    Resolved(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    DragStart,
    DragMove(f64),
    DragEnd(f64),
}

/// What a transition asks of the rest of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutput {
    Decision(Decision),
    SpringBack,
}

/// Continuous overlay signal while dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    /// `min(|dx| / feedback_span, cap)`
    pub ratio: f64,
    /// Which overlay (like/nope) should be visible, if any
    pub hint: Option<Direction>,
}

impl Feedback {
    pub const NONE: Feedback = Feedback { ratio: 0.0, hint: None };
}

/// Pure transition function of the gesture machine
///
/// `Idle -> Dragging -> {Idle, Resolved}`. Moves while not dragging and
/// ends after resolution are ignored.
pub fn transition(
    state: GestureState,
    event: GestureEvent,
    settings: &GestureSettings,
) -> (GestureState, Option<GestureOutput>) {
    match (state, event) {
        (_, GestureEvent::DragStart) => (GestureState::Dragging { delta_x: 0.0 }, None),
        (GestureState::Dragging { .. }, GestureEvent::DragMove(delta_x)) => {
            (GestureState::Dragging { delta_x }, None)
        }
        (GestureState::Dragging { .. }, GestureEvent::DragEnd(final_delta)) => {
            if final_delta.abs() > settings.threshold {
                let direction = Direction::from_delta(final_delta);
                (
                    GestureState::Resolved(direction),
                    Some(GestureOutput::Decision(Decision::swipe(direction))),
                )
            } else {
                (GestureState::Idle, Some(GestureOutput::SpringBack))
            }
        }
        (state, _) => (state, None),
    }
}

/// Overlay feedback for a drag offset
#[inline]
pub fn feedback(delta_x: f64, settings: &GestureSettings) -> Feedback {
    let ratio = (delta_x.abs() / settings.feedback_span).min(settings.feedback_cap);
    let hint = if delta_x > settings.hint_threshold {
        Some(Direction::Accept)
    } else if delta_x < -settings.hint_threshold {
        Some(Direction::Reject)
    } else {
        None
    };
    Feedback { ratio, hint }
}

/// Stateful wrapper around [`transition`] owned by the session
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    state: GestureState,
    settings: GestureSettings,
}

impl GestureInterpreter {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            state: GestureState::Idle,
            settings,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn on_drag_start(&mut self) {
        self.apply(GestureEvent::DragStart);
    }

    /// Hot path: O(1), no allocation
    pub fn on_drag_move(&mut self, delta_x: f64) -> Feedback {
        self.apply(GestureEvent::DragMove(delta_x));
        match self.state {
            GestureState::Dragging { delta_x } => feedback(delta_x, &self.settings),
            _ => Feedback::NONE,
        }
    }

    pub fn on_drag_end(&mut self, final_delta_x: f64) -> Option<GestureOutput> {
        self.apply(GestureEvent::DragEnd(final_delta_x))
    }

    /// Explicit accept/reject control, bypassing the drag
    pub fn trigger(&mut self, direction: Direction) -> Decision {
        self.state = GestureState::Resolved(direction);
        Decision::control(direction)
    }

    /// Last stored drag offset, zero when not dragging
    pub fn delta_x(&self) -> f64 {
        match self.state {
            GestureState::Dragging { delta_x } => delta_x,
            _ => 0.0,
        }
    }

    fn apply(&mut self, event: GestureEvent) -> Option<GestureOutput> {
        let (next, output) = transition(self.state, event, &self.settings);
        self.state = next;
        output
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureSettings::default())
    }
}
