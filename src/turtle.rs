//! Turtle state and the per-action state transition.

use crate::alphabet::Action;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Geometric parameters shared by every action in a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleParams {
    /// Forward step for draw actions.
    pub length: f32,
    /// Turn angle in degrees.
    pub angle: f32,
    /// Start position of the turtle.
    pub origin: Vec2,
}

impl Default for TurtleParams {
    fn default() -> Self {
        Self {
            length: 1.0,
            angle: 25.0,
            origin: Vec2::ZERO,
        }
    }
}

/// Position and heading of the turtle.
///
/// Heading is in degrees, clockwise from +Y, kept in `[0, 360)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub position: Vec2,
    pub heading: f32,
}

impl TurtleState {
    /// A turtle at `position` facing up.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            heading: 0.0,
        }
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> Vec2 {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        Vec2::new(sin, cos)
    }

    /// Turns clockwise by `degrees` (negative turns anticlockwise).
    pub fn rotate(&mut self, degrees: f32) {
        let heading = (self.heading + degrees).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    /// Moves `distance` along the heading and returns the new position.
    pub fn advance(&mut self, distance: f32) -> Vec2 {
        self.position += self.direction() * distance;
        self.position
    }
}

/// Saved turtle states for `[`/`]` branching.
///
/// The baseline (the start state) is pushed first. Popping past it yields the
/// baseline again instead of underflowing, so a stray `]` returns to the origin.
///
/// An optional depth limit drops pushes beyond it. Each dropped push also
/// cancels its matching pop, so the surrounding branches stay balanced.
#[derive(Clone, Debug)]
pub struct BranchStack {
    baseline: TurtleState,
    saved: Vec<TurtleState>,
    max_depth: Option<usize>,
    dropped: usize,
}

impl BranchStack {
    pub fn new(baseline: TurtleState, max_depth: Option<usize>) -> Self {
        Self {
            baseline,
            saved: vec![baseline],
            max_depth,
            dropped: 0,
        }
    }

    /// Saves `state`. Returns `false` if the depth limit dropped it.
    pub fn push(&mut self, state: TurtleState) -> bool {
        if self.dropped > 0 || self.max_depth.is_some_and(|max| self.saved.len() >= max) {
            self.dropped += 1;
            return false;
        }
        self.saved.push(state);
        true
    }

    /// Restores the latest saved state, or `None` when the pop matches a
    /// dropped push and must leave the turtle where it is.
    pub fn pop(&mut self) -> Option<TurtleState> {
        if self.dropped > 0 {
            self.dropped -= 1;
            return None;
        }
        Some(self.saved.pop().unwrap_or(self.baseline))
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn baseline(&self) -> TurtleState {
        self.baseline
    }
}

/// Geometry produced by a single action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleEvent {
    /// Starts a new polyline at the given point.
    BeginPolyline(Vec2),
    /// Extends the current polyline.
    AppendPoint(Vec2),
    PushBranch,
    /// Always followed by a [`TurtleEvent::BeginPolyline`] at the restored point.
    PopBranch,
}

/// Applies `action` to `state`, writing any geometry to `events`.
///
/// # Leaves
///
/// [`Action::DrawLeaf`] draws two half-length tips at `+angle` and `-angle`
/// from the pre-step position, restoring the turtle after each, then takes the
/// trunk step exactly like [`Action::DrawLine`]. All three points extend the
/// current polyline and the branch stack is left alone.
pub fn apply_action(
    state: TurtleState,
    stack: &mut BranchStack,
    action: Action,
    params: &TurtleParams,
    events: &mut Vec<TurtleEvent>,
) -> TurtleState {
    let mut turtle = state;
    match action {
        Action::DrawLine => {
            events.push(TurtleEvent::AppendPoint(turtle.advance(params.length)));
        }
        Action::DrawLeaf => {
            for side in [1.0, -1.0] {
                let mut tip = state;
                tip.rotate(params.angle * side);
                events.push(TurtleEvent::AppendPoint(tip.advance(params.length / 2.0)));
            }
            events.push(TurtleEvent::AppendPoint(turtle.advance(params.length)));
        }
        Action::RotateClockwise => turtle.rotate(params.angle),
        Action::RotateAnticlockwise => turtle.rotate(-params.angle),
        Action::PushState => {
            if stack.push(turtle) {
                events.push(TurtleEvent::PushBranch);
            } else {
                log::warn!("branch stack full, push dropped");
            }
        }
        Action::PopState => {
            if let Some(restored) = stack.pop() {
                turtle = restored;
                events.push(TurtleEvent::PopBranch);
                events.push(TurtleEvent::BeginPolyline(turtle.position));
            }
        }
        Action::NoOp => {}
    }
    turtle
}
