use crate::turtle::TurtleEvent;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Polylines folded from a turtle event stream.
///
/// This is the reference sink: renderers can consume [`TurtleEvent`]s
/// directly, or let a `LineDrawing` accumulate them and read the strokes back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineDrawing {
    polylines: Vec<Vec<Vec2>>,
}

impl LineDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: TurtleEvent) {
        match event {
            TurtleEvent::BeginPolyline(point) => self.polylines.push(vec![point]),
            TurtleEvent::AppendPoint(point) => match self.polylines.last_mut() {
                Some(line) => line.push(point),
                None => self.polylines.push(vec![point]),
            },
            // The restored point arrives as the following BeginPolyline.
            TurtleEvent::PushBranch | TurtleEvent::PopBranch => {}
        }
    }

    pub fn polylines(&self) -> &[Vec<Vec2>] {
        &self.polylines
    }

    pub fn into_polylines(self) -> Vec<Vec<Vec2>> {
        self.polylines
    }

    /// Total number of points across all polylines.
    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }

    /// Polylines with at least one segment.
    pub fn strokes(&self) -> impl Iterator<Item = &[Vec2]> {
        self.polylines
            .iter()
            .filter(|line| line.len() > 1)
            .map(Vec::as_slice)
    }

    /// Axis-aligned `(min, max)` corners, or `None` for an empty drawing.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.polylines.iter().flatten().copied();
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl Extend<TurtleEvent> for LineDrawing {
    fn extend<I: IntoIterator<Item = TurtleEvent>>(&mut self, iter: I) {
        for event in iter {
            self.apply(event);
        }
    }
}

impl FromIterator<TurtleEvent> for LineDrawing {
    fn from_iter<I: IntoIterator<Item = TurtleEvent>>(iter: I) -> Self {
        let mut drawing = Self::new();
        drawing.extend(iter);
        drawing
    }
}
