//! Interpreter that converts an L-System symbol string into polyline events.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with an
//! [`InterpreterConfig`], then call [`TurtleInterpreter::start`] with a
//! generation string and an [`ActionMapping`] to obtain a [`TurtleRun`].
//!
//! A run is a resumable state machine: the host drives it with
//! [`TurtleRun::step`] (a bounded number of symbols per call), or pulls events
//! one at a time through its [`Iterator`] impl. Runs are finite and cannot be
//! restarted; dropping one cancels it.

use crate::alphabet::ActionMapping;
use crate::drawing::LineDrawing;
use crate::turtle::{BranchStack, TurtleEvent, TurtleParams, TurtleState, apply_action};
use std::collections::VecDeque;
use std::sync::Arc;

/// Configuration for turtle interpretation.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Symbols processed per [`TurtleRun::next_step`] call.
    pub symbols_per_step: usize,
    /// Optional branch stack depth limit, baseline included. Unbounded when `None`.
    pub max_stack_depth: Option<usize>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            symbols_per_step: 100,
            max_stack_depth: None,
        }
    }
}

/// Creates [`TurtleRun`]s with shared settings.
#[derive(Clone, Debug, Default)]
pub struct TurtleInterpreter {
    config: InterpreterConfig,
}

impl TurtleInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Starts interpreting `symbols`.
    ///
    /// The turtle starts at `params.origin` facing up, and that state is the
    /// branch stack's baseline. No symbol is processed until the run is stepped.
    pub fn start(
        &self,
        symbols: impl Into<String>,
        mapping: Arc<ActionMapping>,
        params: TurtleParams,
    ) -> TurtleRun {
        let turtle = TurtleState::at(params.origin);
        TurtleRun {
            symbols: symbols.into(),
            cursor: 0,
            processed: 0,
            mapping,
            params,
            turtle,
            stack: BranchStack::new(turtle, self.config.max_stack_depth),
            pending: VecDeque::from([TurtleEvent::BeginPolyline(params.origin)]),
            scratch: Vec::new(),
            symbols_per_step: self.config.symbols_per_step.max(1),
        }
    }

    /// Runs `symbols` to completion and collects the polylines.
    pub fn interpret(
        &self,
        symbols: impl Into<String>,
        mapping: Arc<ActionMapping>,
        params: TurtleParams,
    ) -> LineDrawing {
        self.start(symbols, mapping, params).collect()
    }
}

/// Events produced by one [`TurtleRun::step`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutput {
    pub events: Vec<TurtleEvent>,
    /// `true` once every symbol has been processed and every event delivered.
    pub done: bool,
}

/// An in-flight interpretation of one symbol string.
#[derive(Clone, Debug)]
pub struct TurtleRun {
    symbols: String,
    /// Byte offset of the next symbol.
    cursor: usize,
    processed: usize,
    mapping: Arc<ActionMapping>,
    params: TurtleParams,
    turtle: TurtleState,
    stack: BranchStack,
    pending: VecDeque<TurtleEvent>,
    scratch: Vec<TurtleEvent>,
    symbols_per_step: usize,
}

impl TurtleRun {
    /// Processes up to `budget` symbols (at least one) and returns their events.
    pub fn step(&mut self, budget: usize) -> StepOutput {
        let mut events: Vec<TurtleEvent> = self.pending.drain(..).collect();
        for _ in 0..budget.max(1) {
            if !self.advance_symbol(&mut events) {
                break;
            }
        }
        log::trace!(
            "turtle step: {} of {} bytes consumed, {} events",
            self.cursor,
            self.symbols.len(),
            events.len()
        );
        StepOutput {
            events,
            done: self.is_done(),
        }
    }

    /// [`step`](Self::step) with the configured per-step symbol count.
    pub fn next_step(&mut self) -> StepOutput {
        self.step(self.symbols_per_step)
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.symbols.len() && self.pending.is_empty()
    }

    /// Symbols processed so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn turtle(&self) -> TurtleState {
        self.turtle
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Applies the actions of the next symbol. Returns `false` at end of input.
    fn advance_symbol(&mut self, events: &mut Vec<TurtleEvent>) -> bool {
        let Some(symbol) = self.symbols[self.cursor..].chars().next() else {
            return false;
        };
        self.cursor += symbol.len_utf8();
        self.processed += 1;

        for &action in self.mapping.actions(symbol) {
            self.turtle = apply_action(self.turtle, &mut self.stack, action, &self.params, events);
        }
        true
    }
}

impl Iterator for TurtleRun {
    type Item = TurtleEvent;

    fn next(&mut self) -> Option<TurtleEvent> {
        while self.pending.is_empty() {
            let mut events = std::mem::take(&mut self.scratch);
            let more = self.advance_symbol(&mut events);
            self.pending.extend(events.drain(..));
            self.scratch = events;
            if !more {
                break;
            }
        }
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Action;
    use glam::Vec2;

    fn unit_params() -> TurtleParams {
        TurtleParams {
            length: 1.0,
            angle: 0.0,
            origin: Vec2::ZERO,
        }
    }

    fn branch_mapping() -> Arc<ActionMapping> {
        Arc::new(
            [
                ('[', vec![Action::PushState]),
                (']', vec![Action::PopState]),
                ('0', vec![Action::DrawLine]),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn test_branch_event_order() {
        let run = TurtleInterpreter::default().start("[0]0", branch_mapping(), unit_params());
        let events: Vec<_> = run.collect();
        assert_eq!(
            events,
            vec![
                TurtleEvent::BeginPolyline(Vec2::ZERO),
                TurtleEvent::PushBranch,
                TurtleEvent::AppendPoint(Vec2::new(0.0, 1.0)),
                TurtleEvent::PopBranch,
                TurtleEvent::BeginPolyline(Vec2::ZERO),
                TurtleEvent::AppendPoint(Vec2::new(0.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_step_respects_budget() {
        let mapping: Arc<ActionMapping> =
            Arc::new([('F', vec![Action::DrawLine])].into_iter().collect());
        let mut run = TurtleInterpreter::default().start("F".repeat(250), mapping, unit_params());

        let first = run.step(100);
        assert_eq!(first.events.len(), 101); // begin + 100 points
        assert!(!first.done);
        assert_eq!(run.processed(), 100);

        let second = run.step(100);
        assert_eq!(second.events.len(), 100);
        assert!(!second.done);

        let last = run.step(100);
        assert_eq!(last.events.len(), 50);
        assert!(last.done);
        assert_eq!(run.turtle().position, Vec2::new(0.0, 250.0));
    }

    #[test]
    fn test_next_step_uses_configured_cadence() {
        let interpreter = TurtleInterpreter::new(InterpreterConfig {
            symbols_per_step: 3,
            ..Default::default()
        });
        let mut run = interpreter.start("abcdefg", Arc::new(ActionMapping::new()), unit_params());
        let mut steps = 0;
        while !run.next_step().done {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(run.processed(), 7);
    }

    #[test]
    fn test_stepping_and_iterating_agree() {
        let interpreter = TurtleInterpreter::default();
        let symbols = "0[0[0]0]0]]0";

        let iterated: Vec<_> = interpreter
            .start(symbols, branch_mapping(), unit_params())
            .collect();

        let mut run = interpreter.start(symbols, branch_mapping(), unit_params());
        let mut stepped = Vec::new();
        loop {
            let out = run.step(2);
            stepped.extend(out.events);
            if out.done {
                break;
            }
        }
        assert_eq!(iterated, stepped);
    }

    #[test]
    fn test_deep_nesting_restores_every_branch() {
        let mapping: Arc<ActionMapping> = Arc::new(
            [
                ('F', vec![Action::DrawLine]),
                ('[', vec![Action::PushState]),
                (']', vec![Action::PopState]),
            ]
            .into_iter()
            .collect(),
        );
        let symbols = format!("{}{}F", "F[".repeat(1100), "]".repeat(1100));
        let drawing = TurtleInterpreter::default().interpret(symbols, mapping, unit_params());

        // The outermost pop returns to the tip of the first step.
        assert_eq!(
            drawing.polylines().last().unwrap(),
            &vec![Vec2::new(0.0, 1.0), Vec2::new(0.0, 2.0)]
        );
    }

    #[test]
    fn test_empty_input_yields_origin_only() {
        let mut run = TurtleInterpreter::default().start("", branch_mapping(), unit_params());
        let out = run.step(10);
        assert_eq!(out.events, vec![TurtleEvent::BeginPolyline(Vec2::ZERO)]);
        assert!(out.done);
        assert_eq!(run.next(), None);
    }

    #[test]
    fn test_multibyte_symbols() {
        let mapping: Arc<ActionMapping> =
            Arc::new([('é', vec![Action::DrawLine])].into_iter().collect());
        let drawing = TurtleInterpreter::default().interpret("éé", mapping, unit_params());
        assert_eq!(drawing.polylines().len(), 1);
        assert_eq!(drawing.polylines()[0].len(), 3);
    }
}
