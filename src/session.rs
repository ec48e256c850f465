//! Host-facing controller tying the rewriting engine to an in-flight turtle run.

use crate::alphabet::{ActionMapping, Configuration};
use crate::drawing::LineDrawing;
use crate::error::LSystemError;
use crate::interpreter::{InterpreterConfig, StepOutput, TurtleInterpreter, TurtleRun};
use crate::rewrite::RewritingEngine;
use crate::turtle::TurtleParams;
use std::sync::Arc;

struct Active {
    engine: RewritingEngine,
    mapping: Arc<ActionMapping>,
    params: TurtleParams,
}

/// Active configuration, its generation cache and the current turtle run.
///
/// Every generation change starts a fresh run and drops the previous one,
/// including on a cache hit. Reconfiguring discards the cache as well.
#[derive(Default)]
pub struct LSystemSession {
    interpreter: TurtleInterpreter,
    active: Option<Active>,
    run: Option<TurtleRun>,
}

impl LSystemSession {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            interpreter: TurtleInterpreter::new(config),
            active: None,
            run: None,
        }
    }

    /// Applies `config`, expands it to its target generation and starts a run.
    ///
    /// Configuration issues are logged, never rejected.
    pub fn configure(&mut self, config: impl Into<Arc<Configuration>>) -> Result<(), LSystemError> {
        let config = config.into();
        for issue in config.diagnostics() {
            log::warn!("configuration: {issue}");
        }

        let target = i64::try_from(config.generation)
            .map_err(|_| LSystemError::InvalidGenerationTarget(i64::MAX))?;
        let params = TurtleParams {
            length: config.length,
            angle: config.angle,
            origin: config.offset,
        };
        let mapping = Arc::new(config.actions.clone());

        self.run = None;
        self.active = Some(Active {
            engine: RewritingEngine::new(config),
            mapping,
            params,
        });
        self.set_generation(target).map(|_| ())
    }

    /// Moves to generation `target` and restarts interpretation.
    ///
    /// Returns whether the string had to be expanded. On error nothing changes
    /// and the in-flight run is kept.
    pub fn set_generation(&mut self, target: i64) -> Result<bool, LSystemError> {
        let active = self.active.as_mut().ok_or(LSystemError::NotConfigured)?;
        let generation = active.engine.set_generation(target)?;
        let recomputed = generation.recomputed;
        log::debug!(
            "starting turtle run for generation {} ({} symbols)",
            generation.index,
            generation.text.len()
        );
        self.run = Some(self.interpreter.start(
            generation.text,
            Arc::clone(&active.mapping),
            active.params,
        ));
        Ok(recomputed)
    }

    pub fn increase_generation(&mut self) -> Result<bool, LSystemError> {
        let next = self.generation()? + 1;
        self.set_generation(next as i64)
    }

    /// Steps back one generation, stopping at 0.
    pub fn decrease_generation(&mut self) -> Result<bool, LSystemError> {
        let previous = self.generation()?.saturating_sub(1);
        self.set_generation(previous as i64)
    }

    pub fn generation(&self) -> Result<usize, LSystemError> {
        self.engine().map(RewritingEngine::current_generation)
    }

    /// Symbol string of the current generation.
    pub fn text(&self) -> Result<&str, LSystemError> {
        self.engine().map(RewritingEngine::current_text)
    }

    pub fn config(&self) -> Option<&Arc<Configuration>> {
        self.active.as_ref().map(|active| active.engine.config())
    }

    pub fn engine(&self) -> Result<&RewritingEngine, LSystemError> {
        self.active
            .as_ref()
            .map(|active| &active.engine)
            .ok_or(LSystemError::NotConfigured)
    }

    /// The in-flight run, if any.
    pub fn run_mut(&mut self) -> Option<&mut TurtleRun> {
        self.run.as_mut()
    }

    /// Advances the current run by its configured cadence.
    pub fn step(&mut self) -> Option<StepOutput> {
        self.run.as_mut().map(TurtleRun::next_step)
    }

    /// Runs the remaining interpretation to completion and returns its polylines.
    ///
    /// Only the events not yet delivered by [`step`](Self::step) are included.
    pub fn finish(&mut self) -> Option<LineDrawing> {
        self.run.take().map(Iterator::collect)
    }
}
