//! # lindenmayer-turtle
//!
//! Generates and draws Lindenmayer-System fractals in two dimensions.
//!
//! A [`Configuration`] describes the grammar (axiom, variables, rules) and how
//! each symbol drives the turtle. The [`RewritingEngine`] expands the axiom
//! generation by generation, caching every string it produces, and the
//! [`TurtleInterpreter`] walks a generation string into a resumable stream of
//! [`TurtleEvent`]s that a renderer (or a [`LineDrawing`]) turns into polylines.
//!
//! [`LSystemSession`] wires both together for interactive hosts.

pub mod alphabet;
pub mod drawing;
pub mod error;
pub mod interpreter;
pub mod preset;
pub mod rewrite;
pub mod session;
pub mod turtle;

pub use alphabet::*;
pub use drawing::*;
pub use error::*;
pub use interpreter::*;
pub use rewrite::*;
pub use session::*;
pub use turtle::*;
