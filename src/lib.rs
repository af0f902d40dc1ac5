//! lpform – compiles algebraic optimization problems into solver requests and
//! decodes the solver's iteration trace.
//!
//! A problem is written the way one would on paper:
//! * an objective such as `3x1 + 2x2` (standard mode only),
//! * constraints such as `2x1 + 3x2 <= 10`,
//! * prioritized goals such as `200x1 >= 1000` (goal mode only).
//!
//! The crate turns that text into one of two numeric request bodies, hands it to an
//! external solving service, and turns the tableaux the service sends back into
//! header/row grids. Nothing is solved locally.
//!
//! ## Modules
//! * [`lexer`] – Hand-written scanner for `sign? coefficient? variable` terms.
//! * [`registry`] – [`registry::VariableRegistry`], the ordered set of variables one
//!   compilation pass works against.
//! * [`expression`] – Coefficient vectors for a single expression.
//! * [`relation`] – Operator and right-hand side of a constraint or goal line.
//! * [`model`] – Problem inputs, compiled models and the wire request shapes.
//! * [`assembler`] – All-or-nothing compilation of a whole problem.
//! * [`trace`] – Solver response checks and tableau decoding.
//! * [`client`] – The HTTP solver collaborator behind the [`client::Solver`] trait.
//! * [`session`] – One-at-a-time submission and the last displayed result.
//! * [`server`] – An axum front end over a session.
//! * [`config`] – File and environment settings.
//!
//! ## Variables
//! Standard problems name variables with a letter and optional digits (`x`, `y2`)
//! and take them from the objective alone. Goal programs name them `x1, x2, ...` and
//! take them from every constraint and goal. In both modes positions follow the order
//! in which names were first seen.
//!
//! ## Quick Start
//! ```
//! use lpform::assembler::compile_standard;
//! use lpform::model::StandardProblem;
//! let problem = StandardProblem {
//!     objective: "3x1 + 2x2".into(),
//!     constraints: vec!["2x1 + 3x2 <= 10".into()],
//!     ..StandardProblem::default()
//! };
//! let model = compile_standard(&problem).unwrap();
//! assert_eq!(model.objective, vec![3.0, 2.0]);
//! assert_eq!(model.constraints[0].rhs, 10.0);
//! ```
//!
//! ## Traces
//! ```
//! use lpform::trace::{decode_trace, FieldSeparator};
//! let steps = decode_trace(&["A\tB\nZ\t1\t2"], FieldSeparator::Tab);
//! assert_eq!(steps[0].header, vec!["A", "B"]);
//! assert_eq!(steps[0].rows[0], vec!["Z", "1", "2"]);
//! ```

pub mod assembler;
pub mod client;
pub mod config;
pub mod error;
pub mod expression;
pub mod lexer;
pub mod model;
pub mod registry;
pub mod relation;
pub mod server;
pub mod session;
pub mod trace;

pub use error::{LpformError, Result};
