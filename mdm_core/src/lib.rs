//! # mdm_core - Moment Distribution Method Solver
//!
//! `mdm_core` computes internal bending moments in rigid-jointed frames and
//! continuous beams with the moment distribution method (Hardy Cross): an
//! iterative relaxation that balances the unbalanced moment at every joint,
//! carries a share of each balance to the far member end, and repeats until
//! the worst member-end error drops inside tolerance or the pass limit
//! is reached.
//!
//! The crate is the computational half of a tool whose other half (input
//! sheets, result tables) lives with the caller. The boundary is an
//! in-process call: structured payload in, structured iteration history
//! out, everything JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: one solve is a pure function of a validated model
//! - **JSON-First**: every boundary type implements Serialize/Deserialize
//! - **Rich Errors**: validation failures name the exact table and cell
//! - **Auditable**: every relaxation pass is recorded, not just the result
//!
//! ## Quick Start
//!
//! ```rust
//! use mdm_core::engine::analyze;
//! use mdm_core::presets;
//!
//! let preset = presets::by_name("portal-frame").unwrap();
//! let history = analyze(&preset.input).unwrap();
//!
//! assert!(history.converged(preset.input.min_error_percent));
//! println!("converged in {} passes", history.iteration_count);
//! ```
//!
//! ## Modules
//!
//! - [`input`] - Raw payload types as a front end assembles them
//! - [`validate`] - Payload checking and model construction
//! - [`model`] - The validated, immutable structure description
//! - [`engine`] - The relaxation loop
//! - [`convergence`] - The per-pass error metric and stop rule
//! - [`history`] - Per-pass records and the final result
//! - [`table`] - The square per-member-end value grid
//! - [`presets`] - Built-in example structures
//! - [`project`] - Caller-owned document container
//! - [`errors`] - Structured validation errors

pub mod convergence;
pub mod engine;
pub mod errors;
pub mod history;
pub mod input;
pub mod model;
pub mod presets;
pub mod project;
pub mod table;
pub mod validate;

// Re-export commonly used types at crate root for convenience
pub use engine::{analyze, solve, SolveOptions};
pub use errors::{TableId, ValidationError, ValidationResult};
pub use history::{IterationRecord, ResultHistory};
pub use input::{RawCell, RawStructureInput};
pub use model::{Connectivity, StructureModel};
pub use table::JointTable;
pub use validate::{validate, ValidatedInput};
