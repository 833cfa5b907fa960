//! Dense and sparse QP bridges to the Clarabel conic solver.
//!
//! This crate translates a quadratic program
//!
//! ```text
//! minimize   0.5·xᵀQx + Cᵀx
//! subject to Aeq·x  =  Beq
//!            Aineq·x ≤ Bineq
//!            lb ≤ x ≤ ub
//! ```
//!
//! into the engine's additive conic representation, runs the solve, and
//! extracts primal and dual results plus diagnostics. Two front ends share
//! one session: [`DenseSolver`] over `nalgebra` matrices and
//! [`SparseSolver`] over `nalgebra-sparse` CSC storage. The two produce
//! numerically equivalent results for equivalent inputs.

pub mod dense;
pub mod engine;
pub mod solution;
pub mod solver;
pub mod sparse;
mod status;

pub use dense::{Dense, DenseSolver};
pub use engine::{ConicModel, EngineError, EngineOptions, LinearRow, RowKind, Snapshot};
pub use solution::SolutionRecord;
pub use solver::{Frontend, QpSolver};
pub use sparse::{Sparse, SparseSolver};

pub use quadra_solver::{QpConfig, QpView, SolveQp, SolverError, SolverStatus, VarType, WarmStart};
