//! Traits for abstraction over dense and sparse QP front ends.

use crate::SolverStatus;

/// Trait for reading the most recent solution from an adapter.
///
/// Accessors return whatever the last successful solve produced; after a
/// failed solve they keep the previous (stale) values, so callers must gate
/// reads behind the boolean returned by [`SolveQp::solve`].
pub trait QpView {
    /// Get the termination status of the most recent solve.
    fn status(&self) -> SolverStatus;

    /// Get the iteration count of the most recent solve.
    fn iterations(&self) -> u32;

    /// Get the primal solution vector.
    fn result(&self) -> &[f64];

    /// Get the dual values of the equality constraints.
    fn dual_eq(&self) -> &[f64];

    /// Get the dual values of the inequality constraints.
    fn dual_ineq(&self) -> &[f64];

    /// Get the objective value at the solution.
    fn objective_value(&self) -> f64;

    /// Get the engine-reported solve time in seconds.
    fn solve_time_seconds(&self) -> f64;

    /// Get the status of the most recent solve as a plain integer code.
    ///
    /// Zero means optimal; see [`SolverStatus::code`].
    fn fail(&self) -> i32 {
        self.status().code()
    }

    /// Check if the most recent solve terminated optimally.
    fn is_optimal(&self) -> bool {
        self.status().is_optimal()
    }

    /// Check if the most recent solve produced a trustworthy solution.
    fn is_acceptable(&self) -> bool {
        self.status().is_acceptable()
    }

    /// Check if the most recent solve proved infeasibility.
    fn is_infeasible(&self) -> bool {
        self.status().is_infeasible()
    }

    /// Check if the most recent solve proved unboundedness.
    fn is_unbounded(&self) -> bool {
        self.status().is_unbounded()
    }
}

/// Trait for QP adapter front ends.
///
/// The two implementations differ only in the matrix/vector representation
/// they accept; sizing, parameter handling, and solution semantics are
/// identical.
pub trait SolveQp {
    /// Matrix input type (`Q`, `Aeq`, `Aineq`).
    type Matrix;
    /// Right-hand-side/cost vector input type (`C`, `Beq`, `Bineq`).
    type Vector;
    /// Dense vector type used for the variable bounds.
    type DenseVector;

    /// Size (or re-size) the model to `nrvar` variables, `nreq` equality
    /// rows, and `nrineq` inequality rows, discarding all previous entities.
    fn problem(&mut self, nrvar: usize, nreq: usize, nrineq: usize);

    /// Install the objective `0.5·xᵀQx + Cᵀx`, the constraint systems
    /// `Aeq·x = Beq` and `Aineq·x ≤ Bineq`, and the bounds `lb ≤ x ≤ ub`,
    /// then optimize.
    ///
    /// Returns `true` iff the engine reports an acceptable termination; on
    /// `false` the solution accessors keep their previous values.
    #[allow(clippy::too_many_arguments)]
    fn solve(
        &mut self,
        q: &Self::Matrix,
        c: &Self::Vector,
        a_eq: &Self::Matrix,
        b_eq: &Self::Vector,
        a_ineq: &Self::Matrix,
        b_ineq: &Self::Vector,
        lb: &Self::DenseVector,
        ub: &Self::DenseVector,
    ) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixtureView {
        status: SolverStatus,
    }

    impl QpView for FixtureView {
        fn status(&self) -> SolverStatus {
            self.status
        }

        fn iterations(&self) -> u32 {
            0
        }

        fn result(&self) -> &[f64] {
            &[]
        }

        fn dual_eq(&self) -> &[f64] {
            &[]
        }

        fn dual_ineq(&self) -> &[f64] {
            &[]
        }

        fn objective_value(&self) -> f64 {
            0.0
        }

        fn solve_time_seconds(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_view_default_optimal() {
        let view = FixtureView {
            status: SolverStatus::Optimal,
        };
        assert!(view.is_optimal());
        assert!(view.is_acceptable());
        assert!(!view.is_infeasible());
        assert_eq!(view.fail(), 0);
    }

    #[test]
    fn test_view_default_infeasible() {
        let view = FixtureView {
            status: SolverStatus::Infeasible,
        };
        assert!(!view.is_optimal());
        assert!(!view.is_acceptable());
        assert!(view.is_infeasible());
        assert_ne!(view.fail(), 0);
    }

    #[test]
    fn test_view_default_almost_optimal() {
        let view = FixtureView {
            status: SolverStatus::AlmostOptimal,
        };
        assert!(!view.is_optimal());
        assert!(view.is_acceptable());
        assert_eq!(view.fail(), 1);
    }
}
