//! Dense-matrix QP front end.

use crate::engine::{ConicModel, EngineError, RowKind};
use crate::solver::{Frontend, QpSolver};
use nalgebra::{DMatrix, DVector};

/// Marker for the dense input representation.
pub struct Dense;

/// QP adapter over dense `nalgebra` matrices.
///
/// `solve` takes `Q` (`nrvar × nrvar`), `C` (`nrvar`), `Aeq` (`nreq ×
/// nrvar`), `Beq` (`nreq`), `Aineq` (`nrineq × nrvar`), `Bineq` (`nrineq`),
/// and dense bounds `lb`/`ub` (`nrvar` each).
pub type DenseSolver = QpSolver<Dense>;

impl Frontend for Dense {
    type Matrix = DMatrix<f64>;
    type Vector = DVector<f64>;

    fn check_dimensions(
        nrvar: usize,
        nreq: usize,
        nrineq: usize,
        q: &Self::Matrix,
        c: &Self::Vector,
        a_eq: &Self::Matrix,
        b_eq: &Self::Vector,
        a_ineq: &Self::Matrix,
        b_ineq: &Self::Vector,
    ) {
        assert_eq!(q.nrows(), nrvar, "Q row count must match nrvar");
        assert_eq!(q.ncols(), nrvar, "Q column count must match nrvar");
        assert_eq!(c.len(), nrvar, "C length must match nrvar");
        assert_eq!(a_eq.nrows(), nreq, "Aeq row count must match nreq");
        assert!(
            nreq == 0 || a_eq.ncols() == nrvar,
            "Aeq column count must match nrvar"
        );
        assert_eq!(b_eq.len(), nreq, "Beq length must match nreq");
        assert_eq!(a_ineq.nrows(), nrineq, "Aineq row count must match nrineq");
        assert!(
            nrineq == 0 || a_ineq.ncols() == nrvar,
            "Aineq column count must match nrvar"
        );
        assert_eq!(b_ineq.len(), nrineq, "Bineq length must match nrineq");
    }

    fn load_objective(model: &mut ConicModel, q: &Self::Matrix, c: &Self::Vector) {
        model.clear_objective();
        // Every entry participates, explicit zeros included.
        for i in 0..q.nrows() {
            for j in 0..q.ncols() {
                model.push_quadratic_term(i, j, q[(i, j)]);
            }
        }
        for (i, value) in c.iter().enumerate() {
            model.set_linear_cost(i, *value);
        }
    }

    fn load_rows(
        model: &mut ConicModel,
        kind: RowKind,
        a: &Self::Matrix,
        b: &Self::Vector,
    ) -> Result<(), EngineError> {
        for r in 0..a.nrows() {
            let columns: Vec<usize> = (0..a.ncols()).collect();
            let coefficients: Vec<f64> = a.row(r).iter().copied().collect();
            model.set_row(kind, r, columns, coefficients, b[r])?;
        }
        Ok(())
    }
}
