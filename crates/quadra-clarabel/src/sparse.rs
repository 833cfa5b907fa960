//! Sparse-matrix QP front end.

use crate::engine::{ConicModel, EngineError, RowKind};
use crate::solver::{Frontend, QpSolver};
use nalgebra_sparse::CscMatrix;

/// Marker for the sparse input representation.
pub struct Sparse;

/// QP adapter over compressed-sparse-column `nalgebra-sparse` matrices.
///
/// `C`, `Beq`, and `Bineq` are single-column sparse matrices (the library's
/// sparse-vector form); coefficient synthesis iterates stored entries only,
/// so unstored entries contribute implicit zeros. Bounds stay dense: they
/// are one-per-variable regardless of sparsity.
pub type SparseSolver = QpSolver<Sparse>;

impl Frontend for Sparse {
    type Matrix = CscMatrix<f64>;
    type Vector = CscMatrix<f64>;

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
        assert_eq!(c.nrows(), nrvar, "C length must match nrvar");
        assert_eq!(c.ncols(), 1, "C must be a single-column sparse vector");
        assert_eq!(a_eq.nrows(), nreq, "Aeq row count must match nreq");
        assert!(
            nreq == 0 || a_eq.ncols() == nrvar,
            "Aeq column count must match nrvar"
        );
        assert_eq!(b_eq.nrows(), nreq, "Beq length must match nreq");
        assert_eq!(b_eq.ncols(), 1, "Beq must be a single-column sparse vector");
        assert_eq!(a_ineq.nrows(), nrineq, "Aineq row count must match nrineq");
        assert!(
            nrineq == 0 || a_ineq.ncols() == nrvar,
            "Aineq column count must match nrvar"
        );
        assert_eq!(b_ineq.nrows(), nrineq, "Bineq length must match nrineq");
        assert_eq!(
            b_ineq.ncols(),
            1,
            "Bineq must be a single-column sparse vector"
        );
    }

    fn load_objective(model: &mut ConicModel, q: &Self::Matrix, c: &Self::Vector) {
        model.clear_objective();
        for (i, j, value) in q.triplet_iter() {
            model.push_quadratic_term(i, j, *value);
        }
        for (i, _, value) in c.triplet_iter() {
            model.set_linear_cost(i, *value);
        }
    }

    fn load_rows(
        model: &mut ConicModel,
        kind: RowKind,
        a: &Self::Matrix,
        b: &Self::Vector,
    ) -> Result<(), EngineError> {
        // Gather the stored entries row-wise; rows with no stored entry are
        // reinstated as empty expressions.
        let mut rows: Vec<(Vec<usize>, Vec<f64>)> = vec![(Vec::new(), Vec::new()); a.nrows()];
        for (i, j, value) in a.triplet_iter() {
            rows[i].0.push(j);
            rows[i].1.push(*value);
        }
        let mut rhs = vec![0.0; b.nrows()];
        for (i, _, value) in b.triplet_iter() {
            rhs[i] = *value;
        }
        for (index, (columns, coefficients)) in rows.into_iter().enumerate() {
            model.set_row(kind, index, columns, coefficients, rhs[index])?;
        }
        Ok(())
    }
}
