//! Engine-facing model wrapper for the Clarabel conic solver.
//!
//! [`ConicModel`] owns the sized column/row storage and translates it into
//! Clarabel's additive conic form at each optimize. The engine itself is
//! treated as a black box: one problem in, one status and solution out.

use crate::status::map_engine_status;
use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, NonnegativeConeT, SupportedConeT, ZeroConeT,
};
use quadra_solver::{SolverStatus, WarmStart};
use std::fmt;
use tracing::{debug, trace, warn};

/// Comparator attached to a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Row holds with equality (`expr == rhs`).
    Equality,
    /// Row is an upper bound (`expr <= rhs`).
    Inequality,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Equality => "equality",
            RowKind::Inequality => "inequality",
        }
    }
}

/// One affine constraint row: stored column indices, coefficients, and the
/// right-hand side. Created zeroed by [`ConicModel::resize`] and rewritten
/// in place by [`ConicModel::set_row`].
#[derive(Debug, Clone, Default)]
pub struct LinearRow {
    columns: Vec<usize>,
    coefficients: Vec<f64>,
    rhs: f64,
}

impl LinearRow {
    /// Number of stored coefficients in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no stored coefficients.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Right-hand side of the row.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

/// Errors returned by the conic model wrapper.
#[derive(Debug, Clone)]
pub enum EngineError {
    ColumnCoefficientLengthMismatch {
        columns: usize,
        coefficients: usize,
    },
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
    RowIndexOutOfBounds {
        kind: RowKind,
        row_index: usize,
        num_rows: usize,
    },
    SolveRequired {
        operation: &'static str,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "columns length ({}) must match coefficients length ({})",
                columns, coefficients
            ),
            EngineError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "column index {} out of bounds (num_columns = {})",
                column_index, num_columns
            ),
            EngineError::RowIndexOutOfBounds {
                kind,
                row_index,
                num_rows,
            } => write!(
                f,
                "{} row index {} out of bounds (num_rows = {})",
                kind.as_str(),
                row_index,
                num_rows
            ),
            EngineError::SolveRequired { operation } => {
                write!(f, "optimize must be called before {}", operation)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Engine knobs staged for the next optimize.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Echo engine output to the console.
    pub verbose: bool,
    /// Feasibility check tolerance. `None` uses the engine default.
    pub feasibility_tolerance: Option<f64>,
    /// Absolute and relative duality-gap tolerance. `None` uses the default.
    pub optimality_tolerance: Option<f64>,
    /// Iteration limit. `None` uses the engine default.
    pub max_iterations: Option<u32>,
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Warm-start policy requested by the session.
    pub warm_start: WarmStart,
}

/// Snapshot of primal and dual values from the most recent optimize.
#[derive(Debug, Clone)]
pub struct Snapshot {
    primal: Vec<f64>,
    row_duals: Vec<f64>,
    status: SolverStatus,
    iterations: u32,
    objective_value: f64,
    solve_time: f64,
}

impl Snapshot {
    /// Primal values for the columns.
    pub fn primal(&self) -> &[f64] {
        &self.primal
    }

    /// Dual values in engine row order: equality rows, inequality rows,
    /// upper-bound rows, lower-bound rows.
    pub fn row_duals(&self) -> &[f64] {
        &self.row_duals
    }

    /// Termination status of the optimize that produced this snapshot.
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// Interior-point iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Primal objective value.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Engine-reported solve time in seconds.
    pub fn solve_time(&self) -> f64 {
        self.solve_time
    }
}

/// Safe wrapper around one Clarabel model.
///
/// Columns and rows are owned, length-tracked storage; re-sizing drops and
/// recreates everything, so no entity can leak across sizings.
pub struct ConicModel {
    col_lower: Vec<f64>,
    col_upper: Vec<f64>,
    linear_cost: Vec<f64>,
    quad_terms: Vec<(usize, usize, f64)>,
    eq_rows: Vec<LinearRow>,
    ineq_rows: Vec<LinearRow>,
    options: EngineOptions,
    solved: Option<Snapshot>,
}

impl ConicModel {
    /// Create an empty model with no columns or rows.
    pub fn new() -> Self {
        debug!(
            component = "engine",
            operation = "init",
            status = "success",
            "Creating new conic model"
        );
        ConicModel {
            col_lower: Vec::new(),
            col_upper: Vec::new(),
            linear_cost: Vec::new(),
            quad_terms: Vec::new(),
            eq_rows: Vec::new(),
            ineq_rows: Vec::new(),
            options: EngineOptions::default(),
            solved: None,
        }
    }

    /// Drop every existing column and row and allocate fresh storage:
    /// `num_columns` free continuous columns with zero cost, plus zeroed
    /// equality and inequality rows.
    ///
    /// Idempotent: repeated calls leave exactly the requested entities.
    pub fn resize(&mut self, num_columns: usize, num_equalities: usize, num_inequalities: usize) {
        debug!(
            component = "engine",
            operation = "resize",
            status = "success",
            num_columns,
            num_equalities,
            num_inequalities,
            "Re-sizing conic model"
        );
        self.col_lower = vec![f64::NEG_INFINITY; num_columns];
        self.col_upper = vec![f64::INFINITY; num_columns];
        self.linear_cost = vec![0.0; num_columns];
        self.quad_terms.clear();
        self.eq_rows = vec![LinearRow::default(); num_equalities];
        self.ineq_rows = vec![LinearRow::default(); num_inequalities];
        self.solved = None;
    }

    /// Number of columns (variables).
    pub fn num_columns(&self) -> usize {
        self.col_lower.len()
    }

    /// Total number of constraint rows (equalities plus inequalities).
    pub fn num_rows(&self) -> usize {
        self.eq_rows.len() + self.ineq_rows.len()
    }

    /// Number of equality rows.
    pub fn num_equalities(&self) -> usize {
        self.eq_rows.len()
    }

    /// Number of inequality rows.
    pub fn num_inequalities(&self) -> usize {
        self.ineq_rows.len()
    }

    /// Set one column's bounds.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of range; callers validate dimensions before
    /// staging coefficients.
    pub fn set_bounds(&mut self, col: usize, lower: f64, upper: f64) {
        trace!(
            component = "engine",
            operation = "set_bounds",
            status = "success",
            col,
            lower,
            upper,
            "Setting column bounds"
        );
        self.col_lower[col] = lower;
        self.col_upper[col] = upper;
        self.solved = None;
    }

    /// Set one column's linear objective coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of range.
    pub fn set_linear_cost(&mut self, col: usize, value: f64) {
        self.linear_cost[col] = value;
        self.solved = None;
    }

    /// Drop the staged objective: every linear cost and quadratic term.
    pub fn clear_objective(&mut self) {
        self.linear_cost.fill(0.0);
        self.quad_terms.clear();
        self.solved = None;
    }

    /// Stage one entry of the quadratic cost matrix `Q` (full-matrix
    /// convention; duplicate entries are summed at assembly).
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    pub fn push_quadratic_term(&mut self, row: usize, col: usize, value: f64) {
        let num_columns = self.num_columns();
        assert!(
            row < num_columns && col < num_columns,
            "quadratic term ({}, {}) out of range (num_columns = {})",
            row,
            col,
            num_columns
        );
        self.quad_terms.push((row, col, value));
        self.solved = None;
    }

    /// Replace one constraint row's expression and right-hand side in place.
    ///
    /// Explicitly staged zero coefficients are kept as stored entries; no
    /// sparsification is applied to caller input.
    ///
    /// # Errors
    ///
    /// Returns an error if columns and coefficients have different lengths,
    /// if any column index is out of bounds, or if the row does not exist.
    pub fn set_row(
        &mut self,
        kind: RowKind,
        index: usize,
        columns: Vec<usize>,
        coefficients: Vec<f64>,
        rhs: f64,
    ) -> Result<(), EngineError> {
        if columns.len() != coefficients.len() {
            warn!(
                component = "engine",
                operation = "set_row",
                status = "error",
                columns = columns.len(),
                coefficients = coefficients.len(),
                "Column/coefficients length mismatch"
            );
            return Err(EngineError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        let num_columns = self.num_columns();
        if let Some(&bad) = columns.iter().find(|&&col| col >= num_columns) {
            warn!(
                component = "engine",
                operation = "set_row",
                status = "error",
                column_index = bad,
                num_columns,
                "Column index out of bounds for constraint row"
            );
            return Err(EngineError::ColumnIndexOutOfBounds {
                column_index: bad,
                num_columns,
            });
        }
        let rows = match kind {
            RowKind::Equality => &mut self.eq_rows,
            RowKind::Inequality => &mut self.ineq_rows,
        };
        let num_rows = rows.len();
        let Some(row) = rows.get_mut(index) else {
            warn!(
                component = "engine",
                operation = "set_row",
                status = "error",
                kind = kind.as_str(),
                row_index = index,
                num_rows,
                "Row index out of bounds"
            );
            return Err(EngineError::RowIndexOutOfBounds {
                kind,
                row_index: index,
                num_rows,
            });
        };
        row.columns = columns;
        row.coefficients = coefficients;
        row.rhs = rhs;
        self.solved = None;
        Ok(())
    }

    /// Stage engine options for the next optimize.
    pub fn set_options(&mut self, options: &EngineOptions) {
        self.options = options.clone();
    }

    /// Assemble the staged model into conic form and run the engine.
    ///
    /// Row order of the assembled system: equality rows (zero cone), then
    /// inequality rows, upper-bound rows, and negated lower-bound rows
    /// (nonnegative cone). Infinite bounds survive assembly; the engine's
    /// presolve removes the corresponding rows.
    pub fn optimize(&mut self) -> SolverStatus {
        let n = self.num_columns();
        if n == 0 {
            warn!(
                component = "engine",
                operation = "optimize",
                status = "warn",
                "Model has no columns; skipping optimize"
            );
            return SolverStatus::Unsolved;
        }

        let m_eq = self.eq_rows.len();
        let m_ineq = self.ineq_rows.len();
        let m = m_eq + m_ineq + 2 * n;

        let p = build_csc(n, n, &self.quad_terms);
        let q = self.linear_cost.clone();

        let mut a_terms = Vec::with_capacity(self.row_nnz() + 2 * n);
        let mut b = Vec::with_capacity(m);
        for (r, row) in self.eq_rows.iter().enumerate() {
            for (&col, &coeff) in row.columns.iter().zip(&row.coefficients) {
                a_terms.push((r, col, coeff));
            }
            b.push(row.rhs);
        }
        for (r, row) in self.ineq_rows.iter().enumerate() {
            for (&col, &coeff) in row.columns.iter().zip(&row.coefficients) {
                a_terms.push((m_eq + r, col, coeff));
            }
            b.push(row.rhs);
        }
        let upper_offset = m_eq + m_ineq;
        let lower_offset = upper_offset + n;
        for j in 0..n {
            a_terms.push((upper_offset + j, j, 1.0));
        }
        for j in 0..n {
            a_terms.push((lower_offset + j, j, -1.0));
        }
        b.extend_from_slice(&self.col_upper);
        b.extend(self.col_lower.iter().map(|&lower| -lower));

        let a = build_csc(m, n, &a_terms);

        let mut cones: Vec<SupportedConeT<f64>> = Vec::new();
        if m_eq > 0 {
            cones.push(ZeroConeT(m_eq));
        }
        cones.push(NonnegativeConeT(m_ineq + 2 * n));

        let settings = self.build_settings();

        debug!(
            component = "engine",
            operation = "optimize",
            status = "success",
            num_columns = n,
            num_rows = m,
            nnz = a.nnz(),
            quad_nnz = p.nnz(),
            "Assembled conic form; starting engine"
        );

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings).unwrap();
        solver.solve();

        let status = map_engine_status(solver.solution.status);
        trace!(
            component = "engine",
            operation = "optimize",
            status = "success",
            solver_status = status.as_str(),
            iterations = solver.solution.iterations,
            "Engine terminated"
        );

        self.solved = Some(Snapshot {
            primal: std::mem::take(&mut solver.solution.x),
            row_duals: std::mem::take(&mut solver.solution.z),
            status,
            iterations: solver.solution.iterations,
            objective_value: solver.solution.obj_val,
            solve_time: solver.solution.solve_time,
        });
        status
    }

    /// Get the snapshot of the most recent optimize.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been optimized since the last
    /// structural or coefficient change.
    pub fn snapshot(&self) -> Result<&Snapshot, EngineError> {
        self.solved.as_ref().ok_or(EngineError::SolveRequired {
            operation: "snapshot",
        })
    }

    fn row_nnz(&self) -> usize {
        self.eq_rows
            .iter()
            .chain(self.ineq_rows.iter())
            .map(LinearRow::len)
            .sum()
    }

    fn build_settings(&self) -> DefaultSettings<f64> {
        let mut settings = DefaultSettings::default();
        settings.verbose = self.options.verbose;
        if let Some(tol) = self.options.feasibility_tolerance {
            settings.tol_feas = tol;
        }
        if let Some(tol) = self.options.optimality_tolerance {
            settings.tol_gap_abs = tol;
            settings.tol_gap_rel = tol;
        }
        if let Some(limit) = self.options.max_iterations {
            settings.max_iter = limit;
        }
        if let Some(limit) = self.options.time_limit {
            settings.time_limit = limit;
        }
        if self.options.warm_start != WarmStart::Default {
            // The interior-point engine has no basis reuse; the requested
            // mode is recorded and reported but starts remain cold.
            debug!(
                component = "engine",
                operation = "configure",
                status = "success",
                warm_start = self.options.warm_start.as_str(),
                "Warm-start mode recorded; engine restarts cold"
            );
        }
        settings
    }
}

impl Default for ConicModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConicModel")
            .field("num_columns", &self.num_columns())
            .field("num_equalities", &self.num_equalities())
            .field("num_inequalities", &self.num_inequalities())
            .field("solved", &self.solved.is_some())
            .finish_non_exhaustive()
    }
}

/// Build a compressed-sparse-column matrix from unordered (row, col, value)
/// entries, summing duplicates.
fn build_csc(nrows: usize, ncols: usize, terms: &[(usize, usize, f64)]) -> CscMatrix<f64> {
    let mut buckets: Vec<Vec<(usize, f64)>> = vec![Vec::new(); ncols];
    for &(row, col, value) in terms {
        buckets[col].push((row, value));
    }

    let mut colptr = Vec::with_capacity(ncols + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);
    for bucket in &mut buckets {
        bucket.sort_by_key(|&(row, _)| row);
        let mut last_row = None;
        for &(row, value) in bucket.iter() {
            if last_row == Some(row) {
                if let Some(last) = nzval.last_mut() {
                    *last += value;
                }
            } else {
                rowval.push(row);
                nzval.push(value);
                last_row = Some(row);
            }
        }
        colptr.push(rowval.len());
    }
    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}
