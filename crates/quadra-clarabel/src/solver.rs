//! Common QP session shared by the dense and sparse front ends.

use crate::engine::{ConicModel, EngineError, EngineOptions, RowKind};
use crate::solution::SolutionRecord;
use nalgebra::DVector;
use quadra_solver::{QpConfig, QpView, SolveQp, SolverError, SolverStatus, VarType, WarmStart};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Engine default for both tolerances, reported when none has been set.
const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Representation seam between the session and its two front ends.
///
/// Implementations stage coefficients into the sized [`ConicModel`]; every
/// other concern (sizing, parameters, optimization, solution extraction)
/// lives once in [`QpSolver`].
pub trait Frontend {
    /// Matrix input type (`Q`, `Aeq`, `Aineq`).
    type Matrix;
    /// Cost/right-hand-side vector input type (`C`, `Beq`, `Bineq`).
    type Vector;

    /// Validate every input dimension against the sized model.
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message on any mismatch; nothing is staged
    /// into the engine first.
    #[allow(clippy::too_many_arguments)]
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
    );

    /// Replace the staged objective with `0.5·xᵀQx + Cᵀx`.
    fn load_objective(model: &mut ConicModel, q: &Self::Matrix, c: &Self::Vector);

    /// Rewrite every row of one constraint block in place.
    fn load_rows(
        model: &mut ConicModel,
        kind: RowKind,
        a: &Self::Matrix,
        b: &Self::Vector,
    ) -> Result<(), EngineError>;
}

/// One QP adapter session: owns the engine-facing model, the parameter
/// state, and the most recent solution record.
///
/// The type parameter selects the input representation; see
/// [`DenseSolver`](crate::DenseSolver) and
/// [`SparseSolver`](crate::SparseSolver).
pub struct QpSolver<F: Frontend> {
    model: ConicModel,
    config: QpConfig,
    nrvar: usize,
    nreq: usize,
    nrineq: usize,
    var_types: Vec<VarType>,
    record: SolutionRecord,
    _frontend: PhantomData<F>,
}

impl<F: Frontend> QpSolver<F> {
    /// Create an unsized session; call [`problem`](Self::problem) before
    /// solving.
    pub fn new() -> Self {
        QpSolver {
            model: ConicModel::new(),
            config: QpConfig::new(),
            nrvar: 0,
            nreq: 0,
            nrineq: 0,
            var_types: Vec::new(),
            record: SolutionRecord::new(),
            _frontend: PhantomData,
        }
    }

    /// Create a session already sized to the given dimensions.
    pub fn with_dims(nrvar: usize, nreq: usize, nrineq: usize) -> Self {
        let mut solver = Self::new();
        solver.problem(nrvar, nreq, nrineq);
        solver
    }

    /// Size (or re-size) the model: discards every existing variable and
    /// constraint, creates `nrvar` fresh continuous variables with free
    /// bounds, and `nreq` equality plus `nrineq` inequality rows with zero
    /// coefficients and zero right-hand side.
    ///
    /// Idempotent; parameters set through this session survive re-sizing.
    pub fn problem(&mut self, nrvar: usize, nreq: usize, nrineq: usize) {
        debug!(
            component = "solver",
            operation = "problem",
            status = "success",
            nrvar,
            nreq,
            nrineq,
            "Sizing QP model"
        );
        self.model.resize(nrvar, nreq, nrineq);
        self.var_types = vec![VarType::Continuous; nrvar];
        self.record.resize(nrvar, nreq, nrineq);
        self.nrvar = nrvar;
        self.nreq = nreq;
        self.nrineq = nrineq;
    }

    /// Number of decision variables the model is sized for.
    pub fn nrvar(&self) -> usize {
        self.nrvar
    }

    /// Number of equality rows the model is sized for.
    pub fn nreq(&self) -> usize {
        self.nreq
    }

    /// Number of inequality rows the model is sized for.
    pub fn nrineq(&self) -> usize {
        self.nrineq
    }

    /// Access the engine-facing model.
    pub fn model(&self) -> &ConicModel {
        &self.model
    }

    /// Change one variable's domain tag.
    ///
    /// The backing engine solves continuous conic problems only, so
    /// `Integer` and `Binary` are rejected.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the sized model.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnsupportedVariableType`] for non-continuous
    /// tags; the stored tag is left unchanged.
    pub fn set_variable_type(&mut self, index: usize, var_type: VarType) -> Result<(), SolverError> {
        assert!(
            index < self.nrvar,
            "variable index {} out of range (nrvar = {})",
            index,
            self.nrvar
        );
        match var_type {
            VarType::Continuous => {
                self.var_types[index] = var_type;
                Ok(())
            }
            VarType::Integer | VarType::Binary => {
                warn!(
                    component = "solver",
                    operation = "set_variable_type",
                    status = "error",
                    index,
                    requested = var_type.as_str(),
                    "Engine cannot model non-continuous variables"
                );
                Err(SolverError::UnsupportedVariableType {
                    index,
                    requested: var_type,
                })
            }
        }
    }

    /// Get one variable's domain tag.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the sized model.
    pub fn variable_type(&self, index: usize) -> VarType {
        self.var_types[index]
    }

    /// Feasibility tolerance forwarded to the engine; the engine default
    /// when never set.
    pub fn feasibility_tolerance(&self) -> f64 {
        self.config
            .feasibility_tolerance
            .unwrap_or(DEFAULT_TOLERANCE)
    }

    /// Set the feasibility tolerance for subsequent solves. The value is
    /// forwarded unvalidated; the engine governs acceptance.
    pub fn set_feasibility_tolerance(&mut self, tol: f64) {
        self.config.feasibility_tolerance = Some(tol);
    }

    /// Optimality (duality-gap) tolerance forwarded to the engine; the
    /// engine default when never set.
    pub fn optimality_tolerance(&self) -> f64 {
        self.config
            .optimality_tolerance
            .unwrap_or(DEFAULT_TOLERANCE)
    }

    /// Set the optimality tolerance for subsequent solves.
    pub fn set_optimality_tolerance(&mut self, tol: f64) {
        self.config.optimality_tolerance = Some(tol);
    }

    /// Warm-start policy for the next solve.
    pub fn warm_start(&self) -> WarmStart {
        self.config.warm_start
    }

    /// Select the warm-start policy. The mode is staged into the engine on
    /// every solve; the current engine release performs cold interior-point
    /// starts, so a non-default mode is recorded and reported rather than
    /// changing iterates.
    pub fn set_warm_start(&mut self, mode: WarmStart) {
        self.config.warm_start = mode;
    }

    /// Toggle engine console output; no effect on results.
    pub fn display_output(&mut self, enabled: bool) {
        self.config.verbose = enabled;
    }

    /// Iteration limit for the next solve, if one has been set.
    pub fn max_iterations(&self) -> Option<u32> {
        self.config.max_iterations
    }

    /// Set an iteration limit for subsequent solves.
    pub fn set_max_iterations(&mut self, limit: u32) {
        self.config.max_iterations = Some(limit);
    }

    /// Time limit in seconds for the next solve, if one has been set.
    pub fn time_limit(&self) -> Option<f64> {
        self.config.time_limit
    }

    /// Set a time limit in seconds for subsequent solves.
    pub fn set_time_limit(&mut self, seconds: f64) {
        self.config.time_limit = Some(seconds);
    }

    /// Access the full parameter configuration.
    pub fn config(&self) -> &QpConfig {
        &self.config
    }

    /// Replace the full parameter configuration.
    pub fn set_config(&mut self, config: QpConfig) {
        self.config = config;
    }

    /// Emit the current parameter/dimension/status snapshot to the
    /// operator log. Pure diagnostic; no return value.
    pub fn inform(&self) {
        info!(
            component = "solver",
            operation = "inform",
            status = "success",
            nrvar = self.nrvar,
            nreq = self.nreq,
            nrineq = self.nrineq,
            feasibility_tolerance = self.feasibility_tolerance(),
            optimality_tolerance = self.optimality_tolerance(),
            warm_start = self.config.warm_start.as_str(),
            verbose = self.config.verbose,
            max_iterations = self.config.max_iterations,
            time_limit = self.config.time_limit,
            solver_status = self.record.status().as_str(),
            iterations = self.record.iterations(),
            "QP session snapshot"
        );
    }

    /// Iteration count of the most recent solve.
    pub fn iterations(&self) -> u32 {
        self.record.iterations()
    }

    /// Status of the most recent solve as a plain integer code; zero means
    /// optimal.
    pub fn fail(&self) -> i32 {
        self.record.status().code()
    }

    /// Termination status of the most recent solve.
    pub fn status(&self) -> SolverStatus {
        self.record.status()
    }

    /// Primal solution of the most recent successful solve. Stale after a
    /// failed solve; gate reads behind `solve`'s boolean result.
    pub fn result(&self) -> &[f64] {
        self.record.result()
    }

    /// Equality-constraint duals of the most recent successful solve.
    pub fn dual_eq(&self) -> &[f64] {
        self.record.dual_eq()
    }

    /// Inequality-constraint duals of the most recent successful solve.
    pub fn dual_ineq(&self) -> &[f64] {
        self.record.dual_ineq()
    }

    /// Objective value of the most recent successful solve.
    pub fn objective_value(&self) -> f64 {
        self.record.objective_value()
    }

    /// Engine-reported solve time of the most recent solve, in seconds.
    pub fn solve_time(&self) -> f64 {
        self.record.solve_time()
    }

    /// Install a concrete problem into the sized model and optimize.
    ///
    /// Returns `true` iff the engine terminated with an acceptable status;
    /// on `false` the solution accessors keep their previous values and
    /// [`fail`](Self::fail) carries the non-success code.
    ///
    /// # Panics
    ///
    /// Panics if any input dimension disagrees with the sized model.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &mut self,
        q: &F::Matrix,
        c: &F::Vector,
        a_eq: &F::Matrix,
        b_eq: &F::Vector,
        a_ineq: &F::Matrix,
        b_ineq: &F::Vector,
        lb: &DVector<f64>,
        ub: &DVector<f64>,
    ) -> bool {
        F::check_dimensions(
            self.nrvar,
            self.nreq,
            self.nrineq,
            q,
            c,
            a_eq,
            b_eq,
            a_ineq,
            b_ineq,
        );
        assert_eq!(
            lb.len(),
            self.nrvar,
            "lower bound length must match nrvar"
        );
        assert_eq!(
            ub.len(),
            self.nrvar,
            "upper bound length must match nrvar"
        );

        F::load_objective(&mut self.model, q, c);
        for j in 0..self.nrvar {
            self.model.set_bounds(j, lb[j], ub[j]);
        }
        let staged = F::load_rows(&mut self.model, RowKind::Equality, a_eq, b_eq).and_then(|()| {
            F::load_rows(&mut self.model, RowKind::Inequality, a_ineq, b_ineq)
        });
        if let Err(err) = staged {
            warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                error = %err,
                "Failed to stage constraint rows"
            );
            self.record.mark_failure(SolverStatus::Unsolved, 0);
            return false;
        }
        self.run()
    }

    /// Shared optimize-and-extract path.
    fn run(&mut self) -> bool {
        self.model.set_options(&EngineOptions {
            verbose: self.config.verbose,
            feasibility_tolerance: self.config.feasibility_tolerance,
            optimality_tolerance: self.config.optimality_tolerance,
            max_iterations: self.config.max_iterations,
            time_limit: self.config.time_limit,
            warm_start: self.config.warm_start,
        });

        let status = self.model.optimize();
        match self.model.snapshot() {
            Ok(snapshot) if status.is_acceptable() => {
                self.record.store(snapshot, self.nreq, self.nrineq);
                debug!(
                    component = "solver",
                    operation = "solve",
                    status = "success",
                    solver_status = status.as_str(),
                    iterations = snapshot.iterations(),
                    objective_value = snapshot.objective_value(),
                    solve_time = snapshot.solve_time(),
                    "Solve completed"
                );
                true
            }
            Ok(snapshot) => {
                self.record.mark_failure(status, snapshot.iterations());
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "warn",
                    solver_status = status.as_str(),
                    iterations = snapshot.iterations(),
                    "Solver did not reach an acceptable solution; keeping stale result"
                );
                false
            }
            Err(err) => {
                self.record.mark_failure(status, 0);
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "error",
                    error = %err,
                    "Engine produced no solution snapshot"
                );
                false
            }
        }
    }
}

impl<F: Frontend> Default for QpSolver<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Frontend> QpView for QpSolver<F> {
    fn status(&self) -> SolverStatus {
        self.record.status()
    }

    fn iterations(&self) -> u32 {
        self.record.iterations()
    }

    fn result(&self) -> &[f64] {
        self.record.result()
    }

    fn dual_eq(&self) -> &[f64] {
        self.record.dual_eq()
    }

    fn dual_ineq(&self) -> &[f64] {
        self.record.dual_ineq()
    }

    fn objective_value(&self) -> f64 {
        self.record.objective_value()
    }

    fn solve_time_seconds(&self) -> f64 {
        self.record.solve_time()
    }
}

impl<F: Frontend> SolveQp for QpSolver<F> {
    type Matrix = F::Matrix;
    type Vector = F::Vector;
    type DenseVector = DVector<f64>;

    fn problem(&mut self, nrvar: usize, nreq: usize, nrineq: usize) {
        self.problem(nrvar, nreq, nrineq);
    }

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
    ) -> bool {
        self.solve(q, c, a_eq, b_eq, a_ineq, b_ineq, lb, ub)
    }
}

#[cfg(test)]
mod tests {
    use crate::DenseSolver;
    use quadra_solver::{SolverStatus, VarType, WarmStart};

    #[test]
    fn test_parameter_round_trip() {
        let mut qp = DenseSolver::new();
        let tol = 1e-9;

        qp.set_feasibility_tolerance(tol);
        qp.set_optimality_tolerance(tol);
        qp.set_warm_start(WarmStart::None);
        qp.display_output(false);

        assert_eq!(qp.feasibility_tolerance(), tol);
        assert_eq!(qp.optimality_tolerance(), tol);
        assert_eq!(qp.warm_start(), WarmStart::None);
    }

    #[test]
    fn test_parameters_default_to_engine_values() {
        let qp = DenseSolver::new();
        assert_eq!(qp.feasibility_tolerance(), 1e-8);
        assert_eq!(qp.optimality_tolerance(), 1e-8);
        assert_eq!(qp.warm_start(), WarmStart::Default);
        assert_eq!(qp.max_iterations(), None);
        assert_eq!(qp.time_limit(), None);
    }

    #[test]
    fn test_parameters_survive_resizing() {
        let mut qp = DenseSolver::new();
        qp.set_feasibility_tolerance(1e-10);
        qp.problem(3, 1, 1);
        qp.problem(5, 2, 0);
        assert_eq!(qp.feasibility_tolerance(), 1e-10);
        assert_eq!(qp.nrvar(), 5);
        assert_eq!(qp.nreq(), 2);
        assert_eq!(qp.nrineq(), 0);
    }

    #[test]
    fn test_problem_resets_solution_record() {
        let mut qp = DenseSolver::with_dims(4, 2, 1);
        assert_eq!(qp.status(), SolverStatus::Unsolved);
        assert_eq!(qp.fail(), SolverStatus::Unsolved.code());
        assert_eq!(qp.result().len(), 4);
        assert_eq!(qp.dual_eq().len(), 2);
        assert_eq!(qp.dual_ineq().len(), 1);
    }

    #[test]
    fn test_variable_type_tags() {
        let mut qp = DenseSolver::with_dims(2, 0, 0);
        assert_eq!(qp.variable_type(0), VarType::Continuous);
        assert!(qp.set_variable_type(1, VarType::Continuous).is_ok());

        let err = qp.set_variable_type(0, VarType::Integer).unwrap_err();
        assert_eq!(err.code(), "VARIABLE_TYPE_UNSUPPORTED");
        assert_eq!(qp.variable_type(0), VarType::Continuous);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_variable_type_index_precondition() {
        let mut qp = DenseSolver::with_dims(2, 0, 0);
        let _ = qp.set_variable_type(5, VarType::Continuous);
    }
}
