use quadra_clarabel::engine::{ConicModel, EngineOptions, RowKind};
use quadra_solver::SolverStatus;

#[test]
fn test_minimize_simple() {
    // Initialize tracing for diagnostics
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // minimize x subject to x >= 1, x <= 10
    let mut model = ConicModel::new();
    model.resize(1, 0, 1);
    model.set_linear_cost(0, 1.0);
    model.set_bounds(0, 1.0, f64::INFINITY);
    model
        .set_row(RowKind::Inequality, 0, vec![0], vec![1.0], 10.0)
        .expect("failed to stage row");

    let status = model.optimize();
    assert_eq!(status, SolverStatus::Optimal);

    let snapshot = model.snapshot().expect("missing snapshot");
    assert!(
        (snapshot.primal()[0] - 1.0).abs() < 1e-6,
        "Expected x ~1.0, got {}",
        snapshot.primal()[0]
    );
    assert!(
        (snapshot.objective_value() - 1.0).abs() < 1e-6,
        "Expected objective value ~1.0, got {}",
        snapshot.objective_value()
    );
    assert!(snapshot.iterations() > 0);
}

#[test]
fn test_equality_qp_with_dual() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // minimize 0.5*(x^2 + y^2) subject to x + y = 2; optimum at (1, 1)
    // with equality dual -1.
    let mut model = ConicModel::new();
    model.resize(2, 1, 0);
    model.push_quadratic_term(0, 0, 1.0);
    model.push_quadratic_term(1, 1, 1.0);
    model
        .set_row(RowKind::Equality, 0, vec![0, 1], vec![1.0, 1.0], 2.0)
        .expect("failed to stage row");

    let status = model.optimize();
    assert_eq!(status, SolverStatus::Optimal);

    let snapshot = model.snapshot().expect("missing snapshot");
    assert!((snapshot.primal()[0] - 1.0).abs() < 1e-6);
    assert!((snapshot.primal()[1] - 1.0).abs() < 1e-6);
    assert!((snapshot.objective_value() - 1.0).abs() < 1e-6);
    assert!(
        (snapshot.row_duals()[0] + 1.0).abs() < 1e-6,
        "Expected equality dual ~-1.0, got {}",
        snapshot.row_duals()[0]
    );
}

#[test]
fn test_contradictory_rows_are_infeasible() {
    let mut model = ConicModel::new();
    model.resize(1, 0, 2);
    // x <= -1 and x >= 2 cannot hold together.
    model
        .set_row(RowKind::Inequality, 0, vec![0], vec![1.0], -1.0)
        .expect("failed to stage row");
    model
        .set_row(RowKind::Inequality, 1, vec![0], vec![-1.0], -2.0)
        .expect("failed to stage row");

    let status = model.optimize();
    assert_eq!(status, SolverStatus::Infeasible);
    assert!(!status.is_acceptable());
}

#[test]
fn test_unbounded_objective() {
    let mut model = ConicModel::new();
    model.resize(1, 0, 0);
    // minimize x with free bounds
    model.set_linear_cost(0, 1.0);

    let status = model.optimize();
    assert_eq!(status, SolverStatus::Unbounded);
}

#[test]
fn test_iteration_limit_is_not_acceptable() {
    let mut model = ConicModel::new();
    model.resize(2, 1, 0);
    model.push_quadratic_term(0, 0, 1.0);
    model.push_quadratic_term(1, 1, 1.0);
    model
        .set_row(RowKind::Equality, 0, vec![0, 1], vec![1.0, 1.0], 2.0)
        .expect("failed to stage row");
    model.set_options(&EngineOptions {
        max_iterations: Some(1),
        ..EngineOptions::default()
    });

    let status = model.optimize();
    assert!(
        !status.is_acceptable(),
        "one-iteration run should not certify a solution, got {}",
        status
    );
}

#[test]
fn test_resize_after_solve_requires_new_optimize() {
    let mut model = ConicModel::new();
    model.resize(1, 0, 0);
    model.set_linear_cost(0, 1.0);
    model.set_bounds(0, 0.0, 1.0);
    assert_eq!(model.optimize(), SolverStatus::Optimal);
    assert!(model.snapshot().is_ok());

    model.resize(2, 1, 1);
    assert!(model.snapshot().is_err());
    assert_eq!(model.num_columns(), 2);
    assert_eq!(model.num_rows(), 2);
}
