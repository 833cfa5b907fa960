//! Status conversions from the Clarabel engine.

use clarabel::solver::SolverStatus as EngineStatus;
use quadra_solver::SolverStatus;

pub(crate) fn map_engine_status(status: EngineStatus) -> SolverStatus {
    match status {
        EngineStatus::Unsolved => SolverStatus::Unsolved,
        EngineStatus::Solved => SolverStatus::Optimal,
        EngineStatus::AlmostSolved => SolverStatus::AlmostOptimal,
        EngineStatus::PrimalInfeasible | EngineStatus::AlmostPrimalInfeasible => {
            SolverStatus::Infeasible
        }
        EngineStatus::DualInfeasible | EngineStatus::AlmostDualInfeasible => {
            SolverStatus::Unbounded
        }
        EngineStatus::MaxIterations => SolverStatus::IterationLimit,
        EngineStatus::MaxTime => SolverStatus::TimeLimit,
        EngineStatus::NumericalError | EngineStatus::InsufficientProgress => {
            SolverStatus::NumericalError
        }
        // Added in clarabel 0.11; unreachable here since the engine registers
        // no callbacks. Mapped to Unsolved (no result produced).
        EngineStatus::CallbackTerminated => SolverStatus::Unsolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_status_mapping() {
        assert_eq!(
            map_engine_status(EngineStatus::Solved),
            SolverStatus::Optimal
        );
        assert_eq!(
            map_engine_status(EngineStatus::AlmostSolved),
            SolverStatus::AlmostOptimal
        );
        assert_eq!(
            map_engine_status(EngineStatus::PrimalInfeasible),
            SolverStatus::Infeasible
        );
        assert_eq!(
            map_engine_status(EngineStatus::DualInfeasible),
            SolverStatus::Unbounded
        );
        assert_eq!(
            map_engine_status(EngineStatus::MaxIterations),
            SolverStatus::IterationLimit
        );
        assert_eq!(
            map_engine_status(EngineStatus::MaxTime),
            SolverStatus::TimeLimit
        );
        assert_eq!(
            map_engine_status(EngineStatus::InsufficientProgress),
            SolverStatus::NumericalError
        );
    }

    #[test]
    fn test_acceptable_statuses() {
        assert!(map_engine_status(EngineStatus::Solved).is_acceptable());
        assert!(map_engine_status(EngineStatus::AlmostSolved).is_acceptable());
        assert!(!map_engine_status(EngineStatus::MaxIterations).is_acceptable());
        assert!(!map_engine_status(EngineStatus::PrimalInfeasible).is_acceptable());
    }
}
