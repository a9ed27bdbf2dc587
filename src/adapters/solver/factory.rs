//! Solver strategy factory
//!
//! This module maps a (QP solver, sparse QP solution, Hessian approximation)
//! triple to exactly one solver strategy and creates it.

use crate::adapters::solver::export::SolverExport;
use crate::adapters::solver::kind::SolverKind;
use crate::config::{ExportOptions, HessianApproximation, QpSolver, SparseQpSolution};
use crate::domain::{GeneratorError, Result};

/// Select the solver strategy for an option combination
///
/// Full and partial condensing do not look at the Hessian approximation.
///
/// # Errors
///
/// Returns `InvalidArguments` naming the combination if no strategy supports it
pub fn select_solver(
    qp_solver: QpSolver,
    method: SparseQpSolution,
    hessian: HessianApproximation,
) -> Result<SolverKind> {
    use HessianApproximation::{ExactHessian, GaussNewton};
    use SparseQpSolution::*;

    let unsupported = |reason: &str| {
        GeneratorError::InvalidArguments(format!(
            "{reason} (qp_solver = {qp_solver}, sparse_qp_solution = {method}, hessian_approximation = {hessian})"
        ))
    };

    match method {
        FullCondensing | Condensing | FullCondensingN2 | CondensingN2
        | FullCondensingN2Factorization
            if qp_solver != QpSolver::QpOases =>
        {
            Err(unsupported("Condensed solutions are only supported with qpOASES"))
        }
        FullCondensing | Condensing => Ok(SolverKind::CondensedGaussNewton),
        FullCondensingN2 | CondensingN2 => match hessian {
            GaussNewton => Ok(SolverKind::GaussNewtonCn2),
            ExactHessian => Ok(SolverKind::ExactHessianCn2),
            _ => Err(unsupported(
                "Only Gauss-Newton and Exact Hessian methods are supported with N^2 condensing",
            )),
        },
        FullCondensingN2Factorization => Ok(SolverKind::Cn2Factorization),
        BlockCondensingN2 => match (qp_solver, hessian) {
            (QpSolver::QpDunes, GaussNewton) => Ok(SolverKind::BlockQpDunes),
            (QpSolver::Forces, GaussNewton) => Ok(SolverKind::BlockForces),
            (QpSolver::QpDunes | QpSolver::Forces, _) => Err(unsupported(
                "Only Gauss-Newton methods are supported with block condensing",
            )),
            _ => Err(unsupported(
                "Block condensing is only supported with qpDUNES and FORCES",
            )),
        },
        SparseSolver => match qp_solver {
            QpSolver::Forces => Ok(SolverKind::SparseForces),
            QpSolver::QpDunes if hessian == ExactHessian => Ok(SolverKind::ExactHessianQpDunes),
            QpSolver::QpDunes => Ok(SolverKind::SparseQpDunes),
            QpSolver::Hpmpc => Ok(SolverKind::SparseHpmpc),
            QpSolver::QpOases => Err(unsupported(
                "Sparse solutions are only supported with FORCES, qpDUNES and HPMPC",
            )),
        },
    }
}

/// Create an unconfigured solver of `kind` for the given options
pub fn create_solver(kind: SolverKind, options: &ExportOptions) -> SolverExport {
    tracing::debug!(strategy = %kind, backend = %kind.backend(), "Creating solver strategy");
    SolverExport::new(kind, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condensing_ignores_hessian_mode() {
        for hessian in HessianApproximation::ALL {
            for method in [SparseQpSolution::FullCondensing, SparseQpSolution::Condensing] {
                assert_eq!(
                    select_solver(QpSolver::QpOases, method, hessian).unwrap(),
                    SolverKind::CondensedGaussNewton
                );
            }
        }
    }

    #[test]
    fn test_error_names_combination() {
        let err = select_solver(
            QpSolver::Hpmpc,
            SparseQpSolution::BlockCondensingN2,
            HessianApproximation::GaussNewton,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("qp_solver = HPMPC"));
        assert!(message.contains("block_condensing_n2"));
        assert!(matches!(err, GeneratorError::InvalidArguments(_)));
    }

    #[test]
    fn test_created_solver_keeps_kind() {
        let solver = create_solver(SolverKind::SparseHpmpc, &ExportOptions::default());
        assert_eq!(solver.kind(), SolverKind::SparseHpmpc);
    }
}
