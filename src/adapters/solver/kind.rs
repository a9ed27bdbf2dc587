//! Solver generation strategies

use crate::config::QpSolver;
use serde::Serialize;
use std::fmt;

/// How the QP handed to the backend is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QpLayout {
    /// States eliminated over the whole horizon
    Condensed,
    /// States eliminated within blocks of shooting intervals
    Block,
    /// States kept as QP variables
    Sparse,
}

/// Concrete solver-generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Gauss-Newton with full or partial condensing, qpOASES
    CondensedGaussNewton,
    /// Gauss-Newton with N^2 condensing, qpOASES
    GaussNewtonCn2,
    /// Exact Hessian with N^2 condensing, qpOASES
    ExactHessianCn2,
    /// Gauss-Newton with N^2 condensing and Hessian factorization, qpOASES
    Cn2Factorization,
    /// Gauss-Newton with block condensing, qpDUNES
    BlockQpDunes,
    /// Gauss-Newton with block condensing, FORCES
    BlockForces,
    /// Sparse Gauss-Newton, FORCES
    SparseForces,
    /// Sparse Gauss-Newton, qpDUNES
    SparseQpDunes,
    /// Sparse exact Hessian, qpDUNES
    ExactHessianQpDunes,
    /// Sparse Gauss-Newton, HPMPC
    SparseHpmpc,
}

impl SolverKind {
    /// Every strategy
    pub const ALL: [SolverKind; 10] = [
        SolverKind::CondensedGaussNewton,
        SolverKind::GaussNewtonCn2,
        SolverKind::ExactHessianCn2,
        SolverKind::Cn2Factorization,
        SolverKind::BlockQpDunes,
        SolverKind::BlockForces,
        SolverKind::SparseForces,
        SolverKind::SparseQpDunes,
        SolverKind::ExactHessianQpDunes,
        SolverKind::SparseHpmpc,
    ];

    /// QP backend the generated code calls
    pub fn backend(self) -> QpSolver {
        match self {
            SolverKind::CondensedGaussNewton
            | SolverKind::GaussNewtonCn2
            | SolverKind::ExactHessianCn2
            | SolverKind::Cn2Factorization => QpSolver::QpOases,
            SolverKind::BlockQpDunes | SolverKind::SparseQpDunes | SolverKind::ExactHessianQpDunes => {
                QpSolver::QpDunes
            }
            SolverKind::BlockForces | SolverKind::SparseForces => QpSolver::Forces,
            SolverKind::SparseHpmpc => QpSolver::Hpmpc,
        }
    }

    /// QP structure
    pub fn layout(self) -> QpLayout {
        match self {
            SolverKind::CondensedGaussNewton
            | SolverKind::GaussNewtonCn2
            | SolverKind::ExactHessianCn2
            | SolverKind::Cn2Factorization => QpLayout::Condensed,
            SolverKind::BlockQpDunes | SolverKind::BlockForces => QpLayout::Block,
            SolverKind::SparseForces
            | SolverKind::SparseQpDunes
            | SolverKind::ExactHessianQpDunes
            | SolverKind::SparseHpmpc => QpLayout::Sparse,
        }
    }

    /// Whether the strategy uses the exact Hessian of the Lagrangian
    pub fn is_exact_hessian(self) -> bool {
        matches!(self, SolverKind::ExactHessianCn2 | SolverKind::ExactHessianQpDunes)
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::CondensedGaussNewton => "gauss_newton_condensed",
            SolverKind::GaussNewtonCn2 => "gauss_newton_cn2",
            SolverKind::ExactHessianCn2 => "exact_hessian_cn2",
            SolverKind::Cn2Factorization => "gauss_newton_cn2_factorization",
            SolverKind::BlockQpDunes => "gauss_newton_block_qpdunes",
            SolverKind::BlockForces => "gauss_newton_block_forces",
            SolverKind::SparseForces => "gauss_newton_forces",
            SolverKind::SparseQpDunes => "gauss_newton_qpdunes",
            SolverKind::ExactHessianQpDunes => "exact_hessian_qpdunes",
            SolverKind::SparseHpmpc => "gauss_newton_hpmpc",
        };
        write!(f, "{name}")
    }
}
