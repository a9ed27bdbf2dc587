//! Consistency validation of an OCP against the export options
//!
//! Runs before any strategy is created or any artifact content is written.

use crate::config::{DiscretizationType, ExportOptions, HessianApproximation};
use crate::domain::{GeneratorError, Ocp, Result};

/// Checks that `ocp` can be exported with `options`
///
/// # Errors
///
/// - `InvalidObjectiveForExport` if the objective has Mayer or Lagrange terms
///   and the Hessian approximation is not exact or the terms are not exactly
///   one Mayer or exactly one Lagrange term
/// - `InvalidArguments` if the model has uncontrolled inputs or free parameters
/// - `InvalidOption` if the Hessian approximation or the discretization type
///   is not supported for export
pub fn check_consistency(ocp: &Ocp, options: &ExportOptions) -> Result<()> {
    let objective = &ocp.objective;
    if objective.has_general_terms() {
        let exact = options.hessian_approximation == HessianApproximation::ExactHessian;
        let single_term = objective.mayer_terms == 1 || objective.lagrange_terms == 1;
        if !exact || !single_term {
            return Err(GeneratorError::InvalidObjectiveForExport(format!(
                "Objectives with Mayer or Lagrange terms need the exact Hessian and exactly one \
                 Mayer or one Lagrange term (hessian_approximation = {}, mayer = {}, lagrange = {})",
                options.hessian_approximation, objective.mayer_terms, objective.lagrange_terms
            )));
        }
    }

    if ocp.model.nui > 0 {
        return Err(GeneratorError::InvalidArguments(format!(
            "Uncontrolled inputs are not supported for code export, got {}",
            ocp.model.nui
        )));
    }

    if ocp.np() > 0 {
        return Err(GeneratorError::InvalidArguments(format!(
            "Free parameters are not supported for code export, got {}. \
             Use online data instead and set their values at run time",
            ocp.np()
        )));
    }

    if !matches!(
        options.hessian_approximation,
        HessianApproximation::GaussNewton | HessianApproximation::ExactHessian
    ) {
        return Err(GeneratorError::InvalidOption(format!(
            "hessian_approximation = {} is not supported, use gauss_newton or exact_hessian",
            options.hessian_approximation
        )));
    }

    if !matches!(
        options.discretization_type,
        DiscretizationType::SingleShooting | DiscretizationType::MultipleShooting
    ) {
        return Err(GeneratorError::InvalidOption(format!(
            "discretization_type = {} is not supported, use single_shooting or multiple_shooting",
            options.discretization_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dimensions, LeastSquaresTerm, Objective, WeightingMatricesType};
    use test_case::test_case;

    fn ocp() -> Ocp {
        Ocp::new(
            20,
            Dimensions {
                nx: 4,
                nu: 1,
                ..Dimensions::default()
            },
        )
        .with_objective(Objective {
            least_squares: Some(LeastSquaresTerm {
                ny: 5,
                weighting: WeightingMatricesType::Once,
            }),
            ..Objective::default()
        })
    }

    #[test]
    fn test_least_squares_problem_is_consistent() {
        assert!(check_consistency(&ocp(), &ExportOptions::default()).is_ok());
    }

    #[test_case(1, 0, true ; "one mayer term")]
    #[test_case(0, 1, true ; "one lagrange term")]
    #[test_case(1, 1, true ; "one of each")]
    #[test_case(2, 0, false ; "two mayer terms")]
    #[test_case(2, 2, false ; "two of each")]
    fn test_general_objective_with_exact_hessian(mayer: usize, lagrange: usize, ok: bool) {
        let mut problem = ocp();
        problem.objective.mayer_terms = mayer;
        problem.objective.lagrange_terms = lagrange;
        let options = ExportOptions {
            hessian_approximation: HessianApproximation::ExactHessian,
            ..ExportOptions::default()
        };

        let result = check_consistency(&problem, &options);
        if ok {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(GeneratorError::InvalidObjectiveForExport(_))));
        }
    }

    #[test]
    fn test_general_objective_needs_exact_hessian() {
        let mut problem = ocp();
        problem.objective.lagrange_terms = 1;
        let result = check_consistency(&problem, &ExportOptions::default());
        assert!(matches!(result, Err(GeneratorError::InvalidObjectiveForExport(_))));
    }

    #[test]
    fn test_uncontrolled_inputs_rejected() {
        let mut problem = ocp();
        problem.model.nui = 1;
        let result = check_consistency(&problem, &ExportOptions::default());
        assert!(matches!(result, Err(GeneratorError::InvalidArguments(_))));
    }

    #[test]
    fn test_free_parameters_rejected_with_hint() {
        let mut problem = ocp();
        problem.model.np = 2;
        let err = check_consistency(&problem, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidArguments(_)));
        assert!(err.to_string().contains("online data"));
    }

    #[test_case(HessianApproximation::ConstantHessian)]
    #[test_case(HessianApproximation::FullBfgsUpdate)]
    #[test_case(HessianApproximation::BlockBfgsUpdate)]
    #[test_case(HessianApproximation::GaussNewtonWithBlockBfgs)]
    fn test_unsupported_hessian_modes(mode: HessianApproximation) {
        let options = ExportOptions {
            hessian_approximation: mode,
            ..ExportOptions::default()
        };
        let result = check_consistency(&ocp(), &options);
        assert!(matches!(result, Err(GeneratorError::InvalidOption(_))));
    }

    #[test]
    fn test_collocation_rejected() {
        let options = ExportOptions {
            discretization_type: DiscretizationType::Collocation,
            ..ExportOptions::default()
        };
        let result = check_consistency(&ocp(), &options);
        assert!(matches!(result, Err(GeneratorError::InvalidOption(_))));
    }

    #[test]
    fn test_single_shooting_accepted() {
        let options = ExportOptions {
            discretization_type: DiscretizationType::SingleShooting,
            ..ExportOptions::default()
        };
        assert!(check_consistency(&ocp(), &options).is_ok());
    }
}
