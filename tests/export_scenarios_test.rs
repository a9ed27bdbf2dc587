//! End-to-end exports of small problems into temporary directories

use ocpgen::config::{
    DiscretizationType, ExportOptions, HessianApproximation, QpSolver, SparseQpSolution,
};
use ocpgen::core::export::{ArtifactKind, ExportCoordinator, ExportSummary, Reporter};
use ocpgen::core::resolve::{ExportSession, SessionStatus};
use ocpgen::core::verification::verify_artifacts;
use ocpgen::domain::{
    Dimensions, GeneratorError, LeastSquaresTerm, Objective, Ocp, Result, WeightingMatricesType,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Default, Clone)]
struct Warnings(Rc<RefCell<Vec<String>>>);

impl Reporter for Warnings {
    fn banner(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warning(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

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
        terminal_least_squares: Some(LeastSquaresTerm {
            ny: 4,
            weighting: WeightingMatricesType::Once,
        }),
        ..Objective::default()
    })
}

fn export(ocp: Ocp, options: ExportOptions, dir: &Path) -> (Result<ExportSummary>, Vec<String>) {
    let warnings = Warnings::default();
    let mut coordinator =
        ExportCoordinator::with_reporter(ExportSession::new(ocp, options), Box::new(warnings.clone()))
            .unwrap();
    let result = coordinator.export_code(dir, "real_t", "int", 16);
    let collected = warnings.0.borrow().clone();
    (result, collected)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_single_shooting_full_condensing_export() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        discretization_type: DiscretizationType::SingleShooting,
        sparse_qp_solution: SparseQpSolution::FullCondensing,
        ..ExportOptions::default()
    };

    let (result, warnings) = export(ocp(), options, dir.path());
    let summary = result.unwrap();

    let header = fs::read_to_string(dir.path().join("acado_common.h")).unwrap();
    assert!(header.contains("#define ACADO_N 20\n"));
    assert!(header.contains("#define ACADO_NX 4\n"));
    assert!(header.contains("#define ACADO_NU 1\n"));
    assert!(!dir.path().join("acado_hessian_regularization.c").exists());
    assert_eq!(summary.artifacts_of(ArtifactKind::HessianRegularization).count(), 0);
    assert!(warnings.is_empty());
    assert!(verify_artifacts(&summary).is_success());
}

#[test]
fn test_two_mayer_terms_fail_validation_before_sources() {
    let dir = TempDir::new().unwrap();
    let mut problem = ocp();
    problem.objective.mayer_terms = 2;
    let options = ExportOptions {
        hessian_approximation: HessianApproximation::ExactHessian,
        ..ExportOptions::default()
    };

    let (result, _) = export(problem, options, dir.path());
    assert!(matches!(result, Err(GeneratorError::InvalidObjectiveForExport(_))));
    assert!(!dir.path().join("acado_integrator.c").exists());
    assert!(!dir.path().join("acado_solver.c").exists());
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn test_forces_with_full_condensing_is_rejected() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        qp_solver: QpSolver::Forces,
        sparse_qp_solution: SparseQpSolution::FullCondensing,
        ..ExportOptions::default()
    };

    let (result, _) = export(ocp(), options, dir.path());
    match result {
        Err(GeneratorError::InvalidArguments(message)) => {
            assert!(message.contains("only supported with qpOASES"));
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn test_matlab_interface_needs_hardcoded_constraints() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        generate_matlab_interface: true,
        hardcode_constraint_values: false,
        ..ExportOptions::default()
    };

    let (result, _) = export(ocp(), options, dir.path());
    let err = result.unwrap_err();
    assert!(matches!(err, GeneratorError::UnableToExport { .. }));
    assert!(matches!(err.root_cause(), GeneratorError::NotImplemented(_)));

    let names = file_names(dir.path());
    assert!(names.iter().all(|name| !name.contains("mex") && !name.ends_with(".m")));
    assert!(names.contains(&"acado_solver.c".to_string()));
}

#[test]
fn test_simulink_with_forces_is_skipped_with_warning() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        qp_solver: QpSolver::Forces,
        sparse_qp_solution: SparseQpSolution::SparseSolver,
        generate_simulink_interface: true,
        ..ExportOptions::default()
    };

    let (result, warnings) = export(ocp(), options, dir.path());
    let summary = result.unwrap();

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Simulink"));
    assert_eq!(summary.warnings, warnings);
    assert!(!dir.path().join("acado_solver_sfunction.c").exists());
    assert!(!dir.path().join("acado_solver_sfunction.h").exists());
    assert!(dir.path().join("acado_solver.c").exists());
    assert!(dir.path().join("Makefile").exists());

    let header = fs::read_to_string(dir.path().join("acado_common.h")).unwrap();
    assert!(header.contains("ACADO_QP_NLB"));
    assert!(header.contains("ACADO_QP_NUB"));
}

#[test]
fn test_simulink_hardcode_failure_writes_no_wrapper() {
    for qp_solver in [QpSolver::QpOases, QpSolver::QpDunes] {
        let dir = TempDir::new().unwrap();
        let sparse_qp_solution = if qp_solver == QpSolver::QpDunes {
            SparseQpSolution::SparseSolver
        } else {
            SparseQpSolution::FullCondensingN2
        };
        let options = ExportOptions {
            qp_solver,
            sparse_qp_solution,
            generate_simulink_interface: true,
            hardcode_constraint_values: false,
            ..ExportOptions::default()
        };

        let (result, _) = export(ocp(), options, dir.path());
        let err = result.unwrap_err();
        assert!(matches!(err.root_cause(), GeneratorError::NotImplemented(_)));
        assert!(file_names(dir.path()).iter().all(|name| !name.contains("sfunction")));
    }
}

#[test]
fn test_simulink_interface_for_qpoases() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        generate_simulink_interface: true,
        fix_initial_state: false,
        ..ExportOptions::default()
    };

    let (result, warnings) = export(ocp(), options, dir.path());
    let summary = result.unwrap();
    assert!(warnings.is_empty());
    assert_eq!(summary.artifacts_of(ArtifactKind::SimulinkInterface).count(), 3);

    let header = fs::read_to_string(dir.path().join("acado_solver_sfunction.h")).unwrap();
    assert!(!header.contains('@'));
    let script = fs::read_to_string(dir.path().join("make_acado_solver_sfunction.m")).unwrap();
    assert!(script.starts_with('%'));
    assert!(script.contains("QPOASES"));
}

#[test]
fn test_hessian_regularization_iff_exact_hessian() {
    for (hessian, expected) in [
        (HessianApproximation::GaussNewton, false),
        (HessianApproximation::ExactHessian, true),
    ] {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions {
            hessian_approximation: hessian,
            ..ExportOptions::default()
        };

        let (result, _) = export(ocp(), options, dir.path());
        let summary = result.unwrap();
        let path = dir.path().join("acado_hessian_regularization.c");
        assert_eq!(path.exists(), expected);
        assert_eq!(
            summary.artifacts_of(ArtifactKind::HessianRegularization).count(),
            usize::from(expected)
        );

        if expected {
            let source = fs::read_to_string(&path).unwrap();
            assert!(source.contains("#define ACADO_HESSIAN_DIM 5\n"));
            assert!(source.contains("#define ACADO_REGULARIZATION_FLOOR 1e-12\n"));
        }
    }
}

#[test]
fn test_exports_are_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let options = ExportOptions {
        generate_matlab_interface: true,
        ..ExportOptions::default()
    };

    export(ocp(), options.clone(), first.path()).0.unwrap();
    export(ocp(), options, second.path()).0.unwrap();

    assert_eq!(file_names(first.path()), file_names(second.path()));
    for name in file_names(first.path()) {
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap(),
            "{name} differs between exports"
        );
    }
}

#[test]
fn test_custom_module_name() {
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        module_name: "quadrotor".parse().unwrap(),
        generate_matlab_interface: true,
        ..ExportOptions::default()
    };

    let (result, _) = export(ocp(), options, dir.path());
    result.unwrap();

    for name in [
        "quadrotor_common.h",
        "quadrotor_integrator.c",
        "quadrotor_solver.c",
        "quadrotor_solver_mex.c",
        "make_quadrotor_solver.m",
    ] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
    let header = fs::read_to_string(dir.path().join("quadrotor_common.h")).unwrap();
    assert!(header.contains("#define ACADO_N 20\n"));
    assert!(!header.contains("QUADROTOR_N "));
    assert!(header.contains("QUADROTORworkspace"));
    let mex = fs::read_to_string(dir.path().join("quadrotor_solver_mex.c")).unwrap();
    assert!(mex.contains("ACADO_NX"));
    let test_main = fs::read_to_string(dir.path().join("test.c")).unwrap();
    assert!(test_main.contains("quadrotor_common.h"));
}

#[test]
fn test_session_is_ready_after_export() {
    let dir = TempDir::new().unwrap();
    let mut coordinator =
        ExportCoordinator::new(ExportSession::new(ocp(), ExportOptions::default())).unwrap();
    assert_eq!(coordinator.session().status(), SessionStatus::NotInitialized);

    coordinator
        .export_code(dir.path(), "real_t", "int", 16)
        .unwrap();
    assert_eq!(coordinator.session().status(), SessionStatus::Ready);
}
