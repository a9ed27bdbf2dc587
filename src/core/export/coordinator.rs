//! Export coordinator - main orchestrator for the export process
//!
//! This module sequences one export: it creates the destination directory,
//! resolves the session plan, synthesizes the common header, lets the
//! integrator and solver emit their sources and then copies the template
//! artifacts selected by the options. The first fatal error aborts the
//! sequence; files already written stay in place.

use crate::adapters::traits::CodeExporter;
use crate::codegen::ExportFile;
use crate::config::{ExportOptions, HessianApproximation, QpSolver, SparseQpSolution};
use crate::core::export::header::CommonHeader;
use crate::core::export::reporter::{Reporter, TracingReporter};
use crate::core::export::summary::{ArtifactKind, ExportSummary};
use crate::core::resolve::{ExportSession, ResolvedPlan};
use crate::core::templates::{
    module_substitutions, AuxiliaryFunctions, HessianRegularization, SimulinkInterface,
    TemplateEmitter, TemplateKey, DEFAULT_REGULARIZATION_FLOOR,
};
use crate::domain::{GeneratorError, ModuleName, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    session: ExportSession,
    emitter: TemplateEmitter,
    reporter: Box<dyn Reporter>,
}

impl ExportCoordinator {
    /// Create a coordinator reporting through `tracing`
    ///
    /// # Errors
    ///
    /// Returns an error if the template emitter cannot be created
    pub fn new(session: ExportSession) -> Result<Self> {
        Self::with_reporter(session, Box::new(TracingReporter))
    }

    /// Create a coordinator with a custom reporter
    ///
    /// # Errors
    ///
    /// Returns an error if the template emitter cannot be created
    pub fn with_reporter(session: ExportSession, reporter: Box<dyn Reporter>) -> Result<Self> {
        Ok(Self {
            session,
            emitter: TemplateEmitter::new()?,
            reporter,
        })
    }

    /// The export session
    pub fn session(&self) -> &ExportSession {
        &self.session
    }

    /// Exports the complete solver package into `dir`
    ///
    /// Configuration, validation and resolution errors are returned as they
    /// are; failures while producing an artifact are wrapped into
    /// `UnableToExport` naming that artifact.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the sequence
    pub fn export_code(
        &mut self,
        dir: &Path,
        real_type: &str,
        int_type: &str,
        precision: usize,
    ) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let Self {
            session,
            emitter,
            reporter,
        } = self;
        let options = session.options().clone();

        reporter.banner("ocpgen - code generation of real-time optimal control solvers");
        tracing::info!(
            module = %options.module_name,
            dir = %dir.display(),
            "Starting code export"
        );

        fs::create_dir_all(dir)
            .map_err(|e| GeneratorError::from(e).while_exporting(dir.display().to_string()))?;

        session.setup()?;
        session.print_dimensions_qp(&**reporter);
        let plan = session.plan().ok_or_else(|| {
            GeneratorError::InvalidArguments("Export session is not ready after setup".to_string())
        })?;

        let mut run = ExportRun {
            dir,
            plan,
            options: &options,
            emitter,
            reporter: &**reporter,
            real_type,
            int_type,
            precision,
            summary: ExportSummary::new(options.module_name.clone()),
        };

        run.common_header()?;
        run.collaborator_sources()?;
        run.auxiliary_functions()?;
        if options.generate_makefile {
            run.makefile()?;
        }
        if options.generate_test_file {
            run.test_file()?;
        }
        if options.generate_matlab_interface {
            run.mex_interface()?;
        }
        if options.generate_simulink_interface {
            run.simulink_interface()?;
        }
        if options.hessian_approximation == HessianApproximation::ExactHessian {
            run.hessian_regularization()?;
        }

        let summary = run.summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

/// State of one `export_code` call
struct ExportRun<'a> {
    dir: &'a Path,
    plan: &'a ResolvedPlan,
    options: &'a ExportOptions,
    emitter: &'a TemplateEmitter,
    reporter: &'a dyn Reporter,
    real_type: &'a str,
    int_type: &'a str,
    precision: usize,
    summary: ExportSummary,
}

impl ExportRun<'_> {
    fn module(&self) -> &ModuleName {
        &self.options.module_name
    }

    fn warn(&mut self, message: String) {
        self.reporter.warning(&message);
        self.summary.add_warning(message);
    }

    /// Records `path`, wrapping failures as failures of `path`
    fn record(&mut self, kind: ArtifactKind, path: PathBuf) -> Result<()> {
        let name = file_name(&path);
        self.summary
            .record(kind, path)
            .map_err(|e| e.while_exporting(name))
    }

    fn copy_template(&mut self, kind: ArtifactKind, key: TemplateKey, path: PathBuf, comment_token: &str) -> Result<()> {
        let substitutions = module_substitutions(self.module());
        self.emitter
            .copy(key, &path, comment_token, true, &substitutions)
            .map_err(|e| e.while_exporting(file_name(&path)))?;
        self.record(kind, path)
    }

    fn common_header(&mut self) -> Result<()> {
        let path = self.dir.join(self.module().common_header());
        CommonHeader::new(self.plan, self.real_type, self.int_type)
            .export(&path)
            .map_err(|e| e.while_exporting(file_name(&path)))?;
        self.record(ArtifactKind::CommonHeader, path)
    }

    fn collaborator_sources(&mut self) -> Result<()> {
        let plan = self.plan;
        let sources: [(ArtifactKind, &str, &dyn CodeExporter); 2] = [
            (ArtifactKind::IntegratorSource, "integrator", plan.integrator() as &dyn CodeExporter),
            (ArtifactKind::SolverSource, "solver", plan.solver() as &dyn CodeExporter),
        ];

        for (kind, role, collaborator) in sources {
            let path = self.dir.join(self.module().file_name(role, "c"));
            let mut file = ExportFile::new(
                &path,
                self.module().common_header(),
                self.real_type,
                self.int_type,
                self.precision,
            );
            collaborator
                .emit_body(&mut file)
                .and_then(|()| file.export())
                .map_err(|e| e.while_exporting(file_name(&path)))?;
            self.record(kind, path)?;
        }
        Ok(())
    }

    fn auxiliary_functions(&mut self) -> Result<()> {
        let auxiliary = AuxiliaryFunctions::new(self.dir, self.module());
        let paths = auxiliary
            .export(self.emitter)
            .map_err(|e| e.while_exporting(self.module().file_name("auxiliary_functions", "c")))?;
        for path in paths {
            self.record(ArtifactKind::AuxiliaryFunctions, path)?;
        }
        Ok(())
    }

    fn makefile(&mut self) -> Result<()> {
        let exact = self.options.hessian_approximation == HessianApproximation::ExactHessian;
        let key = match (self.options.qp_solver, exact) {
            (QpSolver::QpOases, true) => TemplateKey::MakefileEhQpOases,
            (QpSolver::QpOases, false) => TemplateKey::MakefileQpOases,
            (QpSolver::Forces, _) => TemplateKey::MakefileForces,
            (QpSolver::QpDunes, true) => TemplateKey::MakefileEhQpDunes,
            (QpSolver::QpDunes, false) => TemplateKey::MakefileQpDunes,
            (QpSolver::Hpmpc, _) => TemplateKey::MakefileHpmpc,
        };
        self.copy_template(ArtifactKind::Makefile, key, self.dir.join("Makefile"), "#")
    }

    fn test_file(&mut self) -> Result<()> {
        self.copy_template(ArtifactKind::TestFile, TemplateKey::TestMain, self.dir.join("test.c"), "")
    }

    fn mex_interface(&mut self) -> Result<()> {
        let wrapper = self.dir.join(self.module().file_name("solver_mex", "c"));
        if !self.options.hardcode_constraint_values {
            return Err(GeneratorError::NotImplemented(
                "MATLAB interface with constraint values that are not hard-coded".to_string(),
            )
            .while_exporting(file_name(&wrapper)));
        }

        let exact = self.options.hessian_approximation == HessianApproximation::ExactHessian;
        let wrapper_key = if exact {
            TemplateKey::EhSolverMex
        } else {
            TemplateKey::SolverMex
        };
        self.copy_template(ArtifactKind::MexInterface, wrapper_key, wrapper, "")?;

        let script_key = match self.options.qp_solver {
            QpSolver::QpOases if exact => Some(TemplateKey::MakeMexEhQpOases),
            QpSolver::QpOases => Some(TemplateKey::MakeMexQpOases),
            QpSolver::Forces => Some(TemplateKey::MakeMexForces),
            QpSolver::QpDunes if exact => Some(TemplateKey::MakeMexEhQpDunes),
            QpSolver::QpDunes
                if self.options.sparse_qp_solution == SparseQpSolution::BlockCondensingN2 =>
            {
                Some(TemplateKey::MakeMexBlockQpDunes)
            }
            QpSolver::QpDunes => Some(TemplateKey::MakeMexQpDunes),
            QpSolver::Hpmpc => None,
        };

        match script_key {
            Some(key) => {
                let script = self.dir.join(format!("make_{}_solver.m", self.module()));
                self.copy_template(ArtifactKind::MexInterface, key, script, "%")
            }
            None => {
                self.warn(format!(
                    "MEX build script is not available for {}; the wrapper source was exported without it",
                    self.options.qp_solver
                ));
                Ok(())
            }
        }
    }

    fn simulink_interface(&mut self) -> Result<()> {
        let qp_solver = self.options.qp_solver;
        if !SimulinkInterface::supports(qp_solver) {
            self.warn(format!(
                "The Simulink interface is available only with qpOASES and qpDUNES based solvers, skipped for {qp_solver}"
            ));
            return Ok(());
        }

        let artifact = self.module().file_name("solver_sfunction", "c");
        let interface = SimulinkInterface::configure(self.dir, self.plan.constants())
            .map_err(|e| e.while_exporting(artifact.as_str()))?;
        let paths = interface
            .export(self.emitter)
            .map_err(|e| e.while_exporting(artifact.as_str()))?;
        for path in paths {
            self.record(ArtifactKind::SimulinkInterface, path)?;
        }
        Ok(())
    }

    fn hessian_regularization(&mut self) -> Result<()> {
        let dims = self.plan.constants().dimensions;
        let regularization = HessianRegularization::new(self.dir, self.module())
            .configure(dims.nx + dims.nu, DEFAULT_REGULARIZATION_FLOOR);
        regularization
            .export(self.emitter)
            .map_err(|e| e.while_exporting(file_name(regularization.path())))?;
        self.record(ArtifactKind::HessianRegularization, regularization.path().to_path_buf())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dimensions, LeastSquaresTerm, Objective, Ocp, WeightingMatricesType};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Reporter for Recorder {
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

    fn export(options: ExportOptions, dir: &Path) -> (Result<ExportSummary>, Vec<String>) {
        let recorder = Recorder::default();
        let mut coordinator =
            ExportCoordinator::with_reporter(ExportSession::new(ocp(), options), Box::new(recorder.clone()))
                .unwrap();
        let result = coordinator.export_code(dir, "real_t", "int", 16);
        let warnings = recorder.0.borrow().clone();
        (result, warnings)
    }

    #[test]
    fn test_default_export_writes_core_artifacts() {
        let dir = TempDir::new().unwrap();
        let (result, warnings) = export(ExportOptions::default(), dir.path());
        let summary = result.unwrap();

        for name in [
            "acado_common.h",
            "acado_integrator.c",
            "acado_solver.c",
            "acado_auxiliary_functions.h",
            "acado_auxiliary_functions.c",
            "Makefile",
            "test.c",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
            assert!(summary.contains_path(&dir.path().join(name)));
        }
        assert!(!dir.path().join("acado_hessian_regularization.c").exists());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_hpmpc_mex_script_warns() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions {
            qp_solver: QpSolver::Hpmpc,
            sparse_qp_solution: SparseQpSolution::SparseSolver,
            generate_matlab_interface: true,
            ..ExportOptions::default()
        };
        let (result, warnings) = export(options, dir.path());
        let summary = result.unwrap();

        assert!(dir.path().join("acado_solver_mex.c").exists());
        assert!(!dir.path().join("make_acado_solver.m").exists());
        assert_eq!(warnings.len(), 1);
        assert_eq!(summary.warnings, warnings);
    }

    #[test]
    fn test_block_condensing_mex_script() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions {
            qp_solver: QpSolver::QpDunes,
            sparse_qp_solution: SparseQpSolution::BlockCondensingN2,
            condensing_block_size: 5,
            generate_matlab_interface: true,
            ..ExportOptions::default()
        };
        let (result, _) = export(options, dir.path());
        result.unwrap();

        let script = fs::read_to_string(dir.path().join("make_acado_solver.m")).unwrap();
        assert!(script.starts_with("% This file was auto-generated"));
        assert!(script.contains("-D__BLOCK_CONDENSING__"));
    }

    #[test]
    fn test_directory_creation_failure_is_wrapped() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let (result, _) = export(ExportOptions::default(), &blocker.join("out"));
        let err = result.unwrap_err();
        assert!(matches!(err, GeneratorError::UnableToExport { .. }));
        assert!(matches!(err.root_cause(), GeneratorError::Io(_)));
    }
}
