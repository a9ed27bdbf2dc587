//! Export session and component resolution
//!
//! A session starts `NotInitialized`. [`ExportSession::setup`] validates the
//! problem, binds one integrator and one solver and commits the resulting
//! [`ResolvedPlan`] in a single step; only then is the session `Ready`. A
//! failed setup leaves the session untouched.

use crate::adapters::integrator::IntegratorRegistry;
use crate::adapters::solver::{create_solver, select_solver};
use crate::config::ExportOptions;
use crate::core::export::reporter::Reporter;
use crate::core::resolve::plan::{ResolvedPlan, SharedConstants};
use crate::core::validation::check_consistency;
use crate::domain::{Ocp, Result};
use serde::Serialize;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// No plan resolved yet
    NotInitialized,
    /// Plan resolved and immutable
    Ready,
}

/// One export session: an OCP, its options and the resolved plan
#[derive(Debug, Clone)]
pub struct ExportSession {
    ocp: Ocp,
    options: ExportOptions,
    registry: IntegratorRegistry,
    plan: Option<ResolvedPlan>,
}

impl ExportSession {
    /// Session using the built-in integrators
    pub fn new(ocp: Ocp, options: ExportOptions) -> Self {
        Self::with_registry(ocp, options, IntegratorRegistry::builtin())
    }

    /// Session using a custom integrator registry
    pub fn with_registry(ocp: Ocp, options: ExportOptions, registry: IntegratorRegistry) -> Self {
        Self {
            ocp,
            options,
            registry,
            plan: None,
        }
    }

    /// Problem of this session
    pub fn ocp(&self) -> &Ocp {
        &self.ocp
    }

    /// Options of this session
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Current status
    pub fn status(&self) -> SessionStatus {
        if self.plan.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::NotInitialized
        }
    }

    /// Resolved plan, if the session is ready
    pub fn plan(&self) -> Option<&ResolvedPlan> {
        self.plan.as_ref()
    }

    /// Resolves the plan; a ready session returns its plan without further work
    ///
    /// # Errors
    ///
    /// Returns the first validation, resolution or collaborator setup error
    pub fn setup(&mut self) -> Result<&ResolvedPlan> {
        let plan = match self.plan.take() {
            Some(plan) => plan,
            None => resolve(&self.ocp, &self.options, &self.registry)?,
        };
        Ok(&*self.plan.insert(plan))
    }

    /// Reports the QP dimensions of a ready session; does nothing otherwise
    pub fn print_dimensions_qp(&self, reporter: &dyn Reporter) {
        if let Some(plan) = &self.plan {
            let constants = plan.constants();
            reporter.info(&format!(
                "Code generation dimensions:\n\t* Number of QP variables: {}\n\t* Number of path and point constraints: {}",
                constants.qp_nv, constants.complex_constraints
            ));
        }
    }
}

fn resolve(ocp: &Ocp, options: &ExportOptions, registry: &IntegratorRegistry) -> Result<ResolvedPlan> {
    check_consistency(ocp, options)?;

    let mut integrator =
        registry.create(options.integrator_type, &options.module_name, options.linear_solver)?;
    integrator.set_model_data(ocp, options.integrator_steps(ocp.horizon))?;

    let kind = select_solver(
        options.qp_solver,
        options.sparse_qp_solution,
        options.hessian_approximation,
    )?;
    let mut solver = create_solver(kind, options);
    solver.set_dimensions(ocp.horizon, ocp.dimensions, ocp.np());
    solver.attach_integrator(integrator.link()?);
    solver.set_objective(&ocp.objective)?;
    solver.set_constraints(ocp.constraints);
    solver.set_levenberg_marquardt(options.levenberg_marquardt);
    solver.setup()?;

    let constants = SharedConstants::collect(ocp, options, &integrator, &solver);
    tracing::info!(
        module = %options.module_name,
        integrator = %integrator.scheme(),
        solver = %solver.kind(),
        qp_variables = constants.qp_nv,
        "Export plan resolved"
    );
    Ok(ResolvedPlan::new(integrator, solver, constants))
}
