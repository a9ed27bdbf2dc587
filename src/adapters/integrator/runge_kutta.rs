//! Runge-Kutta integrator export
//!
//! The generated integrator propagates the augmented state vector `rk_eta`
//! over one shooting interval. Its layout is
//!
//! ```text
//! | x (NXI) | dx/dx0 (NXI x NX) | dx/du (NXI x NU) | u (NU) | od (NOD) |
//! ```
//!
//! where `NXI = NX + NXA`. The externally provided right-hand side evaluates
//! the states together with their forward sensitivities. Implicit schemes
//! solve the stage equations with a simplified Newton method whose Jacobian
//! is frozen at the start of each step.

use crate::adapters::integrator::linear_solver::GaussElimination;
use crate::adapters::integrator::tableau::ButcherTableau;
use crate::adapters::traits::CodeExporter;
use crate::codegen::{
    DataStruct, Declaration, ExportFile, FunctionDeclaration, Parameter, ScalarType,
};
use crate::config::{IntegratorType, LinearSolver};
use crate::domain::{Dimensions, GeneratorError, ModuleName, Ocp, Result};
use serde::Serialize;

const NEWTON_ITERATIONS: usize = 3;

/// What the solver needs to know about the integrator it calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegratorLink {
    /// Name of the generated integration function
    pub integrate_function: String,
    /// Whether the function takes the shooting interval index
    pub takes_interval_index: bool,
    /// Number of Runge-Kutta stages
    pub stages: usize,
    /// Integrator steps per shooting interval
    pub steps_per_interval: usize,
    /// Length of the integrated part of `rk_eta`
    pub integrated_len: usize,
    /// Total length of `rk_eta`
    pub eta_len: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum StepSize {
    Uniform(f64),
    PerInterval(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
struct ModelSetup {
    dims: Dimensions,
    rhs: String,
    discretized: bool,
    steps_per_interval: usize,
    step_size: StepSize,
}

impl ModelSetup {
    fn nxi(&self) -> usize {
        self.dims.nx + self.dims.nxa
    }

    fn integrated_len(&self) -> usize {
        self.nxi() * (1 + self.dims.nx + self.dims.nu)
    }

    fn eta_len(&self) -> usize {
        self.integrated_len() + self.dims.nu + self.dims.nod
    }
}

/// Runge-Kutta integrator collaborator
#[derive(Debug, Clone)]
pub struct RungeKuttaExport {
    scheme: IntegratorType,
    tableau: ButcherTableau,
    module: ModuleName,
    linear_solver: LinearSolver,
    model: Option<ModelSetup>,
}

impl RungeKuttaExport {
    /// Integrator of `scheme` with its standard tableau
    pub fn new(scheme: IntegratorType, module: &ModuleName, linear_solver: LinearSolver) -> Self {
        Self {
            scheme,
            tableau: ButcherTableau::for_scheme(scheme),
            module: module.clone(),
            linear_solver,
            model: None,
        }
    }

    /// Scheme of this integrator
    pub fn scheme(&self) -> IntegratorType {
        self.scheme
    }

    /// Number of stages of the scheme
    pub fn stage_count(&self) -> usize {
        self.tableau.stages()
    }

    /// Whether the generated code needs complex arithmetic
    pub fn uses_complex_arithmetic(&self) -> bool {
        self.linear_solver.uses_complex_arithmetic()
    }

    /// Binds the integrator to the model of `ocp`, using `total_steps` steps over the horizon
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` if the step count, the model or the linear
    /// solver cannot be handled by this scheme
    pub fn set_model_data(&mut self, ocp: &Ocp, total_steps: usize) -> Result<()> {
        let horizon = ocp.horizon;
        let dims = ocp.dimensions;

        if horizon == 0 {
            return Err(GeneratorError::InvalidArguments(
                "The horizon must contain at least one shooting interval".to_string(),
            ));
        }
        if total_steps < horizon {
            return Err(GeneratorError::InvalidOption(format!(
                "num_integrator_steps must be at least the horizon length {horizon}, got {total_steps}"
            )));
        }
        if total_steps % horizon != 0 {
            return Err(GeneratorError::InvalidOption(format!(
                "num_integrator_steps ({total_steps}) must be a multiple of the horizon length {horizon}"
            )));
        }
        let steps_per_interval = total_steps / horizon;

        if !self.scheme.is_implicit() && (dims.nxa > 0 || dims.ndx > 0) {
            return Err(GeneratorError::InvalidOption(format!(
                "Explicit integrator {} cannot handle algebraic states or implicit models",
                self.scheme
            )));
        }

        if self.linear_solver == LinearSolver::SimplifiedIrkNewton
            && !(self.scheme.is_implicit() && self.stage_count() == 3)
        {
            return Err(GeneratorError::InvalidOption(format!(
                "Linear solver {} requires a 3-stage implicit integrator, got {}",
                self.linear_solver, self.scheme
            )));
        }

        if ocp.model.discretized && steps_per_interval != 1 {
            return Err(GeneratorError::InvalidOption(
                "A discretized model allows exactly one integrator step per shooting interval"
                    .to_string(),
            ));
        }

        let step_size = match ocp.grid.points.as_deref() {
            Some(points) if !ocp.has_equidistant_control_grid() => StepSize::PerInterval(
                points
                    .windows(2)
                    .map(|w| (w[1] - w[0]) / steps_per_interval as f64)
                    .collect(),
            ),
            Some([first, .., last]) => StepSize::Uniform((last - first) / total_steps as f64),
            _ => StepSize::Uniform((ocp.grid.end - ocp.grid.start) / total_steps as f64),
        };

        tracing::debug!(
            scheme = %self.scheme,
            stages = self.stage_count(),
            steps_per_interval,
            "Integrator bound to model"
        );

        self.model = Some(ModelSetup {
            dims,
            rhs: ocp.model.rhs_function.clone(),
            discretized: ocp.model.discretized,
            steps_per_interval,
            step_size,
        });
        Ok(())
    }

    /// Interface description for the solver
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if no model was bound yet
    pub fn link(&self) -> Result<IntegratorLink> {
        let model = self.model()?;
        Ok(IntegratorLink {
            integrate_function: self.integrate_name(),
            takes_interval_index: matches!(model.step_size, StepSize::PerInterval(_)),
            stages: self.stage_count(),
            steps_per_interval: model.steps_per_interval,
            integrated_len: model.integrated_len(),
            eta_len: model.eta_len(),
        })
    }

    /// Integrator steps per shooting interval, once a model is bound
    pub fn steps_per_interval(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.steps_per_interval)
    }

    fn model(&self) -> Result<&ModelSetup> {
        self.model.as_ref().ok_or_else(|| {
            GeneratorError::InvalidArguments(format!(
                "Integrator {} used before model data was set",
                self.scheme
            ))
        })
    }

    fn integrate_name(&self) -> String {
        format!("{}_integrate", self.module)
    }

    fn newton_system(&self, model: &ModelSetup) -> Option<GaussElimination> {
        (self.scheme.is_implicit() && !model.discretized).then(|| {
            GaussElimination::new(
                self.module.as_str(),
                self.stage_count() * model.integrated_len(),
            )
        })
    }

    fn integrate_declaration(&self, model: &ModelSetup) -> FunctionDeclaration {
        let mut decl = FunctionDeclaration::new(self.integrate_name(), ScalarType::Int)
            .param(Parameter::real_out("rk_eta"))
            .param(Parameter::int_value("resetIntegrator"));
        if matches!(model.step_size, StepSize::PerInterval(_)) {
            decl = decl.param(Parameter::int_value("rk_index"));
        }
        decl.described("Integrates the augmented state over one shooting interval.")
    }

    fn model_function(name: String) -> FunctionDeclaration {
        FunctionDeclaration::new(name, ScalarType::Void)
            .param(Parameter::real_in("in"))
            .param(Parameter::real_out("out"))
    }

    fn emit_constants(&self, model: &ModelSetup, file: &mut ExportFile) {
        let m = &self.module;
        let list = |values: &[f64], file: &ExportFile| {
            values
                .iter()
                .map(|v| file.real_literal(*v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let real = file.real_type().to_string();
        let s = self.stage_count();

        let a: Vec<f64> = self.tableau.a.iter().flatten().copied().collect();
        let a_line = format!("static const {real} {m}_rk_tableau_A[ {} ] = {{ {} }};", s * s, list(&a, file));
        let b_line = format!("static const {real} {m}_rk_tableau_b[ {s} ] = {{ {} }};", list(&self.tableau.b, file));
        file.add_comment(format!("Butcher tableau of the {} scheme", self.scheme));
        file.add_line(a_line);
        file.add_line(b_line);

        let h_line = match &model.step_size {
            StepSize::Uniform(h) => format!("static const {real} {m}_rk_h = {};", file.real_literal(*h)),
            StepSize::PerInterval(h) => format!(
                "static const {real} {m}_rk_h[ {} ] = {{ {} }};",
                h.len(),
                list(h, file)
            ),
        };
        file.add_line(h_line);
        file.add_blank();
    }

    fn prologue(&self, model: &ModelSetup, real: &str) -> Vec<String> {
        let m = &self.module;
        let w = DataStruct::Workspace.instance_name(m);
        let ni = model.integrated_len();
        let nxi = model.nxi();
        let inputs = model.dims.nu + model.dims.nod;
        let h = match model.step_size {
            StepSize::Uniform(_) => format!("{m}_rk_h"),
            StepSize::PerInterval(_) => format!("{m}_rk_h[rk_index]"),
        };

        let counters = if model.discretized {
            "int i;"
        } else if self.newton_system(model).is_some() {
            "int run1, s, t, i, j, it;"
        } else {
            "int run1, s, t, i;"
        };
        let mut lines = vec![
            counters.to_string(),
            "int error = 0;".to_string(),
            "(void)resetIntegrator;".to_string(),
            format!("{w}.rk_ttt = 0.0;"),
        ];
        if !model.discretized {
            lines.insert(2, format!("{real} h = {h};"));
            lines.push(format!(
                "for (i = 0; i < {}; ++i) rk_eta[{nxi} + i] = 0.0;",
                ni - nxi
            ));
            lines.push(format!(
                "for (i = 0; i < {}; ++i) rk_eta[{nxi} + i * {} + i] = 1.0;",
                model.dims.nx, model.dims.nx
            ));
        }
        lines.push(format!(
            "for (i = 0; i < {inputs}; ++i) {w}.rk_xxx[{ni} + i] = rk_eta[{ni} + i];"
        ));
        lines
    }

    fn discrete_body(&self, model: &ModelSetup) -> Vec<String> {
        let w = DataStruct::Workspace.instance_name(&self.module);
        let ni = model.integrated_len();
        vec![
            format!("for (i = 0; i < {ni}; ++i) {w}.rk_xxx[i] = rk_eta[i];"),
            format!("{}( {w}.rk_xxx, {w}.rk_kkk );", model.rhs),
            format!("for (i = 0; i < {ni}; ++i) rk_eta[i] = {w}.rk_kkk[i];"),
            format!("{w}.rk_ttt = 1.0;"),
        ]
    }

    fn explicit_step(&self, model: &ModelSetup) -> Vec<String> {
        let m = &self.module;
        let w = DataStruct::Workspace.instance_name(m);
        let ni = model.integrated_len();
        let s = self.stage_count();
        vec![
            format!("    for (s = 0; s < {s}; ++s) {{"),
            format!("        for (i = 0; i < {ni}; ++i) {{"),
            format!("            {w}.rk_xxx[i] = rk_eta[i];"),
            format!(
                "            for (t = 0; t < s; ++t) {w}.rk_xxx[i] += h * {m}_rk_tableau_A[s * {s} + t] * {w}.rk_kkk[t * {ni} + i];"
            ),
            "        }".to_string(),
            format!("        {}( {w}.rk_xxx, &({w}.rk_kkk[s * {ni}]) );", model.rhs),
            "    }".to_string(),
        ]
    }

    fn implicit_step(&self, model: &ModelSetup, solver: &GaussElimination) -> Vec<String> {
        let m = &self.module;
        let w = DataStruct::Workspace.instance_name(m);
        let ni = model.integrated_len();
        let s = self.stage_count();
        let dim = s * ni;
        let rhs = &model.rhs;
        vec![
            format!("    for (i = 0; i < {ni}; ++i) {w}.rk_xxx[i] = rk_eta[i];"),
            format!("    {rhs}_jac( {w}.rk_xxx, {w}.rk_jac );"),
            format!("    for (i = 0; i < {dim}; ++i) {w}.rk_kkk[i] = 0.0;"),
            format!("    for (it = 0; it < {NEWTON_ITERATIONS}; ++it) {{"),
            format!("        for (s = 0; s < {s}; ++s) {{"),
            format!("            for (i = 0; i < {ni}; ++i) {{"),
            format!("                {w}.rk_xxx[i] = rk_eta[i];"),
            format!(
                "                for (t = 0; t < {s}; ++t) {w}.rk_xxx[i] += h * {m}_rk_tableau_A[s * {s} + t] * {w}.rk_kkk[t * {ni} + i];"
            ),
            "            }".to_string(),
            format!("            {rhs}( {w}.rk_xxx, &({w}.rk_b[s * {ni}]) );"),
            format!("            for (i = 0; i < {ni}; ++i) {w}.rk_b[s * {ni} + i] -= {w}.rk_kkk[s * {ni} + i];"),
            "        }".to_string(),
            "        if (it == 0) {".to_string(),
            format!("            for (s = 0; s < {s}; ++s)"),
            format!("            for (t = 0; t < {s}; ++t)"),
            format!("            for (i = 0; i < {ni}; ++i)"),
            format!("            for (j = 0; j < {ni}; ++j)"),
            format!(
                "                {w}.rk_A[(s * {ni} + i) * {dim} + t * {ni} + j] = (s == t && i == j ? 1.0 : 0.0) - h * {m}_rk_tableau_A[s * {s} + t] * {w}.rk_jac[i * {ni} + j];"
            ),
            format!(
                "            error = {}( {w}.rk_A, {w}.rk_b, {w}.rk_perm );",
                solver.solve_name()
            ),
            "        } else {".to_string(),
            format!(
                "            {}( {w}.rk_A, {w}.rk_b, {w}.rk_perm );",
                solver.solve_reuse_name()
            ),
            "        }".to_string(),
            format!("        for (i = 0; i < {dim}; ++i) {w}.rk_kkk[i] += {w}.rk_b[i];"),
            "    }".to_string(),
        ]
    }

    fn integrate_body(&self, model: &ModelSetup, real: &str) -> Vec<String> {
        let m = &self.module;
        let w = DataStruct::Workspace.instance_name(m);
        let ni = model.integrated_len();
        let s = self.stage_count();
        let nis = model.steps_per_interval;

        let mut lines = self.prologue(model, real);
        if model.discretized {
            lines.extend(self.discrete_body(model));
        } else {
            lines.push(format!("for (run1 = 0; run1 < {nis}; ++run1) {{"));
            match self.newton_system(model) {
                Some(solver) => lines.extend(self.implicit_step(model, &solver)),
                None => lines.extend(self.explicit_step(model)),
            }
            lines.push(format!("    for (i = 0; i < {ni}; ++i)"));
            lines.push(format!(
                "        for (s = 0; s < {s}; ++s) rk_eta[i] += h * {m}_rk_tableau_b[s] * {w}.rk_kkk[s * {ni} + i];"
            ));
            lines.push(format!("    {w}.rk_ttt += 1.0 / {nis}.0;"));
            lines.push("}".to_string());
        }
        lines.push("return error;".to_string());
        lines
    }
}

impl CodeExporter for RungeKuttaExport {
    fn data_declarations(&self, data_struct: DataStruct) -> Vec<Declaration> {
        let Some(model) = self.model.as_ref() else {
            return Vec::new();
        };
        if data_struct != DataStruct::Workspace {
            return Vec::new();
        }

        let ni = model.integrated_len();
        let ws = DataStruct::Workspace;
        let mut decls = vec![
            Declaration::real("rk_ttt", 1, 1, ws).described("Normalized time within the interval"),
            Declaration::real("rk_xxx", 1, model.eta_len(), ws),
            Declaration::real("rk_kkk", self.stage_count(), ni, ws),
        ];
        if self.newton_system(model).is_some() {
            let dim = self.stage_count() * ni;
            decls.push(Declaration::real("rk_A", dim, dim, ws));
            decls.push(Declaration::real("rk_b", dim, 1, ws));
            decls.push(Declaration::int("rk_perm", dim, 1, ws));
            decls.push(Declaration::real("rk_jac", ni, ni, ws));
        }
        decls
    }

    fn function_declarations(&self) -> Vec<FunctionDeclaration> {
        let Some(model) = self.model.as_ref() else {
            return Vec::new();
        };

        let mut functions = vec![Self::model_function(model.rhs.clone())
            .described("Model right-hand side with forward sensitivities, provided by the user.")];
        if let Some(solver) = self.newton_system(model) {
            functions.push(
                Self::model_function(format!("{}_jac", model.rhs))
                    .described("Jacobian of the model right-hand side, provided by the user."),
            );
            functions.extend(solver.function_declarations());
        }
        functions.push(self.integrate_declaration(model));
        functions
    }

    fn emit_body(&self, file: &mut ExportFile) -> Result<()> {
        let model = self.model()?;

        self.emit_constants(model, file);
        if let Some(solver) = self.newton_system(model) {
            solver.emit(file);
        }
        let decl = self.integrate_declaration(model);
        let body = self.integrate_body(model, file.real_type());
        file.add_function(&decl, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeGrid;

    fn ocp(horizon: usize) -> Ocp {
        Ocp::new(
            horizon,
            Dimensions {
                nx: 4,
                nu: 1,
                ..Dimensions::default()
            },
        )
    }

    fn rk(scheme: IntegratorType) -> RungeKuttaExport {
        RungeKuttaExport::new(scheme, &ModuleName::default(), LinearSolver::GaussLu)
    }

    #[test]
    fn test_link_dimensions() {
        let mut integrator = rk(IntegratorType::Rk4);
        integrator.set_model_data(&ocp(20), 40).unwrap();

        let link = integrator.link().unwrap();
        assert_eq!(link.integrate_function, "acado_integrate");
        assert_eq!(link.stages, 4);
        assert_eq!(link.steps_per_interval, 2);
        assert_eq!(link.integrated_len, 4 * (1 + 4 + 1));
        assert_eq!(link.eta_len, 24 + 1);
        assert!(!link.takes_interval_index);
    }

    #[test]
    fn test_step_count_errors() {
        let mut integrator = rk(IntegratorType::Rk4);
        assert!(matches!(
            integrator.set_model_data(&ocp(20), 10),
            Err(GeneratorError::InvalidOption(_))
        ));
        assert!(matches!(
            integrator.set_model_data(&ocp(20), 30),
            Err(GeneratorError::InvalidOption(_))
        ));
        assert!(integrator.link().is_err());
    }

    #[test]
    fn test_explicit_scheme_rejects_algebraic_states() {
        let mut problem = ocp(10);
        problem.dimensions.nxa = 2;

        let mut explicit = rk(IntegratorType::Rk4);
        assert!(explicit.set_model_data(&problem, 10).is_err());

        let mut implicit = rk(IntegratorType::IrkGl4);
        assert!(implicit.set_model_data(&problem, 10).is_ok());
    }

    #[test]
    fn test_simplified_newton_requires_three_stage_implicit_scheme() {
        let module = ModuleName::default();
        let mut two_stage =
            RungeKuttaExport::new(IntegratorType::IrkGl4, &module, LinearSolver::SimplifiedIrkNewton);
        assert!(two_stage.set_model_data(&ocp(10), 10).is_err());

        let mut three_stage =
            RungeKuttaExport::new(IntegratorType::IrkGl6, &module, LinearSolver::SimplifiedIrkNewton);
        assert!(three_stage.set_model_data(&ocp(10), 10).is_ok());
        assert!(three_stage.uses_complex_arithmetic());
    }

    #[test]
    fn test_discretized_model_requires_single_step() {
        let mut problem = ocp(10);
        problem.model.discretized = true;

        let mut integrator = rk(IntegratorType::ExplicitEuler);
        assert!(integrator.set_model_data(&problem, 20).is_err());
        assert!(integrator.set_model_data(&problem, 10).is_ok());
    }

    #[test]
    fn test_non_equidistant_grid_takes_interval_index() {
        let mut problem = ocp(3);
        problem.grid = TimeGrid {
            start: 0.0,
            end: 1.0,
            points: Some(vec![0.0, 0.1, 0.4, 1.0]),
        };

        let mut integrator = rk(IntegratorType::Rk4);
        integrator.set_model_data(&problem, 3).unwrap();
        assert!(integrator.link().unwrap().takes_interval_index);

        let signatures: Vec<String> = integrator
            .function_declarations()
            .iter()
            .map(|f| f.signature("real_t", "int"))
            .collect();
        assert!(signatures.contains(
            &"int acado_integrate( real_t* const rk_eta, int resetIntegrator, int rk_index )"
                .to_string()
        ));
    }

    #[test]
    fn test_explicit_emission() {
        let mut integrator = rk(IntegratorType::Rk4);
        integrator.set_model_data(&ocp(20), 20).unwrap();

        let mut file = ExportFile::new("/tmp/i.c", "acado_common.h", "real_t", "int", 16);
        integrator.emit_body(&mut file).unwrap();
        let code = file.contents();

        assert!(code.contains("acado_rk_tableau_A[ 16 ]"));
        assert!(code.contains("acado_rhs( acadoWorkspace.rk_xxx"));
        assert!(!code.contains("acado_rhs_jac"));
        assert!(code.contains("static const real_t acado_rk_h = 5.000000000000000e-2;"));

        let workspace = integrator.data_declarations(DataStruct::Workspace);
        assert_eq!(workspace.len(), 3);
        assert!(integrator.data_declarations(DataStruct::Variables).is_empty());
    }

    #[test]
    fn test_implicit_emission_uses_newton_system() {
        let mut integrator = rk(IntegratorType::IrkGl4);
        integrator.set_model_data(&ocp(10), 10).unwrap();

        let mut file = ExportFile::new("/tmp/i.c", "acado_common.h", "float", "int", 8);
        integrator.emit_body(&mut file).unwrap();
        let code = file.contents();

        assert!(code.contains("acado_rhs_jac( acadoWorkspace.rk_xxx, acadoWorkspace.rk_jac );"));
        assert!(code.contains("acado_solve_dim48_system( acadoWorkspace.rk_A"));
        assert!(code.contains("float h = acado_rk_h;"));

        let names: Vec<String> = integrator
            .data_declarations(DataStruct::Workspace)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert!(names.contains(&"rk_perm".to_string()));
        assert!(names.contains(&"rk_jac".to_string()));
    }

    #[test]
    fn test_emit_before_setup_fails() {
        let integrator = rk(IntegratorType::Rk4);
        let mut file = ExportFile::new("/tmp/i.c", "", "real_t", "int", 16);
        assert!(integrator.emit_body(&mut file).is_err());
        assert!(integrator.function_declarations().is_empty());
    }
}
