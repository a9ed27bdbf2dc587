//! Solver collaborator
//!
//! A [`SolverExport`] is configured in a fixed order by the export session:
//! dimensions, integrator link, objective, constraints, Levenberg-Marquardt
//! coefficient, then [`SolverExport::setup`]. After setup it answers the
//! dimension queries the common header needs and emits `<module>_solver.c`.

use crate::adapters::integrator::IntegratorLink;
use crate::adapters::solver::kind::{QpLayout, SolverKind};
use crate::adapters::traits::CodeExporter;
use crate::codegen::{
    DataStruct, Declaration, ExportFile, FunctionDeclaration, Parameter, ScalarType,
};
use crate::config::ExportOptions;
use crate::domain::{
    Constraints, Dimensions, GeneratorError, ModuleName, Objective, Result,
    WeightingMatricesType,
};
use serde::Serialize;

/// Dimensions bound into a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SolverDimensions {
    /// Horizon length
    pub n: usize,
    /// Model dimensions
    pub dims: Dimensions,
    /// Free parameters
    pub np: usize,
}

/// Lower and upper bound counts of a sparse FORCES QP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundCounts {
    /// Total number of lower bound values
    pub lower: usize,
    /// Total number of upper bound values
    pub upper: usize,
}

/// Block structure of a block-condensed QP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockCondensing {
    /// State bounds kept as affine constraints within one block
    pub state_bounds_per_block: usize,
    /// Number of blocks over the horizon
    pub block_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ObjectiveSetup {
    ny: usize,
    nyn: usize,
    weighting: WeightingMatricesType,
    linear_terms: bool,
}

/// Solver-generation collaborator
#[derive(Debug, Clone)]
pub struct SolverExport {
    kind: SolverKind,
    module: ModuleName,
    fix_initial_state: bool,
    hardcode_constraint_values: bool,
    use_arrival_cost: bool,
    compute_covariance_matrix: bool,
    block_size: usize,
    dimensions: Option<SolverDimensions>,
    integrator: Option<IntegratorLink>,
    objective: Option<ObjectiveSetup>,
    constraints: Constraints,
    levenberg_marquardt: f64,
    ready: bool,
}

impl SolverExport {
    /// Unconfigured solver of `kind`
    pub fn new(kind: SolverKind, options: &ExportOptions) -> Self {
        Self {
            kind,
            module: options.module_name.clone(),
            fix_initial_state: options.fix_initial_state,
            hardcode_constraint_values: options.hardcode_constraint_values,
            use_arrival_cost: options.use_arrival_cost,
            compute_covariance_matrix: options.compute_covariance_matrix,
            block_size: options.condensing_block_size,
            dimensions: None,
            integrator: None,
            objective: None,
            constraints: Constraints::default(),
            levenberg_marquardt: 0.0,
            ready: false,
        }
    }

    /// Strategy of this solver
    pub fn kind(&self) -> SolverKind {
        self.kind
    }

    /// Binds the problem dimensions
    pub fn set_dimensions(&mut self, n: usize, dims: Dimensions, np: usize) {
        self.dimensions = Some(SolverDimensions { n, dims, np });
        self.ready = false;
    }

    /// Attaches the integrator the generated solver calls
    pub fn attach_integrator(&mut self, link: IntegratorLink) {
        self.integrator = Some(link);
        self.ready = false;
    }

    /// Attaches the objective
    ///
    /// # Errors
    ///
    /// Returns `InvalidObjectiveForExport` if a Gauss-Newton strategy gets an
    /// objective without least-squares terms
    pub fn set_objective(&mut self, objective: &Objective) -> Result<()> {
        if !self.kind.is_exact_hessian() && !objective.has_least_squares() {
            return Err(GeneratorError::InvalidObjectiveForExport(format!(
                "{} requires a least-squares objective",
                self.kind
            )));
        }

        let weighting = objective
            .least_squares
            .or(objective.terminal_least_squares)
            .map(|term| term.weighting)
            .unwrap_or(WeightingMatricesType::Empty);

        self.objective = Some(ObjectiveSetup {
            ny: objective.ny(),
            nyn: objective.nyn(),
            weighting,
            linear_terms: objective.linear_terms,
        });
        self.ready = false;
        Ok(())
    }

    /// Attaches the constraints
    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
        self.ready = false;
    }

    /// Sets the Levenberg-Marquardt regularization coefficient
    pub fn set_levenberg_marquardt(&mut self, coefficient: f64) {
        self.levenberg_marquardt = coefficient;
    }

    /// Completes the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if a configuration step was skipped and
    /// `InvalidOption` if the horizon does not split into condensing blocks
    pub fn setup(&mut self) -> Result<()> {
        let dims = self.dimensions.ok_or_else(|| self.missing("dimensions"))?;
        if self.integrator.is_none() {
            return Err(self.missing("an integrator"));
        }
        if self.objective.is_none() {
            return Err(self.missing("an objective"));
        }

        if self.kind.layout() == QpLayout::Block && (self.block_size == 0 || dims.n % self.block_size != 0) {
            return Err(GeneratorError::InvalidOption(format!(
                "Horizon length {} is not divisible by the condensing block size {}",
                dims.n, self.block_size
            )));
        }

        self.ready = true;
        tracing::debug!(
            strategy = %self.kind,
            qp_variables = self.num_qp_vars(),
            complex_constraints = self.num_complex_constraints(),
            "Solver setup complete"
        );
        Ok(())
    }

    /// Whether [`SolverExport::setup`] succeeded since the last change
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn missing(&self, what: &str) -> GeneratorError {
        GeneratorError::InvalidArguments(format!("Solver {} set up without {what}", self.kind))
    }

    fn dims(&self) -> SolverDimensions {
        self.dimensions.unwrap_or_default()
    }

    /// References per node on the first N nodes
    pub fn ny(&self) -> usize {
        self.objective.map(|o| o.ny).unwrap_or(0)
    }

    /// References on the terminal node
    pub fn nyn(&self) -> usize {
        self.objective.map(|o| o.nyn).unwrap_or(0)
    }

    /// Type of the weighting matrices
    pub fn weighting_matrices_type(&self) -> WeightingMatricesType {
        self.objective
            .map(|o| o.weighting)
            .unwrap_or(WeightingMatricesType::Empty)
    }

    /// Whether non-hard-coded linear objective terms are used
    pub fn uses_linear_terms(&self) -> bool {
        self.objective.map(|o| o.linear_terms).unwrap_or(false)
    }

    /// Total number of QP variables
    pub fn num_qp_vars(&self) -> usize {
        let SolverDimensions { n, dims, .. } = self.dims();
        match self.kind.layout() {
            QpLayout::Condensed => {
                n * dims.nu + if self.fix_initial_state { 0 } else { dims.nx }
            }
            QpLayout::Block => (self.block_count() + 1) * dims.nx + n * dims.nu,
            QpLayout::Sparse => (n + 1) * dims.nx + n * dims.nu,
        }
    }

    /// Number of path and point constraints
    pub fn num_complex_constraints(&self) -> usize {
        self.constraints.path_constraints * self.dims().n + self.constraints.point_constraints
    }

    fn block_count(&self) -> usize {
        if self.block_size == 0 {
            0
        } else {
            self.dims().n / self.block_size
        }
    }

    /// Bound counts, for sparse FORCES solvers only
    pub fn as_bound_counts(&self) -> Option<BoundCounts> {
        if self.kind != SolverKind::SparseForces {
            return None;
        }
        let SolverDimensions { n, dims, .. } = self.dims();
        let initial = if self.fix_initial_state { dims.nx } else { 0 };
        let count = n * (self.constraints.bounded_controls + self.constraints.bounded_states) + initial;
        Some(BoundCounts {
            lower: count,
            upper: count,
        })
    }

    /// Block structure, for block-condensing solvers only
    pub fn as_block_condensing(&self) -> Option<BlockCondensing> {
        (self.kind.layout() == QpLayout::Block).then(|| BlockCondensing {
            state_bounds_per_block: self.block_size * self.constraints.bounded_states,
            block_count: self.block_count(),
        })
    }

    fn fn_name(&self, name: &str) -> String {
        format!("{}_{}", self.module, name)
    }

    fn qp_solve_name(&self) -> String {
        self.fn_name(&format!("{}_solve", self.kind.backend().to_string().to_lowercase()))
    }

    fn simulation_decl(&self) -> FunctionDeclaration {
        FunctionDeclaration::new(self.fn_name("modelSimulation"), ScalarType::Int)
            .described("Integrates the model over all shooting intervals and collects sensitivities.")
    }

    fn hessian_decl(&self) -> FunctionDeclaration {
        FunctionDeclaration::new(self.fn_name("evaluateObjective"), ScalarType::Void)
            .described("Evaluates the QP Hessian and gradient.")
    }

    fn regularize_decl(&self) -> FunctionDeclaration {
        FunctionDeclaration::new(self.fn_name("regularize"), ScalarType::Void)
            .param(Parameter::real_out("hessian_block"))
            .described("Makes one Hessian block positive definite.")
    }

    fn public_functions(&self) -> Vec<(&'static str, FunctionDeclaration)> {
        vec![
            (
                "initializeSolver",
                FunctionDeclaration::new(self.fn_name("initializeSolver"), ScalarType::Int)
                    .described("Clears the solver workspace."),
            ),
            (
                "preparationStep",
                FunctionDeclaration::new(self.fn_name("preparationStep"), ScalarType::Int)
                    .described("Preparation step of the real-time iteration."),
            ),
            (
                "feedbackStep",
                FunctionDeclaration::new(self.fn_name("feedbackStep"), ScalarType::Int)
                    .described("Feedback step of the real-time iteration."),
            ),
            (
                "shiftStates",
                FunctionDeclaration::new(self.fn_name("shiftStates"), ScalarType::Void)
                    .param(Parameter::int_value("strategy"))
                    .param(Parameter::real_in("xEnd"))
                    .described("Shifts the state trajectory by one interval."),
            ),
            (
                "shiftControls",
                FunctionDeclaration::new(self.fn_name("shiftControls"), ScalarType::Void)
                    .param(Parameter::real_in("uEnd"))
                    .described("Shifts the control trajectory by one interval."),
            ),
            (
                "getKKT",
                FunctionDeclaration::new(self.fn_name("getKKT"), ScalarType::Real)
                    .described("KKT tolerance of the current iterate."),
            ),
            (
                "getObjective",
                FunctionDeclaration::new(self.fn_name("getObjective"), ScalarType::Real)
                    .described("Objective value of the current iterate."),
            ),
        ]
    }

    fn simulation_body(&self, link: &IntegratorLink) -> Vec<String> {
        let SolverDimensions { n, dims, .. } = self.dims();
        let (nx, nu, nod) = (dims.nx, dims.nu, dims.nod);
        let v = DataStruct::Variables.instance_name(&self.module);
        let w = DataStruct::Workspace.instance_name(&self.module);
        let ni = link.integrated_len;
        let index_arg = if link.takes_interval_index { ", run1" } else { "" };
        let mut body = vec![
            "int run1, i;".to_string(),
            "int ret = 0;".to_string(),
            format!("for (run1 = 0; run1 < {n}; ++run1) {{"),
            format!("    for (i = 0; i < {nx}; ++i) {w}.state[i] = {v}.x[run1 * {nx} + i];"),
            format!("    for (i = 0; i < {nu}; ++i) {w}.state[{ni} + i] = {v}.u[run1 * {nu} + i];"),
        ];
        // the od member is only declared for nod > 0
        if nod > 0 {
            body.push(format!(
                "    for (i = 0; i < {nod}; ++i) {w}.state[{} + i] = {v}.od[run1 * {nod} + i];",
                ni + nu
            ));
        }
        body.extend([
            format!("    ret = {}( {w}.state, 1{index_arg} );", link.integrate_function),
            "    if (ret != 0) return ret;".to_string(),
            format!("    for (i = 0; i < {nx}; ++i) {w}.d[run1 * {nx} + i] = {w}.state[i] - {v}.x[run1 * {nx} + {nx} + i];"),
            format!("    for (i = 0; i < {}; ++i) {w}.evGx[run1 * {} + i] = {w}.state[{nx} + i];", nx * nx, nx * nx),
            format!("    for (i = 0; i < {}; ++i) {w}.evGu[run1 * {} + i] = {w}.state[{} + i];", nx * nu, nx * nu, nx + nx * nx),
            "}".to_string(),
            "return ret;".to_string(),
        ]);
        body
    }

    fn objective_body(&self, file: &ExportFile) -> Vec<String> {
        let w = DataStruct::Workspace.instance_name(&self.module);
        let nv = self.num_qp_vars();
        vec![
            "int i;".to_string(),
            format!("for (i = 0; i < {}; ++i) {w}.H[i] = 0.0;", nv * nv),
            format!("for (i = 0; i < {nv}; ++i) {w}.g[i] = 0.0;"),
            format!(
                "for (i = 0; i < {nv}; ++i) {w}.H[i * {nv} + i] += {};",
                file.real_literal(self.levenberg_marquardt)
            ),
        ]
    }

    fn shift_states_body(&self) -> Vec<String> {
        let SolverDimensions { n, dims, .. } = self.dims();
        let nx = dims.nx;
        let v = DataStruct::Variables.instance_name(&self.module);
        vec![
            "int i;".to_string(),
            format!("for (i = 0; i < {}; ++i) {v}.x[i] = {v}.x[{nx} + i];", n * nx),
            "if (strategy == 1 && xEnd != 0)".to_string(),
            format!("    for (i = 0; i < {nx}; ++i) {v}.x[{} + i] = xEnd[i];", n * nx),
        ]
    }

    fn shift_controls_body(&self) -> Vec<String> {
        let SolverDimensions { n, dims, .. } = self.dims();
        let nu = dims.nu;
        let v = DataStruct::Variables.instance_name(&self.module);
        let last = n.saturating_sub(1) * nu;
        vec![
            "int i;".to_string(),
            format!("for (i = 0; i < {last}; ++i) {v}.u[i] = {v}.u[{nu} + i];"),
            "if (uEnd != 0)".to_string(),
            format!("    for (i = 0; i < {nu}; ++i) {v}.u[{last} + i] = uEnd[i];"),
        ]
    }

    fn kkt_body(&self, real: &str) -> Vec<String> {
        let w = DataStruct::Workspace.instance_name(&self.module);
        let nv = self.num_qp_vars();
        vec![
            "int i;".to_string(),
            format!("{real} kkt = 0.0;"),
            format!("for (i = 0; i < {nv}; ++i) kkt += fabs({w}.g[i] * {w}.dz[i]);"),
            "return kkt;".to_string(),
        ]
    }

    fn objective_value_body(&self) -> Vec<String> {
        let w = DataStruct::Workspace.instance_name(&self.module);
        vec![format!("return {w}.objValue;")]
    }
}

impl CodeExporter for SolverExport {
    fn data_declarations(&self, data_struct: DataStruct) -> Vec<Declaration> {
        let SolverDimensions { n, dims, .. } = self.dims();
        let (nx, nu, nod) = (dims.nx, dims.nu, dims.nod);
        let (ny, nyn) = (self.ny(), self.nyn());
        let nv = self.num_qp_vars();
        let nc = self.num_complex_constraints();

        match data_struct {
            DataStruct::Variables => {
                let vars = DataStruct::Variables;
                let weight_rows = match self.weighting_matrices_type() {
                    WeightingMatricesType::OncePerNode => n * ny,
                    WeightingMatricesType::Once => ny,
                    WeightingMatricesType::Empty => 0,
                };
                let mut decls = vec![
                    Declaration::real("x", n + 1, nx, vars).described("Differential state trajectory"),
                    Declaration::real("u", n, nu, vars).described("Control trajectory"),
                    Declaration::real("od", n + 1, nod, vars).described("Online data"),
                    Declaration::real("y", n, ny, vars).described("References on the first N nodes"),
                    Declaration::real("yN", nyn, 1, vars).described("Reference on the terminal node"),
                    Declaration::real("W", weight_rows, ny, vars),
                    Declaration::real("WN", nyn, nyn, vars),
                ];
                if self.fix_initial_state {
                    decls.push(Declaration::real("x0", nx, 1, vars).described("Current state feedback"));
                }
                if !self.hardcode_constraint_values {
                    decls.push(Declaration::real("lbValues", n, nu, vars));
                    decls.push(Declaration::real("ubValues", n, nu, vars));
                }
                if self.use_arrival_cost {
                    decls.push(Declaration::real("xAC", nx, 1, vars));
                    decls.push(Declaration::real("SAC", nx, nx, vars));
                    decls.push(Declaration::real("WL", nx, nx, vars));
                }
                if self.compute_covariance_matrix {
                    decls.push(Declaration::real("sigmaN", nx, nx, vars));
                }
                if self.kind.is_exact_hessian() {
                    decls.push(Declaration::real("mu", n, nx, vars).described("Multipliers of the continuity constraints"));
                }
                decls
            }
            DataStruct::Workspace => {
                let ws = DataStruct::Workspace;
                let eta = self.integrator.as_ref().map(|l| l.eta_len).unwrap_or(0);
                let mut decls = vec![
                    Declaration::real("state", 1, eta, ws),
                    Declaration::real("d", n, nx, ws),
                    Declaration::real("evGx", n * nx, nx, ws),
                    Declaration::real("evGu", n * nx, nu, ws),
                    Declaration::real("H", nv, nv, ws),
                    Declaration::real("g", nv, 1, ws),
                    Declaration::real("lb", nv, 1, ws),
                    Declaration::real("ub", nv, 1, ws),
                    Declaration::real("dz", nv, 1, ws),
                    Declaration::real("objValue", 1, 1, ws),
                ];
                if nc > 0 {
                    decls.push(Declaration::real("A", nc, nv, ws));
                    decls.push(Declaration::real("lbA", nc, 1, ws));
                    decls.push(Declaration::real("ubA", nc, 1, ws));
                }
                if let Some(block) = self.as_block_condensing() {
                    let nca = block.state_bounds_per_block * block.block_count;
                    decls.push(Declaration::real("qpA", nca, nv, ws));
                }
                if let Some(bounds) = self.as_bound_counts() {
                    decls.push(Declaration::int("lbIdx", bounds.lower, 1, ws));
                    decls.push(Declaration::int("ubIdx", bounds.upper, 1, ws));
                }
                decls
            }
        }
    }

    fn function_declarations(&self) -> Vec<FunctionDeclaration> {
        let mut decls = vec![FunctionDeclaration::new(self.qp_solve_name(), ScalarType::Int)
            .described(format!("Solves the QP with {}.", self.kind.backend()))];
        decls.push(self.simulation_decl());
        decls.push(self.hessian_decl());
        decls.extend(self.public_functions().into_iter().map(|(_, decl)| decl));
        if self.kind.is_exact_hessian() {
            decls.push(self.regularize_decl());
        }
        decls
    }

    fn emit_body(&self, file: &mut ExportFile) -> Result<()> {
        if !self.ready {
            return Err(GeneratorError::InvalidArguments(format!(
                "Solver {} emitted before setup",
                self.kind
            )));
        }
        let link = self
            .integrator
            .as_ref()
            .ok_or_else(|| self.missing("an integrator"))?;
        let real = file.real_type().to_string();
        let v = DataStruct::Variables.instance_name(&self.module);
        let w = DataStruct::Workspace.instance_name(&self.module);
        let nv = self.num_qp_vars();

        file.add_comment(format!("Solver strategy: {}", self.kind));
        file.add_blank();

        file.add_function(&self.simulation_decl(), self.simulation_body(link));
        let objective = self.objective_body(file);
        file.add_function(&self.hessian_decl(), objective);

        let nx = self.dims().dims.nx;
        for (role, decl) in self.public_functions() {
            let body: Vec<String> = match role {
                "initializeSolver" => vec![
                    format!("memset(&{w}, 0, sizeof( {w} ));"),
                    "return 0;".to_string(),
                ],
                "preparationStep" => vec![
                    format!("int ret = {}( );", self.simulation_decl().name),
                    format!("{}( );", self.hessian_decl().name),
                    "return ret;".to_string(),
                ],
                "feedbackStep" if self.fix_initial_state => vec![
                    "int i;".to_string(),
                    format!("for (i = 0; i < {nx}; ++i) {v}.x[i] = {v}.x0[i];"),
                    format!("return {}( );", self.qp_solve_name()),
                ],
                "feedbackStep" => vec![format!("return {}( );", self.qp_solve_name())],
                "shiftStates" => self.shift_states_body(),
                "shiftControls" => self.shift_controls_body(),
                "getKKT" => self.kkt_body(&real),
                _ => self.objective_value_body(),
            };
            file.add_function(&decl, body);
        }

        tracing::debug!(strategy = %self.kind, qp_variables = nv, "Emitted solver body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LeastSquaresTerm;

    fn link() -> IntegratorLink {
        IntegratorLink {
            integrate_function: "acado_integrate".to_string(),
            takes_interval_index: false,
            stages: 4,
            steps_per_interval: 1,
            integrated_len: 24,
            eta_len: 25,
        }
    }

    fn ls_objective(ny: usize, nyn: usize) -> Objective {
        Objective {
            least_squares: Some(LeastSquaresTerm {
                ny,
                weighting: WeightingMatricesType::Once,
            }),
            terminal_least_squares: Some(LeastSquaresTerm {
                ny: nyn,
                weighting: WeightingMatricesType::Once,
            }),
            ..Objective::default()
        }
    }

    fn configured(kind: SolverKind, options: &ExportOptions, n: usize) -> SolverExport {
        let mut solver = SolverExport::new(kind, options);
        solver.set_dimensions(
            n,
            Dimensions {
                nx: 4,
                nu: 1,
                ..Dimensions::default()
            },
            0,
        );
        solver.attach_integrator(link());
        solver.set_objective(&ls_objective(5, 4)).unwrap();
        solver.set_constraints(Constraints {
            bounded_controls: 1,
            bounded_states: 2,
            path_constraints: 1,
            point_constraints: 3,
        });
        solver
    }

    #[test]
    fn test_qp_variable_counts() {
        let options = ExportOptions::default();

        let condensed = configured(SolverKind::GaussNewtonCn2, &options, 20);
        assert_eq!(condensed.num_qp_vars(), 20);

        let sparse = configured(SolverKind::SparseHpmpc, &options, 20);
        assert_eq!(sparse.num_qp_vars(), 21 * 4 + 20);

        let block_options = ExportOptions {
            condensing_block_size: 5,
            ..ExportOptions::default()
        };
        let block = configured(SolverKind::BlockQpDunes, &block_options, 20);
        assert_eq!(block.num_qp_vars(), 5 * 4 + 20);

        let free_initial = ExportOptions {
            fix_initial_state: false,
            ..ExportOptions::default()
        };
        assert_eq!(configured(SolverKind::CondensedGaussNewton, &free_initial, 20).num_qp_vars(), 24);
    }

    #[test]
    fn test_reference_counts_and_complex_constraints() {
        let solver = configured(SolverKind::GaussNewtonCn2, &ExportOptions::default(), 10);
        assert_eq!(solver.ny(), 5);
        assert_eq!(solver.nyn(), 4);
        assert_eq!(solver.num_complex_constraints(), 10 + 3);
        assert_eq!(solver.weighting_matrices_type(), WeightingMatricesType::Once);
        assert!(!solver.uses_linear_terms());
    }

    #[test]
    fn test_capability_queries() {
        let options = ExportOptions {
            condensing_block_size: 2,
            ..ExportOptions::default()
        };

        let forces = configured(SolverKind::SparseForces, &options, 10);
        let bounds = forces.as_bound_counts().unwrap();
        assert_eq!(bounds.lower, 10 * 3 + 4);
        assert_eq!(bounds.lower, bounds.upper);
        assert!(forces.as_block_condensing().is_none());

        let block = configured(SolverKind::BlockForces, &options, 10);
        assert!(block.as_bound_counts().is_none());
        let blocks = block.as_block_condensing().unwrap();
        assert_eq!(blocks.block_count, 5);
        assert_eq!(blocks.state_bounds_per_block, 4);
    }

    #[test]
    fn test_gauss_newton_requires_least_squares() {
        let mut solver = SolverExport::new(SolverKind::GaussNewtonCn2, &ExportOptions::default());
        let general = Objective {
            lagrange_terms: 1,
            ..Objective::default()
        };
        assert!(matches!(
            solver.set_objective(&general),
            Err(GeneratorError::InvalidObjectiveForExport(_))
        ));

        let mut exact = SolverExport::new(SolverKind::ExactHessianCn2, &ExportOptions::default());
        assert!(exact.set_objective(&general).is_ok());
        assert_eq!(exact.weighting_matrices_type(), WeightingMatricesType::Empty);
    }

    #[test]
    fn test_setup_checks() {
        let mut bare = SolverExport::new(SolverKind::GaussNewtonCn2, &ExportOptions::default());
        assert!(matches!(bare.setup(), Err(GeneratorError::InvalidArguments(_))));

        let options = ExportOptions {
            condensing_block_size: 3,
            ..ExportOptions::default()
        };
        let mut block = configured(SolverKind::BlockQpDunes, &options, 10);
        assert!(matches!(block.setup(), Err(GeneratorError::InvalidOption(_))));

        let mut solver = configured(SolverKind::GaussNewtonCn2, &ExportOptions::default(), 10);
        solver.setup().unwrap();
        assert!(solver.is_ready());
    }

    #[test]
    fn test_emission() {
        let mut solver = configured(SolverKind::ExactHessianQpDunes, &ExportOptions::default(), 10);
        solver.set_levenberg_marquardt(1e-4);

        let mut file = ExportFile::new("/tmp/s.c", "acado_common.h", "real_t", "int", 4);
        assert!(solver.emit_body(&mut file).is_err());

        solver.setup().unwrap();
        solver.emit_body(&mut file).unwrap();
        let code = file.contents();
        assert!(code.contains("ret = acado_integrate( acadoWorkspace.state, 1 );"));
        assert!(code.contains("return acado_qpdunes_solve( );"));
        assert!(code.contains("+= 1.000e-4;"));

        let names: Vec<String> = solver.function_declarations().into_iter().map(|f| f.name).collect();
        assert!(names.contains(&"acado_regularize".to_string()));

        let variables: Vec<String> = solver
            .data_declarations(DataStruct::Variables)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert!(variables.contains(&"mu".to_string()));
        assert!(variables.contains(&"x0".to_string()));
    }

    #[test]
    fn test_online_data_copied_only_when_declared() {
        let mut solver = configured(SolverKind::GaussNewtonCn2, &ExportOptions::default(), 10);
        solver.setup().unwrap();
        let mut file = ExportFile::new("/tmp/s.c", "acado_common.h", "real_t", "int", 4);
        solver.emit_body(&mut file).unwrap();
        assert!(!file.contents().contains("acadoVariables.od["));

        solver.set_dimensions(
            10,
            Dimensions {
                nx: 4,
                nu: 1,
                nod: 2,
                ..Dimensions::default()
            },
            0,
        );
        solver.setup().unwrap();
        let mut file = ExportFile::new("/tmp/s.c", "acado_common.h", "real_t", "int", 4);
        solver.emit_body(&mut file).unwrap();
        assert!(file.contents().contains("acadoVariables.od[run1 * 2 + i]"));
    }
}
