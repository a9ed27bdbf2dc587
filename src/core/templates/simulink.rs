//! Simulink S-function interface

use super::emitter::{module_substitutions, Substitutions, TemplateEmitter, TemplateKey};
use crate::config::QpSolver;
use crate::core::resolve::SharedConstants;
use crate::domain::{GeneratorError, Result};
use std::path::{Path, PathBuf};

/// S-function wrapper, its header and its MATLAB build script
#[derive(Debug, Clone)]
pub struct SimulinkInterface {
    makefile: PathBuf,
    header: PathBuf,
    source: PathBuf,
    substitutions: Substitutions,
}

impl SimulinkInterface {
    /// Whether an S-function can be generated for `qp_solver`
    pub fn supports(qp_solver: QpSolver) -> bool {
        matches!(qp_solver, QpSolver::QpOases | QpSolver::QpDunes)
    }

    /// Configures the interface for the exported solver in `dir`
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` if constraint values are not hard-coded,
    /// and `InvalidOption` for a QP solver without S-function support
    pub fn configure(dir: &Path, constants: &SharedConstants) -> Result<Self> {
        if !Self::supports(constants.qp_solver) {
            return Err(GeneratorError::InvalidOption(format!(
                "The Simulink interface is available only with qpOASES and qpDUNES, got {}",
                constants.qp_solver
            )));
        }
        if !constants.hardcoded_constraint_values {
            return Err(GeneratorError::NotImplemented(
                "Simulink interface with constraint values that are not hard-coded".to_string(),
            ));
        }

        let module = &constants.module;
        let dims = constants.dimensions;
        let flag = |b: bool| u8::from(b).to_string();

        let mut substitutions = module_substitutions(module);
        let mut put = |name: &str, value: String| {
            substitutions.insert(name.to_string(), value);
        };
        put("N", constants.horizon.to_string());
        put("NX", dims.nx.to_string());
        put("NXD", dims.ndx.to_string());
        put("NXA", dims.nxa.to_string());
        put("NU", dims.nu.to_string());
        put("NOD", dims.nod.to_string());
        put("NY", constants.ny.to_string());
        put("NYN", constants.nyn.to_string());
        put("INITIAL_STATE_FIXED", flag(constants.initial_state_fixed));
        put(
            "WEIGHTING_MATRICES_TYPE",
            constants.weighting_matrices_type.indicator().to_string(),
        );
        put("HARDCODED_CONSTRAINT_VALUES", flag(constants.hardcoded_constraint_values));
        put("USE_ARRIVAL_COST", flag(constants.use_arrival_cost));
        put("COMPUTE_COVARIANCE_MATRIX", flag(constants.compute_covariance_matrix));
        put("QP_SOLVER", constants.qp_solver.interface_name().to_string());

        Ok(Self {
            makefile: dir.join(format!("make_{module}_solver_sfunction.m")),
            header: dir.join(module.file_name("solver_sfunction", "h")),
            source: dir.join(module.file_name("solver_sfunction", "c")),
            substitutions,
        })
    }

    /// Writes the three files and returns their paths
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be rendered or written
    pub fn export(&self, emitter: &TemplateEmitter) -> Result<Vec<PathBuf>> {
        let files = [
            (TemplateKey::SolverSfunctionHeader, &self.header, ""),
            (TemplateKey::SolverSfunctionSource, &self.source, ""),
            (TemplateKey::MakeSolverSfunction, &self.makefile, "%"),
        ];
        let mut written = Vec::with_capacity(files.len());
        for (key, path, token) in files {
            emitter.copy(key, path, token, true, &self.substitutions)?;
            written.push(path.clone());
        }
        Ok(written)
    }
}
