//! Template resources and the emitter that copies them
//!
//! Templates are compiled into the binary. A template line starting with
//! `@@` is an authoring note; `@NAME@` is a placeholder replaced from the
//! substitution map passed to [`TemplateEmitter::copy`].

use crate::domain::{GeneratorError, ModuleName, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Placeholder values keyed by placeholder name
pub type Substitutions = BTreeMap<String, String>;

const NOTE_PREFIX: &str = "@@";

/// Named template resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    MakefileQpOases,
    MakefileEhQpOases,
    MakefileQpDunes,
    MakefileEhQpDunes,
    MakefileForces,
    MakefileHpmpc,
    TestMain,
    AuxiliaryFunctionsHeader,
    AuxiliaryFunctionsSource,
    SolverMex,
    EhSolverMex,
    MakeMexQpOases,
    MakeMexEhQpOases,
    MakeMexForces,
    MakeMexQpDunes,
    MakeMexEhQpDunes,
    MakeMexBlockQpDunes,
    SolverSfunctionHeader,
    SolverSfunctionSource,
    MakeSolverSfunction,
    HessianRegularization,
}

impl TemplateKey {
    /// Resource name, used in log records and error messages
    pub fn name(self) -> &'static str {
        match self {
            TemplateKey::MakefileQpOases => "makefile_qpoases",
            TemplateKey::MakefileEhQpOases => "makefile_eh_qpoases",
            TemplateKey::MakefileQpDunes => "makefile_qpdunes",
            TemplateKey::MakefileEhQpDunes => "makefile_eh_qpdunes",
            TemplateKey::MakefileForces => "makefile_forces",
            TemplateKey::MakefileHpmpc => "makefile_hpmpc",
            TemplateKey::TestMain => "test.c",
            TemplateKey::AuxiliaryFunctionsHeader => "auxiliary_functions.h",
            TemplateKey::AuxiliaryFunctionsSource => "auxiliary_functions.c",
            TemplateKey::SolverMex => "solver_mex.c",
            TemplateKey::EhSolverMex => "eh_solver_mex.c",
            TemplateKey::MakeMexQpOases => "make_mex_qpoases.m",
            TemplateKey::MakeMexEhQpOases => "make_mex_eh_qpoases.m",
            TemplateKey::MakeMexForces => "make_mex_forces.m",
            TemplateKey::MakeMexQpDunes => "make_mex_qpdunes.m",
            TemplateKey::MakeMexEhQpDunes => "make_mex_eh_qpdunes.m",
            TemplateKey::MakeMexBlockQpDunes => "make_mex_block_qpdunes.m",
            TemplateKey::SolverSfunctionHeader => "solver_sfunction.h",
            TemplateKey::SolverSfunctionSource => "solver_sfunction.c",
            TemplateKey::MakeSolverSfunction => "make_solver_sfunction.m",
            TemplateKey::HessianRegularization => "hessian_regularization.c",
        }
    }

    fn source(self) -> &'static str {
        match self {
            TemplateKey::MakefileQpOases => include_str!("../../../templates/makefile_qpoases.in"),
            TemplateKey::MakefileEhQpOases => include_str!("../../../templates/makefile_eh_qpoases.in"),
            TemplateKey::MakefileQpDunes => include_str!("../../../templates/makefile_qpdunes.in"),
            TemplateKey::MakefileEhQpDunes => include_str!("../../../templates/makefile_eh_qpdunes.in"),
            TemplateKey::MakefileForces => include_str!("../../../templates/makefile_forces.in"),
            TemplateKey::MakefileHpmpc => include_str!("../../../templates/makefile_hpmpc.in"),
            TemplateKey::TestMain => include_str!("../../../templates/test.c.in"),
            TemplateKey::AuxiliaryFunctionsHeader => {
                include_str!("../../../templates/auxiliary_functions.h.in")
            }
            TemplateKey::AuxiliaryFunctionsSource => {
                include_str!("../../../templates/auxiliary_functions.c.in")
            }
            TemplateKey::SolverMex => include_str!("../../../templates/solver_mex.c.in"),
            TemplateKey::EhSolverMex => include_str!("../../../templates/eh_solver_mex.c.in"),
            TemplateKey::MakeMexQpOases => include_str!("../../../templates/make_mex_qpoases.m.in"),
            TemplateKey::MakeMexEhQpOases => {
                include_str!("../../../templates/make_mex_eh_qpoases.m.in")
            }
            TemplateKey::MakeMexForces => include_str!("../../../templates/make_mex_forces.m.in"),
            TemplateKey::MakeMexQpDunes => include_str!("../../../templates/make_mex_qpdunes.m.in"),
            TemplateKey::MakeMexEhQpDunes => {
                include_str!("../../../templates/make_mex_eh_qpdunes.m.in")
            }
            TemplateKey::MakeMexBlockQpDunes => {
                include_str!("../../../templates/make_mex_block_qpdunes.m.in")
            }
            TemplateKey::SolverSfunctionHeader => {
                include_str!("../../../templates/solver_sfunction.h.in")
            }
            TemplateKey::SolverSfunctionSource => {
                include_str!("../../../templates/solver_sfunction.c.in")
            }
            TemplateKey::MakeSolverSfunction => {
                include_str!("../../../templates/make_solver_sfunction.m.in")
            }
            TemplateKey::HessianRegularization => {
                include_str!("../../../templates/hessian_regularization.c.in")
            }
        }
    }
}

/// Placeholder values every template may use
pub fn module_substitutions(module: &ModuleName) -> Substitutions {
    let mut substitutions = Substitutions::new();
    substitutions.insert("MODULE_NAME".to_string(), module.as_str().to_string());
    substitutions.insert("MODULE_PREFIX".to_string(), module.macro_prefix());
    substitutions
}

/// Copies template resources into destination files
///
/// The emitter holds no mutable state; the same inputs always render the
/// same bytes.
#[derive(Debug, Clone)]
pub struct TemplateEmitter {
    placeholder: Regex,
}

impl TemplateEmitter {
    /// Creates an emitter
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder pattern fails to compile
    pub fn new() -> Result<Self> {
        let placeholder = Regex::new(r"@([A-Z][A-Z0-9_]*)@")
            .map_err(|e| GeneratorError::Configuration(e.to_string()))?;
        Ok(Self { placeholder })
    }

    /// Renders a template into a string
    ///
    /// With `strip_boilerplate` the authoring notes are removed and a
    /// code-generation notice is put on top, each line prefixed with
    /// `comment_token` (or wrapped in a C block comment when the token is
    /// empty). Without it the template is rendered verbatim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the template references a placeholder
    /// that has no value in `substitutions`
    pub fn render(
        &self,
        key: TemplateKey,
        comment_token: &str,
        strip_boilerplate: bool,
        substitutions: &Substitutions,
    ) -> Result<String> {
        let mut out = String::new();
        if strip_boilerplate {
            out.push_str(&codegen_notice(comment_token));
        }

        let mut missing = Vec::new();
        for line in key.source().lines() {
            if strip_boilerplate && line.starts_with(NOTE_PREFIX) {
                continue;
            }
            let rendered = self.placeholder.replace_all(line, |caps: &Captures<'_>| {
                match substitutions.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => {
                        if !missing.iter().any(|m: &String| m == &caps[1]) {
                            missing.push(caps[1].to_string());
                        }
                        caps[0].to_string()
                    }
                }
            });
            out.push_str(&rendered);
            out.push('\n');
        }

        if !missing.is_empty() {
            return Err(GeneratorError::InvalidArguments(format!(
                "Template {} has no value for placeholder(s): {}",
                key.name(),
                missing.join(", ")
            )));
        }

        Ok(out)
    }

    /// Renders a template and writes it to `dest`
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or `dest` cannot be written
    pub fn copy(
        &self,
        key: TemplateKey,
        dest: &Path,
        comment_token: &str,
        strip_boilerplate: bool,
        substitutions: &Substitutions,
    ) -> Result<()> {
        let contents = self.render(key, comment_token, strip_boilerplate, substitutions)?;
        fs::write(dest, &contents)?;
        tracing::debug!(
            template = key.name(),
            path = %dest.display(),
            bytes = contents.len(),
            "Copied template"
        );
        Ok(())
    }
}

/// Notice put on top of every generated file
pub(crate) fn codegen_notice(comment_token: &str) -> String {
    let lines = [
        format!("This file was auto-generated by ocpgen {}.", env!("CARGO_PKG_VERSION")),
        "Changes are overwritten by the next export.".to_string(),
    ];

    if comment_token.is_empty() {
        let mut out = String::from("/*\n");
        for line in &lines {
            out.push_str(" *    ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(" */\n\n");
        out
    } else {
        let mut out = String::new();
        for line in &lines {
            out.push_str(comment_token);
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}
