//! Auxiliary functions exported with every solver

use super::emitter::{module_substitutions, Substitutions, TemplateEmitter, TemplateKey};
use crate::domain::{ModuleName, Result};
use std::path::{Path, PathBuf};

/// `<module>_auxiliary_functions.{h,c}`: trajectory accessors, printing
/// helpers and a wall-clock timer
#[derive(Debug, Clone)]
pub struct AuxiliaryFunctions {
    header: PathBuf,
    source: PathBuf,
    substitutions: Substitutions,
}

impl AuxiliaryFunctions {
    pub fn new(dir: &Path, module: &ModuleName) -> Self {
        Self {
            header: dir.join(module.file_name("auxiliary_functions", "h")),
            source: dir.join(module.file_name("auxiliary_functions", "c")),
            substitutions: module_substitutions(module),
        }
    }

    /// Writes both files and returns their paths
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written
    pub fn export(&self, emitter: &TemplateEmitter) -> Result<Vec<PathBuf>> {
        emitter.copy(
            TemplateKey::AuxiliaryFunctionsHeader,
            &self.header,
            "",
            true,
            &self.substitutions,
        )?;
        emitter.copy(
            TemplateKey::AuxiliaryFunctionsSource,
            &self.source,
            "",
            true,
            &self.substitutions,
        )?;
        Ok(vec![self.header.clone(), self.source.clone()])
    }
}
