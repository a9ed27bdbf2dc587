//! Collaborator interface shared by integrator and solver exports
//!
//! The export coordinator only talks to collaborators through this trait:
//! it collects their declarations into the common header and lets each of
//! them emit its own source file.

use crate::codegen::{DataStruct, Declaration, ExportFile, FunctionDeclaration};
use crate::domain::Result;

/// A code-generating collaborator
pub trait CodeExporter {
    /// Data this collaborator needs in the given visibility class
    fn data_declarations(&self, data_struct: DataStruct) -> Vec<Declaration>;

    /// Prototypes of the functions this collaborator defines
    fn function_declarations(&self) -> Vec<FunctionDeclaration>;

    /// Emits the collaborator's function definitions
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator was not set up completely
    fn emit_body(&self, file: &mut ExportFile) -> Result<()>;
}
