//! Building blocks of generated C code
//!
//! - [`declarations`] - data and function declarations collected into the common header
//! - [`file`] - the source file sink collaborators emit their code into

pub mod declarations;
pub mod file;

pub use declarations::{
    render_declarations, render_functions, DataStruct, Declaration, FunctionDeclaration,
    Parameter, ScalarType,
};
pub use file::ExportFile;
