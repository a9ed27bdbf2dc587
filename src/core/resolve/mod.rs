//! Component resolution
//!
//! - [`session`] - the export session and its `NotInitialized -> Ready` lifecycle
//! - [`plan`] - the resolved integrator/solver pair and the constants derived from it

pub mod plan;
pub mod session;

pub use plan::{HeaderConstant, ResolvedPlan, SharedConstants, HEADER_CONSTANT_PREFIX};
pub use session::{ExportSession, SessionStatus};
