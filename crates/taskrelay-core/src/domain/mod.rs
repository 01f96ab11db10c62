//! Domain - 値の型
//!
//! descriptor, names, redirect chain, decision, envelope, errors。
//! I/O も collaborator も持たない。

pub mod decision;
pub mod descriptor;
pub mod envelope;
pub mod errors;
pub mod ids;
pub mod names;
pub mod redirect;
pub mod task;

pub use decision::{DispatchDecision, GuardOutcome};
pub use descriptor::{Guard, Guards, TaskDescriptor, VALID_FIELDS};
pub use envelope::ResultEnvelope;
pub use errors::{
    CoreError, ErrorKind, ExecutorError, HandlerError, ResolutionError, TemplateError,
    ValidationError,
};
pub use ids::InvocationId;
pub use names::{CanonicalName, ImplementationKind};
pub use redirect::{RedirectChain, ResolvedPlugin};
pub use task::TaskContext;
