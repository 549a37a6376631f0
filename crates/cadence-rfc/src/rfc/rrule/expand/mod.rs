//! Occurrence expansion.
//!
//! A [`BaseGenerator`] produces periodic candidates, the rule's [`Pipeline`]
//! of [`FieldOperator`]s filters and expands them, and [`Occurrences`] drives
//! both lazily. [`OffsetSchedule`] is an experimental direct-index variant.

mod generator;
mod occurrences;
mod offset;
mod operator;
mod options;
mod pipeline;

pub use generator::BaseGenerator;
pub use occurrences::Occurrences;
pub use offset::{Offset, OffsetSchedule};
pub use operator::{FieldFilter, FieldOperator, FieldTransformer, OperatorKind};
pub use options::ExpansionOptions;
pub use pipeline::Pipeline;
