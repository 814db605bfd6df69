
mod error;
mod logical_id;
mod options;
pub mod reporter;
mod resolve;
mod synth;
mod validation;

pub use error::{
    DanglingReason, IdentifierCollisionError, IdentifierCollisions, OptionsError, SynthError,
    UnresolvableReferenceError, UnresolvableReferences, ValidationError, ValidationFailure,
};
pub use logical_id::{AllocationKey, LogicalId, LogicalIdAllocator, compute as compute_logical_id};
pub use options::{DEFAULT_HASH_LEN, DEFAULT_MAX_ID_LEN, SynthOptions};
pub use resolve::{Allocations, ExpressionResolver, NodeAllocation};
pub use synth::{NodeRecord, PATH_METADATA_KEY, SynthOutput, Synthesizer, synthesize};
pub use validation::validate_tree;
