use tessera_tree::{ConstructContext, Tree, Violation};

use crate::error::{ValidationError, ValidationFailure};

/// Run every construct's own checks and every attached validation, in tree order.
///
/// All failures are collected before returning so callers see the whole picture at once.
pub fn validate_tree(tree: &Tree) -> Result<(), ValidationError> {
    let mut failures = Vec::new();

    for node in tree.walk(tree.root()) {
        let ctx = ConstructContext::new(tree, node.id());
        let violations = node
            .construct()
            .into_iter()
            .flat_map(|construct| construct.validate(&ctx))
            .chain(
                node.validations()
                    .iter()
                    .flat_map(|validation| validation.validate(&ctx)),
            );

        failures.extend(violations.map(|Violation { option, message }| {
            tracing::debug!(path = %node.path(), ?option, %message, "validation failed");
            ValidationFailure {
                path: node.path().clone(),
                option,
                message,
            }
        }));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { failures })
    }
}
