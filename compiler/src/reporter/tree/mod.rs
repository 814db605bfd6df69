
use serde::Serialize;
use tessera_tree::ConstructPath;

use super::{Reporter, ReporterError, pretty_json};
use crate::{LogicalId, NodeRecord, SynthOutput};

/// Renders the construct tree with the logical IDs each node received.
///
/// Lets tooling map an ID in the template back to the construct that produced it.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeReporter;

impl Reporter for TreeReporter {
    type Artifact = String;

    fn emit(&self, output: &SynthOutput) -> Result<Self::Artifact, ReporterError> {
        pretty_json("construct tree", &nest(&output.nodes))
    }
}

#[derive(Debug, Serialize)]
struct TreeNode<'a> {
    path: &'a ConstructPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "no_ids")]
    logical_ids: &'a [LogicalId],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    fn new(record: &'a NodeRecord) -> Self {
        Self {
            path: &record.path,
            kind: record.kind,
            logical_ids: &record.logical_ids,
            children: Vec::new(),
        }
    }
}

fn no_ids(ids: &&[LogicalId]) -> bool {
    ids.is_empty()
}

/// Rebuild the hierarchy from pre-order records.
///
/// Keeps a stack of open ancestors. Each record first closes every open node that is
/// not its ancestor.
fn nest(records: &[NodeRecord]) -> Option<TreeNode<'_>> {
    let mut stack: Vec<TreeNode<'_>> = Vec::new();

    for record in records {
        while stack.len() > 1
            && stack
                .last()
                .is_some_and(|open| !record.path.starts_with(open.path))
        {
            close(&mut stack);
        }
        stack.push(TreeNode::new(record));
    }
    while stack.len() > 1 {
        close(&mut stack);
    }
    stack.pop()
}

fn close(stack: &mut Vec<TreeNode<'_>>) {
    if let Some(done) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(done);
    }
}
