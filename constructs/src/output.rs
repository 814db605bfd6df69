use bon::Builder;
use tessera_tree::{NodeId, OutputDecl, Tree, TreeError, Value};

#[derive(Builder, Clone, Debug)]
pub struct CfnOutputProps {
    #[builder(into)]
    pub value: Value,
    #[builder(into)]
    pub description: Option<String>,
    /// Exports the value under this name for other templates to import.
    #[builder(into)]
    pub export_name: Option<Value>,
}

#[derive(Clone, Copy, Debug)]
pub struct CfnOutput {
    node: NodeId,
}

impl CfnOutput {
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: CfnOutputProps,
    ) -> Result<Self, TreeError> {
        let node = tree.scope(scope, id)?;
        tree.add_output(
            node,
            OutputDecl {
                value: props.value,
                description: props.description,
                export_name: props.export_name,
            },
        )?;
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}
