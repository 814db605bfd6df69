
use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

mod construct;
mod declaration;
mod error;
mod names;
mod path;
mod token;
mod value;
mod walk;

pub use construct::{Construct, ConstructContext, Validation, Violation};
pub use declaration::{Declaration, OutputDecl, ParameterDecl};
pub use error::{DuplicateNameError, TreeError};
pub use names::ConstructName;
pub use path::ConstructPath;
pub use token::{Token, TokenKind, TreeId};
pub use value::{Fragment, Pseudo, Value};
pub use walk::Walk;

/// Handle to a node, valid only for the tree that handed it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    tree: TreeId,
    index: usize,
}

impl NodeId {
    pub fn tree(self) -> TreeId {
        self.tree
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/node#{}", self.tree, self.index)
    }
}

/// One construct in the tree.
///
/// Nodes are owned by their [`Tree`]; the parent link is an index, never ownership.
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    path: ConstructPath,
    children: Vec<NodeId>,
    construct: Option<Box<dyn Construct>>,
    declarations: Vec<Declaration>,
    validations: Vec<Box<dyn Validation>>,
    parameter: Option<ParameterDecl>,
    output: Option<OutputDecl>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// `None` only for the root.
    pub fn name(&self) -> Option<&ConstructName> {
        self.path.local_name()
    }

    pub fn path(&self) -> &ConstructPath {
        &self.path
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn construct(&self) -> Option<&dyn Construct> {
        self.construct.as_deref()
    }

    pub fn kind(&self) -> Option<&'static str> {
        self.construct.as_ref().map(|c| c.kind())
    }

    /// Declarations added eagerly with [`Tree::add_resource`].
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn validations(&self) -> &[Box<dyn Validation>] {
        &self.validations
    }

    pub fn parameter(&self) -> Option<&ParameterDecl> {
        self.parameter.as_ref()
    }

    pub fn output(&self) -> Option<&OutputDecl> {
        self.output.as_ref()
    }

    /// Mint a token referring to this node.
    pub fn token(&self, kind: TokenKind) -> Token {
        Token::new(self.id.tree, self.path.clone(), kind)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("kind", &self.kind())
            .field("children", &self.children)
            .field("declarations", &self.declarations)
            .field("validations", &self.validations.len())
            .field("parameter", &self.parameter)
            .field("output", &self.output)
            .finish()
    }
}

/// The construct tree: a build phase of sequential mutation followed by read-only synthesis.
pub struct Tree {
    id: TreeId,
    nodes: Vec<Node>,
    by_path: HashMap<ConstructPath, NodeId>,
    sealed: AtomicBool,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let id = TreeId::next();
        let root = Node {
            id: NodeId { tree: id, index: 0 },
            parent: None,
            path: ConstructPath::root(),
            children: Vec::new(),
            construct: None,
            declarations: Vec::new(),
            validations: Vec::new(),
            parameter: None,
            output: None,
        };
        Self {
            id,
            by_path: HashMap::from([(ConstructPath::root(), root.id)]),
            nodes: vec![root],
            sealed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            tree: self.id,
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Panics if `id` was not handed out by this tree; use [`Tree::get`] for foreign handles.
    pub fn node(&self, id: NodeId) -> &Node {
        self.get(id).expect("node should exist in this tree")
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.tree != self.id {
            return None;
        }
        self.nodes.get(id.index)
    }

    pub fn path(&self, id: NodeId) -> &ConstructPath {
        self.node(id).path()
    }

    pub fn find(&self, path: &ConstructPath) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let parent = self.get(parent)?;
        parent
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.index].name().map(ConstructName::as_str) == Some(name))
    }

    pub fn walk(&self, from: NodeId) -> Walk<'_> {
        Walk::new(self, from)
    }

    /// Mint a token referring to `node`. Fails for handles from another tree.
    pub fn token(&self, node: NodeId, kind: TokenKind) -> Result<Token, TreeError> {
        self.get(node)
            .map(|node| node.token(kind))
            .ok_or(TreeError::UnknownNode(node))
    }

    /// Start the read-only phase. Idempotent.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Attach a plain grouping node.
    pub fn scope(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.attach_node(parent, name, None)
    }

    /// Attach a node carrying construct capabilities.
    pub fn attach(
        &mut self,
        parent: NodeId,
        name: &str,
        construct: impl Construct,
    ) -> Result<NodeId, TreeError> {
        self.attach_node(parent, name, Some(Box::new(construct)))
    }

    fn attach_node(
        &mut self,
        parent: NodeId,
        name: &str,
        construct: Option<Box<dyn Construct>>,
    ) -> Result<NodeId, TreeError> {
        let parent_path = self.mutable(parent)?.path.clone();
        let name = ConstructName::new(name)?;
        let path = parent_path.child(name.clone());
        if self.by_path.contains_key(&path) {
            return Err(DuplicateNameError {
                parent: parent_path,
                name: name.to_string(),
            }
            .into());
        }

        let id = NodeId {
            tree: self.id,
            index: self.nodes.len(),
        };
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            path: path.clone(),
            children: Vec::new(),
            construct,
            declarations: Vec::new(),
            validations: Vec::new(),
            parameter: None,
            output: None,
        });
        self.nodes[parent.index].children.push(id);
        self.by_path.insert(path, id);
        Ok(id)
    }

    pub fn add_resource(&mut self, node: NodeId, declaration: Declaration) -> Result<(), TreeError> {
        self.mutable(node)?.declarations.push(declaration);
        Ok(())
    }

    pub fn add_validation(
        &mut self,
        node: NodeId,
        validation: impl Validation,
    ) -> Result<(), TreeError> {
        self.mutable(node)?.validations.push(Box::new(validation));
        Ok(())
    }

    pub fn add_parameter(
        &mut self,
        node: NodeId,
        parameter: ParameterDecl,
    ) -> Result<(), TreeError> {
        let node = self.mutable(node)?;
        if node.parameter.is_some() {
            return Err(TreeError::ParameterAlreadyDefined {
                path: node.path.clone(),
            });
        }
        node.parameter = Some(parameter);
        Ok(())
    }

    pub fn add_output(&mut self, node: NodeId, output: OutputDecl) -> Result<(), TreeError> {
        let node = self.mutable(node)?;
        if node.output.is_some() {
            return Err(TreeError::OutputAlreadyDefined {
                path: node.path.clone(),
            });
        }
        node.output = Some(output);
        Ok(())
    }

    fn mutable(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        let sealed = self.is_sealed();
        if id.tree != self.id {
            return Err(TreeError::UnknownNode(id));
        }
        let node = self
            .nodes
            .get_mut(id.index)
            .ok_or(TreeError::UnknownNode(id))?;
        if sealed {
            return Err(TreeError::Sealed {
                path: node.path.clone(),
            });
        }
        Ok(node)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("id", &self.id)
            .field("nodes", &self.nodes)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}
