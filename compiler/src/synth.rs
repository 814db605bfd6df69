use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
};

use serde::Serialize;
use serde_json::json;
use tessera_template::{Export, Output, Parameter, Resource, Template};
use tessera_tree::{
    ConstructContext, ConstructPath, Declaration, NodeId, OutputDecl, ParameterDecl, Tree,
};

use crate::{
    LogicalId,
    error::{
        IdentifierCollisionError, IdentifierCollisions, OptionsError, SynthError,
        UnresolvableReferenceError, UnresolvableReferences,
    },
    logical_id::{AllocationKey, LogicalIdAllocator, compute},
    options::SynthOptions,
    resolve::{Allocations, ExpressionResolver},
    validation::validate_tree,
};

/// Metadata key recording a resource's construct path when `path_metadata` is on.
pub const PATH_METADATA_KEY: &str = "tessera:path";

/// Result of one synthesis run.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthOutput {
    pub template: Template,
    /// Every node of the tree, in pre-order.
    pub nodes: Vec<NodeRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub path: ConstructPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Resources first, then the parameter and output IDs if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logical_ids: Vec<LogicalId>,
}

/// What one node puts into the document.
struct Contribution<'t> {
    node: NodeId,
    path: &'t ConstructPath,
    kind: Option<&'static str>,
    declarations: Vec<Cow<'t, Declaration>>,
    parameter: Option<&'t ParameterDecl>,
    output: Option<&'t OutputDecl>,
}

#[derive(Clone, Debug)]
pub struct Synthesizer {
    options: SynthOptions,
}

impl Synthesizer {
    pub fn new(options: SynthOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    /// Seal `tree` and turn it into a template.
    ///
    /// The tree stays sealed even when synthesis fails. Running twice on the same tree
    /// yields equal output.
    pub fn synthesize(&self, tree: &Tree) -> Result<SynthOutput, SynthError> {
        let span = tracing::debug_span!("synthesize", tree = %tree.id());
        let _guard = span.enter();

        tree.seal();

        validate_tree(tree)?;
        tracing::debug!(nodes = tree.len(), "validated construct tree");

        let contributions = contributions(tree);
        tracing::debug!(
            declarations = contributions
                .iter()
                .map(|c| c.declarations.len())
                .sum::<usize>(),
            "gathered declarations"
        );

        let mut collisions = Vec::new();
        let allocations = self.allocate(&contributions, &mut collisions);
        let resolver = ExpressionResolver::new(tree, &allocations);

        let mut unresolvable = Vec::new();
        let template = self.assemble(
            &contributions,
            &resolver,
            &allocations,
            &mut collisions,
            &mut unresolvable,
        );
        if !collisions.is_empty() {
            return Err(IdentifierCollisions {
                collisions,
                unresolvable,
            }
            .into());
        }
        if !unresolvable.is_empty() {
            return Err(UnresolvableReferences {
                errors: unresolvable,
            }
            .into());
        }
        tracing::debug!(
            parameters = template.parameters.len(),
            resources = template.resources.len(),
            outputs = template.outputs.len(),
            "assembled template"
        );

        let nodes = contributions
            .iter()
            .map(|c| NodeRecord {
                path: c.path.clone(),
                kind: c.kind,
                logical_ids: allocations
                    .get(c.node)
                    .map(|a| {
                        a.resources
                            .iter()
                            .chain(&a.parameter)
                            .chain(&a.output)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(SynthOutput { template, nodes })
    }

    /// Assign every entry an ID. A colliding key is recorded and still gets its computed ID
    /// so resolution can go on and report what else is wrong.
    fn allocate(
        &self,
        contributions: &[Contribution<'_>],
        collisions: &mut Vec<IdentifierCollisionError>,
    ) -> Allocations {
        let mut allocator = LogicalIdAllocator::new(&self.options);
        let mut allocations = Allocations::default();
        let mut allocate = |key: AllocationKey| {
            allocator.allocate_key(key.clone()).unwrap_or_else(|err| {
                collisions.push(err);
                compute(&key, self.options.hash_len, self.options.max_id_len)
            })
        };

        for c in contributions {
            if c.declarations.is_empty() && c.parameter.is_none() && c.output.is_none() {
                continue;
            }
            let entry = allocations.entry(c.node);
            for ordinal in 0..c.declarations.len() {
                entry.resources.push(allocate(AllocationKey {
                    path: c.path.clone(),
                    ordinal,
                }));
            }
            if c.parameter.is_some() {
                entry.parameter = Some(allocate(AllocationKey::node(c.path.clone())));
            }
            if c.output.is_some() {
                entry.output = Some(allocate(AllocationKey::node(c.path.clone())));
            }
        }

        tracing::debug!(
            ids = allocator.len(),
            collisions = collisions.len(),
            "allocated logical ids"
        );
        allocations
    }

    fn assemble(
        &self,
        contributions: &[Contribution<'_>],
        resolver: &ExpressionResolver<'_>,
        allocations: &Allocations,
        collisions: &mut Vec<IdentifierCollisionError>,
        errors: &mut Vec<UnresolvableReferenceError>,
    ) -> Template {
        let mut template = Template {
            description: self.options.description.clone(),
            ..Template::default()
        };
        let mut claims = Claims::default();

        for c in contributions {
            let Some(allocation) = allocations.get(c.node) else {
                continue;
            };
            let consumer = c.path;

            if let (Some(decl), Some(id)) = (c.parameter, &allocation.parameter) {
                claims.claim(id, || format!("parameter {consumer}"), collisions);
                let parameter = Parameter {
                    parameter_type: decl.parameter_type.clone(),
                    default: decl
                        .default
                        .as_ref()
                        .map(|v| resolver.resolve_into(consumer, v, errors)),
                    description: decl.description.clone(),
                    allowed_values: decl.allowed_values.clone(),
                    no_echo: decl.no_echo,
                };
                template.parameters.insert(id.to_string(), parameter);
            }

            for (decl, id) in c.declarations.iter().zip(&allocation.resources) {
                claims.claim(id, || format!("resource {consumer}"), collisions);
                let mut resource = Resource::new(decl.resource_type());
                resource.properties = decl
                    .properties()
                    .iter()
                    .map(|(name, value)| {
                        (name.clone(), resolver.resolve_into(consumer, value, errors))
                    })
                    .collect();

                let mut seen = HashSet::new();
                for token in decl.depends_on() {
                    match resolver.dependency(consumer, token) {
                        Ok(dep) if dep != *id && seen.insert(dep.clone()) => {
                            resource.depends_on.push(dep.to_string());
                        }
                        Ok(_) => {}
                        Err(err) => errors.push(err),
                    }
                }

                if self.options.path_metadata {
                    resource.metadata = Some(json!({ PATH_METADATA_KEY: consumer.to_string() }));
                }
                template.resources.insert(id.to_string(), resource);
            }

            if let (Some(decl), Some(id)) = (c.output, &allocation.output) {
                claims.claim(id, || format!("output {consumer}"), collisions);
                let output = Output {
                    value: resolver.resolve_into(consumer, &decl.value, errors),
                    description: decl.description.clone(),
                    export: decl.export_name.as_ref().map(|name| Export {
                        name: resolver.resolve_into(consumer, name, errors),
                    }),
                };
                template.outputs.insert(id.to_string(), output);
            }
        }

        template
    }
}

/// Gather what every node emits, in pre-order.
fn contributions(tree: &Tree) -> Vec<Contribution<'_>> {
    tree.walk(tree.root())
        .map(|node| {
            let ctx = ConstructContext::new(tree, node.id());
            let declarations = node
                .declarations()
                .iter()
                .map(Cow::Borrowed)
                .chain(
                    node.construct()
                        .into_iter()
                        .flat_map(|construct| construct.declarations(&ctx))
                        .map(Cow::Owned),
                )
                .collect();
            Contribution {
                node: node.id(),
                path: node.path(),
                kind: node.kind(),
                declarations,
                parameter: node.parameter(),
                output: node.output(),
            }
        })
        .collect()
}

/// Logical IDs already placed in some section of the document.
#[derive(Default)]
struct Claims {
    owners: HashMap<LogicalId, String>,
}

impl Claims {
    /// Claim `id` for `owner`; the first claimant keeps it. Each colliding ID is reported once.
    fn claim(
        &mut self,
        id: &LogicalId,
        owner: impl FnOnce() -> String,
        collisions: &mut Vec<IdentifierCollisionError>,
    ) {
        let Some(first) = self.owners.get(id) else {
            self.owners.insert(id.clone(), owner());
            return;
        };
        if collisions.iter().any(|c| c.logical_id == id.as_str()) {
            return;
        }
        collisions.push(IdentifierCollisionError {
            logical_id: id.to_string(),
            first: first.clone(),
            second: owner(),
        });
    }
}

/// Synthesize with default options.
pub fn synthesize(tree: &Tree) -> Result<SynthOutput, SynthError> {
    Synthesizer {
        options: SynthOptions::default(),
    }
    .synthesize(tree)
}
