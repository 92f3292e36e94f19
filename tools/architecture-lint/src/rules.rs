//! Declarative architecture rules and their evaluation.
//!
//! Rules name top-level modules of the analysed crate. A layer is a named
//! top-level module; crate-root files (`lib.rs`, `main.rs`) are the
//! composition root and are never treated as an accessor.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::graph::ModuleGraph;
use crate::Violation;

/// A named layer backed by a top-level module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub module: String,
}

/// Who may depend on a layer. An empty `allowed` list means nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AccessConstraint {
    layer: String,
    allowed: Vec<String>,
}

/// Layer definitions plus access constraints between them.
///
/// Any dependency on a constrained layer from a module outside its allowed
/// layers is a violation, including modules that belong to no layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredArchitecture {
    layers: Vec<Layer>,
    constraints: Vec<AccessConstraint>,
}

impl LayeredArchitecture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a layer by the top-level module that holds it.
    pub fn layer(mut self, name: impl Into<String>, module: impl Into<String>) -> Self {
        self.layers.push(Layer {
            name: name.into(),
            module: module.into(),
        });
        self
    }

    pub fn may_not_be_accessed_by_any_layer(self, layer: impl Into<String>) -> Self {
        self.may_only_be_accessed_by_layers(layer, &[])
    }

    pub fn may_only_be_accessed_by_layers(mut self, layer: impl Into<String>, allowed: &[&str]) -> Self {
        self.constraints.push(AccessConstraint {
            layer: layer.into(),
            allowed: allowed.iter().map(|name| (*name).to_owned()).collect(),
        });
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn layer_for_module(&self, module: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.module == module)
    }

    fn module_for_layer(&self, name: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.module.as_str())
    }

    fn evaluate(&self, rule: &str, graph: &ModuleGraph) -> Vec<Violation> {
        let mut violations = Vec::new();
        for constraint in &self.constraints {
            let Some(target_module) = self.module_for_layer(&constraint.layer) else {
                continue;
            };
            for file in graph.files() {
                let Some(slice) = file.slice() else {
                    continue;
                };
                if !file.depends_on(target_module) {
                    continue;
                }
                let accessor = self.layer_for_module(slice);
                let permitted = accessor
                    .is_some_and(|layer| constraint.allowed.iter().any(|name| *name == layer.name));
                if permitted {
                    continue;
                }
                let accessor_name = accessor.map_or(slice, |layer| layer.name.as_str());
                violations.push(Violation {
                    rule: rule.to_owned(),
                    file: file.file.clone(),
                    message: format!(
                        "{accessor_name} depends on layer {} ({})",
                        constraint.layer,
                        describe_allowed(&constraint.allowed)
                    ),
                });
            }
        }
        violations
    }
}

fn describe_allowed(allowed: &[String]) -> String {
    if allowed.is_empty() {
        "may not be accessed by any layer".to_owned()
    } else {
        format!("may only be accessed by {}", allowed.join(", "))
    }
}

/// What a rule asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Layer access constraints.
    Layered(LayeredArchitecture),
    /// No module in `from` may depend on `to`.
    NoDependency { from: String, to: String },
    /// Only modules listed in `accessors` may depend on `target`.
    OnlyAccessedBy { target: String, accessors: Vec<String> },
    /// Types declared in `module` must end with `suffix`.
    NameSuffix { module: String, suffix: String },
    /// The top-level modules must not depend on each other cyclically.
    FreeOfCycles,
}

/// A rule with its rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchRule {
    pub kind: RuleKind,
    pub because: Option<String>,
}

impl ArchRule {
    pub fn layered(architecture: LayeredArchitecture) -> Self {
        Self::from(RuleKind::Layered(architecture))
    }

    pub fn no_dependency(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::from(RuleKind::NoDependency {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn only_accessed_by(target: impl Into<String>, accessors: &[&str]) -> Self {
        Self::from(RuleKind::OnlyAccessedBy {
            target: target.into(),
            accessors: accessors.iter().map(|name| (*name).to_owned()).collect(),
        })
    }

    pub fn name_suffix(module: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::from(RuleKind::NameSuffix {
            module: module.into(),
            suffix: suffix.into(),
        })
    }

    pub fn free_of_cycles() -> Self {
        Self::from(RuleKind::FreeOfCycles)
    }

    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.because = Some(reason.into());
        self
    }

    /// One-line statement of the rule, including its rationale.
    pub fn description(&self) -> String {
        let base = match &self.kind {
            RuleKind::Layered(architecture) => {
                let names = architecture
                    .layers()
                    .iter()
                    .map(|layer| layer.name.as_str())
                    .collect::<Vec<_>>();
                format!("layered architecture [{}] is respected", names.join(", "))
            }
            RuleKind::NoDependency { from, to } => {
                format!("no module in `{from}` should depend on `{to}`")
            }
            RuleKind::OnlyAccessedBy { target, accessors } => format!(
                "`{target}` should only be accessed by `{}`",
                accessors.join("`, `")
            ),
            RuleKind::NameSuffix { module, suffix } => {
                format!("types in `{module}` should have names ending with `{suffix}`")
            }
            RuleKind::FreeOfCycles => "top-level modules should be free of cycles".to_owned(),
        };
        match &self.because {
            Some(reason) => format!("{base}, because {reason}"),
            None => base,
        }
    }

    /// Evaluate the rule, returning every violation found.
    pub fn evaluate(&self, graph: &ModuleGraph) -> Vec<Violation> {
        let description = self.description();
        let rule = description.as_str();
        match &self.kind {
            RuleKind::Layered(architecture) => architecture.evaluate(rule, graph),
            RuleKind::NoDependency { from, to } => graph
                .files_in(from)
                .filter(|file| file.depends_on(to))
                .map(|file| Violation {
                    rule: rule.to_owned(),
                    file: file.file.clone(),
                    message: format!("`{from}` depends on `{to}`"),
                })
                .collect(),
            RuleKind::OnlyAccessedBy { target, accessors } => graph
                .files()
                .iter()
                .filter(|file| file.depends_on(target))
                .filter_map(|file| {
                    let slice = file.slice()?;
                    (!accessors.iter().any(|accessor| accessor == slice)).then(|| Violation {
                        rule: rule.to_owned(),
                        file: file.file.clone(),
                        message: format!("`{slice}` depends on `{target}`"),
                    })
                })
                .collect(),
            RuleKind::NameSuffix { module, suffix } => graph
                .files_in(module)
                .flat_map(|file| {
                    file.declared_types
                        .iter()
                        .filter(move |name| !name.ends_with(suffix.as_str()))
                        .map(move |name| Violation {
                            rule: rule.to_owned(),
                            file: file.file.clone(),
                            message: format!("type `{name}` does not end with `{suffix}`"),
                        })
                })
                .collect(),
            RuleKind::FreeOfCycles => find_cycles(graph)
                .into_iter()
                .map(|(cycle, file)| Violation {
                    rule: rule.to_owned(),
                    file,
                    message: format!("cycle detected: {}", cycle.join(" -> ")),
                })
                .collect(),
        }
    }
}

impl From<RuleKind> for ArchRule {
    fn from(kind: RuleKind) -> Self {
        Self {
            kind,
            because: None,
        }
    }
}

/// Find every elementary dependency cycle among top-level modules.
///
/// Each cycle is reported once, starting at its smallest module and closed
/// by repeating that module, paired with the file introducing its first edge.
fn find_cycles(graph: &ModuleGraph) -> Vec<(Vec<String>, PathBuf)> {
    let edges = graph.slice_edges();
    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (from, to) in edges.keys() {
        adjacency.entry(from.as_str()).or_default().insert(to.as_str());
    }

    // A cycle is found only from its smallest member, so each appears once.
    let mut found = BTreeSet::new();
    for start in adjacency.keys().copied() {
        let mut stack = vec![start];
        walk(start, start, &adjacency, &mut stack, &mut found);
    }

    found
        .into_iter()
        .map(|cycle: Vec<String>| {
            let file = cycle
                .first()
                .zip(cycle.get(1))
                .and_then(|(from, to)| edges.get(&(from.clone(), to.clone())))
                .cloned()
                .unwrap_or_default();
            (cycle, file)
        })
        .collect()
}

fn walk<'a>(
    start: &'a str,
    node: &'a str,
    adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    stack: &mut Vec<&'a str>,
    found: &mut BTreeSet<Vec<String>>,
) {
    let Some(next) = adjacency.get(node) else {
        return;
    };
    for &target in next {
        if target == start {
            let mut cycle = stack.iter().map(|name| (*name).to_owned()).collect::<Vec<_>>();
            cycle.push(start.to_owned());
            found.insert(cycle);
        } else if target > start && !stack.contains(&target) {
            stack.push(target);
            walk(start, target, adjacency, stack, found);
            stack.pop();
        }
    }
}

/// The rule set for a controller/service/repository/domain crate.
pub fn layered_service_rules() -> Vec<ArchRule> {
    vec![
        ArchRule::layered(
            LayeredArchitecture::new()
                .layer("Controller", "controller")
                .layer("Service", "service")
                .layer("Repository", "repository")
                .layer("Domain", "domain")
                .may_not_be_accessed_by_any_layer("Controller")
                .may_only_be_accessed_by_layers("Service", &["Controller"])
                .may_only_be_accessed_by_layers("Repository", &["Service"])
                .may_only_be_accessed_by_layers("Domain", &["Controller", "Service", "Repository"]),
        ),
        ArchRule::no_dependency("repository", "controller")
            .because("repositories belong to the data layer and must not know the presentation layer"),
        ArchRule::no_dependency("service", "controller")
            .because("services belong to the business layer and must not know the presentation layer"),
        ArchRule::only_accessed_by("repository", &["service"])
            .because("repositories are only reached through the service layer"),
        ArchRule::name_suffix("controller", "Controller"),
        ArchRule::name_suffix("service", "Service"),
        ArchRule::name_suffix("repository", "Repository"),
        ArchRule::free_of_cycles()
            .because("dependency cycles make the code hard to maintain and evolve"),
    ]
}
