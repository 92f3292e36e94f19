//! Module dependency graph extracted from Rust sources.
//!
//! Each file is parsed with `syn`; every `use` tree and path it mentions is
//! resolved to the top-level module ("slice") it points at. Items gated by
//! `#[cfg(test)]` are not part of the production graph and are skipped, and
//! so are the files behind an out-of-line `#[cfg(test)] mod tests;`.
//!
//! Macro bodies are read when they parse as comma-separated expressions
//! (`vec![..]`, `format!(..)`); anything else inside a macro is not seen.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{Expr, Token};

use crate::{ArchitectureLintError, LintSource};

/// Facts gathered from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the crate's `src/`.
    pub file: PathBuf,
    /// Module path derived from the file path (empty for crate roots).
    pub module_path: Vec<String>,
    /// Top-level modules this file refers to, excluding its own.
    pub dependencies: BTreeSet<String>,
    /// Structs, enums, traits and unions declared in the file.
    pub declared_types: Vec<String>,
}

impl SourceFile {
    /// The top-level module this file belongs to; `None` for crate roots.
    pub fn slice(&self) -> Option<&str> {
        self.module_path.first().map(String::as_str)
    }

    pub fn depends_on(&self, module: &str) -> bool {
        self.dependencies.contains(module)
    }
}

/// Dependency graph of a single crate.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    files: Vec<SourceFile>,
}

impl ModuleGraph {
    /// Build the graph from in-memory sources.
    ///
    /// `crate_alias` is the name other code uses for this crate (for example
    /// the `[lib] name`); paths starting with it are treated like `crate::`.
    pub fn from_sources(
        sources: &[LintSource],
        crate_alias: Option<&str>,
    ) -> Result<Self, ArchitectureLintError> {
        let mut parsed = Vec::with_capacity(sources.len());
        let mut test_modules = Vec::new();
        for source in sources {
            let file =
                syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                    file: source.file.clone(),
                    message: err.to_string(),
                })?;
            let module_path = module_path_for(&source.file);

            let mut collector = PathCollector::default();
            collector.visit_file(&file);
            test_modules.extend(collector.test_modules.iter().map(|nested| {
                let mut path = module_path.clone();
                path.extend(nested.iter().cloned());
                path
            }));
            parsed.push((source, module_path, collector));
        }

        // Files holding `#[cfg(test)] mod x;` and everything below them.
        parsed.retain(|(_, module_path, _)| {
            !test_modules
                .iter()
                .any(|test_module| module_path.starts_with(test_module))
        });

        let slices = parsed
            .iter()
            .filter_map(|(_, path, _)| path.first().cloned())
            .collect::<BTreeSet<_>>();

        let mut files = Vec::with_capacity(parsed.len());
        for (source, module_path, collector) in parsed {
            let resolver = PathResolver {
                module_path: &module_path,
                slices: &slices,
                crate_alias,
            };
            let own_slice = module_path.first();
            let dependencies = collector
                .paths
                .iter()
                .filter_map(|segments| resolver.top_level_module(segments))
                .filter(|module| Some(module) != own_slice)
                .collect();

            files.push(SourceFile {
                file: source.file.clone(),
                module_path,
                dependencies,
                declared_types: collector.declared_types,
            });
        }

        Ok(Self { files })
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Files that belong to the given top-level module.
    pub fn files_in<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a SourceFile> + 'a {
        self.files
            .iter()
            .filter(move |file| file.slice() == Some(module))
    }

    /// Slice-level edges, each mapped to the first file that introduces it.
    pub fn slice_edges(&self) -> BTreeMap<(String, String), PathBuf> {
        let mut edges = BTreeMap::new();
        for file in &self.files {
            let Some(from) = file.slice() else {
                continue;
            };
            for to in &file.dependencies {
                edges
                    .entry((from.to_owned(), to.clone()))
                    .or_insert_with(|| file.file.clone());
            }
        }
        edges
    }
}

/// Derive the module path from a path relative to `src/`.
///
/// `lib.rs`, `main.rs` and anything under `bin/` are crate roots.
fn module_path_for(relative: &Path) -> Vec<String> {
    let mut segments = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>();

    if segments.first().is_some_and(|first| first == "bin") {
        return Vec::new();
    }

    if let Some(last) = segments.pop() {
        let stem = last.strip_suffix(".rs").unwrap_or(&last).to_owned();
        let is_root_file = segments.is_empty() && matches!(stem.as_str(), "lib" | "main");
        if stem != "mod" && !is_root_file {
            segments.push(stem);
        }
    }
    segments
}

struct PathResolver<'a> {
    module_path: &'a [String],
    slices: &'a BTreeSet<String>,
    crate_alias: Option<&'a str>,
}

impl PathResolver<'_> {
    /// Resolve a path to the top-level module it names, if it is internal.
    fn top_level_module(&self, segments: &[String]) -> Option<String> {
        let first = segments.first()?.as_str();

        let resolved = if first == "crate" || Some(first) == self.crate_alias {
            segments.get(1)?.clone()
        } else if first == "self" || first == "super" {
            let mut base = self.module_path.to_vec();
            let mut rest = segments;
            if rest.first().is_some_and(|s| s == "self") {
                rest = &rest[1..];
            }
            while rest.first().is_some_and(|s| s == "super") {
                base.pop()?;
                rest = &rest[1..];
            }
            base.first().or_else(|| rest.first())?.clone()
        } else if segments.len() > 1 && self.slices.contains(first) {
            // `domain::User`; a lone `domain` is a local binding.
            first.to_owned()
        } else {
            return None;
        };

        self.slices.contains(&resolved).then_some(resolved)
    }
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
    declared_types: Vec<String>,
    /// Inline `mod` blocks enclosing the item being visited.
    enclosing: Vec<String>,
    /// Out-of-line `#[cfg(test)]` modules, relative to the file's module.
    test_modules: Vec<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return;
        }
        self.paths.insert(segments);
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                let mut next = prefix;
                next.push(path.ident.to_string());
                self.record_use_tree(&path.tree, next);
            }
            syn::UseTree::Name(name) => {
                let mut segments = prefix;
                segments.push(name.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Rename(rename) => {
                let mut segments = prefix;
                segments.push(rename.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix;
                segments.push("*".to_owned());
                self.paths.insert(segments);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_item(&mut self, node: &'ast syn::Item) {
        if item_attrs(node).iter().any(is_cfg_test) {
            if let syn::Item::Mod(module) = node {
                if module.content.is_none() {
                    let mut path = self.enclosing.clone();
                    path.push(module.ident.to_string());
                    self.test_modules.push(path);
                }
            }
            return;
        }
        match node {
            syn::Item::Struct(item) => self.declared_types.push(item.ident.to_string()),
            syn::Item::Enum(item) => self.declared_types.push(item.ident.to_string()),
            syn::Item::Trait(item) => self.declared_types.push(item.ident.to_string()),
            syn::Item::Union(item) => self.declared_types.push(item.ident.to_string()),
            _ => {}
        }
        syn::visit::visit_item(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.enclosing.push(node.ident.to_string());
        syn::visit::visit_item_mod(self, node);
        self.enclosing.pop();
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        self.visit_path(&node.path);
        if let Ok(args) = node.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            for arg in &args {
                Visit::visit_expr(&mut *self, arg);
            }
        }
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn item_attrs(item: &syn::Item) -> &[syn::Attribute] {
    match item {
        syn::Item::Const(item) => &item.attrs,
        syn::Item::Enum(item) => &item.attrs,
        syn::Item::ExternCrate(item) => &item.attrs,
        syn::Item::Fn(item) => &item.attrs,
        syn::Item::ForeignMod(item) => &item.attrs,
        syn::Item::Impl(item) => &item.attrs,
        syn::Item::Macro(item) => &item.attrs,
        syn::Item::Mod(item) => &item.attrs,
        syn::Item::Static(item) => &item.attrs,
        syn::Item::Struct(item) => &item.attrs,
        syn::Item::Trait(item) => &item.attrs,
        syn::Item::TraitAlias(item) => &item.attrs,
        syn::Item::Type(item) => &item.attrs,
        syn::Item::Union(item) => &item.attrs,
        syn::Item::Use(item) => &item.attrs,
        _ => &[],
    }
}

/// `#[cfg(test)]` exactly; compound predicates are kept.
fn is_cfg_test(attr: &syn::Attribute) -> bool {
    attr.path().is_ident("cfg")
        && attr
            .parse_args::<syn::Ident>()
            .is_ok_and(|ident| ident == "test")
}
