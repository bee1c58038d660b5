//! Manifest model
//!
//! This module provides:
//! - Parsing a pom.xml into an immutable [`Manifest`]
//! - Scoped property lookup and recursive `${...}` interpolation
//! - The bipartite property graph linking properties to the requirements using them
//! - Format-preserving patch application ([`apply_patch`], [`ManifestWriter`])

mod pom;
mod writer;

pub use pom::Coordinates;
pub use writer::{apply_patch, read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::domain::{ManifestPatch, PackageKey, PropertyScope, Requirement};
use crate::error::ManifestError;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `${name}` placeholder syntax
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}]+)\}").unwrap());

/// Nesting limit for property values referencing other properties
const MAX_RESOLVE_DEPTH: usize = 32;

/// Returns the distinct placeholder names used in `text`, in order of appearance
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// A named property declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub scope: PropertyScope,
}

/// Properties grouped by scope, in declaration order
///
/// A name declared twice in one scope keeps its first position but the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    scopes: IndexMap<PropertyScope, IndexMap<String, String>>,
}

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property; a later declaration overrides the value of an earlier one
    pub fn insert(&mut self, scope: PropertyScope, name: impl Into<String>, value: impl Into<String>) {
        self.scopes
            .entry(scope)
            .or_default()
            .insert(name.into(), value.into());
    }

    /// Value declared in exactly this scope
    pub fn get(&self, scope: &PropertyScope, name: &str) -> Option<&str> {
        self.scopes
            .get(scope)
            .and_then(|props| props.get(name))
            .map(String::as_str)
    }

    /// Scope that provides `name` to a requirement in `scope`: local first, then root
    pub fn locate(&self, scope: &PropertyScope, name: &str) -> Option<PropertyScope> {
        if self.get(scope, name).is_some() {
            return Some(scope.clone());
        }
        self.get(&PropertyScope::Root, name)
            .map(|_| PropertyScope::Root)
    }

    /// Iterate over all properties
    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        self.scopes.iter().flat_map(|(scope, props)| {
            props.iter().map(move |(name, value)| Property {
                name: name.clone(),
                value: value.clone(),
                scope: scope.clone(),
            })
        })
    }

    /// Number of distinct (scope, name) pairs
    pub fn len(&self) -> usize {
        self.scopes.values().map(IndexMap::len).sum()
    }

    /// Returns true if no property is declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identity of a declared property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyRef {
    pub scope: PropertyScope,
    pub name: String,
}

impl PropertyRef {
    pub fn new(scope: PropertyScope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }
}

/// Which requirements reference which declared properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGraph {
    members: IndexMap<PropertyRef, Vec<usize>>,
    refs: Vec<Vec<PropertyRef>>,
}

impl PropertyGraph {
    fn add_requirement(&mut self, index: usize, refs: Vec<PropertyRef>) {
        for r in &refs {
            self.members.entry(r.clone()).or_default().push(index);
        }
        if self.refs.len() <= index {
            self.refs.resize(index + 1, Vec::new());
        }
        self.refs[index] = refs;
    }

    /// Requirement indices referencing the property
    pub fn members(&self, property: &PropertyRef) -> &[usize] {
        self.members
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Declared properties referenced by a requirement's text
    pub fn refs(&self, requirement: usize) -> &[PropertyRef] {
        self.refs
            .get(requirement)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Referenced properties in order of first use
    pub fn properties(&self) -> impl Iterator<Item = &PropertyRef> {
        self.members.keys()
    }
}

/// Parsed, immutable manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Root project coordinates
    pub root: Coordinates,
    /// Parent project coordinates, if any
    pub parent: Option<Coordinates>,
    /// Requirements in document order
    pub requirements: Vec<Requirement>,
    /// Scope tags per package
    pub groups: IndexMap<PackageKey, Vec<String>>,
    /// Declared properties
    pub properties: PropertySet,
    /// Property to requirement links
    pub graph: PropertyGraph,
}

impl Manifest {
    /// Parse pom.xml text
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let scan = pom::scan(text)?;

        let mut properties = PropertySet::new();
        for prop in &scan.properties {
            debug!(scope = %prop.scope, name = %prop.name, value = %prop.value, "Found property");
            properties.insert(prop.scope.clone(), prop.name.clone(), prop.value.clone());
        }

        let mut manifest = Manifest {
            root: scan.root,
            parent: scan.parent,
            requirements: Vec::new(),
            groups: IndexMap::new(),
            properties,
            graph: PropertyGraph::default(),
        };

        let mut seen = HashSet::new();
        for dep in scan.dependencies {
            if !seen.insert((dep.package.clone(), dep.origin.clone())) {
                warn!(
                    "Duplicate declaration of {} in '{}', keeping the first",
                    dep.package, dep.origin
                );
                continue;
            }

            let scope = dep.origin.property_scope();
            let resolved = manifest.resolve(&dep.declared, &scope);
            let refs: Vec<PropertyRef> = placeholder_names(&dep.declared)
                .into_iter()
                .filter_map(|name| {
                    manifest
                        .properties
                        .locate(&scope, &name)
                        .map(|found| PropertyRef::new(found, name))
                })
                .collect();

            let mut requirement =
                Requirement::new(dep.package, resolved, dep.origin).with_declared(dep.declared);
            if let Some(tag) = dep.scope {
                requirement = requirement.with_scope(tag);
            }
            debug!(requirement = %requirement, resolved = %requirement.resolved, "Found requirement");

            let tags = manifest
                .groups
                .entry(requirement.package.clone())
                .or_default();
            for tag in &requirement.scope_tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }

            manifest
                .graph
                .add_requirement(manifest.requirements.len(), refs);
            manifest.requirements.push(requirement);
        }

        Ok(manifest)
    }

    /// Values Maven provides without a declaration
    pub fn builtin(&self, name: &str) -> Option<String> {
        match name {
            "project.version" | "version" | "pom.version" => Some(self.root.version.clone()),
            "project.groupId" => Some(self.root.group_id.clone()),
            "project.artifactId" => Some(self.root.artifact_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            _ => None,
        }
    }

    /// Raw value of `name` as seen from `scope`: local, then root, then built-in
    pub fn lookup(&self, scope: &PropertyScope, name: &str) -> Option<String> {
        self.properties
            .locate(scope, name)
            .and_then(|found| self.properties.get(&found, name))
            .map(str::to_string)
            .or_else(|| self.builtin(name))
    }

    /// Interpolate every resolvable placeholder in `text`; unknown ones are kept
    pub fn resolve(&self, text: &str, scope: &PropertyScope) -> String {
        let mut stack = Vec::new();
        self.resolve_nested(text, scope, None, &mut stack)
    }

    /// Like [`Manifest::resolve`], reading property values as `patch` will leave them
    pub fn resolve_patched(&self, text: &str, scope: &PropertyScope, patch: &ManifestPatch) -> String {
        let mut stack = Vec::new();
        self.resolve_nested(text, scope, Some(patch), &mut stack)
    }

    fn lookup_patched(
        &self,
        scope: &PropertyScope,
        name: &str,
        patch: Option<&ManifestPatch>,
    ) -> Option<String> {
        let patched = patch.and_then(|patch| {
            let found = self.properties.locate(scope, name)?;
            patch.property(&found, name).map(str::to_string)
        });
        patched.or_else(|| self.lookup(scope, name))
    }

    fn resolve_nested(
        &self,
        text: &str,
        scope: &PropertyScope,
        patch: Option<&ManifestPatch>,
        stack: &mut Vec<String>,
    ) -> String {
        if !text.contains("${") || stack.len() >= MAX_RESOLVE_DEPTH {
            return text.to_string();
        }
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                if stack.iter().any(|n| n == name) {
                    return caps[0].to_string();
                }
                match self.lookup_patched(scope, name, patch) {
                    Some(value) => {
                        stack.push(name.to_string());
                        let resolved = self.resolve_nested(&value, scope, patch, stack);
                        stack.pop();
                        resolved
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Resolved current value of a declared property
    pub fn property_value(&self, property: &PropertyRef) -> Option<String> {
        self.properties
            .get(&property.scope, &property.name)
            .map(|raw| self.resolve(raw, &property.scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyOrigin, ProfileSection};

    const POM: &str = r#"<project>
  <groupId>com.acme</groupId>
  <artifactId>app</artifactId>
  <version>3.1.0</version>
  <properties>
    <v>1.0.0</v>
    <v>1.0.1</v>
    <alias>${v}</alias>
    <loop.a>${loop.b}</loop.a>
    <loop.b>${loop.a}</loop.b>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>abc</artifactId>
      <version>${v}</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>def</artifactId>
      <version>${alias}</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>com.acme</groupId>
      <artifactId>sibling</artifactId>
      <version>${project.version}</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>abc</artifactId>
      <version>9.9.9</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>ghost</artifactId>
      <version>${nowhere}</version>
    </dependency>
  </dependencies>
  <profiles>
    <profile>
      <id>one</id>
      <properties>
        <v>2.0.0</v>
      </properties>
      <dependencies>
        <dependency>
          <groupId>org.example</groupId>
          <artifactId>abc</artifactId>
          <version>${v}</version>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
</project>"#;

    fn manifest() -> Manifest {
        Manifest::parse(POM).unwrap()
    }

    #[test]
    fn test_placeholder_names() {
        assert_eq!(placeholder_names("${a}.${b}-${a}"), vec!["a", "b"]);
        assert!(placeholder_names("1.0.0").is_empty());
    }

    #[test]
    fn test_duplicate_declaration_first_wins() {
        let m = manifest();
        let abc: Vec<_> = m
            .requirements
            .iter()
            .filter(|r| r.name() == "org.example:abc")
            .collect();
        assert_eq!(abc.len(), 2);
        assert_eq!(abc[0].declared, "${v}");
        assert_eq!(abc[1].origin, DependencyOrigin::profile("one", ProfileSection::Direct));
    }

    #[test]
    fn test_last_property_value_wins() {
        let m = manifest();
        assert_eq!(m.properties.get(&PropertyScope::Root, "v"), Some("1.0.1"));
        assert_eq!(m.requirements[0].resolved, "1.0.1");
    }

    #[test]
    fn test_nested_property_resolution() {
        let m = manifest();
        let def = &m.requirements[1];
        assert_eq!(def.declared, "${alias}");
        assert_eq!(def.resolved, "1.0.1");
        assert!(def.is_non_production());
    }

    #[test]
    fn test_builtin_properties() {
        let m = manifest();
        assert_eq!(m.requirements[2].resolved, "3.1.0");
        assert!(m.graph.refs(2).is_empty());
    }

    #[test]
    fn test_unresolved_placeholder_kept() {
        let m = manifest();
        let ghost = &m.requirements[3];
        assert_eq!(ghost.resolved, "${nowhere}");
        assert!(ghost.is_unresolved());
    }

    #[test]
    fn test_cycle_left_unresolved() {
        let m = manifest();
        let resolved = m.resolve("${loop.a}", &PropertyScope::Root);
        assert!(resolved.contains("${"));
    }

    #[test]
    fn test_profile_scope_shadows_root() {
        let m = manifest();
        let profile_abc = &m.requirements[4];
        assert_eq!(profile_abc.resolved, "2.0.0");
        assert_eq!(
            m.graph.refs(4),
            &[PropertyRef::new(PropertyScope::Profile("one".into()), "v")]
        );
    }

    #[test]
    fn test_property_graph_members() {
        let m = manifest();
        let root_v = PropertyRef::new(PropertyScope::Root, "v");
        assert_eq!(m.graph.members(&root_v), &[0]);
        let alias = PropertyRef::new(PropertyScope::Root, "alias");
        assert_eq!(m.graph.members(&alias), &[1]);
        assert_eq!(m.property_value(&alias).as_deref(), Some("1.0.1"));
    }

    #[test]
    fn test_resolve_patched_follows_nested_properties() {
        let m = manifest();
        let mut patch = ManifestPatch::new();
        patch.set_property(PropertyScope::Root, "v", "3.0.0");

        assert_eq!(m.resolve_patched("${alias}", &PropertyScope::Root, &patch), "3.0.0");
        assert_eq!(m.resolve("${alias}", &PropertyScope::Root), "1.0.1");
        // The profile declares its own v
        assert_eq!(
            m.resolve_patched("${v}", &PropertyScope::Profile("one".into()), &patch),
            "2.0.0"
        );
    }

    #[test]
    fn test_groups_collect_scope_tags() {
        let m = manifest();
        let def = PackageKey::maven("org.example", "def");
        assert_eq!(m.groups.get(&def), Some(&vec!["test".to_string()]));
        let abc = PackageKey::maven("org.example", "abc");
        assert_eq!(m.groups.get(&abc), Some(&Vec::new()));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Manifest::parse("<project/>"),
            Err(ManifestError::MalformedDocument { .. })
        ));
    }
}
