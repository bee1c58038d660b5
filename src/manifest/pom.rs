//! pom.xml scanner
//!
//! Walks the document once and records every versioned declaration together with
//! the byte span of its version text, so the writer can replace exactly that span.
//! Sections walked:
//! - `<parent>`
//! - `<dependencies>` and `<dependencyManagement><dependencies>`
//! - `<build><plugins>` and `<build><pluginManagement><plugins>` plugin dependencies
//! - the same three dependency sections inside each `<profiles><profile>`
//! - root and profile `<properties>`

use crate::domain::{DependencyOrigin, PackageKey, ProfileSection, PropertyScope};
use crate::error::ManifestError;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Group id Maven assumes for plugins declared without one
const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// Maven coordinates of a project or its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A versioned dependency declaration found in the document
#[derive(Debug, Clone)]
pub(crate) struct ScannedDependency {
    pub package: PackageKey,
    pub origin: DependencyOrigin,
    pub declared: String,
    pub scope: Option<String>,
    /// Byte span of the trimmed version text, `None` when it cannot be edited in place
    pub span: Option<Range<usize>>,
    /// Document position of the declaring element
    pub position: usize,
}

/// A property declaration found in the document
#[derive(Debug, Clone)]
pub(crate) struct ScannedProperty {
    pub scope: PropertyScope,
    pub name: String,
    pub value: String,
    pub span: Option<Range<usize>>,
}

/// Everything the manifest model and the writer need from one document
#[derive(Debug, Clone)]
pub(crate) struct PomScan {
    pub root: Coordinates,
    pub parent: Option<Coordinates>,
    pub dependencies: Vec<ScannedDependency>,
    pub properties: Vec<ScannedProperty>,
}

/// Scan a pom.xml document
pub(crate) fn scan(text: &str) -> Result<PomScan, ManifestError> {
    let document = Document::parse(text)
        .map_err(|e| ManifestError::malformed(format!("invalid XML: {}", e)))?;
    let project = document.root_element();
    if project.tag_name().name() != "project" {
        return Err(ManifestError::malformed(format!(
            "root element is <{}>, expected <project>",
            project.tag_name().name()
        )));
    }

    let mut scanner = Scanner {
        text,
        dependencies: Vec::new(),
        properties: Vec::new(),
    };

    let parent_node = child(project, "parent");
    let parent = parent_node.and_then(|node| {
        Some(Coordinates {
            group_id: child_text(node, "groupId")?,
            artifact_id: child_text(node, "artifactId")?,
            version: child_text(node, "version")?,
        })
    });
    if let (Some(node), Some(coords)) = (parent_node, &parent) {
        if let Some(version) = child(node, "version") {
            scanner.push_dependency(
                PackageKey::maven(&coords.group_id, &coords.artifact_id),
                DependencyOrigin::Parent,
                version,
                None,
                node.range().start,
            );
        }
    }

    let root = Coordinates {
        group_id: child_text(project, "groupId")
            .or_else(|| parent.as_ref().map(|p| p.group_id.clone()))
            .ok_or_else(|| ManifestError::malformed("missing project <groupId>"))?,
        artifact_id: child_text(project, "artifactId")
            .ok_or_else(|| ManifestError::malformed("missing project <artifactId>"))?,
        version: child_text(project, "version")
            .or_else(|| parent.as_ref().map(|p| p.version.clone()))
            .ok_or_else(|| ManifestError::malformed("missing project <version>"))?,
    };

    scanner.walk_sections(project, None);
    scanner.walk_properties(project, PropertyScope::Root);

    for profile in child(project, "profiles")
        .into_iter()
        .flat_map(|node| children(node, "profile"))
    {
        let Some(id) = child_text(profile, "id") else {
            debug!("Skipping profile without <id>");
            continue;
        };
        scanner.walk_sections(profile, Some(&id));
        scanner.walk_properties(profile, PropertyScope::Profile(id));
    }

    let Scanner {
        mut dependencies,
        properties,
        ..
    } = scanner;
    dependencies.sort_by_key(|dep| dep.position);

    Ok(PomScan {
        root,
        parent,
        dependencies,
        properties,
    })
}

struct Scanner<'t> {
    text: &'t str,
    dependencies: Vec<ScannedDependency>,
    properties: Vec<ScannedProperty>,
}

impl<'t> Scanner<'t> {
    /// Walk the dependency sections of `<project>` or of one `<profile>`
    fn walk_sections(&mut self, node: Node<'_, '_>, profile: Option<&str>) {
        let origin = |section: ProfileSection| match profile {
            None => match section {
                ProfileSection::Direct => DependencyOrigin::Direct,
                ProfileSection::Management => DependencyOrigin::Management,
                ProfileSection::Plugin { plugin } => DependencyOrigin::plugin(plugin),
            },
            Some(id) => DependencyOrigin::profile(id, section),
        };

        if let Some(deps) = child(node, "dependencies") {
            self.walk_dependencies(deps, &origin(ProfileSection::Direct));
        }
        if let Some(deps) = child(node, "dependencyManagement").and_then(|m| child(m, "dependencies"))
        {
            self.walk_dependencies(deps, &origin(ProfileSection::Management));
        }

        let Some(build) = child(node, "build") else {
            return;
        };
        let plugin_lists = child(build, "plugins").into_iter().chain(
            child(build, "pluginManagement")
                .and_then(|pm| child(pm, "plugins"))
                .into_iter(),
        );
        for plugin in plugin_lists.flat_map(|list| children(list, "plugin")) {
            let Some(artifact) = child_text(plugin, "artifactId") else {
                continue;
            };
            let group =
                child_text(plugin, "groupId").unwrap_or_else(|| DEFAULT_PLUGIN_GROUP.to_string());
            if let Some(deps) = child(plugin, "dependencies") {
                let section = ProfileSection::Plugin {
                    plugin: format!("{}:{}", group, artifact),
                };
                self.walk_dependencies(deps, &origin(section));
            }
        }
    }

    fn walk_dependencies(&mut self, list: Node<'_, '_>, origin: &DependencyOrigin) {
        for dep in children(list, "dependency") {
            let (Some(group), Some(artifact)) =
                (child_text(dep, "groupId"), child_text(dep, "artifactId"))
            else {
                debug!("Skipping dependency without coordinates in {:?}", origin);
                continue;
            };
            // Versionless dependencies are managed elsewhere
            let Some(version) = child(dep, "version") else {
                continue;
            };
            self.push_dependency(
                PackageKey::maven(&group, &artifact),
                origin.clone(),
                version,
                child_text(dep, "scope"),
                dep.range().start,
            );
        }
    }

    fn push_dependency(
        &mut self,
        package: PackageKey,
        origin: DependencyOrigin,
        version: Node<'_, '_>,
        scope: Option<String>,
        position: usize,
    ) {
        let declared = element_text(version);
        if declared.is_empty() {
            return;
        }
        self.dependencies.push(ScannedDependency {
            package,
            origin,
            declared,
            scope,
            span: value_span(version, self.text),
            position,
        });
    }

    fn walk_properties(&mut self, node: Node<'_, '_>, scope: PropertyScope) {
        let Some(props) = child(node, "properties") else {
            return;
        };
        for prop in props.children().filter(|n| n.is_element()) {
            self.properties.push(ScannedProperty {
                scope: scope.clone(),
                name: prop.tag_name().name().to_string(),
                value: element_text(prop),
                span: value_span(prop, self.text),
            });
        }
    }
}

fn child<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn children<'a, 'i: 'a>(node: Node<'a, 'i>, tag: &'a str) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Concatenated, trimmed text content of an element
fn element_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    text.trim().to_string()
}

/// Byte span of the trimmed text of an element holding one plain text node
fn value_span(node: Node<'_, '_>, source: &str) -> Option<Range<usize>> {
    let mut kids = node.children();
    let only = kids.next()?;
    if kids.next().is_some() || !only.is_text() {
        return None;
    }
    let range = only.range();
    let raw = source.get(range.clone())?;
    // Entities and CDATA make the raw text differ from the decoded text
    if only.text() != Some(raw) {
        return None;
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = range.start + (raw.len() - raw.trim_start().len());
    Some(start..start + trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>org.parent</groupId>
    <artifactId>parent-pom</artifactId>
    <version>1.1.1</version>
  </parent>
  <artifactId>app</artifactId>
  <properties>
    <abc.version>1.0.0</abc.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>abc</artifactId>
      <version> ${abc.version} </version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>managed</artifactId>
    </dependency>
  </dependencies>
  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <dependencies>
          <dependency>
            <groupId>org.plugin</groupId>
            <artifactId>helper</artifactId>
            <version>0.1</version>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
  <profiles>
    <profile>
      <id>one</id>
      <properties>
        <abc.version>2.0.0</abc.version>
      </properties>
      <dependencyManagement>
        <dependencies>
          <dependency>
            <groupId>org.import</groupId>
            <artifactId>xyz</artifactId>
            <version>6.6.6</version>
            <scope>import</scope>
          </dependency>
        </dependencies>
      </dependencyManagement>
    </profile>
  </profiles>
</project>
"#;

    #[test]
    fn test_root_coordinates_inherit_from_parent() {
        let scan = scan(POM).unwrap();
        assert_eq!(scan.root.group_id, "org.parent");
        assert_eq!(scan.root.artifact_id, "app");
        assert_eq!(scan.root.version, "1.1.1");
        assert_eq!(scan.root.to_string(), "org.parent:app:1.1.1");
        assert_eq!(scan.parent.unwrap().artifact_id, "parent-pom");
    }

    #[test]
    fn test_dependencies_in_document_order() {
        let scan = scan(POM).unwrap();
        let found: Vec<(String, String)> = scan
            .dependencies
            .iter()
            .map(|d| (d.package.name.clone(), d.origin.to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("org.parent:parent-pom".to_string(), "parent".to_string()),
                ("org.example:abc".to_string(), "".to_string()),
                ("junit:junit".to_string(), "".to_string()),
                (
                    "org.plugin:helper".to_string(),
                    "plugin@org.apache.maven.plugins:maven-compiler-plugin".to_string()
                ),
                (
                    "org.import:xyz".to_string(),
                    "profile@one@management".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_version_span_is_trimmed() {
        let scan = scan(POM).unwrap();
        let abc = &scan.dependencies[1];
        assert_eq!(abc.declared, "${abc.version}");
        let span = abc.span.clone().unwrap();
        assert_eq!(&POM[span], "${abc.version}");
    }

    #[test]
    fn test_scope_tags() {
        let scan = scan(POM).unwrap();
        assert_eq!(scan.dependencies[2].scope.as_deref(), Some("test"));
        assert_eq!(scan.dependencies[4].scope.as_deref(), Some("import"));
    }

    #[test]
    fn test_properties_per_scope() {
        let scan = scan(POM).unwrap();
        assert_eq!(scan.properties.len(), 2);
        assert_eq!(scan.properties[0].scope, PropertyScope::Root);
        assert_eq!(scan.properties[0].value, "1.0.0");
        assert_eq!(
            scan.properties[1].scope,
            PropertyScope::Profile("one".to_string())
        );
        let span = scan.properties[1].span.clone().unwrap();
        assert_eq!(&POM[span], "2.0.0");
    }

    #[test]
    fn test_entity_and_comment_values_not_editable() {
        let pom = r#"<project>
  <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
  <properties>
    <a>1.0&amp;x</a>
    <b><!-- keep -->2.0</b>
    <d>4.0</d>
  </properties>
</project>"#;
        let scan = scan(pom).unwrap();
        let spans: Vec<bool> = scan.properties.iter().map(|p| p.span.is_some()).collect();
        assert_eq!(spans, vec![false, false, true]);
        assert_eq!(scan.properties[0].value, "1.0&x");
        assert_eq!(scan.properties[1].value, "2.0");
    }

    #[test]
    fn test_missing_coordinates_is_malformed() {
        let err = scan("<project><groupId>g</groupId><version>1</version></project>").unwrap_err();
        assert!(matches!(err, ManifestError::MalformedDocument { .. }));

        let err = scan("<project><artifactId>a</artifactId></project>").unwrap_err();
        assert!(matches!(err, ManifestError::MalformedDocument { .. }));
    }

    #[test]
    fn test_invalid_xml_is_malformed() {
        assert!(matches!(
            scan("<project><artifactId>a</project>"),
            Err(ManifestError::MalformedDocument { .. })
        ));
        assert!(matches!(
            scan("<settings/>"),
            Err(ManifestError::MalformedDocument { .. })
        ));
    }
}
