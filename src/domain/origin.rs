//! Where in a manifest a requirement or property is declared
//!
//! Origins are written as `@`-separated tags so they can round-trip through
//! JSON output and CLI arguments:
//! - `` (empty) for the root `<dependencies>` section
//! - `management`, `parent`, `plugin@group:artifact`
//! - `profile@id`, `profile@id@management`, `profile@id@plugin@group:artifact`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section of a profile a requirement is declared in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileSection {
    /// `<profile><dependencies>`
    Direct,
    /// `<profile><dependencyManagement><dependencies>`
    Management,
    /// `<profile><build><plugins><plugin><dependencies>`
    Plugin {
        /// Plugin coordinates (`group:artifact`)
        plugin: String,
    },
}

/// Structural context a requirement is declared in
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DependencyOrigin {
    /// Root `<dependencies>` section
    #[default]
    Direct,
    /// Root `<dependencyManagement>` section
    Management,
    /// `<parent>` reference
    Parent,
    /// Dependency of a build plugin
    Plugin {
        /// Plugin coordinates (`group:artifact`)
        plugin: String,
    },
    /// Any section nested in a named profile
    Profile {
        /// Profile id
        id: String,
        /// Section inside the profile
        section: ProfileSection,
    },
}

impl DependencyOrigin {
    /// Creates a plugin dependency origin
    pub fn plugin(plugin: impl Into<String>) -> Self {
        DependencyOrigin::Plugin {
            plugin: plugin.into(),
        }
    }

    /// Creates an origin inside a profile
    pub fn profile(id: impl Into<String>, section: ProfileSection) -> Self {
        DependencyOrigin::Profile {
            id: id.into(),
            section,
        }
    }

    /// Returns the profile id if this origin lives inside a profile
    pub fn profile_id(&self) -> Option<&str> {
        match self {
            DependencyOrigin::Profile { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Returns true for dependency-management sections (root or profile)
    pub fn is_management(&self) -> bool {
        matches!(
            self,
            DependencyOrigin::Management
                | DependencyOrigin::Profile {
                    section: ProfileSection::Management,
                    ..
                }
        )
    }

    /// Property scope that is searched first for placeholders in this origin
    pub fn property_scope(&self) -> PropertyScope {
        match self {
            DependencyOrigin::Profile { id, .. } => PropertyScope::Profile(id.clone()),
            _ => PropertyScope::Root,
        }
    }
}

impl fmt::Display for DependencyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyOrigin::Direct => Ok(()),
            DependencyOrigin::Management => write!(f, "management"),
            DependencyOrigin::Parent => write!(f, "parent"),
            DependencyOrigin::Plugin { plugin } => write!(f, "plugin@{}", plugin),
            DependencyOrigin::Profile { id, section } => match section {
                ProfileSection::Direct => write!(f, "profile@{}", id),
                ProfileSection::Management => write!(f, "profile@{}@management", id),
                ProfileSection::Plugin { plugin } => {
                    write!(f, "profile@{}@plugin@{}", id, plugin)
                }
            },
        }
    }
}

impl FromStr for DependencyOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('@').collect();
        match parts.as_slice() {
            [""] => Ok(DependencyOrigin::Direct),
            ["management"] => Ok(DependencyOrigin::Management),
            ["parent"] => Ok(DependencyOrigin::Parent),
            ["plugin", plugin] if !plugin.is_empty() => Ok(DependencyOrigin::plugin(*plugin)),
            ["profile", id] if !id.is_empty() => {
                Ok(DependencyOrigin::profile(*id, ProfileSection::Direct))
            }
            ["profile", id, "management"] if !id.is_empty() => {
                Ok(DependencyOrigin::profile(*id, ProfileSection::Management))
            }
            ["profile", id, "plugin", plugin] if !id.is_empty() && !plugin.is_empty() => {
                Ok(DependencyOrigin::profile(
                    *id,
                    ProfileSection::Plugin {
                        plugin: plugin.to_string(),
                    },
                ))
            }
            _ => Err(format!("invalid dependency origin '{}'", s)),
        }
    }
}

impl From<DependencyOrigin> for String {
    fn from(origin: DependencyOrigin) -> Self {
        origin.to_string()
    }
}

impl TryFrom<String> for DependencyOrigin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Visibility scope of a property declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PropertyScope {
    /// Root `<properties>` section
    #[default]
    Root,
    /// `<properties>` of a named profile
    Profile(String),
}

impl PropertyScope {
    /// Returns true for the root scope
    pub fn is_root(&self) -> bool {
        matches!(self, PropertyScope::Root)
    }
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyScope::Root => Ok(()),
            PropertyScope::Profile(id) => write!(f, "profile@{}", id),
        }
    }
}

impl FromStr for PropertyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(PropertyScope::Root);
        }
        match s.strip_prefix("profile@") {
            Some(id) if !id.is_empty() && !id.contains('@') => {
                Ok(PropertyScope::Profile(id.to_string()))
            }
            _ => Err(format!("invalid property scope '{}'", s)),
        }
    }
}

impl From<PropertyScope> for String {
    fn from(scope: PropertyScope) -> Self {
        scope.to_string()
    }
}

impl TryFrom<String> for PropertyScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_origins() -> Vec<DependencyOrigin> {
        vec![
            DependencyOrigin::Direct,
            DependencyOrigin::Management,
            DependencyOrigin::Parent,
            DependencyOrigin::plugin("org.plugin:plugin"),
            DependencyOrigin::profile("one", ProfileSection::Direct),
            DependencyOrigin::profile("two", ProfileSection::Management),
            DependencyOrigin::profile(
                "three",
                ProfileSection::Plugin {
                    plugin: "org.plugin:plugin".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_origin_tags() {
        assert_eq!(DependencyOrigin::Direct.to_string(), "");
        assert_eq!(DependencyOrigin::Management.to_string(), "management");
        assert_eq!(
            DependencyOrigin::plugin("org.plugin:plugin").to_string(),
            "plugin@org.plugin:plugin"
        );
        assert_eq!(
            DependencyOrigin::profile("two", ProfileSection::Management).to_string(),
            "profile@two@management"
        );
    }

    #[test]
    fn test_origin_parse_back() {
        for origin in all_origins() {
            let parsed: DependencyOrigin = origin.to_string().parse().unwrap();
            assert_eq!(parsed, origin);
        }
    }

    #[test]
    fn test_origin_parse_invalid() {
        assert!("profile".parse::<DependencyOrigin>().is_err());
        assert!("plugin@".parse::<DependencyOrigin>().is_err());
        assert!("something@else".parse::<DependencyOrigin>().is_err());
    }

    #[test]
    fn test_property_scope_of_origin() {
        assert_eq!(DependencyOrigin::Parent.property_scope(), PropertyScope::Root);
        assert_eq!(
            DependencyOrigin::profile("one", ProfileSection::Management).property_scope(),
            PropertyScope::Profile("one".to_string())
        );
    }

    #[test]
    fn test_is_management() {
        assert!(DependencyOrigin::Management.is_management());
        assert!(DependencyOrigin::profile("x", ProfileSection::Management).is_management());
        assert!(!DependencyOrigin::Direct.is_management());
        assert!(!DependencyOrigin::profile("x", ProfileSection::Direct).is_management());
    }

    #[test]
    fn test_property_scope_parse() {
        assert_eq!("".parse::<PropertyScope>().unwrap(), PropertyScope::Root);
        assert_eq!(
            "profile@dev".parse::<PropertyScope>().unwrap(),
            PropertyScope::Profile("dev".to_string())
        );
        assert!("dev".parse::<PropertyScope>().is_err());
    }

    #[test]
    fn test_serde_origin_as_string() {
        let origin = DependencyOrigin::profile("two", ProfileSection::Management);
        let json = serde_json::to_string(&origin).unwrap();
        assert_eq!(json, "\"profile@two@management\"");
        let parsed: DependencyOrigin = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, origin);
    }
}
