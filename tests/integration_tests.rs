//! Integration tests for pomup
//!
//! These tests verify:
//! - Parse → suggest → write over a realistic pom.xml
//! - Writes only touch the targeted version and property spans
//! - Property arbitration, profiles, plugins and ranges end to end

use pomup::domain::{DependencyOrigin, ManifestPatch, PackageKey, PropertyScope};
use pomup::manifest::{apply_patch, Manifest, ManifestWriter};
use pomup::parser::MavenVersionScheme;
use pomup::registry::{fetch_all, FetchOptions, StaticVersionSource, VersionLookup, VersionSource};
use pomup::update::{SuggestOptions, SuggestReport, Suggester};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Sample project used by the integration tests -->
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>

  <parent>
    <groupId>org.springframework.boot</groupId>
    <artifactId>spring-boot-starter-parent</artifactId>
    <version>2.7.0</version>
  </parent>

  <groupId>com.acme</groupId>
  <artifactId>shop</artifactId>
  <version>3.1.0</version>

  <properties>
    <jackson.version>2.13.0</jackson.version>
    <guava.version>30.0</guava.version>
    <netty.version>4.1.60.Final</netty.version>
    <java.version>17</java.version>
  </properties>

  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>io.netty</groupId>
        <artifactId>netty-bom</artifactId>
        <version>${netty.version}</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>

  <dependencies>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-core</artifactId>
      <version>${jackson.version}</version>
    </dependency>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-databind</artifactId>
      <version>${jackson.version}</version>
    </dependency>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-annotations</artifactId>
      <version>${jackson.version}</version>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>${guava.version}-jre</version>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>[1.7.0,1.7.30]</version>
    </dependency>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>[3.0,)</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.projectlombok</groupId>
      <artifactId>lombok</artifactId>
    </dependency>
  </dependencies>

  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <version>3.8.1</version>
        <dependencies>
          <dependency>
            <groupId>org.ow2.asm</groupId>
            <artifactId>asm</artifactId>
            <version>9.0</version>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>

  <profiles>
    <profile>
      <id>legacy</id>
      <properties>
        <jackson.version>2.9.0</jackson.version>
      </properties>
      <dependencies>
        <dependency>
          <groupId>com.fasterxml.jackson.core</groupId>
          <artifactId>jackson-core</artifactId>
          <version>${jackson.version}</version>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
</project>
"#;

fn source() -> StaticVersionSource {
    StaticVersionSource::new()
        .with_package(
            "org.springframework.boot:spring-boot-starter-parent",
            ["2.7.0", "2.7.18", "3.2.0"],
        )
        .with_package("io.netty:netty-bom", ["4.1.60.Final", "4.1.100.Final"])
        .with_package(
            "com.fasterxml.jackson.core:jackson-core",
            ["2.9.0", "2.9.10", "2.13.0", "2.15.2"],
        )
        .with_package(
            "com.fasterxml.jackson.core:jackson-databind",
            ["2.13.0", "2.15.2"],
        )
        .with_package(
            "com.fasterxml.jackson.core:jackson-annotations",
            ["2.13.0", "2.14.0"],
        )
        .with_package(
            "com.google.guava:guava",
            ["30.0-jre", "30.0-android", "31.1-android", "31.1-jre"],
        )
        .with_package("org.slf4j:slf4j-api", ["1.7.0", "1.7.30", "1.7.36"])
        .with_package(
            "org.apache.commons:commons-lang3",
            ["3.0", "3.12.0", "3.14.0"],
        )
        .with_package("junit:junit", ["4.12", "4.13.2"])
        .with_package("org.ow2.asm:asm", ["9.0", "9.6"])
}

async fn suggest(text: &str, options: SuggestOptions) -> (Manifest, SuggestReport) {
    let manifest = Manifest::parse(text).unwrap();
    let scheme = MavenVersionScheme;
    let suggester = Suggester::new(&scheme, options);
    let packages = suggester.packages_to_fetch(&manifest);
    let lookups: HashMap<PackageKey, VersionLookup> = fetch_all(
        Arc::new(source()) as Arc<dyn VersionSource>,
        &packages,
        FetchOptions::default(),
        std::future::pending(),
        |_| {},
    )
    .await;
    let report = suggester.suggest(&manifest, &lookups);
    (manifest, report)
}

/// Byte ranges that differ between two texts of equal shape, as changed lines
fn changed_lines<'a>(before: &'a str, after: &'a str) -> Vec<(&'a str, &'a str)> {
    before
        .lines()
        .zip(after.lines())
        .filter(|(a, b)| a != b)
        .collect()
}

mod workflow {
    use super::*;

    #[tokio::test]
    async fn test_full_patch() {
        let (_, report) = suggest(POM, SuggestOptions::new()).await;
        let patch = &report.patch;

        // jackson-core and jackson-databind want 2.15.2, annotations wants 2.14.0
        assert_eq!(
            patch.property(&PropertyScope::Root, "jackson.version"),
            Some("2.15.2")
        );
        assert_eq!(
            patch
                .dependency(
                    &PackageKey::maven("com.fasterxml.jackson.core", "jackson-annotations"),
                    &DependencyOrigin::Direct
                )
                .map(|d| d.new_require.as_str()),
            Some("2.14.0")
        );
        // guava's template only matches the -jre flavour
        assert_eq!(
            patch.property(&PropertyScope::Root, "guava.version"),
            Some("31.1")
        );
        // Bounded range below the newest release is replaced, open range kept
        assert_eq!(
            patch
                .dependency(
                    &PackageKey::maven("org.slf4j", "slf4j-api"),
                    &DependencyOrigin::Direct
                )
                .map(|d| d.new_require.as_str()),
            Some("1.7.36")
        );
        assert!(patch
            .dependency(
                &PackageKey::maven("org.apache.commons", "commons-lang3"),
                &DependencyOrigin::Direct
            )
            .is_none());
        // Profile property is arbitrated in its own scope
        assert_eq!(
            patch.property(&PropertyScope::Profile("legacy".into()), "jackson.version"),
            Some("2.15.2")
        );
        assert_eq!(
            patch
                .dependency(
                    &PackageKey::maven("org.springframework.boot", "spring-boot-starter-parent"),
                    &DependencyOrigin::Parent
                )
                .map(|d| d.new_require.as_str()),
            Some("3.2.0")
        );
        assert_eq!(
            patch
                .dependency(
                    &PackageKey::maven("org.ow2.asm", "asm"),
                    &DependencyOrigin::plugin("org.apache.maven.plugins:maven-compiler-plugin")
                )
                .map(|d| d.new_require.as_str()),
            Some("9.6")
        );
    }

    #[tokio::test]
    async fn test_write_is_local() {
        let (_, report) = suggest(POM, SuggestOptions::new()).await;
        let patched = apply_patch(POM, &report.patch).unwrap();

        assert_eq!(POM.lines().count(), patched.lines().count());
        let changes = changed_lines(POM, &patched);
        assert_eq!(changes.len(), report.patch.len());
        for (before, after) in changes {
            // Only the text between tags changes
            let open = before.find('>').unwrap();
            let close = before.rfind('<').unwrap();
            assert_eq!(before[..=open], after[..=open]);
            assert_eq!(before[close..], after[after.rfind('<').unwrap()..]);
        }
        assert!(patched.contains("<!-- Sample project used by the integration tests -->"));
        assert!(patched.contains("<version>${jackson.version}</version>"));
        assert!(patched.contains("<version>${guava.version}-jre</version>"));
    }

    #[tokio::test]
    async fn test_options_respected() {
        let options = SuggestOptions::new()
            .with_ignore_non_production(true)
            .with_excluded(vec!["org.ow2.asm:asm".to_string()])
            .with_major_bump_exceptions(vec![
                "org.springframework.boot:spring-boot-starter-parent".to_string(),
            ]);
        let (_, report) = suggest(POM, options).await;

        let parent = report
            .patch
            .dependency(
                &PackageKey::maven("org.springframework.boot", "spring-boot-starter-parent"),
                &DependencyOrigin::Parent,
            )
            .map(|d| d.new_require.as_str());
        assert_eq!(parent, Some("2.7.18"));
        assert!(report
            .patch
            .deps
            .iter()
            .all(|d| d.package.name != "org.ow2.asm:asm" && d.package.name != "junit:junit"));
    }

    #[tokio::test]
    async fn test_second_run_converges() {
        let (_, report) = suggest(POM, SuggestOptions::new()).await;
        let patched = apply_patch(POM, &report.patch).unwrap();

        let (_, again) = suggest(&patched, SuggestOptions::new()).await;
        assert!(again.patch.is_empty(), "unexpected patch {:?}", again.patch);
    }

    #[tokio::test]
    async fn test_versionless_dependency_ignored() {
        let (manifest, _) = suggest(POM, SuggestOptions::new()).await;
        assert!(manifest
            .requirements
            .iter()
            .all(|r| r.name() != "org.projectlombok:lombok"));
    }
}

mod writer {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_identity() {
        assert_eq!(apply_patch(POM, &ManifestPatch::new()).unwrap(), POM);
    }

    #[tokio::test]
    async fn test_writer_dry_run_and_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pom.xml");
        fs::write(&path, POM).unwrap();
        let (_, report) = suggest(POM, SuggestOptions::new()).await;

        let dry = ManifestWriter::dry_run().apply(&path, &report.patch).unwrap();
        assert!(dry.has_changes());
        assert!(!dry.file_modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), POM);

        let written = ManifestWriter::new(false)
            .apply(&path, &report.patch)
            .unwrap();
        assert!(written.file_modified);
        assert_eq!(written.edits_applied, report.patch.len());
        assert_eq!(fs::read_to_string(&path).unwrap(), written.content);
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let mut patch = ManifestPatch::new();
        patch.set_property(PropertyScope::Root, "nope.version", "1.0");
        assert!(apply_patch(POM, &patch).is_err());
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    const SMALL: &str = "<project>\n  <groupId>g</groupId>\n  <artifactId>a</artifactId>\n  <version>1</version>\n  <properties>\n    <p>VALUE</p>\n  </properties>\n</project>\n";

    proptest! {
        #[test]
        fn prop_round_trip_identity(
            comment in "[a-zA-Z0-9 .,;:_-]{0,40}",
            spaces in "[ \t\n]{0,6}",
        ) {
            let text = SMALL.replace("<properties>", &format!("<!--{}-->{}<properties>", comment, spaces));
            prop_assume!(Manifest::parse(&text).is_ok());
            prop_assert_eq!(apply_patch(&text, &ManifestPatch::new()).unwrap(), text);
        }

        #[test]
        fn prop_property_edit_is_local(value in "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}") {
            let text = SMALL.replace("VALUE", "0.0.1");
            let mut patch = ManifestPatch::new();
            patch.set_property(PropertyScope::Root, "p", value.clone());
            let patched = apply_patch(&text, &patch).unwrap();
            prop_assert_eq!(patched, text.replace("<p>0.0.1</p>", &format!("<p>{}</p>", value)));
        }
    }
}
