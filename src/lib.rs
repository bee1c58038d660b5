//! pomup - safe, minimal dependency upgrades for Maven pom.xml manifests
//!
//! The library is built from four layers:
//! - `manifest`: parse a POM into requirements, scoped properties and the
//!   property graph, and write patches back without disturbing other bytes
//! - `update`: choose the best allowed version per requirement and arbitrate
//!   properties shared by several requirements
//! - `registry`: version sources (Maven Central, a static table) and bounded
//!   concurrent lookups
//! - `orchestrator`: the read → parse → fetch → suggest → write workflow

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
