//! techscope - technology detection over project trees
//!
//! This library scans a project's file tree and determines which technologies
//! (languages, frameworks, libraries, infrastructure tools) are present,
//! emitting a hierarchical graph of components with stable identifiers and
//! cross-component dependency edges.
//!
//! # Core Concepts
//!
//! - **Rules**: declarative technology definitions, compiled into matchers
//!   over file extensions, file names, file content and dependency-manifest
//!   entries
//! - **Components**: detected units (projects, modules, services) forming a
//!   tree, merged and deduplicated as evidence accumulates
//! - **Identity**: deterministic identifiers derived from the scan's root
//!   identifier, so repeated scans of the same repository produce the same
//!   graph
//! - **References**: non-owning edges from a component to the component that
//!   provides one of its declared dependencies
//!
//! # Example Usage
//!
//! ```no_run
//! use techscope::{ScanConfig, Scanner};
//!
//! fn scan() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = Scanner::new(ScanConfig::new("/path/to/project"))?;
//!     let outcome = scanner.scan()?;
//!     for id in outcome.tree.depth_first() {
//!         let component = outcome.tree.node(id);
//!         println!("{} {}", component.id(), component.name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`rules`]: rule model and built-in rule set
//! - [`matching`]: compiled extension/filename/dependency/content matchers
//! - [`model`]: component tree and merge semantics
//! - [`identity`]: deterministic identifier assignment
//! - [`resolve`]: cross-component reference resolution
//! - [`detect`]: detector contract and the generic rule-driven detector
//! - [`scanner`]: scan orchestration over a real file tree

pub mod cli;
pub mod config;
pub mod detect;
pub mod fs;
pub mod identity;
pub mod matching;
pub mod model;
pub mod output;
pub mod resolve;
pub mod rules;
pub mod scanner;
pub mod util;

pub use config::{ConfigError, ScanConfig};
pub use detect::{DetectContext, Detector, DetectorRegistry};
pub use identity::{assign_ids, component_id, resolve_root_id, RootIdOptions};
pub use matching::MatcherSet;
pub use model::{Component, ComponentRef, ComponentTree, Dependency, NodeId};
pub use output::ScanReport;
pub use resolve::{resolve_references, PackageProvider, ProviderRegistry};
pub use rules::{Rule, RuleSet};
pub use scanner::{ScanError, ScanOutcome, Scanner};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
