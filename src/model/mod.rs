//! Component data model
//!
//! Detected components form a tree owned by a [`ComponentTree`] arena. Nodes
//! hold the accumulated evidence for one component; cross-component links are
//! non-owning references added after the tree is frozen.

mod component;
mod license;
mod tree;

pub use component::{
    Component, Dependency, GitMetadata, LanguageStat, PropertyValue, PROP_ARTIFACT_ID,
    PROP_GROUP_ID, PROP_PACKAGE_NAME, REASON_CONTAINER, REASON_LICENSE, REASON_NOTES,
};
pub use license::{LicenseDetectionMethod, LicenseRecord};
pub use tree::{ComponentRef, ComponentTree, NodeId};
