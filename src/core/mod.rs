//! Core data types: project metadata, module descriptors, artifacts and the
//! substitution map.

pub mod artifact;
pub mod manifest;
pub mod module;
pub mod substitution;

pub use artifact::{ArtifactError, ArtifactPair, PlannedArtifact};
pub use manifest::{DependencyDeclaration, ManifestError, ProjectManifest};
pub use module::{ModuleDescriptor, UserModuleSpec};
pub use substitution::SubstitutionMap;
