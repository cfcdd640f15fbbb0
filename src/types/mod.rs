mod artifact;
mod container;
mod fragment;
mod jdbc_type;
mod references;
mod type_name;

pub use artifact::{ArtifactShape, CandidateArtifact, Marker, Parameter, Signature};
pub use container::{Accumulation, ContainerKind, OutputContainer};
pub use fragment::Fragment;
pub use jdbc_type::JdbcType;
pub use references::References;
pub use type_name::TypeName;
