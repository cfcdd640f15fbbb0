mod artifact;
mod statement;

pub use artifact::ArtifactBuilder;
pub use statement::{
    Delete, Insert, InsertWithValues, Select, SelectWithColumns, SelectWithTable, Update,
    UpdateWithSet,
};
