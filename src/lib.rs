//! mappergen - Generates MyBatis mapper artifacts from introspected table models
//!
//! Four output dialects are supported: a Java dynamic SQL mapper with its
//! support class, the Kotlin equivalent, an XML mapper document, and an
//! annotated Java mapper backed by an SQL provider class. Every artifact is
//! offered to the plugin chain before it is committed.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use mappergen::{ColumnModel, Dialect, MapperGenerator, NamingProfile, TableModel};
//! use mappergen::plugins::RecordingPlugin;
//!
//! let table = TableModel::builder("orders", "Order")
//!     .packages("com.example.model", "com.example.mapper")
//!     .column(ColumnModel::new("id", "id", "INTEGER"))
//!     .column(ColumnModel::new("order_date", "orderDate", "DATE"))
//!     .primary_key("id")
//!     .build();
//!
//! let plugin = Arc::new(RecordingPlugin::new());
//! let generator = MapperGenerator::new(NamingProfile::new(Dialect::XmlMapper))
//!     .with_plugin(plugin.clone());
//!
//! let containers = generator.generate(&table)?;
//! assert_eq!(containers.len(), 1);
//! plugin.assert_hook_called("sqlMapDocumentGenerated");
//! # Ok::<(), mappergen::GenError>(())
//! ```

pub mod assembler;
pub mod builders;
pub mod clauses;
pub mod config;
pub mod context;
pub mod error;
pub mod fragments;
pub mod generators;
pub mod model;
pub mod plugins;
pub mod rules;
pub mod traits;
pub mod types;

mod generator;

// Re-export main types for convenient access
pub use config::{Dialect, NamingProfile};
pub use error::{GenError, Result};
pub use generator::MapperGenerator;
pub use generators::ArtifactKind;
pub use model::{ColumnModel, GeneratedKey, TableModel, TableRules};
pub use plugins::{PluginAggregator, RecordingPlugin};
pub use traits::{LogProgress, Plugin, ProgressCallback, SilentProgress};
pub use types::{CandidateArtifact, ContainerKind, OutputContainer};
