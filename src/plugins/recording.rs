use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::generators::ArtifactKind;
use crate::model::TableModel;
use crate::traits::Plugin;
use crate::types::{CandidateArtifact, ContainerKind, OutputContainer};

/// A recorded hook invocation for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedHook {
    pub hook: &'static str,
    pub table: String,
    pub container: String,
    /// Name of the candidate as the plugin saw it; `None` for container hooks.
    pub artifact_name: Option<String>,
}

/// A plugin that records every hook it sees, for testing.
///
/// Allows configuring artifact kinds and container kinds to veto, and
/// verifying which hooks ran.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use mappergen::generators::ArtifactKind;
/// use mappergen::plugins::RecordingPlugin;
///
/// let plugin = Arc::new(RecordingPlugin::new().veto(ArtifactKind::GeneralCount));
/// assert!(plugin.recorded_hooks().is_empty());
/// ```
pub struct RecordingPlugin {
    name: String,
    vetoed_artifacts: HashSet<ArtifactKind>,
    vetoed_containers: HashSet<ContainerKind>,
    recorded: Mutex<Vec<RecordedHook>>,
}

impl RecordingPlugin {
    /// Create a recording plugin that accepts everything.
    pub fn new() -> Self {
        Self::named("recording")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vetoed_artifacts: HashSet::new(),
            vetoed_containers: HashSet::new(),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Reject every candidate of the given kind.
    pub fn veto(mut self, kind: ArtifactKind) -> Self {
        self.vetoed_artifacts.insert(kind);
        self
    }

    /// Reject every container of the given kind.
    pub fn veto_container(mut self, kind: ContainerKind) -> Self {
        self.vetoed_containers.insert(kind);
        self
    }

    fn records(&self) -> MutexGuard<'_, Vec<RecordedHook>> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded hook invocations, in call order.
    pub fn recorded_hooks(&self) -> Vec<RecordedHook> {
        self.records().clone()
    }

    /// Number of invocations of the named hook.
    pub fn hook_count(&self, hook: &str) -> usize {
        self.records().iter().filter(|r| r.hook == hook).count()
    }

    /// Clear all recorded invocations.
    pub fn clear(&self) {
        self.records().clear();
    }

    /// Assert that the named hook ran at least once.
    pub fn assert_hook_called(&self, hook: &str) {
        assert!(
            self.hook_count(hook) > 0,
            "Hook {} was never called.\nRecorded: {:?}",
            hook,
            self.records().iter().map(|r| r.hook).collect::<Vec<_>>()
        );
    }

    /// Assert that the named hook ran exactly n times.
    pub fn assert_hook_count(&self, hook: &str, expected: usize) {
        let actual = self.hook_count(hook);
        assert_eq!(
            actual, expected,
            "Hook count mismatch for {}. Expected: {}, Actual: {}",
            hook, expected, actual
        );
    }
}

impl Default for RecordingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn artifact_generated(
        &self,
        candidate: &mut CandidateArtifact,
        container: &OutputContainer,
        table: &TableModel,
    ) -> bool {
        self.records().push(RecordedHook {
            hook: candidate.kind().hook_name(),
            table: table.table().qualified_name(),
            container: container.type_name().to_string(),
            artifact_name: Some(candidate.signature().name.clone()),
        });
        !self.vetoed_artifacts.contains(&candidate.kind())
    }

    fn container_generated(&self, container: &mut OutputContainer, table: &TableModel) -> bool {
        self.records().push(RecordedHook {
            hook: container.kind().hook_name(),
            table: table.table().qualified_name(),
            container: container.type_name().to_string(),
            artifact_name: None,
        });
        !self.vetoed_containers.contains(&container.kind())
    }
}
