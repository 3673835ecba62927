use serde::{Deserialize, Serialize};

/// How a namespace's coverage was established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageBasis {
    /// Nothing covers the namespace.
    #[default]
    None,
    /// At least one structured policy matched.
    Policy,
    /// The tool exposed no policies and was assumed to cover everything.
    AssumedWildcard,
    /// The tool exposed no policies but listed the namespace explicitly.
    NamespaceList,
}

impl CoverageBasis {
    pub const fn is_covered(self) -> bool {
        !matches!(self, Self::None)
    }

    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Policy | Self::NamespaceList)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreSimNamespace {
    pub namespace: String,
    pub has_coverage: bool,
    pub coverage_basis: CoverageBasis,
    #[serde(with = "crate::wire::rpo_hours")]
    pub rpo_hours: Option<u32>,
    pub pvc_size_gb: f64,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
}

impl RestoreSimNamespace {
    pub fn is_blocked(&self) -> bool {
        !self.blockers.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreSimResult {
    pub namespaces: Vec<RestoreSimNamespace>,
    #[serde(rename = "totalPvcsGb")]
    pub total_pvcs_gb: f64,
    #[serde(rename = "coveredPvcsGb")]
    pub covered_pvcs_gb: f64,
    #[serde(rename = "uncoveredNamespaces")]
    pub uncovered_namespaces: Vec<String>,
}

impl RestoreSimResult {
    /// Volume-weighted coverage in percent, `None` when no claimed volume exists.
    pub fn coverage_percent(&self) -> Option<f64> {
        (self.total_pvcs_gb > 0.0).then(|| self.covered_pvcs_gb / self.total_pvcs_gb * 100.0)
    }

    pub fn namespace(&self, name: &str) -> Option<&RestoreSimNamespace> {
        self.namespaces.iter().find(|ns| ns.namespace == name)
    }
}
