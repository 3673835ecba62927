use drscore_model::{BackupInventory, BackupPolicy, CoverageBasis};

/// Whether a single policy applies to `namespace`. Exclusion always wins;
/// an empty include list means every namespace.
pub fn covers(policy: &BackupPolicy, namespace: &str) -> bool {
    if policy.excluded_namespaces.iter().any(|ns| ns == namespace) {
        return false;
    }
    policy.included_namespaces.is_empty()
        || policy
            .included_namespaces
            .iter()
            .any(|ns| ns == namespace || ns == "*")
}

/// OR of [`covers`] across `policies`, plus the lowest known RPO among the
/// policies that cover the namespace.
pub fn namespace_coverage(policies: &[BackupPolicy], namespace: &str) -> (bool, Option<u32>) {
    let mut covered = false;
    let mut best_rpo: Option<u32> = None;
    for policy in policies.iter().filter(|policy| covers(policy, namespace)) {
        covered = true;
        if let Some(hours) = policy.rpo_hours {
            best_rpo = Some(best_rpo.map_or(hours, |best| best.min(hours)));
        }
    }
    (covered, best_rpo)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceCoverage {
    pub covered: bool,
    pub best_rpo_hours: Option<u32>,
    pub basis: CoverageBasis,
}

impl NamespaceCoverage {
    const UNCOVERED: Self = Self {
        covered: false,
        best_rpo_hours: None,
        basis: CoverageBasis::None,
    };
}

/// Coverage for `namespace` given everything the backup detector reported.
///
/// Structured policies are authoritative when present. Without them a
/// detected tool falls back to its namespace list, where a lone `"*"` is an
/// assumption rather than evidence and is labelled as such.
pub fn resolve_coverage(backup: &BackupInventory, namespace: &str) -> NamespaceCoverage {
    if !backup.tool_detected() {
        return NamespaceCoverage::UNCOVERED;
    }

    if !backup.policies.is_empty() {
        let (covered, best_rpo_hours) = namespace_coverage(&backup.policies, namespace);
        return NamespaceCoverage {
            covered,
            best_rpo_hours,
            basis: if covered {
                CoverageBasis::Policy
            } else {
                CoverageBasis::None
            },
        };
    }

    let basis = if backup.assumes_wildcard_coverage() {
        CoverageBasis::AssumedWildcard
    } else if backup.covered_namespaces.iter().any(|ns| ns == namespace) {
        CoverageBasis::NamespaceList
    } else {
        CoverageBasis::None
    };
    NamespaceCoverage {
        covered: basis.is_covered(),
        best_rpo_hours: None,
        basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(included: &[&str], excluded: &[&str], schedule: &str) -> BackupPolicy {
        BackupPolicy::scheduled("velero", "p", schedule)
            .including(included.iter().copied())
            .excluding(excluded.iter().copied())
    }

    #[test]
    fn empty_include_covers_all_but_excluded() {
        let p = policy(&[], &["ns-x"], "@daily");
        assert!(covers(&p, "ns-a"));
        assert!(covers(&p, "kube-system"));
        assert!(!covers(&p, "ns-x"));
    }

    #[test]
    fn explicit_include_covers_only_listed() {
        let p = policy(&["ns-y"], &[], "@daily");
        assert!(covers(&p, "ns-y"));
        assert!(!covers(&p, "ns-z"));
    }

    #[test]
    fn exclude_beats_wildcard_include() {
        let p = policy(&["*"], &["ns-x"], "@daily");
        assert!(covers(&p, "anything"));
        assert!(!covers(&p, "ns-x"));
    }

    #[test]
    fn best_rpo_ignores_unknown_and_non_covering() {
        let policies = vec![
            policy(&[], &[], "not cron"),
            policy(&["db"], &[], "@weekly"),
            policy(&["db"], &[], "0 */6 * * *"),
            policy(&["web"], &[], "@hourly"),
        ];
        assert_eq!(namespace_coverage(&policies, "db"), (true, Some(6)));
        assert_eq!(namespace_coverage(&policies, "other"), (true, None));
        assert_eq!(namespace_coverage(&[], "db"), (false, None));
    }

    #[test]
    fn no_tool_means_no_coverage() {
        let mut backup = BackupInventory::default();
        backup.policies.push(policy(&[], &[], "@daily"));
        assert_eq!(resolve_coverage(&backup, "db").basis, CoverageBasis::None);
    }

    #[test]
    fn policies_take_precedence_over_namespace_list() {
        let mut backup = BackupInventory::with_tool("velero");
        backup.covered_namespaces = vec!["*".to_string()];
        backup.policies.push(policy(&["db"], &[], "@daily"));

        let db = resolve_coverage(&backup, "db");
        assert_eq!(db.basis, CoverageBasis::Policy);
        assert_eq!(db.best_rpo_hours, Some(24));
        assert!(!resolve_coverage(&backup, "web").covered);
    }

    #[test]
    fn fallback_distinguishes_assumed_from_listed() {
        let mut backup = BackupInventory::with_tool("kasten");
        backup.covered_namespaces = vec!["*".to_string()];
        let assumed = resolve_coverage(&backup, "db");
        assert!(assumed.covered);
        assert_eq!(assumed.basis, CoverageBasis::AssumedWildcard);
        assert_eq!(assumed.best_rpo_hours, None);

        backup.covered_namespaces = vec!["db".to_string()];
        assert_eq!(resolve_coverage(&backup, "db").basis, CoverageBasis::NamespaceList);
        assert_eq!(resolve_coverage(&backup, "web").basis, CoverageBasis::None);
    }
}
