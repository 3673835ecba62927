//! Turns findings into an ordered list of remediation steps.
//!
//! Steps are tool-aware (Velero and Kasten get concrete commands) and
//! target-aware (bare-metal and VM recoveries get different storage and
//! registry advice). Output is stably sorted by priority, so steps of equal
//! priority keep finding order.

use std::collections::BTreeSet;

use drscore_model::{
    Finding, HelmRelease, Inventory, PRIORITY_CRITICAL, PRIORITY_OPTIONAL, PRIORITY_RECOMMENDED,
    RecoveryTarget, RemediationStep, StepCategory,
};
use tracing::debug;

pub fn generate(
    inventory: &Inventory,
    findings: &[Finding],
    target: RecoveryTarget,
) -> Vec<RemediationStep> {
    let tool = inventory.backup.tool_name();
    let env = StepEnv {
        tool: tool.as_deref(),
        target,
        platform: inventory.platform.as_deref(),
    };

    // Several findings can ask for the same fix; the first one keeps it.
    let mut titles = BTreeSet::new();
    let mut steps: Vec<RemediationStep> = findings
        .iter()
        .filter_map(|finding| step_for_finding(finding, &env))
        .filter(|step| titles.insert(step.title.clone()))
        .collect();

    if tool.is_none() && !has_finding(findings, "BACKUP_NONE") {
        steps.push(backup_install_step(target));
    }
    if !inventory.helm_releases.is_empty() {
        let step = helm_values_step(&inventory.helm_releases);
        steps.push(linked(step, findings, "HELM_UNTRACKED"));
    }
    let public_images = inventory.images.iter().filter(|img| img.is_public).count();
    if public_images > 0 {
        let step = image_mirror_step(public_images, target);
        steps.push(linked(step, findings, "IMAGE_EXTERNAL_REGISTRY"));
    }

    steps.sort_by_key(|step| step.priority);
    debug!(steps = steps.len(), target = %target, "remediation plan built");
    steps
}

struct StepEnv<'a> {
    tool: Option<&'a str>,
    target: RecoveryTarget,
    platform: Option<&'a str>,
}

fn has_finding(findings: &[Finding], id: &str) -> bool {
    findings.iter().any(|finding| finding.id == id)
}

fn linked(step: RemediationStep, findings: &[Finding], id: &str) -> RemediationStep {
    if has_finding(findings, id) {
        step.for_finding(id)
    } else {
        step
    }
}

fn split_ref(resource_id: &str) -> (&str, &str) {
    resource_id.split_once('/').unwrap_or(("default", resource_id))
}

fn step_for_finding(finding: &Finding, env: &StepEnv<'_>) -> Option<RemediationStep> {
    let rid = finding.resource_id.as_str();
    let (ns, name) = split_ref(rid);
    let step = match finding.id.as_str() {
        "BACKUP_NONE" => backup_install_step(env.target),
        "BACKUP_PARTIAL_COVERAGE" | "RESTORE_COVERAGE_GAP" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Backup,
            "Extend backup coverage to all stateful namespaces",
            format!("Uncovered namespaces: {rid}"),
        )
        .commands(backup_policy_commands(env.tool, rid)),
        "BACKUP_NO_POLICIES" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Backup,
            "Create backup schedules for all production namespaces",
            "Backup tool detected but no backup policies or schedules found.",
        )
        .commands(backup_schedule_commands(env.tool)),
        "BACKUP_NO_OFFSITE" => RemediationStep::new(
            PRIORITY_RECOMMENDED,
            StepCategory::Backup,
            "Send backups to an offsite location",
            "Backups stored only inside the cluster's failure domain are lost with it.",
        )
        .commands(offsite_commands(env.tool)),
        "ETCD_BACKUP_MISSING" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Backup,
            "Schedule etcd snapshots",
            "Without an etcd snapshot the control plane state cannot be rebuilt.",
        )
        .commands([
            "ETCDCTL_API=3 etcdctl snapshot save /var/backups/etcd-$(date +%F).db",
            "# Copy snapshots off the control-plane nodes on a schedule",
        ]),
        "PVC_UNBOUND" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Storage,
            format!("Fix unbound PVC: {rid}"),
            "Unbound PVCs will not be backed up or restored correctly.",
        )
        .commands([
            format!("kubectl describe pvc {name} -n {ns}"),
            format!("kubectl get events -n {ns} --field-selector reason=FailedBinding"),
        ]),
        "PV_HOSTPATH" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Storage,
            format!("Migrate hostPath PV to CSI storage: {rid}"),
            "hostPath volumes are node-local and cannot be restored to a different node.",
        )
        .commands([
            "# Provision a new PV using a CSI driver",
            "# Migrate data: kubectl cp or use a migration tool",
            "# Update PVC to reference new PV",
        ])
        .target_notes(csi_note(env.target, env.platform)),
        "PV_DELETE_POLICY" => RemediationStep::new(
            PRIORITY_RECOMMENDED,
            StepCategory::Storage,
            format!("Change PV reclaim policy to Retain: {rid}"),
            "Delete policy removes the PV together with its claim, making restore impossible.",
        )
        .commands([format!(
            "kubectl patch pv {rid} -p '{{\"spec\":{{\"persistentVolumeReclaimPolicy\":\"Retain\"}}}}'"
        )]),
        "PVC_NO_STORAGECLASS" => RemediationStep::new(
            PRIORITY_RECOMMENDED,
            StepCategory::Storage,
            format!("Add explicit storageClass to PVC: {rid}"),
            "PVCs without a storageClass rely on cluster defaults which may not exist in the DR environment.",
        )
        .commands([
            "# Edit PVC spec to set storageClassName explicitly".to_string(),
            format!("kubectl edit pvc {name} -n {ns}"),
        ]),
        "STS_NO_PVC" => RemediationStep::new(
            PRIORITY_RECOMMENDED,
            StepCategory::Workload,
            format!("Add volumeClaimTemplate to StatefulSet: {rid}"),
            "StatefulSets without persistent storage lose all data on pod restart or DR event.",
        )
        .commands([format!("kubectl edit statefulset {name} -n {ns}")]),
        "NAMESPACE_NO_NETWORKPOLICY" => RemediationStep::new(
            PRIORITY_OPTIONAL,
            StepCategory::Network,
            "Add default-deny NetworkPolicies",
            format!("Namespaces without any NetworkPolicy: {rid}"),
        ),
        "CRD_NO_BACKUP" => RemediationStep::new(
            PRIORITY_RECOMMENDED,
            StepCategory::Config,
            "Capture CRD definitions before DR",
            "Custom Resource Definitions must be restored before custom resources can be recreated.",
        )
        .commands([
            "kubectl get crds -o yaml > crds-backup.yaml",
            "# Store crds-backup.yaml in a safe external location",
        ]),
        "CERT_EXPIRING_SOON" => RemediationStep::new(
            PRIORITY_CRITICAL,
            StepCategory::Config,
            format!("Renew expiring certificate: {rid}"),
            "A certificate expiring during a DR event will cause service failures.",
        )
        .commands([
            "# cert-manager: annotate to force renewal".to_string(),
            format!(
                "kubectl annotate certificate {name} -n {ns} cert-manager.io/force-renewal=true"
            ),
        ]),
        _ => return None,
    };
    Some(step.for_finding(finding.id.as_str()))
}

fn backup_install_step(target: RecoveryTarget) -> RemediationStep {
    let notes = match target {
        RecoveryTarget::Baremetal => {
            "Bare metal target: Kasten K10 or Velero with MinIO as local S3 backend are good choices. Longhorn provides native snapshot support."
        }
        RecoveryTarget::Vm => {
            "VM target: Kasten K10 or Velero with cloud storage backend (S3, Azure Blob, GCS) are recommended."
        }
    };
    RemediationStep::new(
        PRIORITY_CRITICAL,
        StepCategory::Backup,
        "Install a backup solution: no backup tool detected",
        "Without a backup tool, cluster recovery is not possible. Install Kasten K10, Velero, or Rubrik.",
    )
    .commands([
        "# Kasten K10 install:\nhelm repo add kasten https://charts.kasten.io/\nhelm install k10 kasten/k10 --namespace kasten-io --create-namespace",
        "# Velero install (example with AWS S3):\nvelero install --provider aws --plugins velero/velero-plugin-for-aws:v1.9.0 \\\n  --bucket <BUCKET> --backup-location-config region=<REGION> \\\n  --secret-file ./credentials-velero",
    ])
    .target_notes(notes)
}

fn backup_schedule_commands(tool: Option<&str>) -> Vec<String> {
    match tool {
        Some("velero") => vec![
            "# Create a daily Velero backup schedule covering all namespaces:".to_string(),
            "velero schedule create daily-full --schedule='0 2 * * *' --include-namespaces='*'"
                .to_string(),
        ],
        Some("kasten") => vec![
            "# In the Kasten K10 UI, navigate to Policies and create a policy".to_string(),
            "# Set frequency to Daily, include all namespaces, configure export location"
                .to_string(),
        ],
        _ => vec![
            "# Configure backup schedules in your backup tool covering all production namespaces"
                .to_string(),
        ],
    }
}

fn backup_policy_commands(tool: Option<&str>, namespaces: &str) -> Vec<String> {
    match tool {
        Some("velero") => vec![
            format!("# Add these namespaces to your Velero schedule: {namespaces}"),
            "velero schedule describe daily-full".to_string(),
            "# Update schedule with --include-namespaces or create additional schedules"
                .to_string(),
        ],
        _ => vec![format!(
            "# Extend backup policies to cover namespaces: {namespaces}"
        )],
    }
}

fn offsite_commands(tool: Option<&str>) -> Vec<String> {
    match tool {
        Some("velero") => vec![
            "velero backup-location create offsite --provider aws --bucket <BUCKET> --config region=<REGION>"
                .to_string(),
            "# Point schedules at the new location with --storage-location offsite".to_string(),
        ],
        Some("kasten") => vec![
            "# Add a Location Profile for object storage and enable export in each policy"
                .to_string(),
        ],
        _ => vec!["# Configure an offsite/object-storage target in your backup tool".to_string()],
    }
}

fn csi_note(target: RecoveryTarget, platform: Option<&str>) -> &'static str {
    match platform.map(str::to_ascii_uppercase).as_deref() {
        Some("EKS") => "EKS: use the AWS EBS CSI driver (aws-ebs-csi-driver).",
        Some("AKS") => "AKS: use the Azure Disk CSI driver (disk.csi.azure.com).",
        Some("GKE") => "GKE: use the GCE PD CSI driver (pd.csi.storage.gke.io).",
        _ => match target {
            RecoveryTarget::Baremetal => {
                "Bare metal recovery: consider Longhorn (helm install longhorn longhorn/longhorn -n longhorn-system) or OpenEBS as a CSI replacement."
            }
            RecoveryTarget::Vm => {
                "VM recovery: use the appropriate cloud or vSphere CSI driver for your target environment."
            }
        },
    }
}

fn helm_values_step(releases: &[HelmRelease]) -> RemediationStep {
    let mut sorted: Vec<&HelmRelease> = releases.iter().collect();
    sorted.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));

    let mut commands = vec!["# Export values for each Helm release:".to_string()];
    commands.extend(sorted.iter().map(|release| {
        format!(
            "helm get values {name} -n {ns} > {name}-values.yaml",
            name = release.name,
            ns = release.namespace
        )
    }));
    commands.push("# Store these files in a safe external location (git, S3, etc.)".to_string());

    RemediationStep::new(
        PRIORITY_OPTIONAL,
        StepCategory::Config,
        format!("Back up values for {} Helm release(s)", releases.len()),
        "Helm release values are required to reinstall applications in the DR environment.",
    )
    .commands(commands)
}

fn image_mirror_step(count: usize, target: RecoveryTarget) -> RemediationStep {
    let notes = match target {
        RecoveryTarget::Baremetal => {
            "Bare metal target: set up a private registry (Harbor, Nexus) reachable from recovery nodes, or pre-pull images to all nodes."
        }
        RecoveryTarget::Vm => {
            "VM target: use a registry in the same cloud region or VPN-accessible private registry to reduce pull latency."
        }
    };
    RemediationStep::new(
        PRIORITY_RECOMMENDED,
        StepCategory::Config,
        format!("Mirror {count} public image(s) to a private registry"),
        "Public registry images may be unavailable in the DR environment if network access is restricted.",
    )
    .commands([
        "# List all public images:\nkubectl get pods -A -o jsonpath='{range .items[*]}{.spec.containers[*].image}{\"\\n\"}{end}' | sort -u",
        "# Pull and push to private registry:\n# docker pull <image> && docker tag <image> <private-registry>/<image> && docker push <private-registry>/<image>",
    ])
    .target_notes(notes)
}
