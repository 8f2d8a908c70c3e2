//! Shared deterministic types for topology lifecycle decisions.
//!
//! These types define stable contracts between the lifecycle logic and the
//! persistence/CLI layers. They should not depend on external state or I/O
//! and must remain deterministic across runs.

use serde::{Deserialize, Serialize};

/// Recognized action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTopology,
    Deploy,
    RunTest,
    RemoveTopology,
}

impl Action {
    /// Parse a caller-supplied action string.
    ///
    /// Returns `None` for anything outside the known set; unrecognized
    /// actions are still logged, so callers keep the raw string around.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add-topology" => Some(Self::AddTopology),
            "deploy" => Some(Self::Deploy),
            "run-test" => Some(Self::RunTest),
            "remove-topology" => Some(Self::RemoveTopology),
            _ => None,
        }
    }

    /// Canonical action name as it appears in log entries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddTopology => "add-topology",
            Self::Deploy => "deploy",
            Self::RunTest => "run-test",
            Self::RemoveTopology => "remove-topology",
        }
    }
}

/// One action attempt as supplied by the caller.
///
/// Fields arrive already validated for presence. `action` stays a raw string
/// so unrecognized actions can be recorded verbatim in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: String,
    pub topo: String,
    pub dut: String,
    pub server: String,
    pub test_name: Option<String>,
}

impl ActionRequest {
    /// Render the audit-log entry for this attempt:
    /// `"<action> <topo> <dut> <server>"`, with the test name appended for
    /// run-test attempts that carry one.
    pub fn log_entry(&self) -> String {
        let mut entry = format!("{} {} {} {}", self.action, self.topo, self.dut, self.server);
        if Action::parse(&self.action) == Some(Action::RunTest)
            && let Some(test_name) = &self.test_name
        {
            entry.push(' ');
            entry.push_str(test_name);
        }
        entry
    }
}

/// The single claimed topology, when one exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologyRecord {
    /// Topology identifier.
    pub name: String,
    /// Whether the management graph has been pushed for this topology.
    pub deployed: bool,
    /// Device-under-test identifier bound to this topology.
    pub dut: String,
    /// Server identifier bound to this topology.
    pub server: String,
}

impl TopologyRecord {
    /// Exact string equality on name, dut, and server against a request.
    pub fn matches(&self, request: &ActionRequest) -> bool {
        self.name == request.topo && self.dut == request.dut && self.server == request.server
    }
}

/// Derived view of the current-topology slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyState {
    /// No topology claimed (never created, removed, or storage missing).
    Absent,
    /// Record exists, not yet deployed.
    Added,
    /// Record exists and has been deployed.
    Deployed,
}

impl TopologyState {
    pub fn of(slot: Option<&TopologyRecord>) -> Self {
        match slot {
            None => Self::Absent,
            Some(record) if record.deployed => Self::Deployed,
            Some(_) => Self::Added,
        }
    }
}

/// Append-only audit history, partitioned by outcome.
///
/// Insertion order is preserved; entries are never rewritten, reordered, or
/// deduplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLog {
    pub success: Vec<String>,
    pub failures: Vec<String>,
}

/// Full persisted state: the topology slot plus the audit history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDb {
    pub current_topo: Option<TopologyRecord>,
    pub actions: ActionLog,
}

impl ActionDb {
    pub fn state(&self) -> TopologyState {
        TopologyState::of(self.current_topo.as_ref())
    }
}

/// Caller-facing view of the stored state after an invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub current_topo: Option<CurrentTopo>,
    pub actions: ActionLog,
}

/// Topology summary inside a snapshot.
///
/// `deploy_mg` keeps the field name consumers of the original automation
/// module expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentTopo {
    pub name: String,
    pub deploy_mg: bool,
}

impl Snapshot {
    pub fn of(db: &ActionDb) -> Self {
        Self {
            current_topo: db.current_topo.as_ref().map(|record| CurrentTopo {
                name: record.name.clone(),
                deploy_mg: record.deployed,
            }),
            actions: db.actions.clone(),
        }
    }
}
