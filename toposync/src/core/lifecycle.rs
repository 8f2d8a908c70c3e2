//! Precondition checks and state transitions for the topology slot.

use std::fmt;

use crate::core::types::{Action, ActionDb, ActionRequest, TopologyRecord, TopologyState};

/// Why an attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `add-topology` while a topology is already claimed.
    TopologyPresent,
    /// Action requires a claimed topology but the slot is absent.
    NoTopology,
    /// Slot is claimed but name/dut/server differ from the request.
    IdentityMismatch,
    /// `run-test` against a topology that has not been deployed.
    NotDeployed,
    /// Action string outside the known set.
    UnrecognizedAction,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::TopologyPresent => "a topology is already claimed",
            Self::NoTopology => "no topology is claimed",
            Self::IdentityMismatch => "claimed topology does not match the request",
            Self::NotDeployed => "topology has not been deployed",
            Self::UnrecognizedAction => "unrecognized action",
        };
        f.write_str(msg)
    }
}

/// Outcome of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(RejectReason),
}

/// Result of applying one request: the entry that was logged and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub entry: String,
}

impl Decision {
    pub fn applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

/// Apply one action attempt to the in-memory db.
///
/// Enforces the precondition table, computes the next slot value, and appends
/// exactly one entry to exactly one log. Rejections leave the slot untouched;
/// they are data, not errors. Deterministic: replaying the same requests
/// against the same initial db always yields the same db.
pub fn apply_action(db: &mut ActionDb, request: &ActionRequest) -> Decision {
    let entry = request.log_entry();
    let outcome = match next_slot(db, request) {
        Ok(next) => {
            db.current_topo = next;
            db.actions.success.push(entry.clone());
            Outcome::Applied
        }
        Err(reason) => {
            db.actions.failures.push(entry.clone());
            Outcome::Rejected(reason)
        }
    };
    Decision { outcome, entry }
}

/// Evaluate the precondition table and compute the next slot value.
fn next_slot(
    db: &ActionDb,
    request: &ActionRequest,
) -> Result<Option<TopologyRecord>, RejectReason> {
    let action = Action::parse(&request.action).ok_or(RejectReason::UnrecognizedAction)?;
    match action {
        Action::AddTopology => match db.state() {
            TopologyState::Absent => Ok(Some(TopologyRecord {
                name: request.topo.clone(),
                deployed: false,
                dut: request.dut.clone(),
                server: request.server.clone(),
            })),
            TopologyState::Added | TopologyState::Deployed => Err(RejectReason::TopologyPresent),
        },
        Action::Deploy => {
            // Idempotent: deploying an already-deployed topology succeeds.
            let record = claimed_matching(db, request)?;
            Ok(Some(TopologyRecord {
                deployed: true,
                ..record.clone()
            }))
        }
        Action::RunTest => {
            let record = claimed_matching(db, request)?;
            if !record.deployed {
                return Err(RejectReason::NotDeployed);
            }
            Ok(db.current_topo.clone())
        }
        Action::RemoveTopology => {
            claimed_matching(db, request)?;
            Ok(None)
        }
    }
}

fn claimed_matching<'a>(
    db: &'a ActionDb,
    request: &ActionRequest,
) -> Result<&'a TopologyRecord, RejectReason> {
    let record = db.current_topo.as_ref().ok_or(RejectReason::NoTopology)?;
    if !record.matches(request) {
        return Err(RejectReason::IdentityMismatch);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{claimed_db, request, test_request};

    fn entries(log: &[String]) -> Vec<&str> {
        log.iter().map(String::as_str).collect()
    }

    /// Happy path: add → deploy → run-test all succeed and end Deployed.
    #[test]
    fn add_deploy_run_test_happy_path() {
        let mut db = ActionDb::default();
        let steps = [
            request("add-topology", "t1", "d1", "s1"),
            request("deploy", "t1", "d1", "s1"),
            test_request("t1", "d1", "s1", "ping"),
        ];
        for step in &steps {
            assert!(apply_action(&mut db, step).applied());
        }

        assert_eq!(db.state(), TopologyState::Deployed);
        assert!(db.actions.failures.is_empty());
        assert_eq!(
            entries(&db.actions.success),
            vec![
                "add-topology t1 d1 s1",
                "deploy t1 d1 s1",
                "run-test t1 d1 s1 ping",
            ]
        );
    }

    /// Deploy from Absent is rejected and the slot stays empty.
    #[test]
    fn deploy_from_absent_is_rejected() {
        let mut db = ActionDb::default();
        let decision = apply_action(&mut db, &request("deploy", "t1", "d1", "s1"));

        assert_eq!(decision.outcome, Outcome::Rejected(RejectReason::NoTopology));
        assert_eq!(db.state(), TopologyState::Absent);
        assert!(db.actions.success.is_empty());
        assert_eq!(entries(&db.actions.failures), vec!["deploy t1 d1 s1"]);
    }

    /// A second add without an intervening remove fails and keeps the first record.
    #[test]
    fn second_add_is_rejected_and_keeps_first_record() {
        let mut db = ActionDb::default();
        apply_action(&mut db, &request("add-topology", "t1", "d1", "s1"));
        let decision = apply_action(&mut db, &request("add-topology", "t2", "d2", "s2"));

        assert_eq!(
            decision.outcome,
            Outcome::Rejected(RejectReason::TopologyPresent)
        );
        let record = db.current_topo.as_ref().expect("record");
        assert_eq!(record.name, "t1");
        assert!(!record.deployed);
        assert_eq!(entries(&db.actions.failures), vec!["add-topology t2 d2 s2"]);
    }

    /// Deploying twice with identical identity is idempotent; both attempts succeed.
    #[test]
    fn deploy_twice_is_idempotent() {
        let mut db = ActionDb::default();
        apply_action(&mut db, &request("add-topology", "t1", "d1", "s1"));
        assert!(apply_action(&mut db, &request("deploy", "t1", "d1", "s1")).applied());
        assert!(apply_action(&mut db, &request("deploy", "t1", "d1", "s1")).applied());

        assert_eq!(db.state(), TopologyState::Deployed);
        assert_eq!(db.actions.success.len(), 3);
        assert!(db.actions.failures.is_empty());
    }

    /// run-test before deploy never mutates the record.
    #[test]
    fn run_test_before_deploy_is_rejected() {
        let mut db = claimed_db("t1", "d1", "s1", false);
        let decision = apply_action(&mut db, &test_request("t1", "d1", "s1", "ping"));

        assert_eq!(decision.outcome, Outcome::Rejected(RejectReason::NotDeployed));
        assert_eq!(db.state(), TopologyState::Added);
        assert_eq!(entries(&db.actions.failures), vec!["run-test t1 d1 s1 ping"]);
    }

    #[test]
    fn remove_on_absent_is_rejected() {
        let mut db = ActionDb::default();
        let decision = apply_action(&mut db, &request("remove-topology", "t1", "d1", "s1"));

        assert_eq!(decision.outcome, Outcome::Rejected(RejectReason::NoTopology));
        assert_eq!(db.state(), TopologyState::Absent);
        assert_eq!(
            entries(&db.actions.failures),
            vec!["remove-topology t1 d1 s1"]
        );
    }

    /// Any single mismatched identity field rejects the attempt.
    #[test]
    fn identity_mismatch_rejects_each_field() {
        for mismatched in [
            request("deploy", "t2", "d1", "s1"),
            request("deploy", "t1", "d2", "s1"),
            request("deploy", "t1", "d1", "s2"),
        ] {
            let mut db = claimed_db("t1", "d1", "s1", false);
            let decision = apply_action(&mut db, &mismatched);
            assert_eq!(
                decision.outcome,
                Outcome::Rejected(RejectReason::IdentityMismatch)
            );
            assert_eq!(db.state(), TopologyState::Added);
            assert_eq!(db.actions.failures.len(), 1);
        }
    }

    /// Unknown action strings are logged verbatim to failures.
    #[test]
    fn unrecognized_action_is_rejected_and_logged_verbatim() {
        let mut db = ActionDb::default();
        let decision = apply_action(&mut db, &request("reboot", "t1", "d1", "s1"));

        assert_eq!(
            decision.outcome,
            Outcome::Rejected(RejectReason::UnrecognizedAction)
        );
        assert_eq!(db.state(), TopologyState::Absent);
        assert_eq!(entries(&db.actions.failures), vec!["reboot t1 d1 s1"]);
    }

    /// remove-topology frees the slot for a fresh add.
    #[test]
    fn remove_returns_slot_to_absent() {
        let mut db = claimed_db("t1", "d1", "s1", true);
        assert!(apply_action(&mut db, &request("remove-topology", "t1", "d1", "s1")).applied());
        assert_eq!(db.state(), TopologyState::Absent);

        assert!(apply_action(&mut db, &request("add-topology", "t2", "d2", "s2")).applied());
        assert_eq!(db.current_topo.as_ref().expect("record").name, "t2");
    }

    /// Mixed successes and failures keep insertion order within each log.
    #[test]
    fn logs_preserve_insertion_order() {
        let mut db = ActionDb::default();
        let steps = [
            request("deploy", "t1", "d1", "s1"),
            request("add-topology", "t1", "d1", "s1"),
            request("run-test", "t1", "d1", "s1"),
            request("deploy", "t1", "d1", "s1"),
            request("remove-topology", "t2", "d1", "s1"),
        ];
        for step in &steps {
            apply_action(&mut db, step);
        }

        assert_eq!(
            entries(&db.actions.success),
            vec!["add-topology t1 d1 s1", "deploy t1 d1 s1"]
        );
        assert_eq!(
            entries(&db.actions.failures),
            vec![
                "deploy t1 d1 s1",
                "run-test t1 d1 s1",
                "remove-topology t2 d1 s1",
            ]
        );
        assert_eq!(db.state(), TopologyState::Deployed);
    }
}
