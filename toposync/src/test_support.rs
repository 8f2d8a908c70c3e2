//! Test-only helpers for constructing action requests and db states.

use crate::core::types::{ActionDb, ActionLog, ActionRequest, TopologyRecord};

/// Create a request with no test name.
pub fn request(action: &str, topo: &str, dut: &str, server: &str) -> ActionRequest {
    ActionRequest {
        action: action.to_string(),
        topo: topo.to_string(),
        dut: dut.to_string(),
        server: server.to_string(),
        test_name: None,
    }
}

/// Create a run-test request carrying a test name.
pub fn test_request(topo: &str, dut: &str, server: &str, test_name: &str) -> ActionRequest {
    ActionRequest {
        test_name: Some(test_name.to_string()),
        ..request("run-test", topo, dut, server)
    }
}

/// Create a db with a claimed topology at the given deployment stage and
/// empty logs.
pub fn claimed_db(name: &str, dut: &str, server: &str, deployed: bool) -> ActionDb {
    ActionDb {
        current_topo: Some(TopologyRecord {
            name: name.to_string(),
            deployed,
            dut: dut.to_string(),
            server: server.to_string(),
        }),
        actions: ActionLog::default(),
    }
}
