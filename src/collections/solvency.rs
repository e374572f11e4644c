//! The endpoint surface of the solvency proof backend, in the order it is checked.

use serde_json::{Value, json};

use crate::http::request::TestCase;
use crate::testing::Outcome;

use super::{Chain, Plan, Section};

pub const DEFAULT_BASE_URL: &str = "https://solvency-proof-production.up.railway.app";

const KNOWN_IDENTITY: &str = "alice";
const UNKNOWN_IDENTITY: &str = "unknown_user_xyz";
const PROOF_EPOCH: u64 = 1;
const SESSION_PARTICIPANT: &str = "0x1234567890123456789012345678901234567890";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanOptions {
    /// Ask the workflow endpoint to run proof generation as well.
    pub workflow_with_proof: bool,
}

pub fn plan(options: PlanOptions) -> Plan {
    Plan::new("SolvencyProof API")
        .section(
            Section::new("1. HEALTH CHECK").probe(
                TestCase::get("Health Check", "/health").require_fields(&["status", "timestamp"]),
            ),
        )
        .section(
            Section::new("2. LIABILITIES ENDPOINTS")
                .probe(
                    TestCase::get("Get Liabilities", "/api/liabilities").require_fields(&[
                        "liabilities",
                        "count",
                        "totalLiabilities",
                    ]),
                )
                .probe(
                    TestCase::post("Build Merkle Tree", "/api/liabilities/build").require_fields(&[
                        "success",
                        "merkleRoot",
                        "totalLiabilities",
                    ]),
                )
                .probe(TestCase::get(
                    "Verify Inclusion (alice)",
                    format!("/api/liabilities/verify/{KNOWN_IDENTITY}"),
                ))
                .probe(
                    TestCase::get(
                        "Verify Inclusion (unknown)",
                        format!("/api/liabilities/verify/{UNKNOWN_IDENTITY}"),
                    )
                    .expect_status(404),
                ),
        )
        .section(
            Section::new("3. RESERVES ENDPOINTS")
                .probe(
                    TestCase::get("Get Reserves", "/api/reserves")
                        .require_fields(&["reserves", "totalReserves"]),
                )
                .probe(
                    TestCase::post("Scan Reserves", "/api/reserves/scan")
                        .require_fields(&["success", "reserves"]),
                ),
        )
        .section(
            Section::new("4. PROOF ENDPOINTS")
                .probe(TestCase::get("Get Proof Data", "/api/proof"))
                .note("Testing proof generation (may take time)...")
                .probe(TestCase::post("Generate ZK Proof", "/api/proof/generate")),
        )
        .section(
            Section::new("5. CONTRACTS ENDPOINTS")
                .probe(
                    TestCase::get("Get Contract Addresses", "/api/contracts")
                        .require_fields(&["verifierAddress", "registryAddress"]),
                )
                .probe(TestCase::get("Get Epoch Count", "/api/contracts/epoch-count"))
                .probe(TestCase::get(
                    format!("Get On-Chain Proof (epoch {PROOF_EPOCH})"),
                    format!("/api/contracts/proof/{PROOF_EPOCH}"),
                )),
        )
        .section(
            Section::new("6. YELLOW NETWORK ENDPOINTS")
                .probe(
                    TestCase::get("Get Yellow Status", "/api/yellow/status").require_fields(&[
                        "connected",
                        "authenticated",
                        "sessionsCount",
                    ]),
                )
                .probe(TestCase::get("List Yellow Sessions", "/api/yellow/sessions"))
                .chain(Chain {
                    source: TestCase::post("Create Yellow Session", "/api/yellow/session")
                        .with_body(json!({ "participants": [SESSION_PARTICIPANT] })),
                    extract: extract_session_id,
                    dependents: session_cases,
                    label: "session",
                }),
        )
        .section(
            Section::new("7. FULL WORKFLOW TEST")
                .note("Testing full workflow (this may take a while)...")
                .probe(
                    TestCase::post("Full Workflow", "/api/workflow/full")
                        .with_body(json!({ "skipProof": !options.workflow_with_proof })),
                ),
        )
}

/// Session identifier from a successful creation response shaped like
/// `{"session": {"id": ...}}`. String and numeric ids are accepted.
pub fn extract_session_id(outcome: &Outcome) -> Option<String> {
    if !outcome.succeeded {
        return None;
    }

    let session = outcome.response.as_ref()?.as_json()?.get("session")?;
    match session.as_object()?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn session_cases(session_id: &str) -> Vec<TestCase> {
    vec![
        TestCase::get("Get Session Details", format!("/api/yellow/session/{session_id}")),
        TestCase::put(
            "Update Allocations",
            format!("/api/yellow/session/{session_id}/allocations"),
        )
        .with_body(json!({ "allocations": { "user1": "1000", "user2": "2000" } })),
        TestCase::get(
            "Get Session History",
            format!("/api/yellow/session/{session_id}/history"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use crate::http::response::ResponseBody;
    use crate::testing::report::CRITICAL_TESTS;

    fn creation_outcome(status: u16, body: Value) -> Outcome {
        let case = TestCase::post("Create Yellow Session", "/api/yellow/session");
        Outcome::responded(&case, status, 10.0, ResponseBody::Json(body))
    }

    #[test]
    fn plan_declares_every_static_probe_in_order() {
        let plan = plan(PlanOptions::default());
        let names: Vec<&str> = plan.static_cases().iter().map(|case| case.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Health Check",
                "Get Liabilities",
                "Build Merkle Tree",
                "Verify Inclusion (alice)",
                "Verify Inclusion (unknown)",
                "Get Reserves",
                "Scan Reserves",
                "Get Proof Data",
                "Generate ZK Proof",
                "Get Contract Addresses",
                "Get Epoch Count",
                "Get On-Chain Proof (epoch 1)",
                "Get Yellow Status",
                "List Yellow Sessions",
                "Create Yellow Session",
                "Full Workflow",
            ]
        );
    }

    #[test]
    fn every_critical_test_is_in_the_plan() {
        let plan = plan(PlanOptions::default());
        let cases = plan.static_cases();
        for name in CRITICAL_TESTS {
            assert!(cases.iter().any(|case| case.name == name), "{name} missing from plan");
        }
    }

    #[test]
    fn workflow_skips_proof_unless_requested() {
        let workflow_body = |options| {
            plan(options)
                .static_cases()
                .into_iter()
                .find(|case| case.name == "Full Workflow")
                .and_then(|case| case.body.clone())
        };

        assert_eq!(
            workflow_body(PlanOptions::default()),
            Some(json!({"skipProof": true}))
        );
        assert_eq!(
            workflow_body(PlanOptions { workflow_with_proof: true }),
            Some(json!({"skipProof": false}))
        );
    }

    #[test]
    fn extracts_string_and_numeric_session_ids() {
        let outcome = creation_outcome(200, json!({"session": {"id": "sess-42"}}));
        assert_eq!(extract_session_id(&outcome), Some("sess-42".into()));

        let outcome = creation_outcome(200, json!({"session": {"id": 7}}));
        assert_eq!(extract_session_id(&outcome), Some("7".into()));
    }

    #[test]
    fn extraction_requires_success_and_nested_session() {
        let failed = creation_outcome(500, json!({"session": {"id": "sess-42"}}));
        assert_eq!(extract_session_id(&failed), None);

        let no_session = creation_outcome(200, json!({"success": true}));
        assert_eq!(extract_session_id(&no_session), None);

        let no_id = creation_outcome(200, json!({"session": {"participants": []}}));
        assert_eq!(extract_session_id(&no_id), None);

        let session_not_object = creation_outcome(200, json!({"session": "sess-42"}));
        assert_eq!(extract_session_id(&session_not_object), None);
    }

    #[test]
    fn session_dependents_use_the_extracted_id() {
        let cases = session_cases("abc");
        let paths: Vec<(HttpMethod, &str)> =
            cases.iter().map(|case| (case.method, case.path.as_str())).collect();

        assert_eq!(
            paths,
            vec![
                (HttpMethod::Get, "/api/yellow/session/abc"),
                (HttpMethod::Put, "/api/yellow/session/abc/allocations"),
                (HttpMethod::Get, "/api/yellow/session/abc/history"),
            ]
        );
    }
}
