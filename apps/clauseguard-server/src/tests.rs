//! Tests for the ClauseGuard server API
//!
//! Endpoint tests run the real router via axum-test; property tests fuzz
//! the engine invariants the API contract depends on.

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;

use risk_engine::{EngineConfig, RiskEngine};
use shared_types::{AnalysisReport, RiskType};

use crate::{app, AppState};

const MAX_UPLOAD: usize = 10 * 1024 * 1024;

const CONTRACT: &str = "\
1. The Employee shall not, for a period of two (2) years after the termination of this \
Agreement, engage in any business that competes with the Company within a 100-mile radius.

2. Consultant agrees to indemnify Client against all claims arising from Consultant's work \
performed under this Agreement.

3. This Agreement shall be governed by the laws of the State of New York, without regard to \
its conflict of laws principles.";

fn test_server() -> TestServer {
    let state = AppState {
        engine: Arc::new(RiskEngine::new(EngineConfig::default())),
    };
    TestServer::new(app(state, MAX_UPLOAD)).expect("test server")
}

fn contract_form(user_rule: Option<&str>) -> MultipartForm {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(CONTRACT.as_bytes().to_vec())
            .file_name("contract.txt")
            .mime_type("text/plain"),
    );
    if let Some(rule) = user_rule {
        form = form.add_text("user_rule", rule);
    }
    form
}

#[tokio::test]
async fn health_reports_ready() {
    let server = test_server();
    let res = server.get("/health").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["service"], "clauseguard-server");
}

#[tokio::test]
async fn analyze_document_returns_full_report() {
    let server = test_server();
    let res = server
        .post("/analyze_document")
        .multipart(contract_form(None))
        .await;
    res.assert_status_ok();

    let report: AnalysisReport = res.json();
    assert_eq!(report.filename, "contract.txt");
    assert_eq!(report.total_clauses_scanned, report.results.len());
    assert_eq!(
        report.risks_found,
        report
            .results
            .iter()
            .filter(|r| r.risk_type != RiskType::Safe)
            .count()
    );

    let first = &report.results[0];
    assert_eq!(first.risk_type, RiskType::NonCompete);
    assert!((first.confidence - 0.98).abs() < 1e-9);
    assert!(first.explanation.contains("**Recommendation:**"));
}

#[tokio::test]
async fn custom_rule_scopes_the_report() {
    let server = test_server();
    let res = server
        .post("/analyze_document")
        .multipart(contract_form(Some("only flag indemnification clauses")))
        .await;
    res.assert_status_ok();

    let report: AnalysisReport = res.json();
    let risky: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.risk_type != RiskType::Safe)
        .collect();
    assert_eq!(risky.len(), 1);
    assert_eq!(risky[0].risk_type, RiskType::Indemnification);
    // Every clause is still present, the non-compete as Safe.
    assert_eq!(report.total_clauses_scanned, report.results.len());
    assert_eq!(report.results[0].risk_type, RiskType::Safe);
}

#[tokio::test]
async fn unsupported_format_is_rejected_without_partial_report() {
    let server = test_server();
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"PK\x03\x04fake-docx".to_vec())
            .file_name("contract.docx")
            .mime_type("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    );
    let res = server.post("/analyze_document").multipart(form).await;
    assert_eq!(res.status_code().as_u16(), 415);

    let body: Value = res.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
    assert!(body.get("results").is_none());
}

#[tokio::test]
async fn missing_file_field_is_invalid_request() {
    let server = test_server();
    let form = MultipartForm::new().add_text("user_rule", "only flag termination");
    let res = server.post("/analyze_document").multipart(form).await;
    assert_eq!(res.status_code().as_u16(), 400);

    let body: Value = res.json();
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn empty_document_yields_empty_report_not_an_error() {
    let server = test_server();
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(Vec::new())
            .file_name("empty.txt")
            .mime_type("text/plain"),
    );
    let res = server.post("/analyze_document").multipart(form).await;
    res.assert_status_ok();

    let report: AnalysisReport = res.json();
    assert_eq!(report.total_clauses_scanned, 0);
    assert_eq!(report.risks_found, 0);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn gibberish_rule_still_analyzes() {
    let server = test_server();
    let res = server
        .post("/analyze_document")
        .multipart(contract_form(Some("per my last email, thanks!!")))
        .await;
    res.assert_status_ok();
    let report: AnalysisReport = res.json();
    assert_eq!(report.results[0].risk_type, RiskType::NonCompete);
}

#[tokio::test]
async fn user_sync_acknowledges() {
    let server = test_server();
    let res = server
        .post("/users/sync")
        .json(&serde_json::json!({
            "clerk_id": "user_123",
            "email": "a@example.com",
            "name": "A"
        }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["status"], "synced");
}

mod property_tests {
    use proptest::prelude::*;

    use risk_engine::rules::RuleCompiler;
    use risk_engine::{EngineConfig, RiskEngine};
    use shared_types::RiskType;

    proptest! {
        /// Property: rule compilation never fails, whatever the user types.
        #[test]
        fn rule_compiler_never_panics(rule in ".{0,200}") {
            let _ = RuleCompiler::compile(Some(&rule));
        }

        /// Property: report invariants hold for arbitrary documents.
        #[test]
        fn report_invariants_hold(doc in "[ -~\n]{0,2000}") {
            let engine = RiskEngine::new(EngineConfig::default());
            let report = engine.analyze_text("fuzz.txt", &doc, None);

            prop_assert_eq!(report.total_clauses_scanned, report.results.len());
            let risky = report
                .results
                .iter()
                .filter(|r| r.risk_type != RiskType::Safe)
                .count();
            prop_assert_eq!(report.risks_found, risky);
            for (index, result) in report.results.iter().enumerate() {
                prop_assert_eq!(result.id, index + 1);
                prop_assert!((0.0..=1.0).contains(&result.confidence));
                prop_assert!(!result.explanation.is_empty());
            }
        }

        /// Property: analysis is deterministic for any (document, rule) pair.
        #[test]
        fn analysis_is_deterministic(
            doc in "[ -~\n]{0,500}",
            rule in proptest::option::of("[ -~]{0,60}"),
        ) {
            let engine = RiskEngine::new(EngineConfig::default());
            let first = engine.analyze_text("fuzz.txt", &doc, rule.as_deref());
            let second = engine.analyze_text("fuzz.txt", &doc, rule.as_deref());
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }
}
