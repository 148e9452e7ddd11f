use proofgate::GateOptions;
use proofgate::core::config::{self, GateConfig};
use proofgate::core::error::{EXIT_COVERAGE_GAP, EXIT_FAULT, EXIT_PASS, GateError};
use proofgate::core::listing::parse_listing;
use proofgate::core::matcher::{determine_missing, reconcile};
use proofgate::core::reporter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const CRITICAL: [&str; 6] = [
    "gate_treatment_sat_ok",
    "gate_hydraulic_structural_ok",
    "gate_fouling_om_ok",
    "gate_social_governance_ok",
    "compute_violation_residual",
    "validate_shard_invariants",
];

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn critical() -> Vec<String> {
    CRITICAL.iter().map(|s| s.to_string()).collect()
}

fn options(cwd: &Path) -> GateOptions {
    GateOptions {
        cwd: cwd.to_path_buf(),
        ..GateOptions::default()
    }
}

#[test]
fn shipped_config_carries_the_six_predicates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(config::CONFIG_FILE_NAME);
    let config: GateConfig = config::load_config(&path).expect("shipped config loads");
    assert_eq!(config.gate.critical_predicates, critical());
    assert!(config.gate.reject_duplicates);
    assert_eq!(
        config.verifier.display_command(),
        "cargo kani --list --output-format=json"
    );
}

#[test]
fn kani_document_fixture_reconciles() {
    let text = fs::read_to_string(fixture("kani-list.json")).expect("read fixture");
    let proven = parse_listing(&text).expect("fixture parses");
    let report = reconcile(&critical(), &proven);

    assert_eq!(report.missing(), vec!["gate_social_governance_ok".to_string()]);
    let residual = report
        .entries
        .iter()
        .find(|e| e.predicate == "compute_violation_residual")
        .expect("entry");
    assert_eq!(residual.covered_by.as_deref(), Some("compute_violation_residual"));
}

#[test]
fn flat_fixture_reconciles() {
    let text = fs::read_to_string(fixture("flat-listing.json")).expect("read fixture");
    let proven = parse_listing(&text).expect("fixture parses");
    let missing = determine_missing(
        &["gate_treatment_sat_ok".to_string(), "compute_violation_residual".to_string()],
        &proven,
    );
    assert!(missing.is_empty());
}

#[test]
fn check_with_captured_listing() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(config::CONFIG_FILE_NAME),
        "[gate]\ncritical_predicates = [\"gate_fouling_om_ok\", \"validate_shard_invariants\"]\n",
    )
    .expect("write config");

    let mut opts = options(tmp.path());
    opts.listing = Some(fixture("kani-list.json"));
    let summary = proofgate::check(&opts).expect("check runs");

    assert!(summary.passed());
    assert_eq!(summary.exit_code(), EXIT_PASS);
    assert_eq!(summary.proven_count, 6);
    assert!(summary.source.starts_with("file:"));

    let json = reporter::render_json(&summary);
    assert_eq!(json["status"], "pass");
    assert_eq!(json["coverage"].as_array().map(Vec::len), Some(2));
}

#[test]
fn contract_without_harness_leaves_gap() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(config::CONFIG_FILE_NAME),
        r#"[gate]
critical_predicates = ["gate_social_governance_ok", "compute_violation_residual"]
"#,
    )
    .expect("write config");
    let listing = tmp.path().join("kani-list.json");
    fs::write(
        &listing,
        r#"{"contract-harnesses": {"src/residual.rs": ["residual::check_residual_contract"]},
            "contracts": [
                {"function": "gate_social_governance_ok", "harnesses": []},
                {"function": "compute_violation_residual",
                 "harnesses": ["residual::check_residual_contract"]}
            ]}"#,
    )
    .expect("write listing");

    let mut opts = options(tmp.path());
    opts.listing = Some(listing);
    let summary = proofgate::check(&opts).expect("check runs");

    assert_eq!(summary.exit_code(), EXIT_COVERAGE_GAP);
    assert_eq!(summary.missing, vec!["gate_social_governance_ok".to_string()]);
}

#[cfg(unix)]
#[test]
fn check_invokes_configured_verifier() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(config::CONFIG_FILE_NAME),
        r#"[gate]
critical_predicates = ["gate_social_governance_ok", "gate_treatment_sat_ok"]

[verifier]
command = "sh"
args = ["-c", "printf '[\"treatment::verify_gate_treatment_sat_ok\"]'"]
timeout_secs = 10
"#,
    )
    .expect("write config");

    let summary = proofgate::check(&options(tmp.path())).expect("check runs");
    assert_eq!(summary.exit_code(), EXIT_COVERAGE_GAP);
    assert_eq!(summary.missing, vec!["gate_social_governance_ok".to_string()]);
    assert_eq!(summary.critical.len(), 2);
}

#[test]
fn check_without_config_is_config_fault() {
    let tmp = tempdir().expect("tempdir");
    let err = proofgate::check(&options(tmp.path())).unwrap_err();
    assert!(matches!(err, GateError::Config(_)));
    assert_eq!(err.exit_code(), EXIT_FAULT);
}

#[test]
fn check_with_unreadable_listing_is_io_fault() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(config::CONFIG_FILE_NAME),
        "[gate]\ncritical_predicates = []\n",
    )
    .expect("write config");
    let mut opts = options(tmp.path());
    opts.listing = Some(PathBuf::from("does-not-exist.json"));
    let err = proofgate::check(&opts).unwrap_err();
    assert!(matches!(err, GateError::Io(_)));
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn timeout_env_must_be_numeric() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(config::CONFIG_FILE_NAME),
        "[gate]\ncritical_predicates = []\n",
    )
    .expect("write config");
    let mut opts = options(tmp.path());
    opts.timeout_env = Some("forever".to_string());
    let err = proofgate::check(&opts).unwrap_err();
    assert!(err.to_string().contains("PROOFGATE_TIMEOUT_SECS"));
}
