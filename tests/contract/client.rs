//! Typed client over the local gateway.

use starfleet_ledger::{ErrorKind, GatewayError, PersonnelClient, TrainingStatus, WorldState};

use crate::support::{enrolled_client, gateway};

#[test]
fn enroll_then_get() {
    let (gateway, _) = gateway();
    let client = enrolled_client(&gateway);

    let personnel = client.get_personnel("SF-001").unwrap();
    assert_eq!(personnel.name, "Malcom Reynolds");
    assert_eq!(personnel.campus, "Engineering");
}

#[test]
fn complete_training_and_query_it_back() {
    let (gateway, world) = gateway();
    let client = enrolled_client(&gateway);

    let record = client
        .complete_training(
            "TR-001",
            "SF-001",
            "Engineering",
            "ENG-WARP-201",
            "2024-06-01T12:00:00Z",
            "Captain Janeway",
        )
        .unwrap();
    assert_eq!(record.status, TrainingStatus::Completed);

    assert_eq!(client.get_training_record("TR-001").unwrap(), record);
    assert_eq!(client.training_history("SF-001").unwrap(), vec![record.clone()]);
    assert_eq!(client.training_roster("ENG-WARP-201").unwrap(), vec![record]);
    assert_eq!(world.open_iterators(), 0);
}

#[test]
fn duplicate_qualification_is_rejected_through_the_gateway() {
    let (gateway, _) = gateway();
    let client = enrolled_client(&gateway);
    let complete = |record_id: &str| {
        client.complete_training(
            record_id,
            "SF-001",
            "Engineering",
            "ENG-WARP-201",
            "2024-06-01T12:00:00Z",
            "Captain Janeway",
        )
    };

    complete("TR-001").unwrap();
    let err = complete("TR-002").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.status_code(), 409);
    assert!(!err.is_transient());
}

#[test]
fn client_validation_happens_before_any_call() {
    let (gateway, world) = gateway();
    let client = PersonnelClient::new(&gateway);

    let err = client.enroll_cadet("", "Name", "Engineering").unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(ref m) if m == "invalid personnel ID"));

    let err = client
        .complete_training("", "SF-001", "Engineering", "ENG-1", "2024-06-01T12:00:00Z", "X")
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(ref m) if m == "recordID is required"));

    assert_eq!(world.height().unwrap(), 0);
}

#[test]
fn campus_mismatch_is_failed_precondition() {
    let (gateway, _) = gateway();
    let client = enrolled_client(&gateway);

    let err = client
        .complete_training(
            "TR-001",
            "SF-001",
            "Science",
            "SCI-BIO-101",
            "2024-06-01T12:00:00Z",
            "Captain Janeway",
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    assert_eq!(err.status_code(), 412);
}

#[test]
fn snapshot_gateway_persists_between_instances() {
    let path = std::env::temp_dir().join(format!("starfleet-client-{}.bin", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let gateway = starfleet_ledger::LocalGateway::with_snapshot(
            Default::default(),
            starfleet_ledger::personnel_contract(),
            &path,
        )
        .unwrap();
        enrolled_client(&gateway);
    }

    let gateway = starfleet_ledger::LocalGateway::with_snapshot(
        Default::default(),
        starfleet_ledger::personnel_contract(),
        &path,
    )
    .unwrap();
    let personnel = PersonnelClient::new(&gateway).get_personnel("SF-001").unwrap();
    assert_eq!(personnel.personnel_id, "SF-001");

    let _ = std::fs::remove_file(&path);
}
