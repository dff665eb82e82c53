use starfleet_ledger::{
    CompositeKey, Document, ErrorKind, IndexEntry, InMemoryWorldState, Invocation, LedgerError,
    Personnel, PersonnelLedger, PersonnelStatus, TrainingByCode, TrainingRecord, TrainingStatus,
    TRAINING_BY_CODE, TRAINING_BY_PERSONNEL,
};

use crate::support::{attempt, enroll, put_document, put_raw, submit, train, CAMPUS, WARP};

const AT: &str = "2024-06-01T12:00:00Z";

fn complete(
    world: &InMemoryWorldState,
    record_id: &str,
    personnel_id: &str,
    campus: &str,
) -> (Result<TrainingRecord, LedgerError>, Vec<String>) {
    attempt(world, |ledger| {
        ledger.complete_training(record_id, personnel_id, campus, WARP, AT, "Captain Janeway")
    })
}

#[test]
fn completion_writes_record_and_both_index_entries() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");

    let record = submit(&world, |ledger| {
        ledger.complete_training("TR-001", "SF-001", CAMPUS, WARP, AT, "Captain Janeway")
    })
    .unwrap();
    assert_eq!(record.status, TrainingStatus::Completed);
    assert_eq!(record.completed_at, AT);

    let entries = world.entries().unwrap();
    let keys: Vec<&str> = entries.iter().map(|kv| kv.key.as_str()).collect();
    assert!(keys.contains(&"training:TR-001"));
    assert!(keys.contains(&"\u{0}training_byPersonnel\u{0}SF-001\u{0}2024-06-01T12:00:00Z\u{0}TR-001\u{0}"));
    assert!(keys.contains(&"\u{0}training_byCode\u{0}ENG-WARP-201\u{0}SF-001\u{0}TR-001\u{0}"));
    assert_eq!(entries.len(), 4);

    for kv in entries.iter().filter(|kv| kv.key.starts_with('\u{0}')) {
        assert_eq!(kv.value, vec![0x00]);
    }
}

#[test]
fn index_keys_decode_back_to_record_fields() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    train(&world, "TR-001", "SF-001", WARP, AT);

    for kv in world.entries().unwrap() {
        if let Ok(fields) = TRAINING_BY_PERSONNEL.decode(&kv.key) {
            assert_eq!(fields, vec!["SF-001", AT, "TR-001"]);
        } else if let Ok(fields) = TRAINING_BY_CODE.decode(&kv.key) {
            assert_eq!(fields, vec![WARP, "SF-001", "TR-001"]);
        }
    }
}

#[test]
fn stored_record_uses_snake_case_fields() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    train(&world, "TR-001", "SF-001", WARP, AT);

    let stored = world
        .entries()
        .unwrap()
        .into_iter()
        .find(|kv| kv.key == "training:TR-001")
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&stored.value).unwrap();
    assert_eq!(json["record_id"], "TR-001");
    assert_eq!(json["training_code"], WARP);
    assert_eq!(json["completed_at"], AT);
    assert_eq!(json["issued_by"], "Captain Janeway");
    assert_eq!(json["status"], "Completed");
}

#[test]
fn missing_arguments_reported_in_parameter_order() {
    let world = InMemoryWorldState::new();
    let cases = [
        (["", "", "", "", "", ""], "recordID"),
        (["TR-1", "", "", "", "", ""], "personnelID"),
        (["TR-1", "SF-1", "", "", "", ""], "campus"),
        (["TR-1", "SF-1", CAMPUS, "", "", ""], "trainingCode"),
        (["TR-1", "SF-1", CAMPUS, WARP, "", ""], "completedAt"),
        (["TR-1", "SF-1", CAMPUS, WARP, AT, ""], "issuedBy"),
    ];

    for (a, field) in cases {
        let (result, writes) = attempt(&world, |ledger| {
            ledger.complete_training(a[0], a[1], a[2], a[3], a[4], a[5])
        });
        match result {
            Err(LedgerError::MissingArgument { field: got }) => assert_eq!(got, field),
            other => panic!("expected MissingArgument for {field}, got {other:?}"),
        }
        assert!(writes.is_empty());
    }
}

#[test]
fn timestamp_must_be_rfc3339() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");

    for bad in [
        "2024-06-01",
        "June 1st 2024",
        "2024-06-01T12:00:00",
        "2024-06-01 12:00:00Z",
        "2024-06-01t12:00:00z",
        "2024-06-01T12:00:00z",
    ] {
        let (result, writes) = attempt(&world, |ledger| {
            ledger.complete_training("TR-001", "SF-001", CAMPUS, WARP, bad, "Captain Janeway")
        });
        let err = result.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTimestamp { field: "completedAt", .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(writes.is_empty());
    }
}

#[test]
fn offset_timestamps_are_stored_verbatim() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    let at = "2024-06-01T14:00:00+02:00";

    let record = submit(&world, |ledger| {
        ledger.complete_training("TR-001", "SF-001", CAMPUS, WARP, at, "Captain Janeway")
    })
    .unwrap();
    assert_eq!(record.completed_at, at);
    assert_eq!(
        record.completed_at_time().unwrap().timestamp(),
        chrono::DateTime::parse_from_rfc3339(AT).unwrap().timestamp()
    );
}

#[test]
fn duplicate_record_id_is_already_exists() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    enroll(&world, "SF-002");
    train(&world, "TR-001", "SF-001", WARP, AT);

    let (result, writes) = complete(&world, "TR-001", "SF-002", CAMPUS);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "training with ID [TR-001] already exists");
    assert!(writes.is_empty());
}

#[test]
fn unknown_personnel_is_not_found_without_writes() {
    let world = InMemoryWorldState::new();
    let (result, writes) = complete(&world, "TR-001", "SF-404", CAMPUS);

    assert!(matches!(
        result,
        Err(LedgerError::NotFound { doc_type: "personnel", ref id }) if id == "SF-404"
    ));
    assert!(writes.is_empty());
    assert_eq!(world.entries().unwrap().len(), 0);
}

#[test]
fn campus_mismatch_is_failed_precondition_without_writes() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");

    let (result, writes) = complete(&world, "TR-001", "SF-001", "Science");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    assert!(matches!(
        err,
        LedgerError::CampusMismatch { ref requested, ref current, .. }
            if requested == "Science" && current == CAMPUS
    ));
    assert!(writes.is_empty());
}

#[test]
fn inactive_personnel_cannot_complete_training() {
    let world = InMemoryWorldState::new();
    let mut personnel = Personnel::cadet("SF-001", "Malcom Reynolds", CAMPUS);
    personnel.status = PersonnelStatus::Inactive;
    put_document(&world, &personnel);

    let (result, writes) = complete(&world, "TR-001", "SF-001", CAMPUS);
    assert!(matches!(
        result,
        Err(LedgerError::InactivePersonnel { ref status, .. }) if status == "Inactive"
    ));
    assert!(writes.is_empty());
}

#[test]
fn second_completion_of_same_code_is_rejected() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    train(&world, "TR-001", "SF-001", WARP, AT);
    let before = world.entries().unwrap();

    let (result, writes) = complete(&world, "TR-002", "SF-001", CAMPUS);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(err.to_string().starts_with("qualification already held"));
    assert!(matches!(err, LedgerError::QualificationHeld { ref record_id, .. } if record_id == "TR-001"));
    assert!(writes.is_empty());
    assert_eq!(world.entries().unwrap(), before);
}

#[test]
fn same_code_for_a_different_person_is_allowed() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    enroll(&world, "SF-002");
    train(&world, "TR-001", "SF-001", WARP, AT);

    let (result, writes) = complete(&world, "TR-002", "SF-002", CAMPUS);
    assert!(result.is_ok());
    assert_eq!(writes.len(), 3);
}

#[test]
fn prefix_sharing_person_ids_do_not_collide() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-1");
    enroll(&world, "SF-10");
    train(&world, "TR-001", "SF-10", WARP, AT);

    let (result, _) = complete(&world, "TR-002", "SF-1", CAMPUS);
    assert!(result.is_ok());
}

#[test]
fn revoked_record_does_not_block_new_completion() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    train(&world, "TR-001", "SF-001", WARP, AT);

    let (record, _) = attempt(&world, |ledger| ledger.get_training_record("TR-001"));
    let mut revoked = record.unwrap();
    revoked.status = TrainingStatus::Revoked;
    put_document(&world, &revoked);

    let (result, _) = complete(&world, "TR-002", "SF-001", CAMPUS);
    assert!(result.is_ok());
}

#[test]
fn dangling_index_entry_is_skipped() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    let dangling = TrainingByCode {
        training_code: WARP.into(),
        personnel_id: "SF-001".into(),
        record_id: "TR-GONE".into(),
    };
    put_raw(&world, &dangling.key().unwrap(), &[0x00]);

    let (result, writes) = complete(&world, "TR-001", "SF-001", CAMPUS);
    assert!(result.is_ok());
    assert_eq!(writes.len(), 3);
}

#[test]
fn malformed_index_entry_is_skipped() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");
    let short = CompositeKey::new("training_byCode", [WARP, "SF-001"])
        .unwrap()
        .encode();
    put_raw(&world, &short, &[0x00]);

    let (result, writes) = complete(&world, "TR-001", "SF-001", CAMPUS);
    assert_eq!(result.unwrap().record_id, "TR-001");
    assert_eq!(writes.len(), 3);
    assert_eq!(world.open_iterators(), 0);
}

#[test]
fn concurrent_completions_of_same_code_conflict_on_commit() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");

    let mut first = Invocation::new(&world, "tx-a");
    let mut second = Invocation::new(&world, "tx-b");
    PersonnelLedger::new(&mut first)
        .complete_training("TR-A", "SF-001", CAMPUS, WARP, AT, "Captain Janeway")
        .unwrap();
    PersonnelLedger::new(&mut second)
        .complete_training("TR-B", "SF-001", CAMPUS, WARP, AT, "Captain Janeway")
        .unwrap();

    first.commit().unwrap();
    let err = LedgerError::from(second.commit().unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.is_transient());

    let roster = submit(&world, |ledger| ledger.training_roster(WARP)).unwrap();
    let ids: Vec<&str> = roster.iter().map(|r| r.record_id.as_str()).collect();
    assert_eq!(ids, vec!["TR-A"]);
    let keys: Vec<String> = world.entries().unwrap().into_iter().map(|kv| kv.key).collect();
    assert!(!keys.iter().any(|k| k.contains("TR-B")));
}

#[test]
fn scans_release_iterators_on_success_and_failure() {
    let world = InMemoryWorldState::new();
    enroll(&world, "SF-001");

    let (ok, _) = complete(&world, "TR-001", "SF-001", CAMPUS);
    assert!(ok.is_ok());
    assert_eq!(world.open_iterators(), 0);

    train(&world, "TR-001", "SF-001", WARP, AT);
    let (err, _) = complete(&world, "TR-002", "SF-001", CAMPUS);
    assert!(err.is_err());
    assert_eq!(world.open_iterators(), 0);
}

#[test]
fn record_key_uses_doc_type() {
    let record = TrainingRecord {
        record_id: "TR-001".into(),
        personnel_id: "SF-001".into(),
        campus: CAMPUS.into(),
        training_code: WARP.into(),
        completed_at: AT.into(),
        issued_by: "Captain Janeway".into(),
        status: TrainingStatus::Completed,
    };
    assert_eq!(record.state_key().unwrap(), "training:TR-001");
}
