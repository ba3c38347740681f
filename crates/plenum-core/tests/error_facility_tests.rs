use plenum_core::errors::{ApiError, ApiErrorKind, ApiFault};

#[test]
fn test_conference_not_found_verifiable_by_kind() {
    let err = ApiError::ConferenceNotFound {
        conference_key: "unknown-key".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::NotFound);
    assert_eq!(fault.code(), "ERR_NOT_FOUND");
    assert_eq!(fault.entity_id(), Some("unknown-key"));
}

#[test]
fn test_profile_not_found_carries_user_id() {
    let err = ApiError::ProfileNotFound {
        user_id: "123456789".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::NotFound);
    assert_eq!(fault.user_id(), Some("123456789"));
    assert_eq!(fault.message(), "Profile doesn't exist.");
}

#[test]
fn test_not_organizer_distinct_from_not_found() {
    let err = ApiError::NotOrganizer {
        conference_key: "some-key".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Forbidden);
    assert_eq!(fault.code(), "ERR_FORBIDDEN");
    assert_ne!(fault.kind(), ApiErrorKind::NotFound);
    assert_eq!(fault.entity_id(), Some("some-key"));
}

#[test]
fn test_already_registered_conversion() {
    let err = ApiError::AlreadyRegistered {
        conference_key: "k1".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Conflict);
    assert_eq!(fault.code(), "ERR_CONFLICT");
    assert_eq!(
        fault.message(),
        "You have already registered for this conference"
    );
}

#[test]
fn test_no_seats_available_conversion() {
    let err = ApiError::NoSeatsAvailable {
        conference_key: "k1".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Conflict);
    assert_eq!(fault.message(), "There are no seats available.");
    assert_eq!(fault.entity_id(), Some("k1"));
}

#[test]
fn test_capacity_below_allocated_structured_fields() {
    let err = ApiError::CapacityBelowAllocated {
        conference_key: "k1".to_string(),
        requested: 3,
        allocated: 8,
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Conflict);
    assert!(fault.message().contains("8 seats are already allocated"));
    assert!(fault.message().contains("maxAttendees to 3"));
}

#[test]
fn test_missing_name_is_invalid_argument() {
    let err = ApiError::MissingConferenceName;

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::InvalidArgument);
    assert_eq!(fault.code(), "ERR_INVALID_ARGUMENT");
    assert_eq!(fault.message(), "The name is required");
}

#[test]
fn test_query_errors_carry_query_op() {
    let err = ApiError::MultipleInequalityFields {
        first_field: "month".to_string(),
        second_field: "maxAttendees".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::InvalidArgument);
    assert_eq!(fault.op(), Some("query"));
    assert_eq!(
        fault.message(),
        "Inequality filter is allowed on only one field."
    );
}

#[test]
fn test_invalid_filter_value_conversion() {
    let err = ApiError::InvalidFilterValue {
        field: "month".to_string(),
        value: "June".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::InvalidArgument);
    assert!(fault.message().contains("month"));
    assert!(fault.message().contains("June"));
}

#[test]
fn test_contention_is_retryable_kind() {
    let err = ApiError::DatastoreContention {
        group: "user-a,user-b".to_string(),
        details: "commit lost the race for its entity groups".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Unavailable);
    assert_eq!(fault.code(), "ERR_UNAVAILABLE");
    assert_eq!(fault.entity_id(), Some("user-a,user-b"));
}

#[test]
fn test_retries_exhausted_conversion() {
    let err = ApiError::RetriesExhausted {
        op: "register_for_conference".to_string(),
        attempts: 3,
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Unavailable);
    assert_eq!(fault.op(), Some("register_for_conference"));
    assert!(fault.message().contains("after 3 attempts"));
}

#[test]
fn test_cross_group_write_is_internal() {
    let err = ApiError::CrossGroupWrite {
        entity: "conference:abc".to_string(),
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Internal);
    assert_eq!(fault.code(), "ERR_INTERNAL");
    assert_eq!(fault.entity_id(), Some("conference:abc"));
}

#[test]
fn test_seat_invariant_broken_conversion() {
    let err = ApiError::SeatInvariantBroken {
        conference_key: "k1".to_string(),
        seats_available: 12,
        max_attendees: 10,
    };

    let fault: ApiFault = err.into();

    assert_eq!(fault.kind(), ApiErrorKind::Internal);
    assert!(fault.message().contains("12 seats available"));
    assert!(fault.message().contains("capacity 10"));
}

#[test]
fn test_fault_builder_pattern() {
    use plenum_core_types::RequestId;

    let request_id = RequestId::new();
    let fault = ApiFault::new(ApiErrorKind::NotFound)
        .with_op("get_conference")
        .with_entity_id("k123")
        .with_message("No Conference found with key: k123")
        .with_request_id(request_id.clone());

    assert_eq!(fault.kind(), ApiErrorKind::NotFound);
    assert_eq!(fault.op(), Some("get_conference"));
    assert_eq!(fault.entity_id(), Some("k123"));
    assert!(fault.message().contains("No Conference found"));
    assert!(fault.request_id().is_some());
}

#[test]
fn test_fault_display() {
    let fault = ApiFault::new(ApiErrorKind::Conflict)
        .with_op("register_for_conference")
        .with_entity_id("k123")
        .with_message("There are no seats available.");

    let display_str = format!("{}", fault);

    assert!(display_str.contains("ERR_CONFLICT"));
    assert!(display_str.contains("register_for_conference"));
    assert!(display_str.contains("k123"));
}

#[test]
fn test_all_error_kinds_have_unique_codes() {
    use std::collections::HashSet;

    let kinds = vec![
        ApiErrorKind::Unauthorized,
        ApiErrorKind::NotFound,
        ApiErrorKind::Forbidden,
        ApiErrorKind::Conflict,
        ApiErrorKind::InvalidArgument,
        ApiErrorKind::Unavailable,
        ApiErrorKind::Internal,
        ApiErrorKind::Persistence,
        ApiErrorKind::Io,
    ];

    let codes: HashSet<_> = kinds.iter().map(|k| k.code()).collect();

    // All codes should be unique
    assert_eq!(codes.len(), kinds.len());

    // All codes should start with "ERR_"
    for code in codes {
        assert!(code.starts_with("ERR_"));
    }
}

#[test]
fn test_serde_error_converts_to_serialization() {
    let bad = serde_json::from_str::<plenum_core::model::ConferenceForm>("{not json");
    let err: ApiError = bad.unwrap_err().into();

    assert!(matches!(err, ApiError::Serialization { .. }));
    assert_eq!(err.kind(), ApiErrorKind::Internal);
}
