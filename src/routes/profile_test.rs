use super::*;
use crate::services::profile::ProfileError;

#[test]
fn profile_error_maps_unknown_principal() {
    let (status, message) = profile_error_to_response(ProfileError::UnknownPrincipal("aaaaa-aa".into()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(message.contains("aaaaa-aa"));
}

#[test]
fn profile_error_maps_invalid() {
    let (status, message) = profile_error_to_response(ProfileError::Invalid("profile name must not be empty".into()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "profile name must not be empty");
}

#[test]
fn profile_error_hides_database_details() {
    let (status, message) = profile_error_to_response(ProfileError::Database(sqlx::Error::PoolClosed));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "database error");
}
