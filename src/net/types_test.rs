use super::*;
use serde_json::json;

#[test]
fn envelope_payload_requires_success() {
    let ok: ApiEnvelope<String> =
        serde_json::from_value(json!({ "success": true, "data": "OK" })).unwrap();
    assert_eq!(ok.payload().map(String::as_str), Some("OK"));

    let failed: ApiEnvelope<String> =
        serde_json::from_value(json!({ "success": false, "message": "nope", "data": "OK" })).unwrap();
    assert_eq!(failed.payload(), None);
    assert_eq!(failed.message.as_deref(), Some("nope"));
}

#[test]
fn envelope_tolerates_missing_fields() {
    let env: ApiEnvelope<UserProfile> = serde_json::from_value(json!({})).unwrap();
    assert!(!env.success);
    assert!(env.data.is_none());
}

#[test]
fn envelope_decodes_payloads_without_default() {
    let env: ApiEnvelope<TokenGrant> =
        serde_json::from_value(json!({ "success": false, "message": "Bad credentials" })).unwrap();
    assert!(env.data.is_none());
    assert_eq!(env.payload(), None);
    assert_eq!(env.message.as_deref(), Some("Bad credentials"));
}

#[test]
fn role_decodes_known_and_unknown_values() {
    let roles: Vec<Role> =
        serde_json::from_value(json!(["ADMIN", "ACADEMIC_TEACHER", "LIBRARIAN"])).unwrap();
    assert_eq!(roles[0], Role::Admin);
    assert_eq!(roles[1], Role::AcademicTeacher);
    assert_eq!(roles[2], Role::Other("LIBRARIAN".to_owned()));
    assert_eq!(serde_json::to_value(&roles[2]).unwrap(), json!("LIBRARIAN"));
    assert!(roles[1].is_teacher());
    assert_eq!(Role::DisciplineTeacher.display_name(), "Discipline Teacher");
}

#[test]
fn user_profile_keeps_unmodeled_fields() {
    let raw = json!({
        "id": 7,
        "firstName": "Ann",
        "lastName": "Lee",
        "role": "TEACHER",
        "department": "Science"
    });
    let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(profile.role, Some(Role::Teacher));
    assert_eq!(profile.extra.get("department"), Some(&json!("Science")));
    assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
}

#[test]
fn initials_skip_missing_names() {
    let mut profile = UserProfile {
        first_name: Some("Ann".to_owned()),
        last_name: Some("Lee".to_owned()),
        ..UserProfile::default()
    };
    assert_eq!(profile.initials(), "AL");
    assert_eq!(profile.display_name(), "Ann Lee");

    profile.first_name = Some(String::new());
    assert_eq!(profile.initials(), "L");
    assert_eq!(profile.display_name(), "Lee");

    profile.last_name = None;
    assert_eq!(profile.initials(), "");
}

#[test]
fn initials_use_whole_characters() {
    let profile = UserProfile {
        first_name: Some("Élodie".to_owned()),
        last_name: Some("Ødegaard".to_owned()),
        ..UserProfile::default()
    };
    assert_eq!(profile.initials(), "ÉØ");
}

#[test]
fn token_grant_requires_access_token() {
    let err = serde_json::from_value::<TokenGrant>(json!({ "refreshToken": "r" }));
    assert!(err.is_err());

    let grant: TokenGrant =
        serde_json::from_value(json!({ "accessToken": "abc", "tokenType": "Bearer", "expiresIn": 3600 }))
            .unwrap();
    assert_eq!(grant.access_token, "abc");
    assert_eq!(grant.refresh_token, None);
    assert_eq!(grant.expires_in, Some(3600));
}

#[test]
fn login_credentials_use_camel_case() {
    let creds = LoginCredentials { username_or_email: "ann".to_owned(), password: "pw".to_owned() };
    assert_eq!(
        serde_json::to_value(&creds).unwrap(),
        json!({ "usernameOrEmail": "ann", "password": "pw" })
    );
}
