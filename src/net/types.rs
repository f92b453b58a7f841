//! Wire DTOs for the school backend's REST API.
//!
//! DESIGN
//! ======
//! Every endpoint answers with the same `{success, message?, data?}`
//! envelope. The payload type is fixed per endpoint so a body of the wrong
//! shape fails at decode time instead of silently skipping a side effect.
//! A well-formed envelope with `success: false` or no `data` is still a
//! valid answer; callers inspect it with [`ApiEnvelope::payload`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENVELOPE
// =============================================================================

/// The backend's uniform response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    // No `default` here: on a generic field serde would demand `T: Default`.
    // A missing `Option` field already decodes to `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// The payload, only when the server reported success and sent one.
    pub fn payload(&self) -> Option<&T> {
        if self.success { self.data.as_ref() } else { None }
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Account role as reported by the backend.
///
/// Unrecognized role strings are kept in [`Role::Other`] so a newer backend
/// never breaks profile decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Teacher,
    AcademicTeacher,
    DisciplineTeacher,
    Student,
    Parent,
    Other(String),
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::Teacher => "TEACHER",
            Self::AcademicTeacher => "ACADEMIC_TEACHER",
            Self::DisciplineTeacher => "DISCIPLINE_TEACHER",
            Self::Student => "STUDENT",
            Self::Parent => "PARENT",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Admin => "Administrator",
            Self::Teacher => "Teacher",
            Self::AcademicTeacher => "Academic Teacher",
            Self::DisciplineTeacher => "Discipline Teacher",
            Self::Student => "Student",
            Self::Parent => "Parent",
            Self::Other(raw) => raw,
        }
    }

    /// Any of the teacher roles.
    #[must_use]
    pub fn is_teacher(&self) -> bool {
        matches!(self, Self::Teacher | Self::AcademicTeacher | Self::DisciplineTeacher)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ADMIN" => Self::Admin,
            "TEACHER" => Self::Teacher,
            "ACADEMIC_TEACHER" => Self::AcademicTeacher,
            "DISCIPLINE_TEACHER" => Self::DisciplineTeacher,
            "STUDENT" => Self::Student,
            "PARENT" => Self::Parent,
            _ => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of the signed-in user, as returned by `GET /auth/me`.
///
/// Every field is optional so partially populated profiles still decode.
/// Fields this client does not model are kept in `extra` and written back
/// verbatim when the profile is cached.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// First letter of the first name followed by the first letter of the
    /// last name. A missing or empty name contributes nothing.
    #[must_use]
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|name| name.as_deref().and_then(|n| n.chars().next()))
            .collect()
    }

    /// `"First Last"` built from whichever name parts are present.
    #[must_use]
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|name| name.as_deref().map(str::trim).filter(|n| !n.is_empty()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub username_or_email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Token pair issued by login, register and refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds, as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}
