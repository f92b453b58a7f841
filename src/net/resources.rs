//! Student, teacher, timetable, exam-result and user-account operations.
//!
//! Each backend controller maps to one block of methods on [`ApiClient`].
//! They ride on [`ApiClient::request_json`], so the bearer token is attached,
//! failures are logged, and a body of the wrong shape is an
//! [`ApiError::Decode`]. None of these calls change the session.
//!
//! ERROR HANDLING
//! ==============
//! List filters are encoded before anything is sent; an encoding failure is
//! [`ApiError::InvalidQuery`] and performs no I/O.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::records::{
    ConflictCheck, ExamResult, ExamResultRequest, StudentFilter, StudentRecord, StudentRequest,
    TeacherFilter, TeacherRecord, TeacherRequest, TimetableEntry, TimetableFilter, TimetableRequest,
    UserAccount, UserFilter, UserUpdateRequest,
};
use super::types::ApiEnvelope;

pub const STUDENTS_ENDPOINT: &str = "/admin/students";
pub const TEACHERS_ENDPOINT: &str = "/admin/teachers";
pub const TEACHER_STUDENTS_ENDPOINT: &str = "/teacher/students";
pub const TIMETABLE_ENDPOINT: &str = "/timetable";
pub const TIMETABLE_CONFLICTS_ENDPOINT: &str = "/timetable/check-conflicts";
pub const RESULTS_ENDPOINT: &str = "/results";
pub const USERS_ENDPOINT: &str = "/admin/users";

/// Envelope of endpoints that answer with `data: null` (deletes and account
/// state changes).
pub type Ack = ApiEnvelope<Value>;

/// `endpoint?query`, or `endpoint` alone when every query field is unset.
///
/// # Errors
///
/// [`ApiError::InvalidQuery`] if `query` is not a flat struct of scalars.
pub fn with_query<Q: Serialize + ?Sized>(endpoint: &str, query: &Q) -> Result<String, ApiError> {
    let encoded = serde_urlencoded::to_string(query)?;
    if encoded.is_empty() {
        Ok(endpoint.to_owned())
    } else {
        Ok(format!("{endpoint}?{encoded}"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcademicYearQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    academic_year: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassQuery<'a> {
    class_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExcludeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_id: Option<i64>,
}

impl ApiClient {
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiEnvelope<T>, ApiError> {
        self.request_json(endpoint, RequestOptions::get()).await
    }

    async fn submit<B, T>(&self, method: Method, endpoint: &str, body: &B) -> Result<ApiEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(endpoint, RequestOptions::with_method(method).json(body)?).await
    }

    async fn acknowledge(&self, method: Method, endpoint: &str) -> Result<Ack, ApiError> {
        self.request_json(endpoint, RequestOptions::with_method(method)).await
    }

    // =========================================================================
    // STUDENTS (admin)
    // =========================================================================

    /// `GET /admin/students` narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidQuery`] for an unencodable filter, otherwise see
    /// [`Self::request_json`].
    pub async fn list_students(&self, filter: &StudentFilter) -> Result<ApiEnvelope<Vec<StudentRecord>>, ApiError> {
        self.fetch(&with_query(STUDENTS_ENDPOINT, filter)?).await
    }

    /// `GET /admin/students/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_student(&self, id: i64) -> Result<ApiEnvelope<StudentRecord>, ApiError> {
        self.fetch(&format!("{STUDENTS_ENDPOINT}/{id}")).await
    }

    /// `POST /admin/students`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn create_student(&self, request: &StudentRequest) -> Result<ApiEnvelope<StudentRecord>, ApiError> {
        self.submit(Method::POST, STUDENTS_ENDPOINT, request).await
    }

    /// `PUT /admin/students/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn update_student(
        &self,
        id: i64,
        request: &StudentRequest,
    ) -> Result<ApiEnvelope<StudentRecord>, ApiError> {
        self.submit(Method::PUT, &format!("{STUDENTS_ENDPOINT}/{id}"), request).await
    }

    /// `DELETE /admin/students/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn delete_student(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::DELETE, &format!("{STUDENTS_ENDPOINT}/{id}")).await
    }

    // =========================================================================
    // STUDENTS (teacher view, read-only)
    // =========================================================================

    /// `GET /teacher/students`, the read-only roster for teacher roles.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidQuery`] for an unencodable filter, otherwise see
    /// [`Self::request_json`].
    pub async fn teacher_students(
        &self,
        filter: &StudentFilter,
    ) -> Result<ApiEnvelope<Vec<StudentRecord>>, ApiError> {
        self.fetch(&with_query(TEACHER_STUDENTS_ENDPOINT, filter)?).await
    }

    /// `GET /teacher/students/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn teacher_student(&self, id: i64) -> Result<ApiEnvelope<StudentRecord>, ApiError> {
        self.fetch(&format!("{TEACHER_STUDENTS_ENDPOINT}/{id}")).await
    }

    // =========================================================================
    // TEACHERS
    // =========================================================================

    /// `GET /admin/teachers` narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidQuery`] for an unencodable filter, otherwise see
    /// [`Self::request_json`].
    pub async fn list_teachers(&self, filter: &TeacherFilter) -> Result<ApiEnvelope<Vec<TeacherRecord>>, ApiError> {
        self.fetch(&with_query(TEACHERS_ENDPOINT, filter)?).await
    }

    /// `GET /admin/teachers/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_teacher(&self, id: i64) -> Result<ApiEnvelope<TeacherRecord>, ApiError> {
        self.fetch(&format!("{TEACHERS_ENDPOINT}/{id}")).await
    }

    /// `POST /admin/teachers`. The backend assigns the employee id.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn create_teacher(&self, request: &TeacherRequest) -> Result<ApiEnvelope<TeacherRecord>, ApiError> {
        self.submit(Method::POST, TEACHERS_ENDPOINT, request).await
    }

    /// `PUT /admin/teachers/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn update_teacher(
        &self,
        id: i64,
        request: &TeacherRequest,
    ) -> Result<ApiEnvelope<TeacherRecord>, ApiError> {
        self.submit(Method::PUT, &format!("{TEACHERS_ENDPOINT}/{id}"), request).await
    }

    /// `DELETE /admin/teachers/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn delete_teacher(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::DELETE, &format!("{TEACHERS_ENDPOINT}/{id}")).await
    }

    // =========================================================================
    // TIMETABLE
    // =========================================================================

    /// `GET /timetable` narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidQuery`] for an unencodable filter, otherwise see
    /// [`Self::request_json`].
    pub async fn list_timetable(
        &self,
        filter: &TimetableFilter,
    ) -> Result<ApiEnvelope<Vec<TimetableEntry>>, ApiError> {
        self.fetch(&with_query(TIMETABLE_ENDPOINT, filter)?).await
    }

    /// `GET /timetable/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_timetable_entry(&self, id: i64) -> Result<ApiEnvelope<TimetableEntry>, ApiError> {
        self.fetch(&format!("{TIMETABLE_ENDPOINT}/{id}")).await
    }

    /// `POST /timetable`. The backend rejects a slot that conflicts with an
    /// existing one.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn create_timetable_entry(
        &self,
        request: &TimetableRequest,
    ) -> Result<ApiEnvelope<TimetableEntry>, ApiError> {
        self.submit(Method::POST, TIMETABLE_ENDPOINT, request).await
    }

    /// `PUT /timetable/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn update_timetable_entry(
        &self,
        id: i64,
        request: &TimetableRequest,
    ) -> Result<ApiEnvelope<TimetableEntry>, ApiError> {
        self.submit(Method::PUT, &format!("{TIMETABLE_ENDPOINT}/{id}"), request).await
    }

    /// `DELETE /timetable/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn delete_timetable_entry(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::DELETE, &format!("{TIMETABLE_ENDPOINT}/{id}")).await
    }

    /// `POST /timetable/check-conflicts`: dry-run a slot against the teacher,
    /// class and room schedules. Pass `exclude_id` when checking an edit so
    /// the slot does not collide with itself.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn check_timetable_conflicts(
        &self,
        request: &TimetableRequest,
        exclude_id: Option<i64>,
    ) -> Result<ApiEnvelope<ConflictCheck>, ApiError> {
        let endpoint = with_query(TIMETABLE_CONFLICTS_ENDPOINT, &ExcludeQuery { exclude_id })?;
        self.submit(Method::POST, &endpoint, request).await
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    /// `GET /results/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_result(&self, id: i64) -> Result<ApiEnvelope<ExamResult>, ApiError> {
        self.fetch(&format!("{RESULTS_ENDPOINT}/{id}")).await
    }

    /// `GET /results/student/{student_id}`, optionally for one academic year.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn results_for_student(
        &self,
        student_id: i64,
        academic_year: Option<&str>,
    ) -> Result<ApiEnvelope<Vec<ExamResult>>, ApiError> {
        let endpoint = with_query(
            &format!("{RESULTS_ENDPOINT}/student/{student_id}"),
            &AcademicYearQuery { academic_year },
        )?;
        self.fetch(&endpoint).await
    }

    /// `GET /results/class?className=..&section=..`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn results_for_class(
        &self,
        class_name: &str,
        section: Option<&str>,
    ) -> Result<ApiEnvelope<Vec<ExamResult>>, ApiError> {
        let endpoint = with_query(&format!("{RESULTS_ENDPOINT}/class"), &ClassQuery { class_name, section })?;
        self.fetch(&endpoint).await
    }

    /// `POST /results`. Percentage and grade are computed by the backend.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn create_result(&self, request: &ExamResultRequest) -> Result<ApiEnvelope<ExamResult>, ApiError> {
        self.submit(Method::POST, RESULTS_ENDPOINT, request).await
    }

    /// `PUT /results/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn update_result(
        &self,
        id: i64,
        request: &ExamResultRequest,
    ) -> Result<ApiEnvelope<ExamResult>, ApiError> {
        self.submit(Method::PUT, &format!("{RESULTS_ENDPOINT}/{id}"), request).await
    }

    /// `DELETE /results/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn delete_result(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::DELETE, &format!("{RESULTS_ENDPOINT}/{id}")).await
    }

    // =========================================================================
    // USER ACCOUNTS
    // =========================================================================

    /// `GET /admin/users` narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidQuery`] for an unencodable filter, otherwise see
    /// [`Self::request_json`].
    pub async fn list_users(&self, filter: &UserFilter) -> Result<ApiEnvelope<Vec<UserAccount>>, ApiError> {
        self.fetch(&with_query(USERS_ENDPOINT, filter)?).await
    }

    /// `GET /admin/users/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_user(&self, id: i64) -> Result<ApiEnvelope<UserAccount>, ApiError> {
        self.fetch(&format!("{USERS_ENDPOINT}/{id}")).await
    }

    /// `PUT /admin/users/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn update_user(
        &self,
        id: i64,
        request: &UserUpdateRequest,
    ) -> Result<ApiEnvelope<UserAccount>, ApiError> {
        self.submit(Method::PUT, &format!("{USERS_ENDPOINT}/{id}"), request).await
    }

    /// `POST /admin/users/{id}/activate`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn activate_user(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, &format!("{USERS_ENDPOINT}/{id}/activate")).await
    }

    /// `POST /admin/users/{id}/deactivate`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn deactivate_user(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, &format!("{USERS_ENDPOINT}/{id}/deactivate")).await
    }

    /// `POST /admin/users/{id}/unlock`: clear the lockout left by repeated
    /// failed logins.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn unlock_user(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, &format!("{USERS_ENDPOINT}/{id}/unlock")).await
    }

    /// `DELETE /admin/users/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn delete_user(&self, id: i64) -> Result<Ack, ApiError> {
        self.acknowledge(Method::DELETE, &format!("{USERS_ENDPOINT}/{id}")).await
    }
}
