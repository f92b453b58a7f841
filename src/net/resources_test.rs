use super::*;
use crate::net::records::{DayOfWeek, EmploymentStatus, StudentStatus};
use crate::net::types::Role;
use crate::test_helpers::{MockTransport, RecordingSurface, test_client};
use serde_json::json;

const BASE: &str = "http://localhost:8080/api";

fn timetable_request() -> TimetableRequest {
    TimetableRequest {
        class_name: "Grade 6".to_owned(),
        section: Some("B".to_owned()),
        subject: "Maths".to_owned(),
        teacher_id: 4,
        day_of_week: DayOfWeek::Monday,
        start_time: "09:00".to_owned(),
        end_time: "09:45".to_owned(),
        room: Some("R12".to_owned()),
        notes: None,
        is_active: None,
    }
}

fn sent_body(transport: &MockTransport) -> Value {
    serde_json::from_str(transport.last_request().body.as_deref().expect("request body")).unwrap()
}

// =========================================================================
// with_query
// =========================================================================

#[test]
fn empty_filter_leaves_endpoint_bare() {
    assert_eq!(with_query(STUDENTS_ENDPOINT, &StudentFilter::default()).unwrap(), STUDENTS_ENDPOINT);
}

#[test]
fn filter_fields_are_form_encoded() {
    let filter = StudentFilter {
        search: Some("Tom & Jo".to_owned()),
        status: Some(StudentStatus::Active),
        class_name: None,
        section: None,
    };
    assert_eq!(
        with_query(STUDENTS_ENDPOINT, &filter).unwrap(),
        "/admin/students?search=Tom+%26+Jo&status=ACTIVE"
    );
}

#[test]
fn non_struct_query_is_rejected() {
    let err = with_query(STUDENTS_ENDPOINT, &json!({ "nested": { "a": 1 } })).unwrap_err();
    assert!(matches!(err, ApiError::InvalidQuery(_)));
}

// =========================================================================
// students
// =========================================================================

#[tokio::test]
async fn list_students_sends_filter_and_decodes_rows() {
    let transport = MockTransport::new();
    transport.respond(
        200,
        json!({
            "success": true,
            "message": "Students retrieved successfully (2 found)",
            "data": [{ "id": 1, "fullName": "Tom Okafor" }, { "id": 2, "fullName": "Jo Park" }]
        }),
    );
    let client = test_client(&transport, &RecordingSurface::new());
    client.session().set_token("admin-token");

    let filter = StudentFilter {
        class_name: Some("Grade 6".to_owned()),
        section: Some("B".to_owned()),
        ..StudentFilter::default()
    };
    let envelope = client.list_students(&filter).await.unwrap();

    let sent = transport.last_request();
    assert_eq!(sent.method, Method::GET);
    assert_eq!(sent.url, format!("{BASE}/admin/students?className=Grade+6&section=B"));
    assert_eq!(sent.headers[http::header::AUTHORIZATION], "Bearer admin-token");
    let rows = envelope.payload().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].full_name.as_deref(), Some("Jo Park"));
}

#[tokio::test]
async fn student_crud_uses_id_paths_and_methods() {
    let transport = MockTransport::new();
    transport.respond(201, json!({ "success": true, "data": { "id": 31, "admissionNumber": "ADM2024031" } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 31 } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 31 } }));
    transport.respond(200, json!({ "success": true, "message": "Student deleted successfully", "data": null }));
    let client = test_client(&transport, &RecordingSurface::new());

    let request = StudentRequest {
        user_id: None,
        admission_number: None,
        first_name: "Tom".to_owned(),
        last_name: "Okafor".to_owned(),
        email: "tom@example.com".to_owned(),
        phone: None,
        date_of_birth: "2012-04-09".to_owned(),
        gender: crate::net::records::Gender::Male,
        current_class: "Grade 6".to_owned(),
        admission_date: "2024-09-01".to_owned(),
        status: None,
        father_name: "Emeka Okafor".to_owned(),
        details: crate::net::records::StudentDetails::default(),
        username: None,
        password: None,
    };

    let created = client.create_student(&request).await.unwrap();
    assert_eq!(created.payload().and_then(|s| s.admission_number.as_deref()), Some("ADM2024031"));
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url.as_str()), (Method::POST, "http://localhost:8080/api/admin/students"));
    assert_eq!(sent_body(&transport)["fatherName"], "Emeka Okafor");

    client.update_student(31, &request).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::PUT, format!("{BASE}/admin/students/31")));

    client.get_student(31).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::GET, format!("{BASE}/admin/students/31")));
    assert!(sent.body.is_none());

    let deleted = client.delete_student(31).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::DELETE, format!("{BASE}/admin/students/31")));
    assert!(deleted.success);
    assert_eq!(deleted.data, None);
}

#[tokio::test]
async fn teacher_view_reads_the_roster_endpoints() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": [] }));
    transport.respond(200, json!({ "success": true, "data": { "id": 8 } }));
    let client = test_client(&transport, &RecordingSurface::new());

    let filter = StudentFilter { search: Some("okafor".to_owned()), ..StudentFilter::default() };
    client.teacher_students(&filter).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/teacher/students?search=okafor"));

    let student = client.teacher_student(8).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/teacher/students/8"));
    assert_eq!(student.payload().map(|s| s.id), Some(8));
}

#[tokio::test]
async fn wrong_shape_for_a_list_is_decode_error() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": { "id": 1 } }));
    let client = test_client(&transport, &RecordingSurface::new());

    let err = client.list_students(&StudentFilter::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn forbidden_surfaces_server_message() {
    let transport = MockTransport::new();
    transport.respond(403, json!({ "success": false, "message": "Access denied" }));
    let client = test_client(&transport, &RecordingSurface::new());

    let err = client.delete_student(5).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "Access denied");
}

// =========================================================================
// teachers
// =========================================================================

#[tokio::test]
async fn teacher_operations_hit_admin_teachers() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": [{ "id": 3, "employmentStatus": "ON_LEAVE" }] }));
    transport.respond(201, json!({ "success": true, "data": { "id": 4, "employeeId": "EMP0004" } }));
    transport.respond(200, json!({ "success": true, "data": null }));
    let client = test_client(&transport, &RecordingSurface::new());

    let filter = TeacherFilter { search: None, status: Some(EmploymentStatus::OnLeave) };
    let listed = client.list_teachers(&filter).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/admin/teachers?status=ON_LEAVE"));
    assert_eq!(listed.payload().unwrap()[0].profile.employment_status, Some(EmploymentStatus::OnLeave));

    let request = TeacherRequest {
        user_id: None,
        first_name: "Grace".to_owned(),
        last_name: "Mensah".to_owned(),
        email: "grace@example.com".to_owned(),
        profile: crate::net::records::TeacherProfile {
            subjects: Some("Maths, Physics".to_owned()),
            experience_years: Some(7),
            ..crate::net::records::TeacherProfile::default()
        },
        username: Some("gmensah".to_owned()),
        password: None,
    };
    let created = client.create_teacher(&request).await.unwrap();
    assert_eq!(transport.last_request().method, Method::POST);
    assert_eq!(
        sent_body(&transport),
        json!({
            "firstName": "Grace",
            "lastName": "Mensah",
            "email": "grace@example.com",
            "subjects": "Maths, Physics",
            "experienceYears": 7,
            "username": "gmensah"
        })
    );
    assert_eq!(created.payload().and_then(|t| t.employee_id.as_deref()), Some("EMP0004"));

    client.delete_teacher(4).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::DELETE, format!("{BASE}/admin/teachers/4")));
}

#[tokio::test]
async fn get_and_update_teacher_use_id_path() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": { "id": 4 } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 4 } }));
    let client = test_client(&transport, &RecordingSurface::new());

    client.get_teacher(4).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/admin/teachers/4"));

    let request = TeacherRequest {
        user_id: Some(40),
        first_name: "Grace".to_owned(),
        last_name: "Mensah".to_owned(),
        email: "grace@example.com".to_owned(),
        profile: crate::net::records::TeacherProfile::default(),
        username: None,
        password: None,
    };
    client.update_teacher(4, &request).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::PUT, format!("{BASE}/admin/teachers/4")));
    assert_eq!(sent_body(&transport)["userId"], 40);
}

// =========================================================================
// timetable
// =========================================================================

#[tokio::test]
async fn timetable_crud_and_filter() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": [] }));
    transport.respond(201, json!({ "success": true, "data": { "id": 10, "teacherName": "Grace Mensah" } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 10 } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 10 } }));
    transport.respond(200, json!({ "success": true, "data": null }));
    let client = test_client(&transport, &RecordingSurface::new());

    let filter = TimetableFilter { teacher_id: Some(4), ..TimetableFilter::default() };
    client.list_timetable(&filter).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/timetable?teacherId=4"));

    let created = client.create_timetable_entry(&timetable_request()).await.unwrap();
    assert_eq!(transport.last_request().method, Method::POST);
    assert_eq!(transport.last_request().url, format!("{BASE}/timetable"));
    let body = sent_body(&transport);
    assert_eq!(body["dayOfWeek"], "MONDAY");
    assert_eq!(body["teacherId"], 4);
    assert!(body.get("notes").is_none());
    assert_eq!(created.payload().and_then(|e| e.teacher_name.as_deref()), Some("Grace Mensah"));

    client.get_timetable_entry(10).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/timetable/10"));

    client.update_timetable_entry(10, &timetable_request()).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::PUT, format!("{BASE}/timetable/10")));

    client.delete_timetable_entry(10).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::DELETE, format!("{BASE}/timetable/10")));
}

#[tokio::test]
async fn conflict_check_posts_slot_with_optional_exclusion() {
    let transport = MockTransport::new();
    transport.respond(
        200,
        json!({
            "success": true,
            "message": "Conflict check completed",
            "data": {
                "hasConflict": true,
                "conflicts": [{ "type": "ROOM_CONFLICT", "description": "Room R12 is booked" }]
            }
        }),
    );
    transport.respond(200, json!({ "success": true, "data": { "hasConflict": false, "conflicts": [] } }));
    let client = test_client(&transport, &RecordingSurface::new());

    let check = client.check_timetable_conflicts(&timetable_request(), None).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::POST, format!("{BASE}/timetable/check-conflicts")));
    let check = check.payload().unwrap();
    assert!(check.has_conflict);
    assert_eq!(check.conflicts[0].kind, crate::net::records::ConflictKind::Room);

    let check = client.check_timetable_conflicts(&timetable_request(), Some(10)).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/timetable/check-conflicts?excludeId=10"));
    assert!(!check.payload().unwrap().has_conflict);
}

// =========================================================================
// results
// =========================================================================

#[tokio::test]
async fn result_queries_encode_year_and_class() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": [{ "id": 1, "grade": "A+", "percentage": 92.5 }] }));
    transport.respond(200, json!({ "success": true, "data": [] }));
    transport.respond(200, json!({ "success": true, "data": [] }));
    transport.respond(200, json!({ "success": true, "data": [] }));
    let client = test_client(&transport, &RecordingSurface::new());

    let results = client.results_for_student(12, Some("2024-2025")).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results/student/12?academicYear=2024-2025"));
    assert_eq!(results.payload().unwrap()[0].grade.as_deref(), Some("A+"));

    client.results_for_student(12, None).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results/student/12"));

    client.results_for_class("Grade 6", Some("B")).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results/class?className=Grade+6&section=B"));

    client.results_for_class("Grade 6", None).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results/class?className=Grade+6"));
}

#[tokio::test]
async fn result_crud_round_trip() {
    let transport = MockTransport::new();
    transport.respond(201, json!({ "success": true, "data": { "id": 50, "percentage": 80.0, "grade": "A" } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 50 } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 50 } }));
    transport.respond(200, json!({ "success": true, "data": null }));
    let client = test_client(&transport, &RecordingSurface::new());

    let request = ExamResultRequest {
        student_id: 12,
        subject: "Maths".to_owned(),
        exam_type: "MIDTERM".to_owned(),
        academic_year: "2024-2025".to_owned(),
        term: Some("Term 1".to_owned()),
        marks_obtained: 40.0,
        total_marks: 50.0,
        remarks: None,
        is_published: Some(true),
    };
    let created = client.create_result(&request).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results"));
    let body = sent_body(&transport);
    assert_eq!(body["studentId"], 12);
    assert_eq!(body["marksObtained"], 40.0);
    assert_eq!(body["isPublished"], true);
    assert_eq!(created.payload().and_then(|r| r.grade.as_deref()), Some("A"));

    client.update_result(50, &request).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::PUT, format!("{BASE}/results/50")));

    client.get_result(50).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/results/50"));

    client.delete_result(50).await.unwrap();
    assert_eq!(transport.last_request().method, Method::DELETE);
}

// =========================================================================
// user accounts
// =========================================================================

#[tokio::test]
async fn user_admin_actions_post_to_sub_paths() {
    let transport = MockTransport::new();
    let client = test_client(&transport, &RecordingSurface::new());

    client.activate_user(9).await.unwrap();
    client.deactivate_user(9).await.unwrap();
    client.unlock_user(9).await.unwrap();
    client.delete_user(9).await.unwrap();

    let sent: Vec<(Method, String)> =
        transport.requests.borrow().iter().map(|r| (r.method.clone(), r.url.clone())).collect();
    assert_eq!(
        sent,
        vec![
            (Method::POST, format!("{BASE}/admin/users/9/activate")),
            (Method::POST, format!("{BASE}/admin/users/9/deactivate")),
            (Method::POST, format!("{BASE}/admin/users/9/unlock")),
            (Method::DELETE, format!("{BASE}/admin/users/9")),
        ]
    );
    assert!(transport.requests.borrow().iter().all(|r| r.body.is_none()));
}

#[tokio::test]
async fn list_get_and_update_users() {
    let transport = MockTransport::new();
    transport.respond(200, json!({ "success": true, "data": [{ "id": 9, "role": "PARENT" }] }));
    transport.respond(200, json!({ "success": true, "data": { "id": 9, "accountLocked": true } }));
    transport.respond(200, json!({ "success": true, "data": { "id": 9, "role": "TEACHER" } }));
    let client = test_client(&transport, &RecordingSurface::new());

    let filter = UserFilter { role: Some(Role::Parent), search: None };
    let users = client.list_users(&filter).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/admin/users?role=PARENT"));
    assert_eq!(users.payload().unwrap()[0].role, Some(Role::Parent));

    let user = client.get_user(9).await.unwrap();
    assert_eq!(transport.last_request().url, format!("{BASE}/admin/users/9"));
    assert_eq!(user.payload().and_then(|u| u.account_locked), Some(true));

    let update = UserUpdateRequest {
        username: "ann".to_owned(),
        email: "ann@example.com".to_owned(),
        first_name: "Ann".to_owned(),
        last_name: "Lee".to_owned(),
        role: Some(Role::Teacher),
        active: None,
    };
    client.update_user(9, &update).await.unwrap();
    let sent = transport.last_request();
    assert_eq!((sent.method, sent.url), (Method::PUT, format!("{BASE}/admin/users/9")));
    assert_eq!(sent_body(&transport)["role"], "TEACHER");
}

#[tokio::test]
async fn resource_calls_leave_the_session_alone() {
    let transport = MockTransport::new();
    transport.respond(401, json!({ "success": false, "message": "Unauthorized" }));
    let client = test_client(&transport, &RecordingSurface::new());
    client.session().set_token("stale");

    let err = client.list_users(&UserFilter::default()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.session().token().as_deref(), Some("stale"));
}
