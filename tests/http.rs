//! 通过完整路由栈的接口测试

mod common;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, test, web};
use chrono::Utc;
use rust_faculty_eval::cache::ObjectCache;
use rust_faculty_eval::cache::object_cache::moka::MokaCacheWrapper;
use rust_faculty_eval::models::categories::requests::CreateCategoryRequest;
use rust_faculty_eval::models::courses::requests::CreateCourseRequest;
use rust_faculty_eval::models::departments::requests::CreateDepartmentRequest;
use rust_faculty_eval::models::forms::entities::Semester;
use rust_faculty_eval::models::forms::requests::CreateFormRequest;
use rust_faculty_eval::models::questions::requests::CreateQuestionRequest;
use rust_faculty_eval::models::users::entities::{User, UserRole, UserType};
use rust_faculty_eval::models::users::requests::CreateUserRequest;
use rust_faculty_eval::models::ErrorCode;
use rust_faculty_eval::routes;
use rust_faculty_eval::storage::Storage;
use rust_faculty_eval::utils::jwt::{JwtUtils, REFRESH_TOKEN_COOKIE};
use rust_faculty_eval::utils::password::hash_password;
use serde_json::{Value, json};

use common::{create_user, setup};

fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

fn test_cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::with_settings(100, Duration::from_secs(60)))
}

macro_rules! init_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(test_cache()))
                .configure(routes::configure_api_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn submit_outside_form_window_is_unprocessable() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);

    let department = storage
        .create_department(CreateDepartmentRequest {
            name: "Mathematics".to_string(),
            code: None,
        })
        .await
        .unwrap();
    let course = storage
        .create_course(CreateCourseRequest {
            department_id: department.id,
            code: "MATH1".to_string(),
            title: "Calculus".to_string(),
        })
        .await
        .unwrap();
    let category = storage
        .create_category(CreateCategoryRequest {
            name: "Teaching".to_string(),
            description: None,
            weight: None,
        })
        .await
        .unwrap();
    let question = storage
        .create_question(CreateQuestionRequest {
            category_id: category.id,
            text: "Explains clearly".to_string(),
            weight: None,
        })
        .await
        .unwrap();

    // 一周后才开放
    let start = Utc::now() + chrono::Duration::days(7);
    let form = storage
        .create_form(CreateFormRequest {
            title: "Final".to_string(),
            description: None,
            school_year: "2025-2026".to_string(),
            semester: Semester::Second,
            start_at: start,
            end_at: start + chrono::Duration::days(7),
            is_active: true,
        })
        .await
        .unwrap();

    let student = create_user(
        storage.as_ref(),
        "student@example.com",
        UserType::User,
        UserRole::Student,
    )
    .await;
    let faculty = create_user(
        storage.as_ref(),
        "faculty@example.com",
        UserType::User,
        UserRole::Faculty,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(&student))
        .set_json(json!({
            "evaluator_id": student.id,
            "evaluatee_id": faculty.id,
            "course_id": course.id,
            "form_id": form.id,
            "responses": [{ "question_id": question.id, "rating": 4.0 }],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FormNotOpen as i32);

    assert!(
        !storage
            .evaluation_exists(student.id, faculty.id, course.id, form.id)
            .await
            .unwrap()
    );
}

#[actix_web::test]
async fn duplicate_question_returns_conflict() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let admin = create_user(
        storage.as_ref(),
        "admin@example.com",
        UserType::Admin,
        UserRole::Supervisor,
    )
    .await;
    let category = storage
        .create_category(CreateCategoryRequest {
            name: "Attitude".to_string(),
            description: None,
            weight: None,
        })
        .await
        .unwrap();

    let app = init_app!(storage);
    let payload = json!({ "category_id": category.id, "text": "Arrives on time" });

    let first = test::TestRequest::post()
        .uri("/api/v1/questions")
        .insert_header(bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, first).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let second = test::TestRequest::post()
        .uri("/api/v1/questions")
        .insert_header(bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, second).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::QuestionAlreadyExists as i32);
}

#[actix_web::test]
async fn non_admin_cannot_create_question() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let faculty = create_user(
        storage.as_ref(),
        "teacher@example.com",
        UserType::User,
        UserRole::Faculty,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/questions")
        .insert_header(bearer(&faculty))
        .set_json(json!({ "category_id": 1, "text": "Anything" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/categories")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

struct Catalog {
    course_id: i64,
    form_id: i64,
    question_id: i64,
}

// 一个课程、一道题、当前开放的表单
async fn open_catalog(storage: &dyn Storage) -> Catalog {
    let department = storage
        .create_department(CreateDepartmentRequest {
            name: "Physics".to_string(),
            code: None,
        })
        .await
        .unwrap();
    let course = storage
        .create_course(CreateCourseRequest {
            department_id: department.id,
            code: "PHY1".to_string(),
            title: "Mechanics".to_string(),
        })
        .await
        .unwrap();
    let category = storage
        .create_category(CreateCategoryRequest {
            name: "Teaching".to_string(),
            description: None,
            weight: None,
        })
        .await
        .unwrap();
    let question = storage
        .create_question(CreateQuestionRequest {
            category_id: category.id,
            text: "Explains clearly".to_string(),
            weight: None,
        })
        .await
        .unwrap();
    let now = Utc::now();
    let form = storage
        .create_form(CreateFormRequest {
            title: "Midterm".to_string(),
            description: None,
            school_year: "2025-2026".to_string(),
            semester: Semester::First,
            start_at: now - chrono::Duration::days(1),
            end_at: now + chrono::Duration::days(1),
            is_active: true,
        })
        .await
        .unwrap();

    Catalog {
        course_id: course.id,
        form_id: form.id,
        question_id: question.id,
    }
}

fn submission(catalog: &Catalog, evaluator: &User, evaluatee: &User, rating: f64) -> Value {
    json!({
        "evaluator_id": evaluator.id,
        "evaluatee_id": evaluatee.id,
        "course_id": catalog.course_id,
        "form_id": catalog.form_id,
        "responses": [{ "question_id": catalog.question_id, "rating": rating }],
    })
}

#[actix_web::test]
async fn login_returns_token_and_sets_refresh_cookie() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    storage
        .create_user(CreateUserRequest {
            first_name: "Grace".to_string(),
            middle_name: None,
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: hash_password("Compiler1").unwrap(),
            user_type: UserType::User,
            role: UserRole::Faculty,
            department_id: None,
            detail: None,
        })
        .await
        .unwrap();

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "Grace@Example.com", "password": "Compiler1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
        .expect("refresh cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));

    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["access_token"].as_str().unwrap();
    assert!(JwtUtils::verify_access_token(token).is_ok());
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["email"], "grace@example.com");
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    create_user(
        storage.as_ref(),
        "nobody@example.com",
        UserType::User,
        UserRole::Student,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "Wrong1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::AuthFailed as i32);
}

#[actix_web::test]
async fn student_submission_is_created_with_scores() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let catalog = open_catalog(storage.as_ref()).await;
    let student = create_user(
        storage.as_ref(),
        "student@example.com",
        UserType::User,
        UserRole::Student,
    )
    .await;
    let faculty = create_user(
        storage.as_ref(),
        "faculty@example.com",
        UserType::User,
        UserRole::Faculty,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(&student))
        .set_json(submission(&catalog, &student, &faculty, 5.0))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["overall_score"].as_f64(), Some(5.0));
    let categories = body["data"]["category_scores"].as_array().unwrap();
    assert_eq!(categories.len(), 1);

    // 同一组合再次提交
    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(&student))
        .set_json(submission(&catalog, &student, &faculty, 4.0))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::EvaluationAlreadyExists as i32);
}

#[actix_web::test]
async fn faculty_cannot_evaluate_another_faculty() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let catalog = open_catalog(storage.as_ref()).await;
    let colleague = create_user(
        storage.as_ref(),
        "colleague@example.com",
        UserType::User,
        UserRole::Faculty,
    )
    .await;
    let faculty = create_user(
        storage.as_ref(),
        "faculty@example.com",
        UserType::User,
        UserRole::Faculty,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(&colleague))
        .set_json(submission(&catalog, &colleague, &faculty, 5.0))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::EvaluationFlowNotAllowed as i32);
    assert!(
        !storage
            .evaluation_exists(colleague.id, faculty.id, catalog.course_id, catalog.form_id)
            .await
            .unwrap()
    );
}

#[actix_web::test]
async fn admin_cannot_deactivate_self_through_update() {
    let storage: Arc<dyn Storage> = Arc::new(setup().await);
    let admin = create_user(
        storage.as_ref(),
        "root@example.com",
        UserType::Admin,
        UserRole::Supervisor,
    )
    .await;

    let app = init_app!(storage);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}", admin.id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "is_active": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::CanNotDeleteCurrentUser as i32);

    let row = storage.get_user_by_id(admin.id).await.unwrap().unwrap();
    assert!(row.is_active);
}
