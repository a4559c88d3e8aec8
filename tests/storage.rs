//! 基于内存 SQLite 的存储层集成测试

mod common;

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use rust_faculty_eval::errors::EvalSystemError;
use rust_faculty_eval::models::categories::requests::CreateCategoryRequest;
use rust_faculty_eval::models::courses::requests::CreateCourseRequest;
use rust_faculty_eval::models::departments::requests::CreateDepartmentRequest;
use rust_faculty_eval::models::evaluations::entities::EvaluationType;
use rust_faculty_eval::models::evaluations::requests::{AnswerInput, NewEvaluation};
use rust_faculty_eval::models::forms::entities::Semester;
use rust_faculty_eval::models::forms::requests::CreateFormRequest;
use rust_faculty_eval::models::questions::requests::CreateQuestionRequest;
use rust_faculty_eval::models::users::entities::{RoleDetail, User, UserRole, UserType};
use rust_faculty_eval::models::reports::FacultyReportQuery;
use rust_faculty_eval::models::users::requests::{
    CreateUserRequest, UpdateUserRequest, UserListQuery,
};
use rust_faculty_eval::storage::Storage;
use rust_faculty_eval::storage::sea_orm_storage::SeaOrmStorage;

use common::{memory_db, setup};

async fn create_user(
    storage: &SeaOrmStorage,
    email: &str,
    role: UserRole,
    detail: Option<RoleDetail>,
) -> User {
    storage
        .create_user(CreateUserRequest {
            first_name: "Test".to_string(),
            middle_name: None,
            last_name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password: "hashed".to_string(),
            user_type: UserType::User,
            role,
            department_id: None,
            detail,
        })
        .await
        .unwrap()
}

struct Fixture {
    student: User,
    faculty: User,
    course_id: i64,
    form_id: i64,
    questions: Vec<i64>,
}

// 两个分类：A（权重 2，两道题）和 B（权重 1，一道题）
async fn fixture(storage: &SeaOrmStorage) -> Fixture {
    let department = storage
        .create_department(CreateDepartmentRequest {
            name: "Computer Science".to_string(),
            code: Some("CS".to_string()),
        })
        .await
        .unwrap();
    let course = storage
        .create_course(CreateCourseRequest {
            department_id: department.id,
            code: "CS101".to_string(),
            title: "Intro".to_string(),
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
            start_at: now - Duration::days(1),
            end_at: now + Duration::days(1),
            is_active: true,
        })
        .await
        .unwrap();

    let a = storage
        .create_category(CreateCategoryRequest {
            name: "Teaching".to_string(),
            description: None,
            weight: Some(2.0),
        })
        .await
        .unwrap();
    let b = storage
        .create_category(CreateCategoryRequest {
            name: "Attitude".to_string(),
            description: None,
            weight: Some(1.0),
        })
        .await
        .unwrap();

    let mut questions = Vec::new();
    for (category_id, text) in [(a.id, "Clear"), (a.id, "Prepared"), (b.id, "Punctual")] {
        let q = storage
            .create_question(CreateQuestionRequest {
                category_id,
                text: text.to_string(),
                weight: None,
            })
            .await
            .unwrap();
        questions.push(q.id);
    }

    let student = create_user(storage, "student@example.com", UserRole::Student, None).await;
    let faculty = create_user(storage, "faculty@example.com", UserRole::Faculty, None).await;

    Fixture {
        student,
        faculty,
        course_id: course.id,
        form_id: form.id,
        questions,
    }
}

fn answers(question_ids: &[i64], ratings: &[f64]) -> Vec<AnswerInput> {
    question_ids
        .iter()
        .zip(ratings)
        .map(|(&question_id, &rating)| AnswerInput {
            question_id,
            rating,
        })
        .collect()
}

fn new_evaluation(f: &Fixture, evaluator_id: i64, ratings: &[f64]) -> NewEvaluation {
    NewEvaluation {
        evaluator_id,
        evaluatee_id: f.faculty.id,
        course_id: f.course_id,
        form_id: f.form_id,
        evaluation_type: EvaluationType::Student,
        comments: None,
        responses: answers(&f.questions, ratings),
    }
}

#[tokio::test]
async fn submit_computes_weighted_overall_score() {
    let storage = setup().await;
    let f = fixture(&storage).await;

    let result = storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[4.0, 5.0, 3.0]))
        .await
        .unwrap();

    // A = 4.5，B = 3.0，(2 * 4.5 + 1 * 3.0) / 3 = 4.0
    assert_eq!(result.overall_score, 4.0);
    assert_eq!(result.category_scores.len(), 2);

    let stored = storage
        .get_evaluation_by_id(result.evaluation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.overall_score, 4.0);

    let detail = storage
        .get_evaluation_detail(result.evaluation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.responses.len(), 3);
}

#[tokio::test]
async fn all_max_ratings_score_five() {
    let storage = setup().await;
    let f = fixture(&storage).await;

    let result = storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[5.0, 5.0, 5.0]))
        .await
        .unwrap();

    assert_eq!(result.overall_score, 5.0);
}

#[tokio::test]
async fn failed_submit_leaves_no_rows() {
    let storage = setup().await;
    let f = fixture(&storage).await;

    let mut evaluation = new_evaluation(&f, f.student.id, &[4.0, 4.0]);
    evaluation.responses.push(AnswerInput {
        question_id: 999_999,
        rating: 3.0,
    });

    assert!(storage.submit_evaluation(evaluation).await.is_err());
    assert!(
        !storage
            .evaluation_exists(f.student.id, f.faculty.id, f.course_id, f.form_id)
            .await
            .unwrap()
    );

    // 回滚后同一组合仍可正常提交
    storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[4.0, 4.0, 4.0]))
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_submission_is_conflict() {
    let storage = setup().await;
    let f = fixture(&storage).await;

    storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[3.0, 3.0, 3.0]))
        .await
        .unwrap();
    let err = storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[3.0, 3.0, 3.0]))
        .await
        .unwrap_err();

    assert!(matches!(err, EvalSystemError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_question_text_in_category_is_conflict() {
    let storage = setup().await;
    let category = storage
        .create_category(CreateCategoryRequest {
            name: "Teaching".to_string(),
            description: None,
            weight: None,
        })
        .await
        .unwrap();

    let request = CreateQuestionRequest {
        category_id: category.id,
        text: "Explains clearly".to_string(),
        weight: None,
    };
    storage.create_question(request.clone()).await.unwrap();
    let err = storage.create_question(request).await.unwrap_err();

    assert!(matches!(err, EvalSystemError::Conflict(_)));
}

#[tokio::test]
async fn list_by_role_returns_only_that_role_with_detail() {
    let storage = setup().await;
    create_user(
        &storage,
        "f1@example.com",
        UserRole::Faculty,
        Some(RoleDetail::Faculty {
            employee_no: Some("E-1".to_string()),
            academic_rank: Some("Professor".to_string()),
        }),
    )
    .await;
    create_user(&storage, "s1@example.com", UserRole::Student, None).await;
    create_user(&storage, "v1@example.com", UserRole::Supervisor, None).await;

    let faculty = storage.list_users_by_role(UserRole::Faculty).await.unwrap();

    assert_eq!(faculty.len(), 1);
    assert_eq!(faculty[0].user.email, "f1@example.com");
    assert!(matches!(
        faculty[0].detail,
        Some(RoleDetail::Faculty { ref employee_no, .. }) if employee_no.as_deref() == Some("E-1")
    ));
}

#[tokio::test]
async fn deactivated_users_are_hidden() {
    let storage = setup().await;
    let kept = create_user(&storage, "kept@example.com", UserRole::Faculty, None).await;
    let gone = create_user(&storage, "gone@example.com", UserRole::Faculty, None).await;

    assert!(storage.deactivate_user(gone.id).await.unwrap());

    let faculty = storage.list_users_by_role(UserRole::Faculty).await.unwrap();
    assert_eq!(faculty.len(), 1);
    assert_eq!(faculty[0].user.id, kept.id);

    let listed = storage
        .list_users_with_pagination(UserListQuery::default())
        .await
        .unwrap();
    assert!(listed.items.iter().all(|u| u.id != gone.id));

    // 记录仍保留
    let row = storage.get_user_by_id(gone.id).await.unwrap().unwrap();
    assert!(!row.is_active);
}

#[tokio::test]
async fn top_faculty_orders_by_average_and_respects_limit() {
    let storage = setup().await;
    let f = fixture(&storage).await;
    let second = create_user(&storage, "second@example.com", UserRole::Faculty, None).await;
    let third = create_user(&storage, "third@example.com", UserRole::Faculty, None).await;

    let mut low = new_evaluation(&f, f.student.id, &[2.0, 2.0, 2.0]);
    low.evaluatee_id = f.faculty.id;
    let mut high = new_evaluation(&f, f.student.id, &[5.0, 5.0, 5.0]);
    high.evaluatee_id = second.id;
    let mut mid = new_evaluation(&f, f.student.id, &[4.0, 4.0, 4.0]);
    mid.evaluatee_id = third.id;
    for evaluation in [low, high, mid] {
        storage.submit_evaluation(evaluation).await.unwrap();
    }

    let top = storage.top_faculty(2, None).await.unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].faculty_id, second.id);
    assert_eq!(top[0].average_score, 5.0);
    assert_eq!(top[1].faculty_id, third.id);
    assert_eq!(top[1].evaluation_count, 1);
}

#[tokio::test]
async fn reports_skip_users_no_longer_faculty() {
    let storage = setup().await;
    let f = fixture(&storage).await;
    storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[5.0, 5.0, 5.0]))
        .await
        .unwrap();

    storage
        .update_user(
            f.faculty.id,
            UpdateUserRequest {
                role: Some(UserRole::Student),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let top = storage.top_faculty(10, None).await.unwrap();
    assert!(top.is_empty());
    let listed = storage
        .faculty_score_summaries(FacultyReportQuery::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
    assert_eq!(storage.overview_report(Utc::now()).await.unwrap().active_faculty, 0);
}

#[tokio::test]
async fn role_change_drops_previous_detail() {
    let storage = setup().await;
    let user = create_user(
        &storage,
        "switch@example.com",
        UserRole::Faculty,
        Some(RoleDetail::Faculty {
            employee_no: Some("E-7".to_string()),
            academic_rank: None,
        }),
    )
    .await;

    let to_role = |role| UpdateUserRequest {
        role: Some(role),
        ..Default::default()
    };
    storage
        .update_user(user.id, to_role(UserRole::Student))
        .await
        .unwrap()
        .unwrap();
    storage
        .update_user(user.id, to_role(UserRole::Faculty))
        .await
        .unwrap()
        .unwrap();

    // 切回教师后不应再看到旧的教师详情
    let loaded = storage.get_user_with_detail(user.id).await.unwrap().unwrap();
    assert_eq!(loaded.user.role, UserRole::Faculty);
    assert!(loaded.detail.is_none());
}

#[tokio::test]
async fn overview_counts_evaluations_and_open_forms() {
    let storage = setup().await;
    let f = fixture(&storage).await;
    storage
        .submit_evaluation(new_evaluation(&f, f.student.id, &[4.0, 4.0, 4.0]))
        .await
        .unwrap();

    let overview = storage.overview_report(Utc::now()).await.unwrap();

    assert_eq!(overview.total_evaluations, 1);
    assert_eq!(overview.active_faculty, 1);
    assert_eq!(overview.open_forms, 1);
    assert_eq!(overview.overall_average, Some(4.0));
}

#[tokio::test]
async fn missing_role_tables_are_detected_and_skipped() {
    let db = memory_db().await;
    // 只执行基础表迁移
    Migrator::up(&db, Some(1)).await.unwrap();
    let storage = SeaOrmStorage::from_connection(db).await.unwrap();

    let tables = storage.role_detail_tables();
    assert!(!tables.faculty && !tables.student && !tables.supervisor);

    let user = create_user(
        &storage,
        "nodetail@example.com",
        UserRole::Faculty,
        Some(RoleDetail::Faculty {
            employee_no: Some("E-9".to_string()),
            academic_rank: None,
        }),
    )
    .await;

    let loaded = storage.get_user_with_detail(user.id).await.unwrap().unwrap();
    assert!(loaded.detail.is_none());

    let faculty = storage.list_users_by_role(UserRole::Faculty).await.unwrap();
    assert_eq!(faculty.len(), 1);
    assert!(faculty[0].detail.is_none());
}
