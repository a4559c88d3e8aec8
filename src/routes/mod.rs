pub mod auth;

pub mod users;

pub mod departments;

pub mod courses;

pub mod categories;

pub mod questions;

pub mod forms;

pub mod evaluations;

pub mod reports;

pub use auth::configure_auth_routes;
pub use categories::configure_category_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use evaluations::configure_evaluation_routes;
pub use forms::configure_form_routes;
pub use questions::configure_question_routes;
pub use reports::configure_report_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 /api/v1 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_department_routes)
        .configure(configure_course_routes)
        .configure(configure_category_routes)
        .configure(configure_question_routes)
        .configure(configure_form_routes)
        .configure(configure_evaluation_routes)
        .configure(configure_report_routes);
}
