#![allow(dead_code)]

use std::str::FromStr;

use migration::{Migrator, MigratorTrait};
use rust_faculty_eval::models::users::entities::{User, UserRole, UserType};
use rust_faculty_eval::models::users::requests::CreateUserRequest;
use rust_faculty_eval::storage::Storage;
use rust_faculty_eval::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};

pub async fn memory_db() -> DatabaseConnection {
    let opt = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // 内存库只能共享同一个连接
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opt)
        .await
        .unwrap();
    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

pub async fn setup() -> SeaOrmStorage {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

pub async fn create_user(
    storage: &dyn Storage,
    email: &str,
    user_type: UserType,
    role: UserRole,
) -> User {
    storage
        .create_user(CreateUserRequest {
            first_name: "Test".to_string(),
            middle_name: None,
            last_name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password: "hashed".to_string(),
            user_type,
            role,
            department_id: None,
            detail: None,
        })
        .await
        .unwrap()
}
