use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 账户类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserType {
    Admin, // 管理员
    User,  // 普通账户
}

impl UserType {
    pub const ADMIN: &'static str = "admin";
    pub const USER: &'static str = "user";
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!("无效的账户类型: '{s}'. 支持的类型: admin, user"))
        })
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Admin => write!(f, "{}", UserType::ADMIN),
            UserType::User => write!(f, "{}", UserType::USER),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserType::ADMIN => Ok(UserType::Admin),
            UserType::USER => Ok(UserType::User),
            _ => Err(format!("Invalid user type: {s}")),
        }
    }
}

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Faculty,    // 教师
    Student,    // 学生
    Supervisor, // 督导
}

impl UserRole {
    pub const FACULTY: &'static str = "faculty";
    pub const STUDENT: &'static str = "student";
    pub const SUPERVISOR: &'static str = "supervisor";

    pub fn all_roles() -> &'static [UserRole] {
        &[UserRole::Faculty, UserRole::Student, UserRole::Supervisor]
    }

    /// 可查看全部报表的角色
    pub fn report_viewer_roles() -> &'static [UserRole] {
        &[UserRole::Supervisor]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: faculty, student, supervisor"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Faculty => write!(f, "{}", UserRole::FACULTY),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Supervisor => write!(f, "{}", UserRole::SUPERVISOR),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::FACULTY => Ok(UserRole::Faculty),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::SUPERVISOR => Ok(UserRole::Supervisor),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub user_type: UserType,
    pub role: UserRole,
    pub department_id: Option<i64>,
    pub is_active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().filter(|m| !m.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// 角色详情（存放于各角色的扩展表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum RoleDetail {
    Faculty {
        employee_no: Option<String>,
        academic_rank: Option<String>,
    },
    Student {
        student_no: Option<String>,
        year_level: Option<i32>,
        section: Option<String>,
    },
    Supervisor {
        employee_no: Option<String>,
        position: Option<String>,
    },
}

impl RoleDetail {
    pub fn role(&self) -> UserRole {
        match self {
            RoleDetail::Faculty { .. } => UserRole::Faculty,
            RoleDetail::Student { .. } => UserRole::Student,
            RoleDetail::Supervisor { .. } => UserRole::Supervisor,
        }
    }
}

// 带角色详情的用户
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserWithDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub detail: Option<RoleDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(*role));
        }
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<UserRole>("\"dean\"").unwrap_err();
        assert!(err.to_string().contains("无效的用户角色"));
    }

    #[test]
    fn test_role_detail_tagging() {
        let detail: RoleDetail = serde_json::from_str(
            r#"{"role":"student","student_no":"2024-001","year_level":2,"section":"B"}"#,
        )
        .unwrap();
        assert_eq!(detail.role(), UserRole::Student);

        let json = serde_json::to_value(RoleDetail::Faculty {
            employee_no: Some("F-10".into()),
            academic_rank: None,
        })
        .unwrap();
        assert_eq!(json["role"], "faculty");
        assert_eq!(json["employee_no"], "F-10");
    }
}
