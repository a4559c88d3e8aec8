use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static SCHOOL_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid school year regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

const MIN_PASSWORD_CHARS: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "abcd1234",
    "faculty123",
    "teacher123",
];

fn long_enough(p: &str) -> bool {
    p.chars().count() >= MIN_PASSWORD_CHARS
}

fn has_upper(p: &str) -> bool {
    p.chars().any(|c| c.is_uppercase())
}

fn has_lower(p: &str) -> bool {
    p.chars().any(|c| c.is_lowercase())
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

fn not_common(p: &str) -> bool {
    !COMMON_PASSWORDS
        .iter()
        .any(|weak| p.eq_ignore_ascii_case(weak))
}

/// 密码策略：至少 8 个字符，包含大小写字母与数字，且不在常见弱密码表中
const PASSWORD_RULES: &[(fn(&str) -> bool, &str)] = &[
    (long_enough, "Password must be at least 8 characters long"),
    (has_upper, "Password must contain at least one uppercase letter"),
    (has_lower, "Password must contain at least one lowercase letter"),
    (has_digit, "Password must contain at least one digit"),
    (not_common, "Password is too common, please choose a stronger password"),
];

/// 返回全部未满足的密码规则
pub fn password_violations(password: &str) -> Vec<&'static str> {
    PASSWORD_RULES
        .iter()
        .filter(|(rule, _)| !rule(password))
        .map(|(_, msg)| *msg)
        .collect()
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let violations = password_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

/// 姓名校验：去除首尾空白后 1..=100 个字符
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Name must not be empty");
    }
    if len > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

/// 学年格式 `YYYY-YYYY`，且后一年必须紧接前一年
pub fn validate_school_year(school_year: &str) -> Result<(), &'static str> {
    let Some(caps) = SCHOOL_YEAR_RE.captures(school_year) else {
        return Err("School year must look like YYYY-YYYY");
    };
    let start: i32 = caps[1].parse().map_err(|_| "School year must look like YYYY-YYYY")?;
    let end: i32 = caps[2].parse().map_err(|_| "School year must look like YYYY-YYYY")?;
    if end != start + 1 {
        return Err("School year must span two consecutive years");
    }
    Ok(())
}

/// 权重必须为有限正数
pub fn validate_weight(weight: f64) -> Result<(), &'static str> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err("Weight must be a positive number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("Evaluat0r").is_ok());

        assert_eq!(
            password_violations("Ab1"),
            vec!["Password must be at least 8 characters long"]
        );
        assert_eq!(
            password_violations("abcd1234"),
            vec![
                "Password must contain at least one uppercase letter",
                "Password is too common, please choose a stronger password",
            ]
        );
        assert_eq!(
            password_violations("AbcdEfgh"),
            vec!["Password must contain at least one digit"]
        );
        assert!(
            password_violations("Teacher123")
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_password_error_joins_all_violations() {
        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("8 characters"));
        assert!(err.contains("uppercase"));
        assert!(err.contains("digit"));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("maria.santos@univ.edu.ph").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Ana").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_school_year() {
        assert!(validate_school_year("2024-2025").is_ok());
        assert_eq!(
            validate_school_year("2024-2026"),
            Err("School year must span two consecutive years")
        );
        assert!(validate_school_year("2024/2025").is_err());
        assert!(validate_school_year("24-25").is_err());
    }

    #[test]
    fn test_weight() {
        assert!(validate_weight(1.5).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-2.0).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }
}
