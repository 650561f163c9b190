use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Lecturer => "lecturer",
            Role::Staff => "staff",
        }
    }

    /// Strict: an unrecognized role string in storage is an error, never a default.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "lecturer" => Some(Role::Lecturer),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("lecturer"), Some(Role::Lecturer));
        assert_eq!(Role::parse("staff"), Some(Role::Staff));
    }

    #[test]
    fn test_parse_unknown_role_is_none() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Student"), None);
        assert_eq!(Role::parse(""), None);
    }
}
