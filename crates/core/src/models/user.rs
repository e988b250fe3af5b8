//! User model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-wide role, exactly one per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Normal,
    Premium,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Normal => "NORMAL",
            UserRole::Premium => "PREMIUM",
            UserRole::Manager => "MANAGER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn all() -> &'static [UserRole] {
        &[
            UserRole::Normal,
            UserRole::Premium,
            UserRole::Manager,
            UserRole::Admin,
        ]
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Normal
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    None,
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchNote {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Which profile sections other users may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub show_phone: bool,
    pub show_socials: bool,
    pub show_bio: bool,
    pub show_expertise: bool,
    pub show_experience: bool,
    pub show_education: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            show_phone: false,
            show_socials: true,
            show_bio: true,
            show_expertise: true,
            show_experience: true,
            show_education: true,
        }
    }
}

impl PrivacySettings {
    pub fn all_visible() -> Self {
        Self {
            show_phone: true,
            ..Self::default()
        }
    }
}

/// A community member ("node")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique handle
    pub username: String,
    pub real_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    pub role: UserRole,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default)]
    pub reputation: u32,
    #[serde(default)]
    pub meeting_count: u32,
    /// Minutes
    #[serde(default)]
    pub total_meeting_duration: u32,
    #[serde(default)]
    pub avg_rating: f32,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub research_notes: Vec<ResearchNote>,
    #[serde(default)]
    pub privacy_settings: PrivacySettings,
    /// Argon2 PHC string. Demo accounts without one sign in by identifier alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl User {
    /// A fresh NORMAL account with the registration defaults
    pub fn new(username: String, real_name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            real_name,
            email: String::new(),
            phone_number: String::new(),
            affiliation: "Independent".to_string(),
            job_title: None,
            company_name: None,
            gender: Gender::None,
            role: UserRole::Normal,
            expertise: Vec::new(),
            bio: String::new(),
            avatar: None,
            banner: None,
            linkedin: None,
            github: None,
            medium: None,
            reputation: 100,
            meeting_count: 0,
            total_meeting_duration: 0,
            avg_rating: 0.0,
            followers_count: 0,
            following_count: 0,
            experiences: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            posts: Vec::new(),
            research_notes: Vec::new(),
            privacy_settings: PrivacySettings::default(),
            password_hash: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_email(mut self, email: String) -> Self {
        self.email = email;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("node".to_string(), "Some Node".to_string());
        assert_eq!(user.role, UserRole::Normal);
        assert_eq!(user.reputation, 100);
        assert_eq!(user.affiliation, "Independent");
        assert!(!user.privacy_settings.show_phone);
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn test_sparse_document_fills_defaults() {
        let json = r#"{"id":"x","username":"x","realName":"X","role":"PREMIUM"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Premium);
        assert!(user.experiences.is_empty());
        assert_eq!(user.gender, Gender::None);
    }

    #[test]
    fn test_gender_spelling() {
        let json = serde_json::to_string(&Gender::PreferNotToSay).unwrap();
        assert_eq!(json, "\"Prefer not to say\"");
    }
}
