use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub profile_photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// "First Last", falling back to the username when both are blank
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: u64,
    pub platform: String,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub role: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: u64,
    pub category: SkillCategory,
    #[serde(default)]
    pub skills_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub id: u64,
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    #[serde(default)]
    pub technologies_used: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate returned by `GET /api/users/{id}/profile/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub user: UserProfile,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
}

impl ProfileData {
    pub fn active_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_active)
    }

    pub fn active_social_links(&self) -> impl Iterator<Item = &SocialLink> {
        self.social_links.iter().filter(|l| l.is_active)
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            username: self.user.username.clone(),
            social_links: self.social_links.len(),
            projects: self.projects.len(),
            skill_categories: self.skills.len(),
            positions: self.work_experience.len(),
        }
    }
}

/// Counts reported by a connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub social_links: usize,
    pub projects: usize,
    pub skill_categories: usize,
    pub positions: usize,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileData {
        serde_json::from_str(fixtures::PROFILE_JSON).unwrap()
    }

    #[test]
    fn test_deserialize_profile() {
        let profile = profile();
        assert_eq!(profile.user.username, "jdoe");
        assert_eq!(profile.projects[0].technologies, vec!["Rust", "tokio"]);
        assert_eq!(profile.projects[0].project_url, None);
        assert_eq!(
            profile.work_experience[0].start_date,
            NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()
        );
        assert!(profile.work_experience[0].end_date.is_none());
    }

    #[test]
    fn test_active_filters_and_summary() {
        let profile = profile();
        assert_eq!(profile.active_projects().count(), 1);
        assert_eq!(profile.active_social_links().count(), 1);
        assert_eq!(
            profile.summary(),
            ProfileSummary {
                username: "jdoe".to_string(),
                social_links: 2,
                projects: 2,
                skill_categories: 1,
                positions: 1,
            }
        );
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let mut user = profile().user;
        assert_eq!(user.full_name(), "Jane Doe");
        user.first_name.clear();
        user.last_name = "  ".to_string();
        assert_eq!(user.full_name(), "jdoe");
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = r#"{"user": {"id": 2, "username": "x", "email": "", "first_name": "",
            "last_name": "", "bio": "", "profile_photo": "",
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#;
        let profile: ProfileData = serde_json::from_str(json).unwrap();
        assert!(profile.projects.is_empty());
        assert!(profile.work_experience.is_empty());
    }
}
