//! Write access to the portfolio backend
//!
//! Every write goes through the tracked [`ApiClient`] and, once the backend has
//! accepted it, invalidates the [`ProfileStore`] so the next read refetches.

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::store::ProfileStore;
use crate::Result;

/// Fields of the signed-in user's profile; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
    }
}

/// A project to create (`id` unset) or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub role: String,
    pub technologies: Vec<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub is_active: bool,
}

/// A skill category with its skills, to create (`id` unset) or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroupInput {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    pub category: String,
    pub skills_list: Vec<String>,
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct ProfileEditor {
    client: Arc<ApiClient>,
    store: Arc<ProfileStore>,
}

impl ProfileEditor {
    pub fn new(client: Arc<ApiClient>, store: Arc<ProfileStore>) -> Self {
        Self { client, store }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        self.client
            .submit(Method::PATCH, "/api/users/profile/", update)
            .await?;
        self.written("profile").await;
        Ok(())
    }

    pub async fn save_project(&self, project: &ProjectInput) -> Result<()> {
        let (method, endpoint) = match project.id {
            Some(id) => (Method::PUT, format!("{}{}/", self.projects_path(), id)),
            None => (Method::POST, self.projects_path()),
        };
        self.client.submit(method, &endpoint, project).await?;
        self.written("project").await;
        Ok(())
    }

    pub async fn delete_project(&self, id: u64) -> Result<()> {
        self.client
            .delete(&format!("{}{}/", self.projects_path(), id))
            .await?;
        self.written("project").await;
        Ok(())
    }

    pub async fn save_skill_group(&self, group: &SkillGroupInput) -> Result<()> {
        let (method, endpoint) = match group.id {
            Some(id) => (Method::PUT, format!("{}{}/", self.skills_path(), id)),
            None => (Method::POST, self.skills_path()),
        };
        self.client.submit(method, &endpoint, group).await?;
        self.written("skills").await;
        Ok(())
    }

    pub async fn delete_skill_group(&self, id: u64) -> Result<()> {
        self.client
            .delete(&format!("{}{}/", self.skills_path(), id))
            .await?;
        self.written("skills").await;
        Ok(())
    }

    fn projects_path(&self) -> String {
        format!("/api/users/{}/projects/", self.client.user_id())
    }

    fn skills_path(&self) -> String {
        format!("/api/users/{}/skills/", self.client.user_id())
    }

    async fn written(&self, what: &str) {
        tracing::info!(what, "Backend updated, dropping cached profile");
        self.store.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{test_server, ProfileSource};
    use crate::api::models::fixtures::PROFILE_JSON;
    use crate::api::models::ProfileData;
    use crate::config::ApiConfig;
    use crate::loading::RequestTracker;
    use crate::Error;
    use async_trait::async_trait;

    /// Reads come from the fixture so only writes reach the server
    struct FixtureSource;

    #[async_trait]
    impl ProfileSource for FixtureSource {
        async fn fetch_profile(&self) -> Result<ProfileData> {
            Ok(serde_json::from_str(PROFILE_JSON)?)
        }
    }

    async fn editor(status_line: &'static str, body: &'static str) -> (
        ProfileEditor,
        Arc<ProfileStore>,
        tokio::sync::mpsc::UnboundedReceiver<String>,
    ) {
        let (addr, requests) = test_server::serve(status_line, body).await;
        let config = ApiConfig {
            base_url: format!("http://{}", addr),
            admin_token: Some("t0ken".to_string()),
            ..Default::default()
        };
        let client = Arc::new(ApiClient::new(&config, RequestTracker::default()).unwrap());
        let store = Arc::new(ProfileStore::new(Arc::new(FixtureSource), &config));
        (ProfileEditor::new(client, store.clone()), store, requests)
    }

    fn project(id: Option<u64>) -> ProjectInput {
        ProjectInput {
            id,
            title: "Folio".to_string(),
            description: "Portfolio viewer".to_string(),
            role: "Author".to_string(),
            technologies: split_list("rust, tokio,,ratatui "),
            project_url: None,
            github_url: Some("https://github.com/jdoe/folio".to_string()),
            is_active: true,
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("rust, tokio,,ratatui "), vec!["rust", "tokio", "ratatui"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Hello".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"bio":"Hello"}"#);
        assert!(ProfileUpdate::default().is_empty());
    }

    #[tokio::test]
    async fn test_write_invalidates_cached_profile() {
        let (editor, store, mut requests) = editor("204 No Content", "").await;

        store.get().await.unwrap();
        assert!(store.cached().await.is_some());

        editor.delete_project(3).await.unwrap();
        let request = requests.recv().await.unwrap();
        assert!(request.starts_with("DELETE /api/users/1/projects/3/ "));
        assert!(request.to_ascii_lowercase().contains("authorization: token t0ken"));
        assert!(store.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_create_and_replace_project() {
        let (editor, _store, mut requests) = editor("200 OK", "{}").await;

        editor.save_project(&project(None)).await.unwrap();
        let created = requests.recv().await.unwrap();
        assert!(created.starts_with("POST /api/users/1/projects/ "));
        assert!(created.contains(r#""technologies":["rust","tokio","ratatui"]"#));
        assert!(!created.contains(r#""id""#));

        editor.save_project(&project(Some(7))).await.unwrap();
        assert!(requests
            .recv()
            .await
            .unwrap()
            .starts_with("PUT /api/users/1/projects/7/ "));
    }

    #[tokio::test]
    async fn test_skill_group_and_profile_paths() {
        let (editor, _store, mut requests) = editor("200 OK", "{}").await;
        let group = SkillGroupInput {
            id: None,
            category: "Languages".to_string(),
            skills_list: vec!["Rust".to_string()],
        };

        editor.save_skill_group(&group).await.unwrap();
        editor.delete_skill_group(2).await.unwrap();
        editor
            .update_profile(&ProfileUpdate {
                first_name: Some("Jane".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(requests.recv().await.unwrap().starts_with("POST /api/users/1/skills/ "));
        assert!(requests.recv().await.unwrap().starts_with("DELETE /api/users/1/skills/2/ "));
        let patch = requests.recv().await.unwrap();
        assert!(patch.starts_with("PATCH /api/users/profile/ "));
        assert!(patch.ends_with(r#"{"first_name":"Jane"}"#));
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_cache() {
        let (editor, store, _requests) = editor("400 Bad Request", "{}").await;
        store.get().await.unwrap();

        let err = editor.delete_skill_group(2).await.unwrap_err();
        assert!(matches!(err, Error::ApiStatus { status: 400, .. }));
        assert!(store.cached().await.is_some());
    }
}
