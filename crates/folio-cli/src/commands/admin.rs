use std::sync::Arc;

use anyhow::{anyhow, Result};

use folio_core::{
    api::{ApiClient, ProfileEditor, ProfileStore},
    config::ADMIN_TOKEN_ENV,
    AppConfig, RequestTracker,
};

pub use folio_core::api::{split_list, ProfileUpdate, ProjectInput, SkillGroupInput};

/// One write against the backend
pub enum Write {
    Profile(ProfileUpdate),
    Project(ProjectInput),
    DeleteProject(u64),
    SkillGroup(SkillGroupInput),
    DeleteSkillGroup(u64),
}

pub async fn run(config: &AppConfig, write: Write) -> Result<()> {
    if config.api.admin_token.is_none() {
        return Err(anyhow!(
            "No admin token configured.\nSet api.admin_token in {} or export {}.",
            AppConfig::config_path().display(),
            ADMIN_TOKEN_ENV
        ));
    }

    let client = Arc::new(ApiClient::new(
        &config.api,
        RequestTracker::new(config.loading.event_capacity),
    )?);
    let store = Arc::new(ProfileStore::new(client.clone(), &config.api));
    let editor = ProfileEditor::new(client, store);

    let done = match write {
        Write::Profile(update) => {
            if update.is_empty() {
                return Err(anyhow!("Nothing to update; pass at least one field"));
            }
            editor.update_profile(&update).await?;
            "Profile updated".to_string()
        }
        Write::Project(project) => {
            let verb = if project.id.is_some() { "updated" } else { "added" };
            editor.save_project(&project).await?;
            format!("Project '{}' {}", project.title, verb)
        }
        Write::DeleteProject(id) => {
            editor.delete_project(id).await?;
            format!("Project {} deleted", id)
        }
        Write::SkillGroup(group) => {
            let verb = if group.id.is_some() { "updated" } else { "added" };
            editor.save_skill_group(&group).await?;
            format!("Skill group '{}' {}", group.category, verb)
        }
        Write::DeleteSkillGroup(id) => {
            editor.delete_skill_group(id).await?;
            format!("Skill group {} deleted", id)
        }
    };

    println!("{}", done);
    Ok(())
}
