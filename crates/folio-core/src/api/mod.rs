mod admin;
mod client;
mod models;
mod store;

pub use admin::{split_list, ProfileEditor, ProfileUpdate, ProjectInput, SkillGroupInput};
pub use client::{ApiClient, ProfileSource};
pub use models::{
    ProfileData, ProfileSummary, Project, Skill, SkillCategory, SocialLink, UserProfile,
    WorkExperience,
};
pub use store::ProfileStore;

/// Load the profile once and report what came back
pub async fn check_connection(source: &dyn ProfileSource) -> crate::Result<ProfileSummary> {
    tracing::info!("Testing API connection...");
    let profile = source.fetch_profile().await?;
    Ok(profile.summary())
}
