use anyhow::Result;

use folio_core::{
    api::{check_connection, ApiClient},
    AppConfig, RequestTracker,
};

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = ApiClient::new(&config.api, RequestTracker::new(config.loading.event_capacity))?;

    println!("Checking {}...", client.profile_endpoint());
    let summary = check_connection(&client).await?;

    println!("Profile loaded for {}", summary.username);
    println!("  projects:          {}", summary.projects);
    println!("  positions:         {}", summary.positions);
    println!("  skill categories:  {}", summary.skill_categories);
    println!("  social links:      {}", summary.social_links);

    Ok(())
}
