use crate::config::MessageRule;

/// Chooses the human-readable status line for a set of in-flight endpoints
#[derive(Debug, Clone, Default)]
pub struct StatusMessagePolicy {
    rules: Vec<MessageRule>,
}

impl StatusMessagePolicy {
    pub fn new(rules: Vec<MessageRule>) -> Self {
        Self { rules }
    }

    /// `None` when idle; the first rule whose pattern occurs in a lone active
    /// endpoint; otherwise a generic count
    pub fn message_for(&self, active: &[String]) -> Option<String> {
        match active {
            [] => None,
            [endpoint] => Some(
                self.rules
                    .iter()
                    .find(|rule| endpoint.contains(rule.pattern.as_str()))
                    .map(|rule| rule.message.clone())
                    .unwrap_or_else(|| "Loading data...".to_string()),
            ),
            many => Some(format!("Loading {} requests...", many.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadingConfig;

    fn policy() -> StatusMessagePolicy {
        StatusMessagePolicy::new(LoadingConfig::default().messages)
    }

    #[test]
    fn test_idle_has_no_message() {
        assert_eq!(policy().message_for(&[]), None);
    }

    #[test]
    fn test_first_match_wins() {
        let policy = StatusMessagePolicy::new(vec![
            MessageRule::new("users", "Loading user..."),
            MessageRule::new("profile", "Loading profile..."),
        ]);
        assert_eq!(
            policy.message_for(&["/api/users/1/profile/".to_string()]),
            Some("Loading user...".to_string())
        );
    }

    #[test]
    fn test_default_rules() {
        assert_eq!(
            policy().message_for(&["/api/users/1/profile/".to_string()]),
            Some("Loading profile...".to_string())
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(
            policy().message_for(&["/api/health/".to_string()]),
            Some("Loading data...".to_string())
        );
        assert_eq!(
            policy().message_for(&[
                "/api/users/1/profile/".to_string(),
                "/api/projects/".to_string(),
            ]),
            Some("Loading 2 requests...".to_string())
        );
    }
}
