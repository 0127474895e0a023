//! Site-owner identity, overridable through the environment.

use std::env;

#[derive(Clone, Debug)]
pub struct Profile {
    pub name: String,
    pub github_user: String,
    pub bio: String,
    pub linkedin_url: Option<String>,
    pub token: Option<String>,
}

/// Skills grid shown on the about screen.
pub const SKILLS: [(&str, &str, &str); 6] = [
    ("PYTHON", "3.12", "OPTIMIZED"),
    ("RUST", "1.85", "ACTIVE"),
    ("TYPESCRIPT", "5.3", "ACTIVE"),
    ("TENSORFLOW", "2.15", "LOADING"),
    ("TOKIO", "1.49", "STABLE"),
    ("RATATUI", "0.30", "DETECTED"),
];

impl Profile {
    pub fn from_env() -> Self {
        Self {
            name: env::var("GITFOLIO_NAME").unwrap_or_else(|_| "Nick Feng".to_string()),
            github_user: env::var("GITFOLIO_USER").unwrap_or_else(|_| "nfe7".to_string()),
            bio: env::var("GITFOLIO_BIO").unwrap_or_else(|_| {
                "Passionate developer focusing on clean code, scalable architecture, \
                 and building intuitive user experiences."
                    .to_string()
            }),
            linkedin_url: env::var("GITFOLIO_LINKEDIN").ok(),
            token: env::var("GITHUB_TOKEN").ok(),
        }
    }

    pub fn github_url(&self) -> String {
        format!("https://github.com/{}", self.github_user)
    }
}
