//! Error types for profile lookups.
//!
//! There are two channels. [`ProviderError`] carries everything the provider
//! reported and is only ever logged. [`AnalyzeError`] is the closed set of
//! outcomes a user can see, each mapped to a fixed message.

use thiserror::Error;

/// Message shown when the submitted username is blank.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a username.";

/// Message shown when the profile exists but is private.
pub const PRIVATE_PROFILE_MESSAGE: &str = "Cannot analyze a private profile.";

/// Message shown for every other failure.
pub const PROVIDER_FAILURE_MESSAGE: &str = "Failed to fetch profile: An unexpected error occurred.";

/// Detailed failure from a [`ProfileProvider`](crate::provider::ProfileProvider).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The username does not resolve to a profile.
    #[error("Profile '{username}' does not exist")]
    NotFound { username: String },

    /// Transport or body-decoding failure from the HTTP client.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The response was well-formed JSON but not the shape we expected.
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

/// Outcome of a lookup that did not produce a profile.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("empty username")]
    EmptyInput,

    #[error("profile is private")]
    PrivateProfile,

    #[error("provider failure: {0}")]
    ProviderFailure(#[from] ProviderError),
}

impl AnalyzeError {
    /// The text shown to the user for this error.
    ///
    /// Provider details are never included.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalyzeError::EmptyInput => EMPTY_INPUT_MESSAGE,
            AnalyzeError::PrivateProfile => PRIVATE_PROFILE_MESSAGE,
            AnalyzeError::ProviderFailure(_) => PROVIDER_FAILURE_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(AnalyzeError::EmptyInput.user_message(), "Please enter a username.");
        assert_eq!(
            AnalyzeError::PrivateProfile.user_message(),
            "Cannot analyze a private profile."
        );
    }

    #[test]
    fn test_provider_detail_is_hidden() {
        let err = AnalyzeError::from(ProviderError::Status {
            status: 429,
            url: "https://www.instagram.com/api/v1/users/web_profile_info/".to_string(),
        });

        assert_eq!(
            err.user_message(),
            "Failed to fetch profile: An unexpected error occurred."
        );
        // Detail remains available for logging.
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_not_found_collapses_to_generic_message() {
        let err = AnalyzeError::from(ProviderError::NotFound {
            username: "ghost".to_string(),
        });
        assert_eq!(err.user_message(), PROVIDER_FAILURE_MESSAGE);
    }
}
