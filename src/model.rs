//! Data models for the analyzer.
//!
//! A [`Profile`] is produced once per successful lookup and never mutated
//! afterwards; the next lookup replaces it wholesale. [`SearchState`] is the
//! single source of truth that the controller writes and the view reads.

use serde::{Deserialize, Serialize};

/// Base URL used to link gallery cards back to the original post.
const POST_URL_BASE: &str = "https://instagram.com/p";

/// A single post captured from the sampled window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Short identifier used in the public post URL.
    pub shortcode: String,

    /// URL of the post image (or video thumbnail).
    pub display_url: String,

    pub likes: u64,

    pub comments: u64,

    /// Caption text; empty when the post has none.
    pub caption: String,

    /// When the post was published (Unix timestamp, UTC).
    pub timestamp: i64,
}

impl Post {
    /// Public link to this post.
    pub fn url(&self) -> String {
        Profile::post_url(&self.shortcode)
    }
}

/// One bar group in the engagement chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementPoint {
    /// Short date label such as "Jan 05".
    pub label: String,
    pub likes: u64,
    pub comments: u64,
}

/// Aggregated view of a public profile and its recent posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,

    pub bio: String,

    pub profile_picture_url: String,

    pub is_private: bool,

    /// Abbreviated follower count (e.g. "12.3K"). The raw count is not kept.
    pub follower_count_display: String,

    /// Abbreviated following count.
    pub following_count_display: String,

    /// Total posts on the remote profile, not just the sampled window.
    pub post_count: u64,

    /// Average interactions per sampled post relative to followers, in percent,
    /// rounded to two decimals. Zero when there are no posts or no followers.
    pub engagement_rate_percent: f64,

    pub average_likes: u64,

    pub average_comments: u64,

    /// Sampled posts, newest first.
    pub recent_posts: Vec<Post>,

    /// Chart series for the sampled posts, oldest first.
    pub engagement_series: Vec<EngagementPoint>,
}

impl Profile {
    /// Public link for a post shortcode.
    pub fn post_url(shortcode: &str) -> String {
        format!("{}/{}", POST_URL_BASE, shortcode)
    }
}

/// Which of the mutually exclusive screens applies to a [`SearchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing submitted yet (or the last submit was rejected before any result).
    Idle,
    /// A lookup is in flight.
    Loading,
    /// The last lookup (or submit) failed.
    Error,
    /// A profile is available.
    Success,
}

/// Session state shared by the controller and the view.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Last submitted (trimmed) username.
    pub query: String,

    pub is_loading: bool,

    /// User-facing error message; cleared when a new lookup starts.
    pub error_message: Option<String>,

    /// Result of the last successful lookup; cleared when a new lookup starts.
    pub profile: Option<Profile>,

    /// Id of the newest lookup that entered the loading state.
    pub(crate) generation: u64,
}

impl SearchState {
    /// Derive the current phase.
    ///
    /// Loading wins over everything, then an error, then a profile.
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error_message.is_some() {
            Phase::Error
        } else if self.profile.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

/// Form body for `POST /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub username: String,
}

/// JSON body for `POST /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub username: String,
}

/// Snapshot of [`SearchState`] returned by the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub query: String,
    pub phase: Phase,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub profile: Option<Profile>,
}

impl From<&SearchState> for StateResponse {
    fn from(state: &SearchState) -> Self {
        Self {
            query: state.query.clone(),
            phase: state.phase(),
            is_loading: state.is_loading,
            error_message: state.error_message.clone(),
            profile: state.profile.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_profile() -> Profile {
        Profile {
            username: "someone".to_string(),
            bio: String::new(),
            profile_picture_url: String::new(),
            is_private: false,
            follower_count_display: "0".to_string(),
            following_count_display: "0".to_string(),
            post_count: 0,
            engagement_rate_percent: 0.0,
            average_likes: 0,
            average_comments: 0,
            recent_posts: vec![],
            engagement_series: vec![],
        }
    }

    #[test]
    fn test_phase_idle_by_default() {
        assert_eq!(SearchState::default().phase(), Phase::Idle);
    }

    #[test]
    fn test_phase_loading_wins() {
        let state = SearchState {
            is_loading: true,
            error_message: Some("boom".to_string()),
            ..Default::default()
        };
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn test_phase_error_before_success() {
        let state = SearchState {
            error_message: Some("Please enter a username.".to_string()),
            profile: Some(empty_profile()),
            ..Default::default()
        };
        assert_eq!(state.phase(), Phase::Error);
    }

    #[test]
    fn test_phase_success() {
        let state = SearchState {
            profile: Some(empty_profile()),
            ..Default::default()
        };
        assert_eq!(state.phase(), Phase::Success);
    }

    #[test]
    fn test_post_url() {
        assert_eq!(Profile::post_url("CxYz123"), "https://instagram.com/p/CxYz123");
    }

    #[test]
    fn test_state_response_serializes_phase_lowercase() {
        let state = SearchState {
            query: "someone".to_string(),
            is_loading: true,
            ..Default::default()
        };
        let json = serde_json::to_value(StateResponse::from(&state)).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["query"], "someone");
        assert!(json["profile"].is_null());
    }
}
