//! Instagram client.
//!
//! Uses the same public web endpoints the Instagram website uses when a
//! logged-out visitor opens a profile page:
//!
//! - `GET /api/v1/users/web_profile_info/?username=…` for profile metadata
//!   and the first page of posts
//! - `GET /graphql/query/?query_hash=…&variables=…` for further pages
//!
//! Anonymous access is heavily rate limited. A `sessionid` cookie from a
//! logged-in browser can be supplied with [`InstagramClient::with_session`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{PostPage, ProfileProvider, RemotePost, RemoteProfile};
use crate::error::ProviderError;

/// Base URL for Instagram's web endpoints.
const INSTAGRAM_BASE: &str = "https://www.instagram.com";

/// App id the Instagram web client sends; the API rejects requests without it.
const WEB_APP_ID: &str = "936619743392459";

/// Persisted GraphQL query for a profile's timeline media.
const TIMELINE_QUERY_HASH: &str = "003056d32c2554def87228bc3fd9668a";

/// Posts requested per timeline page.
const PAGE_SIZE: u32 = 12;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Client for Instagram's public profile endpoints.
#[derive(Clone)]
pub struct InstagramClient {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl Default for InstagramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InstagramClient {
    /// Create a new anonymous client.
    pub fn new() -> Self {
        Self::with_base_url(INSTAGRAM_BASE)
    }

    /// Create a new client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: None,
        }
    }

    /// Attach a `sessionid` cookie to every request.
    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id.filter(|s| !s.is_empty());
        self
    }

    /// Build a request with the headers the web API expects.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header("x-ig-app-id", WEB_APP_ID)
            .header(reqwest::header::USER_AGENT, USER_AGENT);

        if let Some(session) = &self.session_id {
            req.header(reqwest::header::COOKIE, format!("sessionid={}", session))
        } else {
            req
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let response = self.build_request(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Fetch profile metadata and the first page of posts.
    pub async fn get_profile_info(&self, username: &str) -> Result<WebProfileInfo, ProviderError> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={}",
            self.base_url,
            urlencoding::encode(username)
        );

        debug!(username, "Requesting profile info");
        match self.get_json::<WebProfileInfoResponse>(&url).await {
            Ok(WebProfileInfoResponse {
                data: WebProfileInfoData { user: Some(user) },
            }) => Ok(user),
            Ok(_) | Err(ProviderError::Status { status: 404, .. }) => Err(ProviderError::NotFound {
                username: username.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Fetch one page of a user's timeline via GraphQL.
    pub async fn get_timeline_page(
        &self,
        user_id: &str,
        cursor: Option<&str>,
    ) -> Result<TimelineMedia, ProviderError> {
        let mut variables = serde_json::json!({ "id": user_id, "first": PAGE_SIZE });
        if let Some(after) = cursor {
            variables["after"] = serde_json::Value::String(after.to_string());
        }

        let url = format!(
            "{}/graphql/query/?query_hash={}&variables={}",
            self.base_url,
            TIMELINE_QUERY_HASH,
            urlencoding::encode(&variables.to_string())
        );

        debug!(user_id, cursor, "Requesting timeline page");
        let response = self.get_json::<TimelineResponse>(&url).await?;
        response
            .data
            .user
            .map(|u| u.edge_owner_to_timeline_media)
            .ok_or_else(|| ProviderError::Unexpected("timeline response has no user".to_string()))
    }
}

#[async_trait]
impl ProfileProvider for InstagramClient {
    async fn resolve_profile(&self, username: &str) -> Result<RemoteProfile, ProviderError> {
        let info = self.get_profile_info(username).await?;
        info.into_remote()
    }

    async fn fetch_posts(
        &self,
        profile: &RemoteProfile,
        cursor: Option<&str>,
    ) -> Result<PostPage, ProviderError> {
        let media = self.get_timeline_page(&profile.id, cursor).await?;
        media.into_page()
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct WebProfileInfoResponse {
    #[serde(default)]
    data: WebProfileInfoData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WebProfileInfoData {
    #[serde(default)]
    user: Option<WebProfileInfo>,
}

/// Profile section of the `web_profile_info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct WebProfileInfo {
    pub id: String,

    pub username: String,

    #[serde(default)]
    pub biography: Option<String>,

    #[serde(default)]
    pub profile_pic_url: String,

    /// High resolution picture; preferred when present.
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub edge_followed_by: EdgeCount,

    #[serde(default)]
    pub edge_follow: EdgeCount,

    /// Post count plus the newest posts. Omitted for private profiles.
    #[serde(default)]
    pub edge_owner_to_timeline_media: Option<TimelineMedia>,
}

impl WebProfileInfo {
    /// Convert to the provider-neutral profile.
    pub fn into_remote(self) -> Result<RemoteProfile, ProviderError> {
        let media_count = self
            .edge_owner_to_timeline_media
            .as_ref()
            .map(|m| m.count)
            .unwrap_or(0);

        // Private profiles never expose posts.
        let first_page = match self.edge_owner_to_timeline_media {
            Some(media) if !self.is_private => Some(media.into_page()?),
            _ => None,
        };

        Ok(RemoteProfile {
            id: self.id,
            username: self.username,
            bio: self.biography.unwrap_or_default(),
            profile_picture_url: self
                .profile_pic_url_hd
                .filter(|url| !url.is_empty())
                .unwrap_or(self.profile_pic_url),
            is_private: self.is_private,
            follower_count: self.edge_followed_by.count,
            followee_count: self.edge_follow.count,
            media_count,
            first_page,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: TimelineData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TimelineData {
    #[serde(default)]
    user: Option<TimelineUser>,
}

#[derive(Debug, Clone, Deserialize)]
struct TimelineUser {
    edge_owner_to_timeline_media: TimelineMedia,
}

/// A `{ "count": n }` edge.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EdgeCount {
    #[serde(default)]
    pub count: u64,
}

/// A page of timeline media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineMedia {
    /// Total number of posts on the profile.
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub page_info: PageInfo,

    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

impl TimelineMedia {
    /// Convert to a provider-neutral page.
    pub fn into_page(self) -> Result<PostPage, ProviderError> {
        let next_cursor = if self.page_info.has_next_page {
            self.page_info.end_cursor.filter(|c| !c.is_empty())
        } else {
            None
        };

        let posts = self
            .edges
            .into_iter()
            .map(|edge| edge.node.into_post())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PostPage { posts, next_cursor })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaEdge {
    pub node: MediaNode,
}

/// A single post in a timeline page.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaNode {
    pub shortcode: String,

    #[serde(default)]
    pub display_url: String,

    #[serde(default)]
    pub edge_liked_by: Option<EdgeCount>,

    /// Like count shown in previews; used when `edge_liked_by` is absent.
    #[serde(default)]
    pub edge_media_preview_like: Option<EdgeCount>,

    #[serde(default)]
    pub edge_media_to_comment: EdgeCount,

    #[serde(default)]
    pub edge_media_to_caption: CaptionEdges,

    /// Unix timestamp (UTC).
    pub taken_at_timestamp: i64,
}

impl MediaNode {
    pub fn likes(&self) -> u64 {
        self.edge_liked_by
            .or(self.edge_media_preview_like)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn caption(&self) -> Option<&str> {
        self.edge_media_to_caption
            .edges
            .first()
            .map(|e| e.node.text.as_str())
    }

    fn into_post(self) -> Result<RemotePost, ProviderError> {
        let taken_at = DateTime::<Utc>::from_timestamp(self.taken_at_timestamp, 0).ok_or_else(|| {
            ProviderError::Unexpected(format!(
                "post {} has invalid timestamp {}",
                self.shortcode, self.taken_at_timestamp
            ))
        })?;

        Ok(RemotePost {
            likes: self.likes(),
            comments: self.edge_media_to_comment.count,
            caption: self.caption().map(str::to_string),
            shortcode: self.shortcode,
            display_url: self.display_url,
            taken_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionNode {
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_json(is_private: bool) -> serde_json::Value {
        json!({
            "id": "25025320",
            "username": "natgeo",
            "biography": "Experience the world",
            "profile_pic_url": "https://cdn.example/small.jpg",
            "profile_pic_url_hd": "https://cdn.example/hd.jpg",
            "is_private": is_private,
            "edge_followed_by": { "count": 283_000_000u64 },
            "edge_follow": { "count": 150 },
            "edge_owner_to_timeline_media": {
                "count": 30000,
                "page_info": { "has_next_page": true, "end_cursor": "QVFD" },
                "edges": [
                    {
                        "node": {
                            "shortcode": "C1",
                            "display_url": "https://cdn.example/c1.jpg",
                            "edge_liked_by": { "count": 1200 },
                            "edge_media_to_comment": { "count": 34 },
                            "edge_media_to_caption": {
                                "edges": [ { "node": { "text": "Sunrise" } } ]
                            },
                            "taken_at_timestamp": 1_704_412_800
                        }
                    },
                    {
                        "node": {
                            "shortcode": "C2",
                            "display_url": "https://cdn.example/c2.jpg",
                            "edge_media_preview_like": { "count": 900 },
                            "edge_media_to_comment": { "count": 12 },
                            "edge_media_to_caption": { "edges": [] },
                            "taken_at_timestamp": 1_704_326_400
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_profile_info_into_remote() {
        let info: WebProfileInfo = serde_json::from_value(profile_json(false)).unwrap();
        let remote = info.into_remote().unwrap();

        assert_eq!(remote.id, "25025320");
        assert_eq!(remote.profile_picture_url, "https://cdn.example/hd.jpg");
        assert_eq!(remote.follower_count, 283_000_000);
        assert_eq!(remote.followee_count, 150);
        assert_eq!(remote.media_count, 30000);

        let page = remote.first_page.unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("QVFD"));
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].likes, 1200);
        assert_eq!(page.posts[0].caption.as_deref(), Some("Sunrise"));
        assert_eq!(page.posts[1].likes, 900);
        assert_eq!(page.posts[1].caption, None);
        assert_eq!(page.posts[1].taken_at.timestamp(), 1_704_326_400);
    }

    #[test]
    fn test_private_profile_has_no_first_page() {
        let info: WebProfileInfo = serde_json::from_value(profile_json(true)).unwrap();
        let remote = info.into_remote().unwrap();

        assert!(remote.is_private);
        assert!(remote.first_page.is_none());
        assert_eq!(remote.media_count, 30000);
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let media: TimelineMedia = serde_json::from_value(json!({
            "count": 1,
            "page_info": { "has_next_page": false, "end_cursor": "ignored" },
            "edges": []
        }))
        .unwrap();

        let page = media.into_page().unwrap();
        assert!(page.posts.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_missing_user_deserializes_as_none() {
        let response: WebProfileInfoResponse =
            serde_json::from_value(json!({ "data": { "user": null }, "status": "ok" })).unwrap();
        assert!(response.data.user.is_none());
    }

    #[test]
    fn test_with_session_ignores_empty_value() {
        let client = InstagramClient::with_base_url("http://localhost/").with_session(Some(String::new()));
        assert!(client.session_id.is_none());
        assert_eq!(client.base_url, "http://localhost");
    }
}
