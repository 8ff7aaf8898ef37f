//! In-memory provider shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use influencer_analyzer::error::ProviderError;
use influencer_analyzer::provider::{PostPage, ProfileProvider, RemotePost, RemoteProfile};

/// Newest post timestamp: 2024-01-05 12:00:00 UTC.
pub const NEWEST_POST_TS: i64 = 1_704_456_000;

/// A canned profile. Posts are listed newest first as (likes, comments).
#[derive(Debug, Clone, Default)]
pub struct FakeProfile {
    pub is_private: bool,
    pub followers: u64,
    pub following: u64,
    pub posts: Vec<(u64, u64)>,
}

/// Serves canned profiles in pages of `page_size` posts.
///
/// Unknown usernames resolve to `NotFound`; "broken" fails with a status error.
pub struct FakeProvider {
    profiles: HashMap<String, FakeProfile>,
    page_size: usize,
    pub resolve_requests: AtomicUsize,
    pub post_requests: AtomicUsize,
}

impl FakeProvider {
    pub fn new(page_size: usize) -> Self {
        Self {
            profiles: HashMap::new(),
            page_size,
            resolve_requests: AtomicUsize::new(0),
            post_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_profile(mut self, username: &str, profile: FakeProfile) -> Self {
        self.profiles.insert(username.to_string(), profile);
        self
    }

    pub fn resolve_requests(&self) -> usize {
        self.resolve_requests.load(Ordering::SeqCst)
    }

    pub fn post_requests(&self) -> usize {
        self.post_requests.load(Ordering::SeqCst)
    }
}

fn fake_post(index: usize, likes: u64, comments: u64) -> RemotePost {
    RemotePost {
        shortcode: format!("post{}", index),
        display_url: format!("https://cdn.example/post{}.jpg", index),
        likes,
        comments,
        caption: (index % 2 == 0).then(|| format!("Caption {}", index)),
        taken_at: DateTime::<Utc>::from_timestamp(NEWEST_POST_TS - index as i64 * 86_400, 0)
            .unwrap(),
    }
}

#[async_trait]
impl ProfileProvider for FakeProvider {
    async fn resolve_profile(&self, username: &str) -> Result<RemoteProfile, ProviderError> {
        self.resolve_requests.fetch_add(1, Ordering::SeqCst);

        if username == "broken" {
            return Err(ProviderError::Status {
                status: 500,
                url: "https://fake.example/profile".to_string(),
            });
        }

        let profile = self
            .profiles
            .get(username)
            .ok_or_else(|| ProviderError::NotFound {
                username: username.to_string(),
            })?;

        Ok(RemoteProfile {
            id: username.to_string(),
            username: username.to_string(),
            bio: format!("Bio of {}", username),
            profile_picture_url: format!("https://cdn.example/{}.jpg", username),
            is_private: profile.is_private,
            follower_count: profile.followers,
            followee_count: profile.following,
            media_count: profile.posts.len() as u64,
            first_page: None,
        })
    }

    async fn fetch_posts(
        &self,
        profile: &RemoteProfile,
        cursor: Option<&str>,
    ) -> Result<PostPage, ProviderError> {
        self.post_requests.fetch_add(1, Ordering::SeqCst);

        let posts = &self.profiles[&profile.id].posts;
        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|e| ProviderError::Unexpected(e.to_string()))?,
            None => 0,
        };
        let end = (start + self.page_size).min(posts.len());

        Ok(PostPage {
            posts: (start..end)
                .map(|i| fake_post(i, posts[i].0, posts[i].1))
                .collect(),
            next_cursor: (end < posts.len()).then(|| end.to_string()),
        })
    }
}
