//! Profile providers.
//!
//! A provider knows how to resolve a username into profile metadata and how to
//! page through that profile's posts, newest first. Everything else in the
//! crate talks to providers only through [`ProfileProvider`].
//!
//! # Providers
//!
//! - [`instagram`]: Instagram's public web endpoints

pub mod instagram;

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;

pub use instagram::InstagramClient;

/// Profile metadata as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteProfile {
    /// Provider-internal id used for paging.
    pub id: String,
    pub username: String,
    pub bio: String,
    pub profile_picture_url: String,
    pub is_private: bool,
    pub follower_count: u64,
    pub followee_count: u64,
    pub media_count: u64,

    /// Posts delivered together with the profile lookup, if any.
    pub first_page: Option<PostPage>,
}

/// A single post as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePost {
    pub shortcode: String,
    pub display_url: String,
    pub likes: u64,
    pub comments: u64,
    pub caption: Option<String>,
    pub taken_at: DateTime<Utc>,
}

/// One page of posts plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    pub posts: Vec<RemotePost>,

    /// `None` once the last page has been delivered.
    pub next_cursor: Option<String>,
}

/// Source of profile and post data.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Look up profile metadata for a username.
    ///
    /// Returns [`ProviderError::NotFound`] when the profile does not exist.
    async fn resolve_profile(&self, username: &str) -> Result<RemoteProfile, ProviderError>;

    /// Fetch a page of posts, newest first.
    ///
    /// `cursor` is `None` for the first page and otherwise the
    /// [`PostPage::next_cursor`] of the previous page.
    async fn fetch_posts(
        &self,
        profile: &RemoteProfile,
        cursor: Option<&str>,
    ) -> Result<PostPage, ProviderError>;
}

/// Lazy, newest-first sequence of a profile's posts.
///
/// Pages are requested only when the buffered posts run out, so taking a
/// short prefix never touches more pages than needed. Creating a new stream
/// starts again from the newest post.
pub struct PostStream<'a> {
    provider: &'a dyn ProfileProvider,
    profile: &'a RemoteProfile,
    buffer: VecDeque<RemotePost>,
    cursor: Option<String>,
    exhausted: bool,
}

impl<'a> PostStream<'a> {
    pub fn new(provider: &'a dyn ProfileProvider, profile: &'a RemoteProfile) -> Self {
        let mut stream = Self {
            provider,
            profile,
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
        };

        if let Some(page) = &profile.first_page {
            stream.accept(page.clone());
        }

        stream
    }

    /// Next post, or `None` once the profile has no more posts.
    pub async fn next(&mut self) -> Result<Option<RemotePost>, ProviderError> {
        loop {
            if let Some(post) = self.buffer.pop_front() {
                return Ok(Some(post));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .provider
                .fetch_posts(self.profile, self.cursor.as_deref())
                .await?;
            self.accept(page);
        }
    }

    fn accept(&mut self, page: PostPage) {
        // An empty page ends the stream even if a cursor came back with it.
        self.exhausted = page.posts.is_empty() || page.next_cursor.is_none();
        self.cursor = page.next_cursor;
        self.buffer.extend(page.posts);
    }
}
