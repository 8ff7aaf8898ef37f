//! Fetch-and-aggregate logic for profile analysis.
//!
//! All metrics are computed over the sampled window only: the newest
//! [`SAMPLE_LIMIT`] posts. The engagement rate is therefore a point-in-time
//! estimate, not a figure over the profile's full history.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::error::{AnalyzeError, ProviderError};
use crate::format::abbreviate;
use crate::model::{EngagementPoint, Post, Profile};
use crate::provider::{PostStream, ProfileProvider, RemotePost};

/// Maximum number of posts sampled per profile.
pub const SAMPLE_LIMIT: usize = 12;

/// Aggregates over a sampled window of posts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementSummary {
    pub sample_count: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_likes: u64,
    pub average_comments: u64,
    pub engagement_rate_percent: f64,
}

impl EngagementSummary {
    /// Compute averages and engagement rate for the given posts.
    ///
    /// Averages are floor-truncated and zero for an empty sample. The rate is
    /// zero unless there is at least one post and one follower.
    pub fn from_posts(posts: &[Post], follower_count: u64) -> Self {
        let sample_count = posts.len() as u64;
        let total_likes: u64 = posts.iter().map(|p| p.likes).sum();
        let total_comments: u64 = posts.iter().map(|p| p.comments).sum();

        let (average_likes, average_comments) = if sample_count > 0 {
            (total_likes / sample_count, total_comments / sample_count)
        } else {
            (0, 0)
        };

        Self {
            sample_count,
            total_likes,
            total_comments,
            average_likes,
            average_comments,
            engagement_rate_percent: engagement_rate(
                total_likes,
                total_comments,
                sample_count,
                follower_count,
            ),
        }
    }
}

/// Average interactions per post as a percentage of followers, rounded to
/// two decimals.
pub fn engagement_rate(
    total_likes: u64,
    total_comments: u64,
    sample_count: u64,
    follower_count: u64,
) -> f64 {
    if sample_count == 0 || follower_count == 0 {
        return 0.0;
    }

    let interactions = (total_likes + total_comments) as f64;
    round2(interactions / sample_count as f64 / follower_count as f64 * 100.0)
}

/// Round to two decimals from the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Chart label for a post date, e.g. "Jan 05".
pub fn date_label(taken_at: DateTime<Utc>) -> String {
    taken_at.format("%b %d").to_string()
}

/// Take up to `limit` posts from the front of the stream.
pub async fn sample_posts(
    stream: &mut PostStream<'_>,
    limit: usize,
) -> Result<Vec<RemotePost>, ProviderError> {
    let mut sampled = Vec::with_capacity(limit);
    while sampled.len() < limit {
        match stream.next().await? {
            Some(post) => sampled.push(post),
            None => break,
        }
    }
    Ok(sampled)
}

/// Look up a profile and build its [`Profile`] summary.
///
/// Private profiles are rejected before any posts are requested.
#[instrument(skip(provider))]
pub async fn analyze_profile(
    provider: &dyn ProfileProvider,
    username: &str,
) -> Result<Profile, AnalyzeError> {
    let remote = provider.resolve_profile(username).await?;

    if remote.is_private {
        return Err(AnalyzeError::PrivateProfile);
    }

    let mut stream = PostStream::new(provider, &remote);
    let sampled = sample_posts(&mut stream, SAMPLE_LIMIT).await?;

    let mut recent_posts = Vec::with_capacity(sampled.len());
    let mut engagement_series = Vec::with_capacity(sampled.len());

    for post in sampled {
        engagement_series.push(EngagementPoint {
            label: date_label(post.taken_at),
            likes: post.likes,
            comments: post.comments,
        });
        recent_posts.push(Post {
            shortcode: post.shortcode,
            display_url: post.display_url,
            likes: post.likes,
            comments: post.comments,
            caption: post.caption.unwrap_or_default(),
            timestamp: post.taken_at.timestamp(),
        });
    }

    // Oldest first for charting; the gallery keeps newest first.
    engagement_series.reverse();

    let summary = EngagementSummary::from_posts(&recent_posts, remote.follower_count);

    debug!(
        username = %remote.username,
        sample_count = summary.sample_count,
        engagement_rate = summary.engagement_rate_percent,
        "Profile analyzed"
    );

    Ok(Profile {
        username: remote.username,
        bio: remote.bio,
        profile_picture_url: remote.profile_picture_url,
        is_private: remote.is_private,
        follower_count_display: abbreviate(remote.follower_count),
        following_count_display: abbreviate(remote.followee_count),
        post_count: remote.media_count,
        engagement_rate_percent: summary.engagement_rate_percent,
        average_likes: summary.average_likes,
        average_comments: summary.average_comments,
        recent_posts,
        engagement_series,
    })
}
