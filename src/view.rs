//! Server-rendered HTML for the analyzer page.
//!
//! The page is a pure function of [`SearchState`]: a search form followed by
//! exactly one [`Panel`]. While a lookup is loading the page asks the browser
//! to refresh itself, so results appear without any client-side script.

use crate::model::{EngagementPoint, Post, Profile, SearchState};

/// Seconds between automatic refreshes while a lookup is in flight.
const LOADING_REFRESH_SECS: u32 = 1;

/// Height of the engagement chart plot area, in pixels.
const CHART_HEIGHT_PX: u64 = 240;

/// The result area shown below the search form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel<'a> {
    Loading,
    Error(&'a str),
    Dashboard(&'a Profile),
    Empty,
}

impl<'a> Panel<'a> {
    /// Pick the panel for a state: loading, then error, then dashboard.
    pub fn from_state(state: &'a SearchState) -> Self {
        if state.is_loading {
            Panel::Loading
        } else if let Some(message) = &state.error_message {
            Panel::Error(message)
        } else if let Some(profile) = &state.profile {
            Panel::Dashboard(profile)
        } else {
            Panel::Empty
        }
    }
}

/// Render the full page for the current state.
pub fn render_page(state: &SearchState) -> String {
    let panel = Panel::from_state(state);

    let refresh = if panel == Panel::Loading {
        format!(
            r#"<meta http-equiv="refresh" content="{}">"#,
            LOADING_REFRESH_SECS
        )
    } else {
        String::new()
    };

    let body = match panel {
        Panel::Loading => render_loading(),
        Panel::Error(message) => render_error(message),
        Panel::Dashboard(profile) => render_dashboard(profile),
        Panel::Empty => String::from(r#"<div class="empty"></div>"#),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>Instagram Profile Analyzer</title>
<style>{style}</style>
</head>
<body>
<header class="brand">Influencer Analyzer</header>
<main>
{search}
{body}
</main>
</body>
</html>
"#,
        refresh = refresh,
        style = STYLE,
        search = render_search(),
        body = body,
    )
}

fn render_search() -> String {
    String::from(
        r#"<section class="search">
<h1>Instagram Profile Analyzer</h1>
<p class="subtitle">Get key insights on any public Instagram profile.</p>
<form method="post" action="/search">
<input type="text" name="username" placeholder="Enter Instagram username..." autocomplete="off">
<button type="submit">Analyze</button>
</form>
</section>"#,
    )
}

fn render_loading() -> String {
    let cards = r#"<div class="skeleton card"></div>"#.repeat(4);
    format!(
        r#"<section class="panel loading">
<div class="skeleton avatar"></div>
<div class="skeleton line wide"></div>
<div class="skeleton line"></div>
<div class="metrics">{}</div>
</section>"#,
        cards
    )
}

fn render_error(message: &str) -> String {
    format!(
        r#"<section class="panel error">
<h3>Analysis Failed</h3>
<p>{}</p>
</section>"#,
        escape_html(message)
    )
}

fn render_dashboard(profile: &Profile) -> String {
    let metrics = [
        ("Followers", escape_html(&profile.follower_count_display)),
        ("Following", escape_html(&profile.following_count_display)),
        ("Total Posts", profile.post_count.to_string()),
        (
            "Engagement Rate",
            format!("{}%", profile.engagement_rate_percent),
        ),
    ]
    .iter()
    .map(|(label, value)| metric_card(label, value))
    .collect::<String>();

    format!(
        r#"<section class="panel dashboard">
<div class="profile-header">
<img class="avatar" src="{picture}" alt="">
<div>
<h2>{username}</h2>
<p class="bio">{bio}</p>
</div>
</div>
<div class="metrics">{metrics}</div>
<div class="details">
<div class="chart-card">
<h3>Recent Engagement</h3>
<p class="averages">Avg. likes {avg_likes} &middot; Avg. comments {avg_comments}</p>
{chart}
</div>
<div class="gallery-card">
<h3>Recent Posts</h3>
<div class="gallery">{gallery}</div>
</div>
</div>
</section>"#,
        picture = escape_html(&profile.profile_picture_url),
        username = escape_html(&profile.username),
        bio = escape_html(&profile.bio),
        metrics = metrics,
        avg_likes = profile.average_likes,
        avg_comments = profile.average_comments,
        chart = render_chart(&profile.engagement_series),
        gallery = profile.recent_posts.iter().map(post_card).collect::<String>(),
    )
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="metric"><p class="label">{}</p><p class="value">{}</p></div>"#,
        label, value
    )
}

/// Bar chart with one likes bar and one comments bar per label, scaled to
/// the largest value in the series.
fn render_chart(series: &[EngagementPoint]) -> String {
    let max = series
        .iter()
        .map(|p| p.likes.max(p.comments))
        .max()
        .unwrap_or(0)
        .max(1);

    let groups = series
        .iter()
        .map(|point| {
            format!(
                r#"<div class="bar-group"><div class="bars"><div class="bar likes" style="height:{}px" title="Likes: {}"></div><div class="bar comments" style="height:{}px" title="Comments: {}"></div></div><span class="bar-label">{}</span></div>"#,
                bar_height(point.likes, max),
                point.likes,
                bar_height(point.comments, max),
                point.comments,
                escape_html(&point.label)
            )
        })
        .collect::<String>();

    format!(
        r#"<div class="chart" style="height:{}px">{}</div>
<div class="legend"><span class="key likes">Likes</span><span class="key comments">Comments</span></div>"#,
        CHART_HEIGHT_PX + 24,
        groups
    )
}

fn bar_height(value: u64, max: u64) -> u64 {
    value * CHART_HEIGHT_PX / max
}

fn post_card(post: &Post) -> String {
    format!(
        r#"<a class="post" href="{href}" target="_blank" rel="noopener noreferrer"><img src="{src}" alt="{alt}"><div class="post-stats"><span>&#9829; {likes}</span><span>&#128172; {comments}</span></div></a>"#,
        href = escape_html(&post.url()),
        src = escape_html(&post.display_url),
        alt = escape_html(&post.caption),
        likes = post.likes,
        comments = post.comments,
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body{font-family:Poppins,system-ui,sans-serif;background:#f9fafb;margin:0;color:#1f2937}
.brand{position:absolute;top:24px;left:24px;font-weight:700;color:#374151}
main{max-width:1024px;margin:0 auto;padding:96px 16px 32px;display:flex;flex-direction:column;align-items:center}
.search{text-align:center}
.subtitle{color:#6b7280;margin-bottom:32px}
form{display:flex;gap:16px}
input{width:360px;padding:16px;font-size:18px;border:2px solid #e5e7eb;border-radius:12px}
button{padding:16px 32px;background:#f97316;color:#fff;font-weight:600;border:0;border-radius:12px;cursor:pointer}
.panel{width:100%;margin-top:32px;padding:32px;border-radius:16px;box-sizing:border-box}
.error{background:#fef2f2;border:1px solid #fecaca;color:#dc2626;text-align:center}
.error h3{color:#991b1b}
.dashboard,.loading{background:#f9fafb;border:1px solid #e5e7eb}
.profile-header{display:flex;align-items:center;justify-content:center;gap:24px}
.avatar{width:96px;height:96px;border-radius:50%}
.bio{color:#4b5563;max-width:32rem}
.metrics{display:grid;grid-template-columns:repeat(4,1fr);gap:24px;margin-top:32px}
.metric{background:#fff;border:1px solid #f3f4f6;border-radius:16px;padding:24px}
.metric .label{font-size:14px;color:#6b7280}
.metric .value{font-size:24px;font-weight:600}
.details{display:grid;grid-template-columns:2fr 1fr;gap:24px;margin-top:24px}
.chart-card,.gallery-card{background:#fff;border:1px solid #f3f4f6;border-radius:16px;padding:24px}
.averages{font-size:14px;color:#6b7280}
.chart{display:flex;align-items:flex-end;gap:8px}
.bar-group{display:flex;flex-direction:column;align-items:center;flex:1}
.bars{display:flex;align-items:flex-end;gap:2px}
.bar{width:10px;border-radius:4px 4px 0 0}
.likes{background:#f97316}
.comments{background:#fb923c}
.bar-label{font-size:11px;color:#6b7280}
.legend .key{margin-right:12px;font-size:12px;padding:2px 6px;color:#fff;border-radius:4px}
.gallery{display:grid;grid-template-columns:repeat(3,1fr);gap:12px}
.post{display:block;border:1px solid #e5e7eb;border-radius:12px;overflow:hidden;text-decoration:none;color:#4b5563}
.post img{width:100%;height:128px;object-fit:cover}
.post-stats{display:flex;justify-content:space-between;padding:12px;font-size:14px;background:#f9fafb}
.skeleton{background:#e5e7eb;border-radius:8px}
.skeleton.avatar{border-radius:50%;margin:0 auto}
.skeleton.line{height:16px;width:320px;margin:16px auto 0}
.skeleton.line.wide{height:32px;width:192px}
.skeleton.card{height:144px;border-radius:16px}
"#;
