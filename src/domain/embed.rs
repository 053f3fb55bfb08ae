//! Embed URL normalization for known video platforms

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const NICOVIDEO_EMBED: &str = "https://embed.nicovideo.jp/watch/";

/// Rewrite a user-facing video URL into its iframe-embeddable form.
///
/// The first matching rule wins; URLs from unknown hosts are returned
/// unchanged.
///
/// ```
/// use t2press::domain::embed::normalize_embed_url;
///
/// assert_eq!(
///     normalize_embed_url("https://youtu.be/abc123"),
///     "https://www.youtube.com/embed/abc123"
/// );
/// ```
pub fn normalize_embed_url(url: &str) -> String {
    if url.contains("youtu.be") {
        return format!("{}{}", YOUTUBE_EMBED, last_path_segment(url));
    }

    if url.contains("youtube.com/watch?v=") {
        if let Some((_, query)) = url.split_once("v=") {
            let id = query.split('&').next().unwrap_or(query);
            return format!("{}{}", YOUTUBE_EMBED, id);
        }
    }

    if url.contains("nicovideo.jp/watch/") {
        return format!("{}{}", NICOVIDEO_EMBED, last_path_segment(url));
    }

    url.to_string()
}

/// Whether a (normalized) URL belongs to a platform that must be embedded
/// with an iframe rather than a native video element
pub fn is_video_platform(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("nicovideo.jp")
}

fn last_path_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}
