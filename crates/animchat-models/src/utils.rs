//! Utility functions for URL classification.

use url::Url;

/// Hosts of the render backends; any URL on them is treated as a video.
const RENDER_BACKEND_HOSTS: &[&str] = &["railway.app", "ffmpeg-backend"];

/// Media CDN host whose video assets are recognised by path.
const MEDIA_CDN_HOST: &str = "cloudinary.com";

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov"];

/// Check whether `text` denotes a playable remote video.
///
/// This is a hostname/path heuristic and never fetches the resource.
/// Returns false for anything that does not parse as an absolute URL.
pub fn is_video_url(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(text) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    if RENDER_BACKEND_HOSTS.iter().any(|h| host.contains(h)) {
        return true;
    }

    if host.contains(MEDIA_CDN_HOST) {
        let path = url.path().to_ascii_lowercase();
        return VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) || path.contains("/video/");
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_urls_are_rejected() {
        assert!(!is_video_url(""));
        assert!(!is_video_url("   "));
        assert!(!is_video_url("explain the quadratic formula"));
        assert!(!is_video_url("res.cloudinary.com/demo/video/upload/a.mp4"));
        assert!(!is_video_url("http://"));
        assert!(!is_video_url("mailto:someone@railway.app"));
    }

    #[test]
    fn test_cloudinary_video_paths() {
        assert!(is_video_url(
            "https://res.cloudinary.com/demo/video/upload/v1/sample.mp4"
        ));
        assert!(is_video_url("https://res.cloudinary.com/demo/raw/upload/clip.WEBM"));
        assert!(is_video_url("https://res.cloudinary.com/demo/raw/upload/clip.mov"));
        assert!(is_video_url("https://res.cloudinary.com/demo/video/upload/v1/sample"));
    }

    #[test]
    fn test_cloudinary_non_video_paths() {
        assert!(!is_video_url(
            "https://res.cloudinary.com/demo/image/upload/sample.jpg"
        ));
        assert!(!is_video_url("https://res.cloudinary.com/"));
    }

    #[test]
    fn test_render_backend_hosts() {
        assert!(is_video_url("https://manim-renderer.up.railway.app/files/abc"));
        assert!(is_video_url("http://ffmpeg-backend.internal:8080/merged"));
    }

    #[test]
    fn test_unknown_hosts() {
        assert!(!is_video_url("https://example.com/video/clip.mp4"));
        assert!(!is_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }
}
