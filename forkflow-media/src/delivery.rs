//! Delivery URL derivation for the asset CDN
//!
//! Recognized hosts get their path or query rewritten to request optimized
//! variants. Any other URL is passed through unchanged and has no blurred
//! placeholder.

use forkflow_core::MediaKind;

/// Bounded width for inline display
pub const INLINE_WIDTH: u32 = 1200;
/// Width used for explicit video posters
pub const POSTER_WIDTH: u32 = 800;

const UPLOAD_SEGMENT: &str = "/upload/";
const PLACEHOLDER_TRANSFORM: &str = "q_10,f_auto,w_50,e_blur:500";
const LIGHTBOX_IMAGE_TRANSFORM: &str = "w_2560,c_limit,f_auto,q_auto";
const VIDEO_TRANSFORM: &str = "f_auto,q_auto,vc_auto";
const IMGIX_PLACEHOLDER_QUERY: &str = "w=50&blur=100&q=10";

/// Asset hosts whose URL conventions are understood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetHost {
    /// Path-segment transformations after `/upload/`
    Cloudinary,
    /// Query-string parameters
    Imgix,
    /// Anything else; never rewritten
    Opaque,
}

impl AssetHost {
    pub fn detect(url: &str) -> Self {
        if url.contains("cloudinary.com") {
            AssetHost::Cloudinary
        } else if url.contains("imgix.net") {
            AssetHost::Imgix
        } else {
            AssetHost::Opaque
        }
    }
}

/// Image optimization request
#[derive(Debug, Clone)]
pub struct ImageTransform {
    pub width: u32,
    pub quality: String,
    pub format: String,
}

impl ImageTransform {
    pub fn with_width(width: u32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            width: INLINE_WIDTH,
            quality: "auto".to_string(),
            format: "auto".to_string(),
        }
    }
}

fn rewrite_upload(url: &str, transform: &str) -> String {
    url.replacen(UPLOAD_SEGMENT, &format!("/upload/{transform}/"), 1)
}

fn append_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// Inline image URL: bounded width with automatic format and quality
pub fn optimized_image_url(url: &str, transform: &ImageTransform) -> String {
    match AssetHost::detect(url) {
        AssetHost::Cloudinary => rewrite_upload(
            url,
            &format!(
                "q_{},f_{},w_{}",
                transform.quality, transform.format, transform.width
            ),
        ),
        AssetHost::Imgix => append_query(
            url,
            &format!("auto=format,compress&w={}&q=75", transform.width),
        ),
        AssetHost::Opaque => url.to_string(),
    }
}

/// Inline video URL: automatic container, quality and codec
pub fn optimized_video_url(url: &str, width: Option<u32>) -> String {
    match AssetHost::detect(url) {
        AssetHost::Cloudinary => {
            let transform = match width {
                Some(width) => format!("{VIDEO_TRANSFORM},w_{width}"),
                None => VIDEO_TRANSFORM.to_string(),
            };
            rewrite_upload(url, &transform)
        }
        AssetHost::Imgix | AssetHost::Opaque => url.to_string(),
    }
}

/// Tiny blurred image shown while the optimized asset loads
pub fn placeholder_url(url: &str) -> Option<String> {
    match AssetHost::detect(url) {
        AssetHost::Cloudinary => Some(rewrite_upload(url, PLACEHOLDER_TRANSFORM)),
        AssetHost::Imgix => Some(append_query(url, IMGIX_PLACEHOLDER_QUERY)),
        AssetHost::Opaque => None,
    }
}

/// Higher-resolution variant for the lightbox
pub fn lightbox_url(url: &str) -> String {
    match AssetHost::detect(url) {
        AssetHost::Cloudinary if MediaKind::from_url(Some(url)).is_video() => {
            rewrite_upload(url, VIDEO_TRANSFORM)
        }
        AssetHost::Cloudinary => rewrite_upload(url, LIGHTBOX_IMAGE_TRANSFORM),
        AssetHost::Imgix | AssetHost::Opaque => url.to_string(),
    }
}

/// Every URL derived from one raw media URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryUrls {
    pub kind: MediaKind,
    /// Optimized URL for inline display
    pub inline: String,
    /// Higher-resolution URL for the lightbox
    pub lightbox: String,
    /// Blurred placeholder, only for recognized hosts
    pub placeholder: Option<String>,
}

impl DeliveryUrls {
    /// Derives the delivery URLs; `None` when there is no URL to derive from
    pub fn derive(url: Option<&str>) -> Option<Self> {
        let kind = MediaKind::from_url(url);
        let url = match (kind, url) {
            (MediaKind::Placeholder, _) | (_, None) => return None,
            (_, Some(url)) => url,
        };

        let inline = if kind.is_video() {
            optimized_video_url(url, None)
        } else {
            optimized_image_url(url, &ImageTransform::default())
        };

        Some(Self {
            kind,
            inline,
            lightbox: lightbox_url(url),
            placeholder: placeholder_url(url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLD_IMAGE: &str = "https://res.cloudinary.com/demo/image/upload/v1/Stage_1/shot.png";
    const CLD_VIDEO: &str = "https://res.cloudinary.com/demo/video/upload/v1/Stage_6/turn.mp4";
    const IMGIX_IMAGE: &str = "https://studio.imgix.net/stage1/shot.jpg";

    #[test]
    fn test_host_detection() {
        assert_eq!(AssetHost::detect(CLD_IMAGE), AssetHost::Cloudinary);
        assert_eq!(AssetHost::detect(IMGIX_IMAGE), AssetHost::Imgix);
        assert_eq!(AssetHost::detect("https://example.com/a.png"), AssetHost::Opaque);
    }

    #[test]
    fn test_cloudinary_image_urls() {
        assert_eq!(
            optimized_image_url(CLD_IMAGE, &ImageTransform::default()),
            "https://res.cloudinary.com/demo/image/upload/q_auto,f_auto,w_1200/v1/Stage_1/shot.png"
        );
        assert_eq!(
            lightbox_url(CLD_IMAGE),
            "https://res.cloudinary.com/demo/image/upload/w_2560,c_limit,f_auto,q_auto/v1/Stage_1/shot.png"
        );
        assert_eq!(
            placeholder_url(CLD_IMAGE).as_deref(),
            Some("https://res.cloudinary.com/demo/image/upload/q_10,f_auto,w_50,e_blur:500/v1/Stage_1/shot.png")
        );
    }

    #[test]
    fn test_cloudinary_video_urls() {
        assert_eq!(
            optimized_video_url(CLD_VIDEO, None),
            "https://res.cloudinary.com/demo/video/upload/f_auto,q_auto,vc_auto/v1/Stage_6/turn.mp4"
        );
        assert_eq!(
            optimized_video_url(CLD_VIDEO, Some(640)),
            "https://res.cloudinary.com/demo/video/upload/f_auto,q_auto,vc_auto,w_640/v1/Stage_6/turn.mp4"
        );
        assert_eq!(lightbox_url(CLD_VIDEO), optimized_video_url(CLD_VIDEO, None));
    }

    #[test]
    fn test_only_first_upload_segment_is_rewritten() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1/upload/shot.png";
        assert_eq!(
            placeholder_url(url).as_deref(),
            Some("https://res.cloudinary.com/demo/image/upload/q_10,f_auto,w_50,e_blur:500/v1/upload/shot.png")
        );
    }

    #[test]
    fn test_imgix_urls() {
        assert_eq!(
            optimized_image_url(IMGIX_IMAGE, &ImageTransform::with_width(800)),
            "https://studio.imgix.net/stage1/shot.jpg?auto=format,compress&w=800&q=75"
        );
        assert_eq!(
            placeholder_url("https://studio.imgix.net/a.jpg?v=2").as_deref(),
            Some("https://studio.imgix.net/a.jpg?v=2&w=50&blur=100&q=10")
        );
        assert_eq!(lightbox_url(IMGIX_IMAGE), IMGIX_IMAGE);
    }

    #[test]
    fn test_opaque_urls_pass_through() {
        let url = "https://example.com/media/a.png";
        let urls = DeliveryUrls::derive(Some(url)).unwrap();
        assert_eq!(urls.inline, url);
        assert_eq!(urls.lightbox, url);
        assert_eq!(urls.placeholder, None);
    }

    #[test]
    fn test_derive_absent_url() {
        assert!(DeliveryUrls::derive(None).is_none());
        assert!(DeliveryUrls::derive(Some("")).is_none());
    }

    #[test]
    fn test_derive_video_uses_video_transform() {
        let urls = DeliveryUrls::derive(Some(CLD_VIDEO)).unwrap();
        assert_eq!(urls.kind, MediaKind::Video);
        assert!(urls.inline.contains("/upload/f_auto,q_auto,vc_auto/"));
    }
}
