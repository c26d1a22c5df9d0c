//! Typed social-media embeds and the renderer that turns them into markup.

use thiserror::Error;
use url::Url;

/// Script that upgrades rendered blockquotes into live Instagram posts.
pub const INSTAGRAM_EMBED_SCRIPT: &str = "https://www.instagram.com/embed.js";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("Not an Instagram post permalink: {0}")]
    NotAPost(String),
}

/// A reference to third-party content, resolved only by [`render_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedRef {
    Instagram { kind: PostKind, code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Post,
    Reel,
    Tv,
}

impl PostKind {
    fn path_segment(self) -> &'static str {
        match self {
            PostKind::Post => "p",
            PostKind::Reel => "reel",
            PostKind::Tv => "tv",
        }
    }
}

impl EmbedRef {
    /// Parses `https://www.instagram.com/{p|reel|tv}/{code}/...`.
    pub fn instagram(raw: &str) -> Result<Self, EmbedError> {
        let url = Url::parse(raw.trim()).map_err(|_| EmbedError::InvalidUrl(raw.to_string()))?;

        let host_ok = matches!(url.host_str(), Some("instagram.com" | "www.instagram.com"));
        if !host_ok || !matches!(url.scheme(), "https" | "http") {
            return Err(EmbedError::NotAPost(raw.to_string()));
        }

        let mut segments = url
            .path_segments()
            .ok_or_else(|| EmbedError::NotAPost(raw.to_string()))?
            .filter(|s| !s.is_empty());

        let kind = match segments.next() {
            Some("p") => PostKind::Post,
            Some("reel") => PostKind::Reel,
            Some("tv") => PostKind::Tv,
            _ => return Err(EmbedError::NotAPost(raw.to_string())),
        };
        let code = segments
            .next()
            .filter(|code| code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .ok_or_else(|| EmbedError::NotAPost(raw.to_string()))?;

        Ok(EmbedRef::Instagram {
            kind,
            code: code.to_string(),
        })
    }

    /// Canonical permalink, without query string or tracking parameters.
    pub fn permalink(&self) -> String {
        match self {
            EmbedRef::Instagram { kind, code } => {
                format!("https://www.instagram.com/{}/{}/", kind.path_segment(), code)
            }
        }
    }
}

/// Renders the embed placeholder. Every interpolated value is escaped.
pub fn render_html(embed: &EmbedRef, caption: Option<&str>) -> String {
    match embed {
        EmbedRef::Instagram { .. } => {
            let permalink = escape_html(&embed.permalink());
            let label = escape_html(caption.unwrap_or("View this post on Instagram"));
            format!(
                r#"<blockquote class="instagram-media" data-instgrm-permalink="{permalink}" data-instgrm-version="14"><a href="{permalink}" target="_blank" rel="noopener noreferrer">{label}</a></blockquote>"#
            )
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
