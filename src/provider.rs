//! Per-provider request shape.
//!
//! GitHub and Gitee expose the same "repository contents" read with small
//! differences: URL layout, where the token goes, and whether a missing
//! `encoding` tag means base64. Everything else about a fetch is shared.

use crate::models::{AuthStyle, ProviderConfig, ProviderKind};
use crate::traits::Headers;

/// Sent with every request; the GitHub API rejects requests without one.
pub const USER_AGENT: &str = concat!("codefetch/", env!("CARGO_PKG_VERSION"));

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Static capabilities of a provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub default_base: &'static str,
    /// Path template with `{repo}` and `{path}` placeholders
    pub path_template: &'static str,
    pub default_auth: AuthStyle,
    /// Whether an empty `encoding` field is read as base64
    pub empty_encoding_is_base64: bool,
    pub accept: Option<&'static str>,
}

impl ProviderProfile {
    pub fn for_kind(kind: ProviderKind) -> &'static ProviderProfile {
        match kind {
            ProviderKind::GitHub => &GITHUB,
            ProviderKind::Gitee => &GITEE,
        }
    }
}

static GITHUB: ProviderProfile = ProviderProfile {
    default_base: "https://api.github.com",
    path_template: "/repos/{repo}/contents/{path}",
    default_auth: AuthStyle::Header,
    empty_encoding_is_base64: false,
    accept: Some(GITHUB_ACCEPT),
};

static GITEE: ProviderProfile = ProviderProfile {
    default_base: "https://gitee.com",
    path_template: "/api/v5/repos/{repo}/contents/{path}",
    default_auth: AuthStyle::Query,
    empty_encoding_is_base64: true,
    accept: None,
};

/// A fully resolved GET request for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub url: String,
    pub headers: Headers,
}

/// Resolve the URL and headers for reading `provider`'s code file.
pub fn build_request(provider: &ProviderConfig) -> ContentRequest {
    let profile = ProviderProfile::for_kind(provider.kind);
    let base = provider
        .api_base
        .as_deref()
        .unwrap_or(profile.default_base)
        .trim_end_matches('/');
    let path = profile
        .path_template
        .replace("{repo}", &encode_path(&provider.repository_path))
        .replace("{path}", &encode_path(&provider.file_path));

    let mut url = format!("{}{}", base, path);
    let mut headers = Headers::new();
    headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
    if let Some(accept) = profile.accept {
        headers.insert("Accept".to_string(), accept.to_string());
    }

    match provider.auth_style.unwrap_or(profile.default_auth) {
        AuthStyle::Header => {
            headers.insert(
                "Authorization".to_string(),
                format!("token {}", provider.auth_token),
            );
        }
        AuthStyle::Query => {
            url.push_str("?access_token=");
            url.push_str(&urlencoding::encode(&provider.auth_token));
        }
    }

    ContentRequest { url, headers }
}

/// Percent-encode each `/`-separated segment, dropping empty ones.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
