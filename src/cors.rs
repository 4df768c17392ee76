//! Cross-origin rules for browser clients served from another origin.

use axum::http::{
    HeaderName, HeaderValue, Method,
    header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, ORIGIN, PRAGMA},
};
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// One rule that an `Origin` header may match.
#[derive(Debug, Clone)]
enum OriginRule {
    /// The origin must equal this string, e.g. "https://pocket.example.com".
    Exact(String),
    /// The origin must match this regular expression.
    Pattern(Regex),
}

impl OriginRule {
    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Exact(allowed) => allowed == origin,
            OriginRule::Pattern(pattern) => pattern.is_match(origin),
        }
    }
}

/// The origins that browsers may call the API from with credentials.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    rules: Vec<OriginRule>,
}

const DEFAULT_ORIGIN_PATTERNS: [&str; 4] = [
    r"^http://localhost:\d+$",
    r"^http://127\.0\.0\.1:\d+$",
    r"^https://.*\.vercel\.app$",
    r"^https://.*-vercel-app\.vercel\.app$",
];

impl AllowedOrigins {
    /// Local development servers on any port, Vercel deployments, and
    /// `frontend_urls` if given.
    ///
    /// `frontend_urls` is a comma separated list of origins, e.g.
    /// "https://money.example.com,https://staging.money.example.com".
    pub fn with_defaults(frontend_urls: Option<&str>) -> Self {
        let mut rules: Vec<OriginRule> = DEFAULT_ORIGIN_PATTERNS
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(OriginRule::Pattern(regex)),
                Err(error) => {
                    tracing::error!("Skipping invalid origin pattern {pattern}: {error}");
                    None
                }
            })
            .collect();

        for url in frontend_urls
            .unwrap_or_default()
            .split(',')
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
        {
            tracing::info!("Allowing requests from frontend origin {url}");
            rules.push(OriginRule::Exact(url.to_owned()));
        }

        Self { rules }
    }

    /// Whether `origin` matches any rule.
    pub fn allows(&self, origin: &str) -> bool {
        let allowed = self.rules.iter().any(|rule| rule.matches(origin));

        if !allowed {
            tracing::debug!("CORS: blocking origin {origin}");
        }

        allowed
    }

    /// Build the tower-http layer enforcing these rules.
    ///
    /// Requests without an `Origin` header, e.g. from curl, are not affected.
    pub fn into_layer(self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _request_parts| {
                    origin
                        .to_str()
                        .map(|origin| self.allows(origin))
                        .unwrap_or(false)
                },
            ))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                ORIGIN,
                HeaderName::from_static("x-requested-with"),
                CONTENT_TYPE,
                ACCEPT,
                AUTHORIZATION,
                CACHE_CONTROL,
                PRAGMA,
            ])
            .allow_credentials(true)
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        Self::with_defaults(None)
    }
}
