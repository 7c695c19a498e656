// Failure diagnostics - classifies why a provider attempt failed
//
// Strategy failures are swallowed by the resolvers, so the only place the
// reason shows up is the log. This keeps those lines useful.

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;

/// Reasons a provider attempt can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// 429 or explicit rate limiting
    RateLimited,

    /// 401/403, provider refuses us
    Forbidden,

    /// 404 or content removed
    NotFound,

    /// Captcha, bot wall, cloudflare challenge
    BotDetection,

    /// Provider took too long
    Timeout,

    /// Provider is down (5xx)
    ServerError,

    /// Response body was not what we expected
    MalformedResponse,

    /// Strategy has no support for this platform/format
    Unsupported,

    /// Attempt abandoned by its caller
    Cancelled,

    /// Connection-level trouble
    Network,

    Unknown,
}

impl FailureReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::RateLimited => "Rate limited by provider",
            Self::Forbidden => "Access denied by provider",
            Self::NotFound => "Content not found",
            Self::BotDetection => "Bot detection triggered",
            Self::Timeout => "Provider timed out",
            Self::ServerError => "Provider server error",
            Self::MalformedResponse => "Malformed provider response",
            Self::Unsupported => "Not supported by this provider",
            Self::Cancelled => "Attempt cancelled",
            Self::Network => "Network unreachable",
            Self::Unknown => "Unknown failure",
        }
    }
}

/// Analyze error message and return failure reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = error.to_lowercase();

    if lower.contains("cancelled") || lower.contains("canceled") {
        return Some(FailureReason::Cancelled);
    }

    if lower.contains("not supported")
        || lower.contains("no oembed")
        || lower.contains("unsupported")
    {
        return Some(FailureReason::Unsupported);
    }

    if lower.contains("429")
        || lower.contains("rate limit")
        || lower.contains("too many requests")
    {
        return Some(FailureReason::RateLimited);
    }

    if lower.contains("captcha") || lower.contains("bot") || lower.contains("challenge") {
        return Some(FailureReason::BotDetection);
    }

    if lower.contains("403") || lower.contains("401") || lower.contains("forbidden") {
        return Some(FailureReason::Forbidden);
    }

    if lower.contains("404") || lower.contains("not found") || lower.contains("removed") {
        return Some(FailureReason::NotFound);
    }

    if lower.contains("timeout") || lower.contains("timed out") {
        return Some(FailureReason::Timeout);
    }

    if lower.contains("status 5")
        || lower.contains("bad gateway")
        || lower.contains("unavailable")
    {
        return Some(FailureReason::ServerError);
    }

    if lower.contains("parse") || lower.contains("json") || lower.contains("no result") {
        return Some(FailureReason::MalformedResponse);
    }

    if lower.contains("network")
        || lower.contains("connection")
        || lower.contains("dns")
        || lower.contains("refused")
    {
        return Some(FailureReason::Network);
    }

    if !error.is_empty() {
        return Some(FailureReason::Unknown);
    }

    None
}

/// One swallowed strategy error, kept for callers that want to explain a fallback
#[derive(Debug, Clone)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub error: DownloadError,
    pub reason: Option<FailureReason>,
}

impl StrategyFailure {
    pub fn new(strategy: &'static str, error: DownloadError) -> Self {
        let reason = diagnose_error(&error.to_string());
        Self {
            strategy,
            error,
            reason,
        }
    }
}

/// What a resolver produced and how it got there
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    pub value: T,
    /// Strategy that produced `value`; `None` for the fallback
    pub strategy: Option<&'static str>,
    pub failures: Vec<StrategyFailure>,
}

impl<T> Resolution<T> {
    pub fn used_fallback(&self) -> bool {
        self.strategy.is_none()
    }
}
