//! Store URL recognition.
//!
//! Turns a raw, user-supplied URL into a [`Classification`]: which store the
//! app lives on and the identifier that store uses for it. Matching runs on a
//! trimmed, lower-cased copy of the input; callers keep the original string.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::models::{AppRef, Platform};

/// `apps.apple.com/<locale>/app/<slug>/id<digits>`
static IOS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"apps\.apple\.com/[^/?#]+/app/[^/?#]+/id(\d+)")
        .expect("iOS store URL pattern is valid")
});

/// `play.google.com/store/apps/details?id=<package>`
static ANDROID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"play\.google\.com/store/apps/details\?id=([a-z0-9._]+)")
        .expect("Play Store URL pattern is valid")
});

/// Platform and store identifier extracted from a store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub platform: Platform,
    pub bundle_id: String,
}

impl Classification {
    /// Pair the classification with the URL it was derived from.
    pub fn into_app_ref(self, store_url: impl Into<String>) -> AppRef {
        AppRef {
            store_url: store_url.into(),
            platform: self.platform,
            bundle_id: self.bundle_id,
        }
    }
}

/// Classify a store URL.
///
/// iOS is tried before Android. Both patterns are sub-matches, so schemes,
/// trailing paths and extra query parameters are tolerated.
pub fn classify(raw_url: &str) -> Result<Classification, AppError> {
    let normalized = raw_url.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::InvalidStoreUrl);
    }

    let patterns = [
        (Platform::Ios, &*IOS_PATTERN),
        (Platform::Android, &*ANDROID_PATTERN),
    ];

    patterns
        .into_iter()
        .find_map(|(platform, pattern)| {
            pattern.captures(&normalized).map(|caps| Classification {
                platform,
                bundle_id: caps[1].to_string(),
            })
        })
        .ok_or(AppError::InvalidStoreUrl)
}
