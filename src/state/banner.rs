//! Dismissible, auto-expiring user messages

use std::time::{Duration, Instant};

/// Severity of a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Warning,
    Error,
}

/// A message placed near the top of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub ttl: Duration,
}

impl Banner {
    /// Lifetime of reset feedback banners
    pub const SHORT_TTL: Duration = Duration::from_secs(5);
    /// Lifetime of error banners
    pub const LONG_TTL: Duration = Duration::from_secs(8);

    pub fn new(kind: BannerKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            ttl,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Success, message, Self::SHORT_TTL)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Warning, message, Self::SHORT_TTL)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Error, message, Self::LONG_TTL)
    }

    /// Override the lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A banner and the moment it was shown
#[derive(Debug, Clone)]
struct ShownBanner {
    banner: Banner,
    shown_at: Instant,
}

impl ShownBanner {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.banner.ttl
    }
}

/// Banners currently on screen, newest first
#[derive(Debug, Clone, Default)]
pub struct BannerQueue {
    shown: Vec<ShownBanner>,
}

impl BannerQueue {
    pub fn push(&mut self, banner: Banner) {
        self.push_at(banner, Instant::now());
    }

    pub fn push_at(&mut self, banner: Banner, now: Instant) {
        let shown = ShownBanner {
            banner,
            shown_at: now,
        };
        self.shown.insert(0, shown);
    }

    /// Drop every banner whose lifetime has elapsed
    pub fn prune_expired(&mut self, now: Instant) {
        self.shown.retain(|b| !b.is_expired(now));
    }

    /// Dismiss the newest banner
    pub fn dismiss(&mut self) -> Option<Banner> {
        if self.shown.is_empty() {
            None
        } else {
            Some(self.shown.remove(0).banner)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.shown.iter().map(|b| &b.banner)
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_ttl() {
        assert_eq!(Banner::success("ok").ttl, Duration::from_secs(5));
        assert_eq!(Banner::warning("hmm").ttl, Duration::from_secs(5));
        assert_eq!(Banner::error("fail").ttl, Duration::from_secs(8));
    }

    #[test]
    fn test_newest_first() {
        let mut queue = BannerQueue::default();
        queue.push(Banner::success("first"));
        queue.push(Banner::error("second"));
        let messages: Vec<&str> = queue.iter().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_prune_drops_expired_only() {
        let start = Instant::now();
        let mut queue = BannerQueue::default();
        queue.push_at(Banner::success("short"), start);
        queue.push_at(Banner::error("long"), start);

        queue.prune_expired(start + Duration::from_secs(6));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|b| b.kind), Some(BannerKind::Error));

        queue.prune_expired(start + Duration::from_secs(8));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss_removes_newest() {
        let mut queue = BannerQueue::default();
        assert!(queue.dismiss().is_none());
        queue.push(Banner::warning("a"));
        queue.push(Banner::warning("b"));
        assert_eq!(queue.dismiss().map(|b| b.message), Some("b".to_string()));
        assert_eq!(queue.len(), 1);
    }
}
