//! Resolution rules for the session environment toggles.
//!
//! A missing or malformed toggle is a warning in debug builds, where the
//! default wins, and an error in release builds. Optional toggles only fail
//! on malformed values.

use actix_web::cookie::{SameSite, time::Duration};
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

pub(super) const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
pub(super) const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";

/// One environment toggle with its fallback.
pub(super) struct Toggle<T> {
    name: &'static str,
    expected: &'static str,
    default: T,
}

impl<T: Copy> Toggle<T> {
    pub(super) const fn new(name: &'static str, expected: &'static str, default: T) -> Self {
        Self {
            name,
            expected,
            default,
        }
    }

    /// Resolve a toggle that release builds must set.
    pub(super) fn required<E: Env>(
        &self,
        env: &E,
        mode: BuildMode,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        match env.string(self.name) {
            Some(raw) => self.parsed(raw, mode, parse),
            None => {
                let error = SessionConfigError::MissingEnv { name: self.name };
                warn_or_fail(mode, error, || {
                    warn!(toggle = self.name, "not set; using default");
                })
                .map(|()| self.default)
            }
        }
    }

    /// Resolve a toggle that may be absent in any build.
    pub(super) fn optional<E: Env>(
        &self,
        env: &E,
        mode: BuildMode,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        env.string(self.name)
            .map_or(Ok(self.default), |raw| self.parsed(raw, mode, parse))
    }

    fn parsed(
        &self,
        raw: String,
        mode: BuildMode,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        if let Some(value) = parse(&raw) {
            return Ok(value);
        }
        warn_or_fail(
            mode,
            SessionConfigError::InvalidEnv {
                name: self.name,
                value: raw.clone(),
                expected: self.expected,
            },
            || warn!(toggle = self.name, value = %raw, "invalid value; using default"),
        )
        .map(|()| self.default)
    }
}

/// Log in debug builds, fail with `error` in release builds.
pub(super) fn warn_or_fail(
    mode: BuildMode,
    error: SessionConfigError,
    log: impl FnOnce(),
) -> Result<(), SessionConfigError> {
    if mode.is_debug() {
        log();
        Ok(())
    } else {
        Err(error)
    }
}

pub(super) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub(super) fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

/// Whole hours in `1..=max_hours`.
pub(super) fn parse_ttl_hours(raw: &str, max_hours: i64) -> Option<Duration> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| (1..=max_hours).contains(hours))
        .map(Duration::hours)
}
