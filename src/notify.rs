//! Transient, auto-dismissing status messages.
//!
//! A notification is rendered as a toast that removes itself after its
//! timer. To survive the redirect that follows a successful update it can
//! travel in a short-lived flash cookie.

use std::time::Duration;

use axum_extra::extract::cookie::CookieJar;
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "marquee_flash";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Success,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub icon: Icon,
    pub buttons: bool,
    pub timer_ms: u64,
}

impl Notification {
    pub fn success(title: impl Into<String>, timer: Duration) -> Self {
        Self::new(title, Icon::Success, timer)
    }

    pub fn error(title: impl Into<String>, timer: Duration) -> Self {
        Self::new(title, Icon::Error, timer)
    }

    fn new(title: impl Into<String>, icon: Icon, timer: Duration) -> Self {
        Self {
            title: title.into(),
            icon,
            buttons: false,
            timer_ms: u64::try_from(timer.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

pub fn flash_cookie(notification: &Notification) -> Result<Cookie<'static>, serde_json::Error> {
    let value = urlencoding::encode(&serde_json::to_string(notification)?).into_owned();
    Ok(Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(60))
        .build())
}

/// Reads the pending flash notification, if any, and clears the cookie.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Notification>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));

    let decoded = urlencoding::decode(&raw)
        .map_err(|err| err.to_string())
        .and_then(|json| {
            serde_json::from_str::<Notification>(&json).map_err(|err| err.to_string())
        });

    match decoded {
        Ok(notification) => (jar, Some(notification)),
        Err(err) => {
            tracing::warn!(error = %err, "dropping unreadable flash cookie");
            (jar, None)
        },
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;

    /// Sends the cookie back the way a browser would after `Set-Cookie`.
    fn jar_with(cookie: &Cookie<'_>) -> CookieJar {
        let set_cookie = cookie.encoded().to_string();
        let pair = set_cookie.split(';').next().unwrap().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn notifications_never_have_buttons() {
        let n = Notification::error("boom", Duration::from_secs(3));
        assert_eq!(n.icon, Icon::Error);
        assert!(!n.buttons);
        assert_eq!(n.timer_ms, 3000);
    }

    #[test]
    fn flash_survives_the_cookie_roundtrip_and_is_cleared() {
        let sent = Notification::success("Movie Updated Successfully!", Duration::from_secs(3));
        let cookie = flash_cookie(&sent).unwrap();
        assert_eq!(cookie.http_only(), Some(true));

        let (jar, received) = take_flash(jar_with(&cookie));
        assert_eq!(received, Some(sent));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn flash_title_with_reserved_characters_survives() {
        let sent = Notification::error("100% failed; retry = no", Duration::from_secs(3));
        let cookie = flash_cookie(&sent).unwrap();

        let (_, received) = take_flash(jar_with(&cookie));
        assert_eq!(received, Some(sent));
    }

    #[test]
    fn garbage_flash_is_ignored() {
        let (_, received) = take_flash(jar_with(&Cookie::new(FLASH_COOKIE, "%7Bnot-json")));
        assert_eq!(received, None);
    }

    #[test]
    fn no_cookie_means_no_notification() {
        let (_, received) = take_flash(CookieJar::new());
        assert_eq!(received, None);
    }
}
