//! Session cookie parsing and formatting.
//!
//! Requests carry at most one session cookie; the helpers here keep the
//! gate and the handlers from duplicating header string handling.

/// Extract the named cookie's value from a `Cookie` request header.
pub fn session_token<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name {
            Some(value)
        } else {
            None
        }
    })
}

/// Format a `Set-Cookie` value carrying a (possibly rotated) session token.
pub fn set_session(cookie_name: &str, token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cookie_name, token, max_age_secs
    )
}

/// Format a `Set-Cookie` value that clears the session cookie.
pub fn clear_session(cookie_name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", cookie_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_among_other_cookies() {
        let header = "theme=dark; markhub_session=tok-123; lang=en";
        assert_eq!(session_token(header, "markhub_session"), Some("tok-123"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(session_token("theme=dark", "markhub_session"), None);
    }

    #[test]
    fn token_value_may_contain_equals() {
        let header = "markhub_session=a=b=c";
        assert_eq!(session_token(header, "markhub_session"), Some("a=b=c"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session("markhub_session");
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("markhub_session=;"));
    }
}
