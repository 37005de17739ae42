//! User-Agent string shared by page and image requests.
//!
//! Naive bot filters reject unknown clients, so every request identifies
//! itself as a desktop Chrome browser.

/// Desktop Chrome User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_user_agent_looks_like_chrome() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(
            BROWSER_USER_AGENT.contains("Chrome/"),
            "UA must identify as Chrome: {BROWSER_USER_AGENT}"
        );
        assert!(
            !BROWSER_USER_AGENT.contains("imgcrawl"),
            "UA must not reveal the tool name"
        );
    }
}
