// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reddit submit-page links.

/// Longest subreddit name Reddit allows.
pub const MAX_SUBREDDIT_LEN: usize = 21;

/// Build the URL of Reddit's pre-filled text-post submit page.
///
/// Every caller-supplied component is percent-encoded.
pub fn submit_url(base_url: &str, subreddit: &str, title: &str, article: &str) -> String {
    format!(
        "{}/r/{}/submit?text={}&title={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(subreddit),
        urlencoding::encode(article),
        urlencoding::encode(title)
    )
}

/// Whether `name` is a syntactically valid subreddit name.
pub fn is_valid_subreddit(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_SUBREDDIT_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_url_encodes_components() {
        let url = submit_url(
            "https://www.reddit.com",
            "rust",
            "Why & how?",
            "Lifetimes are fun\nreally",
        );
        assert_eq!(
            url,
            "https://www.reddit.com/r/rust/submit?text=Lifetimes%20are%20fun%0Areally&title=Why%20%26%20how%3F"
        );
    }

    #[test]
    fn test_submit_url_trims_trailing_slash() {
        let url = submit_url("http://localhost:9000/", "test", "t", "a");
        assert_eq!(url, "http://localhost:9000/r/test/submit?text=a&title=t");
    }

    #[test]
    fn test_subreddit_names() {
        assert!(is_valid_subreddit("rust"));
        assert!(is_valid_subreddit("learn_python3"));
        assert!(!is_valid_subreddit(""));
        assert!(!is_valid_subreddit("a".repeat(22).as_str()));
        assert!(!is_valid_subreddit("rust/../admin"));
        assert!(!is_valid_subreddit("has space"));
    }
}
