//! Plain-text digest.
//!
//! ```text
//!
//!
//! =====================================
//! Hacker News
//! =====================================
//!
//! Title: Some story
//! Url: https://example.com/story
//! Comments: https://news.ycombinator.com/item?id=1
//!
//! ```

use crate::models::{CanonicalItem, Section};
use std::fmt::Write;
use tracing::info;

const BANNER: &str = "=====================================";

/// Render all sections as plain text. No sections renders as an empty string.
pub fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        push_section(&mut out, section);
        info!(
            items = section.items.len(),
            section = %section.name,
            "Formatted section as text"
        );
    }
    out
}

fn push_section(out: &mut String, section: &Section) {
    // Writing into a String cannot fail
    let _ = write!(out, "\n\n{BANNER}\n{}\n{BANNER}\n\n", section.name);
    for item in &section.items {
        push_item(out, item);
        out.push_str("\n\n");
    }
}

fn push_item(out: &mut String, item: &CanonicalItem) {
    let _ = write!(out, "Title: {}\nUrl: {}", item.title(), item.url());
    if let Some(comments) = item.comments_url() {
        let _ = write!(out, "\nComments: {comments}");
    }
}
