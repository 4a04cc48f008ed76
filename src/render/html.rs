//! HTML digest.
//!
//! Each section becomes an `<h3>` heading followed by one `<div>` per item. Items
//! with a discussion thread get a second `Comments` anchor. Titles and links are
//! escaped, since they come straight from third-party APIs.

use crate::models::{CanonicalItem, Section};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;
use tracing::info;

const HEAD: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><title>Sponge</title></head>\n<body>\n<h1>Sponge</h1>\n";
const TAIL: &str = "</body>\n</html>\n";

/// Render all sections inside the document shell.
pub fn render(sections: &[Section]) -> String {
    let mut out = String::from(HEAD);
    for section in sections {
        push_section(&mut out, section);
        info!(
            items = section.items.len(),
            section = %section.name,
            "Formatted section as HTML"
        );
    }
    out.push_str(TAIL);
    out
}

fn push_section(out: &mut String, section: &Section) {
    let _ = writeln!(out, "<h3>{}</h3>", text(&section.name));
    for item in &section.items {
        push_item(out, item);
    }
}

fn push_item(out: &mut String, item: &CanonicalItem) {
    match item.comments_url() {
        Some(comments) => {
            let _ = writeln!(
                out,
                "<div><a href=\"{}\">{}</a> &#124; <a href=\"{}\">Comments</a></div>",
                attr(item.url()),
                text(item.title()),
                attr(comments),
            );
        }
        None => {
            let _ = writeln!(
                out,
                "<div><a href=\"{}\">{}</a></div>",
                attr(item.url()),
                text(item.title()),
            );
        }
    }
}
