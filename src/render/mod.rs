//! Digest rendering.
//!
//! Both renderers are pure functions of the collected sections:
//!
//! - [`text`]: sections separated by a fixed `=====` banner
//! - [`html`]: sections wrapped in a minimal HTML document
//!
//! An empty section list is valid input for either one.

pub mod html;
pub mod text;

use crate::models::Section;

/// Output format for the digest; also decides the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Text,
    Html,
}

impl RenderMode {
    /// File extension used when the digest is written to disk.
    pub fn extension(self) -> &'static str {
        match self {
            RenderMode::Text => "txt",
            RenderMode::Html => "html",
        }
    }
}

/// Render `sections` in the given mode.
pub fn render(sections: &[Section], mode: RenderMode) -> String {
    match mode {
        RenderMode::Text => text::render(sections),
        RenderMode::Html => html::render(sections),
    }
}
