//! GitHub-flavored markdown anchors for the processor index.

use std::collections::HashMap;

/// GitHub heading anchor slug.
///
/// - lowercase
/// - drop everything except alphanumerics, space, `-` and `_`
/// - spaces become hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Hands out anchors the way GitHub numbers repeated headings:
/// `blur`, `blur-1`, `blur-2`, ...
#[derive(Debug, Default)]
pub struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    pub fn next(&mut self, heading: &str) -> String {
        let slug = github_slug(heading);
        let count = self.seen.entry(slug.clone()).or_insert(0);
        let anchor = match *count {
            0 => slug,
            n => format!("{}-{}", slug, n),
        };
        *count += 1;
        anchor
    }
}

/// Generate a table-of-contents link to an anchor.
pub fn render_toc_link(text: &str, anchor: &str) -> String {
    format!("[{}](#{})", text, anchor)
}

/// Generate a TOC list item.
pub fn render_toc_item(text: &str, anchor: &str) -> String {
    format!("* {}", render_toc_link(text, anchor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple() {
        assert_eq!(github_slug("Gaussian Blur"), "gaussian-blur");
    }

    #[test]
    fn slug_keeps_hyphens_and_underscores() {
        assert_eq!(github_slug("edge-detect_v2"), "edge-detect_v2");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(github_slug("blur (fast)."), "blur-fast");
    }

    #[test]
    fn repeated_headings_are_numbered() {
        let mut anchors = Anchors::default();
        assert_eq!(anchors.next("blur"), "blur");
        assert_eq!(anchors.next("Blur"), "blur-1");
        assert_eq!(anchors.next("sharpen"), "sharpen");
        assert_eq!(anchors.next("blur"), "blur-2");
    }

    #[test]
    fn toc_item() {
        assert_eq!(render_toc_item("blur", "blur"), "* [blur](#blur)");
    }
}
