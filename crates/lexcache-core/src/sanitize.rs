//! HTML clean-up applied to every scraped page before it is stored.
//!
//! The page is parsed with html5ever (via `scraper`), edited in place and
//! serialized back with html5ever:
//!
//! 1. `img` elements are detached, together with anything under them.
//! 2. `a` elements lose their `href`; the element and its text stay.
//! 3. `link rel="stylesheet"` elements whose `href` starts with `/` get the
//!    site origin prepended.
//!
//! Every other node and attribute is left exactly as parsed.

use scraper::{Html, Node};

/// Origin of the site the catalogue scrapes.
pub const PLANALTO_ORIGIN: &str = "https://www.planalto.gov.br";

#[derive(Debug, Clone)]
pub struct Sanitizer {
    origin: String,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(PLANALTO_ORIGIN)
    }
}

impl Sanitizer {
    /// `origin` is prepended to root-relative stylesheet references
    /// (no trailing slash, e.g. `https://www.planalto.gov.br`).
    pub fn new(origin: impl Into<String>) -> Self {
        let origin: String = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Parse `html` as a full document and serialize the cleaned tree.
    pub fn sanitize(&self, html: &str) -> String {
        let mut document = Html::parse_document(html);

        let mut images = Vec::new();
        let mut anchors = Vec::new();
        let mut stylesheets = Vec::new();
        for node in document.tree.root().descendants() {
            let Some(el) = node.value().as_element() else {
                continue;
            };
            match el.name() {
                "img" => images.push(node.id()),
                "a" => anchors.push(node.id()),
                "link" if el.attr("rel") == Some("stylesheet") => stylesheets.push(node.id()),
                _ => {}
            }
        }

        for id in images {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        for id in anchors {
            if let Some(mut node) = document.tree.get_mut(id) {
                if let Node::Element(el) = node.value() {
                    el.attrs.retain(|name, _| &*name.local != "href");
                }
            }
        }

        for id in stylesheets {
            if let Some(mut node) = document.tree.get_mut(id) {
                if let Node::Element(el) = node.value() {
                    for (name, value) in el.attrs.iter_mut() {
                        if &*name.local == "href" && value.starts_with('/') {
                            *value = format!("{}{}", self.origin, &**value).into();
                        }
                    }
                }
            }
        }

        document.html()
    }
}
