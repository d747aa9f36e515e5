//! HTML sanitization.
//!
//! Uses ammonia's whitelist cleaner with a broadened policy so that
//! ordinary page markup (layout tags, `class`/`id`/`style` attributes,
//! `<style>` blocks) survives while script-executing constructs do not:
//!
//! - `<script>` elements and their content are dropped unless scripts are
//!   explicitly allowed
//! - event-handler attributes (`on*`) are always dropped
//! - `javascript:` and other non-whitelisted URL schemes are always dropped

use ammonia::Builder;
use cleanpage_core::Error;

/// Pure, deterministic sanitize function.
pub trait Sanitizer: Send + Sync {
    /// Clean `input`, keeping `<script>` elements only when `allow_scripts`.
    fn sanitize(&self, input: &str, allow_scripts: bool) -> Result<String, Error>;
}

/// Tags allowed on top of ammonia's defaults.
const EXTRA_TAGS: &[&str] = &[
    "article", "aside", "button", "caption", "details", "figcaption", "figure", "footer", "header", "main",
    "mark", "nav", "section", "summary", "style", "time",
];

/// Attributes allowed on every tag.
const GENERIC_ATTRIBUTES: &[&str] = &["class", "id", "style", "title", "role", "aria-label", "aria-hidden"];

/// Attributes kept on `<script>` when scripts are allowed.
const SCRIPT_ATTRIBUTES: &[&str] = &["src", "type", "async", "defer", "crossorigin", "integrity"];

/// ammonia-backed sanitizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        Self
    }

    fn builder(allow_scripts: bool) -> Builder<'static> {
        let mut builder = Builder::default();
        builder
            .add_tags(EXTRA_TAGS)
            .rm_clean_content_tags(&["style"])
            .add_generic_attributes(GENERIC_ATTRIBUTES)
            .add_tag_attributes("time", &["datetime"])
            .link_rel(None);

        if allow_scripts {
            builder
                .add_tags(&["script"])
                .rm_clean_content_tags(&["script"])
                .add_tag_attributes("script", SCRIPT_ATTRIBUTES);
        }

        builder
    }
}

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, input: &str, allow_scripts: bool) -> Result<String, Error> {
        Ok(Self::builder(allow_scripts).clean(input).to_string())
    }
}
