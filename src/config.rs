//! Site-wide settings.
//!
//! Everything here has a default that matches the shipped page, so a missing or broken
//! `site-config` block never stops the storefront from mounting.

use std::time::Duration;

use serde::Deserialize;

use crate::carousel;

/// Neutral grey "image" glyph used wherever a slide or cart thumbnail has no source.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSI0MDAiIGhlaWdodD0iNDAwIiB2aWV3Qm94PSIwIDAgMjQgMjQiIGZpbGw9Im5vbmUiIHN0cm9rZT0iI2QxZDVkYiIgc3Ryb2tlLXdpZHRoPSIyIiBzdHJva2UtbGluZWNhcD0icm91bmQiIHN0cm9rZS1saW5lam9pbj0icm91bmQiPjxwYXRoIGQ9Ik0xOCAxM0g2Ii8+PHBhdGggZD0iTTEyIDZ2NiIvPjwvc3ZnPg==";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// localStorage slot holding the serialized cart.
    pub cart_storage_key: String,
    /// localStorage slot holding the liked-project set.
    pub likes_storage_key: String,
    /// Duration of the cart panel slide in / slide out.
    pub panel_transition_ms: u32,
    /// Delay between starting the modal fade-out and hiding it.
    pub modal_close_delay_ms: u32,
    /// Fraction of the slide width a drag must exceed to change slide.
    pub drag_threshold: f64,
    pub gallery_url: String,
    pub currency: String,
    pub placeholder_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cart_storage_key: "cart".into(),
            likes_storage_key: "likedProjects".into(),
            panel_transition_ms: 300,
            modal_close_delay_ms: 200,
            drag_threshold: carousel::DEFAULT_DRAG_THRESHOLD,
            gallery_url: "./gallery.json".into(),
            currency: "EGP".into(),
            placeholder_image: PLACEHOLDER_IMAGE.into(),
        }
    }
}

impl SiteConfig {
    /// Parses a (possibly partial) JSON object; unknown keys are ignored, missing ones defaulted.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: SiteConfig = serde_json::from_str(text)?;
        let checked = carousel::checked_threshold(config.drag_threshold);
        if checked != config.drag_threshold {
            log::warn!("drag threshold {} out of range, using {checked}", config.drag_threshold);
            config.drag_threshold = checked;
        }
        Ok(config)
    }

    pub fn panel_transition(&self) -> Duration {
        Duration::from_millis(self.panel_transition_ms.into())
    }

    pub fn modal_close_delay(&self) -> Duration {
        Duration::from_millis(self.modal_close_delay_ms.into())
    }
}
