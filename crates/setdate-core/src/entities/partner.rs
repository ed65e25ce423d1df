//! Partner (venue) entity

use chrono::{DateTime, Utc};

/// Default brand color applied when a venue does not pick one.
pub const DEFAULT_BRAND_COLOR: &str = "#0f172a";

/// Maximum number of gallery photos kept per venue.
pub const MAX_GALLERY_PHOTOS: usize = 6;

/// Maximum number of meal availability tags kept per venue.
pub const MAX_MEAL_TAGS: usize = 4;

/// Partner venue record, keyed by its globally unique slug.
///
/// Created only through a successful onboarding-token claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    /// URL-safe key derived from the venue name.
    pub slug: String,
    pub venue_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub brand_color: String,
    pub city: String,
    pub full_address: String,
    pub venue_pitch: String,
    pub logo_url: String,
    pub booking_url: Option<String>,
    /// Meal availability tags, normalised and deduped.
    pub meal_tags: Vec<String>,
    /// Gallery photo URLs, capped at [`MAX_GALLERY_PHOTOS`].
    pub gallery_photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Derive the base slug for a venue name: lowercase, non-alphanumerics
/// collapsed to single hyphens, trimmed, capped at 60 characters.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_hyphen = true; // suppress leading hyphen
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(60);
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "partner".to_string()
    } else {
        slug
    }
}
