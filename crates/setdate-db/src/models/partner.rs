//! Partner database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for partners table
#[derive(Debug, Clone, FromRow)]
pub struct PartnerModel {
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
    pub meal_tags: Vec<String>,
    pub gallery_photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}
