//! Partner entity <-> model mapper

use setdate_core::entities::Partner;

use crate::models::PartnerModel;

/// Convert PartnerModel to Partner entity
impl From<PartnerModel> for Partner {
    fn from(model: PartnerModel) -> Self {
        Partner {
            slug: model.slug,
            venue_name: model.venue_name,
            contact_name: model.contact_name,
            contact_email: model.contact_email,
            brand_color: model.brand_color,
            city: model.city,
            full_address: model.full_address,
            venue_pitch: model.venue_pitch,
            logo_url: model.logo_url,
            booking_url: model.booking_url,
            meal_tags: model.meal_tags,
            gallery_photos: model.gallery_photos,
            created_at: model.created_at,
        }
    }
}
