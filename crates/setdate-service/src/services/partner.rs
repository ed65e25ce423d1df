//! Partner service
//!
//! Creates venue pages from one-time onboarding tokens: field
//! normalisation, unique slug allocation, and the compare-and-swap claim
//! completion.

use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

use setdate_core::entities::{
    slugify, Partner, DEFAULT_BRAND_COLOR, MAX_GALLERY_PHOTOS, MAX_MEAL_TAGS,
};
use setdate_core::error::DomainError;

use crate::dto::{CreatePartnerRequest, PartnerResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;
use super::onboarding::OnboardingService;

/// Upper bound on slug suffix probing; hitting it means something is
/// pathological about the venue name, not a normal collision.
const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Partner service
pub struct PartnerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PartnerService<'a> {
    /// Create a new PartnerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch a partner page by slug
    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<PartnerResponse> {
        let partner = self
            .ctx
            .partner_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::not_found("Partner", slug))?;
        Ok(PartnerResponse::from(partner))
    }

    /// Create a venue page from a one-time onboarding token
    ///
    /// The token is consumed through a compare-and-swap on the onboarding
    /// record, so two concurrent claims produce exactly one venue.
    #[instrument(skip(self, request))]
    pub async fn create_from_token(&self, request: CreatePartnerRequest) -> ServiceResult<PartnerResponse> {
        request.validate()?;

        let record = OnboardingService::new(self.ctx)
            .find_by_token(&request.token)
            .await?;
        if record.is_claimed() {
            return Err(DomainError::OnboardingAlreadyClaimed.into());
        }

        let brand_color = match request.brand_color.as_deref() {
            None | Some("") => DEFAULT_BRAND_COLOR.to_string(),
            Some(color) => {
                if !is_hex_color(color) {
                    return Err(ServiceError::validation(
                        "Brand color must be a #rrggbb hex value",
                    ));
                }
                color.to_lowercase()
            }
        };

        let logo_url = request.logo_url.trim().to_string();
        if !logo_url.is_empty() && !is_http_url(&logo_url) {
            return Err(ServiceError::validation("Logo URL must be http(s)"));
        }
        let booking_url = match request.booking_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) if is_http_url(url) => Some(url.to_string()),
            Some(_) => return Err(ServiceError::validation("Booking URL must be http(s)")),
        };

        let meal_tags = normalise_tags(request.meal_tags, MAX_MEAL_TAGS);
        let mut gallery_photos: Vec<String> = request
            .gallery_photos
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if gallery_photos.iter().any(|url| !is_http_url(url)) {
            return Err(ServiceError::validation("Gallery photos must be http(s) URLs"));
        }
        gallery_photos.truncate(MAX_GALLERY_PHOTOS);

        let mut partner = Partner {
            slug: String::new(),
            venue_name: request.venue_name.trim().to_string(),
            contact_name: request.contact_name.trim().to_string(),
            // The venue's contact identity comes from the paid session,
            // never from the request body.
            contact_email: record.customer_email.clone(),
            brand_color,
            city: request.city.trim().to_string(),
            full_address: request.full_address.trim().to_string(),
            venue_pitch: request.venue_pitch.trim().to_string(),
            logo_url,
            booking_url,
            meal_tags,
            gallery_photos,
            created_at: Utc::now(),
        };

        partner.slug = self.create_with_unique_slug(&mut partner).await?;

        // Single linearization point: exactly one claim per token wins.
        let claimed = self
            .ctx
            .onboarding_repo()
            .complete(&request.token, &partner.slug, &partner.slug)
            .await?;
        if !claimed {
            // A concurrent claim won between our check and the CAS; the
            // venue created here stays orphaned rather than double-linked.
            warn!(slug = %partner.slug, "Onboarding token claimed concurrently");
            return Err(DomainError::OnboardingAlreadyClaimed.into());
        }

        info!(slug = %partner.slug, "Partner created");

        if let Err(e) = NotificationService::new(self.ctx).partner_created(&partner).await {
            warn!(slug = %partner.slug, error = %e, "Partner confirmation email failed");
        }

        Ok(PartnerResponse::from(partner))
    }

    /// Allocate a unique slug with `-2`, `-3`… suffixes and persist the
    /// partner under it. Insert races fall through to the next suffix.
    async fn create_with_unique_slug(&self, partner: &mut Partner) -> ServiceResult<String> {
        let base = slugify(&partner.venue_name);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 1 {
                base.clone()
            } else {
                format!("{base}-{attempt}")
            };

            if self.ctx.partner_repo().slug_exists(&candidate).await? {
                continue;
            }

            partner.slug.clone_from(&candidate);
            match self.ctx.partner_repo().create(partner).await {
                Ok(()) => return Ok(candidate),
                Err(DomainError::SlugAlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::conflict(format!(
            "Could not allocate a unique slug for \"{base}\""
        )))
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Trim, lowercase, dedupe (order-preserving), and cap tag lists.
fn normalise_tags(tags: Vec<String>, cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
        if out.len() == cap {
            break;
        }
    }
    out
}
