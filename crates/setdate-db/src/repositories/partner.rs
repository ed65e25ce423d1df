//! PostgreSQL implementation of PartnerRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::Partner;
use setdate_core::error::DomainError;
use setdate_core::traits::{PartnerRepository, RepoResult};

use crate::models::PartnerModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of PartnerRepository
#[derive(Clone)]
pub struct PgPartnerRepository {
    pool: PgPool,
}

impl PgPartnerRepository {
    /// Create a new PgPartnerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerRepository for PgPartnerRepository {
    #[instrument(skip(self, partner), fields(slug = %partner.slug))]
    async fn create(&self, partner: &Partner) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO partners (slug, venue_name, contact_name, contact_email,
                                  brand_color, city, full_address, venue_pitch,
                                  logo_url, booking_url, meal_tags, gallery_photos,
                                  created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&partner.slug)
        .bind(&partner.venue_name)
        .bind(&partner.contact_name)
        .bind(&partner.contact_email)
        .bind(&partner.brand_color)
        .bind(&partner.city)
        .bind(&partner.full_address)
        .bind(&partner.venue_pitch)
        .bind(&partner.logo_url)
        .bind(&partner.booking_url)
        .bind(&partner.meal_tags)
        .bind(&partner.gallery_photos)
        .bind(partner.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::SlugAlreadyExists(partner.slug.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Partner>> {
        let result = sqlx::query_as::<_, PartnerModel>(
            r#"
            SELECT slug, venue_name, contact_name, contact_email, brand_color,
                   city, full_address, venue_pitch, logo_url, booking_url,
                   meal_tags, gallery_photos, created_at
            FROM partners
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Partner::from))
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM partners WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}
