//! Payment entity <-> model mapper

use setdate_core::entities::Payment;

use crate::models::PaymentModel;

/// Convert PaymentModel to Payment entity
impl From<PaymentModel> for Payment {
    fn from(model: PaymentModel) -> Self {
        Payment {
            session_id: model.session_id,
            organiser_id: model.organiser_id,
            email: model.email,
            amount_total: model.amount_total,
            currency: model.currency,
            price_id: model.price_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
