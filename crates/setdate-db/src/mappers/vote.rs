//! Vote entity <-> model mapper

use setdate_core::entities::Vote;

use crate::models::VoteModel;

/// Convert VoteModel to Vote entity
impl From<VoteModel> for Vote {
    fn from(model: VoteModel) -> Self {
        Vote {
            poll_id: model.poll_id,
            voter_key: model.voter_key,
            voter_name: model.voter_name,
            responses: model.responses.0,
            message: model.message,
            submitted_at: model.submitted_at,
        }
    }
}
