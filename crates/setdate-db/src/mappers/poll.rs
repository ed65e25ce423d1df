//! Poll entity <-> model mapper

use setdate_core::entities::Poll;

use crate::models::PollModel;

/// Convert PollModel to Poll entity
impl From<PollModel> for Poll {
    fn from(model: PollModel) -> Self {
        Poll {
            id: model.id,
            organiser_email: model.organiser_email,
            organiser_name: model.organiser_name,
            event_title: model.event_title,
            location: model.location,
            candidate_dates: model.candidate_dates,
            deadline: model.deadline,
            edit_token: model.edit_token,
            final_date: model.final_date,
            cancelled_at: model.cancelled_at,
            closing_soon_sent: model.closing_soon_sent,
            post_deadline_sent: model.post_deadline_sent,
            low_votes_reminder_count: model.low_votes_reminder_count,
            last_low_votes_reminder: model.last_low_votes_reminder,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
