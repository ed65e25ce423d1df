//! Poll service
//!
//! Poll creation with plan gating, vote recording, and the edit-token
//! guarded lifecycle mutations (finalize, cancel, extend).

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use setdate_core::entities::{Poll, Vote, VoteTally};
use setdate_core::error::DomainError;
use setdate_core::value_objects::{normalise_email, organiser_id_from_email};

use crate::dto::{
    CancelPollRequest, CreatePollRequest, CreatePollResponse, ExtendDeadlineRequest,
    FinalizePollRequest, PollResponse, RecordVoteRequest, TallyResponse, VoteAccepted,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;

/// Poll service
pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    /// Create a new PollService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn lookahead(&self) -> Duration {
        Duration::hours(self.ctx.config().reminders.closing_soon_lookahead_hours)
    }

    /// Create a poll, enforcing the free-plan gate
    #[instrument(skip(self, request), fields(organiser = %request.organiser_email))]
    pub async fn create_poll(&self, request: CreatePollRequest) -> ServiceResult<CreatePollResponse> {
        request.validate()?;

        let mut candidate_dates = request.candidate_dates;
        candidate_dates.sort_unstable();
        candidate_dates.dedup();
        if candidate_dates.is_empty() {
            return Err(ServiceError::validation("At least one candidate date is required"));
        }

        let now = Utc::now();
        if let Some(deadline) = request.deadline {
            if deadline <= now {
                return Err(DomainError::DeadlineInPast.into());
            }
        }

        let email = normalise_email(&request.organiser_email);
        let organiser_id =
            organiser_id_from_email(&self.ctx.config().app.organiser_id_salt, &email);

        // Gate against the current entitlement; an absent record counts as
        // a fresh free plan.
        let gating = self.ctx.config().gating;
        let organiser = self.ctx.organiser_repo().find(&organiser_id).await?;
        let unlocked = organiser.as_ref().is_some_and(|o| o.unlocked());
        if !unlocked {
            let created = organiser.as_ref().map_or(0, |o| o.polls_created_count);
            if created >= gating.free_poll_limit {
                return Err(DomainError::PollLimitReached.into());
            }
            if candidate_dates.len() > gating.free_date_limit {
                return Err(ServiceError::validation(format!(
                    "Free plan allows at most {} candidate dates",
                    gating.free_date_limit
                )));
            }
        }

        let poll = Poll::new(
            email.clone(),
            request.organiser_name,
            request.event_title,
            request.location,
            candidate_dates,
            request.deadline,
        );

        self.ctx.poll_repo().create(&poll).await?;
        self.ctx
            .organiser_repo()
            .increment_polls_created(&organiser_id, &email)
            .await?;

        info!(poll_id = %poll.id, "Poll created");

        // Best-effort confirmation; the poll is already durable.
        if let Err(e) = NotificationService::new(self.ctx).poll_created(&poll).await {
            warn!(poll_id = %poll.id, error = %e, "Poll-created email failed");
        }

        let phase = poll.phase(now, self.lookahead());
        Ok(CreatePollResponse {
            poll: PollResponse::from_poll(&poll, phase),
            edit_token: poll.edit_token,
        })
    }

    /// Fetch a poll with its derived phase and current tally
    #[instrument(skip(self))]
    pub async fn get_poll(&self, poll_id: &str) -> ServiceResult<TallyResponse> {
        let poll = self.find_poll(poll_id).await?;
        let votes = self.ctx.vote_repo().list_for_poll(poll_id).await?;
        let tally = VoteTally::aggregate(&poll.candidate_dates, &votes);
        let best_date = tally.best_date();
        let phase = poll.phase(Utc::now(), self.lookahead());

        Ok(TallyResponse {
            poll: PollResponse::from_poll(&poll, phase),
            tally,
            best_date,
        })
    }

    /// Record (or fully replace) a vote and return the updated tally
    #[instrument(skip(self, request), fields(poll_id))]
    pub async fn record_vote(
        &self,
        poll_id: &str,
        request: RecordVoteRequest,
    ) -> ServiceResult<VoteAccepted> {
        request.validate()?;

        let poll = self.find_poll(poll_id).await?;
        poll.ensure_mutable()?;

        if request.responses.is_empty() {
            return Err(ServiceError::validation("At least one response is required"));
        }
        for date in request.responses.keys() {
            if !poll.is_candidate_date(*date) {
                return Err(DomainError::DateNotCandidate(date.to_string()).into());
            }
        }

        let vote = Vote::new(
            poll.id.clone(),
            normalise_email(&request.voter_email),
            request.voter_name,
            request.responses,
            request.message,
        );

        // Full replace keyed by voter; resubmission is idempotent.
        self.ctx.vote_repo().upsert(&vote).await?;

        let votes = self.ctx.vote_repo().list_for_poll(poll_id).await?;
        let tally = VoteTally::aggregate(&poll.candidate_dates, &votes);

        // The vote is committed; the heads-up email is advisory.
        if let Err(e) = NotificationService::new(self.ctx)
            .vote_received(&poll, &vote.voter_name)
            .await
        {
            warn!(poll_id = %poll.id, error = %e, "Vote notification failed");
        }

        Ok(VoteAccepted {
            poll_id: poll.id,
            tally,
        })
    }

    /// Finalize the poll on one of its candidate dates
    #[instrument(skip(self, request), fields(poll_id))]
    pub async fn finalize(
        &self,
        poll_id: &str,
        request: FinalizePollRequest,
    ) -> ServiceResult<PollResponse> {
        let poll = self.find_poll(poll_id).await?;
        poll.verify_edit_token(&request.edit_token)?;

        if !poll.is_candidate_date(request.final_date) {
            return Err(DomainError::DateNotCandidate(request.final_date.to_string()).into());
        }

        // Conditional write; losing the race surfaces the precise conflict.
        let applied = self
            .ctx
            .poll_repo()
            .set_final_date(poll_id, request.final_date)
            .await?;
        if !applied {
            return Err(self.terminal_conflict(poll_id).await);
        }

        info!(poll_id, final_date = %request.final_date, "Poll finalized");

        let mut poll = poll;
        poll.final_date = Some(request.final_date);

        // Fan-out after commit; per-recipient failures stay inside.
        let votes = self.ctx.vote_repo().list_for_poll(poll_id).await?;
        NotificationService::new(self.ctx)
            .finalized(&poll, &votes)
            .await;

        let phase = poll.phase(Utc::now(), self.lookahead());
        Ok(PollResponse::from_poll(&poll, phase))
    }

    /// Cancel the poll
    #[instrument(skip(self, request), fields(poll_id))]
    pub async fn cancel(
        &self,
        poll_id: &str,
        request: CancelPollRequest,
    ) -> ServiceResult<PollResponse> {
        let poll = self.find_poll(poll_id).await?;
        poll.verify_edit_token(&request.edit_token)?;

        let cancelled_at = Utc::now();
        let applied = self
            .ctx
            .poll_repo()
            .set_cancelled(poll_id, cancelled_at)
            .await?;
        if !applied {
            return Err(self.terminal_conflict(poll_id).await);
        }

        info!(poll_id, "Poll cancelled");

        let mut poll = poll;
        poll.cancelled_at = Some(cancelled_at);

        let votes = self.ctx.vote_repo().list_for_poll(poll_id).await?;
        NotificationService::new(self.ctx)
            .cancelled(&poll, &votes)
            .await;

        let phase = poll.phase(Utc::now(), self.lookahead());
        Ok(PollResponse::from_poll(&poll, phase))
    }

    /// Push the deadline out; the only mutation permitted on a closed but
    /// non-terminal poll. Re-arms both deadline reminders.
    #[instrument(skip(self, request), fields(poll_id))]
    pub async fn extend_deadline(
        &self,
        poll_id: &str,
        request: ExtendDeadlineRequest,
    ) -> ServiceResult<PollResponse> {
        let poll = self.find_poll(poll_id).await?;
        poll.verify_edit_token(&request.edit_token)?;

        let now = Utc::now();
        if request.new_deadline <= now {
            return Err(DomainError::DeadlineInPast.into());
        }

        let applied = self
            .ctx
            .poll_repo()
            .extend_deadline(poll_id, request.new_deadline)
            .await?;
        if !applied {
            return Err(self.terminal_conflict(poll_id).await);
        }

        info!(poll_id, new_deadline = %request.new_deadline, "Deadline extended");

        let mut poll = poll;
        poll.deadline = Some(request.new_deadline);
        poll.closing_soon_sent = false;
        poll.post_deadline_sent = false;

        let phase = poll.phase(now, self.lookahead());
        Ok(PollResponse::from_poll(&poll, phase))
    }

    async fn find_poll(&self, poll_id: &str) -> ServiceResult<Poll> {
        self.ctx
            .poll_repo()
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Poll", poll_id))
    }

    /// Re-read the poll after a lost conditional write to report which
    /// terminal state won.
    async fn terminal_conflict(&self, poll_id: &str) -> ServiceError {
        match self.ctx.poll_repo().find_by_id(poll_id).await {
            Ok(Some(poll)) => match poll.ensure_mutable() {
                Err(e) => e.into(),
                Ok(()) => ServiceError::conflict("Poll changed concurrently"),
            },
            Ok(None) => ServiceError::not_found("Poll", poll_id),
            Err(e) => e.into(),
        }
    }
}
