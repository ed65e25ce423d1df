//! Reminder service - the periodic sweep
//!
//! One entry point, [`ReminderService::run_sweep`], invoked by an external
//! scheduler. Each reminder kind is idempotent through its own persisted
//! flag or bounded counter; the sweep is safe to re-run or overlap.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};

use setdate_core::entities::Poll;
use setdate_core::value_objects::PollPhase;

use crate::dto::SweepReport;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::NotificationService;

/// Reminder service
pub struct ReminderService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReminderService<'a> {
    /// Create a new ReminderService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run one reminder sweep over all non-terminal polls
    ///
    /// For each poll the three kinds are evaluated independently. The
    /// ordering within a kind is send-then-flag: a crash between the two
    /// yields at most one duplicate, whereas flag-before-send could
    /// silently suppress a legitimate reminder. An email failure skips the
    /// flag write so the kind retries on the next sweep.
    #[instrument(skip(self))]
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> ServiceResult<SweepReport> {
        let polls = self.ctx.poll_repo().list_active().await?;
        let mut report = SweepReport {
            scanned: polls.len(),
            ..SweepReport::default()
        };

        for poll in &polls {
            self.sweep_poll(poll, now, &mut report).await;
        }

        info!(
            scanned = report.scanned,
            closing_soon = report.closing_soon_sent,
            post_deadline = report.post_deadline_sent,
            low_votes = report.low_votes_sent,
            errors = report.errors,
            "Reminder sweep finished"
        );
        Ok(report)
    }

    async fn sweep_poll(&self, poll: &Poll, now: DateTime<Utc>, report: &mut SweepReport) {
        let reminders = self.ctx.config().reminders;
        let lookahead = Duration::hours(reminders.closing_soon_lookahead_hours);
        let phase = poll.phase(now, lookahead);
        let notifier = NotificationService::new(self.ctx);

        // Closing-soon: only worth nudging when turnout is still low.
        if phase == PollPhase::ClosingSoon && !poll.closing_soon_sent {
            match self.non_organiser_votes(poll).await {
                Ok(count) if count < reminders.closing_soon_vote_threshold => {
                    match notifier.closing_soon(poll, count).await {
                        Ok(()) => {
                            match self.ctx.poll_repo().mark_closing_soon_sent(&poll.id).await {
                                Ok(true) => report.closing_soon_sent += 1,
                                // Lost the flag race to a concurrent sweep.
                                Ok(false) => {}
                                Err(e) => {
                                    warn!(poll_id = %poll.id, error = %e, "Closing-soon flag write failed");
                                    report.errors += 1;
                                }
                            }
                        }
                        Err(e) => {
                            warn!(poll_id = %poll.id, error = %e, "Closing-soon send failed");
                            report.errors += 1;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(poll_id = %poll.id, error = %e, "Vote count failed");
                    report.errors += 1;
                }
            }
        }

        // Post-deadline: prompt the organiser to finalize or extend.
        if phase == PollPhase::Closed && !poll.post_deadline_sent {
            match notifier.post_deadline(poll).await {
                Ok(()) => match self.ctx.poll_repo().mark_post_deadline_sent(&poll.id).await {
                    Ok(true) => report.post_deadline_sent += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(poll_id = %poll.id, error = %e, "Post-deadline flag write failed");
                        report.errors += 1;
                    }
                },
                Err(e) => {
                    warn!(poll_id = %poll.id, error = %e, "Post-deadline send failed");
                    report.errors += 1;
                }
            }
        }

        // Low-votes nudge: bounded count with minimum spacing, only while
        // voting is still possible.
        if matches!(phase, PollPhase::Open | PollPhase::ClosingSoon)
            && poll.low_votes_reminder_count < reminders.low_votes_max_reminders
        {
            let age = poll.age(now);
            let in_window = age >= Duration::hours(reminders.low_votes_min_age_hours)
                && age <= Duration::hours(reminders.low_votes_max_age_hours);
            let spaced_out = poll.last_low_votes_reminder.is_none_or(|last| {
                now - last >= Duration::hours(reminders.low_votes_spacing_hours)
            });

            if in_window && spaced_out {
                match self.non_organiser_votes(poll).await {
                    Ok(0) => match notifier.low_votes(poll).await {
                        Ok(()) => {
                            match self
                                .ctx
                                .poll_repo()
                                .record_low_votes_reminder(&poll.id, now)
                                .await
                            {
                                Ok(()) => report.low_votes_sent += 1,
                                Err(e) => {
                                    warn!(poll_id = %poll.id, error = %e, "Low-votes counter write failed");
                                    report.errors += 1;
                                }
                            }
                        }
                        Err(e) => {
                            warn!(poll_id = %poll.id, error = %e, "Low-votes send failed");
                            report.errors += 1;
                        }
                    },
                    Ok(_) => {}
                    Err(e) => {
                        warn!(poll_id = %poll.id, error = %e, "Vote count failed");
                        report.errors += 1;
                    }
                }
            }
        }
    }

    /// Vote count excluding any vote the organiser cast themselves.
    async fn non_organiser_votes(&self, poll: &Poll) -> ServiceResult<i64> {
        Ok(self
            .ctx
            .vote_repo()
            .count_excluding(&poll.id, &poll.organiser_email)
            .await?)
    }
}
