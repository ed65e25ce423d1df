//! Notification service - email composition and dispatch
//!
//! Composes the transactional emails for poll lifecycle events and hands
//! them to the [`Mailer`]. Every send here is best-effort: callers invoke
//! these after their state mutation has committed, and failures are
//! logged, never propagated into the triggering operation.

use tracing::{info, instrument, warn};

use setdate_core::entities::{OnboardingRecord, Partner, Poll, Vote};

use super::context::ServiceContext;
use super::mailer::{EmailMessage, EmailRecipient, MailerError};

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn poll_link(&self, poll: &Poll) -> String {
        format!("{}/poll/{}", self.ctx.config().app.base_url, poll.id)
    }

    fn organiser_recipient(poll: &Poll) -> EmailRecipient {
        EmailRecipient {
            email: poll.organiser_email.clone(),
            name: poll.organiser_name.clone(),
        }
    }

    /// Confirmation to the organiser after poll creation, carrying the
    /// share link and the edit token.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn poll_created(&self, poll: &Poll) -> Result<(), MailerError> {
        let link = self.poll_link(poll);
        let message = EmailMessage {
            to: Self::organiser_recipient(poll),
            subject: format!("Your date poll for \"{}\" is live", poll.event_title),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>Your poll for <strong>{}</strong> is ready. Share this link with \
                 your group so they can vote:</p>\
                 <p><a href=\"{link}\">{link}</a></p>\
                 <p>Keep this edit link private - it lets you finalize, extend or \
                 cancel the poll:</p>\
                 <p><a href=\"{link}/manage?token={token}\">{link}/manage?token={token}</a></p>",
                poll.organiser_name,
                poll.event_title,
                token = poll.edit_token,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Heads-up to the organiser that a new vote arrived.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn vote_received(&self, poll: &Poll, voter_name: &str) -> Result<(), MailerError> {
        let link = self.poll_link(poll);
        let message = EmailMessage {
            to: Self::organiser_recipient(poll),
            subject: format!("{} voted on \"{}\"", voter_name, poll.event_title),
            html_body: format!(
                "<p>{voter_name} just submitted their availability for \
                 <strong>{}</strong>.</p>\
                 <p><a href=\"{link}\">See the current results</a></p>",
                poll.event_title,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Closing-soon reminder to the organiser.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn closing_soon(&self, poll: &Poll, vote_count: i64) -> Result<(), MailerError> {
        let link = self.poll_link(poll);
        let message = EmailMessage {
            to: Self::organiser_recipient(poll),
            subject: format!("\"{}\" closes within 24 hours", poll.event_title),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>Voting for <strong>{}</strong> closes soon and only {vote_count} \
                 {noun} arrived so far. A quick nudge to your group might help:</p>\
                 <p><a href=\"{link}\">{link}</a></p>",
                poll.organiser_name,
                poll.event_title,
                noun = if vote_count == 1 { "vote" } else { "votes" },
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Post-deadline prompt to finalize or extend.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn post_deadline(&self, poll: &Poll) -> Result<(), MailerError> {
        let link = self.poll_link(poll);
        let message = EmailMessage {
            to: Self::organiser_recipient(poll),
            subject: format!("Voting closed for \"{}\" - pick the date", poll.event_title),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>The voting deadline for <strong>{}</strong> has passed. Time to \
                 pick the final date, or extend the deadline if you need more \
                 votes:</p>\
                 <p><a href=\"{link}/manage?token={token}\">Finalize or extend</a></p>",
                poll.organiser_name,
                poll.event_title,
                token = poll.edit_token,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Nudge when a young poll has collected no votes yet.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn low_votes(&self, poll: &Poll) -> Result<(), MailerError> {
        let link = self.poll_link(poll);
        let message = EmailMessage {
            to: Self::organiser_recipient(poll),
            subject: format!("No votes yet on \"{}\"", poll.event_title),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>Nobody has voted on <strong>{}</strong> yet. Sharing the link \
                 again usually does the trick:</p>\
                 <p><a href=\"{link}\">{link}</a></p>",
                poll.organiser_name,
                poll.event_title,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Fan-out to every voter when the organiser finalizes a date.
    ///
    /// Per-recipient failures are isolated: one bad address never aborts
    /// the remaining sends. Returns the number of failed sends.
    #[instrument(skip(self, poll, votes), fields(poll_id = %poll.id, recipients = votes.len()))]
    pub async fn finalized(&self, poll: &Poll, votes: &[Vote]) -> usize {
        let final_date = poll
            .final_date
            .map(|d| d.format("%A %-d %B %Y").to_string())
            .unwrap_or_default();
        let mut failures = 0;

        for vote in votes {
            let message = EmailMessage {
                to: EmailRecipient {
                    email: vote.voter_key.clone(),
                    name: vote.voter_name.clone(),
                },
                subject: format!("\"{}\" is happening on {final_date}", poll.event_title),
                html_body: format!(
                    "<p>Hi {},</p>\
                     <p>{} picked the date: <strong>{}</strong> is on \
                     <strong>{final_date}</strong>{}.</p>",
                    vote.voter_name,
                    poll.organiser_name,
                    poll.event_title,
                    if poll.location.is_empty() {
                        String::new()
                    } else {
                        format!(" at {}", poll.location)
                    },
                ),
                reply_to: Some(poll.organiser_email.clone()),
            };
            if let Err(e) = self.ctx.mailer().send(&message).await {
                warn!(to = %vote.voter_key, error = %e, "Finalize notification failed");
                failures += 1;
            }
        }

        info!(sent = votes.len() - failures, failures, "Finalize fan-out done");
        failures
    }

    /// Fan-out to every voter when the organiser cancels.
    #[instrument(skip(self, poll, votes), fields(poll_id = %poll.id, recipients = votes.len()))]
    pub async fn cancelled(&self, poll: &Poll, votes: &[Vote]) -> usize {
        let mut failures = 0;

        for vote in votes {
            let message = EmailMessage {
                to: EmailRecipient {
                    email: vote.voter_key.clone(),
                    name: vote.voter_name.clone(),
                },
                subject: format!("\"{}\" has been cancelled", poll.event_title),
                html_body: format!(
                    "<p>Hi {},</p>\
                     <p>{} cancelled <strong>{}</strong>. No date will be picked.</p>",
                    vote.voter_name, poll.organiser_name, poll.event_title,
                ),
                reply_to: Some(poll.organiser_email.clone()),
            };
            if let Err(e) = self.ctx.mailer().send(&message).await {
                warn!(to = %vote.voter_key, error = %e, "Cancel notification failed");
                failures += 1;
            }
        }

        info!(sent = votes.len() - failures, failures, "Cancel fan-out done");
        failures
    }

    /// Receipt for a completed organiser upgrade.
    #[instrument(skip(self))]
    pub async fn upgrade_confirmation(&self, email: &str) -> Result<(), MailerError> {
        let message = EmailMessage {
            to: EmailRecipient {
                email: email.to_string(),
                name: String::new(),
            },
            subject: "Welcome to the unlimited plan".to_string(),
            html_body: "<p>Thanks for upgrading! Poll and date limits no longer apply \
                        to your account.</p>"
                .to_string(),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Onboarding email carrying the one-time partner setup link.
    #[instrument(skip(self, record), fields(session_id = %record.session_id))]
    pub async fn partner_welcome(&self, record: &OnboardingRecord) -> Result<(), MailerError> {
        let link = format!(
            "{}/partners/setup?token={}",
            self.ctx.config().app.base_url,
            record.onboarding_token,
        );
        let message = EmailMessage {
            to: EmailRecipient {
                email: record.customer_email.clone(),
                name: record.customer_name.clone(),
            },
            subject: "Set up your venue page".to_string(),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>Thanks for joining as a partner venue. Use this one-time link to \
                 create your page:</p>\
                 <p><a href=\"{link}\">{link}</a></p>\
                 <p>The link can only be used once.</p>",
                record.customer_name,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }

    /// Confirmation to the venue owner once their page exists.
    #[instrument(skip(self, partner), fields(slug = %partner.slug))]
    pub async fn partner_created(&self, partner: &Partner) -> Result<(), MailerError> {
        let link = format!(
            "{}/venues/{}",
            self.ctx.config().app.base_url,
            partner.slug,
        );
        let message = EmailMessage {
            to: EmailRecipient {
                email: partner.contact_email.clone(),
                name: partner.contact_name.clone(),
            },
            subject: format!("{} is live", partner.venue_name),
            html_body: format!(
                "<p>Hi {},</p>\
                 <p>Your venue page for <strong>{}</strong> is live:</p>\
                 <p><a href=\"{link}\">{link}</a></p>",
                partner.contact_name, partner.venue_name,
            ),
            reply_to: None,
        };
        self.ctx.mailer().send(&message).await
    }
}
