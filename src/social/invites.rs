use std::rc::Rc;
use std::time::SystemTime;

use log::info;

use crate::model::{Invite, InviteStatus, Quiz, User};
use crate::store::{
    keys, new_record_id, KeyValueStore, QuizRepository, Record, RecordList, StoreError,
};

impl Record for Invite {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteToggle {
    Sent(Invite),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteResponse {
    Accept,
    Reject,
}

#[derive(Clone)]
pub struct Invites {
    invites: RecordList<Invite>,
}

impl Invites {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            invites: RecordList::new(store, keys::QUIZ_INVITES),
        }
    }

    pub fn list(&self) -> Vec<Invite> {
        self.invites.list()
    }

    /// Sends an invite to `to_email`, or withdraws the pending one for the same quiz.
    pub fn toggle_invite(
        &self,
        quiz: &Quiz,
        to_email: &str,
        from: Option<&User>,
    ) -> Result<InviteToggle, StoreError> {
        let existing = self.list().into_iter().find(|invite| {
            invite.quiz_id == quiz.id && invite.is_pending_for(to_email)
        });
        if let Some(existing) = existing {
            self.invites.delete(&existing.id)?;
            info!(target: "social", "Cancelled invite {} to {}", existing.id, to_email);
            return Ok(InviteToggle::Cancelled);
        }

        let invite = Invite {
            id: new_record_id(),
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.title.clone(),
            to_email: to_email.to_string(),
            from_email: from.map(|user| user.email.clone()),
            from_name: from.map_or("User", User::display_name).to_string(),
            status: InviteStatus::Pending,
            created_at: Invite::timestamp(SystemTime::now()),
        };
        self.invites.append(invite.clone())?;
        info!(target: "social", "Invited {} to quiz {}", to_email, quiz.id);
        Ok(InviteToggle::Sent(invite))
    }

    pub fn pending_for(&self, email: &str) -> Vec<Invite> {
        self.list()
            .into_iter()
            .filter(|invite| invite.is_pending_for(email))
            .collect()
    }

    /// Recipients with a pending invite to `quiz_id`.
    pub fn invited_emails(&self, quiz_id: &str) -> Vec<String> {
        self.list()
            .into_iter()
            .filter(|invite| invite.quiz_id == quiz_id && invite.is_pending())
            .map(|invite| invite.to_email)
            .collect()
    }

    /// Settles an invite. Accepting hands back the quiz to start, when it still exists.
    pub fn respond(
        &self,
        invite_id: &str,
        response: InviteResponse,
        quizzes: &QuizRepository,
    ) -> Result<Option<Quiz>, StoreError> {
        let status = match response {
            InviteResponse::Accept => InviteStatus::Accepted,
            InviteResponse::Reject => InviteStatus::Rejected,
        };
        let Some(invite) = self
            .invites
            .update(invite_id, |invite| invite.status = status)?
        else {
            return Ok(None);
        };
        info!(target: "social", "Invite {} {:?}", invite.id, status);
        match response {
            InviteResponse::Accept => Ok(quizzes.get(&invite.quiz_id)),
            InviteResponse::Reject => Ok(None),
        }
    }
}
