use serde::Serialize;

use crate::api::FeedbackRequest;
use crate::message::{MessageId, QueryId};

/// Number of star controls offered per answer.
pub const STAR_COUNT: u8 = 5;

/// A committed or previewed star rating in `1..=STAR_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, FeedbackRejection> {
        if (1..=STAR_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FeedbackRejection::RatingOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Submission lifecycle of one feedback block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedbackState {
    #[default]
    NoRating,
    RatingSelected,
    Submitting,
    Confirmed,
    /// Controls stay interactive so the user can retry.
    SubmitFailed { notice: String },
}

impl FeedbackState {
    /// Returns the visible error notice, if the last submission failed.
    pub fn error_notice(&self) -> Option<&str> {
        match self {
            Self::SubmitFailed { notice } => Some(notice),
            Self::NoRating | Self::RatingSelected | Self::Submitting | Self::Confirmed => None,
        }
    }
}

/// State transition input for a feedback block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackTransition {
    Hover(Rating),
    Leave,
    Click(Rating),
    Comment(String),
    Submit,
    Succeed,
    Fail(String),
}

/// Rejection reason for illegal feedback interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackRejection {
    RatingOutOfRange { value: u8 },
    NoRatingSelected,
    SubmissionInFlight,
    AlreadyConfirmed,
    NotSubmitting,
    UnknownMessage { message_id: MessageId },
    FeedbackUnavailable { message_id: MessageId },
}

pub type FeedbackResult<T> = Result<T, FeedbackRejection>;

/// Per-answer feedback draft: committed rating, hover preview and comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
    query_id: QueryId,
    committed: Option<Rating>,
    preview: Option<Rating>,
    comment: String,
    state: FeedbackState,
}

impl FeedbackDraft {
    pub fn new(query_id: QueryId) -> Self {
        Self {
            query_id,
            committed: None,
            preview: None,
            comment: String::new(),
            state: FeedbackState::NoRating,
        }
    }

    pub fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    pub fn committed(&self) -> Option<Rating> {
        self.committed
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == FeedbackState::Confirmed
    }

    /// Number of stars lit: the hover preview wins over the committed rating.
    pub fn highlighted(&self) -> u8 {
        self.preview.or(self.committed).map(Rating::get).unwrap_or(0)
    }

    pub fn comment_box_visible(&self) -> bool {
        self.committed.is_some() && !self.is_confirmed()
    }

    /// Builds the wire request for the committed rating.
    pub fn submission(&self) -> FeedbackResult<FeedbackRequest> {
        let rating = self.committed.ok_or(FeedbackRejection::NoRatingSelected)?;
        Ok(FeedbackRequest {
            query_id: self.query_id.clone(),
            rating,
            comments: self.comment.clone(),
        })
    }

    /// Applies one transition; the draft is left untouched on rejection.
    pub fn apply(&mut self, transition: FeedbackTransition) -> FeedbackResult<()> {
        match transition {
            FeedbackTransition::Hover(rating) => {
                self.ensure_open()?;
                self.preview = Some(rating);
            }
            FeedbackTransition::Leave => {
                self.ensure_open()?;
                self.preview = None;
            }
            FeedbackTransition::Click(rating) => self.apply_click(rating)?,
            FeedbackTransition::Comment(comment) => {
                self.ensure_editable()?;
                self.comment = comment;
            }
            FeedbackTransition::Submit => self.apply_submit()?,
            FeedbackTransition::Succeed => {
                self.ensure_submitting()?;
                self.preview = None;
                self.state = FeedbackState::Confirmed;
            }
            FeedbackTransition::Fail(notice) => {
                self.ensure_submitting()?;
                self.state = FeedbackState::SubmitFailed { notice };
            }
        }

        Ok(())
    }

    fn apply_click(&mut self, rating: Rating) -> FeedbackResult<()> {
        self.ensure_editable()?;
        self.committed = Some(rating);
        self.preview = None;
        if self.state == FeedbackState::NoRating {
            self.state = FeedbackState::RatingSelected;
        }
        Ok(())
    }

    fn apply_submit(&mut self) -> FeedbackResult<()> {
        match self.state {
            FeedbackState::NoRating => Err(FeedbackRejection::NoRatingSelected),
            FeedbackState::Submitting => Err(FeedbackRejection::SubmissionInFlight),
            FeedbackState::Confirmed => Err(FeedbackRejection::AlreadyConfirmed),
            FeedbackState::RatingSelected | FeedbackState::SubmitFailed { .. } => {
                if self.committed.is_none() {
                    return Err(FeedbackRejection::NoRatingSelected);
                }
                self.state = FeedbackState::Submitting;
                Ok(())
            }
        }
    }

    fn ensure_open(&self) -> FeedbackResult<()> {
        if self.is_confirmed() {
            return Err(FeedbackRejection::AlreadyConfirmed);
        }
        Ok(())
    }

    fn ensure_editable(&self) -> FeedbackResult<()> {
        self.ensure_open()?;
        if self.state == FeedbackState::Submitting {
            return Err(FeedbackRejection::SubmissionInFlight);
        }
        Ok(())
    }

    fn ensure_submitting(&self) -> FeedbackResult<()> {
        if self.state != FeedbackState::Submitting {
            return Err(FeedbackRejection::NotSubmitting);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    #[test]
    fn rating_rejects_values_outside_star_range() {
        assert_eq!(
            Rating::new(0),
            Err(FeedbackRejection::RatingOutOfRange { value: 0 })
        );
        assert_eq!(
            Rating::new(6),
            Err(FeedbackRejection::RatingOutOfRange { value: 6 })
        );
        assert_eq!(Rating::new(5).map(Rating::get), Ok(5));
    }

    #[test]
    fn hover_previews_without_committing() {
        let mut draft = FeedbackDraft::new(QueryId::new("q-1"));

        draft.apply(FeedbackTransition::Hover(rating(4))).unwrap();
        assert_eq!(draft.highlighted(), 4);
        assert_eq!(draft.committed(), None);
        assert!(!draft.comment_box_visible());

        draft.apply(FeedbackTransition::Leave).unwrap();
        assert_eq!(draft.highlighted(), 0);

        draft.apply(FeedbackTransition::Click(rating(2))).unwrap();
        draft.apply(FeedbackTransition::Hover(rating(5))).unwrap();
        assert_eq!(draft.highlighted(), 5);
        draft.apply(FeedbackTransition::Leave).unwrap();
        assert_eq!(draft.highlighted(), 2);
    }

    #[test]
    fn submit_requires_committed_rating() {
        let mut draft = FeedbackDraft::new(QueryId::new("q-1"));

        assert_eq!(
            draft.apply(FeedbackTransition::Submit),
            Err(FeedbackRejection::NoRatingSelected)
        );
        assert_eq!(draft.state(), &FeedbackState::NoRating);
    }

    #[test]
    fn failed_submission_can_be_retried_until_confirmed() {
        let mut draft = FeedbackDraft::new(QueryId::new("q-7"));
        draft.apply(FeedbackTransition::Click(rating(3))).unwrap();
        draft
            .apply(FeedbackTransition::Comment("helpful".to_string()))
            .unwrap();

        draft.apply(FeedbackTransition::Submit).unwrap();
        assert_eq!(
            draft.apply(FeedbackTransition::Submit),
            Err(FeedbackRejection::SubmissionInFlight)
        );
        draft
            .apply(FeedbackTransition::Fail("try later".to_string()))
            .unwrap();
        assert_eq!(draft.state().error_notice(), Some("try later"));
        assert!(draft.comment_box_visible());

        draft.apply(FeedbackTransition::Submit).unwrap();
        assert_eq!(draft.state().error_notice(), None);
        draft.apply(FeedbackTransition::Succeed).unwrap();

        assert!(draft.is_confirmed());
        assert!(!draft.comment_box_visible());
        assert_eq!(
            draft.apply(FeedbackTransition::Click(rating(1))),
            Err(FeedbackRejection::AlreadyConfirmed)
        );
        assert_eq!(
            draft.apply(FeedbackTransition::Hover(rating(1))),
            Err(FeedbackRejection::AlreadyConfirmed)
        );
    }

    #[test]
    fn submission_carries_query_rating_and_comment() {
        let mut draft = FeedbackDraft::new(QueryId::new("q-9"));
        draft.apply(FeedbackTransition::Click(rating(5))).unwrap();
        draft
            .apply(FeedbackTransition::Comment("clear answer".to_string()))
            .unwrap();

        let request = draft.submission().unwrap();
        assert_eq!(request.query_id, QueryId::new("q-9"));
        assert_eq!(request.rating.get(), 5);
        assert_eq!(request.comments, "clear answer");
    }

    #[test]
    fn terminal_transitions_require_submission_in_flight() {
        let mut draft = FeedbackDraft::new(QueryId::new("q-2"));
        draft.apply(FeedbackTransition::Click(rating(1))).unwrap();

        assert_eq!(
            draft.apply(FeedbackTransition::Succeed),
            Err(FeedbackRejection::NotSubmitting)
        );
        assert_eq!(
            draft.apply(FeedbackTransition::Fail("x".to_string())),
            Err(FeedbackRejection::NotSubmitting)
        );
    }
}
