//! # Offer Data Transfer Objects
//!
//! An offer is a two-sided handshake between an organisation and a user.
//! Each side holds a tri-state flag (`None` = undecided). The same row reads
//! differently depending on which side looks at it, see [`OfferView`].

use chrono::{DateTime, Utc};
use entity::offers;
use serde::{Deserialize, Serialize};

use super::{organisations::OrganisationShort, UserShort};

/// Which side of the offer the caller stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferSide {
    Organisation,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    /// Created by the viewer's side
    Sent,
    /// Created by the other side
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
    Unknown,
}

impl Decision {
    fn of(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Accept,
            Some(false) => Self::Reject,
            None => Self::Unknown,
        }
    }
}

/// An offer from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferView {
    pub offer_type: OfferType,
    /// For sent offers the other side's answer, for received ones our own
    pub decision:   Decision,
    pub can_accept: bool,
    pub can_reject: bool,
}

impl OfferView {
    pub fn new(offer: &offers::Model, side: OfferSide) -> Self {
        let (mine, theirs, created_by_us) = match side {
            OfferSide::Organisation => (offer.org_accept, offer.user_accept, !offer.is_application()),
            OfferSide::User => (offer.user_accept, offer.org_accept, offer.is_application()),
        };

        if created_by_us {
            Self {
                offer_type: OfferType::Sent,
                decision:   Decision::of(theirs),
                can_accept: theirs.is_none() && mine == Some(false),
                can_reject: theirs.is_none() && mine == Some(true),
            }
        }
        else {
            let answerable = theirs == Some(true) && mine.is_none();
            Self {
                offer_type: OfferType::Received,
                decision:   Decision::of(mine),
                can_accept: answerable,
                can_reject: answerable,
            }
        }
    }

    /// Filters from the list query.
    ///
    /// `decision` reads a different flag per type, so it is ignored unless
    /// `type` is given too.
    pub fn matches(&self, query: &OfferListQuery) -> bool {
        query.offer_type.map_or(true, |t| t == self.offer_type)
            && (query.offer_type.is_none() || query.decision.map_or(true, |d| d == self.decision))
            && query.can_accept.map_or(true, |c| c == self.can_accept)
            && query.can_reject.map_or(true, |c| c == self.can_reject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateOrganisationOfferRequest {
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserOfferRequest {
    pub organisation_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecideOfferRequest {
    pub accept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferResponse {
    pub id:           i32,
    pub organisation: OrganisationShort,
    pub user:         UserShort,
    pub offer_type:   OfferType,
    pub decision:     Decision,
    pub org_accept:   Option<bool>,
    pub user_accept:  Option<bool>,
    pub can_accept:   bool,
    pub can_reject:   bool,
    pub created_at:   DateTime<Utc>,
    pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferListQuery {
    #[serde(rename = "type")]
    pub offer_type: Option<OfferType>,
    pub decision:   Option<Decision>,
    pub can_accept: Option<bool>,
    pub can_reject: Option<bool>,
    pub page:       Option<u64>,
    pub per_page:   Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: i32 = 7;
    const DIRECTOR: i32 = 1;

    fn offer(org_accept: Option<bool>, user_accept: Option<bool>, created_by: i32) -> offers::Model {
        offers::Model {
            id: 1,
            organisation_id: 1,
            user_id: USER,
            org_accept,
            user_accept,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_invitation() {
        let invitation = offer(Some(true), None, DIRECTOR);

        let org = OfferView::new(&invitation, OfferSide::Organisation);
        assert_eq!(org.offer_type, OfferType::Sent);
        assert_eq!(org.decision, Decision::Unknown);
        assert!(!org.can_accept);
        assert!(org.can_reject, "the organisation may withdraw");

        let user = OfferView::new(&invitation, OfferSide::User);
        assert_eq!(user.offer_type, OfferType::Received);
        assert!(user.can_accept && user.can_reject);
    }

    #[test]
    fn test_withdrawn_invitation_can_be_renewed() {
        let withdrawn = offer(Some(false), None, DIRECTOR);

        let org = OfferView::new(&withdrawn, OfferSide::Organisation);
        assert!(org.can_accept);
        assert!(!org.can_reject);

        let user = OfferView::new(&withdrawn, OfferSide::User);
        assert!(!user.can_accept && !user.can_reject);
    }

    #[test]
    fn test_answered_offers_are_closed() {
        for (org_accept, user_accept) in [(Some(true), Some(true)), (Some(true), Some(false))] {
            let answered = offer(org_accept, user_accept, DIRECTOR);
            for side in [OfferSide::Organisation, OfferSide::User] {
                let view = OfferView::new(&answered, side);
                assert!(!view.can_accept && !view.can_reject, "{side:?} {org_accept:?}/{user_accept:?}");
            }
        }
    }

    #[test]
    fn test_application_is_mirrored() {
        let application = offer(None, Some(true), USER);

        let user = OfferView::new(&application, OfferSide::User);
        assert_eq!(user.offer_type, OfferType::Sent);
        assert!(user.can_reject && !user.can_accept);

        let org = OfferView::new(&application, OfferSide::Organisation);
        assert_eq!(org.offer_type, OfferType::Received);
        assert_eq!(org.decision, Decision::Unknown);
        assert!(org.can_accept && org.can_reject);

        let rejected = offer(Some(false), Some(true), USER);
        assert_eq!(
            OfferView::new(&rejected, OfferSide::Organisation).decision,
            Decision::Reject
        );
        assert_eq!(OfferView::new(&rejected, OfferSide::User).decision, Decision::Reject);
    }

    #[test]
    fn test_query_filters() {
        let view = OfferView::new(&offer(None, Some(true), USER), OfferSide::Organisation);

        assert!(view.matches(&OfferListQuery::default()));
        assert!(view.matches(&OfferListQuery {
            offer_type: Some(OfferType::Received),
            can_accept: Some(true),
            ..Default::default()
        }));
        assert!(!view.matches(&OfferListQuery {
            offer_type: Some(OfferType::Received),
            decision: Some(Decision::Accept),
            ..Default::default()
        }));
    }

    #[test]
    fn test_decision_needs_a_type() {
        let view = OfferView::new(&offer(None, Some(true), USER), OfferSide::Organisation);
        let decided = OfferListQuery {
            decision: Some(Decision::Accept),
            ..Default::default()
        };
        assert!(view.matches(&decided));

        assert!(!view.matches(&OfferListQuery {
            offer_type: Some(OfferType::Received),
            ..decided.clone()
        }));
        assert!(view.matches(&OfferListQuery {
            offer_type: Some(OfferType::Received),
            decision: Some(Decision::Unknown),
            ..Default::default()
        }));
    }
}
