//! # Ownership Authorization Guard
//!
//! Every mutation of a ticket or review passes through [`authorize`]: only
//! the creator may edit or delete. The guard returns an explicit
//! [`Forbidden`] error; how a denial is rendered (the HTTP layer answers
//! with a silent redirect to the posts view) is the caller's decision.

use thiserror::Error;
use uuid::Uuid;

use crate::model::{Review, Ticket};

/// Ownership mismatch: the actor is not the entity's creator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("user {actor} does not own {kind} {entity}")]
pub struct Forbidden {
    /// The acting user.
    pub actor: Uuid,
    /// The entity whose mutation was denied.
    pub entity: Uuid,
    /// Entity kind, for diagnostics ("ticket" or "review").
    pub kind: &'static str,
}

/// An entity with a single owning user.
pub trait Owned {
    /// The entity's unique id.
    fn entity_id(&self) -> Uuid;
    /// The owning user's id.
    fn owner_id(&self) -> Uuid;
    /// Entity kind name, for diagnostics.
    fn kind(&self) -> &'static str;
}

impl Owned for Ticket {
    fn entity_id(&self) -> Uuid {
        self.id
    }
    fn owner_id(&self) -> Uuid {
        self.owner
    }
    fn kind(&self) -> &'static str {
        "ticket"
    }
}

impl Owned for Review {
    fn entity_id(&self) -> Uuid {
        self.id
    }
    fn owner_id(&self) -> Uuid {
        self.owner
    }
    fn kind(&self) -> &'static str {
        "review"
    }
}

/// Allow the mutation iff `actor` is the entity's owner.
pub fn authorize<T: Owned>(actor: Uuid, entity: &T) -> Result<(), Forbidden> {
    if actor == entity.owner_id() {
        Ok(())
    } else {
        Err(Forbidden {
            actor,
            entity: entity.entity_id(),
            kind: entity.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReviewDraft, TicketDraft};
    use chrono::Utc;

    #[test]
    fn owner_may_mutate_ticket() {
        let owner = Uuid::new_v4();
        let ticket = TicketDraft {
            title: "Dune".to_string(),
            description: String::new(),
            image: None,
        }
        .create(owner, Utc::now())
        .unwrap();

        assert!(authorize(owner, &ticket).is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let ticket = TicketDraft {
            title: "Dune".to_string(),
            description: String::new(),
            image: None,
        }
        .create(owner, Utc::now())
        .unwrap();

        let denied = authorize(intruder, &ticket).unwrap_err();
        assert_eq!(denied.actor, intruder);
        assert_eq!(denied.entity, ticket.id);
        assert_eq!(denied.kind, "ticket");
    }

    #[test]
    fn review_guard_uses_review_owner_not_ticket_owner() {
        let ticket_owner = Uuid::new_v4();
        let reviewer = Uuid::new_v4();
        let review = ReviewDraft {
            rating: 3,
            headline: "Fine".to_string(),
            body: "It is fine.".to_string(),
            image: None,
        }
        .create(reviewer, Uuid::new_v4(), Utc::now())
        .unwrap();

        assert!(authorize(reviewer, &review).is_ok());
        assert!(authorize(ticket_owner, &review).is_err());
    }

    #[test]
    fn forbidden_display_names_the_entity() {
        let review = ReviewDraft {
            rating: 3,
            headline: "Fine".to_string(),
            body: "It is fine.".to_string(),
            image: None,
        }
        .create(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
        .unwrap();

        let denied = authorize(Uuid::new_v4(), &review).unwrap_err();
        assert!(format!("{denied}").contains("review"));
    }
}
