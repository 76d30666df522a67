//! This file serves as the root for all SeaORM entity modules.
//! The data models for the candidate microsite platform live here:
//! login accounts, the division/district reference set, candidate
//! profiles keyed by electoral seat, team rosters, media galleries and
//! visitor contact messages.

pub mod candidate;
pub mod contact_message;
pub mod district;
pub mod division;
pub mod media_item;
pub mod team_member;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::candidate::Entity as Candidate;
    pub use super::contact_message::Entity as ContactMessage;
    pub use super::district::Entity as District;
    pub use super::division::Entity as Division;
    pub use super::media_item::Entity as MediaItem;
    pub use super::team_member::Entity as TeamMember;
    pub use super::user::Entity as User;
}
