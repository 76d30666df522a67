pub mod auth;
pub mod candidates;
pub mod contact;
pub mod health;
pub mod import;
pub mod locations;
pub mod media;
pub mod team;
