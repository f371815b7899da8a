//! Team subsystem.
//!
//! A team is a named task list owned by one user. Every user gets the two
//! default teams ("Home", "Today") at registration; anything else is a custom
//! team, capped at [`types::MAX_CUSTOM_TEAMS`].

pub mod types;

pub use types::{CreateTeamRequest, Team, TeamMember, MAX_CUSTOM_TEAMS};
