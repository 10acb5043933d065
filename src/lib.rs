//! Invite Quiz — a chat quiz that issues single-use invite codes.

pub mod bot;
pub mod channels;
pub mod config;
pub mod error;
pub mod quiz;
pub mod store;
