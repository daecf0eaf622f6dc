//! Spotify Web API integration
//!
//! The destination catalog: track search for matching, and the saved-tracks
//! collection for writing matches back.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::{to_candidate, to_search_page, track_id};
pub use client::{SAVE_BATCH_LIMIT, SpotifyClient};
