//! Client for the BoardGameGeek XML API 2.
//!
//! Fetches a user's collection and bulk game details as typed records for a
//! data-collection pipeline. Execution is synchronous and single-threaded:
//! network calls block, retries sleep on the calling thread, and multi-chunk
//! fetches run strictly in sequence. Responses pass through an injected
//! [`ResponseCache`]; logging goes through `tracing`, with subscriber setup
//! left to the caller.

pub mod cache;
pub mod client;
pub mod error;
pub mod extract;
pub mod model;
pub mod transport;

pub use cache::{MemoryCache, NoCache, ResponseCache};
pub use client::{BASE_URL, BggClient, RetryPolicy};
pub use error::BggError;
pub use model::game_detail::{ExpansionLink, GameDetail, PlayerCountVerdict, Verdict};
pub use model::owned_game::OwnedGame;
pub use transport::{ConnectionError, FetchedBody, Transport, UreqTransport};
