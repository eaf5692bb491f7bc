//! Voice feature-search API client for speaker identification.
//!
//! This crate talks to an iFLYTEK-style voiceprint service: a closed roster
//! of enrolled voice features ("group") that short audio clips are matched
//! against. Requests are HMAC-SHA256 signed, audio travels base64-encoded in
//! a JSON envelope, and results come back as a ranked `scoreList`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quorum_voiceprint::{Client, IdentifyPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder("your-app-id")
//!         .api_key("your-api-key")
//!         .api_secret("your-api-secret")
//!         .group_id("meeting-room")
//!         .build()?;
//!
//!     let clip = std::fs::read("clip.wav")?;
//!
//!     // Raw roster lookup: ranked candidates with scores.
//!     let candidates = client.roster().search(&clip, 5).await?;
//!
//!     // Thresholded identification with gap rescue.
//!     if let Some(id) = client.identify(&clip, &IdentifyPolicy::default()).await? {
//!         println!("{} ({:.3})", id.name, id.score);
//!     }
//!
//!     let _ = candidates;
//!     Ok(())
//! }
//! ```
//!
//! # Identification modes
//!
//! [`IdentifyPolicy`] controls how a ranked candidate list becomes a
//! decision: a high-confidence absolute threshold, a "gap rescue" for short
//! clips whose winner is far ahead of the runner-up, or
//! [`IdentifyPolicy::unconditional`] which always takes the top candidate and
//! leaves thresholding to the caller.

mod auth;
mod client;
mod error;
mod http;
mod identify;
mod protocol;
mod roster;

pub use client::{Client, ClientBuilder, DEFAULT_HOST, DEFAULT_MAX_RETRIES, DEFAULT_PATH};
pub use error::{Error, Result};
pub use identify::{Candidate, Identification, IdentifyPolicy};
pub use protocol::{FeatureEntry, ResponseHeader};
pub use roster::RosterService;
