//! Genre inference engine for Genrewise.
//!
//! Scores every rule of a validated rule book against a song's facts, ranks
//! the recommendations that fired, and explains each one.
//!
//! # Example
//!
//! ```
//! use genrewise_engine::{Outcome, Request, Session};
//!
//! let session = Session::builtin().unwrap();
//! let request = Request::new()
//!     .with("year", 1969)
//!     .with("bpm", "fast")
//!     .with("vocals", "upbeat")
//!     .with("instruments", vec!["acoustic_guitar", "bongos", "bass"]);
//!
//! let answer = session.submit(&request).unwrap();
//! match answer.outcome() {
//!     Outcome::Matched(ranking) => {
//!         for rec in ranking {
//!             println!("{}: {} ({})", rec.genre, rec.confidence_percent(), rec.reason);
//!         }
//!     }
//!     Outcome::NoMatch => println!("no genre matched"),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod ranking;
pub mod session;

pub use engine::{InferenceEngine, RuleTrace};
pub use error::QueryError;
pub use ranking::{aggregate, rank, Ranking};
pub use session::{Answer, Outcome, Request, Session};
