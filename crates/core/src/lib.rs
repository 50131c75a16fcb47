//! Scoring and effect-resolution engine for a poker roguelike. Keep this
//! crate free of IO and platform concerns.

pub mod boss;
pub mod cards;
pub mod config;
pub mod deck;
pub mod effects;
pub mod events;
pub mod hand;
pub mod inventory;
pub mod joker;
pub mod levels;
pub mod pipeline;
pub mod rng;
pub mod run;
pub mod scoring;
pub mod state;

pub use boss::*;
pub use cards::*;
pub use config::*;
pub use deck::*;
pub use effects::*;
pub use events::*;
pub use hand::*;
pub use inventory::*;
pub use joker::*;
pub use levels::*;
pub use pipeline::*;
pub use rng::*;
pub use run::*;
pub use scoring::*;
pub use state::*;
