//! Client-side session: input, generation lifecycle, favorites and speech
//! modes, all owned by one [`SessionController`].

pub mod controller;
pub mod favorites;
pub mod state;
pub mod store;

pub use controller::{RequestId, SessionController, SessionEvent, NO_SYNTHESIZER_NOTICE};
pub use favorites::{FavoritesList, FAVORITES_KEY};
pub use state::{GenerationState, SessionInput, SpeechState};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
