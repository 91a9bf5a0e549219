#![allow(missing_docs)]

pub mod autosave;
pub mod config;
pub mod draft;
pub mod error;
pub mod resolver;
pub mod runtime;
pub mod session;

pub use autosave::Autosave;
pub use config::EngineConfig;
pub use draft::{
    DEFAULT_DRAFT_KEY, Draft, DraftError, DraftSlot, DraftStore, FileDraftStore,
    MemoryDraftStore,
};
pub use error::SessionError;
pub use resolver::{OptionOutcome, OptionsResolver};
pub use runtime::FormRuntime;
pub use session::{FormSession, SessionState};
