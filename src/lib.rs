// Sepia: booru search core for chat front-ends.
//
// This is the library root. Each module corresponds to a major subsystem:
// the upstream API client, query composition, per-user preferences, the
// in-memory search session, and the orchestration layer a chat adapter
// consumes.

pub mod booru;
pub mod compose;
pub mod config;
pub mod prefs;
pub mod service;
pub mod session;
