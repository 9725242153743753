// Orchestration layer — what a chat adapter (or the CLI) actually calls.
//
// Each submodule coordinates one area: settings mutations, tag lookup,
// and the search/pagination flow.

pub mod chat;
pub mod tags;
pub mod users;
