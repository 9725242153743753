// Booru API client — request construction, response normalization, fallback.
//
// The upstream DAPI is stateless and loose about response shapes, so the
// client boundary owns all of the defensive handling: everything past this
// module sees typed `Post`/`Tag`/`Comment` lists and nothing else.

pub mod client;
pub mod criteria;
pub mod error;
pub mod models;
pub mod normalize;
