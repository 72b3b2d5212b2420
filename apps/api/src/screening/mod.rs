// Candidate screening: reconciliation, display scoring, comparison, and the
// submission flow that feeds them.
// The pure parts (reconcile, score, comparison, experience) never touch HTTP.

pub mod comparison;
pub mod experience;
pub mod handlers;
pub mod pipeline;
pub mod reconcile;
pub mod score;
pub mod session;
pub mod view;
