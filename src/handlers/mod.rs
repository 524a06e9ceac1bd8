// One module per resource collection; routes are wired in `server.rs`
pub mod history;
pub mod root;
pub mod rules;
pub mod templates;
pub mod utils;
