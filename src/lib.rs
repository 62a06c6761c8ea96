pub mod config;
pub mod errors;
pub mod github;
pub mod manifest;
pub mod release;
pub mod vcs;
