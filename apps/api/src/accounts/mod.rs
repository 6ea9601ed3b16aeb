// Accounts: registration, login, credential maintenance and the one-per-user profile.

pub mod handlers;
pub mod profile;
pub mod service;
