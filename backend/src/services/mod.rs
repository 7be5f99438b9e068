pub mod api_client;
pub mod auth;
pub mod builds;
pub mod eas;
pub mod editor_sessions;
pub mod fixtures;
pub mod guest_import;
pub mod repository;
pub mod upload;
