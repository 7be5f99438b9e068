pub mod auth;
pub mod build;
pub mod draft;
pub mod event;
pub mod guest;
pub mod upload;
