//! HTTP request handlers, one module per area.

pub mod auth;
pub mod health;
pub mod pages;
pub mod project_image;
pub mod projects;
