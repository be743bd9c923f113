pub mod auth_service;
pub mod auth_service_impl;

pub use auth_service::{AuthError, AuthService, SessionState};
pub use auth_service_impl::DemoAuthService;
