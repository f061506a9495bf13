//! Authentication: session lifecycle, bearer middleware and `/auth` routes

mod client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;

pub use client::real_ip;
pub use middleware::{require_auth, AuthGate};
pub use models::{AuthContext, AuthResponse, LoginRequest, RenewTokenRequest};
pub use service::{AuthService, TokenLifetimes};
