pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod procrastinate;
pub mod query;
pub mod routes;
pub mod store;
pub mod views;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;

/// Cookie-session middleware shared by `main` and the integration tests.
/// Without a configured secret of at least 64 bytes the key is generated at
/// boot, so sessions do not survive restarts.
pub fn session_middleware(secret: Option<&str>) -> SessionMiddleware<CookieSessionStore> {
    let key = match secret {
        Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Some(_) => {
            log::warn!("SESSION_SECRET is shorter than 64 bytes; using a generated key");
            Key::generate()
        }
        None => {
            log::warn!("SESSION_SECRET is not set; using a generated key");
            Key::generate()
        }
    };
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}
