//! Application state and route configuration.

use std::sync::Arc;

use actix_web::web;

use ec_core::services::{AuthService, ChatService, UserAdminService};
use ec_infra::chat::ChatBackend;
use ec_infra::database::mysql::{
    MySqlRefreshTokenRepository, MySqlUserRepository, MySqlVerificationCodeRepository,
};
use ec_infra::password::BcryptPasswordHasher;
use ec_infra::rate_limit::MySqlRateLimiter;
use ec_infra::sms::SmsBackend;

use crate::middleware::SessionGate;
use crate::routes;

/// Concrete service types used by the running server.
pub type LiveAuthService = AuthService<
    MySqlUserRepository,
    MySqlVerificationCodeRepository,
    MySqlRefreshTokenRepository,
    BcryptPasswordHasher,
    SmsBackend,
    MySqlRateLimiter,
>;
pub type LiveAdminService = UserAdminService<MySqlUserRepository, MySqlRefreshTokenRepository>;
pub type LiveChatService = ChatService<MySqlRateLimiter, ChatBackend>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<LiveAuthService>,
    pub admin: Arc<LiveAdminService>,
    pub chat: Arc<LiveChatService>,
}

/// Register all routes.
///
/// The `/auth` endpoints are public; `/chat` and `/users` sit behind the
/// session gate.
pub fn configure(cfg: &mut web::ServiceConfig, gate: &SessionGate) {
    cfg.route("/health", web::get().to(routes::health::health));

    cfg.service(
        web::scope("/auth")
            .route("/send-code", web::post().to(routes::auth::send_code))
            .route("/login-with-code", web::post().to(routes::auth::login_with_code))
            .route(
                "/login-with-password",
                web::post().to(routes::auth::login_with_password),
            )
            .route("/set-password", web::post().to(routes::auth::set_password))
            .route("/refresh", web::post().to(routes::auth::refresh))
            .route("/logout", web::post().to(routes::auth::logout)),
    );

    cfg.service(
        web::scope("/chat")
            .wrap(gate.clone())
            .route("/completions", web::post().to(routes::chat::completions)),
    );

    cfg.service(
        web::scope("/users")
            .wrap(gate.clone())
            .route("/{id}/role", web::put().to(routes::users::change_role))
            .route("/{id}/suspend", web::post().to(routes::users::suspend))
            .route("/{id}/unsuspend", web::post().to(routes::users::unsuspend))
            .route("/{id}", web::delete().to(routes::users::delete)),
    );
}
