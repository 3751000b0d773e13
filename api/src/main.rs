use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use ec_api::app::{self, AppState};
use ec_api::middleware::{cors::create_cors, SessionGate};
use ec_core::repositories::UserRepository;
use ec_core::services::{
    AuthService, AuthServiceConfig, ChatService, CleanupConfig, CleanupTask, TokenIssuer,
    TokenIssuerConfig, UserAdminService,
};
use ec_infra::chat::ChatBackend;
use ec_infra::database::mysql::{
    MySqlRefreshTokenRepository, MySqlUserRepository, MySqlVerificationCodeRepository,
};
use ec_infra::database::create_pool;
use ec_infra::password::BcryptPasswordHasher;
use ec_infra::rate_limit::MySqlRateLimiter;
use ec_infra::sms::SmsBackend;
use ec_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(environment = %config.environment, "starting EchoChat API server");

    // Storage
    let pool = create_pool(&config.database).await?;
    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let codes = Arc::new(MySqlVerificationCodeRepository::new(pool.clone()));
    let tokens = Arc::new(MySqlRefreshTokenRepository::new(pool.clone()));
    let rate_limiter = Arc::new(MySqlRateLimiter::new(pool.clone()));

    // Collaborators
    let issuer = Arc::new(TokenIssuer::new(TokenIssuerConfig::from_jwt_config(
        &config.auth.jwt,
    )?));
    let hasher = Arc::new(BcryptPasswordHasher::new());
    let sms = Arc::new(SmsBackend::from_env(config.environment)?);
    let chat_backend = Arc::new(ChatBackend::from_env(config.environment)?);

    // Services
    let auth = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&codes),
        Arc::clone(&tokens),
        hasher,
        sms,
        Arc::clone(&rate_limiter),
        Arc::clone(&issuer),
        AuthServiceConfig::from_config(&config.auth, config.environment),
    ));
    let admin = Arc::new(UserAdminService::new(
        Arc::clone(&users),
        Arc::clone(&tokens),
    ));
    let chat = Arc::new(ChatService::new(rate_limiter, chat_backend));

    // Expired-code/token sweeps run off the request path
    tokio::spawn(
        CleanupTask::new(
            Arc::clone(&codes),
            Arc::clone(&tokens),
            CleanupConfig::default(),
        )
        .run(),
    );

    let user_loader: Arc<dyn UserRepository> = users;
    let gate = SessionGate::new(Arc::clone(&issuer), user_loader);
    #[cfg(debug_assertions)]
    let gate = if config.auth.auth_bypass {
        warn!("AUTH_BYPASS enabled: credential checks are disabled");
        gate.with_bypass()
    } else {
        gate
    };
    #[cfg(not(debug_assertions))]
    if config.auth.auth_bypass {
        warn!("AUTH_BYPASS requested but ignored in release builds");
    }

    let state = AppState { auth, admin, chat };
    let bind_address = config.server.bind_address();
    info!(%bind_address, "binding HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| app::configure(cfg, &gate))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
