use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info, warn};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;

use taskforge_auth::auth::{AuthService, TokenCodec};
use taskforge_auth::config::Config;
use taskforge_auth::routes;
use taskforge_auth::store::PgCredentialStore;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    let store = PgCredentialStore::new(pool);
    store
        .migrate()
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;

    let tokens = TokenCodec::new(config.jwt_secret.as_bytes());
    let service = web::Data::new(AuthService::new(Arc::new(store), tokens));

    let allowed_origin = config.allowed_origin.clone();
    if allowed_origin.is_none() {
        warn!("ALLOWED_ORIGIN is not set; cross-origin requests will not carry the session cookie");
    }

    info!("Starting TaskForge auth server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(routes::cors(allowed_origin.as_deref()))
            .wrap(Logger::default())
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
