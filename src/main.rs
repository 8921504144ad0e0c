use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;
use taskboard::auth::IdentityStore;
use taskboard::config::Config;
use taskboard::routes::{self, AppState};
use taskboard::storage::FileStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let storage = FileStorage::open(&config.data_file).map_err(|e| {
        error!("cannot open {}: {}", config.data_file.display(), e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let storage = Arc::new(storage);
    let identity = IdentityStore::new(storage.clone())
        .with_bcrypt_cost(config.bcrypt_cost)
        .with_demo_users(config.seed_demo_users);
    let state = AppState::new(storage).with_identity(identity);

    info!(
        "Starting task service at {} (data: {})",
        config.server_url(),
        config.data_file.display()
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
