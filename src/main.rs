use actix_web::{middleware::Logger, App, HttpServer};
use dotenvy::dotenv;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use storefront_orders::{
    auth::JwtService,
    config::Config,
    repositories::{in_memory::InMemoryStore, mongo::MongoStore},
    routes,
    state::AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_days);

    let state = match &config.mongodb_uri {
        Some(uri) => {
            let store = MongoStore::connect(uri, &config.mongodb_db)
                .await
                .map_err(std::io::Error::other)?;
            AppState::new(store, jwt)
        }
        None => {
            tracing::warn!("MONGODB_URI not set; orders are kept in memory");
            AppState::new(InMemoryStore::default(), jwt)
        }
    };

    tracing::info!("storefront-orders listening on {}", config.server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind(&config.server_addr)?
    .run()
    .await
}
