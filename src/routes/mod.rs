use crate::errors::ApiError;
use crate::handlers;
use actix_web::web::{self, ServiceConfig};

pub fn config(cfg: &mut ServiceConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

    cfg.service(web::scope("/health").route("", web::get().to(handlers::health::ping)))
        .service(
            web::scope("/api/orders")
                .app_data(json)
                .route("", web::get().to(handlers::orders::list_orders))
                .route("", web::post().to(handlers::orders::create_order))
                .route("/summary", web::get().to(handlers::orders::summary))
                .route("/mine", web::get().to(handlers::orders::list_mine))
                .route("/{id}", web::get().to(handlers::orders::get_order))
                .route("/{id}/pay", web::put().to(handlers::orders::pay_order))
                .route(
                    "/{id}/deliver",
                    web::put().to(handlers::orders::deliver_order),
                )
                .route("/{id}", web::delete().to(handlers::orders::delete_order)),
        );
}
