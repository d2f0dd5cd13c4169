mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use middleware::access::AccessPolicy;
use middleware::auth::AuthMiddleware;
use services::firebase_service::FirebaseAuth;
use services::payment_service::StripeClient;
use utils::AppError;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("MONGODB_URI").expect("MONGODB_URI must be set");

    log::info!("🚀 Starting RedLife Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db);

    log::info!("✅ MongoDB connected successfully");

    // Identity verifier e gateway de pagamento construídos uma vez e injetados
    let firebase = FirebaseAuth::from_env().expect("FIREBASE_PROJECT_ID must be set");
    let firebase_data = web::Data::new(firebase);

    let stripe = StripeClient::from_env().expect("STRIPE_SECRET_KEY must be set");
    let stripe_data = web::Data::new(stripe);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(firebase_data.clone())
            .app_data(stripe_data.clone())
            // Erros de extração também saem no envelope padronizado
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                AppError::InvalidRequest(err.to_string()).into()
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                AppError::InvalidRequest(err.to_string()).into()
            }))
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // ==================== FUNDS & PAYMENTS ====================
            // O actix executa o wrap registrado por último primeiro:
            // AuthMiddleware sempre por fora do gate de role/status.
            .service(
                web::resource("/funds")
                    .route(web::get().to(api::funds::list).wrap(AuthMiddleware))
                    .route(
                        web::post()
                            .to(api::funds::create)
                            .wrap(AccessPolicy::active())
                            .wrap(AuthMiddleware),
                    ),
            )
            .route("/funds-count", web::get().to(api::funds::count))
            .route("/admin/funding/total", web::get().to(api::funds::total))
            .route(
                "/create-payment-intent",
                web::post()
                    .to(api::payments::create_payment_intent)
                    .wrap(AccessPolicy::active())
                    .wrap(AuthMiddleware),
            )
            // ==================== USERS ====================
            .route("/add-user", web::post().to(api::users::add_user))
            .service(
                web::resource("/user/{email}")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(api::users::get_user))
                    .route(web::put().to(api::users::update_profile)),
            )
            .route("/all-users", web::get().to(api::users::all_users))
            .route("/all-users-count", web::get().to(api::users::all_users_count))
            .route("/donors/search", web::get().to(api::users::search_donors))
            .route("/admin/users/count", web::get().to(api::users::admin_users_count))
            .route(
                "/user/{id}/role",
                web::patch()
                    .to(api::users::set_role)
                    .wrap(AccessPolicy::admin())
                    .wrap(AuthMiddleware),
            )
            .route(
                "/user/{id}/status",
                web::patch()
                    .to(api::users::set_status)
                    .wrap(AccessPolicy::admin())
                    .wrap(AuthMiddleware),
            )
            // ==================== DONATION REQUESTS ====================
            .route(
                "/create-donate-request",
                web::post()
                    .to(api::donations::create)
                    .wrap(AccessPolicy::active())
                    .wrap(AuthMiddleware),
            )
            .route("/all-my-donation-count", web::get().to(api::donations::my_count))
            .route(
                "/my-all-donation-request/{email}",
                web::get().to(api::donations::my_requests),
            )
            .route("/donation-requests", web::get().to(api::donations::list))
            .route(
                "/all-blood-donation-request",
                web::get().to(api::donations::list_paginated),
            )
            .route("/all-donation-count", web::get().to(api::donations::count))
            .route(
                "/admin/blood-requests/count",
                web::get().to(api::donations::admin_count),
            )
            .service(
                web::resource("/donation-request")
                    .route(web::get().to(api::donations::recent)),
            )
            .service(
                web::resource("/donation-request/{id}")
                    .route(web::get().to(api::donations::get_by_id))
                    .route(web::put().to(api::donations::update_status))
                    .route(web::delete().to(api::donations::delete)),
            )
            .route(
                "/donation-requests/{id}",
                web::patch().to(api::donations::patch),
            )
            // ==================== BLOGS ====================
            .service(
                web::resource("/blogs")
                    .route(web::post().to(api::blogs::create))
                    .route(
                        web::get()
                            .to(api::blogs::list)
                            .wrap(AccessPolicy::volunteer_or_admin())
                            .wrap(AuthMiddleware),
                    ),
            )
            .route("/all-blogs", web::get().to(api::blogs::list_all))
            .route("/all-blogs-count", web::get().to(api::blogs::count))
            .route("/blogs-published", web::get().to(api::blogs::published))
            .service(
                web::resource("/blogs/{id}")
                    .route(web::get().to(api::blogs::get_by_id))
                    .route(
                        web::patch()
                            .to(api::blogs::set_status)
                            .wrap(AccessPolicy::volunteer_or_admin())
                            .wrap(AuthMiddleware),
                    ),
            )
            .route(
                "/blog/{id}",
                web::delete()
                    .to(api::blogs::delete)
                    .wrap(AccessPolicy::admin())
                    .wrap(AuthMiddleware),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
