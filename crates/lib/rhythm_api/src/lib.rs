//! # rhythm_api
//!
//! HTTP API library for Rhythm.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};

use rhythm_core::auth::jwt::TokenService;
use rhythm_core::payment::PaymentProcessor;
use rhythm_core::repository::Repository;
use rhythm_core::store::DocumentStore;

use crate::config::ApiConfig;
use crate::handlers::{carts, classes, instructors, jwt, payments, system, users};
use crate::middleware::auth::{optional_auth, require_admin, require_auth};

/// Shared application state passed to all handlers.
///
/// Built once at startup; every request shares the same store handle.
#[derive(Clone)]
pub struct AppState {
    /// Typed access to all collections.
    pub repo: Repository,
    /// Token signer/verifier.
    pub tokens: TokenService,
    /// External payment processor.
    pub payments: Arc<dyn PaymentProcessor>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            repo: Repository::new(store),
            tokens: TokenService::new(config.jwt_secret.as_bytes()),
            payments,
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::ROOT, get(system::root_handler))
        .route(routes::HEALTH, get(system::health_handler))
        .route(routes::JWT, post(jwt::issue_token_handler))
        .route(routes::USERS, post(users::register_handler))
        .route(routes::USER_ROLE, patch(users::assign_role_handler))
        .route(routes::USER, delete(users::delete_user_handler))
        .route(routes::CLASSES, post(classes::create_class_handler))
        .route(
            routes::CLASS,
            get(classes::get_class_handler)
                .patch(classes::patch_class_handler)
                .delete(classes::delete_class_handler),
        )
        .route(routes::UPDATE_CLASS, patch(classes::patch_class_handler))
        .route(routes::CLASS_STATUS, patch(classes::moderate_class_handler))
        .route(routes::CLASS_SEATS, patch(classes::update_seats_handler))
        .route(
            routes::INSTRUCTORS,
            get(instructors::list_instructors_handler),
        )
        .route(routes::CARTS, post(carts::add_to_cart_handler))
        .route(routes::CART, delete(carts::remove_from_cart_handler))
        .route(
            routes::PAYMENT,
            get(payments::list_payments_handler).post(payments::record_payment_handler),
        );

    // Token checked only when the caller sends one
    let optional = Router::new()
        .route(routes::CLASSES, get(classes::list_classes_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::USER_ROLE, get(users::check_role_handler))
        .route(routes::CARTS, get(carts::list_cart_handler))
        .route(
            routes::CREATE_PAYMENT_INTENT,
            post(payments::create_payment_intent_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Admin routes (require auth + stored admin role)
    let admin = Router::new()
        .route(routes::USERS, get(users::list_users_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(optional)
        .merge(protected)
        .merge(admin)
        .fallback(system::not_found_handler)
        .layer(cors)
        .with_state(state)
}
