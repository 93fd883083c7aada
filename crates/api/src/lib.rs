pub mod auth;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use metrics::init_metrics;
pub use state::AppState;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router: the booking kernel's HTTP surface, plus
/// the auth, category, item, review, and messaging collaborators it needs
/// to be exercised end to end.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::prometheus::metrics))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::get_self))
        // Users
        .route(
            "/users/me",
            get(routes::users::get_me).put(routes::users::update_me),
        )
        .route("/users/:id", get(routes::users::get_user))
        // Categories
        .route(
            "/categories",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get_category).delete(routes::categories::delete_category),
        )
        // Items
        .route(
            "/items",
            get(routes::items::search_items).post(routes::items::create_item),
        )
        .route(
            "/items/:id",
            get(routes::items::get_item)
                .put(routes::items::update_item)
                .delete(routes::items::delete_item),
        )
        .route("/items/:id/availability", get(routes::availability::get_availability))
        .route("/items/:id/price-preview", get(routes::availability::preview_price))
        // Bookings
        .route(
            "/bookings",
            post(routes::bookings::create_booking).get(routes::bookings::list_my_bookings),
        )
        .route("/bookings/:id", get(routes::bookings::get_booking))
        .route(
            "/bookings/:id/transition",
            post(routes::bookings::transition_booking),
        )
        // Reviews
        .route("/reviews", post(routes::reviews::create_review))
        // Conversations and messages
        .route(
            "/conversations",
            post(routes::conversations::open_conversation)
                .get(routes::conversations::list_conversations),
        )
        .route(
            "/conversations/:id/messages",
            get(routes::conversations::list_messages).post(routes::conversations::send_message),
        )
        .route("/conversations/:id/read", put(routes::conversations::mark_read))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
