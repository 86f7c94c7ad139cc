//! Route table and the middleware stack

use axum::{
    http::{header, HeaderName, Method, Request},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handlers::{auth, cart, categories, groups, health, menu_items, orders};
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/categories/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/{id}", delete(categories::delete_category))
        .route(
            "/menu-items/",
            get(menu_items::list_menu_items).post(menu_items::create_menu_item),
        )
        .route(
            "/menu-items/{id}",
            get(menu_items::get_menu_item)
                .put(menu_items::update_menu_item)
                .patch(menu_items::update_menu_item)
                .delete(menu_items::delete_menu_item),
        )
        .route(
            "/cart/menu-items/",
            get(cart::list_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route("/orders/", get(orders::list_orders).post(orders::place_order))
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route(
            "/groups/{group_name}/users/",
            get(groups::list_members).post(groups::add_member),
        )
        .route(
            "/groups/{group_name}/users/{user_id}",
            delete(groups::remove_member),
        )
        .route(
            "/groups/{group_name}/users/{user_id}/",
            delete(groups::remove_member),
        );

    let auth_routes = Router::new()
        .route("/users/", post(auth::register))
        .route("/users/me/", get(auth::me))
        .route("/token/login/", post(auth::login));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", api)
        .nest("/auth", auth_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(trace_layer)
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors),
        )
}
