mod common;

use axum::http::StatusCode;
use common::{request, TestApp};
use lemon_core::domain::Role;
use serde_json::json;

/// Manager-created category and two menu items; returns their ids.
async fn seed_menu(app: &TestApp, manager_token: &str) -> (i64, i64) {
    let (status, category) = app
        .send(request(
            "POST",
            "/api/categories/",
            Some(manager_token),
            Some(json!({ "title": "Mains" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "mains");
    let category_id = category["id"].as_i64().unwrap();

    let (status, soup) = app
        .send(request(
            "POST",
            "/api/menu-items/",
            Some(manager_token),
            Some(json!({ "title": "Soup", "price": "5.00", "inventory": 10, "category_id": category_id })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, pasta) = app
        .send(request(
            "POST",
            "/api/menu-items/",
            Some(manager_token),
            Some(json!({ "title": "Pasta", "price": "5.00", "inventory": 4, "category_id": category_id })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    (soup["id"].as_i64().unwrap(), pasta["id"].as_i64().unwrap())
}

#[tokio::test]
async fn health_endpoints() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(request("GET", "/health/ready", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn anonymous_can_browse_but_not_mutate_menu() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    seed_menu(&app, &manager).await;

    let (status, items) = app.send(request("GET", "/api/menu-items/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(request(
            "POST",
            "/api/menu-items/",
            None,
            Some(json!({ "title": "Cake", "price": "3.00", "category_id": 1 })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (_, customer) = app.user("customer", &[]).await;
    let (status, _) = app
        .send(request(
            "POST",
            "/api/menu-items/",
            Some(&customer),
            Some(json!({ "title": "Cake", "price": "3.00", "category_id": 1 })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_token_is_rejected_even_on_open_routes() {
    let app = TestApp::new();
    let (status, _) = app
        .send(request("GET", "/api/categories/", Some("garbage"), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn menu_listing_search_and_ordering() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    seed_menu(&app, &manager).await;

    let (status, items) = app
        .send(request("GET", "/api/menu-items/?ordering=-inventory", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items[0]["title"], "Soup");

    let (_, items) = app
        .send(request("GET", "/api/menu-items/?search=PAS", None, None))
        .await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["title"], "Pasta");

    let (status, body) = app
        .send(request("GET", "/api/menu-items/?ordering=colour", None, None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn cart_checkout_scenario() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    let (soup, pasta) = seed_menu(&app, &manager).await;
    let (_, customer) = app.user("customer", &[]).await;

    let (status, line) = app
        .send(request(
            "POST",
            "/api/cart/menu-items/",
            Some(&customer),
            Some(json!({ "menu_item_id": soup, "quantity": 2 })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["price"], "10.00");

    let (status, _) = app
        .send(request(
            "POST",
            "/api/cart/menu-items/",
            Some(&customer),
            Some(json!({ "menu_item_id": pasta })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(request(
            "POST",
            "/api/cart/menu-items/",
            Some(&customer),
            Some(json!({ "menu_item_id": pasta })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_CART_ITEM");

    let (status, order) = app
        .send(request("POST", "/api/orders/", Some(&customer), None))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total"], "15.00");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["status"], "not_delivered");

    let (_, cart) = app
        .send(request("GET", "/api/cart/menu-items/", Some(&customer), None))
        .await;
    assert!(cart.as_array().unwrap().is_empty());

    let (status, body) = app
        .send(request("POST", "/api/orders/", Some(&customer), None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_CART");
}

#[tokio::test]
async fn order_visibility_and_update_gate() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    let (soup, _) = seed_menu(&app, &manager).await;
    let (_, alice) = app.user("alice", &[]).await;
    let (_, bob) = app.user("bob", &[]).await;
    let (crew_user, crew) = app.user("crew", &[Role::DeliveryCrew]).await;
    let (_, admin) = app.superuser("admin").await;

    app.send(request(
        "POST",
        "/api/cart/menu-items/",
        Some(&alice),
        Some(json!({ "menu_item_id": soup })),
    ))
    .await;
    let (_, order) = app
        .send(request("POST", "/api/orders/", Some(&alice), Some(json!({ "date": "2024-06-01" }))))
        .await;
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["date"], "2024-06-01");
    let order_uri = format!("/api/orders/{}", order_id);

    let (_, bob_orders) = app.send(request("GET", "/api/orders/", Some(&bob), None)).await;
    assert!(bob_orders.as_array().unwrap().is_empty());
    let (status, _) = app.send(request("GET", &order_uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, crew_orders) = app.send(request("GET", "/api/orders/", Some(&crew), None)).await;
    assert!(crew_orders.as_array().unwrap().is_empty());

    let (_, admin_orders) = app.send(request("GET", "/api/orders/", Some(&admin), None)).await;
    assert_eq!(admin_orders.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(request("PATCH", &order_uri, Some(&alice), Some(json!({ "status": "delivered" }))))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(request(
            "PATCH",
            &order_uri,
            Some(&manager),
            Some(json!({ "delivery_crew": 1 })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, updated) = app
        .send(request(
            "PUT",
            &order_uri,
            Some(&manager),
            Some(json!({ "delivery_crew": crew_user.id })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["delivery_crew_id"], crew_user.id);

    let (status, delivered) = app
        .send(request("PATCH", &order_uri, Some(&crew), Some(json!({ "status": "delivered" }))))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered["status"], "delivered");
    assert_eq!(delivered["total"], "5.00");

    let (status, _) = app.send(request("DELETE", &order_uri, Some(&crew), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send(request("DELETE", &order_uri, Some(&manager), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn group_membership_management() {
    let app = TestApp::new();
    let (manager_user, manager) = app.user("manager", &[Role::Manager]).await;
    let (courier, _) = app.user("courier", &[]).await;
    let (_, customer) = app.user("customer", &[]).await;

    let (status, _) = app
        .send(request("GET", "/api/groups/manager/users/", Some(&customer), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(request("GET", "/api/groups/chefs/users/", Some(&manager), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Group does not exist");

    let (status, added) = app
        .send(request(
            "POST",
            "/api/groups/delivery-crew/users/",
            Some(&manager),
            Some(json!({ "username": "courier" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["id"], courier.id);
    assert!(added.get("password_hash").is_none());

    let (_, members) = app
        .send(request("GET", "/api/groups/Delivery%20Crew/users/", Some(&manager), None))
        .await;
    assert_eq!(members.as_array().unwrap().len(), 1);

    let remove_courier = format!("/api/groups/delivery-crew/users/{}", courier.id);
    let (status, body) = app.send(request("DELETE", &remove_courier, Some(&manager), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = app.send(request("DELETE", &remove_courier, Some(&manager), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_IN_GROUP");

    let (status, body) = app
        .send(request("DELETE", "/api/groups/manager/users/999", Some(&manager), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User does not exist");

    let remove_self = format!("/api/groups/manager/users/{}/", manager_user.id);
    let (status, body) = app.send(request("DELETE", &remove_self, Some(&manager), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "SELF_REMOVAL_FORBIDDEN");
    let roles = app.repos.groups.roles_of(manager_user.id).await.unwrap();
    assert!(roles.contains(&Role::Manager));
}

#[tokio::test]
async fn register_login_and_profile() {
    let app = TestApp::new();

    let (status, user) = app
        .send(request(
            "POST",
            "/auth/users/",
            None,
            Some(json!({ "username": "mario", "password": "lemon-pass-1", "email": "mario@example.com" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "mario");
    assert!(user.get("password_hash").is_none());

    let (status, body) = app
        .send(request(
            "POST",
            "/auth/users/",
            None,
            Some(json!({ "username": "mario", "password": "lemon-pass-1" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_USERNAME");

    let (status, _) = app
        .send(request(
            "POST",
            "/auth/token/login/",
            None,
            Some(json!({ "username": "mario", "password": "wrong-pass" })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, token) = app
        .send(request(
            "POST",
            "/auth/token/login/",
            None,
            Some(json!({ "username": "mario", "password": "lemon-pass-1" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = token["auth_token"].as_str().unwrap().to_string();

    let (status, me) = app
        .send(request("GET", "/auth/users/me/", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "mario");
    assert_eq!(me["access"], "customer");
    assert!(me["groups"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    seed_menu(&app, &manager).await;

    let (status, body) = app
        .send(request("DELETE", "/api/categories/1", Some(&manager), None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CATEGORY_IN_USE");
}

#[tokio::test]
async fn order_delete_follows_visibility() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    let (soup, _) = seed_menu(&app, &manager).await;
    let (_, alice) = app.user("alice", &[]).await;
    let (_, both) = app.user("both", &[Role::Manager, Role::DeliveryCrew]).await;

    app.send(request(
        "POST",
        "/api/cart/menu-items/",
        Some(&alice),
        Some(json!({ "menu_item_id": soup })),
    ))
    .await;
    let (_, order) = app.send(request("POST", "/api/orders/", Some(&alice), None)).await;
    let order_uri = format!("/api/orders/{}", order["id"].as_i64().unwrap());

    let (status, _) = app.send(request("GET", &order_uri, Some(&both), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.send(request("DELETE", &order_uri, Some(&both), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ORDER_NOT_FOUND");

    let (status, _) = app.send(request("GET", &order_uri, Some(&manager), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_cart_quantity_is_rejected() {
    let app = TestApp::new();
    let (_, manager) = app.user("manager", &[Role::Manager]).await;
    let (soup, _) = seed_menu(&app, &manager).await;
    let (_, customer) = app.user("customer", &[]).await;

    let (status, body) = app
        .send(request(
            "POST",
            "/api/cart/menu-items/",
            Some(&customer),
            Some(json!({ "menu_item_id": soup, "quantity": 2_000_000_000 })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, cart) = app
        .send(request("GET", "/api/cart/menu-items/", Some(&customer), None))
        .await;
    assert!(cart.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn customer_cannot_add_group_members() {
    let app = TestApp::new();
    let (customer_user, customer) = app.user("customer", &[]).await;

    let (status, body) = app
        .send(request(
            "POST",
            "/api/groups/manager/users/",
            Some(&customer),
            Some(json!({ "username": "customer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    let roles = app.repos.groups.roles_of(customer_user.id).await.unwrap();
    assert!(roles.is_empty());
}
