use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use tickethub_server::auth::TokenDirectory;
use tickethub_server::config::Config;
use tickethub_server::routes::create_routes;
use tickethub_server::seed::{self, demo_token, ticket_id, user_id};
use tickethub_server::state::AppState;
use tickethub_server::store::InMemoryCatalog;
use tickethub_server::utils::clock::ManualClock;

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

fn app() -> TestApp {
    let catalog = Arc::new(InMemoryCatalog::new());
    let tokens = Arc::new(TokenDirectory::new());
    seed::load(catalog.as_ref(), &tokens).unwrap();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap(),
    ));
    let config = Config::default();
    let state = AppState::new(catalog, tokens, clock.clone(), config.cancellation_window());

    TestApp {
        router: create_routes(state, &config),
        clock,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn as_user(n: u128) -> Option<String> {
    Some(demo_token(n))
}

async fn ticket_json(app: &TestApp, n: u128) -> Value {
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/tickets/{}", ticket_id(n)),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["ticket"].clone()
}

#[tokio::test]
async fn health_check_reports_ok_with_security_headers() {
    let app = app();
    let request = Request::get("/api/health").body(Body::empty()).unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap())
            .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "OK");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["details"]["path"], "/api/nowhere");
}

#[tokio::test]
async fn listing_defaults_to_active_newest_first() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/tickets", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let tickets = body["data"]["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 7);
    assert!(tickets.iter().all(|t| t["status"] == "active"));
    assert_eq!(tickets[0]["title"], "Comedy Night with Dave Chappelle");
    assert_eq!(body["data"]["pagination"]["totalItems"], 7);
    assert_eq!(body["data"]["pagination"]["itemsPerPage"], 20);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/tickets?location=new%20york&sortBy=price&sortOrder=asc&limit=2&page=1",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Comedy Night with Dave Chappelle", "Broadway Musical - Hamilton"]
    );
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);
}

fn first_title(body: &Value) -> &str {
    body["data"]["tickets"][0]["title"].as_str().unwrap()
}

#[tokio::test]
async fn listing_sorts_by_any_field_and_ignores_unknown_ones() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/tickets?sortBy=secret", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_title(&body), "World Cup Cricket Final 2024");
    assert_eq!(body["data"]["pagination"]["totalItems"], 7);

    let uri = "/api/tickets?sortBy=type&sortOrder=asc";
    let (status, body) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_title(&body), "Shakespeare in the Park - Hamlet");

    for field in ["status", "seller_name", "description"] {
        let uri = format!("/api/tickets?sortBy={}", field);
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{}", field);
    }
}

#[tokio::test]
async fn listing_treats_blank_price_bounds_as_unset() {
    let app = app();
    let uri = "/api/tickets?minPrice=&maxPrice=&category=";
    let (status, body) = send(&app, Method::GET, uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalItems"], 7);

    let uri = "/api/tickets?minPrice=cheap";
    let (status, body) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn purchase_requires_authentication() {
    let app = app();
    let order = json!({ "ticket_id": ticket_id(1), "quantity": 1 });

    let (status, body) =
        send(&app, Method::POST, "/api/purchases", None, Some(order.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some("forged".to_string()),
        Some(order),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buying_last_units_sells_out_and_cancel_restores() {
    let app = app();
    let before = ticket_json(&app, 4).await;
    assert_eq!(before["available_quantity"], 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(2),
        Some(json!({ "ticket_id": ticket_id(4), "quantity": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let purchase = &body["data"]["purchase"];
    assert_eq!(purchase["status"], "confirmed");
    assert_eq!(purchase["total_amount"], "1799.98");
    assert_eq!(purchase["buyer_id"], user_id(2).to_string());
    assert_eq!(purchase["ticket"]["available_quantity"], 0);
    assert_eq!(purchase["ticket"]["sold_quantity"], 20);
    assert_eq!(purchase["ticket"]["status"], "sold_out");

    let purchase_id = purchase["id"].as_str().unwrap().to_string();
    app.clock.advance(Duration::hours(2));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/purchases/{}/cancel", purchase_id),
        as_user(2),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["purchase"]["status"], "cancelled");

    let after = ticket_json(&app, 4).await;
    assert_eq!(after["available_quantity"], 2);
    assert_eq!(after["sold_quantity"], 18);
    assert_eq!(after["status"], "active");
}

#[tokio::test]
async fn purchase_errors_map_to_client_codes() {
    let app = app();

    let cases = [
        (ticket_id(1), 0, 2, StatusCode::BAD_REQUEST, "INVALID_QUANTITY"),
        (ticket_id(99), 1, 2, StatusCode::NOT_FOUND, "NOT_FOUND"),
        (ticket_id(7), 1, 1, StatusCode::BAD_REQUEST, "INSUFFICIENT_INVENTORY"),
        (ticket_id(4), 5, 1, StatusCode::BAD_REQUEST, "INSUFFICIENT_INVENTORY"),
        (ticket_id(1), 1, 1, StatusCode::BAD_REQUEST, "SELF_PURCHASE_FORBIDDEN"),
    ];

    for (ticket, quantity, user, expected_status, expected_code) in cases {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/purchases",
            as_user(user),
            Some(json!({ "ticket_id": ticket, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, expected_status, "{}", expected_code);
        assert_eq!(body["error"]["code"], expected_code);
    }

    let untouched = ticket_json(&app, 1).await;
    assert_eq!(untouched["available_quantity"], 45);
    assert_eq!(untouched["sold_quantity"], 25);
}

#[tokio::test]
async fn purchase_body_validation() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(2),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(2),
        Some(json!({ "ticket_id": "no-such-ticket", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(2),
        Some(json!({ "ticket_id": "no-such-ticket", "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUANTITY");
}

#[tokio::test]
async fn purchase_accepts_numeric_string_quantity() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(2),
        Some(json!({ "ticket_id": ticket_id(1), "quantity": "2" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["purchase"]["quantity"], 2);
    assert_eq!(body["data"]["purchase"]["total_amount"], "599.98");
    assert_eq!(ticket_json(&app, 1).await["available_quantity"], 43);
}

#[tokio::test]
async fn cancel_rules_are_enforced() {
    let app = app();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(3),
        Some(json!({ "ticket_id": ticket_id(1), "quantity": 1 })),
    )
    .await;
    let uri = format!(
        "/api/purchases/{}/cancel",
        body["data"]["purchase"]["id"].as_str().unwrap()
    );

    let (status, body) = send(&app, Method::PUT, &uri, as_user(4), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    app.clock.advance(Duration::hours(25));
    let (status, body) = send(&app, Method::PUT, &uri, as_user(3), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CANCELLATION_WINDOW_EXPIRED");

    let ticket = ticket_json(&app, 1).await;
    assert_eq!(ticket["available_quantity"], 44);

    let uri = "/api/purchases/garbage/cancel";
    let (status, _) = send(&app, Method::PUT, uri, as_user(3), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelling_twice_is_rejected() {
    let app = app();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(3),
        Some(json!({ "ticket_id": ticket_id(2), "quantity": 3 })),
    )
    .await;
    let uri = format!(
        "/api/purchases/{}/cancel",
        body["data"]["purchase"]["id"].as_str().unwrap()
    );

    let (status, _) = send(&app, Method::PUT, &uri, as_user(3), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::PUT, &uri, as_user(3), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ALREADY_CANCELLED");
    assert_eq!(ticket_json(&app, 2).await["available_quantity"], 15);
}

#[tokio::test]
async fn purchase_history_views() {
    let app = app();

    let uri = "/api/purchases/my-purchases";
    let (status, body) = send(&app, Method::GET, uri, as_user(1), None).await;
    assert_eq!(status, StatusCode::OK);
    let purchases = body["data"]["purchases"].as_array().unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0]["ticket"]["id"], ticket_id(5).to_string());

    let uri = "/api/purchases/sales/my-sales";
    let (status, body) = send(&app, Method::GET, uri, as_user(1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sales"].as_array().unwrap().len(), 1);

    let uri = format!("/api/purchases/{}", seed::purchase_id(1));
    let (status, _) = send(&app, Method::GET, &uri, as_user(2), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, &uri, as_user(3), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn seller_manages_own_listing() {
    let app = app();
    let listing = json!({
        "title": "Cup Final",
        "description": "Block 112, row F",
        "category": "sports",
        "type": "general",
        "price": 65.5,
        "expiry_time": "2024-05-25T15:00:00Z",
        "location": "Wembley Stadium, London",
        "available_quantity": 4
    });

    let (status, body) = send(&app, Method::POST, "/api/tickets", as_user(5), Some(listing)).await;
    assert_eq!(status, StatusCode::CREATED);
    let ticket = &body["data"]["ticket"];
    assert_eq!(ticket["seller_name"], "Alex Brown");
    assert_eq!(ticket["status"], "active");
    let uri = format!("/api/tickets/{}", ticket["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        as_user(1),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        as_user(5),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ticket"]["status"], "cancelled");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/tickets/user/my-tickets",
        as_user(5),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tickets"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::DELETE, &uri, as_user(5), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivated_listing_cannot_be_bought() {
    let app = app();
    let uri = format!("/api/tickets/{}", ticket_id(8));
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        as_user(3),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        as_user(1),
        Some(json!({ "ticket_id": ticket_id(8), "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "TICKET_UNAVAILABLE");
}

#[tokio::test]
async fn ticket_detail_counts_views() {
    let app = app();
    let first = ticket_json(&app, 3).await;
    let second = ticket_json(&app, 3).await;
    assert_eq!(first["views"], 891);
    assert_eq!(second["views"], 892);
}

#[tokio::test]
async fn user_stats_summarise_both_sides() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/users/stats", as_user(1), None).await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalTicketsListed"], 2);
    assert_eq!(stats["activeTickets"], 2);
    assert_eq!(stats["soldOutTickets"], 0);
    assert_eq!(stats["totalTicketsSold"], 67);
    assert_eq!(stats["totalRevenue"], "599.98");
    assert_eq!(stats["totalViews"], 3350);
    assert_eq!(stats["totalInquiries"], 123);
    assert_eq!(stats["totalPurchases"], 1);
    assert_eq!(stats["totalSpent"], "250.00");
    assert_eq!(stats["confirmedPurchases"], 1);
    assert_eq!(stats["recentSales"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn public_user_profiles() {
    let app = app();

    let uri = format!("/api/users/{}", user_id(2));
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Jane Smith");
    assert!(body["data"]["user"].get("email").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert_eq!(body["data"]["activeTicketsCount"], 1);

    let (status, body) = send(&app, Method::GET, "/api/users?search=JO&limit=5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["John Doe", "Mike Johnson"]);

    let (status, _) = send(&app, Method::GET, "/api/users/nobody", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
