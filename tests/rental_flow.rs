//! End-to-end rental flow: quote the date range, pay, receive the invoice.

mod common;

use chrono::{Duration, Utc};
use common::{FindeksMode, StubBackend, TestServer, MEMBER_EMAIL};
use serde_json::{json, Value};

fn dates(days: i64) -> (String, String) {
    // ---
    let rent = Utc::now().date_naive() + Duration::days(1);
    let ret = rent + Duration::days(days);
    (rent.to_string(), ret.to_string())
}

fn valid_card() -> Value {
    // ---
    json!({
        "cardNumber": "4111 1111 1111 1111",
        "cardHolder": "Kerem Test",
        "expiry": "12/39",
        "cvv": "123"
    })
}

// ============================================================================
// Quotes
// ============================================================================

#[tokio::test]
#[serial_test::serial]
async fn quote_prices_a_three_day_rental() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": rent, "returnDate": ret }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // 3 days at 200/day, score 600 against a 500 floor
    let body: Value = response.json().await.expect("Failed to parse JSON");
    let quote = &body["data"];
    assert_eq!(quote["days"], json!(3));
    assert_eq!(quote["totalPrice"], json!(600.0));
    assert_eq!(quote["eligible"], json!(true));
    assert_eq!(quote["paymentEnabled"], json!(true));
}

#[tokio::test]
#[serial_test::serial]
async fn same_day_quote_is_free_but_not_payable() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(0);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": rent, "returnDate": ret }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["totalPrice"], json!(0.0));
    assert_eq!(body["data"]["paymentEnabled"], json!(false));
}

#[tokio::test]
#[serial_test::serial]
async fn quote_rejects_return_before_pickup() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": ret, "returnDate": rent }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial_test::serial]
async fn quote_for_unknown_car_is_404() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 99, "rentDate": rent, "returnDate": ret }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[serial_test::serial]
async fn quote_marks_ineligible_when_score_is_below_the_floor() {
    // ---
    // Car 2 requires 700; the member scores 600.
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 2, "rentDate": rent, "returnDate": ret }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["eligible"], json!(false));
    assert_eq!(body["data"]["paymentEnabled"], json!(false));
}

#[tokio::test]
#[serial_test::serial]
async fn unavailable_score_service_degrades_to_zero() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Unavailable).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/rentals/quote"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": rent, "returnDate": ret }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["findeksScore"], json!(0));
    assert_eq!(body["data"]["eligible"], json!(false));
}

// ============================================================================
// Payment
// ============================================================================

#[tokio::test]
#[serial_test::serial]
async fn payment_persists_the_rental_and_returns_an_invoice() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&json!({
            "carId": 1,
            "rentDate": rent,
            "returnDate": ret,
            "card": valid_card()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // The invoice comes back as a download
    let disposition = response
        .headers()
        .get("content-disposition")
        .expect("no content-disposition header")
        .to_str()
        .expect("header should be ASCII")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"INV-"));

    let body: Value = response.json().await.expect("Failed to parse JSON");
    let invoice = &body["data"];
    assert!(invoice["invoiceNumber"].as_str().is_some_and(|n| n.starts_with("INV-")));
    assert_eq!(invoice["days"], json!(3));
    assert_eq!(invoice["totalPrice"], json!(600.0));
    assert_eq!(invoice["maskedCardNumber"], json!("************1111"));
    assert_eq!(invoice["brandName"], json!("BMW"));
    assert_eq!(invoice["currency"], json!("TL"));

    // The rental reached the backend with the priced intent
    let rentals = stub.recorded_rentals();
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0]["carId"], json!(1));
    assert_eq!(rentals[0]["totalPrice"], json!(600.0));
}

#[tokio::test]
#[serial_test::serial]
async fn concurrent_duplicate_payments_settle_only_once() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::with_settle_delay(&stub, 400).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let body = json!({
        "carId": 1,
        "rentDate": rent,
        "returnDate": ret,
        "card": valid_card()
    });

    // Both submissions are in flight during the settlement delay; the
    // second must be refused, not settled a second time.
    let first = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&body)
        .send();
    let second = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&body)
        .send();
    let (first, second) = tokio::join!(first, second);

    let mut statuses = [
        first.expect("first request failed").status().as_u16(),
        second.expect("second request failed").status().as_u16(),
    ];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);
    assert_eq!(stub.recorded_rentals().len(), 1);
}

#[tokio::test]
#[serial_test::serial]
async fn payment_rejects_a_short_card_number() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let mut card = valid_card();
    card["cardNumber"] = json!("41111111111");

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": rent, "returnDate": ret, "card": card }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert!(stub.recorded_rentals().is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn payment_rejects_an_expired_card() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let mut card = valid_card();
    card["expiry"] = json!("01/20");

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&json!({ "carId": 1, "rentDate": rent, "returnDate": ret, "card": card }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial_test::serial]
async fn payment_refuses_an_ineligible_renter() {
    // ---
    // Car 2's floor is 700; the score check repeats server-side even if a
    // client skipped the quote step.
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let (rent, ret) = dates(3);
    let response = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&json!({
            "carId": 2,
            "rentDate": rent,
            "returnDate": ret,
            "card": valid_card()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    assert!(stub.recorded_rentals().is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn payment_refuses_a_pickup_in_the_past() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let tomorrow = (Utc::now().date_naive() + Duration::days(1)).to_string();
    let response = server
        .client
        .post(server.url("/payment"))
        .bearer_auth(&token)
        .json(&json!({
            "carId": 1,
            "rentDate": yesterday,
            "returnDate": tomorrow,
            "card": valid_card()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert!(stub.recorded_rentals().is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn rental_listing_works() {
    // ---
    let stub = StubBackend::spawn(FindeksMode::Score(600)).await;
    let server = TestServer::new(&stub).await;
    let token = server.login(MEMBER_EMAIL).await;

    let response = server
        .client
        .get(server.url("/rentals"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}
