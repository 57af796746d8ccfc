mod common;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderMap, StatusCode as AxumStatus},
    routing::post,
    Form, Json, Router,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

use classmarket_api::database::MemoryDocumentStore;
use classmarket_api::payments::{PaymentError, PaymentProvider, StripeProvider};
use classmarket_api::AppState;

#[tokio::test]
async fn checkout_session_through_fake_provider() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/create-checkout-session"))
        .header("Authorization", server.bearer("student@example.com"))
        .json(&json!({"priceId": "price_pottery"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"id": "cs_test_1", "url": "https://checkout.example.com/pay/price_pottery"})
    );
    assert_eq!(*server.payments.requested.lock().await, vec!["price_pottery".to_string()]);
    Ok(())
}

#[tokio::test]
async fn checkout_session_rejects_empty_price() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/create-checkout-session"))
        .header("Authorization", server.bearer("student@example.com"))
        .json(&json!({"priceId": ""}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn payment_records_are_a_regular_collection() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let auth = server.bearer("student@example.com");

    client
        .post(server.url("/api/payments"))
        .header("Authorization", &auth)
        .json(&json!({"email": "student@example.com", "transactionId": "pi_123", "price": 40}))
        .send()
        .await?
        .error_for_status()?;

    let list = client
        .get(server.url("/api/payments"))
        .header("Authorization", &auth)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(list[0]["transactionId"], json!("pi_123"));

    // Payments are not part of the public catalog
    let res = client.get(server.url("/payments")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

/// Minimal stand-in for the Stripe sessions endpoint
async fn spawn_fake_stripe() -> Result<String> {
    async fn create_session(
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> (AxumStatus, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer sk_test_fake");
        if !authorized {
            return (
                AxumStatus::UNAUTHORIZED,
                Json(json!({"error": {"message": "Invalid API Key provided"}})),
            );
        }

        let price = form.get("line_items[0][price]").cloned().unwrap_or_default();
        if price != "price_known" {
            return (
                AxumStatus::BAD_REQUEST,
                Json(json!({"error": {"message": format!("No such price: '{}'", price)}})),
            );
        }

        assert_eq!(form.get("mode").map(String::as_str), Some("payment"));
        assert_eq!(form.get("line_items[0][quantity]").map(String::as_str), Some("1"));
        assert!(form.contains_key("success_url"));
        assert!(form.contains_key("cancel_url"));

        (
            AxumStatus::OK,
            Json(json!({"id": "cs_fake_1", "object": "checkout.session", "url": "https://checkout.stripe.test/c/cs_fake_1"})),
        )
    }

    let app = Router::new().route("/v1/checkout/sessions", post(create_session));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

fn stripe_provider(api_base: &str, key: &str) -> Result<StripeProvider> {
    let mut config = common::test_config().payments;
    config.stripe_api_base = api_base.to_string();
    config.stripe_secret_key = Some(key.to_string());
    StripeProvider::from_config(&config)
}

#[tokio::test]
async fn stripe_provider_creates_session() -> Result<()> {
    let api_base = spawn_fake_stripe().await?;
    let provider = stripe_provider(&api_base, "sk_test_fake")?;

    let session = provider.create_checkout_session("price_known").await?;
    assert_eq!(session.id, "cs_fake_1");
    assert_eq!(session.url, "https://checkout.stripe.test/c/cs_fake_1");
    Ok(())
}

#[tokio::test]
async fn stripe_provider_surfaces_provider_errors() -> Result<()> {
    let api_base = spawn_fake_stripe().await?;

    let provider = stripe_provider(&api_base, "sk_test_fake")?;
    match provider.create_checkout_session("price_unknown").await {
        Err(PaymentError::Provider(msg)) => assert!(msg.contains("No such price")),
        other => panic!("expected provider error, got {:?}", other),
    }

    let provider = stripe_provider(&api_base, "sk_test_wrong")?;
    match provider.create_checkout_session("price_known").await {
        Err(PaymentError::Provider(msg)) => assert!(msg.contains("Invalid API Key")),
        other => panic!("expected provider error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn stripe_backed_server_maps_errors_to_bad_gateway() -> Result<()> {
    let api_base = spawn_fake_stripe().await?;

    let provider = Arc::new(stripe_provider(&api_base, "sk_test_fake")?);
    let state = AppState::new(
        common::test_config(),
        Arc::new(MemoryDocumentStore::new()),
        provider,
    );
    let token = state.tokens.issue("student@example.com")?;
    let base_url = common::serve(state).await?;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/create-checkout-session", base_url))
        .bearer_auth(&token)
        .json(&json!({"priceId": "price_unknown"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.json::<Value>().await?["code"], json!("BAD_GATEWAY"));

    let res = client
        .post(format!("{}/create-checkout-session", base_url))
        .bearer_auth(&token)
        .json(&json!({"priceId": "price_known"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["id"], json!("cs_fake_1"));
    Ok(())
}
