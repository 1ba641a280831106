#![allow(missing_docs)]

use axum::http::Method;
use incognia_api::IncogniaError;
use incognia_api::models::{
    Address, AddressType, Assessment, Coordinates, FeedbackEvent, FeedbackIdentifiers,
    PaymentMethod, PaymentType, PaymentValue, PersonId, ReasonSource, RegisterLoginRequest,
    RegisterPaymentRequest, RegisterSignupRequest, RegisterWebLoginRequest,
    RegisterWebSignupRequest,
};
use rstest::rstest;
use serde_json::json;

mod common;
pub use self::common::*;

#[rstest]
#[tokio::test]
async fn should_register_signup(#[future] mock: MockIncognia) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let request = RegisterSignupRequest {
        installation_id: Some("installation-id".to_string()),
        device_os: Some("Android".to_string()),
        address: Some(Address {
            address_line: Some("Rua do Bom Jesus, 183, Recife".to_string()),
            coordinates: Some(Coordinates::new(-8.063, -34.871)),
            ..Address::default()
        }),
        person_id: Some(PersonId::cpf("12345678901")),
        ..RegisterSignupRequest::default()
    };

    let assessment = api.register_signup(&request).await?;

    assert_eq!(assessment.id.to_string(), SIGNUP_ID);
    assert_eq!(assessment.risk_assessment, Assessment::LowRisk);
    let [reason] = assessment.reasons.as_slice() else {
        anyhow::bail!("Expected a single reason, got {:?}", assessment.reasons);
    };
    assert_eq!(reason.code, "trusted_location");
    assert_eq!(reason.source, Some(ReasonSource::Local));
    assert_eq!(assessment.device_id.as_deref(), Some("device-id"));
    assert!(assessment.evidence.contains_key("location_services"));

    let recorded = mock.last_request();
    assert_eq!(recorded.method, Method::POST);
    assert_eq!(recorded.path, "/api/v2/onboarding/signups");
    assert_eq!(
        recorded.json(),
        json!({
            "installation_id": "installation-id",
            "device_os": "android",
            "address_line": "Rua do Bom Jesus, 183, Recife",
            "address_coordinates": {"lat": -8.063, "lng": -34.871},
            "person_id": {"type": "cpf", "value": "12345678901"},
        })
    );

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_register_web_signup(#[future] mock: MockIncognia) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let request = RegisterWebSignupRequest {
        request_token: Some("request-token".to_string()),
        account_id: Some("account-id".to_string()),
        ..RegisterWebSignupRequest::default()
    };

    let assessment = api.register_web_signup(&request).await?;

    assert_eq!(assessment.risk_assessment, Assessment::LowRisk);
    assert_eq!(
        mock.last_request().json(),
        json!({"request_token": "request-token", "account_id": "account-id"})
    );

    Ok(())
}

#[rstest]
#[case::default(None, None)]
#[case::evaluated(Some(true), Some("eval=true"))]
#[case::not_evaluated(Some(false), Some("eval=false"))]
#[tokio::test]
async fn should_register_login(
    #[future] mock: MockIncognia,
    #[case] evaluate_transaction: Option<bool>,
    #[case] expected_query: Option<&str>,
) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let request = RegisterLoginRequest {
        installation_id: Some("installation-id".to_string()),
        account_id: "account-id".to_string(),
        evaluate_transaction,
        ..RegisterLoginRequest::default()
    };

    let assessment = api.register_login(&request).await?;

    assert_eq!(assessment.id.to_string(), TRANSACTION_ID);
    assert_eq!(assessment.risk_assessment, Assessment::HighRisk);
    let reason = assessment.reasons.first().expect("a reason");
    assert_eq!(reason.source, Some(ReasonSource::Global));
    assert_eq!(assessment.installation_id.as_deref(), Some("installation-id"));

    let recorded = mock.last_request();
    assert_eq!(recorded.path, "/api/v2/authentication/transactions");
    assert_eq!(recorded.query.as_deref(), expected_query);
    assert_eq!(
        recorded.json(),
        json!({
            "installation_id": "installation-id",
            "account_id": "account-id",
            "type": "login",
        })
    );

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_register_web_login(#[future] mock: MockIncognia) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let request = RegisterWebLoginRequest {
        account_id: "account-id".to_string(),
        session_token: Some("session-token".to_string()),
        ..RegisterWebLoginRequest::default()
    };

    api.register_web_login(&request).await?;

    assert_eq!(
        mock.last_request().json(),
        json!({
            "account_id": "account-id",
            "session_token": "session-token",
            "type": "login",
        })
    );

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_register_payment(#[future] mock: MockIncognia) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let mut request = RegisterPaymentRequest {
        installation_id: Some("installation-id".to_string()),
        account_id: "account-id".to_string(),
        payment_value: Some(PaymentValue {
            amount: 55.02,
            currency: "BRL".to_string(),
        }),
        payment_methods: vec![PaymentMethod::new(PaymentType::Pix)],
        evaluate_transaction: Some(false),
        ..RegisterPaymentRequest::default()
    };
    request
        .addresses
        .insert(AddressType::Shipping, Address::from_line("Rua do Bom Jesus, 183"));

    let assessment = api.register_payment(&request).await?;

    assert_eq!(assessment.risk_assessment, Assessment::HighRisk);
    let recorded = mock.last_request();
    assert_eq!(recorded.query.as_deref(), Some("eval=false"));
    assert_eq!(
        recorded.json(),
        json!({
            "installation_id": "installation-id",
            "account_id": "account-id",
            "type": "payment",
            "addresses": [{"type": "shipping", "address_line": "Rua do Bom Jesus, 183"}],
            "payment_value": {"amount": 55.02, "currency": "BRL"},
            "payment_methods": [{"type": "pix"}],
        })
    );

    Ok(())
}

#[rstest]
#[case::recorded(false, "dry_run=false")]
#[case::dry_run(true, "dry_run=true")]
#[tokio::test]
async fn should_register_feedback(
    #[future] mock: MockIncognia,
    #[case] dry_run: bool,
    #[case] expected_query: &str,
) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);
    let timestamp: jiff::Timestamp = "2024-03-01T12:00:00Z".parse()?;
    let identifiers = FeedbackIdentifiers {
        account_id: Some("account-id".to_string()),
        login_id: Some("login-id".to_string()),
        ..FeedbackIdentifiers::default()
    };

    // Succeeds on an empty 200 response
    if dry_run {
        api.register_feedback_dry_run(FeedbackEvent::AccountTakeover, timestamp, &identifiers)
            .await?;
    } else {
        api.register_feedback(FeedbackEvent::AccountTakeover, timestamp, &identifiers)
            .await?;
    }

    let recorded = mock.last_request();
    assert_eq!(recorded.path, "/api/v2/feedbacks");
    assert_eq!(recorded.query.as_deref(), Some(expected_query));
    assert_eq!(
        recorded.json(),
        json!({
            "event": "account_takeover",
            "timestamp": 1_709_294_400_000_i64,
            "account_id": "account-id",
            "login_id": "login-id",
        })
    );

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_validate_arguments_before_any_call(
    #[future] mock: MockIncognia,
) -> anyhow::Result<()> {
    let mock = mock.await;
    let api = api(&mock);

    let error = api
        .register_login(&RegisterLoginRequest::default())
        .await
        .expect_err("should reject empty account id");
    assert!(matches!(error, IncogniaError::InvalidArgument { .. }));

    let error = api
        .register_web_signup(&RegisterWebSignupRequest::default())
        .await
        .expect_err("should reject missing token");
    insta::assert_snapshot!(error.to_string(), @"Invalid argument: 'request token' cannot be empty");

    assert_eq!(mock.token_requests(), 0);
    assert!(mock.requests().is_empty());

    Ok(())
}
