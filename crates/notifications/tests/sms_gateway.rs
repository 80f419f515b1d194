use chrono::NaiveDate;
use httpmock::prelude::*;
use rijschool_config::SmsGatewayConfig;
use rijschool_notifications::{
    gateway_from_config, CancellationNotice, Delivery, NotificationError, NotificationGateway,
    SmsGateway,
};
use serde_json::json;

fn notice() -> CancellationNotice {
    CancellationNotice {
        recipient: "+5978123456".to_string(),
        lesson_date: NaiveDate::from_ymd_opt(2030, 6, 4).unwrap(),
        instructor_name: "Ravi".to_string(),
    }
}

fn config(base_url: String) -> SmsGatewayConfig {
    SmsGatewayConfig {
        base_url,
        api_key: Some("test-key".to_string()),
        device_id: Some("device-1".to_string()),
        request_timeout_seconds: 1,
    }
}

#[tokio::test]
async fn posts_the_message_to_the_device_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/gateway/devices/device-1/send-sms")
                .header("x-api-key", "test-key")
                .json_body(json!({
                    "recipients": ["+5978123456"],
                    "message": "Your driving lesson on Tuesday, June 4, 2030 has been cancelled by Ravi. Please contact the driving school to reschedule."
                }));
            then.status(200).json_body(json!({ "data": { "success": true } }));
        })
        .await;

    let gateway = SmsGateway::from_config(&config(server.base_url())).unwrap();
    let delivery = gateway.send_cancellation(&notice()).await.unwrap();

    assert_eq!(delivery, Delivery::Sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn gateway_errors_are_reported() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/gateway/devices/device-1/send-sms");
            then.status(503);
        })
        .await;

    let gateway = SmsGateway::from_config(&config(server.base_url())).unwrap();
    let err = gateway.send_cancellation(&notice()).await.unwrap_err();
    assert!(matches!(err, NotificationError::Http(_)));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/gateway/devices/device-1/send-sms");
            then.status(201);
        })
        .await;

    let gateway = SmsGateway::from_config(&config(format!("{}/", server.base_url()))).unwrap();
    assert!(gateway.send_cancellation(&notice()).await.unwrap().was_sent());
    mock.assert_async().await;
}

#[tokio::test]
async fn unconfigured_gateway_skips_delivery() {
    let gateway = gateway_from_config(&SmsGatewayConfig::default()).unwrap();
    let delivery = gateway.send_cancellation(&notice()).await.unwrap();
    assert_eq!(delivery, Delivery::Skipped);
    assert!(!delivery.was_sent());
}
