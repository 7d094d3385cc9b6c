use assert_matches::assert_matches;
use serde_json::json;
use shoppoint_api::{
    config::WeixinConfig,
    errors::ServiceError,
    notifications::weixin::{
        DeliveryAddress, DeliveryWay, OrderLine, OrderNotice, Payer, PaymentKind, WeixinNotifier,
    },
};
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn notice() -> OrderNotice {
    OrderNotice {
        code: "20240101120000123456".into(),
        index: 3,
        cost: 2550,
        items: vec![OrderLine {
            name: "Cheesecake".into(),
            amount: 2,
        }],
        payer: Payer {
            nickname: "momo".into(),
            name: "Li Lei".into(),
            phone: "13800000000".into(),
        },
        payment: PaymentKind::Weixin,
        paid: true,
        note: None,
        address: DeliveryAddress {
            name: "Li Lei".into(),
            phone: "13800000000".into(),
            address: "1 Garden Road".into(),
            delivery_way: DeliveryWay::Express,
        },
        openid: "customer-openid".into(),
    }
}

fn config(server: &MockServer, admins: Option<&str>, token: Option<&str>) -> WeixinConfig {
    WeixinConfig {
        api_base: server.uri(),
        admin_openids: admins.map(str::to_string),
        admin_template_id: "admin-tpl".into(),
        customer_template_id: "customer-tpl".into(),
        customer_emphasis_keyword: "keyword1.DATA".into(),
        access_token: token.map(str::to_string),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn ok_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "ok" }))
}

#[tokio::test]
async fn admin_notice_reaches_every_recipient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/template/send"))
        .and(query_param("access_token", "tok"))
        .and(body_partial_json(json!({ "template_id": "admin-tpl" })))
        .respond_with(ok_reply())
        .expect(2)
        .mount(&server)
        .await;

    let notifier = WeixinNotifier::from_config(&config(&server, Some("a, b"), Some("tok"))).unwrap();
    let delivered = notifier.notify_admins(&notice()).await.unwrap();

    assert_eq!(delivered, 2);
}

#[tokio::test]
async fn failing_admin_does_not_stop_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/template/send"))
        .and(body_partial_json(json!({ "touser": "b" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "errcode": 43004, "errmsg": "require subscribe" })),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/template/send"))
        .respond_with(ok_reply())
        .expect(2)
        .mount(&server)
        .await;

    let notifier =
        WeixinNotifier::from_config(&config(&server, Some("a,b,c"), Some("tok"))).unwrap();
    let delivered = notifier.notify_admins(&notice()).await.unwrap();

    assert_eq!(delivered, 2);
}

#[tokio::test]
async fn admin_notice_is_skipped_without_token_or_recipients() {
    let server = MockServer::start().await;

    let without_token = WeixinNotifier::from_config(&config(&server, Some("a"), None)).unwrap();
    assert_eq!(without_token.notify_admins(&notice()).await.unwrap(), 0);

    let blank_token = WeixinNotifier::from_config(&config(&server, Some("a"), Some("  "))).unwrap();
    assert_eq!(blank_token.notify_admins(&notice()).await.unwrap(), 0);

    let without_admins = WeixinNotifier::from_config(&config(&server, None, Some("tok"))).unwrap();
    assert_eq!(without_admins.notify_admins(&notice()).await.unwrap(), 0);

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn customer_notice_uses_mini_program_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/wxopen/template/send"))
        .and(query_param("access_token", "tok"))
        .and(body_partial_json(json!({
            "touser": "customer-openid",
            "template_id": "customer-tpl",
            "form_id": "prepay-1",
            "emphasis_keyword": "keyword1.DATA",
            "data": { "keyword2": { "value": "20240101120000123456" } }
        })))
        .respond_with(ok_reply())
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WeixinNotifier::from_config(&config(&server, None, Some("tok"))).unwrap();
    notifier.notify_customer(&notice(), "prepay-1").await.unwrap();
}

#[tokio::test]
async fn customer_notice_reports_weixin_errcode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/wxopen/template/send"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "errcode": 41028, "errmsg": "invalid form id" })),
        )
        .mount(&server)
        .await;

    let notifier = WeixinNotifier::from_config(&config(&server, None, Some("tok"))).unwrap();
    let result = notifier.notify_customer(&notice(), "stale").await;

    assert_matches!(result, Err(ServiceError::ExternalServiceError(msg)) if msg.contains("41028"));
}

#[tokio::test]
async fn customer_notice_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = WeixinNotifier::from_config(&config(&server, None, Some("tok"))).unwrap();
    let result = notifier.notify_customer(&notice(), "prepay-1").await;

    assert_matches!(result, Err(ServiceError::ExternalServiceError(_)));
}

#[tokio::test]
async fn customer_notice_without_token_sends_nothing() {
    let server = MockServer::start().await;

    let notifier = WeixinNotifier::from_config(&config(&server, None, None)).unwrap();
    notifier.notify_customer(&notice(), "prepay-1").await.unwrap();

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
