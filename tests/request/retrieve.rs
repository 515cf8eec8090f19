use crate::common::{FakeClient, Scripted};
use dlws_rs::{
    DlError, RequestKind, Registry,
    request::{call, retrieve},
};
use serde_json::{Map, json};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(1);

async fn retrieve_once(answer: Scripted) -> Result<Option<serde_json::Value>, DlError> {
    let client = FakeClient::new().script("retrieveGetHistoryResponse", [answer]);
    let out = retrieve(&client, &Registry::default(), RequestKind::History, "J1", TIMEOUT).await;
    assert_eq!(
        client.calls(),
        vec![("retrieveGetHistoryResponse".to_string(), json!({"responseId": "J1"}))]
    );
    out
}

#[tokio::test]
async fn ready_reply_is_returned() {
    let reply = json!({"statusCode": 0, "instrumentDatas": {}});
    let out = retrieve_once(Scripted::Reply(reply.clone())).await.unwrap();
    assert_eq!(out, Some(reply));
}

#[tokio::test]
async fn fault_means_not_ready() {
    let out = retrieve_once(Scripted::Fault("response not available"))
        .await
        .unwrap();
    assert_eq!(out, None);
}

#[tokio::test]
async fn textual_processing_status_means_not_ready() {
    for status in ["Processing", "queued", " pending "] {
        let out = retrieve_once(Scripted::Reply(json!({"processingStatus": status})))
            .await
            .unwrap();
        assert_eq!(out, None, "status {status:?}");
    }
}

#[tokio::test]
async fn done_status_and_numeric_status_pass_through() {
    for reply in [
        json!({"processingStatus": "Completed"}),
        json!({"@status": "SUCCESS"}),
        json!({"status": {"code": 100}}),
        json!({"status": 100}),
    ] {
        let out = retrieve_once(Scripted::Reply(reply.clone())).await.unwrap();
        assert_eq!(out, Some(reply));
    }
}

#[tokio::test]
async fn retrieving_a_synchronous_kind_is_rejected() {
    let client = FakeClient::new();
    let err = retrieve(
        &client,
        &Registry::default(),
        RequestKind::FieldsCatalog,
        "J1",
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DlError::Configuration(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn call_returns_reply_and_propagates_faults() {
    let payload =
        dlws_rs::build_payload(RequestKind::FieldsCatalog, &[], &[], &[], &Map::new());

    let ok = FakeClient::new().script("getFields", [Scripted::Reply(json!({"fields": []}))]);
    let reply = call(&ok, &Registry::default(), &payload, TIMEOUT).await.unwrap();
    assert_eq!(reply, json!({"fields": []}));
    assert_eq!(
        ok.calls()[0].1,
        json!({"criteria": {"dlCategories": ["Fundamentals"]}})
    );

    let bad = FakeClient::new().script("getFields", [Scripted::Fault("denied")]);
    let err = call(&bad, &Registry::default(), &payload, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, DlError::Fault { .. }));
}

#[tokio::test]
async fn empty_reply_means_not_ready() {
    for reply in [json!(null), json!({}), json!([])] {
        let out = retrieve_once(Scripted::Reply(reply.clone())).await.unwrap();
        assert_eq!(out, None, "reply {reply}");
    }
}

#[tokio::test]
async fn empty_http_body_means_not_ready() {
    let server = crate::common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/dl/retrieveGetDataResponse")
            .json_body(json!({"responseId": "J7"}));
        then.status(200).body("");
    });

    let client = crate::common::client_for(&server);
    let out = retrieve(&client, &Registry::default(), RequestKind::Data, "J7", TIMEOUT)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(out, None);
}
