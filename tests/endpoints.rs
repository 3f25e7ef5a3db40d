//! Every endpoint method against a recording backend.

use bytes::Bytes;
use chrono::{NaiveDate, NaiveTime, Weekday};
use futures::future::{BoxFuture, FutureExt};
use instantly::{
    CampaignSchedule, HttpBackend, InstantlyClient, InstantlyError, Lead, LeadStatus, RateLimit,
    Result,
};
use parking_lot::Mutex;
use reqwest::{Method, Request};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

/// What the client sent
#[derive(Debug, Clone)]
struct Sent {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

/// Answers with queued bodies, falling back to a default
struct MockBackend {
    default: String,
    queued: Mutex<VecDeque<String>>,
    sent: Mutex<Vec<Sent>>,
}

impl MockBackend {
    fn answering(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            default: body.into(),
            queued: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn last(&self) -> Sent {
        self.sent.lock().last().cloned().expect("no request sent")
    }

    fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

impl HttpBackend for MockBackend {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Bytes>> {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| serde_json::from_slice(b).expect("request body is JSON"));
        self.sent.lock().push(Sent {
            method: request.method().clone(),
            path: request.url().path().to_string(),
            query: request
                .url()
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            body,
        });

        let answer = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        async move { Ok(Bytes::from(answer)) }.boxed()
    }
}

fn client(backend: Arc<MockBackend>) -> InstantlyClient {
    InstantlyClient::builder("test-key")
        .rate_limit(RateLimit::per_second(1000))
        .backend(backend)
        .build()
        .unwrap()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Calls every endpoint that answers with nothing but a status
async fn status_only_calls(client: &InstantlyClient) -> Vec<(&'static str, Result<()>)> {
    let emails = vec!["a@x.co".to_string()];
    let mut variables = serde_json::Map::new();
    variables.insert("city".to_string(), json!("Paris"));
    let schedule = CampaignSchedule::new(
        "Morning",
        &[Weekday::Mon],
        chrono_tz::Europe::Paris,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    );
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

    vec![
        ("set_campaign_name", client.set_campaign_name("c-1", "New").await),
        ("set_campaign_accounts", client.set_campaign_accounts("c-1", &emails).await),
        ("add_sending_account", client.add_sending_account("c-1", "a@x.co").await),
        ("remove_sending_account", client.remove_sending_account("c-1", "a@x.co").await),
        (
            "set_campaign_schedule",
            client
                .set_campaign_schedule("c-1", start, None, &[schedule])
                .await,
        ),
        ("launch_campaign", client.launch_campaign("c-1").await),
        ("pause_campaign", client.pause_campaign("c-1").await),
        (
            "delete_leads_from_campaign",
            client.delete_leads_from_campaign("c-1", false, &emails).await,
        ),
        (
            "update_lead_status",
            client
                .update_lead_status("c-1", "a@x.co", LeadStatus::Interested)
                .await,
        ),
        (
            "update_lead_variables",
            client.update_lead_variables("c-1", "a@x.co", &variables).await,
        ),
        (
            "set_lead_variables",
            client.set_lead_variables("c-1", "a@x.co", &variables).await,
        ),
        (
            "delete_lead_variables",
            client
                .delete_lead_variables("c-1", "a@x.co", &["city".to_string()])
                .await,
        ),
        ("enable_warmup", client.enable_warmup("a@x.co").await),
        ("pause_warmup", client.pause_warmup("a@x.co").await),
    ]
}

#[tokio::test]
async fn status_only_writes_succeed_on_success() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = client(backend.clone());

    for (name, result) in status_only_calls(&client).await {
        assert!(result.is_ok(), "{} failed: {:?}", name, result);
    }
    assert_eq!(backend.count(), 14);
}

#[tokio::test]
async fn status_only_writes_fail_on_failed_status() {
    let backend = MockBackend::answering(r#"{"status":"failed"}"#);
    let client = client(backend);

    for (name, result) in status_only_calls(&client).await {
        match result {
            Err(InstantlyError::Status { status, .. }) => assert_eq!(status, "failed", "{}", name),
            other => panic!("{} returned {:?}", name, other),
        }
    }
}

#[tokio::test]
async fn typed_results_report_failed_status() {
    let backend = MockBackend::answering(r#"{"status":"failed"}"#);
    let client = client(backend);
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

    let failures = vec![
        ("authenticate", client.authenticate().await.map(|_| ())),
        ("get_campaign_name", client.get_campaign_name("c-1").await.map(|_| ())),
        ("get_campaign_summary", client.get_campaign_summary("c-1").await.map(|_| ())),
        (
            "get_campaign_count",
            client.get_campaign_count("c-1", start, None).await.map(|_| ()),
        ),
        (
            "check_account_vitals",
            client
                .check_account_vitals(&["a@x.co".to_string()])
                .await
                .map(|_| ()),
        ),
        (
            "add_leads_to_campaign",
            client
                .add_leads_to_campaign("c-1", &[Lead::new("a@x.co")])
                .await
                .map(|_| ()),
        ),
    ];

    for (name, result) in failures {
        match result {
            Err(InstantlyError::Status { status, .. }) => assert_eq!(status, "failed", "{}", name),
            other => panic!("{} returned {:?}", name, other),
        }
    }
}

#[tokio::test]
async fn writes_post_json_with_api_key() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = client(backend.clone());

    assert_ok!(client.add_sending_account("c-1", "a@x.co").await);

    let sent = backend.last();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path, "/api/v1/campaign/add/account");
    assert!(sent.query.is_empty());
    assert_eq!(
        sent.body,
        Some(json!({"campaign_id": "c-1", "email": "a@x.co", "api_key": "test-key"}))
    );
}

#[tokio::test]
async fn schedule_is_sent_in_wire_form() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = client(backend.clone());

    let schedule = CampaignSchedule::new(
        "Morning",
        &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
        chrono_tz::America::New_York,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    );
    assert_ok!(
        client
            .set_campaign_schedule(
                "c-1",
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                None,
                &[schedule],
            )
            .await
    );

    let body = backend.last().body.unwrap();
    assert_eq!(body["start_date"], "2024-01-15");
    assert!(body.get("end_date").is_none());
    assert_eq!(
        body["schedules"],
        json!([{
            "name": "Morning",
            "days": {"1": true, "3": true, "5": true},
            "timezone": "America/New_York",
            "timing": {"from": "09:00", "to": "17:00"}
        }])
    );
    assert_eq!(body["api_key"], "test-key");
}

#[tokio::test]
async fn delete_lead_variables_uses_delete_endpoint() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = client(backend.clone());

    assert_ok!(
        client
            .delete_lead_variables("c-1", "a@x.co", &["city".to_string()])
            .await
    );
    let sent = backend.last();
    assert_eq!(sent.path, "/api/v1/lead/data/delete");
    assert_eq!(sent.body.unwrap()["variables"], json!(["city"]));
}

#[tokio::test]
async fn authenticate_returns_workspace() {
    let backend = MockBackend::answering(r#"{"workspace_name":"Acme Outbound"}"#);
    let client = client(backend.clone());

    assert_eq!(client.authenticate().await.unwrap(), "Acme Outbound");
    let sent = backend.last();
    assert_eq!(sent.method, Method::GET);
    assert_eq!(sent.path, "/api/v1/authenticate");
    assert_eq!(sent.query, pairs(&[("api_key", "test-key")]));
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn list_campaigns_decodes_array() {
    let backend = MockBackend::answering(
        r#"[{"id":"c-1","name":"Q1"},{"id":"c-2","name":"Q2"}]"#,
    );
    let client = client(backend.clone());

    let campaigns = client.list_campaigns().await.unwrap();
    assert_eq!(campaigns.len(), 2);
    assert_eq!(campaigns[1].name, "Q2");
    assert_eq!(backend.last().path, "/api/v1/campaign/list");
}

#[tokio::test]
async fn campaign_reads_pass_campaign_id() {
    let backend = MockBackend::answering(r#"{"campaign_id":"c-1","campaign_name":"Q1"}"#);
    let client = client(backend.clone());

    assert_eq!(client.get_campaign_name("c-1").await.unwrap(), "Q1");
    let sent = backend.last();
    assert_eq!(sent.path, "/api/v1/campaign/get/name");
    assert_eq!(
        sent.query,
        pairs(&[("api_key", "test-key"), ("campaign_id", "c-1")])
    );

    backend
        .queued
        .lock()
        .push_back(r#"["a@x.co","b@x.co"]"#.to_string());
    let accounts = client.get_campaign_accounts("c-1").await.unwrap();
    assert_eq!(accounts, vec!["a@x.co".to_string(), "b@x.co".to_string()]);
}

#[tokio::test]
async fn campaign_summary_and_count() {
    let backend = MockBackend::answering(
        r#"{"campaign_id":"c-1","campaign_name":"Q1","total_leads":10,"bounced":"2"}"#,
    );
    let client = client(backend.clone());

    let summary = client.get_campaign_summary("c-1").await.unwrap();
    assert_eq!(summary.total_leads, 10);
    assert_eq!(summary.bounced, 2);

    backend.queued.lock().push_back(
        r#"[{"campaign_id":"c-1","campaign_name":"Q1","total_emails_sent":40,"emails_read":12}]"#
            .to_string(),
    );
    let count = client
        .get_campaign_count(
            "c-1",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(count.total_emails_sent, 40);

    let sent = backend.last();
    assert_eq!(sent.path, "/api/v1/analytics/campaign/count");
    assert_eq!(
        sent.query,
        pairs(&[
            ("api_key", "test-key"),
            ("campaign_id", "c-1"),
            ("start_date", "01-05-2024"),
            ("end_date", "02-29-2024"),
        ])
    );
}

#[tokio::test]
async fn campaign_count_without_end_date() {
    let backend = MockBackend::answering(r#"{"campaign_id":"c-1","campaign_name":"Q1"}"#);
    let client = client(backend.clone());

    assert_ok!(
        client
            .get_campaign_count("c-1", NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), None)
            .await
    );
    let keys: Vec<String> = backend.last().query.into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["api_key", "campaign_id", "start_date"]);
}

#[tokio::test]
async fn lead_lookup_not_found_and_ambiguous() {
    let lead = json!({
        "id": "l-1",
        "timestamp_created": "2024-01-15T10:30:00Z",
        "campaign": "c-1",
        "status": 1,
        "contact": "a@x.co",
        "email_opened": false,
        "email_replied": false,
        "lead_data": {},
        "campaign_name": "Q1"
    });

    let backend = MockBackend::answering("[]");
    let client = client(backend.clone());
    let err = assert_err!(client.get_lead_from_campaign("c-1", "a@x.co").await);
    assert!(matches!(err, InstantlyError::NotFound(_)));
    assert_eq!(
        backend.last().query,
        pairs(&[("api_key", "test-key"), ("campaign_id", "c-1"), ("email", "a@x.co")])
    );

    backend
        .queued
        .lock()
        .push_back(json!([lead.clone(), lead.clone()]).to_string());
    let err = assert_err!(client.get_lead_from_campaign("c-1", "a@x.co").await);
    assert!(matches!(err, InstantlyError::Ambiguous { count: 2, .. }));

    backend.queued.lock().push_back(json!([lead]).to_string());
    let found = client.get_lead_from_campaign("c-1", "a@x.co").await.unwrap();
    assert_eq!(found.id, "l-1");
    assert_eq!(found.contact, "a@x.co");
}

#[tokio::test]
async fn add_leads_checks_status() {
    let backend = MockBackend::answering(
        r#"{"status":"success","total_sent":2,"leads_uploaded":2,"already_in_campaign":"0"}"#,
    );
    let client = client(backend.clone());
    let leads = vec![
        Lead::new("a@x.co").with_first_name("Ann"),
        Lead::new("b@x.co").with_company_name("Bee Ltd"),
    ];

    let result = client.add_leads_to_campaign("c-1", &leads).await.unwrap();
    assert_eq!(result.leads_uploaded, 2);

    let body = backend.last().body.unwrap();
    assert_eq!(body["leads"][0], json!({"email": "a@x.co", "first_name": "Ann"}));
    assert_eq!(body["api_key"], "test-key");

    backend
        .queued
        .lock()
        .push_back(r#"{"status":"error"}"#.to_string());
    let err = assert_err!(client.add_leads_to_campaign("c-1", &leads).await);
    assert!(err.is_status());
}

#[tokio::test]
async fn update_lead_status_sends_label() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = client(backend.clone());

    assert_ok!(
        client
            .update_lead_status("c-1", "a@x.co", LeadStatus::MeetingBooked)
            .await
    );
    assert_eq!(backend.last().body.unwrap()["new_status"], "Meeting Booked");
}

#[tokio::test]
async fn blocklist_returns_counts() {
    let backend = MockBackend::answering(
        r#"{"status":"success","entries_added":2,"already_in_blocklist":1,"blocklist_id":"b-9"}"#,
    );
    let client = client(backend.clone());

    let update = client
        .add_entries_to_blocklist(&["spam.com".to_string(), "x@y.co".to_string()])
        .await
        .unwrap();
    assert_eq!(update.entries_added, 2);
    assert_eq!(update.blocklist_id, "b-9");
    assert_eq!(
        backend.last().body.unwrap(),
        json!({"entries": ["spam.com", "x@y.co"], "api_key": "test-key"})
    );

    backend
        .queued
        .lock()
        .push_back(r#"{"status":"failed"}"#.to_string());
    assert!(client
        .add_entries_to_blocklist(&["spam.com".to_string()])
        .await
        .unwrap_err()
        .is_status());
}

#[tokio::test]
async fn list_accounts_passes_paging_and_checks_status() {
    let backend = MockBackend::answering(
        r#"{"status":"success","accounts":[{"email":"s@x.co","timestamp_created":"2024-01-01T00:00:00Z","timestamp_updated":"2024-01-02T00:00:00Z"}]}"#,
    );
    let client = client(backend.clone());

    let accounts = client.list_accounts(50, 100).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].email, "s@x.co");
    assert_eq!(
        backend.last().query,
        pairs(&[("api_key", "test-key"), ("limit", "50"), ("skip", "100")])
    );

    backend
        .queued
        .lock()
        .push_back(r#"{"status":"failed","accounts":[]}"#.to_string());
    assert!(client.list_accounts(50, 0).await.unwrap_err().is_status());
}

#[tokio::test]
async fn list_accounts_rejects_bad_timestamps() {
    let backend = MockBackend::answering(
        r#"{"status":"success","accounts":[{"email":"s@x.co","timestamp_created":"yesterday","timestamp_updated":"2024-01-02T00:00:00Z"}]}"#,
    );
    let client = client(backend);

    let err = assert_err!(client.list_accounts(10, 0).await);
    assert!(matches!(err, InstantlyError::Decode { .. }));
}

#[tokio::test]
async fn account_vitals_split_lists() {
    let backend = MockBackend::answering(
        r#"{
            "status": "success",
            "success_list": [{"domain":"good.com","mx":true,"spf":true,"dkim":true,"dmarc":true}],
            "failure_list": [{"domain":"bad.com","mx":true,"spf":false,"dkim":false,"dmarc":false}]
        }"#,
    );
    let client = client(backend.clone());

    let report = client
        .check_account_vitals(&["me@good.com".to_string(), "me@bad.com".to_string()])
        .await
        .unwrap();
    assert_eq!(report.success_list.len(), 1);
    assert!(report.success_list[0].is_healthy());
    assert_eq!(report.failure_list[0].domain, "bad.com");
    assert!(!report.failure_list[0].is_healthy());
    assert_eq!(backend.last().path, "/api/v1/account/test/vitals");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let backend = MockBackend::answering("<html>oops</html>");
    let client = client(backend);

    let err = assert_err!(client.launch_campaign("c-1").await);
    match err {
        InstantlyError::Decode { endpoint, .. } => assert_eq!(endpoint, "campaign/launch"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn custom_host_and_version_are_used() {
    let backend = MockBackend::answering("[]");
    let client = InstantlyClient::builder("test-key")
        .host("eu.instantly.ai:8443")
        .api_version(2)
        .backend(backend.clone())
        .build()
        .unwrap();

    assert_ok!(client.list_campaigns().await);
    assert_eq!(backend.last().path, "/api/v2/campaign/list");
    assert_eq!(
        client.http().base_url().as_str(),
        "https://eu.instantly.ai:8443/api/v2/"
    );
}

#[tokio::test(start_paused = true)]
async fn calls_are_rate_limited() {
    let backend = MockBackend::answering(r#"{"status":"success"}"#);
    let client = InstantlyClient::builder("test-key")
        .rate_limit(RateLimit::per_second(10))
        .backend(backend.clone())
        .build()
        .unwrap();

    let start = tokio::time::Instant::now();
    for _ in 0..11 {
        assert_ok!(client.launch_campaign("c-1").await);
    }
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(backend.count(), 11);
}

#[tokio::test(start_paused = true)]
async fn concurrent_calls_share_one_limiter() {
    let backend = MockBackend::answering("[]");
    let client = Arc::new(
        InstantlyClient::builder("test-key")
            .rate_limit(RateLimit::per_second(5))
            .backend(backend.clone())
            .build()
            .unwrap(),
    );

    let start = tokio::time::Instant::now();
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.list_campaigns().await })
        })
        .collect();
    for handle in handles {
        assert_ok!(handle.await.unwrap());
    }

    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(backend.count(), 6);
}
