mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zendesk_mcp::error::ErrorKind;
use zendesk_mcp::models::{AppliedFilters, NewTicket, TicketPriority, TicketStatus, TicketUpdate};
use zendesk_mcp::query::TicketListParams;

use common::{client_for, client_with_config, config_for, AUTH_HEADER, TOKEN};

fn ticket_json(id: u64, subject: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "url": format!("https://acme.zendesk.com/api/v2/tickets/{}.json", id),
        "subject": subject,
        "status": status,
        "priority": "normal",
        "type": "question",
        "description": "Details",
        "created_at": "2026-02-20T09:00:00Z",
        "updated_at": "2026-02-25T09:00:00Z",
        "requester_id": 501,
        "assignee_id": 12345,
        "organization_id": 77,
        "tags": ["billing"],
        "via": {"channel": "email"}
    })
}

#[tokio::test]
async fn direct_listing_sends_capped_page_size_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .and(header("authorization", AUTH_HEADER))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "100"))
        .and(query_param("sort_by", "created_at"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [ticket_json(1, "Invoice", "open"), ticket_json(2, "Refund", "pending")],
            "next_page": "https://acme.zendesk.com/api/v2/tickets.json?page=3",
            "previous_page": "https://acme.zendesk.com/api/v2/tickets.json?page=1",
            "count": 240
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = TicketListParams::new().with_page(2).with_per_page(500);
    let page = client.list_tickets(&params).await.unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.per_page, 100);
    assert_eq!(page.page, 2);
    assert!(page.has_more);
    assert_eq!(page.next_page, Some(3));
    assert_eq!(page.previous_page, Some(1));
    assert_eq!(page.filters, None);
    assert_eq!(page.tickets[1].status, Some(TicketStatus::Pending));
    assert_eq!(page.tickets[0].tags, vec!["billing".to_string()]);
}

#[tokio::test]
async fn direct_listing_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [],
            "next_page": null,
            "previous_page": null
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_tickets(&TicketListParams::new().with_page(5))
        .await
        .unwrap();

    assert!(!page.has_more);
    assert_eq!(page.next_page, None);
    assert_eq!(page.previous_page, None);

    let value = serde_json::to_value(&page).unwrap();
    assert!(value.get("filters").is_none());
}

#[tokio::test]
async fn stale_search_for_agent_builds_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search.json"))
        .and(query_param(
            "query",
            "type:ticket assignee_id:12345 status<solved updated<2026-02-24T12:00:00Z",
        ))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "25"))
        .and(query_param("sort_by", "created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"result_type": "ticket", "id": 10, "subject": "Stuck order", "status": "open"},
                {"result_type": "user", "id": 11, "name": "Jane"},
                {"id": 12, "subject": "No type", "status": "hold"}
            ],
            "next_page": null,
            "previous_page": null,
            "count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = TicketListParams::new()
        .with_agent("12345")
        .with_stale_hours(48);
    let page = client_for(&server).list_tickets(&params).await.unwrap();

    let ids: Vec<u64> = page.tickets.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![10, 12]);
    assert_eq!(page.count, 2);
    assert!(!page.has_more);
    assert_eq!(
        page.filters,
        Some(AppliedFilters {
            agent: Some("12345".to_string()),
            organization: None,
            updated_since: None,
            last_hours: None,
            stale_hours: Some(48),
            include_solved: false,
        })
    );
}

#[tokio::test]
async fn search_reports_previous_page_without_vendor_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search.json"))
        .and(query_param(
            "query",
            "type:ticket assignee:\"jane@acme.com\" organization:\"Acme Corp\" updated>2026-02-26T00:00:00Z",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "next_page": null,
            "previous_page": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = TicketListParams::new()
        .with_page(3)
        .with_agent("jane@acme.com")
        .with_organization("Acme Corp")
        .with_updated_since("2020-01-01T00:00:00Z")
        .with_last_hours(12);
    let page = client_for(&server).list_tickets(&params).await.unwrap();

    assert_eq!(page.previous_page, Some(2));
    let filters = page.filters.unwrap();
    assert_eq!(filters.updated_since.as_deref(), Some("2026-02-26T00:00:00Z"));
    assert_eq!(filters.last_hours, Some(12));
}

#[tokio::test]
async fn search_without_sort_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search.json"))
        .and(query_param_is_missing("sort_by"))
        .and(query_param_is_missing("sort_order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.search_sort = false;
    let client = client_with_config(&config);

    let page = client
        .list_tickets(&TicketListParams::new().with_organization("Acme"))
        .await
        .unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn bad_request_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search.json"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error":"InvalidSearch","description":"sort not allowed"}"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_tickets(&TicketListParams::new().with_last_hours(1))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    let message = err.to_string();
    assert!(message.starts_with("Failed to get tickets: HTTP 400"), "{message}");
    assert!(message.contains("sort not allowed"));
}

#[tokio::test]
async fn rejected_credentials_are_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Couldn't authenticate you"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_tickets(&TicketListParams::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);

    let err = client.test_connection().await.unwrap_err();
    assert!(err.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn error_bodies_never_echo_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/9.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string(format!("bad token {TOKEN}")))
        .mount(&server)
        .await;

    let err = client_for(&server).get_ticket(9).await.unwrap_err();
    assert!(!err.to_string().contains(TOKEN));
    assert!(err.to_string().contains("[REDACTED]"));
}

#[tokio::test]
async fn get_ticket_projects_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/42.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ticket": ticket_json(42, "VPN down", "open")})),
        )
        .mount(&server)
        .await;

    let ticket = client_for(&server).get_ticket(42).await.unwrap();
    assert_eq!(ticket.id, 42);
    assert_eq!(ticket.subject.as_deref(), Some("VPN down"));
    assert_eq!(ticket.priority, Some(TicketPriority::Normal));
    assert_eq!(ticket.ticket_type.as_deref(), Some("question"));
    assert_eq!(ticket.assignee_id, Some(12345));
    assert_eq!(ticket.organization_id, Some(77));
}

#[tokio::test]
async fn missing_ticket_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/404.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "RecordNotFound"})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_ticket(404).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "Failed to get ticket 404: resource not found: ticket 404"
    );
}

#[tokio::test]
async fn ticket_comments_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/42/comments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [
                {"id": 1, "author_id": 501, "body": "Help", "html_body": "<p>Help</p>", "public": true, "created_at": "2026-02-20T09:00:00Z"},
                {"id": 2, "author_id": 12345, "body": "Looking", "public": false}
            ],
            "next_page": null
        })))
        .mount(&server)
        .await;

    let comments = client_for(&server).get_ticket_comments(42).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].public, Some(false));
    assert_eq!(comments[0].html_body.as_deref(), Some("<p>Help</p>"));
}

#[tokio::test]
async fn post_comment_checks_ticket_then_writes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/42.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ticket": ticket_json(42, "VPN down", "open")})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/tickets/42.json"))
        .and(body_json(json!({
            "ticket": {"comment": {"html_body": "<b>Restarted</b>", "public": false}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket": {"id": 42}})))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .post_comment(42, "<b>Restarted</b>", false)
        .await
        .unwrap();
    assert_eq!(body, "<b>Restarted</b>");
}

#[tokio::test]
async fn post_comment_on_missing_ticket_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/7.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .post_comment(7, "hello", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().starts_with("Failed to post comment on ticket 7"));
}

#[tokio::test]
async fn create_ticket_falls_back_to_audit_id_and_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .and(body_json(json!({
            "ticket": {
                "subject": "Printer on fire",
                "description": "Smoke on floor 3",
                "priority": "urgent",
                "tags": ["hardware"]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "audit": {"id": 9001, "ticket_id": 77}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut stored = ticket_json(77, "Printer on fire", "new");
    stored["description"] = json!("Smoke on floor 3");
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/77.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket": stored})))
        .expect(1)
        .mount(&server)
        .await;

    let mut new_ticket = NewTicket::new("Printer on fire", "Smoke on floor 3");
    new_ticket.priority = Some(TicketPriority::Urgent);
    new_ticket.tags = Some(vec!["hardware".to_string()]);

    let ticket = client_for(&server).create_ticket(&new_ticket).await.unwrap();
    assert_eq!(ticket.id, 77);
    assert_eq!(ticket.status, Some(TicketStatus::New));
    assert_eq!(ticket.subject.as_deref(), Some(new_ticket.subject.as_str()));
    assert_eq!(ticket.description.as_deref(), Some(new_ticket.description.as_str()));
}

#[tokio::test]
async fn created_ticket_reads_back_through_get_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ticket": {"id": 88, "subject": "Partial"},
            "audit": {"id": 9002, "ticket_id": 99}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut stored = ticket_json(88, "Cannot log in", "new");
    stored["description"] = json!("Password reset link expired");
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/88.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket": stored})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let new_ticket = NewTicket::new("Cannot log in", "Password reset link expired");
    let created = client.create_ticket(&new_ticket).await.unwrap();
    assert_eq!(created.id, 88);

    let fetched = client.get_ticket(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.subject.as_deref(), Some("Cannot log in"));
    assert_eq!(fetched.description.as_deref(), Some("Password reset link expired"));
}

#[tokio::test]
async fn create_ticket_without_any_id_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_ticket(&NewTicket::new("s", "d"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().starts_with("Failed to create ticket"));
}

#[tokio::test]
async fn update_ticket_sends_only_set_fields_and_returns_fresh_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/42.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ticket": ticket_json(42, "VPN down", "open")})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/tickets/42.json"))
        .and(body_json(json!({
            "ticket": {"status": "solved", "assignee_id": 999}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket": {"id": 42}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/42.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ticket": ticket_json(42, "VPN down", "solved")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let update = TicketUpdate {
        status: Some(TicketStatus::Solved),
        assignee_id: Some(999),
        ..Default::default()
    };
    let ticket = client_for(&server).update_ticket(42, &update).await.unwrap();
    assert_eq!(ticket.status, Some(TicketStatus::Solved));
}

#[tokio::test]
async fn malformed_search_entry_does_not_fail_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"result_type": "ticket", "id": 1, "subject": "Good"},
                {"result_type": "ticket", "subject": "no id"}
            ],
            "next_page": null
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_tickets(&TicketListParams::new().with_organization("Acme"))
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.tickets[0].subject.as_deref(), Some("Good"));
}
