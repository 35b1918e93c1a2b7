/// Email transport tests against a mocked HTTP email API
use chrono::Utc;
use lead_capture_api::email_client::{EmailMessage, EmailTransport, HttpEmailClient, LogOnlyTransport, Mailer};
use lead_capture_api::models::{Lead, LeadCreate};
use lead_capture_api::notifier::Notifier;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message() -> EmailMessage {
    EmailMessage {
        to: "rajesh@stmarys.edu".to_string(),
        subject: "Thank you for your interest in ArcTrack!".to_string(),
        html: "<p>Dear Rajesh Kumar,</p>".to_string(),
    }
}

fn lead() -> Lead {
    Lead::from_submission(
        LeadCreate {
            school_name: "St. Mary's High School".to_string(),
            student_strength: "801-1200".to_string(),
            city: "Mumbai".to_string(),
            contact_name: "Rajesh Kumar".to_string(),
            email: "rajesh@stmarys.edu".to_string(),
            phone: "9876543210".to_string(),
            source: "Website Form".to_string(),
        },
        Utc::now(),
    )
}

#[tokio::test]
async fn test_http_client_posts_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(serde_json::json!({
            "from": "ArcTrack <onboarding@resend.dev>",
            "to": ["rajesh@stmarys.edu"],
            "subject": "Thank you for your interest in ArcTrack!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "email_1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpEmailClient::new(format!("{}/", mock_server.uri()), "re_test_key".to_string()).unwrap();
    let result = client
        .send("ArcTrack <onboarding@resend.dev>", &message())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_http_client_reports_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(403).set_body_string("domain not verified"))
        .mount(&mock_server)
        .await;

    let client = HttpEmailClient::new(mock_server.uri(), "re_test_key".to_string()).unwrap();
    let err = client
        .send("ArcTrack <onboarding@resend.dev>", &message())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("domain not verified"));
}

#[tokio::test]
async fn test_mailer_turns_failure_into_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = HttpEmailClient::new(mock_server.uri(), "key".to_string()).unwrap();
    let mailer = Mailer::new(Arc::new(client), "ArcTrack <onboarding@resend.dev>");

    assert!(!mailer.send_email(&message()).await);
}

#[tokio::test]
async fn test_log_only_transport_counts_as_sent() {
    let mailer = Mailer::new(Arc::new(LogOnlyTransport), "ArcTrack <onboarding@resend.dev>");
    assert!(mailer.send_email(&message()).await);
}

#[tokio::test]
async fn test_notifier_sends_admin_then_confirmation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(serde_json::json!({"to": ["admin@arctrack.com"]})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(serde_json::json!({"to": ["rajesh@stmarys.edu"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpEmailClient::new(mock_server.uri(), "key".to_string()).unwrap();
    let mailer = Mailer::new(Arc::new(client), "ArcTrack <onboarding@resend.dev>");
    let notifier = Notifier::new(mailer, "admin@arctrack.com", "ArcTrack");

    let report = notifier.send_lead_emails(&lead()).await;
    assert!(!report.admin_sent);
    assert!(report.confirmation_sent);
    assert!(!report.all_sent());
}
