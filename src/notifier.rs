//! Lead notification emails.
//!
//! Delivery is a best-effort side effect of lead creation: it runs on its own
//! task, its outcome is only logged, and nothing is retried or queued.

use crate::email_client::{EmailMessage, Mailer};
use crate::errors::AppError;
use crate::models::Lead;
use std::fmt::Display;
use std::future::Future;
use tokio::task::JoinHandle;

/// Runs `task` on the runtime and discards its result after logging it.
///
/// The returned handle is only useful to tests; callers are free to drop it.
pub fn spawn_best_effort<F, T, E>(label: &'static str, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        match task.await {
            Ok(_) => tracing::debug!("{} completed", label),
            Err(e) => tracing::warn!("{} failed: {}", label, e),
        }
    })
}

/// Escapes text for interpolation into HTML element content or attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const STYLE: &str = r#"
body { font-family: 'Inter', Arial, sans-serif; background-color: #f8fafc; padding: 20px; }
.container { max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 12px; overflow: hidden; }
.header { background: linear-gradient(135deg, #0EA5E9 0%, #3B82F6 100%); padding: 30px; text-align: center; color: #ffffff; }
.content { padding: 30px; color: #475569; line-height: 1.6; }
.row { margin-bottom: 12px; padding: 12px; background-color: #f1f5f9; border-radius: 8px; }
.label { font-weight: 600; display: inline-block; min-width: 150px; }
.footer { text-align: center; padding: 20px; color: #64748b; font-size: 14px; }
"#;

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="row"><span class="label">{}</span><span>{}</span></div>"#,
        label,
        escape_html(value)
    )
}

fn wrap(brand: &str, title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><style>{style}</style></head>
<body>
<div class="container">
<div class="header"><h1>{title}</h1></div>
<div class="content">{content}</div>
<div class="footer"><p>{brand}</p></div>
</div>
</body>
</html>"#,
        style = STYLE,
        title = title,
        content = content,
        brand = escape_html(brand),
    )
}

/// Admin-facing message carrying every submitted field.
pub fn admin_notification(lead: &Lead, admin_email: &str, brand: &str) -> EmailMessage {
    let rows = [
        detail_row("School Name:", &lead.school_name),
        detail_row("Student Strength:", &lead.student_strength),
        detail_row("City:", &lead.city),
        detail_row("Contact Person:", &lead.contact_name),
        detail_row("Email:", &lead.email),
        detail_row("Phone:", &lead.phone),
        detail_row("Source:", &lead.source),
        detail_row("Lead ID:", &lead.id),
    ]
    .join("\n");

    let content = format!(
        "<p>A new school has expressed interest in {}. Here are the details:</p>\n{}\n\
         <p><strong>Action Required:</strong> Follow up within 24 hours.</p>",
        escape_html(brand),
        rows
    );

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New Lead: {}", lead.school_name),
        html: wrap(brand, "New Lead Received!", &content),
    }
}

/// Submitter-facing confirmation.
pub fn submitter_confirmation(lead: &Lead, brand: &str) -> EmailMessage {
    let content = format!(
        "<p>Dear {contact},</p>\n\
         <p>Thank you for your interest in {brand} for <strong>{school}</strong>!</p>\n\
         <p>Our team has received your information and will reach out within 24 hours \
         to schedule a personalized demo tailored to schools with {strength} students.</p>\n\
         <p>If you have any immediate questions, feel free to reply to this email.</p>",
        contact = escape_html(&lead.contact_name),
        brand = escape_html(brand),
        school = escape_html(&lead.school_name),
        strength = escape_html(&lead.student_strength),
    );

    EmailMessage {
        to: lead.email.clone(),
        subject: format!("Thank you for your interest in {}!", brand),
        html: wrap(brand, &format!("Welcome to {}!", escape_html(brand)), &content),
    }
}

/// Which of the two lead emails went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationReport {
    pub admin_sent: bool,
    pub confirmation_sent: bool,
}

impl NotificationReport {
    pub fn all_sent(&self) -> bool {
        self.admin_sent && self.confirmation_sent
    }
}

#[derive(Clone)]
pub struct Notifier {
    mailer: Mailer,
    admin_email: String,
    brand: String,
}

impl Notifier {
    pub fn new(mailer: Mailer, admin_email: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            mailer,
            admin_email: admin_email.into(),
            brand: brand.into(),
        }
    }

    /// Sends the admin notification then the submitter confirmation. A failed
    /// send does not stop the other one.
    pub async fn send_lead_emails(&self, lead: &Lead) -> NotificationReport {
        let admin = admin_notification(lead, &self.admin_email, &self.brand);
        let admin_sent = self.mailer.send_email(&admin).await;

        let confirmation = submitter_confirmation(lead, &self.brand);
        let confirmation_sent = self.mailer.send_email(&confirmation).await;

        NotificationReport {
            admin_sent,
            confirmation_sent,
        }
    }

    /// Fire-and-forget dispatch for a freshly created lead.
    pub fn notify_lead_created(&self, lead: &Lead) -> JoinHandle<()> {
        let notifier = self.clone();
        let lead = lead.clone();
        spawn_best_effort("lead notification", async move {
            let report = notifier.send_lead_emails(&lead).await;
            if report.all_sent() {
                tracing::info!("Email notifications sent for lead {}", lead.id);
                Ok(report)
            } else {
                Err(AppError::ExternalApiError(format!(
                    "lead {}: admin sent={}, confirmation sent={}",
                    lead.id, report.admin_sent, report.confirmation_sent
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeadCreate, DEFAULT_SOURCE};
    use chrono::Utc;

    fn lead() -> Lead {
        Lead::from_submission(
            LeadCreate {
                school_name: "St. Mary's <High> School".to_string(),
                student_strength: "801-1200".to_string(),
                city: "Mumbai".to_string(),
                contact_name: "Rajesh Kumar".to_string(),
                email: "rajesh@stmarys.edu".to_string(),
                phone: "9876543210".to_string(),
                source: DEFAULT_SOURCE.to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_admin_notification_lists_every_field() {
        let lead = lead();
        let message = admin_notification(&lead, "admin@arctrack.com", "ArcTrack");

        assert_eq!(message.to, "admin@arctrack.com");
        assert_eq!(message.subject, "New Lead: St. Mary's <High> School");
        for value in ["801-1200", "Mumbai", "Rajesh Kumar", "rajesh@stmarys.edu", "9876543210", "Website Form"] {
            assert!(message.html.contains(value), "missing {}", value);
        }
        assert!(message.html.contains(&lead.id));
        assert!(message.html.contains("St. Mary&#39;s &lt;High&gt; School"));
        assert!(!message.html.contains("<High>"));
    }

    #[test]
    fn test_submitter_confirmation() {
        let lead = lead();
        let message = submitter_confirmation(&lead, "ArcTrack");

        assert_eq!(message.to, "rajesh@stmarys.edu");
        assert_eq!(message.subject, "Thank you for your interest in ArcTrack!");
        assert!(message.html.contains("Dear Rajesh Kumar"));
        assert!(message.html.contains("St. Mary&#39;s &lt;High&gt; School"));
        assert!(message.html.contains("reach out within 24 hours"));
        assert!(!message.html.contains("9876543210"));
    }

    #[tokio::test]
    async fn test_spawn_best_effort_swallows_errors() {
        let handle = spawn_best_effort("failing task", async {
            Err::<(), _>(AppError::ExternalApiError("smtp down".into()))
        });
        assert!(handle.await.is_ok());
    }
}
