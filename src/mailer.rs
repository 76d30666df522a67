use crate::config::SmtpConfig;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use tracing::{debug, instrument};

/// Sends contact-form notifications to candidates over SMTP.
///
/// Delivery is best effort: callers log failures and never fail the
/// originating request on them.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer").field("from", &self.from).finish()
    }
}

impl Mailer {
    pub fn from_config(cfg: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .with_context(|| format!("Invalid SMTP relay host '{}'", cfg.host))?
            .credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ))
            .build();
        let from: Mailbox = cfg
            .from
            .parse()
            .with_context(|| format!("Invalid SMTP_FROM mailbox '{}'", cfg.from))?;
        Ok(Self { transport, from })
    }

    /// Notify a candidate about a new contact message on their profile.
    #[instrument(skip(self, message_body))]
    pub async fn send_contact_notification(
        &self,
        to: &str,
        candidate_name: &str,
        slug: &str,
        sender_name: &str,
        sender_email: &str,
        subject: &str,
        message_body: &str,
    ) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| {
                format!("Candidate email '{}' is not a valid mailbox", to)
            })?)
            .subject(format!("New Contact Message: {}", subject))
            .header(ContentType::TEXT_HTML)
            .body(render_contact_email(
                candidate_name,
                slug,
                sender_name,
                sender_email,
                subject,
                message_body,
            ))?;

        self.transport.send(email).await?;
        debug!("Contact notification sent to {}", to);
        Ok(())
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_contact_email(
    candidate_name: &str,
    slug: &str,
    sender_name: &str,
    sender_email: &str,
    subject: &str,
    message_body: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: #006747; color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
        .content {{ background: #f9f9f9; padding: 30px; border: 1px solid #ddd; }}
        .info-box {{ background: white; padding: 15px; margin: 15px 0; border-left: 4px solid #006747; }}
        .label {{ font-weight: bold; color: #006747; }}
        .footer {{ background: #333; color: white; padding: 20px; text-align: center; border-radius: 0 0 10px 10px; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>New Contact Message</h1>
            <p>You have received a new message from your profile</p>
        </div>
        <div class="content">
            <div class="info-box">
                <p><span class="label">To:</span> {candidate_name}</p>
                <p><span class="label">Candidate Profile:</span> {slug}</p>
            </div>
            <div class="info-box">
                <p><span class="label">From:</span> {sender_name}</p>
                <p><span class="label">Email:</span> {sender_email}</p>
                <p><span class="label">Subject:</span> {subject}</p>
            </div>
            <div class="info-box">
                <p><span class="label">Message:</span></p>
                <p style="white-space: pre-wrap;">{message_body}</p>
            </div>
        </div>
        <div class="footer">
            <p>Prarthi Platform | Automated Message</p>
            <p>Please do not reply to this email directly. Contact the sender at: {sender_email}</p>
        </div>
    </div>
</body>
</html>"#,
        candidate_name = escape_html(candidate_name),
        slug = escape_html(slug),
        sender_name = escape_html(sender_name),
        sender_email = escape_html(sender_email),
        subject = escape_html(subject),
        message_body = escape_html(message_body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_email_escapes_user_input() {
        let html = render_contact_email(
            "Rahim",
            "dhaka5",
            "<script>alert(1)</script>",
            "visitor@example.org",
            "Hi & hello",
            "a < b",
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Hi &amp; hello"));
        assert!(html.contains("a &lt; b"));
        assert!(!html.contains("<script>"));
    }
}
