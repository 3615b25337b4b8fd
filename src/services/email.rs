//! Email service for delivery notifications

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::request::DeliveryRequest,
};

/// QR image renderer used in notification emails
fn qr_image_url(data: &str) -> String {
    format!("https://quickchart.io/qr?text={}&size=200&margin=2", data)
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Notify the requester that their delivery request was registered
    pub async fn send_request_created(&self, request: &DeliveryRequest) -> AppResult<()> {
        let subject = "Your CampusFleet delivery request";
        let code = request.verification_code.as_deref().unwrap_or("N/A");
        let body = format!(
            r#"
Hello {firstname} {lastname},

Your delivery request from {origin} to {destination} has been registered
and is waiting for a device to be assigned.

Pickup verification code: {code}
QR: {qr}
"#,
            firstname = request.requester_firstname,
            lastname = request.requester_lastname,
            origin = request.origin,
            destination = request.destination,
            code = code,
            qr = qr_image_url(code),
        );

        self.send_email(&request.contact_email, subject, &body).await
    }

    /// Notify the requester about a status change
    pub async fn send_request_status(&self, request: &DeliveryRequest) -> AppResult<()> {
        let status = request.status.as_str().replace('_', " ").to_uppercase();
        let subject = format!("Your CampusFleet delivery is {}", status);
        let code = request.verification_code.as_deref().unwrap_or("N/A");
        let body = format!(
            r#"
Hello {firstname} {lastname},

Your delivery request from {origin} to {destination} is now: {status}

Present this verification code at pickup: {code}
QR: {qr}
"#,
            firstname = request.requester_firstname,
            lastname = request.requester_lastname,
            origin = request.origin,
            destination = request.destination,
            status = status,
            code = code,
            qr = qr_image_url(code),
        );

        self.send_email(&request.contact_email, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::debug!(to, subject, "email disabled, skipping notification");
            return Ok(());
        }

        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("CampusFleet");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
