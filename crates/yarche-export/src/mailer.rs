use std::path::Path;
use std::sync::LazyLock;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use yarche_core::SmtpConfig;

use crate::{file_name_of, io_error, ExportError};

static ZIP_CONTENT_TYPE: LazyLock<ContentType> =
    LazyLock::new(|| ContentType::parse("application/zip").expect("valid content type"));

fn mailbox(address: &str) -> Result<Mailbox, ExportError> {
    address.parse().map_err(|source| ExportError::Address {
        address: address.to_string(),
        source,
    })
}

/// Builds the delivery mail for one recipient with the archive attached.
///
/// # Errors
///
/// Returns [`ExportError::Address`] for an unparseable sender or recipient
/// and [`ExportError::Message`] when the mail cannot be assembled.
pub fn build_archive_message(
    from: &str,
    to: &str,
    subject: &str,
    archive: &Path,
    body: Vec<u8>,
) -> Result<Message, ExportError> {
    let attachment = Attachment::new(file_name_of(archive)?).body(body, ZIP_CONTENT_TYPE.clone());

    Message::builder()
        .from(mailbox(from)?)
        .to(mailbox(to)?)
        .subject(subject)
        .multipart(MultiPart::mixed().singlepart(attachment))
        .map_err(|source| ExportError::Message {
            archive: archive.to_path_buf(),
            source,
        })
}

/// Mails `archive` to every recipient over implicit-TLS SMTP (port 465),
/// one message per recipient, then deletes the archive.
///
/// # Errors
///
/// Returns [`ExportError`] naming the archive when it cannot be read,
/// a message cannot be built or delivered, or the archive cannot be removed.
/// Delivery stops at the first failing recipient and the archive is kept.
pub async fn send_archive(
    smtp: &SmtpConfig,
    recipients: &[String],
    subject: &str,
    archive: &Path,
) -> Result<(), ExportError> {
    let body = tokio::fs::read(archive).await.map_err(io_error(archive))?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
        .map_err(|source| ExportError::Smtp {
            archive: archive.to_path_buf(),
            recipient: String::new(),
            source,
        })?
        .credentials(Credentials::new(smtp.login.clone(), smtp.password.clone()))
        .build();

    for recipient in recipients {
        let message = build_archive_message(&smtp.login, recipient, subject, archive, body.clone())?;
        transport
            .send(message)
            .await
            .map_err(|source| ExportError::Smtp {
                archive: archive.to_path_buf(),
                recipient: recipient.clone(),
                source,
            })?;
        tracing::info!(recipient = %recipient, archive = %archive.display(), "archive sent");
    }

    tokio::fs::remove_file(archive)
        .await
        .map_err(io_error(archive))?;
    Ok(())
}
