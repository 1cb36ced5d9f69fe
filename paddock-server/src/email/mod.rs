use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upper bound on a single SES call so a slow provider cannot stall a
/// registration response.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

async fn send(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: &str,
    body_text: String,
) -> Result<(), BoxError> {
    let subject = Content::builder().data(subject).build()?;

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    let fut = ses
        .send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send();

    match tokio::time::timeout(SEND_TIMEOUT, fut).await {
        Ok(result) => {
            result?;
        }
        Err(_) => return Err("SES send timed out".into()),
    }
    Ok(())
}

pub async fn send_verification_link(
    ses: &SesClient,
    from: &str,
    to: &str,
    full_name: &str,
    link: &str,
) -> Result<(), BoxError> {
    let body_text = format!(
        "Hi {full_name},\n\
         \n\
         Thanks for applying to join the Paddock Club.\n\
         Please confirm your email address to activate your membership:\n\
         \n\
         {link}\n\
         \n\
         The link stays valid until used; requesting a new one replaces it.\n\
         \n\
         See you in the paddock!"
    );

    send(ses, from, to, "Confirm your Paddock Club email", body_text).await?;

    tracing::info!(to = to, "Verification email sent");
    Ok(())
}

pub async fn send_welcome(
    ses: &SesClient,
    from: &str,
    to: &str,
    full_name: &str,
    member_code: &str,
) -> Result<(), BoxError> {
    let body_text = format!(
        "Hi {full_name},\n\
         \n\
         Your email is confirmed and your membership is now active.\n\
         Your member code is {member_code}. Quote it at partner businesses\n\
         and keep it handy for club events.\n\
         \n\
         See you in the paddock!"
    );

    send(ses, from, to, "Welcome to the Paddock Club", body_text).await?;

    tracing::info!(to = to, member_code = member_code, "Welcome email sent");
    Ok(())
}
