//! Message templates for outbound email.

use crate::client::OutgoingEmail;

/// Subject line for the form-submission confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "Form Submission Received";

/// Builds the confirmation email sent after a contact-form submission.
///
/// The body greets the visitor by name and quotes the message back so they
/// have a record of what they sent.
pub fn confirmation(to: &str, name: &str, message: &str) -> OutgoingEmail {
    let body = format!(
        "Hello {name},\n\n\
         Thank you for reaching out. I'll get back to you soon.\n\n\
         Your message: \"{message}\"\n",
    );

    OutgoingEmail { to: to.to_string(), subject: CONFIRMATION_SUBJECT.to_string(), body }
}
