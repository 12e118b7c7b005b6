/// Rendered subject and bodies of an invitation email.
#[derive(Debug, Clone, PartialEq)]
pub struct InvitationEmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Default, Clone)]
pub struct InvitationTemplateRenderer;

impl InvitationTemplateRenderer {
    pub fn render(
        &self,
        store_name: &str,
        organization_name: &str,
        invitation_url: &str,
        expiration_days: i64,
    ) -> InvitationEmailContent {
        let subject = format!("You've been invited to manage {organization_name} on LaundroMate");

        let text = format!(
            "Hello,\n\n\
             You've been invited to manage {store_name} for {organization_name} on LaundroMate.\n\n\
             Accept the invitation and set up your account here:\n\
             {invitation_url}\n\n\
             This invitation expires in {expiration_days} {days}.\n\n\
             If you weren't expecting this email, you can ignore it.\n\n\
             The LaundroMate team\n",
            days = day_word(expiration_days),
        );

        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #1f2937;">
    <h2>You've been invited to LaundroMate</h2>
    <p>You've been invited to manage <strong>{store}</strong> for <strong>{organization}</strong> on LaundroMate.</p>
    <p>
      <a href="{url}" style="display: inline-block; padding: 12px 24px; background: #2563eb; color: #ffffff; text-decoration: none; border-radius: 6px;">Accept invitation</a>
    </p>
    <p>Or paste this link into your browser:<br>{url}</p>
    <p>This invitation expires in {expiration_days} {days}.</p>
    <p style="color: #6b7280; font-size: 12px;">If you weren't expecting this email, you can ignore it.</p>
  </body>
</html>
"#,
            store = escape_html(store_name),
            organization = escape_html(organization_name),
            url = escape_html(invitation_url),
            days = day_word(expiration_days),
        );

        InvitationEmailContent { subject, html, text }
    }
}

fn day_word(days: i64) -> &'static str {
    if days == 1 { "day" } else { "days" }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
