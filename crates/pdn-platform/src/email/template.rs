//! Alert email template

use chrono::{DateTime, Utc};

/// Subject and HTML body for one area's alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAlert {
    pub subject: String,
    pub html: String,
}

/// Renders outage alerts. The organization label follows the sender name,
/// e.g. "Sent by: Ravi ( Technician, KPTCL )".
#[derive(Debug, Clone)]
pub struct AlertTemplate {
    organization: String,
}

impl Default for AlertTemplate {
    fn default() -> Self {
        Self::new("KPTCL")
    }
}

impl AlertTemplate {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    pub fn subject(area: &str) -> String {
        format!("Power Delay Alert - {}", area)
    }

    pub fn render(&self, area: &str, message: &str, sender_name: &str, sent_at: DateTime<Utc>) -> RenderedAlert {
        let area_html = escape_html(area);
        let message_html = escape_html(message).replace("\r\n", "<br>").replace('\n', "<br>");
        let sender_html = escape_html(sender_name);
        let organization_html = escape_html(&self.organization);
        let time = sent_at.format("%Y-%m-%d %H:%M:%S UTC");

        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background-color: #dc2626; color: white; padding: 20px; text-align: center;">
    <h1 style="margin: 0;">&#9888;&#65039; Power Delay Alert</h1>
  </div>
  <div style="padding: 20px; background-color: #f9fafb;">
    <h2 style="color: #374151;">Area: {area_html}</h2>
    <div style="background-color: white; padding: 15px; border-radius: 8px; border-left: 4px solid #dc2626;">
      <p style="margin: 0; line-height: 1.6;">{message_html}</p>
    </div>
    <p style="color: #6b7280; font-size: 14px; margin-top: 20px;">
      <strong>Sent by:</strong> {sender_html} ( Technician, {organization_html} )<br>
      <strong>Time:</strong> {time}
    </p>
  </div>
  <div style="background-color: #374151; color: #9ca3af; padding: 15px; text-align: center; font-size: 12px;">
    <p style="margin: 0;">This is an automated notification from the Power Delay Notifier system.</p>
    <p style="margin: 5px 0 0 0;">Please do not reply to this email.</p>
  </div>
</div>"#
        );

        RenderedAlert {
            subject: Self::subject(area),
            html,
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_subject_names_area() {
        let alert = AlertTemplate::default().render("chickpete", "Outage until 6pm", "Ravi", at());
        assert_eq!(alert.subject, "Power Delay Alert - chickpete");
    }

    #[test]
    fn test_body_contents() {
        let alert = AlertTemplate::new("BESCOM").render("balepete", "Line 1\nLine 2", "Ravi", at());

        assert!(alert.html.contains("Area: balepete"));
        assert!(alert.html.contains("Line 1<br>Line 2"));
        assert!(alert.html.contains("Ravi ( Technician, BESCOM )"));
        assert!(alert.html.contains("2024-03-05 14:30:00 UTC"));
        assert!(alert.html.contains("Please do not reply to this email."));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let alert = AlertTemplate::default().render("<b>x</b>", "a & b <script>", "O'Neil", at());

        assert!(alert.html.contains("Area: &lt;b&gt;x&lt;/b&gt;"));
        assert!(alert.html.contains("a &amp; b &lt;script&gt;"));
        assert!(alert.html.contains("O&#39;Neil"));
        assert!(!alert.html.contains("<script>"));
    }
}
