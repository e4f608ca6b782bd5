//! Notification bodies.
//!
//! The recipient name and the content are interpolated as they are unless
//! [`RenderOptions::escape_html`] is set.

use std::borrow::Cow;

use crate::SENDER_NAME;

const FOOTER_ORIGIN: &str = "This notification was sent from MyMindSpace";
const FOOTER_WELLNESS: &str = "Take care of your mental wellness 💚";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RenderOptions {
    /// Escape HTML special characters in user supplied text.
    pub escape_html: bool,
}

/// Renders the branded HTML body. Line breaks in `content` become `<br>`.
#[must_use]
pub fn render_html(name: &str, content: &str, options: RenderOptions) -> String {
    let (name, content) = if options.escape_html {
        (escape_html(name), escape_html(content))
    } else {
        (Cow::Borrowed(name), Cow::Borrowed(content))
    };
    let message = content.replace('\n', "<br>");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{SENDER_NAME} Notification</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background-color: #f5f5f5; }}
    .container {{ max-width: 600px; margin: 0 auto; background-color: white; }}
    .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px 20px; text-align: center; }}
    .header h1 {{ margin: 0; font-size: 24px; }}
    .content {{ padding: 30px 20px; }}
    .greeting {{ color: #333; font-size: 18px; margin-bottom: 20px; }}
    .message {{ color: #555; line-height: 1.6; font-size: 16px; margin-bottom: 30px; }}
    .footer {{ background-color: #f8f9fa; padding: 20px; text-align: center; color: #666; font-size: 14px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>🧠 {SENDER_NAME}</h1>
      <p>Your Mental Wellness Companion</p>
    </div>
    <div class="content">
      <div class="greeting">Hello {name},</div>
      <div class="message">{message}</div>
    </div>
    <div class="footer">
      <p>{FOOTER_ORIGIN}</p>
      <p>{FOOTER_WELLNESS}</p>
    </div>
  </div>
</body>
</html>
"#
    )
}

/// Renders the plain text alternative.
#[must_use]
pub fn render_text(name: &str, content: &str) -> String {
    format!("Hello {name},\n\n{content}\n\n---\n{FOOTER_ORIGIN}\n{FOOTER_WELLNESS}")
}

fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
