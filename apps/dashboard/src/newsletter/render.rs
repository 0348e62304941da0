//! Markdown → email HTML.

use crate::markdown::markdown_to_html;

/// Content-ID of the inline logo part.
pub const LOGO_CID: &str = "logo_image";

/// Wraps the rendered body in the newsletter layout. With `with_logo`, a centered
/// logo referencing the inline image part is placed above the content.
pub fn email_html(markdown: &str, with_logo: bool) -> String {
    let body = markdown_to_html(markdown);
    let logo = if with_logo {
        format!(
            r#"<div style="text-align: center; margin-bottom: 20px;"><img src="cid:{LOGO_CID}" alt="Elite Prep Logo" style="max-width: 75px;"></div>"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        {logo}
        {body}
        <hr style="margin-top: 30px; border: 0; border-top: 1px solid #eee;">
    </div>
</body>
</html>
"#
    )
}
