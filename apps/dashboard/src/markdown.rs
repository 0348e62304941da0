//! Markdown rendering shared by the dashboard views and the newsletter email.
//! Inline HTML in the source is passed through.

use pulldown_cmark::{html, Options, Parser};

pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headings_tables_and_checklists() {
        let html = markdown_to_html(
            "# March Plan\n\n| Month | Task |\n|---|---|\n| Mar | SAT |\n\n- [ ] Register for AP exams\n",
        );
        assert!(html.contains("<h1>March Plan</h1>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>SAT</td>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_inline_html_passes_through() {
        let html = markdown_to_html("Andy Lee | Branch Director <br>\nTel");
        assert!(html.contains("<br>"));
    }
}
