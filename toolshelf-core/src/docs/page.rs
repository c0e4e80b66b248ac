//! Rendering of generated documentation pages

/// First Markdown level-1 heading (`# Title`) in `markdown`
pub fn first_heading(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
}

/// Front-matter tagged documentation page for a toolkit README
///
/// `source` is the repository-relative path of the canonical README and
/// is recorded in a generated-from comment.
pub fn render_readme_page(markdown: &str, fallback_title: &str, source: &str) -> String {
    let body = markdown.trim();
    let title = first_heading(body).unwrap_or_else(|| fallback_title.to_string());

    let mut page = [
        "---".to_string(),
        format!("title: {title}"),
        "---".to_string(),
        String::new(),
        format!("<!-- This file is auto-generated from {source}. -->"),
        String::new(),
        body.to_string(),
    ]
    .join("\n");

    if !page.ends_with('\n') {
        page.push('\n');
    }
    page
}

/// Placeholder page that forwards visitors to the static bundle
pub fn render_redirect_html(slug: &str) -> String {
    let href = "../bundle.zip";
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="0; url={href}">
    <title>Downloading {slug} bundle</title>
  </head>
  <body>
    <p>If you are not redirected automatically, <a href="{href}">download the bundle</a>.</p>
  </body>
</html>
"#
    )
}
