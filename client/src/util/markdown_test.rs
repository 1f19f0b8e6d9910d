use super::*;

#[test]
fn renders_headings_and_code() {
    let html = render_markdown_html("# Ownership\n\nUse `&str`.");
    assert!(html.contains("<h1>Ownership</h1>"));
    assert!(html.contains("<code>&amp;str</code>"));
}

#[test]
fn drops_raw_html() {
    let html = render_markdown_html("Hello <script>alert(1)</script> world");
    assert!(!html.contains("<script>"));
    assert!(html.contains("Hello"));
}

#[test]
fn renders_tables() {
    let html = render_markdown_html("| a | b |\n|---|---|\n| 1 | 2 |");
    assert!(html.contains("<table>"));
}

#[test]
fn duration_label_formats_minutes_and_hours() {
    assert_eq!(duration_label(0), "");
    assert_eq!(duration_label(45), "45 min");
    assert_eq!(duration_label(120), "2 h");
    assert_eq!(duration_label(95), "1 h 35 min");
}
