// src/output/csv.rs
//! The `pages.csv` tracking sheet.

use super::export::PageMetadata;

pub const TRACKING_SHEET_HEADER: &[&str] =
    &["Title", "Slug", "File", "URL", "Status", "AudioURL", "VideoURL"];

/// Quotes a field when it contains a delimiter, quote or line break.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the sheet with one row per page, in the given order.
pub fn tracking_sheet(pages: &[PageMetadata]) -> String {
    let mut sheet = row(TRACKING_SHEET_HEADER.iter().copied());
    sheet.push('\n');
    for page in pages {
        sheet.push_str(&row([
            page.title.as_str(),
            page.slug.as_str(),
            page.file.as_str(),
            page.url.as_str(),
            page.status.as_str(),
            page.audio_url.as_deref().unwrap_or(""),
            page.video_url.as_deref().unwrap_or(""),
        ]));
        sheet.push('\n');
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escaping() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn sheet_has_header_and_rows() {
        let page = PageMetadata {
            id: "id".to_string(),
            title: "Hello, world".to_string(),
            slug: "hello-world".to_string(),
            file: "hello-world.md".to_string(),
            url: "https://notion.so/x".to_string(),
            status: "Draft".to_string(),
            audio_url: Some("https://cdn/a.mp3".to_string()),
            video_url: None,
            exported_at: chrono::Utc::now(),
        };
        assert_eq!(
            tracking_sheet(&[page]),
            "Title,Slug,File,URL,Status,AudioURL,VideoURL\n\
             \"Hello, world\",hello-world,hello-world.md,https://notion.so/x,Draft,https://cdn/a.mp3,\n"
        );
    }
}
