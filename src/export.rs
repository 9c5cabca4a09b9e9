//! Renders a [`ContentResult`] as a standalone Markdown document.

use crate::error::TransferError;
use crate::results::{ContentResult, ListKind, Table};
use crate::utils::TIMESTAMP_FORMAT;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Full text is only rendered when there are no paragraphs; it is then
/// re-flowed into chunks of roughly this many characters.
const MAX_FLOWED_PARAGRAPH: usize = 500;

/// Renders `content` with a title block, then description, page structure,
/// paragraphs, lists and tables, each section present only when non-empty.
pub fn to_markdown(content: &ContentResult, generated_at: DateTime<Local>) -> String {
    let mut blocks = vec![
        format!("# {}", content.title),
        format!("Scraped from: {}", content.url),
        format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Word Count: {}", content.word_count),
    ];

    if !content.meta_description.is_empty() {
        blocks.push("## Description".to_string());
        blocks.push(content.meta_description.clone());
    }

    if !content.headings.is_empty() {
        blocks.push("## Page Structure".to_string());
        blocks.extend(content.headings.iter().map(|heading| {
            let depth = (usize::from(heading.level) + 2).min(6);
            format!("{} {}", "#".repeat(depth), heading.text)
        }));
    }

    if !content.paragraphs.is_empty() {
        blocks.push("## Content".to_string());
        blocks.extend(
            content
                .paragraphs
                .iter()
                .filter(|p| !p.trim().is_empty())
                .cloned(),
        );
    }

    if !content.lists.is_empty() {
        blocks.push("## Lists".to_string());
        for list in &content.lists {
            blocks.push(format!("{} List:", list.kind));
            let items = list
                .items
                .iter()
                .enumerate()
                .map(|(n, item)| match list.kind {
                    ListKind::Ordered => format!("{}. {}", n + 1, item),
                    ListKind::Unordered => format!("- {}", item),
                })
                .collect::<Vec<_>>();
            blocks.push(items.join("\n"));
        }
    }

    if !content.tables.is_empty() {
        blocks.push("## Tables".to_string());
        blocks.extend(content.tables.iter().filter_map(render_table));
    }

    if content.paragraphs.is_empty() && !content.full_text.is_empty() {
        blocks.push("## Full Text Content".to_string());
        blocks.extend(flow_sentences(&content.full_text));
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Writes the rendered document to `dir` and returns its path
pub fn write_markdown(
    content: &ContentResult,
    dir: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf, TransferError> {
    std::fs::create_dir_all(dir).map_err(|e| TransferError::io(dir, e))?;

    let path = dir.join(format!(
        "scraped_content_{}.md",
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    std::fs::write(&path, to_markdown(content, generated_at))
        .map_err(|e| TransferError::io(&path, e))?;

    ::log::info!("Exported content of {} to {}", content.url, path.display());
    Ok(path)
}

/// Pipe table; the first row is the header row when the table has `<th>`
/// cells, otherwise an empty header row is emitted.
fn render_table(table: &Table) -> Option<String> {
    let columns = table.rows.iter().map(Vec::len).max().filter(|&n| n > 0)?;

    let row_line = |cells: &[String]| {
        let cells = (0..columns)
            .map(|col| {
                let cell = cells.get(col).map(String::as_str).unwrap_or_default();
                format!(" {} |", cell.replace('|', "\\|").replace('\n', " "))
            })
            .collect::<String>();
        format!("|{}", cells)
    };

    let (header, body) = match table.rows.split_first() {
        Some((first, rest)) if table.has_header => (row_line(first), rest),
        _ => (row_line(&[]), table.rows.as_slice()),
    };

    let mut lines = vec![header, format!("|{}", " --- |".repeat(columns))];
    lines.extend(body.iter().map(|row| row_line(row)));
    Some(lines.join("\n"))
}

/// Splits on sentence boundaries and packs sentences into chunks
fn flow_sentences(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split(". ") {
        if current.len() + sentence.len() > MAX_FLOWED_PARAGRAPH && !current.is_empty() {
            chunks.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(sentence);
        current.push_str(". ");
    }

    let last = current.trim();
    if !last.is_empty() {
        chunks.push(last.to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Heading, TextList};
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn sample() -> ContentResult {
        ContentResult {
            url: "https://example.com/".into(),
            title: "Example".into(),
            meta_description: "An example page".into(),
            headings: vec![Heading {
                level: 1,
                text: "Welcome".into(),
            }],
            paragraphs: vec!["A paragraph that is long enough.".into()],
            lists: vec![TextList {
                kind: ListKind::Ordered,
                items: vec!["first".into(), "second".into()],
            }],
            tables: vec![Table {
                rows: vec![
                    vec!["Name".into(), "Role".into()],
                    vec!["Ann".into(), "a|b".into()],
                ],
                has_header: true,
            }],
            full_text: "Example Welcome A paragraph that is long enough.".into(),
            word_count: 8,
        }
    }

    #[test]
    fn test_sections_in_order() {
        let md = to_markdown(&sample(), generated_at());

        let order = [
            "# Example",
            "Scraped from: https://example.com/",
            "Date: 2024-01-02 03:04:05",
            "Word Count: 8",
            "## Description",
            "## Page Structure",
            "### Welcome",
            "## Content",
            "## Lists",
            "Ordered List:",
            "1. first",
            "2. second",
            "## Tables",
            "| Name | Role |",
            "| --- | --- |",
            "| Ann | a\\|b |",
        ];
        let mut from = 0;
        for needle in order {
            let at = md[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing {needle:?} in\n{md}"));
            from += at + needle.len();
        }
        assert!(!md.contains("## Full Text Content"));
        assert!(md.starts_with("# Example\n\nScraped from: https://example.com/\n\n"));
        assert!(md.contains("Ordered List:\n\n1. first\n2. second\n\n## Tables"));
        assert!(md.ends_with("| Ann | a\\|b |\n"));
    }

    #[test]
    fn test_full_text_used_without_paragraphs() {
        let mut content = sample();
        content.paragraphs.clear();
        content.tables[0].has_header = false;

        let md = to_markdown(&content, generated_at());
        assert!(md.contains("## Full Text Content"));
        assert!(md.contains("|  |  |\n| --- | --- |\n| Name | Role |"));
    }

    #[test]
    fn test_flow_sentences_chunks() {
        let sentence = "x".repeat(300);
        let text = format!("{sentence}. {sentence}. end");
        let chunks = flow_sentences(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].ends_with("end."));
    }

    #[test]
    fn test_write_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_markdown(&sample(), dir.path(), generated_at()).unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "scraped_content_20240102_030405.md"
        );
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("# Example\n"));
    }
}
