// CSV/TSV loading into a Table

use std::path::Path;

use crawlparity_recon::{CellValue, ReconError};

use crate::table::Table;

pub fn load(path: &Path, source: &str) -> Result<Table, ReconError> {
    let content = read_file_as_utf8(path).map_err(|e| {
        ReconError::source_load(source, format!("{}: {e}", path.display()))
    })?;
    let delimiter = sniff_delimiter(&content);
    table_from_str(&content, delimiter)
        .map_err(|e| ReconError::source_load(source, format!("{}: {e}", path.display())))
}

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// Guess the delimiter of a crawl export from its opening lines.
///
/// A candidate must split the header into at least two columns. Among those, the one whose
/// header width is repeated by the most sample lines wins, weighted by that width. Ties keep
/// the earlier candidate, so comma is preferred. Defaults to comma.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    let Some((header, body)) = sample.split_first() else {
        return b',';
    };

    let mut best = (b',', 0usize);
    for delimiter in DELIMITERS {
        let width = field_count(header, delimiter);
        if width < 2 {
            continue;
        }
        let agreeing = 1 + body.iter().filter(|line| field_count(line, delimiter) == width).count();
        let score = agreeing * width;
        if score > best.1 {
            best = (delimiter, score);
        }
    }
    best.0
}

/// Decode raw export bytes. Invalid UTF-8 is read as Windows-1252, the usual encoding of
/// spreadsheet-saved CSV. A leading byte-order mark is dropped.
pub fn decode_export(bytes: Vec<u8>) -> String {
    let text = String::from_utf8(bytes).unwrap_or_else(|e| {
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
        decoded.into_owned()
    });
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_owned(),
        None => text,
    }
}

pub fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    std::fs::read(path).map(decode_export)
}

/// Parse CSV text. The first record is the header row; blank fields become `Empty`.
pub fn table_from_str(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(CellValue::from_field).collect());
    }

    Ok(Table::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sniff_comma_and_semicolon() {
        assert_eq!(sniff_delimiter("URL,Status Code\nhttps://a.com,200\n"), b',');
        assert_eq!(sniff_delimiter("URL;Status Code\nhttps://a.com;200\n"), b';');
        assert_eq!(sniff_delimiter("URL\tStatus Code\nhttps://a.com\t200\n"), b'\t');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn sniff_prefers_delimiter_the_rows_agree_with() {
        // comma splits the header in two but no row agrees; semicolon is consistent
        let content = "URL;Title;Word Count, total\nhttps://a.com;A;10\nhttps://a.com/b;B;20\n";
        assert_eq!(sniff_delimiter(content), b';');
        // equal scores fall back to the earlier candidate
        assert_eq!(sniff_delimiter("a,b;c\n"), b',');
    }

    #[test]
    fn decode_strips_bom_and_falls_back_to_windows_1252() {
        assert_eq!(decode_export(b"\xef\xbb\xbfURL".to_vec()), "URL");
        assert_eq!(decode_export(b"Caf\xe9 \x93q\x94".to_vec()), "Café \u{201c}q\u{201d}");
    }

    #[test]
    fn quoted_issue_cell_keeps_semicolons() {
        let content = "URL,Issues\nhttps://a.com,\"Missing Title; Thin Content\"\nhttps://a.com/b,\n";
        let table = table_from_str(content, sniff_delimiter(content)).unwrap();
        assert_eq!(table.headers, vec!["URL", "Issues"]);
        assert_eq!(table.cell(0, 1), &CellValue::Text("Missing Title; Thin Content".into()));
        assert_eq!(table.cell(1, 1), &CellValue::Empty);
    }

    #[test]
    fn windows_1252_and_bom() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        // "Café" in Windows-1252
        f.write_all(b"URL,Title\nhttps://a.com,Caf\xe9\n").unwrap();
        let table = load(f.path(), "left").unwrap();
        assert_eq!(table.cell(0, 1), &CellValue::Text("Café".into()));

        let mut g = tempfile::NamedTempFile::new().unwrap();
        g.write_all("\u{feff}URL,Title\nhttps://a.com,x\n".as_bytes()).unwrap();
        let table = load(g.path(), "left").unwrap();
        assert_eq!(table.headers[0], "URL");
    }

    #[test]
    fn missing_file_is_source_load_error() {
        let err = load(Path::new("/nonexistent/crawl.csv"), "CrawlLogic").unwrap_err();
        assert!(matches!(err, ReconError::SourceLoad { .. }));
        assert!(err.to_string().starts_with("source 'CrawlLogic': cannot load:"));
    }
}
