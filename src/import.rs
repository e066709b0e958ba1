//! Loading of movie exports into memory.
//!
//! Accepts a JSON array or newline-delimited JSON, detected from the first non-blank byte.
//! Values go through MongoDB extended JSON, so `mongoexport` output (`{"$oid": ..}`,
//! `{"$numberInt": ..}`, ...) keeps its BSON types.

use bson::{Bson, Document as BsonDocument};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Auto,
    Ndjson,
    JsonArray,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub format: ImportFormat,
    /// Skip records that fail to parse instead of aborting.
    pub skip_errors: bool,
    /// Log progress every N records.
    pub progress_every: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { format: ImportFormat::Auto, skip_errors: false, progress_every: Some(10_000) }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: u64,
}

/// # Errors
/// Returns `DbError::Io` when the file cannot be opened, or any error from [`load_documents`].
pub fn load_file(
    path: &Path,
    opts: &ImportOptions,
) -> Result<(Vec<BsonDocument>, ImportReport), DbError> {
    let f = std::fs::File::open(path)
        .map_err(|e| DbError::Io(format!("cannot open {}: {e}", path.display())))?;
    load_documents(f, opts)
}

/// # Errors
/// Returns `DbError::Import` for a malformed record unless `skip_errors` is set, and
/// `DbError::Io` when reading fails.
pub fn load_documents<R: Read>(
    reader: R,
    opts: &ImportOptions,
) -> Result<(Vec<BsonDocument>, ImportReport), DbError> {
    let mut reader = BufReader::new(reader);
    let format = match opts.format {
        ImportFormat::Auto => detect_format(&mut reader)?,
        f => f,
    };
    let mut docs = Vec::new();
    let mut report = ImportReport::default();
    if format == ImportFormat::JsonArray {
        let val: serde_json::Value = serde_json::from_reader(reader)?;
        let arr = val
            .as_array()
            .ok_or_else(|| DbError::Import { record: 0, message: "expected JSON array".into() })?;
        for (i, v) in arr.iter().enumerate() {
            accept(to_document(v.clone(), i + 1), opts, &mut docs, &mut report)?;
        }
        return Ok((docs, report));
    }
    let mut line_no: usize = 0;
    let mut buf = String::with_capacity(8 * 1024);
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<serde_json::Value>(line)
            .map_err(|e| DbError::Import { record: line_no, message: e.to_string() })
            .and_then(|v| to_document(v, line_no));
        accept(parsed, opts, &mut docs, &mut report)?;
    }
    Ok((docs, report))
}

fn accept(
    parsed: Result<BsonDocument, DbError>,
    opts: &ImportOptions,
    docs: &mut Vec<BsonDocument>,
    report: &mut ImportReport,
) -> Result<(), DbError> {
    match parsed {
        Ok(d) => {
            docs.push(d);
            report.inserted += 1;
            if let Some(every) = opts.progress_every
                && every > 0
                && report.inserted % every as u64 == 0
            {
                log::info!("imported {} records", report.inserted);
            }
            Ok(())
        }
        Err(e) if opts.skip_errors => {
            log::warn!("skipping record: {e}");
            report.skipped += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn to_document(v: serde_json::Value, record: usize) -> Result<BsonDocument, DbError> {
    match Bson::try_from(v) {
        Ok(Bson::Document(d)) => Ok(d),
        Ok(other) => Err(DbError::Import {
            record,
            message: format!("expected an object, found {:?}", other.element_type()),
        }),
        Err(e) => Err(DbError::Import { record, message: e.to_string() }),
    }
}

fn detect_format<R: Read>(reader: &mut BufReader<R>) -> Result<ImportFormat, DbError> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(ImportFormat::Ndjson);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => {
                let first = buf[i];
                reader.consume(i);
                return Ok(if first == b'[' { ImportFormat::JsonArray } else { ImportFormat::Ndjson });
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndjson_with_blank_lines() {
        let input = "{\"title\":\"Heat\"}\n\n{\"title\":\"Ronin\"}\n";
        let (docs, report) = load_documents(input.as_bytes(), &ImportOptions::default()).unwrap();
        assert_eq!(report, ImportReport { inserted: 2, skipped: 0 });
        assert_eq!(docs[1].get_str("title").unwrap(), "Ronin");
    }

    #[test]
    fn json_array_is_detected() {
        let input = "  \n [ {\"title\": \"Heat\"}, {\"title\": \"Ronin\"} ]";
        let (docs, _) = load_documents(input.as_bytes(), &ImportOptions::default()).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn extended_json_keeps_types() {
        let input = r#"{"_id":{"$oid":"573a1390f29313caabcd4135"},"year":{"$numberInt":"1994"},"imdb":{"rating":{"$numberDouble":"9.3"}}}"#;
        let (docs, _) = load_documents(input.as_bytes(), &ImportOptions::default()).unwrap();
        assert!(matches!(docs[0].get("_id"), Some(Bson::ObjectId(_))));
        assert_eq!(docs[0].get_i32("year").unwrap(), 1994);
        assert_eq!(docs[0].get_document("imdb").unwrap().get_f64("rating").unwrap(), 9.3);
    }

    #[test]
    fn bad_line_aborts_or_is_skipped() {
        let input = "{\"title\":\"Heat\"}\nnot json\n42\n";
        let err = load_documents(input.as_bytes(), &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, DbError::Import { record: 2, .. }));
        let opts = ImportOptions { skip_errors: true, ..ImportOptions::default() };
        let (docs, report) = load_documents(input.as_bytes(), &opts).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(report.skipped, 2);
    }
}
