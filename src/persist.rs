//! Flat-file snapshots of an [`RBTree`].
//!
//! One record per line, `id|name|score`, with the score printed to two
//! decimals. Saving walks the tree in order, so files are always sorted by id.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::RecordLimits;
use crate::error::{IndexError, Result};
use crate::rbtree::RBTree;
use crate::record::Record;


/// Formats one record as a line, without the trailing newline.
///
/// Fails with [`IndexError::InvalidInput`] if the record would not survive a
/// [`parse_line`] with the same `limits`.
pub fn format_line(record: &Record, limits: &RecordLimits) -> Result<String> {
    let id = record.id();
    limits.check_id(i64::from(id))
        .and_then(|_| limits.check_fields(record.name(), record.score()))
        .map_err(|err| match err {
            IndexError::InvalidInput(reason) => IndexError::InvalidInput(format!("record {id}: {reason}")),
            other => other,
        })?;
    Ok(format!("{}|{}|{:.2}", id, record.name(), record.score()))
}

/// Formats every record up front, so nothing is written if one of them is bad.
fn format_all(tree: &RBTree, limits: &RecordLimits) -> Result<Vec<String>> {
    tree.iter().map(|record| format_line(record, limits)).collect()
}

/// Parses one `id|name|score` line and checks it against `limits`.
pub fn parse_line(line: &str, limits: &RecordLimits) -> Result<Record> {
    let (id, rest) = line.split_once('|')
        .ok_or_else(|| IndexError::InvalidInput("expected `id|name|score`".into()))?;
    let (name, score) = rest.rsplit_once('|')
        .ok_or_else(|| IndexError::InvalidInput("missing score field".into()))?;

    let id: i64 = id.trim().parse()
        .map_err(|_| IndexError::InvalidInput(format!("bad id {id:?}")))?;
    let score: f64 = score.trim().parse()
        .map_err(|_| IndexError::InvalidInput(format!("bad score {score:?}")))?;

    limits.validate(id, name, score)
}

/// Writes every record to `writer` in ascending id order.
///
/// Every record is checked against `limits` before the first byte is written.
/// Returns the number of records written.
pub fn save<W: Write>(tree: &RBTree, writer: W, limits: &RecordLimits) -> Result<usize> {
    let lines = format_all(tree, limits)?;
    write_lines(&lines, writer)
}

/// Saves to `path`, replacing whatever was there.
///
/// If a record is rejected the file is left alone.
pub fn save_to_path(tree: &RBTree, path: impl AsRef<Path>, limits: &RecordLimits) -> Result<usize> {
    let path = path.as_ref();
    let lines = format_all(tree, limits)?;
    let count = write_lines(&lines, BufWriter::new(File::create(path)?))?;
    info!("Saved {count} records to {}", path.display());
    Ok(count)
}

fn write_lines<W: Write>(lines: &[String], mut writer: W) -> Result<usize> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(lines.len())
}

/// Inserts every record read from `reader`. Blank lines are skipped.
///
/// Stops at the first bad line and reports it as [`IndexError::Parse`] with a
/// 1-based line number; records before it stay inserted. A duplicate id is
/// reported the same way.
pub fn load<R: BufRead>(tree: &mut RBTree, reader: R, limits: &RecordLimits) -> Result<usize> {
    let mut count = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue
        }

        let reason = match parse_line(&line, limits).and_then(|record| tree.insert(record)) {
            Ok(()) => { count += 1; continue }
            Err(IndexError::InvalidInput(reason)) => reason,
            Err(err @ IndexError::DuplicateKey { .. }) => err.to_string(),
            Err(err) => return Err(err),
        };
        warn!("Rejected line {line_no}: {reason}");
        return Err(IndexError::Parse { line: line_no, reason })
    }
    Ok(count)
}

/// Loads from `path`. A missing file counts as an empty snapshot.
pub fn load_from_path(tree: &mut RBTree, path: impl AsRef<Path>, limits: &RecordLimits) -> Result<usize> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{} does not exist, starting empty", path.display());
            return Ok(0)
        }
        Err(e) => return Err(e.into()),
    };

    let count = load(tree, BufReader::new(file), limits)?;
    info!("Loaded {count} records from {}", path.display());
    Ok(count)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_two_decimals() {
        let limits = RecordLimits::default();
        assert_eq!(format_line(&Record::new(7, "Ada Lovelace", 95.0), &limits).unwrap(), "7|Ada Lovelace|95.00");
        assert_eq!(format_line(&Record::new(8, "Bob", 66.666), &limits).unwrap(), "8|Bob|66.67");
    }

    #[test]
    fn format_rejects_unparseable_records() {
        let limits = RecordLimits::default();
        for record in [
            Record::new(1, "a|b", 1.0),
            Record::new(2, "line\nbreak", 2.0),
            Record::new(3, "cr\rhere", 3.0),
            Record::new(4, "x", 150.0),
            Record::new(5, "x", f64::NAN),
            Record::new(0, "zero", 1.0),
        ] {
            let err = format_line(&record, &limits).unwrap_err();
            match err {
                IndexError::InvalidInput(reason) => assert!(reason.starts_with(&format!("record {}:", record.id())), "{reason}"),
                other => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn save_writes_nothing_when_a_record_is_bad() {
        let mut tree = RBTree::new();
        tree.insert(Record::new(1, "fine", 1.0)).unwrap();
        tree.insert(Record::new(2, "line\nbreak", 2.0)).unwrap();
        tree.insert(Record::new(3, "a|b", 3.0)).unwrap();

        let mut out = Vec::new();
        let err = save(&tree, &mut out, &RecordLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput(_)), "{err}");
        assert!(out.is_empty());
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.txt");
        let limits = RecordLimits::default();

        let mut tree = RBTree::new();
        tree.insert(Record::new(1, "fine", 1.0)).unwrap();
        save_to_path(&tree, &path, &limits).unwrap();

        tree.insert(Record::new(2, "x", 150.0)).unwrap();
        assert!(save_to_path(&tree, &path, &limits).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1|fine|1.00\n");
    }

    #[test]
    fn parse_good_line() {
        let r = parse_line("12|Grace Hopper|88.50", &RecordLimits::default()).unwrap();
        assert_eq!(r, Record::new(12, "Grace Hopper", 88.5));
    }

    #[test]
    fn parse_bad_lines() {
        let limits = RecordLimits::default();
        for line in ["", "12", "12|name", "x|name|1.0", "1|name|abc", "0|name|1.0", "1||1.0", "1|a|b|1.0", "1|name|101"] {
            assert!(matches!(parse_line(line, &limits), Err(IndexError::InvalidInput(_))), "{line:?}");
        }
    }

    #[test]
    fn save_is_sorted() {
        let mut tree = RBTree::new();
        for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
            tree.insert(Record::new(id, name, 1.0)).unwrap();
        }
        let mut out = Vec::new();
        assert_eq!(save(&tree, &mut out, &RecordLimits::default()).unwrap(), 3);
        assert_eq!(String::from_utf8(out).unwrap(), "1|a|1.00\n2|b|1.00\n3|c|1.00\n");
    }

    #[test]
    fn load_skips_blank_lines() {
        let mut tree = RBTree::new();
        let input = "2|b|20.00\n\n1|a|10.00\n   \n";
        assert_eq!(load(&mut tree, input.as_bytes(), &RecordLimits::default()).unwrap(), 2);
        assert_eq!(tree.search(1).unwrap().name(), "a");
        assert_eq!(tree.search(2).unwrap().score(), 20.0);
    }

    #[test]
    fn load_reports_line_numbers() {
        let mut tree = RBTree::new();
        let input = "1|a|10.00\n2|b|oops\n3|c|30.00\n";
        let err = load(&mut tree, input.as_bytes(), &RecordLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::Parse { line: 2, .. }), "{err}");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn load_rejects_duplicates() {
        let mut tree = RBTree::new();
        let input = "1|a|10.00\n1|again|20.00\n";
        let err = load(&mut tree, input.as_bytes(), &RecordLimits::default()).unwrap_err();
        match err {
            IndexError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("already exists"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(tree.search(1).unwrap().name(), "a");
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = RBTree::new();
        let count = load_from_path(&mut tree, dir.path().join("nope.txt"), &RecordLimits::default()).unwrap();
        assert_eq!(count, 0);
        assert!(tree.is_empty());
    }
}
