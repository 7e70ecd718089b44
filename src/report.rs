//! Fixed-width tabular listing of the records, ordered by name.

use std::io::{self, Write};

use crate::rbtree::RBTree;
use crate::record::Record;


const SEPARATOR_WIDTH: usize = 46;

/// Every record, sorted by name. Records with the same name stay in id order.
pub fn sorted_by_name(tree: &RBTree) -> Vec<&Record> {
    let mut records: Vec<&Record> = tree.iter().collect();
    // stable sort, and the in-order walk already sorted by id
    records.sort_by(|a, b| a.name().cmp(b.name()));
    records
}

pub fn render_table<'a, W, I>(records: I, mut writer: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return writeln!(writer, "No records found.")
    }

    writeln!(writer, "{:<5} | {:<30} | {:<10}", "ID", "Name", "Score")?;
    writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    for record in records {
        writeln!(writer, "{:<5} | {:<30} | {:<10.2}", record.id(), record.name(), record.score())?;
    }
    Ok(())
}

/// The whole report as a string.
pub fn report(tree: &RBTree) -> io::Result<String> {
    let mut out = Vec::new();
    render_table(sorted_by_name(tree), &mut out)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
