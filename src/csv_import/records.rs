//! Reads the raw records of a transaction CSV file.
//!
//! The expected layout is a header line followed by records with the columns
//! `title, type, value, category`, e.g.
//!
//! ```text
//! title, type, value, category
//! Loan, income, 1500, Others
//! Website Hosting, outcome, 50, Others
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::Error;

const TITLE_COLUMN: usize = 0;
const TYPE_COLUMN: usize = 1;
const VALUE_COLUMN: usize = 2;
const CATEGORY_COLUMN: usize = 3;

/// One unvalidated CSV record, fields mapped by position.
///
/// Missing trailing fields are read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRecord {
    /// The transaction title.
    pub title: String,
    /// The transaction type, expected to be `income` or `outcome`.
    pub kind: String,
    /// The transaction value, expected to be a non-negative number.
    pub value: String,
    /// The category title.
    pub category: String,
}

impl ImportRecord {
    /// Create a record from its four fields.
    pub fn new(title: &str, kind: &str, value: &str, category: &str) -> Self {
        Self {
            title: title.to_owned(),
            kind: kind.to_owned(),
            value: value.to_owned(),
            category: category.to_owned(),
        }
    }

    /// Whether every field of the record is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.kind.is_empty()
            && self.value.is_empty()
            && self.category.is_empty()
    }

    fn from_string_record(record: &StringRecord) -> Self {
        let field = |column: usize| record.get(column).unwrap_or_default().to_owned();

        Self {
            title: field(TITLE_COLUMN),
            kind: field(TYPE_COLUMN),
            value: field(VALUE_COLUMN),
            category: field(CATEGORY_COLUMN),
        }
    }
}

/// Read the records of a transaction CSV file.
///
/// The first line is a header and is skipped. Fields are trimmed of
/// surrounding whitespace and records may have fewer than four fields.
/// An empty line between records is read as a record with every field empty,
/// empty lines at the end of the file are ignored.
/// Records are not validated here, see [import_batch](crate::csv_import::import_batch).
///
/// # Errors
/// Returns [Error::InvalidCSV] if `text` cannot be read as CSV.
pub fn parse_csv(text: &str) -> Result<Vec<ImportRecord>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|error| Error::InvalidCSV(error.to_string()))?;
        let start = record
            .position()
            .map_or(0, |position| position.byte() as usize);

        let empty_lines = count_skipped_lines(text.as_bytes(), start);
        records.extend(std::iter::repeat_n(ImportRecord::default(), empty_lines));
        records.push(ImportRecord::from_string_record(&record));
    }

    tracing::debug!("Read {} records from CSV", records.len());

    Ok(records)
}

/// Count the empty lines the reader skipped before the record starting at byte `start`.
///
/// The reader sets a record's position before it skips empty lines, so the
/// skipped lines are the line terminators directly after `start`.
fn count_skipped_lines(text: &[u8], start: usize) -> usize {
    let mut rest = text.get(start..).unwrap_or_default();

    // The `\n` of a `\r\n` terminator is left for the next record to consume.
    let after_carriage_return = start
        .checked_sub(1)
        .and_then(|previous| text.get(previous))
        == Some(&b'\r');
    if let (true, [b'\n', tail @ ..]) = (after_carriage_return, rest) {
        rest = tail;
    }

    let mut count = 0;

    loop {
        rest = match rest {
            [b'\r', b'\n', tail @ ..] | [b'\n', tail @ ..] | [b'\r', tail @ ..] => tail,
            _ => return count,
        };
        count += 1;
    }
}

#[cfg(test)]
mod parse_csv_tests {
    use crate::csv_import::{ImportRecord, parse_csv};

    #[test]
    fn skips_header_and_trims_fields() {
        let text = "title, type, value, category\n\
            Loan, income, 1500, Others\n\
            Website Hosting , outcome,50,  Others";

        let records = parse_csv(text).unwrap();

        assert_eq!(
            records,
            vec![
                ImportRecord::new("Loan", "income", "1500", "Others"),
                ImportRecord::new("Website Hosting", "outcome", "50", "Others"),
            ]
        );
    }

    #[test]
    fn header_only_yields_no_records() {
        let records = parse_csv("title,type,value,category\n").unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn short_records_are_padded_with_empty_fields() {
        let text = "title,type,value,category\nrent,outcome,80";

        let records = parse_csv(text).unwrap();

        assert_eq!(records, vec![ImportRecord::new("rent", "outcome", "80", "")]);
    }

    #[test]
    fn all_empty_fields_are_kept_for_validation() {
        let text = "title,type,value,category\n , , , ";

        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
    }

    #[test]
    fn empty_line_between_records_is_an_empty_record() {
        let text = "title,type,value,category\n\
            rent,income,80,housing\n\
            \n\
            salary,income,50,work\n";

        let records = parse_csv(text).unwrap();

        assert_eq!(
            records,
            vec![
                ImportRecord::new("rent", "income", "80", "housing"),
                ImportRecord::default(),
                ImportRecord::new("salary", "income", "50", "work"),
            ]
        );
    }

    #[test]
    fn empty_line_after_header_is_an_empty_record() {
        let text = "title,type,value,category\n\nrent,income,80,housing";

        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
    }

    #[test]
    fn empty_lines_with_crlf_terminators_are_counted_once() {
        let text = "title,type,value,category\r\n\
            rent,income,80,housing\r\n\
            \r\n\
            \r\n\
            salary,income,50,work\r\n";

        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records[1].is_empty());
        assert!(records[2].is_empty());
        assert_eq!(records[3].title, "salary");
    }

    #[test]
    fn crlf_terminators_do_not_add_empty_records() {
        let text = "title,type,value,category\r\nrent,income,80,housing\r\nsalary,income,50,work";

        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| !record.is_empty()));
    }

    #[test]
    fn trailing_empty_lines_are_ignored() {
        let text = "title,type,value,category\nrent,income,80,housing\n\n\n";

        let records = parse_csv(text).unwrap();

        assert_eq!(records, vec![ImportRecord::new("rent", "income", "80", "housing")]);
    }

    #[test]
    fn quoted_fields_may_contain_commas() {
        let text = "title,type,value,category\n\"Rent, March\",outcome,80,Housing";

        let records = parse_csv(text).unwrap();

        assert_eq!(records[0].title, "Rent, March");
    }
}
