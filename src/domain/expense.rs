use serde::{Deserialize, Serialize};
use std::fmt;

/// Column layout of the ledger file, in storage order.
pub const LEDGER_HEADER: [&str; 7] = [
    "date",
    "category",
    "subcategory",
    "amount",
    "surcharge",
    "necessity",
    "desc",
];

const AMOUNT_COLUMN: usize = 3;
const SURCHARGE_COLUMN: usize = 4;

/// Placeholder older ledgers carry in the surcharge column when none was given.
const MISSING_SURCHARGE: &str = "None";

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Calendar date as `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    /// Extra cost on top of `amount` (fees, tips); zero when absent
    pub surcharge: f64,
    /// Free-form classification such as "need" or "want"
    pub necessity: String,
    pub desc: String,
}

/// A record as returned by a list, tagged with its positional id.
///
/// The id is the zero-based index of the row among the data rows at the time
/// of listing. It is not stored and shifts when earlier rows are deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedExpense {
    pub id: usize,
    #[serde(flatten)]
    pub record: ExpenseRecord,
}

/// Payload accepted when recording a new expense.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    #[serde(default)]
    pub surcharge: Option<f64>,
    pub necessity: String,
    pub desc: String,
}

impl NewExpense {
    /// Turn the payload into a record, using `date` as the stored date.
    pub fn into_record(self, date: String) -> ExpenseRecord {
        ExpenseRecord {
            date,
            category: self.category,
            subcategory: self.subcategory,
            amount: self.amount,
            surcharge: self.surcharge.unwrap_or(0.0),
            necessity: self.necessity,
            desc: self.desc,
        }
    }
}

/// A numeric column that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFieldError {
    pub column: &'static str,
    pub value: String,
}

impl fmt::Display for RowFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value {:?}", self.column, self.value)
    }
}

impl std::error::Error for RowFieldError {}

impl ExpenseRecord {
    /// Build a record from raw ledger columns, taking `date` as already normalized.
    ///
    /// Missing text columns read as empty strings. An empty surcharge, or one
    /// holding the `None` placeholder, reads as zero. Any other non-numeric
    /// amount or surcharge is rejected.
    pub fn from_row<'a, I>(date: String, row: I) -> Result<Self, RowFieldError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns: Vec<&str> = row.into_iter().collect();
        columns.resize(LEDGER_HEADER.len(), "");

        let amount = parse_number(columns[AMOUNT_COLUMN], AMOUNT_COLUMN)?
            .ok_or_else(|| RowFieldError {
                column: LEDGER_HEADER[AMOUNT_COLUMN],
                value: String::new(),
            })?;
        let surcharge = match columns[SURCHARGE_COLUMN].trim() {
            MISSING_SURCHARGE => 0.0,
            raw => parse_number(raw, SURCHARGE_COLUMN)?.unwrap_or(0.0),
        };

        Ok(Self {
            date,
            category: columns[1].to_string(),
            subcategory: columns[2].to_string(),
            amount,
            surcharge,
            necessity: columns[5].to_string(),
            desc: columns[6].to_string(),
        })
    }

    /// Serialize the record into ledger columns, in header order.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.date.clone(),
            self.category.clone(),
            self.subcategory.clone(),
            format_amount(self.amount),
            format_amount(self.surcharge),
            self.necessity.clone(),
            self.desc.clone(),
        ]
    }
}

fn parse_number(raw: &str, column: usize) -> Result<Option<f64>, RowFieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(RowFieldError {
            column: LEDGER_HEADER[column],
            value: raw.to_string(),
        }),
    }
}

/// Format an amount for storage.
/// Example: 10.0 -> "10.0", 12.5 -> "12.5", 0.0 -> "0.0"
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
