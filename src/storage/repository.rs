use csv::{Reader, ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::domain::{
    normalize_date, normalize_entry_date, ExpenseRecord, ListedExpense, NewExpense, LEDGER_HEADER,
};

use super::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the CSV ledger file.
///
/// The handle only carries the path. Every operation opens the file, does its
/// work and closes it again, so nothing is cached between calls and cloning
/// the handle is cheap.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create a handle for the ledger at `path`. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the ledger with only its header row if it does not exist yet.
    /// Returns `true` when the file was created.
    pub fn init(&self) -> StoreResult<bool> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(self.io_error(err)),
        };

        let mut writer = ledger_writer(file);
        writer
            .write_record(LEDGER_HEADER)
            .map_err(|err| self.csv_error(err))?;
        writer.flush().map_err(|err| self.io_error(err))?;
        Ok(true)
    }

    /// Read every expense in file order.
    ///
    /// Rows without a date are skipped but still count towards the ids of the
    /// rows after them, so ids always match the positions `delete_by_id` uses.
    /// A missing ledger lists as empty.
    pub fn list(&self) -> StoreResult<Vec<ListedExpense>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        let mut reader = ledger_reader(file);
        let mut rows = reader.records();

        match rows.next() {
            Some(header) => {
                let header = header.map_err(|err| self.csv_error(err))?;
                if !header.iter().eq(LEDGER_HEADER) {
                    log::warn!(
                        "unexpected header in {}: {:?}, reading columns by position",
                        self.path.display(),
                        header
                    );
                }
            }
            None => return Ok(Vec::new()),
        }

        let mut expenses = Vec::new();
        for (id, row) in rows.enumerate() {
            let row = row.map_err(|err| self.csv_error(err))?;
            let Some(date) = row.get(0).and_then(normalize_date) else {
                continue;
            };

            let record = ExpenseRecord::from_row(date, row.iter()).map_err(|err| {
                StoreError::MalformedRow {
                    line: row.position().map(|pos| pos.line()).unwrap_or_default(),
                    column: err.column,
                    value: err.value,
                }
            })?;
            expenses.push(ListedExpense { id, record });
        }

        Ok(expenses)
    }

    /// Append a new expense as the last row, leaving existing rows untouched.
    ///
    /// The date is normalized before writing. A missing or empty ledger gets
    /// its header first. Errors are not classified: a locked file is reported
    /// like any other I/O failure.
    pub fn append(&self, expense: NewExpense) -> StoreResult<ExpenseRecord> {
        let date = normalize_entry_date(&expense.date);
        let record = expense.into_record(date);

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        if len > 0 && !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = ledger_writer(file);
        if len == 0 {
            writer.write_record(LEDGER_HEADER)?;
        }
        writer.write_record(record.to_row())?;
        writer.flush()?;

        Ok(record)
    }

    /// Remove the data row at position `id` and rewrite the whole file.
    ///
    /// An id outside the data rows, negative ones included, fails with
    /// `NotFound` and leaves the file as it was. The new contents go to a
    /// sibling file that then replaces the ledger, so a failed rewrite never
    /// leaves a truncated ledger behind. A leading byte-order mark and CRLF
    /// line endings survive the rewrite.
    pub fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        let contents = fs::read(&self.path).map_err(|err| self.io_error(err))?;
        let (bom, body) = match contents.strip_prefix(UTF8_BOM) {
            Some(body) => (true, body),
            None => (false, contents.as_slice()),
        };
        let terminator = line_terminator(body);

        let mut rows = ledger_reader(body)
            .into_records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(|err| self.csv_error(err))?;

        // Row 0 is the header; data rows start at 1.
        let target = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_add(1))
            .filter(|target| *target < rows.len())
            .ok_or(StoreError::NotFound { id })?;
        rows.remove(target);

        let rewrite_path = self.rewrite_path();
        let result = self.write_rows(&rewrite_path, bom, terminator, &rows);
        if result.is_err() {
            let _ = fs::remove_file(&rewrite_path);
        }
        result
    }

    fn write_rows(
        &self,
        staging: &Path,
        bom: bool,
        terminator: Terminator,
        rows: &[StringRecord],
    ) -> StoreResult<()> {
        let mut file = File::create(staging).map_err(|err| self.io_error(err))?;
        if bom {
            file.write_all(UTF8_BOM).map_err(|err| self.io_error(err))?;
        }

        let mut writer = ledger_writer_with(file, terminator);
        for row in rows {
            writer.write_record(row).map_err(|err| self.csv_error(err))?;
        }
        let file = writer
            .into_inner()
            .map_err(|err| self.io_error(err.into_error()))?;
        file.sync_all().map_err(|err| self.io_error(err))?;
        drop(file);

        fs::rename(staging, &self.path).map_err(|err| self.io_error(err))
    }

    /// Sibling file a rewrite is staged in, e.g. `expenses.csv.tmp`.
    fn rewrite_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, err: io::Error) -> StoreError {
        StoreError::from_io(&self.path, err)
    }

    fn csv_error(&self, err: csv::Error) -> StoreError {
        StoreError::from_csv(&self.path, err)
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn ledger_reader<R: Read>(source: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source)
}

fn ledger_writer(file: File) -> Writer<File> {
    ledger_writer_with(file, Terminator::Any(b'\n'))
}

fn ledger_writer_with(file: File, terminator: Terminator) -> Writer<File> {
    WriterBuilder::new()
        .flexible(true)
        .terminator(terminator)
        .from_writer(file)
}

/// Row terminator used by existing ledger contents, judged by the first line.
fn line_terminator(contents: &[u8]) -> Terminator {
    match contents.iter().position(|b| *b == b'\n') {
        Some(pos) if pos > 0 && contents[pos - 1] == b'\r' => Terminator::CRLF,
        _ => Terminator::Any(b'\n'),
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
