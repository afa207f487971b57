//! CSV table storage.

use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tickbar_aggregate::{BarStore, is_valid_name, split_qualified, upsert_bar};
use tickbar_format::{CsvFormatter, parse_bar_row};
use tickbar_types::{Bar, StoreError};
use tracing::debug;

/// Bytes read per step when scanning a table backwards for its last rows.
const TAIL_BLOCK: u64 = 4096;

/// The last rows of a table and the byte offset where the first of them starts.
#[derive(Debug)]
struct TableTail {
    offset: u64,
    rows: Vec<(u64, String)>,
}

/// Stores bar tables as CSV files.
///
/// Layout: `<root>/<database>/<table>.csv`, each file starting with a
/// header line naming the table's columns. Timestamps are epoch seconds.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
    formatter: CsvFormatter,
}

impl CsvStore {
    /// Creates a store rooted at `root`. Nothing is created until
    /// [`BarStore::ensure_database`] is called.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            formatter: CsvFormatter::new()
                .with_header(false)
                .with_iso_timestamps(false),
        }
    }

    /// Returns the default root for bar storage.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.local/share/tickbar/`
    /// - macOS: `~/Library/Application Support/tickbar/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\tickbar\`
    ///
    /// Falls back to `./tickbar-data` if the platform location cannot be
    /// determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "tickbar").map_or_else(
            || PathBuf::from("tickbar-data"),
            |proj_dirs| proj_dirs.data_dir().to_path_buf(),
        )
    }

    /// Creates a store at the default root.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file backing a table.
    #[must_use]
    pub fn table_path(&self, database: &str, table: &str) -> PathBuf {
        self.root.join(database).join(format!("{table}.csv"))
    }

    /// Reads every row of a `<database>.<table>` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, cannot be read, or
    /// holds a row that does not decode.
    pub fn load_bars(&self, qualified: &str) -> Result<Vec<Bar>, StoreError> {
        let (database, table) = split_qualified(qualified)?;
        let path = self.table_path(database, table);
        if !path.exists() {
            return Err(StoreError::UnknownTable(qualified.to_string()));
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadTable {
            path: path.clone(),
            source: e,
        })?;

        content
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                parse_bar_row(line, self.formatter.delimiter()).map_err(|message| {
                    StoreError::CorruptRow {
                        table: qualified.to_string(),
                        line: i + 1,
                        message,
                    }
                })
            })
            .collect()
    }

    fn header(&self, columns: &[&str]) -> String {
        columns.join(&self.formatter.delimiter().to_string())
    }

    fn render(&self, bars: &[Bar], path: &Path) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        self.formatter
            .write_bar_rows(bars, &mut buf)
            .map_err(|e| StoreError::WriteTable {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;
        Ok(buf)
    }

    /// Reads the last `count` rows of a table without touching the rest of
    /// the file.
    fn read_tail(path: &Path, count: usize) -> Result<TableTail, StoreError> {
        let read_err = |e| StoreError::ReadTable {
            path: path.to_path_buf(),
            source: e,
        };
        let mut file = File::open(path).map_err(read_err)?;
        let len = file.metadata().map_err(read_err)?.len();

        // Grow the window until it holds `count` complete rows plus the
        // newline before them, or reaches the header.
        let mut start = len;
        let mut buf = Vec::new();
        while start > 0 && buf.iter().filter(|&&b| b == b'\n').count() <= count {
            let step = TAIL_BLOCK.min(start);
            start -= step;
            let mut block = vec![0u8; usize::try_from(step).unwrap_or(usize::MAX)];
            file.seek(SeekFrom::Start(start)).map_err(read_err)?;
            file.read_exact(&mut block).map_err(read_err)?;
            block.extend_from_slice(&buf);
            buf = block;
        }

        // Drop the header or the partial line the window starts in.
        let first = buf
            .iter()
            .position(|&b| b == b'\n')
            .map_or(buf.len(), |pos| pos + 1);

        let mut offset = start + first as u64;
        let mut rows = Vec::new();
        for line in buf[first..].split_inclusive(|&b| b == b'\n') {
            rows.push((offset, String::from_utf8_lossy(line).trim().to_string()));
            offset += line.len() as u64;
        }
        rows.retain(|(_, line)| !line.is_empty());
        let keep = rows.len().saturating_sub(count);
        rows.drain(..keep);

        Ok(TableTail {
            offset: rows.first().map_or(len, |(offset, _)| *offset),
            rows,
        })
    }

    /// 1-based line number of the row starting at `offset`.
    fn line_at(path: &Path, offset: u64) -> usize {
        fs::read(path).map_or(0, |content| {
            let end = usize::try_from(offset).unwrap_or(content.len()).min(content.len());
            content[..end].iter().filter(|&&b| b == b'\n').count() + 1
        })
    }

    fn read_header(path: &Path) -> Result<String, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::ReadTable {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(content.lines().next().unwrap_or_default().trim().to_string())
    }
}

impl BarStore for CsvStore {
    fn ensure_database(&mut self, name: &str) -> Result<(), StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        if !path.exists() {
            fs::create_dir_all(&path).map_err(|e| StoreError::CreateDir {
                path: path.clone(),
                source: e,
            })?;
            debug!(path = %path.display(), "created bar database");
        }
        Ok(())
    }

    fn ensure_table(
        &mut self,
        database: &str,
        table: &str,
        columns: &[&str],
    ) -> Result<(), StoreError> {
        if !is_valid_name(table) {
            return Err(StoreError::InvalidName(table.to_string()));
        }
        if !self.root.join(database).is_dir() {
            return Err(StoreError::UnknownDatabase(database.to_string()));
        }

        let path = self.table_path(database, table);
        let expected = self.header(columns);

        if path.exists() {
            let found = Self::read_header(&path)?;
            if found != expected {
                return Err(StoreError::SchemaMismatch {
                    table: format!("{database}.{table}"),
                    expected,
                    found,
                });
            }
            return Ok(());
        }

        fs::write(&path, format!("{expected}\n")).map_err(|e| StoreError::WriteTable {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "created bar table");
        Ok(())
    }

    fn save_bar(&mut self, table: &str, bar: &Bar, replace_count: usize) -> Result<(), StoreError> {
        let (database, name) = split_qualified(table)?;
        let path = self.table_path(database, name);
        if !path.exists() {
            return Err(StoreError::UnknownTable(table.to_string()));
        }
        let write_err = |e| StoreError::WriteTable {
            path: path.clone(),
            source: e,
        };

        if replace_count > 0 {
            let tail = Self::read_tail(&path, replace_count)?;
            let mut rows = tail
                .rows
                .iter()
                .map(|(offset, line)| {
                    parse_bar_row(line, self.formatter.delimiter()).map_err(|message| {
                        StoreError::CorruptRow {
                            table: table.to_string(),
                            line: Self::line_at(&path, *offset),
                            message,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if upsert_bar(&mut rows, *bar, replace_count) {
                let content = self.render(&rows, &path)?;
                let mut file = OpenOptions::new().write(true).open(&path).map_err(write_err)?;
                file.set_len(tail.offset).map_err(write_err)?;
                file.seek(SeekFrom::End(0)).map_err(write_err)?;
                return file.write_all(&content).map_err(write_err);
            }
        }

        let row = self.render(std::slice::from_ref(bar), &path)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(&row).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tickbar_aggregate::BAR_COLUMNS;

    fn open_store() -> (TempDir, CsvStore) {
        let dir = TempDir::new().unwrap();
        let mut store = CsvStore::new(dir.path());
        store.ensure_database("market").unwrap();
        store
            .ensure_table("market", "rb2405_m1", BAR_COLUMNS)
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_creates_layout() {
        let (dir, store) = open_store();
        let path = dir.path().join("market").join("rb2405_m1.csv");
        assert_eq!(store.table_path("market", "rb2405_m1"), path);

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "bucket_start,open,high,low,close,tick_volume,volume\n"
        );
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (_dir, mut store) = open_store();
        store.save_bar("market.rb2405_m1", &Bar::open_at(0, 1.0), 1).unwrap();

        store.ensure_database("market").unwrap();
        store
            .ensure_table("market", "rb2405_m1", BAR_COLUMNS)
            .unwrap();
        assert_eq!(store.load_bars("market.rb2405_m1").unwrap().len(), 1);
    }

    #[test]
    fn test_schema_mismatch() {
        let (_dir, mut store) = open_store();
        let result = store.ensure_table("market", "rb2405_m1", &["time", "price"]);
        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_table_requires_database() {
        let dir = TempDir::new().unwrap();
        let mut store = CsvStore::new(dir.path());
        assert!(matches!(
            store.ensure_table("market", "x_m1", BAR_COLUMNS),
            Err(StoreError::UnknownDatabase(_))
        ));
        assert!(matches!(
            store.ensure_database("../escape"),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_save_appends_and_replaces() {
        let (_dir, mut store) = open_store();
        let table = "market.rb2405_m1";

        store.save_bar(table, &Bar::new(0, 1.0, 2.0, 0.5, 1.5, 3, 30), 1).unwrap();
        store.save_bar(table, &Bar::new(60, 1.5, 1.5, 1.5, 1.5, 1, 5), 1).unwrap();
        store.save_bar(table, &Bar::new(60, 1.5, 1.8, 1.4, 1.7, 2, 9), 1).unwrap();

        let bars = store.load_bars(table).unwrap();
        assert_eq!(
            bars,
            vec![
                Bar::new(0, 1.0, 2.0, 0.5, 1.5, 3, 30),
                Bar::new(60, 1.5, 1.8, 1.4, 1.7, 2, 9),
            ]
        );

        store.save_bar(table, &Bar::new(60, 9.0, 9.0, 9.0, 9.0, 1, 1), 0).unwrap();
        assert_eq!(store.load_bars(table).unwrap().len(), 3);
    }

    #[test]
    fn test_save_unknown_table() {
        let (_dir, mut store) = open_store();
        for replace_count in [0, 1] {
            assert!(matches!(
                store.save_bar("market.nope", &Bar::open_at(0, 1.0), replace_count),
                Err(StoreError::UnknownTable(_))
            ));
        }
        assert!(matches!(
            store.save_bar("no_database", &Bar::open_at(0, 1.0), 1),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let (dir, store) = open_store();
        let path = dir.path().join("market").join("rb2405_m1.csv");
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("0,1,1,1,1,1,1\nnot,a,bar\n");
        fs::write(&path, content).unwrap();

        match store.load_bars("market.rb2405_m1") {
            Err(StoreError::CorruptRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected corrupt row, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_old_row_does_not_block_saves() {
        let (dir, mut store) = open_store();
        let table = "market.rb2405_m1";
        store.save_bar(table, &Bar::open_at(0, 1.0), 1).unwrap();

        let path = dir.path().join("market").join("rb2405_m1.csv");
        let content = fs::read_to_string(&path).unwrap();
        let (header, rows) = content.split_once('\n').unwrap();
        fs::write(&path, format!("{header}\ngarbage row\n{rows}")).unwrap();

        store.save_bar(table, &Bar::open_at(60, 1.0), 1).unwrap();
        store.save_bar(table, &Bar::new(60, 1.0, 2.0, 1.0, 2.0, 2, 4), 1).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[1..],
            ["garbage row", "0,1,1,1,1,0,0", "60,1,2,1,2,2,4"]
        );
    }

    #[test]
    fn test_corrupt_tail_row_is_reported() {
        let (dir, mut store) = open_store();
        let table = "market.rb2405_m1";
        store.save_bar(table, &Bar::open_at(0, 1.0), 1).unwrap();
        let path = dir.path().join("market").join("rb2405_m1.csv");
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("not,a,bar\n");
        fs::write(&path, content).unwrap();

        match store.save_bar(table, &Bar::open_at(60, 1.0), 1) {
            Err(StoreError::CorruptRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected corrupt row, got {other:?}"),
        }
    }

    #[test]
    fn test_replace_in_large_table() {
        let (_dir, mut store) = open_store();
        let table = "market.rb2405_m1";
        for i in 0..500 {
            let bar = Bar::new(i * 60, 3800.25, 3801.5, 3799.75, 3800.5, 12, 340);
            store.save_bar(table, &bar, 1).unwrap();
        }

        let updated = Bar::new(499 * 60, 3800.25, 3805.0, 3799.75, 3804.0, 13, 350);
        store.save_bar(table, &updated, 1).unwrap();

        let bars = store.load_bars(table).unwrap();
        assert_eq!(bars.len(), 500);
        assert_eq!(bars[498].bucket_start, 498 * 60);
        assert_eq!(bars[499], updated);
    }

    #[test]
    fn test_replace_within_trailing_window() {
        let (_dir, mut store) = open_store();
        let table = "market.rb2405_m1";
        for start in [0, 60, 120] {
            store.save_bar(table, &Bar::open_at(start, 1.0), 2).unwrap();
        }

        store.save_bar(table, &Bar::open_at(60, 5.0), 2).unwrap();
        store.save_bar(table, &Bar::open_at(0, 7.0), 2).unwrap();

        let bars = store.load_bars(table).unwrap();
        assert_eq!(
            bars,
            vec![
                Bar::open_at(0, 1.0),
                Bar::open_at(60, 5.0),
                Bar::open_at(120, 1.0),
                Bar::open_at(0, 7.0),
            ]
        );
    }

    #[test]
    fn test_default_path_ends_with_app_name() {
        let path = CsvStore::default_path();
        assert!(path.to_string_lossy().contains("tickbar"));
    }
}
