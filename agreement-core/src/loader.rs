//! CSV loading for observation, frequency and wide item files

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

use crate::domain::{Item, ItemKey, Observation};
use crate::error::{CoreError, Result};
use crate::frequency::{FrequencyColumns, FrequencyTable};
use crate::writer::ITEM_HEADER;

/// Open a CSV file with the reader settings shared by every loader
fn open_reader(path: &Path) -> Result<Reader<File>> {
    let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    Ok(ReaderBuilder::new().trim(Trim::Headers).from_reader(file))
}

fn headers(reader: &mut Reader<File>, path: &Path) -> Result<StringRecord> {
    reader
        .headers()
        .cloned()
        .map_err(|e| CoreError::csv(path, e))
}

/// Return every name in `required` that `headers` lacks
fn missing_columns(headers: &StringRecord, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect()
}

/// Verify that a CSV file's header carries every required column
///
/// Only the header line is read.
pub fn check_schema(path: &Path, required: &[&str]) -> Result<()> {
    let mut reader = open_reader(path)?;
    let headers = headers(&mut reader, path)?;
    ensure_columns(path, &headers, required)
}

fn ensure_columns(path: &Path, headers: &StringRecord, required: &[&str]) -> Result<()> {
    let missing = missing_columns(headers, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Schema {
            path: path.to_path_buf(),
            missing,
        })
    }
}

/// Load an observation file in row order
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let mut reader = open_reader(path)?;
    let headers = headers(&mut reader, path)?;
    ensure_columns(path, &headers, &Observation::REQUIRED_COLUMNS)?;

    let observations = reader
        .deserialize::<Observation>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CoreError::csv(path, e))?;

    log::info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

fn position(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h == column)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_f64(path: &Path, record: &StringRecord, index: usize, column: &str) -> Result<f64> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| CoreError::InvalidValue {
        path: path.to_path_buf(),
        line: line_of(record),
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Empty cells and `NA` are missing values
fn parse_optional_f64(
    path: &Path,
    record: &StringRecord,
    index: usize,
    column: &str,
) -> Result<Option<f64>> {
    match record.get(index).unwrap_or("").trim() {
        "" | "NA" => Ok(None),
        _ => parse_f64(path, record, index, column).map(Some),
    }
}

/// Load a word frequency file
///
/// Duplicate words keep their first value, so a join against the table
/// can never multiply rows.
pub fn load_frequencies(path: &Path, columns: &FrequencyColumns) -> Result<FrequencyTable> {
    let mut reader = open_reader(path)?;
    let headers = headers(&mut reader, path)?;
    ensure_columns(
        path,
        &headers,
        &[columns.word.as_str(), columns.value.as_str()],
    )?;

    // Both positions exist, ensure_columns checked them.
    let word_at = position(&headers, &columns.word).unwrap_or(0);
    let value_at = position(&headers, &columns.value).unwrap_or(0);

    let mut table = FrequencyTable::default();
    let mut duplicates = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CoreError::csv(path, e))?;
        let word = record.get(word_at).unwrap_or("").to_string();
        let value = parse_f64(path, &record, value_at, &columns.value)?;
        if !table.insert(word, value) {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        log::warn!(
            "{} duplicate word(s) in {}; keeping the first value of each",
            duplicates,
            path.display()
        );
    }
    log::info!("Loaded {} frequency entries from {}", table.len(), path.display());
    Ok(table)
}

/// Load a wide item table previously written by [`crate::writer`]
///
/// Frequency columns, when present, are ignored.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let mut reader = open_reader(path)?;
    let headers = headers(&mut reader, path)?;
    ensure_columns(path, &headers, &ITEM_HEADER)?;

    let positions: Vec<usize> = ITEM_HEADER
        .iter()
        .map(|column| position(&headers, column).unwrap_or(0))
        .collect();

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CoreError::csv(path, e))?;
        let text = |i: usize| record.get(positions[i]).unwrap_or("").to_string();
        let number =
            |i: usize| parse_optional_f64(path, &record, positions[i], ITEM_HEADER[i]);

        let key = ItemKey {
            lemma: text(0),
            sentence: text(1),
            word_form: text(2),
            source: text(3),
            tokenization_type: text(4),
            word_number: text(5),
            article_type: text(6),
            affix: text(7),
        };
        let mut item = Item::new(key, number(8)?, number(9)?, number(10)?, number(11)?);
        item.accuracy = match record.get(positions[14]).unwrap_or("").trim() {
            "" | "NA" => None,
            "1" => Some(1),
            "0" => Some(0),
            other => {
                return Err(CoreError::InvalidValue {
                    path: path.to_path_buf(),
                    line: line_of(&record),
                    column: ITEM_HEADER[14].to_string(),
                    value: other.to_string(),
                })
            }
        };
        items.push(item);
    }

    log::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "source,tokenization_type,word_number,article_type,lemma,sentence,word_form,affix,article_number,article_probs,surprisal";

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_observations_in_row_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "single.csv",
            &format!(
                "{HEADER}\n\
                 single-token,default,singular,definite,gato,1,gato,,singular,0.8,0.32\n\
                 single-token,default,singular,definite,gato,1,gato,,plural,0.2,2.32\n"
            ),
        );

        let observations = load_observations(&path).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].article_number, "singular");
        assert_eq!(observations[1].article_probs, 0.2);
        assert_eq!(observations[1].affix, "");
    }

    #[test]
    fn test_column_order_and_extra_columns_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "shuffled.csv",
            "idx,surprisal,article_probs,article_number,affix,word_form,sentence,lemma,article_type,word_number,tokenization_type,source\n\
             0,1.2,0.3,plural,es,flores,7,flor,indefinite,plural,morphemic,multitok-morph\n",
        );

        let observations = load_observations(&path).unwrap();
        assert_eq!(observations[0].word_form, "flores");
        assert_eq!(observations[0].surprisal, 1.2);
        assert_eq!(observations[0].source, "multitok-morph");
    }

    #[test]
    fn test_schema_error_names_every_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "broken.csv",
            "source,tokenization_type,word_number,article_type,lemma,sentence,word_form,article_number,article_probs\n",
        );

        match load_observations(&path) {
            Err(CoreError::Schema { missing, .. }) => {
                assert_eq!(missing, vec!["affix".to_string(), "surprisal".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
        assert!(check_schema(&path, &Observation::REQUIRED_COLUMNS).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_observations(Path::new("/nonexistent/results.csv"));
        assert!(matches!(result, Err(CoreError::Io { .. })));
    }

    #[test]
    fn test_unparsable_probability_is_csv_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.csv",
            &format!("{HEADER}\nsingle-token,default,singular,definite,gato,1,gato,,singular,high,0.32\n"),
        );
        assert!(matches!(
            load_observations(&path),
            Err(CoreError::Csv { .. })
        ));
    }

    #[test]
    fn test_load_frequencies_keeps_first_duplicate() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "freq.csv",
            "Word,Log10(freq count+1)\ngato,3.5\nperro,4.25\ngato,1.0\n",
        );

        let table = load_frequencies(&path, &FrequencyColumns::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("gato"), Some(3.5));
        assert_eq!(table.get("perro"), Some(4.25));
    }

    #[test]
    fn test_load_frequencies_custom_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "freq.csv", "form,zipf\ncasa,5.1\n");

        let columns = FrequencyColumns {
            word: "form".to_string(),
            value: "zipf".to_string(),
        };
        let table = load_frequencies(&path, &columns).unwrap();
        assert_eq!(table.get("casa"), Some(5.1));

        let default_columns = load_frequencies(&path, &FrequencyColumns::default());
        assert!(matches!(default_columns, Err(CoreError::Schema { .. })));
    }

    #[test]
    fn test_load_frequencies_rejects_non_numeric_value() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "freq.csv", "Word,Log10(freq count+1)\ncasa,lots\n");

        match load_frequencies(&path, &FrequencyColumns::default()) {
            Err(CoreError::InvalidValue { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "lots");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }
}
