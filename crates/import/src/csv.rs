use std::io::Read;

use csv::ReaderBuilder;
use parkmatch_core::{Dataset, Record, SourceKind};

use crate::error::ImportError;

/// Required columns for one export kind. Headers are matched by exact name
/// after trimming surrounding whitespace.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSchema {
    pub kind: SourceKind,
    pub timestamp_column: &'static str,
    pub plate_column: &'static str,
}

pub const ACCESSPARK_SCHEMA: DatasetSchema = DatasetSchema {
    kind: SourceKind::AccessPark,
    timestamp_column: "check_in",
    plate_column: "plate_in",
};

pub const GOPASS_SCHEMA: DatasetSchema = DatasetSchema {
    kind: SourceKind::GoPass,
    timestamp_column: "Fecha de entrada",
    plate_column: "Placa Vehiculo",
};

/// Loads one export into a typed dataset, validating the schema up front.
/// A missing required column is a hard error; the reconciliation engine is
/// never handed malformed input.
pub fn load_dataset<R: Read>(
    data: R,
    schema: &DatasetSchema,
    delimiter: u8,
) -> Result<Dataset, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let ts_idx = locate(&headers, schema, schema.timestamp_column)?;
    let plate_idx = locate(&headers, schema, schema.plate_column)?;

    let mut dataset = Dataset::new(schema.kind, headers);
    for result in reader.records() {
        let row = result?;
        if row.is_empty() {
            continue;
        }
        let fields: Vec<String> = row.iter().map(|f| f.to_string()).collect();
        let raw_timestamp = fields.get(ts_idx).cloned().unwrap_or_default();
        let raw_plate = fields.get(plate_idx).cloned().unwrap_or_default();
        dataset
            .records
            .push(Record::new(fields, raw_plate, raw_timestamp));
    }

    Ok(dataset)
}

/// Loads and concatenates several exports of the same kind (the access
/// system delivers one file per lane). All files must share an identical
/// header row; the first file's headers become the dataset headers.
pub fn load_many<R: Read>(
    sources: Vec<R>,
    schema: &DatasetSchema,
    delimiter: u8,
) -> Result<Dataset, ImportError> {
    let mut combined: Option<Dataset> = None;

    for source in sources {
        let part = load_dataset(source, schema, delimiter)?;
        match &mut combined {
            None => combined = Some(part),
            Some(dataset) => {
                if dataset.headers != part.headers {
                    return Err(ImportError::HeaderMismatch {
                        source_label: schema.kind.label(),
                    });
                }
                dataset.records.extend(part.records);
            }
        }
    }

    // No sources at all: an empty dataset with just the required columns.
    Ok(combined.unwrap_or_else(|| {
        Dataset::new(
            schema.kind,
            vec![
                schema.timestamp_column.to_string(),
                schema.plate_column.to_string(),
            ],
        )
    }))
}

fn locate(
    headers: &[String],
    schema: &DatasetSchema,
    column: &'static str,
) -> Result<usize, ImportError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ImportError::MissingColumn {
            source_label: schema.kind.label(),
            column,
            found: headers.join(", "),
        })
}
