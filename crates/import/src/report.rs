use std::io::Write;

use csv::WriterBuilder;
use parkmatch_core::Dataset;

use crate::error::ImportError;

/// Columns appended to each annotated dataset, in output order.
pub const APPENDED_COLUMNS: [&str; 3] = ["fecha_entrada", "hora_entrada", "Estado_Validacion"];

/// Writes one annotated dataset: every original column in order, then the
/// canonical date/time pair and the validation status. Unparseable
/// timestamps render as empty date/time cells; the transient tolerance
/// window never appears in the output.
pub fn write_report<W: Write>(
    out: W,
    dataset: &Dataset,
    delimiter: u8,
) -> Result<(), ImportError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(out);

    let mut header: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
    header.extend(APPENDED_COLUMNS);
    writer.write_record(&header)?;

    let width = dataset.headers.len();
    for record in &dataset.records {
        let mut row: Vec<String> = record.fields.clone();
        // Short rows are padded so the appended columns stay aligned.
        row.resize(width, String::new());
        row.push(record.fecha_entrada());
        row.push(record.hora_entrada());
        row.push(
            record
                .status
                .map(|s| s.label(dataset.kind).to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkmatch_core::{MatchStatus, Record, SourceKind, TOLERANCE_MINUTES};

    fn annotated_accesspark() -> Dataset {
        let mut ds = Dataset::new(
            SourceKind::AccessPark,
            vec!["check_in".into(), "plate_in".into()],
        );
        let mut matched = Record::new(
            vec!["2025-02-27 14:23:00.000".into(), "ABC123".into()],
            "ABC123".into(),
            "2025-02-27 14:23:00.000".into(),
        );
        matched.derive_keys(SourceKind::AccessPark, TOLERANCE_MINUTES);
        matched.status = Some(MatchStatus::Matched);

        let mut broken = Record::new(
            vec!["corrupted".into(), "DEF456".into()],
            "DEF456".into(),
            "corrupted".into(),
        );
        broken.derive_keys(SourceKind::AccessPark, TOLERANCE_MINUTES);
        broken.status = Some(MatchStatus::Unmatched);

        ds.records.push(matched);
        ds.records.push(broken);
        ds
    }

    fn render(ds: &Dataset) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, ds, b',').unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn appends_annotation_columns_after_originals() {
        let out = render(&annotated_accesspark());
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "check_in,plate_in,fecha_entrada,hora_entrada,Estado_Validacion"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2025-02-27 14:23:00.000,ABC123,27/02/2025,14:23,Llave encontrada en GOPASS"
        );
    }

    #[test]
    fn unparseable_timestamp_renders_empty_cells() {
        let out = render(&annotated_accesspark());
        let row = out.lines().nth(2).unwrap();
        assert_eq!(row, "corrupted,DEF456,,,Llave NO encontrada en GOPASS");
    }

    #[test]
    fn empty_dataset_writes_header_only() {
        let ds = Dataset::new(
            SourceKind::GoPass,
            vec!["Fecha de entrada".into(), "Placa Vehiculo".into()],
        );
        let out = render(&ds);
        assert_eq!(
            out.trim_end(),
            "Fecha de entrada,Placa Vehiculo,fecha_entrada,hora_entrada,Estado_Validacion"
        );
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let mut ds = Dataset::new(
            SourceKind::AccessPark,
            vec!["check_in".into(), "plate_in".into(), "lane".into()],
        );
        let mut r = Record::new(
            vec!["2025-02-27 14:23:00".into(), "ABC123".into()],
            "ABC123".into(),
            "2025-02-27 14:23:00".into(),
        );
        r.derive_keys(SourceKind::AccessPark, TOLERANCE_MINUTES);
        r.status = Some(MatchStatus::Unmatched);
        ds.records.push(r);

        let out = render(&ds);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "2025-02-27 14:23:00,ABC123,,27/02/2025,14:23,Llave NO encontrada en GOPASS"
        );
    }
}
