#[cfg(test)]
mod tests {
    use arrow::datatypes::DataType;
    use tempfile::tempdir;

    use er_reader::schema::columns;
    use er_reader::{CsvReader, CsvReaderConfig, read_csv};

    use crate::common::{SAMPLE_CSV, SAMPLE_ROWS, write_sample_csv};

    #[test]
    fn test_read_sample_file() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let batches = read_csv(&path, &CsvReaderConfig::default()).unwrap();
        let rows: usize = batches.iter().map(|batch| batch.num_rows()).sum();
        assert_eq!(rows, SAMPLE_ROWS);
        assert_eq!(batches[0].num_columns(), 16);
    }

    #[test]
    fn test_schema_inference_types() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let reader = CsvReader::new(CsvReaderConfig::default());
        let (schema, _) = reader.infer_schema(&path).unwrap();

        assert_eq!(schema.fields().len(), 16);
        // Comma decimals keep the crude rate textual
        assert_eq!(
            schema.field_with_name(columns::CRUDE_RATE).unwrap().data_type(),
            &DataType::Utf8
        );
        // Machine-formatted rates infer as floats
        assert_eq!(
            schema.field_with_name(columns::DIRECT_RATE).unwrap().data_type(),
            &DataType::Float64
        );
        // Numeric grouping codes infer as integers
        assert_eq!(
            schema
                .field_with_name(columns::GROUPING_VALUE)
                .unwrap()
                .data_type(),
            &DataType::Int64
        );
    }

    #[test]
    fn test_validation_report_for_sample() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let reader = CsvReader::new(CsvReaderConfig::default());
        let report = reader.validate(&path).unwrap();
        assert!(report.compatible);
    }

    #[test]
    fn test_streaming_iterator_matches_collect() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        // Small batches force more than one batch out of the iterator
        let config = CsvReaderConfig {
            batch_size: 4,
            ..CsvReaderConfig::default()
        };
        let reader = CsvReader::new(config);
        let batches: Vec<_> = reader
            .open(&path)
            .unwrap()
            .collect::<er_reader::Result<_>>()
            .unwrap();

        assert!(batches.len() >= 3);
        let rows: usize = batches.iter().map(|batch| batch.num_rows()).sum();
        assert_eq!(rows, SAMPLE_ROWS);
    }

    #[test]
    fn test_header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let header = SAMPLE_CSV.lines().next().unwrap();
        std::fs::write(&path, format!("{header}\n")).unwrap();

        let reader = CsvReader::new(CsvReaderConfig::default());
        let report = reader.validate(&path).unwrap();
        assert!(report.compatible);

        let batches = read_csv(&path, &CsvReaderConfig::default()).unwrap();
        let rows: usize = batches.iter().map(|batch| batch.num_rows()).sum();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_type.csv");
        std::fs::write(&path, "varTauxLib;varGroupage;valGroupage\nDiabète;SEXE;1\n").unwrap();

        // Default config aborts on incompatibility
        assert!(read_csv(&path, &CsvReaderConfig::default()).is_err());

        // Lenient config reads anyway and leaves the gaps to extraction
        let lenient = CsvReaderConfig {
            fail_on_schema_incompatibility: false,
            ..CsvReaderConfig::default()
        };
        let batches = read_csv(&path, &lenient).unwrap();
        assert_eq!(batches[0].num_rows(), 1);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nowhere.csv");
        assert!(read_csv(&path, &CsvReaderConfig::default()).is_err());
    }
}
