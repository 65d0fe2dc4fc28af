#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use er_reader::algorithm::{inequality_ratio, rates_by_income};
    use er_reader::extract::parse_rate;
    use er_reader::models::{GroupingVariable, RateType};
    use er_reader::{CsvReaderConfig, DownloadConfig, ensure_dataset, load_dataset};

    use crate::common::{SAMPLE_CLEAN_ROWS, SAMPLE_ROWS, write_sample_csv};

    #[test]
    fn test_load_dataset_cleans_and_assesses() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let (dataset, report) = load_dataset(&path, &CsvReaderConfig::default()).unwrap();

        assert_eq!(dataset.len(), SAMPLE_CLEAN_ROWS);
        assert_eq!(dataset.dropped_rows(), SAMPLE_ROWS - SAMPLE_CLEAN_ROWS);
        assert_eq!(dataset.diseases(), vec!["Asthme", "Diabète"]);
        assert_eq!(dataset.of_disease("Diabète").count(), 6);
        assert_eq!(dataset.of_rate_type(RateType::Incidence).count(), 2);

        assert_eq!(report.total_records, SAMPLE_ROWS);
        assert_eq!(report.dropped_rows, SAMPLE_ROWS - SAMPLE_CLEAN_ROWS);
        assert!(report.missing_required_columns.is_empty());
        assert_eq!(report.ci_violations, 0);
        assert_eq!(report.out_of_domain_values, 0);
        assert_eq!(report.duplicate_rows, 0);
    }

    #[test]
    fn test_extraction_adapts_comma_decimals() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let (dataset, _) = load_dataset(&path, &CsvReaderConfig::default()).unwrap();
        let d1 = dataset
            .of_grouping(GroupingVariable::IncomeDecile)
            .find(|obs| {
                obs.disease == "Diabète" && obs.grouping_value.as_deref() == Some("1")
            })
            .unwrap();

        assert_eq!(parse_rate("8,4"), Some(8.4));
        assert_eq!(parse_rate(" 8.4 "), Some(8.4));
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("NaN"), None);
        assert_eq!(parse_rate("n/a"), None);

        // txNonStand is written as "8,4" in the file
        assert_eq!(d1.crude_rate, Some(8.4));
        assert_eq!(d1.direct_rate, Some(8.1));
        assert_eq!(d1.year, Some(2017));
        assert_eq!(d1.group_weight, Some(1200.5));
        assert!(d1.ci_consistent());
    }

    #[test]
    fn test_pipeline_feeds_inequality_analysis() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        let (dataset, _) = load_dataset(&path, &CsvReaderConfig::default()).unwrap();
        let income_table = rates_by_income(&dataset);

        let diabetes = inequality_ratio(&income_table, "Diabète", RateType::Prevalence).unwrap();
        assert!((diabetes - 3.0).abs() < 1e-9);

        let asthma = inequality_ratio(&income_table, "Asthme", RateType::Incidence).unwrap();
        assert!((asthma - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_ensure_dataset_uses_existing_file() {
        let dir = tempdir().unwrap();
        let path = write_sample_csv(dir.path());

        // The file exists, so nothing is fetched and no network is touched
        let download = DownloadConfig::with_dest(&path);
        let (dataset, _) = ensure_dataset(&download, &CsvReaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), SAMPLE_CLEAN_ROWS);
    }
}
