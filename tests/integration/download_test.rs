#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use er_reader::{
        DEFAULT_DATASET_PATH, DEFAULT_DATASET_URL, DownloadConfig, attribution,
        fetch_dataset_blocking,
    };

    #[test]
    fn test_default_configuration() {
        let config = DownloadConfig::default();
        assert_eq!(config.url, DEFAULT_DATASET_URL);
        assert_eq!(config.dest.to_str().unwrap(), DEFAULT_DATASET_PATH);
        assert!(!config.overwrite);

        assert!(DEFAULT_DATASET_URL.contains("data.drees.solidarites-sante.gouv.fr"));
        assert!(DEFAULT_DATASET_URL.contains("er_inegalites_maladies_chroniques"));
        assert!(DEFAULT_DATASET_PATH.ends_with(".csv"));
    }

    #[test]
    fn test_existing_file_skips_the_fetch() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("er_inegalites_maladies_chroniques.csv");
        std::fs::write(&dest, "varTauxLib;type\n").unwrap();

        // No network involved: the file is already present
        let config = DownloadConfig::with_dest(&dest);
        let report = fetch_dataset_blocking(&config).unwrap();

        assert!(report.skipped);
        assert_eq!(report.dest, dest);
        assert_eq!(report.bytes_written, 16);

        // The file content is untouched
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content, "varTauxLib;type\n");
    }

    #[test]
    fn test_attribution_cites_the_provider() {
        let text = attribution();
        assert!(text.contains("DREES"));
        assert!(text.contains("ER 1243"));
        assert!(text.contains("Licence Ouverte"));
        assert!(text.contains("https://data.drees.solidarites-sante.gouv.fr/"));
    }
}
