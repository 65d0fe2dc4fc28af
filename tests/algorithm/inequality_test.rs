#[cfg(test)]
mod tests {
    use er_reader::algorithm::{
        InequalitySeverity, format_gradient_summary, income_gradient, inequality_ratio,
        rank_by_inequality, rates_by_income, rates_by_region, regional_spread, top_diseases,
    };
    use er_reader::extract::Dataset;
    use er_reader::models::RateType;

    use crate::common::{gradient_dataset, income_obs, region_obs};

    fn two_decile_dataset(disease: &str, d1: f64, d10: f64) -> Dataset {
        Dataset::from(vec![
            income_obs(disease, RateType::Prevalence, 1, d1, 1000.0),
            income_obs(disease, RateType::Prevalence, 10, d10, 900.0),
        ])
    }

    #[test]
    fn test_inequality_ratio() {
        let table = rates_by_income(&two_decile_dataset("Diabète", 8.1, 2.7));
        let ratio = inequality_ratio(&table, "Diabète", RateType::Prevalence).unwrap();
        assert!((ratio - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_undefined_without_both_extremes() {
        let table = rates_by_income(&Dataset::from(vec![income_obs(
            "Diabète",
            RateType::Prevalence,
            1,
            8.1,
            1000.0,
        )]));
        assert!(inequality_ratio(&table, "Diabète", RateType::Prevalence).is_none());
        assert!(inequality_ratio(&table, "Asthme", RateType::Prevalence).is_none());
    }

    #[test]
    fn test_ratio_undefined_for_zero_richest_rate() {
        let table = rates_by_income(&two_decile_dataset("Diabète", 8.1, 0.0));
        assert!(inequality_ratio(&table, "Diabète", RateType::Prevalence).is_none());
    }

    #[test]
    fn test_income_gradient_summary_values() {
        let table = rates_by_income(&gradient_dataset("Diabète"));
        let gradient = income_gradient(&table, "Diabète", RateType::Prevalence).unwrap();

        assert!((gradient.poorest_rate - 8.0).abs() < 1e-9);
        assert!((gradient.richest_rate - 3.5).abs() < 1e-9);
        assert!((gradient.absolute_gap - 4.5).abs() < 1e-9);
        // Deciles run linearly 8.0 .. 3.5, so the mean sits midway
        assert!((gradient.mean_rate - 5.75).abs() < 1e-9);
        assert_eq!(gradient.severity, Some(InequalitySeverity::Moderate));

        let summary = format_gradient_summary(&gradient);
        assert!(summary.contains("Diabète"));
        assert!(summary.contains("Inequality Ratio"));
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(InequalitySeverity::from_ratio(3.0), InequalitySeverity::High);
        assert_eq!(InequalitySeverity::from_ratio(2.5), InequalitySeverity::High);
        assert_eq!(
            InequalitySeverity::from_ratio(1.8),
            InequalitySeverity::Moderate
        );
        assert_eq!(InequalitySeverity::from_ratio(1.1), InequalitySeverity::Low);
    }

    #[test]
    fn test_rank_by_inequality() {
        let mut observations = two_decile_dataset("Diabète", 8.1, 2.7).into_observations();
        observations.extend(two_decile_dataset("Asthme", 2.0, 1.6).into_observations());
        // No D10 for this one, so it cannot be ranked
        observations.push(income_obs("BPCO", RateType::Prevalence, 1, 5.0, 100.0));
        let dataset = Dataset::from(observations);

        let ranked = rank_by_inequality(&dataset, RateType::Prevalence);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].disease, "Diabète");
        assert!(ranked[0].ratio > ranked[1].ratio);
        assert_eq!(ranked[1].disease, "Asthme");
    }

    #[test]
    fn test_top_diseases() {
        let mut observations = two_decile_dataset("Diabète", 8.1, 2.7).into_observations();
        observations.extend(two_decile_dataset("Asthme", 2.0, 1.6).into_observations());
        observations.extend(two_decile_dataset("Hypertension", 12.0, 9.0).into_observations());
        let dataset = Dataset::from(observations);

        let top = top_diseases(&dataset, 2, RateType::Prevalence);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Hypertension");
        assert_eq!(top[1].0, "Diabète");
        assert!(top[0].1 > top[1].1);

        assert!(top_diseases(&dataset, 5, RateType::Incidence).is_empty());
    }

    #[test]
    fn test_regional_spread() {
        let dataset = Dataset::from(vec![
            region_obs("Diabète", RateType::Prevalence, "11", 6.2),
            region_obs("Diabète", RateType::Prevalence, "44", 5.4),
            region_obs("Diabète", RateType::Prevalence, "93", 7.0),
        ]);
        let table = rates_by_region(&dataset);
        let spread = regional_spread(&table, "Diabète", RateType::Prevalence).unwrap();

        assert!((spread.max_rate - 7.0).abs() < 1e-9);
        assert!((spread.min_rate - 5.4).abs() < 1e-9);
        assert!((spread.mean_rate - 6.2).abs() < 1e-9);
        assert_eq!(spread.regions, 3);
        // Sample std of [6.2, 5.4, 7.0] is 0.8
        let cv = spread.coefficient_of_variation.unwrap();
        assert!((cv - 0.8 / 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_regional_spread_single_region_has_no_cv() {
        let dataset = Dataset::from(vec![region_obs("Diabète", RateType::Prevalence, "11", 6.2)]);
        let table = rates_by_region(&dataset);
        let spread = regional_spread(&table, "Diabète", RateType::Prevalence).unwrap();
        assert!(spread.coefficient_of_variation.is_none());

        assert!(regional_spread(&table, "Asthme", RateType::Prevalence).is_none());
    }
}
