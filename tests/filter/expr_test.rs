#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;

    use er_reader::filter::{
        BatchFilter, Expr, LiteralValue, disease_is, evaluate_expr, filter_batches,
        filter_record_batch, grouped_by, rate_type_is,
    };
    use er_reader::models::{GroupingVariable, RateType};
    use er_reader::schema::columns;

    fn sample_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(columns::DISEASE, DataType::Utf8, false),
            Field::new(columns::RATE_TYPE, DataType::Utf8, false),
            Field::new(columns::GROUPING_VARIABLE, DataType::Utf8, true),
            Field::new(columns::GROUPING_VALUE, DataType::Int64, true),
            Field::new(columns::DIRECT_RATE, DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Diabète"),
                    Some("Asthme"),
                    Some("Diabète"),
                    Some("BPCO"),
                ])),
                Arc::new(StringArray::from(vec![
                    Some("prevalence"),
                    Some("incidence"),
                    Some("prevalence"),
                    Some("prevalence"),
                ])),
                Arc::new(StringArray::from(vec![
                    Some("SEXE"),
                    Some("FISC_NIVVIEM_E2015_S_moy_10"),
                    Some("SEXE"),
                    None,
                ])),
                Arc::new(Int64Array::from(vec![Some(1), Some(10), Some(2), None])),
                Arc::new(Float64Array::from(vec![
                    Some(8.1),
                    Some(2.1),
                    None,
                    Some(4.0),
                ])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_string_equality() {
        let batch = sample_batch();
        let mask = evaluate_expr(&batch, &disease_is("Diabète")).unwrap();
        assert_eq!(mask.true_count(), 2);

        let mask = evaluate_expr(&batch, &rate_type_is(RateType::Incidence)).unwrap();
        assert_eq!(mask.true_count(), 1);
    }

    #[test]
    fn test_numeric_comparisons() {
        let batch = sample_batch();

        // Null rates never match
        let gt = Expr::Gt(columns::DIRECT_RATE.to_string(), LiteralValue::Float(3.0));
        assert_eq!(evaluate_expr(&batch, &gt).unwrap().true_count(), 2);

        let lt_eq = Expr::LtEq(columns::DIRECT_RATE.to_string(), LiteralValue::Float(2.1));
        assert_eq!(evaluate_expr(&batch, &lt_eq).unwrap().true_count(), 1);

        // Int literals compare against float columns
        let eq = Expr::Eq(columns::DIRECT_RATE.to_string(), LiteralValue::Int(4));
        assert_eq!(evaluate_expr(&batch, &eq).unwrap().true_count(), 1);
    }

    #[test]
    fn test_membership() {
        let batch = sample_batch();
        let within = Expr::In(
            columns::GROUPING_VALUE.to_string(),
            vec![LiteralValue::Int(1), LiteralValue::Int(2)],
        );
        assert_eq!(evaluate_expr(&batch, &within).unwrap().true_count(), 2);

        // The null row is outside every membership set, negated or not
        let outside = Expr::NotIn(
            columns::GROUPING_VALUE.to_string(),
            vec![LiteralValue::Int(1), LiteralValue::Int(2)],
        );
        assert_eq!(evaluate_expr(&batch, &outside).unwrap().true_count(), 1);
    }

    #[test]
    fn test_null_checks() {
        let batch = sample_batch();
        let is_null = Expr::IsNull(columns::DIRECT_RATE.to_string());
        assert_eq!(evaluate_expr(&batch, &is_null).unwrap().true_count(), 1);

        let not_null = Expr::IsNotNull(columns::GROUPING_VARIABLE.to_string());
        assert_eq!(evaluate_expr(&batch, &not_null).unwrap().true_count(), 3);
    }

    #[test]
    fn test_boolean_combinators() {
        let batch = sample_batch();
        let expr = disease_is("Diabète").and(rate_type_is(RateType::Prevalence));
        assert_eq!(evaluate_expr(&batch, &expr).unwrap().true_count(), 2);

        let expr = disease_is("Asthme").or(disease_is("BPCO"));
        assert_eq!(evaluate_expr(&batch, &expr).unwrap().true_count(), 2);

        let expr = disease_is("Diabète").negate();
        assert_eq!(evaluate_expr(&batch, &expr).unwrap().true_count(), 2);
    }

    #[test]
    fn test_string_predicates() {
        let batch = sample_batch();
        let contains = Expr::Contains(columns::DISEASE.to_string(), "iab".to_string());
        assert_eq!(evaluate_expr(&batch, &contains).unwrap().true_count(), 2);

        let starts = Expr::StartsWith(columns::DISEASE.to_string(), "As".to_string());
        assert_eq!(evaluate_expr(&batch, &starts).unwrap().true_count(), 1);
    }

    #[test]
    fn test_filtering_batches() {
        let batch = sample_batch();
        let expr = grouped_by(GroupingVariable::Sex);
        let mask = evaluate_expr(&batch, &expr).unwrap();
        let filtered = filter_record_batch(&batch, &mask).unwrap();
        assert_eq!(filtered.num_rows(), 2);

        // BatchFilter is the same operation behind a trait object seam
        let via_trait = BatchFilter::filter(&expr, &batch).unwrap();
        assert_eq!(via_trait.num_rows(), filtered.num_rows());

        // Batches left empty by the filter are dropped
        let none = filter_batches(&[batch], &Expr::AlwaysFalse).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_required_columns() {
        let expr = disease_is("Diabète")
            .and(rate_type_is(RateType::Prevalence))
            .and(Expr::IsNotNull(columns::DIRECT_RATE.to_string()));
        let required = expr.required_columns();
        assert_eq!(required.len(), 3);
        assert!(required.contains(columns::DISEASE));
        assert!(required.contains(columns::RATE_TYPE));
        assert!(required.contains(columns::DIRECT_RATE));
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let batch = sample_batch();
        let expr = Expr::Eq("poids1".to_string(), LiteralValue::Float(1.0));
        assert!(evaluate_expr(&batch, &expr).is_err());
    }
}
