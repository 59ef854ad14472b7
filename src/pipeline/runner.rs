//! Regional measures to correlation matrices: correct, then correlate.

use crate::corr::{build_corrmat, CorrMethod, CorrelationMatrix};
use crate::data::Dataset;
use crate::error::Result;
use crate::group::{split_groups, split_groups_shuffled};
use crate::model::residuals::{residuals_with, ResidualOptions};
use rand::RngCore;
use std::collections::BTreeMap;

/// Correlation matrix of one participant group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMatrix {
    /// Number of participants in the group.
    pub n_participants: usize,
    /// Correlation matrix computed within the group.
    pub matrix: CorrelationMatrix,
}

/// Correlate `names` over participants after regressing out `covariates`.
///
/// The matrix axes follow the order of `names`.
pub fn corrmat_from_regional_measures<R: AsRef<str>, C: AsRef<str>>(
    regional_measures: &Dataset,
    names: &[R],
    covariates: &[C],
    method: CorrMethod,
) -> Result<CorrelationMatrix> {
    corrmat_with_options(
        regional_measures,
        names,
        covariates,
        method,
        &ResidualOptions::default(),
    )
}

/// [`corrmat_from_regional_measures`] with explicit residual options.
pub fn corrmat_with_options<R: AsRef<str>, C: AsRef<str>>(
    regional_measures: &Dataset,
    names: &[R],
    covariates: &[C],
    method: CorrMethod,
    options: &ResidualOptions,
) -> Result<CorrelationMatrix> {
    let corrected = residuals_with(regional_measures, names, covariates, options)?;
    let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    build_corrmat(&corrected, Some(names.as_slice()), method)
}

/// One correlation matrix per participant group.
///
/// Participants are split on `group_variable` (after shuffling its values when
/// `shuffle` supplies a generator), and each group is corrected and correlated
/// on its own. Keys are the group keys of [`split_groups`].
pub fn group_corrmats<R: AsRef<str>, C: AsRef<str>>(
    regional_measures: &Dataset,
    names: &[R],
    covariates: &[C],
    method: CorrMethod,
    options: &ResidualOptions,
    group_variable: &str,
    shuffle: Option<&mut dyn RngCore>,
) -> Result<BTreeMap<String, GroupMatrix>> {
    let groups = match shuffle {
        Some(rng) => split_groups_shuffled(regional_measures, group_variable, rng)?,
        None => split_groups(regional_measures, group_variable)?,
    };

    let mut matrices = BTreeMap::new();
    for (key, subset) in groups {
        log::debug!("Group '{}': {} participants", key, subset.n_rows());
        let matrix = corrmat_with_options(&subset, names, covariates, method, options)?;
        matrices.insert(
            key,
            GroupMatrix {
                n_participants: subset.n_rows(),
                matrix,
            },
        );
    }

    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::error::CorrmatError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_dataset() -> Dataset {
        let age: Vec<f64> = (0..12).map(|i| 14.0 + i as f64).collect();
        let noise_a = [0.1, -0.2, 0.05, 0.3, -0.1, 0.0, 0.15, -0.25, 0.2, -0.05, 0.1, -0.15];
        let noise_b = [-0.1, 0.15, 0.2, -0.05, 0.0, 0.1, -0.2, 0.05, -0.1, 0.25, -0.15, 0.0];
        let region_a: Vec<f64> = age.iter().zip(noise_a).map(|(a, e)| 3.0 - 0.05 * a + e).collect();
        let region_b: Vec<f64> = age.iter().zip(noise_b).map(|(a, e)| 2.8 - 0.04 * a + e).collect();
        let diagnosis: Vec<&str> = (0..12).map(|i| if i % 3 == 0 { "SZ" } else { "HC" }).collect();

        Dataset::from_columns(vec![
            ("region_a", Column::Numeric(region_a)),
            ("region_b", Column::Numeric(region_b)),
            ("age", Column::Numeric(age)),
            ("diagnosis", Column::categorical(&diagnosis)),
        ])
        .unwrap()
    }

    #[test]
    fn test_corrmat_from_regional_measures() {
        let ds = create_test_dataset();
        let m = corrmat_from_regional_measures(
            &ds,
            &["region_a", "region_b"],
            &["age"],
            CorrMethod::Pearson,
        )
        .unwrap();

        assert_eq!(m.names(), &["region_a", "region_b"]);
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn test_owned_names_with_literal_covariates() {
        let ds = create_test_dataset();
        let names = vec!["region_b".to_string(), "region_a".to_string()];
        let m = corrmat_from_regional_measures(&ds, &names, &["age"], CorrMethod::Spearman).unwrap();

        assert_eq!(m.names(), names.as_slice());
        assert_eq!(m.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_non_numeric_covariate_aborts() {
        let ds = create_test_dataset();
        let err = corrmat_from_regional_measures(
            &ds,
            &["region_a", "region_b"],
            &["diagnosis"],
            CorrMethod::Pearson,
        )
        .unwrap_err();
        assert!(matches!(err, CorrmatError::NonNumeric(_)));
    }

    #[test]
    fn test_group_corrmats() {
        let ds = create_test_dataset();
        let matrices = group_corrmats(
            &ds,
            &["region_a", "region_b"],
            &["age"],
            CorrMethod::Spearman,
            &ResidualOptions::default(),
            "diagnosis",
            None,
        )
        .unwrap();

        let keys: Vec<&String> = matrices.keys().collect();
        assert_eq!(keys, vec!["diagnosis_HC", "diagnosis_SZ"]);
        assert_eq!(matrices["diagnosis_HC"].n_participants, 8);
        assert_eq!(matrices["diagnosis_SZ"].n_participants, 4);
        assert_eq!(matrices["diagnosis_SZ"].matrix.n_regions(), 2);
    }

    #[test]
    fn test_group_corrmats_shuffled() {
        let ds = create_test_dataset();
        let mut rng = StdRng::seed_from_u64(11);
        let matrices = group_corrmats(
            &ds,
            &["region_a", "region_b"],
            &[] as &[&str],
            CorrMethod::Pearson,
            &ResidualOptions::default(),
            "diagnosis",
            Some(&mut rng),
        )
        .unwrap();

        assert!(matrices.contains_key("diagnosis_rand_HC"));
        assert!(matrices.contains_key("diagnosis_rand_SZ"));
        let total: usize = matrices.values().map(|g| g.n_participants).sum();
        assert_eq!(total, 12);
    }
}
