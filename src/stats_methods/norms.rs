use{
    serde::{Serialize, Deserialize},
    crate::error::*
};

/// L1, L2 and L∞ norms of `candidate - baseline`, absolute and relative to
/// the same norm of the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffNorms
{
    pub l1_abs: f64,
    pub l2_abs: f64,
    pub linf_abs: f64,
    pub l1_rel: f64,
    pub l2_rel: f64,
    pub linf_rel: f64
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Norms
{
    l1: f64,
    l2: f64,
    linf: f64
}

impl Norms
{
    fn of<I>(iter: I) -> Self
    where I: Iterator<Item=f64>
    {
        let mut l1 = 0.0;
        let mut sq = 0.0;
        let mut linf = 0.0_f64;
        for v in iter.map(f64::abs)
        {
            l1 += v;
            sq += v * v;
            linf = linf.max(v);
        }
        Self{
            l1,
            l2: sq.sqrt(),
            linf
        }
    }
}

// a zero baseline norm makes the relative norm 0 instead of NaN or inf
fn relative(abs: f64, base: f64) -> f64
{
    if base > 0.0 {
        abs / base
    } else {
        0.0
    }
}

impl DiffNorms
{
    pub fn compute(baseline: &[f64], candidate: &[f64]) -> Result<Self>
    {
        if baseline.len() != candidate.len() {
            return Err(
                EpiError::shape("baseline vs. candidate", baseline.len(), candidate.len())
            );
        }
        let diff = Norms::of(
            baseline.iter()
                .zip(candidate)
                .map(|(b, c)| c - b)
        );
        let base = Norms::of(baseline.iter().copied());
        Ok(
            Self{
                l1_abs: diff.l1,
                l2_abs: diff.l2,
                linf_abs: diff.linf,
                l1_rel: relative(diff.l1, base.l1),
                l2_rel: relative(diff.l2, base.l2),
                linf_rel: relative(diff.linf, base.linf)
            }
        )
    }

    pub fn all(&self) -> [f64; 6]
    {
        [self.l1_abs, self.l2_abs, self.linf_abs, self.l1_rel, self.l2_rel, self.linf_rel]
    }

    pub fn is_zero(&self) -> bool
    {
        self.all().iter().all(|&v| v == 0.0)
    }
}

#[cfg(test)]
mod testing
{
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn identical_data_gives_zero()
    {
        let base = [1.0, 5.0, -3.0, 100.0];
        let norms = DiffNorms::compute(&base, &base).unwrap();
        assert!(norms.is_zero());
    }

    #[test]
    fn zero_baseline_relative_is_zero()
    {
        let base = [0.0; 4];
        let cand = [1.0, 2.0, 0.0, -2.0];
        let norms = DiffNorms::compute(&base, &cand).unwrap();
        assert_eq!(norms.l1_abs, 5.0);
        assert_eq!(norms.l2_abs, 3.0);
        assert_eq!(norms.linf_abs, 2.0);
        assert_eq!(norms.l1_rel, 0.0);
        assert_eq!(norms.l2_rel, 0.0);
        assert_eq!(norms.linf_rel, 0.0);
        assert!(norms.all().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn known_values()
    {
        let base = [3.0, 4.0];
        let cand = [4.0, 4.0];
        let norms = DiffNorms::compute(&base, &cand).unwrap();
        assert_float_absolute_eq!(norms.l1_rel, 1.0 / 7.0, 1e-12);
        assert_float_absolute_eq!(norms.l2_rel, 1.0 / 5.0, 1e-12);
        assert_float_absolute_eq!(norms.linf_rel, 1.0 / 4.0, 1e-12);
    }

    #[test]
    fn length_mismatch()
    {
        let err = DiffNorms::compute(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, EpiError::ShapeMismatch{..}));
    }

    #[test]
    fn empty_is_zero()
    {
        assert!(DiffNorms::compute(&[], &[]).unwrap().is_zero());
    }
}
