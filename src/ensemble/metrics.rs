use{
    serde::{Serialize, Deserialize},
    super::Ensemble,
    crate::stats_methods::*
};

/// Width of the centered moving average used before counting waves
pub const WAVE_SMOOTHING_WINDOW: usize = 14;
/// Local maxima below this fraction of the smoothed peak are not waves
pub const WAVE_THRESHOLD_FRACTION: f64 = 0.01;

/// Severity and dynamics of a single realization
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealizationMetrics
{
    pub peak_mag: f64,
    pub peak_day: f64,
    pub cum_deaths: f64,
    pub n_waves: u32
}

impl RealizationMetrics
{
    pub fn from_curve(days: &[f64], total_infected: &[f64], final_deaths: f64) -> Self
    {
        let peak_day = argmax(total_infected)
            .map_or(f64::NAN, |i| days[i]);
        Self{
            peak_mag: max_value(total_infected),
            peak_day,
            cum_deaths: final_deaths,
            n_waves: count_waves(total_infected)
        }
    }
}

/// Ensemble mean and sample standard deviation of the realization metrics
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMetrics
{
    pub n_realizations: usize,
    pub peak_mag: MeanStd,
    pub peak_day: MeanStd,
    pub cum_deaths: MeanStd,
    pub n_waves: MeanStd
}

impl EnsembleMetrics
{
    pub fn from_realizations(metrics: &[RealizationMetrics]) -> Self
    {
        let collect = |f: fn(&RealizationMetrics) -> f64| -> MeanStd {
            let v: Vec<_> = metrics.iter().map(f).collect();
            MeanStd::from_slice(&v)
        };
        Self{
            n_realizations: metrics.len(),
            peak_mag: collect(|m| m.peak_mag),
            peak_day: collect(|m| m.peak_day),
            cum_deaths: collect(|m| m.cum_deaths),
            n_waves: collect(|m| m.n_waves as f64)
        }
    }
}

pub fn realization_metrics(ensemble: &Ensemble) -> Vec<RealizationMetrics>
{
    let days = ensemble.days();
    ensemble.total_infected()
        .iter()
        .zip(ensemble.final_deaths())
        .map(|(curve, deaths)| RealizationMetrics::from_curve(days, curve, deaths))
        .collect()
}

/// Peak magnitude, peak day, cumulative deaths and wave count of an
/// ensemble, each as mean and sample standard deviation.
pub fn extract_metrics(ensemble: &Ensemble) -> EnsembleMetrics
{
    EnsembleMetrics::from_realizations(&realization_metrics(ensemble))
}

/// Centered moving average with zero padding at both ends, same length as
/// the input. Output `t` averages inputs `t - w/2 .. t - w/2 + w`, for a
/// window of 14 that is `t-7 ..= t+6`.
pub fn moving_average(curve: &[f64], window: usize) -> Vec<f64>
{
    if window == 0 {
        return curve.to_vec();
    }
    let left = window / 2;
    let len = curve.len() as isize;
    (0..len)
        .map(
            |t|
            {
                let start = t - left as isize;
                let sum: f64 = (start..start + window as isize)
                    .filter(|&j| j >= 0 && j < len)
                    .map(|j| curve[j as usize])
                    .sum();
                sum / window as f64
            }
        ).collect()
}

/// Number of infection waves: strict interior local maxima of the smoothed
/// curve above 1% of its maximum. A curve without such a maximum still
/// counts as one wave.
pub fn count_waves(curve: &[f64]) -> u32
{
    let smoothed = if curve.len() > WAVE_SMOOTHING_WINDOW {
        moving_average(curve, WAVE_SMOOTHING_WINDOW)
    } else {
        curve.to_vec()
    };
    let threshold = WAVE_THRESHOLD_FRACTION * max_value(&smoothed);
    let peaks = smoothed.windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2] && w[1] > threshold)
        .count() as u32;
    peaks.max(1)
}

#[cfg(test)]
mod testing
{
    use super::*;
    use crate::sim_data::*;
    use assert_float_eq::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rand_pcg::Pcg64;

    fn realization(curve: &[f64]) -> SimTable
    {
        let rows: Vec<_> = curve.iter()
            .enumerate()
            .map(
                |(d, &c)|
                {
                    let mut row = vec![0.0; NUM_OUTPUT_COLUMNS];
                    row[COL_DAY] = d as f64;
                    // split over two infected compartments
                    row[COL_S_I_NH] = c * 0.25;
                    row[COL_A_I] = c * 0.75;
                    // non infected compartments must not count
                    row[COL_R] = 1e6;
                    row[COL_NEW_S] = 1e6;
                    row[COL_D] = d as f64 * 2.0;
                    row
                }
            ).collect();
        SimTable::from_rows(&rows).unwrap()
    }

    fn gaussian(days: usize, center: f64, width: f64, height: f64) -> Vec<f64>
    {
        (0..days)
            .map(|d| {
                let x = (d as f64 - center) / width;
                height * (-0.5 * x * x).exp()
            }).collect()
    }

    #[test]
    fn moving_average_matches_box_convolution()
    {
        let curve: Vec<_> = (0..20).map(|i| i as f64).collect();
        let smoothed = moving_average(&curve, 14);
        assert_eq!(smoothed.len(), 20);
        // t = 0 averages inputs 0..=6
        assert_float_absolute_eq!(smoothed[0], 21.0 / 14.0, 1e-12);
        // t = 10 averages inputs 3..=16
        let expected: f64 = (3..=16).map(|i| i as f64).sum::<f64>() / 14.0;
        assert_float_absolute_eq!(smoothed[10], expected, 1e-12);
        // t = 19 averages inputs 12..=19
        let expected: f64 = (12..=19).map(|i| i as f64).sum::<f64>() / 14.0;
        assert_float_absolute_eq!(smoothed[19], expected, 1e-12);

        let small = moving_average(&[1.0, 2.0, 3.0], 3);
        assert_eq!(small, vec![1.0, 2.0, 5.0 / 3.0]);
    }

    #[test]
    fn constant_curves_have_one_wave()
    {
        for len in [0, 1, 5, 14, 15, 100] {
            assert_eq!(count_waves(&vec![123.0; len]), 1, "len {len}");
        }
        let tables: Vec<_> = (0..4).map(|_| realization(&[7.0; 60])).collect();
        let ens = Ensemble::from_tables(tables).unwrap();
        let m = extract_metrics(&ens);
        assert_eq!(m.n_waves, MeanStd{mean: 1.0, std: 0.0});
        assert_float_absolute_eq!(m.peak_mag.mean, 7.0, 1e-9);
        // first maximum
        assert_eq!(m.peak_day.mean, 0.0);
    }

    #[test]
    fn zero_infected()
    {
        let m = RealizationMetrics::from_curve(&[0.0, 1.0, 2.0], &[0.0; 3], 0.0);
        assert_eq!(m.peak_mag, 0.0);
        assert_eq!(m.n_waves, 1);
    }

    #[test]
    fn two_separated_waves()
    {
        let a = gaussian(200, 40.3, 6.0, 1000.0);
        let b = gaussian(200, 140.3, 6.0, 600.0);
        let curve: Vec<_> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
        assert_eq!(count_waves(&curve), 2);

        // a tiny bump below 1% of the maximum is not a wave
        let c = gaussian(200, 140.3, 6.0, 5.0);
        let curve: Vec<_> = a.iter().zip(&c).map(|(x, y)| x + y).collect();
        assert_eq!(count_waves(&curve), 1);
    }

    #[test]
    fn short_curves_are_not_smoothed()
    {
        let curve = [0.0, 5.0, 0.0, 5.0, 0.0, 1.0, 0.0];
        assert_eq!(count_waves(&curve), 3);
    }

    #[test]
    fn gaussian_bump_ensemble()
    {
        let mut rng = Pcg64::seed_from_u64(8723469);
        let scale = Normal::new(1.0, 0.01).unwrap();
        let tables: Vec<_> = (0..3)
            .map(|_| realization(&gaussian(100, 40.0, 8.0, 50000.0 * scale.sample(&mut rng))))
            .collect();
        let ens = Ensemble::from_tables(tables).unwrap();
        let m = extract_metrics(&ens);
        assert_eq!(m.n_realizations, 3);
        assert_float_absolute_eq!(m.peak_day.mean, 40.0, 1e-9);
        assert_float_relative_eq!(m.peak_mag.mean, 50000.0, 0.05);
        assert_eq!(m.n_waves.mean, 1.0);
        assert_eq!(m.cum_deaths.mean, 198.0);
        assert_eq!(m.cum_deaths.std, 0.0);
    }

    #[test]
    fn truncation_is_idempotent()
    {
        let tables = vec![
            realization(&gaussian(90, 30.0, 5.0, 100.0)),
            realization(&gaussian(70, 35.0, 5.0, 120.0)),
            realization(&gaussian(80, 25.0, 5.0, 90.0)),
        ];
        let first = Ensemble::from_tables(tables).unwrap();
        let again = Ensemble::from_tables(first.realizations().to_vec()).unwrap();
        assert_eq!(first.shape(), again.shape());
        assert_eq!(extract_metrics(&first), extract_metrics(&again));
    }
}
