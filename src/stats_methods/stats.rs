//all the methods of calculating averages and standard deviations etc.

use serde::{Serialize, Deserialize};

/// Mean and sample standard deviation of a set of realizations
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanStd
{
    pub mean: f64,
    pub std: f64
}

impl MeanStd{
    /// Sample standard deviation (N-1 in the denominator), 0 for a single value
    pub fn from_slice(slice: &[f64]) -> Self
    {
        let mean = calc_average(slice);
        let std = calc_sample_variance(slice, mean).sqrt();
        Self{
            mean,
            std
        }
    }
}

pub fn calc_average(slice: &[f64]) -> f64
{
    if slice.is_empty() {
        return 0.0;
    }
    slice.iter().sum::<f64>() / slice.len() as f64
}

pub fn calc_sample_variance(slice: &[f64], average: f64) -> f64
{
    if slice.len() < 2 {
        return 0.0;
    }
    sum_of_squares(slice, average) / (slice.len() - 1) as f64
}

pub fn calc_population_variance(slice: &[f64], average: f64) -> f64
{
    if slice.is_empty() {
        return 0.0;
    }
    sum_of_squares(slice, average) / slice.len() as f64
}

fn sum_of_squares(slice: &[f64], average: f64) -> f64
{
    slice.iter()
        .map(|&val| {
            let dif = average - val;
            dif * dif
        }).sum()
}

/// Index of the first maximum. NaN never wins.
pub fn argmax(slice: &[f64]) -> Option<usize>
{
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in slice.iter().enumerate()
    {
        match best {
            Some((_, b)) if v <= b || v.is_nan() => (),
            _ if v.is_nan() => (),
            _ => best = Some((i, v))
        }
    }
    best.map(|(i, _)| i)
}

pub fn max_value(slice: &[f64]) -> f64
{
    slice.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
