use{
    crate::{
        error::*,
        sim_data::*,
        stats_methods::*
    }
};

/// Realizations of one run configuration, truncated to a common length.
#[derive(Debug, Clone)]
pub struct Ensemble
{
    days: Vec<f64>,
    realizations: Vec<SimTable>
}

impl Ensemble
{
    /// Stack realizations. Longer realizations are cut to the length of the
    /// shortest one, the column layout has to agree.
    pub fn from_tables(tables: Vec<SimTable>) -> Result<Self>
    {
        let first = tables.first()
            .ok_or_else(|| EpiError::shape("ensemble", "at least one realization", 0))?;
        let n_cols = first.n_cols();
        if let Some(bad) = tables.iter().find(|t| t.n_cols() != n_cols) {
            return Err(EpiError::shape("ensemble columns", n_cols, bad.n_cols()));
        }
        let min_rows = tables.iter()
            .map(SimTable::n_rows)
            .min()
            .unwrap_or(0);
        let realizations: Vec<_> = tables.into_iter()
            .map(|t| {
                if t.n_rows() == min_rows {
                    t
                } else {
                    t.truncated(min_rows)
                }
            }).collect();
        let days = realizations[0].days();
        Ok(
            Self{
                days,
                realizations
            }
        )
    }

    pub fn days(&self) -> &[f64]
    {
        &self.days
    }

    pub fn realizations(&self) -> &[SimTable]
    {
        &self.realizations
    }

    pub fn n_realizations(&self) -> usize
    {
        self.realizations.len()
    }

    pub fn n_days(&self) -> usize
    {
        self.days.len()
    }

    pub fn n_cols(&self) -> usize
    {
        self.realizations[0].n_cols()
    }

    /// (realizations, days, columns)
    pub fn shape(&self) -> (usize, usize, usize)
    {
        (self.n_realizations(), self.n_days(), self.n_cols())
    }

    /// Total currently infected per day, one curve per realization
    pub fn total_infected(&self) -> Vec<Vec<f64>>
    {
        self.realizations.iter()
            .map(|r| r.sum_columns(&INFECTED_COLS))
            .collect()
    }

    /// Deaths on the last simulated day, per realization
    pub fn final_deaths(&self) -> Vec<f64>
    {
        let last = self.n_days().saturating_sub(1);
        self.realizations.iter()
            .map(|r| if r.n_rows() == 0 { 0.0 } else { r.get(last, COL_D) })
            .collect()
    }

    /// Mean and (population) standard deviation of the total infected curve
    /// across realizations, per day
    pub fn total_infected_band(&self) -> (Vec<f64>, Vec<f64>)
    {
        let curves = self.total_infected();
        (0..self.n_days())
            .map(
                |day|
                {
                    let vals: Vec<_> = curves.iter().map(|c| c[day]).collect();
                    let mean = calc_average(&vals);
                    (mean, calc_population_variance(&vals, mean).sqrt())
                }
            ).unzip()
    }
}
