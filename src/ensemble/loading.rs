use{
    std::path::{Path, PathBuf},
    rayon::prelude::*,
    tracing::{debug, warn},
    super::Ensemble,
    crate::{
        error::*,
        sim_data::*
    }
};

pub const DEFAULT_ENSEMBLE_SUFFIXES: [&str; 4] = ["tuolumne", "matrix", "dane", "perlmutter"];
pub const DEFAULT_MAX_RUNS: usize = 200;

/// `.ensemble_<case>_<suffix>` for the first suffix that exists,
/// `.ensemble_<case>` otherwise
pub fn find_ensemble_dir<S>(data_dir: &Path, case: &str, suffixes: &[S]) -> Option<PathBuf>
where S: AsRef<str>
{
    suffixes.iter()
        .map(|s| data_dir.join(format!(".ensemble_{case}_{}", s.as_ref())))
        .chain(std::iter::once(data_dir.join(format!(".ensemble_{case}"))))
        .find(|p| p.is_dir())
}

pub fn output_file_stem(disease: Option<&str>) -> String
{
    match disease {
        Some(d) => format!("output_{d}"),
        None => "output".to_owned()
    }
}

pub fn output_file_name(disease: Option<&str>) -> String
{
    format!("{}.dat", output_file_stem(disease))
}

/// Read `run_001 ..= run_<max_runs>` of an ensemble directory.
///
/// Missing realizations are skipped silently, malformed ones with a warning.
/// Run order is kept.
pub fn load_ensemble(dir: &Path, disease: Option<&str>, max_runs: usize) -> Result<Ensemble>
{
    let file_name = output_file_name(disease);
    let tables: Vec<_> = (1..=max_runs)
        .into_par_iter()
        .filter_map(
            |i|
            {
                let path = dir.join(format!("run_{i:03}")).join(&file_name);
                match SimTable::load(&path)
                {
                    Ok(table) => Some(table),
                    Err(e) if e.is_not_found() => None,
                    Err(e) => {
                        warn!("skipping realization: {e}");
                        None
                    }
                }
            }
        ).collect();
    if tables.is_empty() {
        return Err(EpiError::not_found(dir.join("run_001").join(file_name)));
    }
    debug!("loaded {} realizations from {}", tables.len(), dir.display());
    Ensemble::from_tables(tables)
}

/// Pre-computed ensemble mean and standard deviation tables
#[derive(Debug, Clone)]
pub struct MeanStdTables
{
    pub mean: SimTable,
    pub std: Option<SimTable>
}

impl MeanStdTables
{
    pub fn days(&self) -> Vec<f64>
    {
        self.mean.days()
    }

    pub fn total_infected_mean(&self) -> Vec<f64>
    {
        self.mean.sum_columns(&INFECTED_COLS)
    }

    /// Sum of the per column standard deviations, zeros without a std file
    pub fn total_infected_std(&self) -> Vec<f64>
    {
        match &self.std {
            Some(std) => {
                let mut curve = std.sum_columns(&INFECTED_COLS);
                curve.resize(self.mean.n_rows(), 0.0);
                curve
            },
            None => vec![0.0; self.mean.n_rows()]
        }
    }
}

/// `<stem>_mean.dat` and, if present, `<stem>_std.dat`
pub fn load_mean_std(dir: &Path, disease: Option<&str>) -> Result<MeanStdTables>
{
    let stem = output_file_stem(disease);
    let mean = SimTable::load(&dir.join(format!("{stem}_mean.dat")))?;
    let std_path = dir.join(format!("{stem}_std.dat"));
    let std = if std_path.is_file() {
        Some(SimTable::load(&std_path)?)
    } else {
        None
    };
    Ok(MeanStdTables{mean, std})
}
