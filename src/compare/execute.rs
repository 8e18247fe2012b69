use{
    std::{
        fs::File,
        io::BufWriter,
        path::Path
    },
    tracing::error,
    crate::{
        error::*,
        regtest::{compare_tables, print_norms, write_norms},
        sim_data::*,
        stats_methods::DiffNorms
    }
};

pub fn compare_paths(baseline: &Path, candidate: &Path) -> Result<Vec<(Metric, DiffNorms)>>
{
    let base = SimTable::load(baseline)?;
    let cand = SimTable::load(candidate)?;
    compare_tables(&base, &cand)
}

pub fn compare_files(baseline: &Path, candidate: &Path, output: Option<&Path>) -> i32
{
    let rows = match compare_paths(baseline, candidate)
    {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    print_norms(&format!("{} vs. {}", baseline.display(), candidate.display()), &rows);
    if let Some(path) = output {
        let json = serde_json::json!({
            "baseline": baseline.display().to_string(),
            "candidate": candidate.display().to_string()
        });
        if let Err(e) = File::create(path).and_then(|f| write_norms(BufWriter::new(f), &json, &rows)) {
            error!("could not write {}: {e}", path.display());
            return 1;
        }
    }
    0
}
