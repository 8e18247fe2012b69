use{
    super::*,
    std::{
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf}
    },
    rayon::prelude::*,
    serde_json::Value,
    tracing::{error, warn},
    crate::{
        ensemble::*,
        json_parsing::*,
        run_naming::disease_label
    }
};

/// Mean and std of the total infected curve over time
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries
{
    pub days: Vec<f64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>
}

/// What could be loaded for one sweep value and disease
#[derive(Debug, Clone)]
pub struct PointResult
{
    pub value: f64,
    /// only available with individual realizations
    pub metrics: Option<EnsembleMetrics>,
    pub series: Option<TimeSeries>
}

/// First data directory that holds an ensemble of any sweep point
pub fn find_data_dir(opt: &SensitivityParams) -> Option<PathBuf>
{
    opt.data_dirs.iter()
        .map(PathBuf::from)
        .filter(|d| d.is_dir())
        .find(
            |d|
            opt.sweeps.iter()
                .flat_map(|s| &s.points)
                .any(|p| find_ensemble_dir(d, &p.case, &opt.suffixes).is_some())
        )
}

pub fn analyze_point(ensemble_dir: Option<&Path>, value: f64, disease: &str, max_runs: usize) -> PointResult
{
    let mut result = PointResult{value, metrics: None, series: None};
    let dir = match ensemble_dir {
        Some(dir) => dir,
        None => return result
    };
    match load_ensemble(dir, Some(disease), max_runs)
    {
        Ok(ensemble) => {
            let (mean, std) = ensemble.total_infected_band();
            result.series = Some(TimeSeries{days: ensemble.days().to_vec(), mean, std});
            result.metrics = Some(extract_metrics(&ensemble));
        },
        Err(e) => {
            if !e.is_not_found() {
                warn!("{e}");
            }
            if let Ok(tables) = load_mean_std(dir, Some(disease)) {
                result.series = Some(
                    TimeSeries{
                        days: tables.days(),
                        mean: tables.total_infected_mean(),
                        std: tables.total_infected_std()
                    }
                );
            }
        }
    }
    result
}

pub fn analyze_sweep(data_dir: &Path, opt: &SensitivityParams, sweep: &SweepSpec, disease: &str) -> Vec<PointResult>
{
    sweep.points
        .par_iter()
        .map(
            |p|
            {
                let dir = find_ensemble_dir(data_dir, &p.case, &opt.suffixes);
                if dir.is_none() {
                    warn!("No data for {}", p.case);
                }
                analyze_point(dir.as_deref(), p.value, disease, opt.max_runs)
            }
        ).collect()
}

pub fn table_header() -> [String; 2]
{
    [
        format!("  {:>8}  {:>14}  {:>12}  {:>14}  {:>8}", "Param", "Peak Mag", "Peak Day", "Cum Deaths", "Waves"),
        format!("  {}  {}  {}  {}  {}", "-".repeat(8), "-".repeat(14), "-".repeat(12), "-".repeat(14), "-".repeat(8))
    ]
}

pub fn table_row(point: &PointResult, is_baseline: bool) -> String
{
    match &point.metrics
    {
        None => format!("  {:8.3}  {:>14}", point.value, "(no data)"),
        Some(m) => format!(
            "  {:8.3}  {:10.0} +/- {:7.0}  {:6.1} +/- {:4.1}  {:10.0} +/- {:7.0}  {:4.1} +/- {:2.1}{}",
            point.value,
            m.peak_mag.mean,
            m.peak_mag.std,
            m.peak_day.mean,
            m.peak_day.std,
            m.cum_deaths.mean,
            m.cum_deaths.std,
            m.n_waves.mean,
            m.n_waves.std,
            if is_baseline { " *" } else { "" }
        )
    }
}

fn write_summary<W: Write>(mut w: W, json: &Value, sweep: &SweepSpec, results: &[(String, Vec<PointResult>)]) -> std::io::Result<()>
{
    write_json(&mut w, json)?;
    writeln!(
        w,
        "#disease value is_baseline n_realizations peak_mag_mean peak_mag_std peak_day_mean peak_day_std cum_deaths_mean cum_deaths_std n_waves_mean n_waves_std"
    )?;
    for (disease, points) in results
    {
        for p in points
        {
            if let Some(m) = &p.metrics {
                writeln!(
                    w,
                    "{disease} {} {} {} {} {} {} {} {} {} {} {}",
                    p.value,
                    sweep.is_baseline(p.value) as u8,
                    m.n_realizations,
                    m.peak_mag.mean,
                    m.peak_mag.std,
                    m.peak_day.mean,
                    m.peak_day.std,
                    m.cum_deaths.mean,
                    m.cum_deaths.std,
                    m.n_waves.mean,
                    m.n_waves.std
                )?;
            }
        }
    }
    Ok(())
}

/// One block per sweep value, separated by two blank lines
fn write_timeseries<W: Write>(mut w: W, json: &Value, points: &[PointResult]) -> std::io::Result<()>
{
    write_json(&mut w, json)?;
    writeln!(w, "#value day total_infected_mean total_infected_std")?;
    for p in points
    {
        if let Some(series) = &p.series {
            for ((day, mean), std) in series.days.iter().zip(&series.mean).zip(&series.std)
            {
                writeln!(w, "{} {day} {mean} {std}", p.value)?;
            }
            writeln!(w, "\n")?;
        }
    }
    Ok(())
}

fn print_table(sweep: &SweepSpec, results: &[(String, Vec<PointResult>)])
{
    println!("\n{}", "=".repeat(80));
    println!("  {}: {} sensitivity", sweep.name, sweep.label);
    println!("{}", "=".repeat(80));
    for (disease, points) in results
    {
        println!("\n  {}:", disease_label(disease));
        for line in table_header()
        {
            println!("{line}");
        }
        for p in points
        {
            println!("{}", table_row(p, sweep.is_baseline(p.value)));
        }
    }
    println!();
}

fn create(path: &Path) -> std::io::Result<BufWriter<File>>
{
    File::create(path).map(BufWriter::new)
}

pub fn analyze(opt: &SensitivityParams, json: &Value) -> i32
{
    let data_dir = match find_data_dir(opt)
    {
        Some(d) => d,
        None => {
            eprintln!("ERROR: No sensitivity ensemble data found.");
            eprintln!("Searched in:");
            for d in &opt.data_dirs
            {
                eprintln!("  {d}");
            }
            eprintln!("\nRun the sensitivity ensembles first, then sync results.");
            return 1;
        }
    };
    println!("Data directory: {}", data_dir.display());
    if let Err(e) = fs::create_dir_all(&opt.output_dir) {
        error!("cannot create {}: {e}", opt.output_dir);
        return 1;
    }

    let mut code = 0;
    for sweep in &opt.sweeps
    {
        let labels: Vec<_> = sweep.diseases.iter().map(|d| disease_label(d)).collect();
        println!("\n── {} sweep ({}) ──", sweep.label, labels.join(" + "));
        let results: Vec<_> = sweep.diseases.iter()
            .map(|d| (d.clone(), analyze_sweep(&data_dir, opt, sweep, d)))
            .collect();
        print_table(sweep, &results);

        let summary = opt.summary_name(sweep);
        if let Err(e) = create(&summary).and_then(|w| write_summary(w, json, sweep, &results)) {
            error!("could not write {}: {e}", summary.display());
            code = 1;
        }
        for (disease, points) in &results
        {
            let path = opt.timeseries_name(sweep, disease);
            if let Err(e) = create(&path).and_then(|w| write_timeseries(w, json, points)) {
                error!("could not write {}: {e}", path.display());
                code = 1;
            }
        }
    }
    println!("\nDone.");
    code
}

#[cfg(test)]
mod testing
{
    use super::*;
    use crate::sim_data::*;

    fn write_output(path: &Path, days: usize, infected: f64)
    {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut content = COLUMN_NAMES.join(" ");
        content.push('\n');
        for d in 0..days
        {
            let mut row = vec![0.0; NUM_OUTPUT_COLUMNS];
            row[COL_DAY] = d as f64;
            // single peak on day 5
            row[COL_S_I_NH] = infected * (10.0 - (d as f64 - 5.0).abs());
            row[COL_D] = d as f64;
            let line: Vec<_> = row.iter().map(|v| v.to_string()).collect();
            content.push_str(&line.join(" "));
            content.push('\n');
        }
        fs::write(path, content).unwrap();
    }

    fn params(root: &Path) -> SensitivityParams
    {
        SensitivityParams{
            data_dirs: vec![
                root.join("missing").display().to_string(),
                root.join("empty").display().to_string(),
                root.join("data").display().to_string()
            ],
            output_dir: root.join("out").display().to_string(),
            max_runs: 5,
            sweeps: vec![SweepSpec::co_immunity()],
            ..Default::default()
        }
    }

    #[test]
    fn default_sweeps()
    {
        let opt = SensitivityParams::default();
        assert_eq!(opt.sweeps.len(), 2);
        let coimm = &opt.sweeps[0];
        assert!(coimm.is_baseline(0.85));
        assert!(!coimm.is_baseline(0.925));
        assert_eq!(coimm.points[3].case, "CA_02D_Cov19S1S2_coimm0925");
        assert_eq!(opt.sweeps[1].diseases, vec!["Cov19S1", "FluS1"]);
    }

    #[test]
    fn no_data_anywhere()
    {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();
        let opt = params(tmp.path());
        assert_eq!(find_data_dir(&opt), None);
        assert_eq!(analyze(&opt, &Value::Null), 1);
    }

    #[test]
    fn rows()
    {
        let missing = PointResult{value: 0.925, metrics: None, series: None};
        assert_eq!(table_row(&missing, false), "     0.925       (no data)");

        let m = RealizationMetrics{peak_mag: 1000.0, peak_day: 30.0, cum_deaths: 50.0, n_waves: 2};
        let point = PointResult{
            value: 0.85,
            metrics: Some(EnsembleMetrics::from_realizations(&[m])),
            series: None
        };
        let row = table_row(&point, true);
        assert_eq!(
            row,
            "     0.850        1000 +/-       0    30.0 +/-  0.0          50 +/-       0   2.0 +/- 0.0 *"
        );
    }

    #[test]
    fn sweep_with_partial_data()
    {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("empty")).unwrap();
        let data = root.join("data");
        let ens = data.join(".ensemble_CA_02D_Cov19S1S2_coimm085_dane");
        for run in 1..=3
        {
            write_output(&ens.join(format!("run_{run:03}")).join("output_Cov19S1.dat"), 11, run as f64);
        }
        // only the mean file for the second disease
        write_output(&ens.join("output_Cov19S2_mean.dat"), 11, 2.0);

        let opt = params(root);
        assert_eq!(find_data_dir(&opt), Some(data.clone()));

        let sweep = &opt.sweeps[0];
        let results = analyze_sweep(&data, &opt, sweep, "Cov19S1");
        assert_eq!(results.len(), 5);
        assert!(results[0].metrics.is_none() && results[0].series.is_none());
        let base = &results[2];
        let m = base.metrics.as_ref().unwrap();
        assert_eq!(m.n_realizations, 3);
        assert_eq!(m.peak_day.mean, 5.0);
        assert_eq!(m.peak_mag.mean, 20.0);
        assert_eq!(m.cum_deaths.mean, 10.0);
        assert_eq!(base.series.as_ref().unwrap().mean[5], 20.0);

        let fallback = analyze_sweep(&data, &opt, sweep, "Cov19S2");
        assert!(fallback[2].metrics.is_none());
        let series = fallback[2].series.as_ref().unwrap();
        assert_eq!(series.mean[5], 20.0);
        assert!(series.std.iter().all(|&s| s == 0.0));

        assert_eq!(analyze(&opt, &Value::Null), 0);
        let out = root.join("out");
        let summary = fs::read_to_string(out.join("sensitivity_coimm_summary.dat")).unwrap();
        // json header, column header, one row for Cov19S1 at 0.85
        assert_eq!(summary.lines().count(), 3);
        assert!(summary.lines().nth(2).unwrap().starts_with("Cov19S1 0.85 1 3 20"));
        let ts = fs::read_to_string(out.join("sensitivity_coimm_Cov19S2_timeseries.dat")).unwrap();
        assert_eq!(ts.lines().filter(|l| l.starts_with("0.85 ")).count(), 11);
    }
}
