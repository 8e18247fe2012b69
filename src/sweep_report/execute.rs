use{
    super::*,
    std::{
        collections::BTreeMap,
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf}
    },
    indicatif::ParallelProgressIterator,
    rayon::prelude::*,
    serde_json::Value,
    tracing::{error, info, warn},
    crate::{
        error::*,
        json_parsing::*,
        launcher::find_run_dirs,
        misc_types::*,
        run_naming::*,
        sim_data::*,
        stats_methods::*
    }
};

/// One row of a sweep report
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport
{
    pub name: String,
    pub label: String,
    pub params: ParsedParams,
    pub peak_infections: f64,
    pub peak_hospitalizations: f64,
    pub final_deaths: f64,
    pub max_overloaded: f64,
    pub max_underserved: f64,
    /// relative L2 norm against the baseline per sweep metric,
    /// NaN when the run cannot be compared
    pub l2_rel: [f64; 3]
}

pub const REPORT_HEADER: &str = "label peak_infections peak_hospitalizations final_deaths \
    max_overloaded max_underserved l2rel_infections l2rel_hospitalizations l2rel_deaths";

/// Everything but the medical worker proportion, e.g. `nppd=12`
pub fn run_label(params: &ParsedParams) -> String
{
    if params.is_baseline {
        return BASELINE_TOKEN.to_owned();
    }
    let parts: Vec<_> = PARAM_TOKENS.iter()
        .filter(|t| t.parameter != "med_workers_proportion")
        .filter_map(
            |t|
            params.get(t.parameter)
                .map(
                    |v| if t.is_integer() {
                        format!("{}={}", t.abbrev, v)
                    } else {
                        format!("{}={:.3}", t.abbrev, v)
                    }
                )
        ).collect();
    if parts.is_empty() {
        "-".to_owned()
    } else {
        parts.join(",")
    }
}

fn last(values: &[f64]) -> f64
{
    values.last().copied().unwrap_or(f64::NAN)
}

pub fn summarize_run(dir: &Path, machine: &str, baseline: Option<&SimTable>) -> Result<RunReport>
{
    let name = dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let params = parse_dirname(&name);
    let table = SimTable::load(&dir.join(OUTPUT_FILE))?;
    let (max_overloaded, max_underserved) = match HospitalLoad::load_or_from_log(
        &dir.join(HOSPITAL_FILE),
        &dir.join(log_file_name(machine))
    ) {
        Ok(load) => (load.max_overloaded(), load.max_underserved()),
        Err(e) => {
            warn!("{name}: no hospital data, {e}");
            (f64::NAN, f64::NAN)
        }
    };

    let mut l2_rel = [f64::NAN; 3];
    if let Some(base) = baseline {
        if base.shape() == table.shape() {
            for (slot, metric) in l2_rel.iter_mut().zip(Metric::SWEEP)
            {
                *slot = DiffNorms::compute(&base.metric(metric), &table.metric(metric))?.l2_rel;
            }
        } else {
            warn!(
                "{name}: shape {:?} differs from baseline {:?}, not compared",
                table.shape(),
                base.shape()
            );
        }
    }

    Ok(
        RunReport{
            label: run_label(&params),
            name,
            params,
            peak_infections: max_value(&table.metric(Metric::Infections)),
            peak_hospitalizations: max_value(&table.metric(Metric::Hospitalizations)),
            final_deaths: last(&table.metric(Metric::Deaths)),
            max_overloaded,
            max_underserved,
            l2_rel
        }
    )
}

/// Runs grouped by medical worker proportion in percent, each group sorted
/// by patients per doctor
pub fn group_runs(runs: Vec<RunReport>) -> BTreeMap<i64, Vec<RunReport>>
{
    let mut groups: BTreeMap<i64, Vec<RunReport>> = BTreeMap::new();
    for run in runs
    {
        let key = (run.params.med_workers_proportion() * 100.0).round() as i64;
        groups.entry(key).or_default().push(run);
    }
    for runs in groups.values_mut()
    {
        runs.sort_by(
            |a, b| a.params.patients_per_doctor()
                .total_cmp(&b.params.patients_per_doctor())
                .then_with(|| a.label.cmp(&b.label))
        );
    }
    groups
}

fn print_group(mwprop_percent: i64, rows: &[&RunReport])
{
    println!("\nMedical workers proportion: {:.2}", mwprop_percent as f64 / 100.0);
    println!(
        "  {:<28} {:>12} {:>12} {:>12} {:>10} {:>12} {:>12} {:>12} {:>12}",
        "Run", "Peak Inf", "Peak Hosp", "Deaths", "Overloaded", "Underserved",
        "L2rel Inf", "L2rel Hosp", "L2rel D"
    );
    println!("  {}", "-".repeat(28 + 8 * 13));
    for r in rows
    {
        println!(
            "  {:<28} {:>12.0} {:>12.0} {:>12.0} {:>10.0} {:>12.0} {:>12} {:>12} {:>12}",
            r.label,
            r.peak_infections,
            r.peak_hospitalizations,
            r.final_deaths,
            r.max_overloaded,
            r.max_underserved,
            sci(r.l2_rel[0]),
            sci(r.l2_rel[1]),
            sci(r.l2_rel[2])
        );
    }
}

pub fn write_group<W: Write>(mut writer: W, json: &Value, rows: &[&RunReport]) -> std::io::Result<()>
{
    write_json(&mut writer, json)?;
    writeln!(writer, "#{REPORT_HEADER}")?;
    for r in rows
    {
        writeln!(
            writer,
            "{} {} {} {} {} {} {:e} {:e} {:e}",
            r.label,
            r.peak_infections,
            r.peak_hospitalizations,
            r.final_deaths,
            r.max_overloaded,
            r.max_underserved,
            r.l2_rel[0],
            r.l2_rel[1],
            r.l2_rel[2]
        )?;
    }
    Ok(())
}

fn runs_with_output(opt: &SweepReportParams) -> Result<Vec<PathBuf>>
{
    let target = &opt.target;
    let dirs = find_run_dirs(&target.study_dir(), &target.run_prefix())?;
    Ok(
        dirs.into_iter()
            .filter(|d| d.join(OUTPUT_FILE).is_file())
            .collect()
    )
}

pub fn report(opt: &SweepReportParams, json: &Value) -> i32
{
    let target = &opt.target;
    let dirs = match runs_with_output(opt)
    {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    if dirs.is_empty() {
        println!("No finished runs found for {}/{}/{}", target.study, target.case, target.machine);
        return 1;
    }

    let baseline_dir = dirs.iter()
        .find(|d| parse_dirname(&d.file_name().unwrap_or_default().to_string_lossy()).is_baseline);
    let baseline = match baseline_dir.map(|d| SimTable::load(&d.join(OUTPUT_FILE)))
    {
        Some(Ok(table)) => Some(table),
        Some(Err(e)) => {
            warn!("baseline unusable: {e}");
            None
        },
        None => {
            warn!("no baseline run found, norms are not computed");
            None
        }
    };

    info!("summarizing {} runs", dirs.len());
    let bar = crate::indication_bar(dirs.len() as u64);
    let results: Vec<_> = dirs.par_iter()
        .progress_with(bar)
        .map(|d| (d, summarize_run(d, &target.machine, baseline.as_ref())))
        .collect();

    let mut tally = Tally::default();
    let mut reports = Vec::new();
    for (dir, res) in results
    {
        match res
        {
            Ok(r) => {
                tally.success();
                reports.push(r);
            },
            Err(e) => tally.failure(dir.display(), e)
        }
    }

    let (base_rows, runs): (Vec<_>, Vec<_>) = reports.into_iter()
        .partition(|r| r.params.is_baseline);
    let groups = group_runs(runs);
    let report_dir = opt.report_dir();
    if let Err(e) = fs::create_dir_all(&report_dir) {
        error!("cannot create {}: {e}", report_dir.display());
        return 1;
    }
    for (mwprop, runs) in groups.iter()
    {
        let rows: Vec<&RunReport> = base_rows.iter()
            .chain(runs.iter())
            .collect();
        print_group(*mwprop, &rows);
        let path = report_dir.join(opt.name(*mwprop));
        let written = File::create(&path)
            .and_then(|f| write_group(BufWriter::new(f), json, &rows));
        match written
        {
            Ok(()) => println!("\n  Created: {}", path.display()),
            Err(e) => error!("could not write {}: {e}", path.display())
        }
    }
    if !tally.failed.is_empty() {
        tally.print_summary("Sweep Report");
    }
    tally.exit_code()
}

#[cfg(test)]
mod testing
{
    use super::*;

    fn write_output(dir: &Path, days: usize, scale: f64)
    {
        fs::create_dir_all(dir).unwrap();
        let mut content = COLUMN_NAMES.join(" ");
        content.push('\n');
        for d in 0..days
        {
            let mut row = vec![0.0; NUM_OUTPUT_COLUMNS];
            row[COL_DAY] = d as f64;
            row[COL_S_PI_NH] = scale * (d as f64 + 1.0);
            row[COL_H_I] = scale;
            row[COL_D] = d as f64;
            let line: Vec<_> = row.iter().map(|v| v.to_string()).collect();
            content.push_str(&line.join(" "));
            content.push('\n');
        }
        fs::write(dir.join(OUTPUT_FILE), content).unwrap();
    }

    #[test]
    fn labels()
    {
        assert_eq!(run_label(&parse_dirname(".run_s.CA.dane.mwprop010.nppd012")), "nppd=12");
        assert_eq!(
            run_label(&parse_dirname(".run_s.CA.dane.mwprop010.xmitd2d050.xmitp2p100")),
            "xmitd2d=0.050,xmitp2p=0.100"
        );
        assert_eq!(run_label(&parse_dirname(".run_s.CA.dane.baseline")), "baseline");
        assert_eq!(run_label(&parse_dirname(".run_s.CA.dane")), "-");
    }

    #[test]
    fn run_against_baseline()
    {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = tmp.path().join(".run_s.CA.dane.baseline");
        write_output(&base_dir, 10, 1.0);
        let run_dir = tmp.path().join(".run_s.CA.dane.mwprop005.nppd010");
        write_output(&run_dir, 10, 2.0);
        fs::write(
            run_dir.join("out.dane.log"),
            "Day 1: 2 hospitals over capacity, 7 underserved hospitalized agents\n\
             Day 2: 5 hospitals over capacity, 3 underserved hospitalized agents\n"
        ).unwrap();
        let short_dir = tmp.path().join(".run_s.CA.dane.mwprop005.nppd005");
        write_output(&short_dir, 5, 1.0);

        let baseline = SimTable::load(&base_dir.join(OUTPUT_FILE)).unwrap();
        let r = summarize_run(&run_dir, "dane", Some(&baseline)).unwrap();
        assert_eq!(r.label, "nppd=10");
        assert_eq!(r.peak_infections, 20.0);
        assert_eq!(r.peak_hospitalizations, 2.0);
        assert_eq!(r.final_deaths, 9.0);
        assert_eq!(r.max_overloaded, 5.0);
        assert_eq!(r.max_underserved, 7.0);
        // candidate is twice the baseline everywhere
        assert!((r.l2_rel[0] - 1.0).abs() < 1e-12);
        assert!((r.l2_rel[1] - 1.0).abs() < 1e-12);
        assert_eq!(r.l2_rel[2], 0.0);

        let short = summarize_run(&short_dir, "dane", Some(&baseline)).unwrap();
        assert!(short.l2_rel.iter().all(|v| v.is_nan()));
        assert!(short.max_overloaded.is_nan());

        let groups = group_runs(vec![r, short]);
        assert_eq!(groups.len(), 1);
        let labels: Vec<_> = groups[&5].iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["nppd=5", "nppd=10"]);

        let mut buf = Vec::new();
        let rows: Vec<_> = groups[&5].iter().collect();
        write_group(&mut buf, &serde_json::json!({"study": "s"}), &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("#label"));
        assert!(lines[3].starts_with("nppd=10 20 2 9 5 7"));
    }
}
