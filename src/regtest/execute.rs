use{
    super::*,
    std::{
        collections::BTreeSet,
        fs::{self, File},
        io::{BufWriter, Write},
        path::Path
    },
    rayon::prelude::*,
    serde_json::Value,
    tracing::{error, info, warn},
    crate::{
        config::TestCasesConfig,
        error::*,
        json_parsing::*,
        misc_types::*,
        run_naming::split_case_machine,
        sim_data::*,
        stats_methods::*
    }
};

pub const DISABLED_MARKER: &str = ".disabled";

/// A `<case>.<machine>` directory pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDir
{
    pub case: String,
    pub machine: String
}

impl TestDir
{
    pub fn dir_name(&self) -> String
    {
        format!("{}.{}", self.case, self.machine)
    }
}

/// `<case>.<machine>` directories below `root`, optionally restricted to one machine
pub fn find_case_dirs(root: &Path, machine: Option<&str>) -> Result<Vec<TestDir>>
{
    if !root.is_dir() {
        return Err(EpiError::not_found(root));
    }
    let mut found: Vec<_> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(
            |entry|
            {
                let name = entry.file_name().to_string_lossy().into_owned();
                let (case, m) = split_case_machine(&name)?;
                Some(TestDir{case: case.to_owned(), machine: m.to_owned()})
            }
        )
        .filter(|t| machine.map_or(true, |m| t.machine == m))
        .collect();
    found.sort();
    Ok(found)
}

/// Test directories with output
pub fn find_test_dirs(test_root: &Path, machine: Option<&str>) -> Result<Vec<TestDir>>
{
    let mut found = find_case_dirs(test_root, machine)?;
    found.retain(|t| test_root.join(t.dir_name()).join(OUTPUT_FILE).is_file());
    Ok(found)
}

pub fn is_disabled(dir: &Path) -> bool
{
    dir.join(DISABLED_MARKER).exists()
}

/// Norms of all regression metrics for one test against its baseline
pub fn compare_tables(baseline: &SimTable, test: &SimTable) -> Result<Vec<(Metric, DiffNorms)>>
{
    if baseline.shape() != test.shape() {
        let (br, bc) = baseline.shape();
        let (tr, tc) = test.shape();
        return Err(
            EpiError::shape(
                "baseline vs. test output",
                format!("{br} rows × {bc} cols"),
                format!("{tr} rows × {tc} cols")
            )
        );
    }
    Metric::REGRESSION.iter()
        .map(|&m| DiffNorms::compute(&baseline.metric(m), &test.metric(m)).map(|n| (m, n)))
        .collect()
}

pub fn compare_case(opt: &RegtestParams, test: &TestDir) -> Result<Vec<(Metric, DiffNorms)>>
{
    let name = test.dir_name();
    let baseline = SimTable::load(&opt.baseline_dir().join(&name).join(OUTPUT_FILE))?;
    let candidate = SimTable::load(&opt.test_dir().join(&name).join(OUTPUT_FILE))?;
    compare_tables(&baseline, &candidate)
}

pub fn print_norms(title: &str, rows: &[(Metric, DiffNorms)])
{
    println!("\n  Metric comparison for {title}:");
    println!(
        "  {:<20} {:<12} {:<12} {:<12} {:<12} {:<12} {:<12}",
        "Metric", "L1 (abs)", "L2 (abs)", "L∞ (abs)", "L1 (rel)", "L2 (rel)", "L∞ (rel)"
    );
    println!("  {} {}", "-".repeat(20), vec!["-".repeat(12); 6].join(" "));
    for (metric, n) in rows
    {
        println!(
            "  {:<20} {:<12} {:<12} {:<12} {:<12} {:<12} {:<12}",
            metric.title(),
            sci(n.l1_abs),
            sci(n.l2_abs),
            sci(n.linf_abs),
            sci(n.l1_rel),
            sci(n.l2_rel),
            sci(n.linf_rel)
        );
    }
}

pub fn write_norms<W: Write>(mut writer: W, json: &Value, rows: &[(Metric, DiffNorms)]) -> std::io::Result<()>
{
    write_json(&mut writer, json)?;
    writeln!(writer, "#metric l1_abs l2_abs linf_abs l1_rel l2_rel linf_rel")?;
    for (metric, n) in rows
    {
        write!(writer, "{}", metric.name())?;
        for v in n.all()
        {
            write!(writer, " {v:e}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Cases named on the command line with groups expanded, `None` for all cases
pub fn selected_cases(opt: &RegtestParams) -> Option<BTreeSet<String>>
{
    if opt.cases.is_empty() {
        return None;
    }
    let path = opt.test_cases_file();
    match TestCasesConfig::load(&path)
    {
        Ok(config) => Some(config.resolve(&opt.cases)),
        Err(e) => {
            if !e.is_not_found() {
                warn!("ignoring {}: {e}", path.display());
            }
            Some(opt.cases.iter().cloned().collect())
        }
    }
}

pub fn compare_all(opt: &RegtestParams, json: &Value) -> i32
{
    let mut tests = match find_test_dirs(&opt.test_dir(), opt.machine.as_deref())
    {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    if let Some(cases) = selected_cases(opt) {
        tests.retain(|t| cases.contains(&t.case));
    }
    let (disabled, tests): (Vec<_>, Vec<_>) = tests.into_iter()
        .partition(|t| is_disabled(&opt.test_dir().join(t.dir_name())));
    for t in &disabled
    {
        info!("Skipping {} (disabled case)", t.dir_name());
    }
    if tests.is_empty() {
        println!("No matching test cases found with {OUTPUT_FILE} files");
        return 1;
    }
    println!("Found {} test case(s) to compare", tests.len());

    let results: Vec<_> = tests.par_iter()
        .map(|t| compare_case(opt, t))
        .collect();

    let plot_dir = opt.plot_dir();
    if let Err(e) = fs::create_dir_all(&plot_dir) {
        error!("cannot create {}: {e}", plot_dir.display());
        return 1;
    }
    let mut tally = Tally::default();
    for (test, res) in tests.iter().zip(results)
    {
        let name = test.dir_name();
        match res
        {
            Ok(rows) => {
                print_norms(&name, &rows);
                let path = plot_dir.join(format!("{name}.norms"));
                match File::create(&path).and_then(|f| write_norms(BufWriter::new(f), json, &rows))
                {
                    Ok(()) => {
                        println!("\n  Created: {}", path.display());
                        tally.success();
                    },
                    Err(e) => tally.failure(&name, e)
                }
            },
            Err(e) => {
                println!("  ERROR: {name}: {e}");
                tally.failure(&name, e)
            }
        }
    }
    tally.print_summary("Regression Comparison");
    if tally.any_succeeded() {
        println!("Norms saved in: {}", plot_dir.display());
    }
    tally.exit_code()
}
