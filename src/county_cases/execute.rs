use{
    std::{
        fs::{self, File},
        io::{BufWriter, Write},
        path::Path
    },
    serde_json::json,
    tracing::{error, warn},
    crate::{
        error::*,
        json_parsing::write_json,
        misc_types::*,
        run_naming::*,
        sim_data::*
    }
};

pub const FIPS_MAPPING_FILE: &str = "US.dat";
pub const STEP_INTERVAL: usize = 10;

/// 0, every 10th step and the last step
pub fn default_steps(last: u32) -> Vec<u32>
{
    let mut steps: Vec<_> = (0..=last).step_by(STEP_INTERVAL).collect();
    if steps.last() != Some(&last) {
        steps.push(last);
    }
    steps
}

pub fn output_name(info: &RunInfo, disease: Option<&str>, step: u32) -> String
{
    match disease {
        Some(d) => format!("county_cases_{}_{}_{d}_day{step:05}.dat", info.case, info.platform),
        None => format!("county_cases_{}_{}_day{step:05}.dat", info.case, info.platform)
    }
}

pub fn write_county_cases<W: Write>(mut w: W, header: &serde_json::Value, counts: &CountyCounts) -> std::io::Result<()>
{
    write_json(&mut w, header)?;
    writeln!(w, "#GEOID cases")?;
    for (fips, cases) in counts
    {
        writeln!(w, "{fips} {cases}")?;
    }
    Ok(())
}

/// Aggregate one step and write it. Returns the largest county count.
pub fn convert_step(
    run_dir: &Path,
    mapping: &FipsMapping,
    info: &RunInfo,
    disease: Option<&str>,
    step: u32,
    output_dir: &Path
) -> Result<f64>
{
    let cases = load_case_counts(&case_file_path(run_dir, step, disease)?)?;
    let counts = mapping.aggregate(&cases)?;
    let header = json!({
        "run_dir": run_dir.display().to_string(),
        "disease": disease,
        "step": step
    });
    let path = output_dir.join(output_name(info, disease, step));
    let file = File::create(path)?;
    write_county_cases(BufWriter::new(file), &header, &counts)?;
    Ok(counts.values().copied().fold(0.0, f64::max))
}

fn available_steps(run_dir: &Path, diseases: &[Option<&str>]) -> Result<Vec<u32>>
{
    let steps = detect_steps(run_dir)?;
    if !steps.is_empty() {
        return Ok(steps);
    }
    match diseases.first() {
        Some(Some(d)) if run_dir.join(d).is_dir() => detect_steps(&run_dir.join(d)),
        _ => Ok(steps)
    }
}

pub fn convert_run(run_dir: &Path, steps: &[u32], output_dir: &Path) -> i32
{
    let info = detect_run_info(run_dir);
    // per disease output only when there is more than one
    let diseases: Vec<Option<&str>> = if info.diseases.len() > 1 {
        info.diseases.iter().map(|d| Some(d.as_str())).collect()
    } else {
        vec![None]
    };

    let all_steps = match available_steps(run_dir, &diseases)
    {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            println!("No cases files found in {}", run_dir.display());
            return 1;
        },
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    let steps = if steps.is_empty() {
        default_steps(all_steps[all_steps.len() - 1])
    } else {
        steps.to_vec()
    };
    println!("Run directory: {}", run_dir.display());
    println!("Timesteps: {steps:?}");
    println!("Output directory: {}", output_dir.display());

    println!("Loading FIPS mapping from {FIPS_MAPPING_FILE}...");
    let mapping = match FipsMapping::load(&run_dir.join(FIPS_MAPPING_FILE))
    {
        Ok(m) => m,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    println!("  {} locations, {} counties", mapping.len(), mapping.num_counties());
    println!("Case name: {}", info.case);
    println!("Platform: {}", info.platform);
    if info.diseases.is_empty() {
        println!("Diseases: single disease");
    } else {
        println!("Diseases: {}", info.diseases.join(", "));
    }
    if let Err(e) = fs::create_dir_all(output_dir) {
        error!("cannot create {}: {e}", output_dir.display());
        return 1;
    }

    let bar = crate::indication_bar((diseases.len() * steps.len()) as u64);
    let mut tally = Tally::default();
    let mut maxima: Vec<(Option<&str>, f64)> = Vec::with_capacity(diseases.len());
    for &disease in &diseases
    {
        let mut disease_max = 0.0_f64;
        for &step in &steps
        {
            let name = output_name(&info, disease, step);
            match convert_step(run_dir, &mapping, &info, disease, step, output_dir)
            {
                Ok(max) => {
                    disease_max = disease_max.max(max);
                    tally.success();
                },
                Err(e) => {
                    warn!("{name}: {e}");
                    tally.failure(name, e);
                }
            }
            bar.inc(1);
        }
        maxima.push((disease, disease_max));
    }
    bar.finish_and_clear();

    for (disease, max) in maxima
    {
        match disease {
            Some(d) => println!("  {d} vmax: {}", thousands(max)),
            None => println!("  Global vmax: {}", thousands(max))
        }
    }
    tally.print_summary("County Aggregation");
    tally.exit_code()
}

#[cfg(test)]
mod testing
{
    use super::*;

    fn mapping_file(dir: &Path)
    {
        fs::write(
            dir.join(FIPS_MAPPING_FILE),
            "3\n0 0 0 6001\n1 0 0 6001\n2 0 0 6075\n"
        ).unwrap();
    }

    #[test]
    fn step_selection()
    {
        assert_eq!(default_steps(0), vec![0]);
        assert_eq!(default_steps(20), vec![0, 10, 20]);
        assert_eq!(default_steps(25), vec![0, 10, 20, 25]);
    }

    #[test]
    fn single_disease_run()
    {
        let tmp = tempfile::tempdir().unwrap();
        let run = tmp.path().join(".run_CA_01D_Cov19S1_dane");
        fs::create_dir(&run).unwrap();
        mapping_file(&run);
        fs::write(run.join("cases00000"), "1\n2\n3\n").unwrap();
        fs::write(run.join("cases00010"), "10\n20\n3000\n").unwrap();
        fs::write(run.join("cases00015"), "0 0 1\n").unwrap();

        let out = tmp.path().join("out");
        assert_eq!(convert_run(&run, &[], &out), 0);
        let day10 = fs::read_to_string(out.join("county_cases_CA_01D_Cov19S1_dane_day00010.dat")).unwrap();
        let rows: Vec<_> = day10.lines().skip(2).collect();
        assert_eq!(rows, vec!["06001 30", "06075 3000"]);
        assert!(out.join("county_cases_CA_01D_Cov19S1_dane_day00015.dat").is_file());

        // step 5 does not exist, the others still work
        assert_eq!(convert_run(&run, &[0, 5], &out), 0);
    }

    #[test]
    fn multi_disease_run()
    {
        let tmp = tempfile::tempdir().unwrap();
        let run = tmp.path().join(".run_bay_02D_Cov19S1_FluS1_tuolumne");
        fs::create_dir_all(run.join("FluS1")).unwrap();
        mapping_file(&run);
        fs::write(run.join("cases_Cov19S1_00000"), "1\n1\n1\n").unwrap();
        fs::write(run.join("FluS1").join("cases00000"), "2\n2\n2\n").unwrap();
        fs::write(run.join("cases00000"), "0\n0\n0\n").unwrap();

        let out = tmp.path().join("out");
        assert_eq!(convert_run(&run, &[0], &out), 0);
        let flu = fs::read_to_string(
            out.join("county_cases_bay_02D_Cov19S1_FluS1_tuolumne_FluS1_day00000.dat")
        ).unwrap();
        assert!(flu.ends_with("06001 4\n06075 2\n"));
        assert!(out.join("county_cases_bay_02D_Cov19S1_FluS1_tuolumne_Cov19S1_day00000.dat").is_file());
    }

    #[test]
    fn wrong_location_count()
    {
        let tmp = tempfile::tempdir().unwrap();
        let run = tmp.path().join(".run_CA_dane");
        fs::create_dir(&run).unwrap();
        mapping_file(&run);
        fs::write(run.join("cases00000"), "1\n2\n").unwrap();
        assert_eq!(convert_run(&run, &[], &tmp.path().join("out")), 1);
    }
}
