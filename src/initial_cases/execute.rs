use{
    std::{
        collections::BTreeMap,
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf}
    },
    serde_json::json,
    tracing::{error, warn},
    crate::{
        error::*,
        json_parsing::write_json,
        misc_types::*,
        run_naming::disease_from_filename,
        sim_data::SeedCases
    }
};

pub fn resolve_files<S: AsRef<str>>(datadir: &Path, files: &[S]) -> Result<Vec<PathBuf>>
{
    if files.is_empty() {
        let mut found: Vec<_> = fs::read_dir(datadir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().map_or(false, |e| e == "cases"))
            .collect();
        found.sort();
        return Ok(found);
    }
    Ok(
        files.iter()
            .map(|f| {
                let p = Path::new(f.as_ref());
                if p.is_absolute() { p.to_path_buf() } else { datadir.join(p) }
            })
            .filter(
                |p|
                {
                    let exists = p.exists();
                    if !exists {
                        warn!("{} not found, skipping", p.display());
                    }
                    exists
                }
            ).collect()
    )
}

/// GEOID -> seeds per disease, diseases in the order of the map
pub fn combine(all: &BTreeMap<String, SeedCases>) -> BTreeMap<String, Vec<u64>>
{
    let mut table: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for (idx, seeds) in all.values().enumerate()
    {
        for (fips, count) in &seeds.entries
        {
            let row = table.entry(fips.clone())
                .or_insert_with(|| vec![0; all.len()]);
            row[idx] += count;
        }
    }
    table
}

fn write_combined<W: Write>(mut w: W, header: &serde_json::Value, all: &BTreeMap<String, SeedCases>) -> std::io::Result<()>
{
    write_json(&mut w, header)?;
    write!(w, "#GEOID")?;
    for disease in all.keys()
    {
        write!(w, " {disease}")?;
    }
    writeln!(w)?;
    for (fips, counts) in combine(all)
    {
        write!(w, "{fips}")?;
        for c in counts
        {
            write!(w, " {c}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn summarize<S: AsRef<str>>(datadir: &Path, files: &[S], output: &Path) -> i32
{
    let case_files = match resolve_files(datadir, files)
    {
        Ok(f) => f,
        Err(e) => {
            error!("{}: {e}", datadir.display());
            return 1;
        }
    };
    if case_files.is_empty() {
        println!("No .cases files found in {}", datadir.display());
        return 1;
    }
    println!("Data directory: {}", datadir.display());
    println!("Case files: {}", case_files.len());
    println!();

    let mut all = BTreeMap::new();
    let mut tally = Tally::default();
    for path in &case_files
    {
        let disease = disease_from_filename(path);
        let file_name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match SeedCases::load(path)
        {
            Ok(seeds) => {
                println!(
                    "  {file_name}: {disease} — {} cases across {} counties ({:.1} per million)",
                    thousands(seeds.total() as f64),
                    seeds.num_counties(),
                    seeds.per_million(US_POPULATION)
                );
                all.insert(disease, seeds);
                tally.success();
            },
            Err(e) => {
                warn!("{e}");
                tally.failure(file_name, e);
            }
        }
    }
    println!();

    if !all.is_empty() {
        let header = json!({
            "files": case_files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>()
        });
        let res = File::create(output)
            .and_then(|f| write_combined(BufWriter::new(f), &header, &all));
        match res
        {
            Ok(()) => println!("Combined table: {}", output.display()),
            Err(e) => {
                error!("could not write {}: {e}", output.display());
                return 1;
            }
        }
    }
    if !tally.failed.is_empty() {
        tally.print_summary("Initial Cases");
    }
    tally.exit_code()
}
