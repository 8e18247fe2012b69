use{
    std::path::Path,
    super::*,
    crate::error::*
};

/// Hospital capacity log: per day the number of facilities over capacity
/// and the number of hospitalized agents that could not be served.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HospitalLoad
{
    pub days: Vec<f64>,
    pub overloaded: Vec<f64>,
    pub underserved: Vec<f64>
}

impl HospitalLoad
{
    /// Read the tabular form (`day overloaded underserved`, no header)
    pub fn load(path: &Path) -> Result<Self>
    {
        let table = SimTable::load_headerless(path, 3)?;
        Ok(
            Self{
                days: table.column(0),
                overloaded: table.column(1),
                underserved: table.column(2)
            }
        )
    }

    /// Extract the hospital load from raw simulator log text
    pub fn from_log_text(text: &str) -> Self
    {
        let mut load = Self::default();
        for (day, over, under) in text.lines().filter_map(parse_log_line)
        {
            load.days.push(day);
            load.overloaded.push(over);
            load.underserved.push(under);
        }
        load
    }

    /// Read the table, or fall back to scanning the simulator log
    pub fn load_or_from_log(table: &Path, log: &Path) -> Result<Self>
    {
        match Self::load(table)
        {
            Err(e) if e.is_not_found() => {
                let text = read_existing(log)?;
                let load = Self::from_log_text(&text);
                if load.is_empty() {
                    Err(EpiError::malformed(log, "no hospital capacity lines in log"))
                } else {
                    Ok(load)
                }
            },
            res => res
        }
    }

    pub fn len(&self) -> usize
    {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.days.is_empty()
    }

    pub fn max_overloaded(&self) -> f64
    {
        self.overloaded.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_underserved(&self) -> f64
    {
        self.underserved.iter().copied().fold(0.0, f64::max)
    }
}

// "Day X: Y hospitals over capacity, Z underserved hospitalized agents"
fn parse_log_line(line: &str) -> Option<(f64, f64, f64)>
{
    let pos = line.find("Day ")?;
    let (day, rest) = line[pos + 4..].split_once(':')?;
    if !rest.contains("hospitals over capacity") {
        return None;
    }
    let day = day.trim().parse().ok()?;
    let tokens: Vec<_> = rest.split_whitespace().collect();
    let over = tokens.first()?.parse().ok()?;
    let idx = tokens.iter().position(|t| *t == "underserved")?;
    let under = tokens.get(idx.checked_sub(1)?)?
        .trim_end_matches(',')
        .parse()
        .ok()?;
    Some((day, over, under))
}
