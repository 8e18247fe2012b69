use serde::{Serialize, Deserialize};

// column layout of the simulator output files
pub const COL_DAY: usize = 0;
pub const COL_SU: usize = 1;
pub const COL_PS_PI: usize = 2;
pub const COL_S_PI_NH: usize = 3;
pub const COL_S_PI_H: usize = 4;
pub const COL_PS_I: usize = 5;
pub const COL_S_I_NH: usize = 6;
pub const COL_S_I_H: usize = 7;
pub const COL_A_PI: usize = 8;
pub const COL_A_I: usize = 9;
pub const COL_H_NI: usize = 10;
pub const COL_H_I: usize = 11;
pub const COL_ICU: usize = 12;
pub const COL_V: usize = 13;
pub const COL_R: usize = 14;
pub const COL_D: usize = 15;
pub const COL_NEW_S: usize = 16;
pub const COL_NEW_H: usize = 17;

/// Minimum number of columns a valid output file has
pub const NUM_OUTPUT_COLUMNS: usize = 18;

pub const COLUMN_NAMES: [&str; NUM_OUTPUT_COLUMNS] = [
    "Day", "Su", "PS/PI", "S/PI/NH", "S/PI/H", "PS/I", "S/I/NH", "S/I/H",
    "A/PI", "A/I", "H/NI", "H/I", "ICU", "V", "R", "D", "NewS", "NewH"
];

/// Compartments counted as "currently infected" for ensemble statistics
pub const INFECTED_COLS: [usize; 10] = [
    COL_PS_PI, COL_S_PI_NH, COL_S_PI_H, COL_PS_I, COL_S_I_NH,
    COL_S_I_H, COL_A_PI, COL_A_I, COL_H_NI, COL_H_I
];

/// A quantity derived from an output table by summing some of its columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Susceptible,
    TotalInfectious,
    Hospitalized,
    Icu,
    Deaths,
    Recovered,
    Infections,
    Hospitalizations,
}

impl Metric {
    /// Metrics compared between regression baselines and tests
    pub const REGRESSION: [Metric; 6] = [
        Metric::Susceptible,
        Metric::TotalInfectious,
        Metric::Hospitalized,
        Metric::Icu,
        Metric::Deaths,
        Metric::Recovered
    ];

    /// Metrics reported for parameter sweeps
    pub const SWEEP: [Metric; 3] = [
        Metric::Infections,
        Metric::Hospitalizations,
        Metric::Deaths
    ];

    pub fn columns(self) -> &'static [usize]
    {
        match self {
            Self::Susceptible => &[COL_SU],
            Self::TotalInfectious => &[COL_PS_I, COL_S_I_NH, COL_S_I_H, COL_A_I, COL_H_I],
            Self::Hospitalized => &[COL_H_NI, COL_H_I],
            Self::Icu => &[COL_ICU],
            Self::Deaths => &[COL_D],
            Self::Recovered => &[COL_R],
            Self::Infections => &[COL_S_PI_NH, COL_S_PI_H, COL_PS_I, COL_S_I_NH, COL_S_I_H, COL_A_PI],
            Self::Hospitalizations => &[COL_H_NI, COL_H_I],
        }
    }

    pub fn title(self) -> &'static str
    {
        match self {
            Self::Susceptible => "Susceptible",
            Self::TotalInfectious => "Total Infectious",
            Self::Hospitalized => "Hospitalized (non-ICU)",
            Self::Icu => "ICU Patients",
            Self::Deaths => "Deaths",
            Self::Recovered => "Recovered",
            Self::Infections => "Infections",
            Self::Hospitalizations => "Hospitalizations",
        }
    }

    /// short name without spaces, usable in data file headers
    pub fn name(self) -> &'static str
    {
        match self {
            Self::Susceptible => "susceptible",
            Self::TotalInfectious => "total_infectious",
            Self::Hospitalized => "hospitalized",
            Self::Icu => "icu",
            Self::Deaths => "deaths",
            Self::Recovered => "recovered",
            Self::Infections => "infections",
            Self::Hospitalizations => "hospitalizations",
        }
    }
}
