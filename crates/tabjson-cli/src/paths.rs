//! File naming conventions for inputs and artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Artifact written by the `cities` command.
pub const CITIES_FILE_NAME: &str = "province_city.json";

/// Province whose published score tables can be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Province {
    Hubei,
}

impl Province {
    pub fn code(self) -> &'static str {
        match self {
            Self::Hubei => "hubei",
        }
    }

    /// Name used in published file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hubei => "湖北",
        }
    }
}

/// Subject track of a score ranking table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Category {
    Physics,
    History,
}

impl Category {
    pub const ALL: [Self; 2] = [Self::Physics, Self::History];

    pub fn code(self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::History => "history",
        }
    }

    /// Name used in published file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Physics => "物理类",
            Self::History => "历史类",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Published workbook name, e.g. `25湖北一分一段表物理类.xlsx` for 2025.
pub fn ranking_input_name(year: u16, province: Province, category: Category) -> String {
    format!(
        "{:02}{}一分一段表{}.xlsx",
        year % 100,
        province.label(),
        category.label()
    )
}

/// Artifact name, e.g. `ranking_score_hubei_physics.json`.
pub fn ranking_output_name(province: Province, category: Category) -> String {
    format!("ranking_score_{}_{}.json", province.code(), category.code())
}

/// The user's downloads directory, or `~/Downloads` where the platform has none.
pub fn default_downloads_dir() -> Option<PathBuf> {
    let dirs = directories::UserDirs::new()?;
    Some(
        dirs.download_dir()
            .map_or_else(|| dirs.home_dir().join("Downloads"), Path::to_path_buf),
    )
}
