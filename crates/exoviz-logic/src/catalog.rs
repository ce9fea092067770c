//! Planet catalog loading.
//!
//! Reads the exoplanet CSV, keeps a bounded prefix of rows, and fills in the
//! derived columns (habitability, life signs, water, temperature) with
//! synthetic values when the source does not carry them. Individual cells are
//! never validated: anything that fails to parse as a number becomes NaN and
//! flows through to the scene as-is.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{columns, ranges};
use crate::coordinates::parsecs_to_light_years;
use crate::error::DataSourceError;

/// One exoplanet row, with derived fields either read or synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub name: String,
    pub distance_parsecs: f64,
    /// Percentage in 0..=100.
    pub habitability_percent: f64,
    /// Score in 0..=10.
    pub life_sign_score: f64,
    pub has_water: bool,
    pub temperature_celsius: f64,
}

impl PlanetRecord {
    pub fn distance_ly(&self) -> f64 {
        parsecs_to_light_years(self.distance_parsecs)
    }
}

/// Which of the optional columns the source actually provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub habitability: bool,
    pub life_sign: bool,
    pub water: bool,
    pub temperature: bool,
}

/// Header positions, resolved once per file.
struct ColumnIndex {
    name: usize,
    distance: usize,
    habitability: Option<usize>,
    life_sign: Option<usize>,
    water: Option<usize>,
    temperature: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataSourceError> {
        let find = |column: &str| headers.iter().position(|h| h == column);
        Ok(Self {
            name: find(columns::NAME).ok_or(DataSourceError::MissingColumn(columns::NAME))?,
            distance: find(columns::DISTANCE)
                .ok_or(DataSourceError::MissingColumn(columns::DISTANCE))?,
            habitability: find(columns::HABITABILITY),
            life_sign: find(columns::LIFE_SIGN),
            water: find(columns::WATER),
            temperature: find(columns::TEMPERATURE),
        })
    }

    fn presence(&self) -> ColumnPresence {
        ColumnPresence {
            habitability: self.habitability.is_some(),
            life_sign: self.life_sign.is_some(),
            water: self.water.is_some(),
            temperature: self.temperature.is_some(),
        }
    }
}

/// Load the first `limit` planets from a CSV file.
///
/// Synthetic columns are drawn from an entropy-seeded generator, so they
/// differ between runs. Use [`load_planets_with_rng`] to pin them.
pub fn load_planets(
    path: impl AsRef<Path>,
    limit: usize,
) -> Result<Vec<PlanetRecord>, DataSourceError> {
    let mut rng = StdRng::from_entropy();
    load_planets_with_rng(path, limit, &mut rng)
}

/// Load the first `limit` planets from a CSV file, drawing any synthetic
/// columns from `rng`.
pub fn load_planets_with_rng<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<PlanetRecord>, DataSourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let planets = load_planets_from_reader(file, limit, rng)?;
    log::info!("Loaded {} planets from {}", planets.len(), path.display());
    Ok(planets)
}

/// Load the first `limit` planets from any CSV source.
pub fn load_planets_from_reader<R: Read, G: Rng + ?Sized>(
    source: R,
    limit: usize,
    rng: &mut G,
) -> Result<Vec<PlanetRecord>, DataSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(source);

    let index = ColumnIndex::resolve(reader.headers()?)?;

    // Every row is parsed so a broken file fails as a whole, even past the prefix.
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    rows.truncate(limit);

    let presence = index.presence();
    let synthetic = SyntheticColumns::generate(rows.len(), presence, rng);
    if presence != ColumnPresence::all() {
        log::warn!("Catalog lacks derived columns {:?}; synthesizing", presence.missing());
    }

    let planets = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cell = |idx: usize| row.get(idx).unwrap_or("");
            PlanetRecord {
                name: cell(index.name).to_string(),
                distance_parsecs: parse_number(cell(index.distance)),
                habitability_percent: match index.habitability {
                    Some(idx) => parse_number(cell(idx)),
                    None => synthetic.habitability[i],
                },
                life_sign_score: match index.life_sign {
                    Some(idx) => parse_number(cell(idx)),
                    None => synthetic.life_sign[i],
                },
                has_water: match index.water {
                    Some(idx) => parse_flag(cell(idx)),
                    None => synthetic.water[i],
                },
                temperature_celsius: match index.temperature {
                    Some(idx) => parse_number(cell(idx)),
                    None => synthetic.temperature[i],
                },
            }
        })
        .collect();

    Ok(planets)
}

impl ColumnPresence {
    pub fn all() -> Self {
        Self {
            habitability: true,
            life_sign: true,
            water: true,
            temperature: true,
        }
    }

    /// Names of the columns that will be synthesized.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.habitability, columns::HABITABILITY),
            (self.life_sign, columns::LIFE_SIGN),
            (self.water, columns::WATER),
            (self.temperature, columns::TEMPERATURE),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect()
    }
}

/// Synthetic values for absent columns. A column that is present stays empty.
struct SyntheticColumns {
    habitability: Vec<f64>,
    life_sign: Vec<f64>,
    water: Vec<bool>,
    temperature: Vec<f64>,
}

impl SyntheticColumns {
    /// Columns are drawn one after another, each for every row.
    fn generate<R: Rng + ?Sized>(rows: usize, presence: ColumnPresence, rng: &mut R) -> Self {
        let uniform = |rng: &mut R, (lo, hi): (f64, f64)| -> Vec<f64> {
            (0..rows).map(|_| rng.gen_range(lo..hi)).collect()
        };

        let habitability = if presence.habitability {
            Vec::new()
        } else {
            uniform(rng, ranges::HABITABILITY)
        };
        let life_sign = if presence.life_sign {
            Vec::new()
        } else {
            uniform(rng, ranges::LIFE_SIGN)
        };
        let water = if presence.water {
            Vec::new()
        } else {
            (0..rows)
                .map(|_| rng.gen_bool(ranges::WATER_PROBABILITY))
                .collect()
        };
        let temperature = if presence.temperature {
            Vec::new()
        } else {
            uniform(rng, ranges::TEMPERATURE_C)
        };

        Self {
            habitability,
            life_sign,
            water,
            temperature,
        }
    }
}

fn parse_number(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(f64::NAN)
}

/// Only `false` and `0` count as "no water"; blanks and any other text read as present.
fn parse_flag(cell: &str) -> bool {
    !matches!(cell.trim().to_ascii_lowercase().as_str(), "false" | "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn load(csv: &str, limit: usize) -> Result<Vec<PlanetRecord>, DataSourceError> {
        load_planets_from_reader(csv.as_bytes(), limit, &mut rng())
    }

    #[test]
    fn test_minimal_columns_are_synthesized_in_range() {
        let csv = "pl_name,sy_dist\nKepler-1b,10.0\nKepler-2b,20.0\nKepler-3b,5.5\n";
        let planets = load(csv, 30).unwrap();
        assert_eq!(planets.len(), 3);
        for p in &planets {
            assert!((0.0..=100.0).contains(&p.habitability_percent));
            assert!((0.0..=10.0).contains(&p.life_sign_score));
            assert!((-150.0..=50.0).contains(&p.temperature_celsius));
        }
        assert_eq!(planets[0].name, "Kepler-1b");
        assert_eq!(planets[2].distance_parsecs, 5.5);
    }

    #[test]
    fn test_present_columns_used_verbatim() {
        let csv = "pl_name,sy_dist,habitability_percent,sign_of_life,water_presence,temperature\n\
                   A,1.0,150.0,-3.0,False,999.0\n\
                   B,2.0,50.0,5.0,True,-20.5\n";
        let planets = load(csv, 30).unwrap();
        // Out-of-range values pass through untouched.
        assert_eq!(planets[0].habitability_percent, 150.0);
        assert_eq!(planets[0].life_sign_score, -3.0);
        assert!(!planets[0].has_water);
        assert_eq!(planets[0].temperature_celsius, 999.0);
        assert!(planets[1].has_water);
        assert_eq!(planets[1].temperature_celsius, -20.5);
    }

    #[test]
    fn test_truncates_to_limit_in_source_order() {
        let mut csv = String::from("pl_name,sy_dist\n");
        for i in 0..50 {
            csv.push_str(&format!("P{},{}\n", i, i + 1));
        }
        let planets = load(&csv, 30).unwrap();
        assert_eq!(planets.len(), 30);
        assert_eq!(planets[0].name, "P0");
        assert_eq!(planets[29].name, "P29");
    }

    #[test]
    fn test_malformed_distance_becomes_nan() {
        let csv = "pl_name,sy_dist\nWeird,not-a-number\nBlank,\n";
        let planets = load(csv, 30).unwrap();
        assert!(planets[0].distance_parsecs.is_nan());
        assert!(planets[1].distance_parsecs.is_nan());
    }

    #[test]
    fn test_short_row_reads_as_blank() {
        let csv = "pl_name,sy_dist,temperature\nShort,4.2\n";
        let planets = load(csv, 30).unwrap();
        assert_eq!(planets[0].distance_parsecs, 4.2);
        assert!(planets[0].temperature_celsius.is_nan());
    }

    #[test]
    fn test_missing_required_column() {
        let err = load("pl_name,hostname\nA,Sun\n", 30).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn("sy_dist")));

        let err = load("sy_dist\n1.0\n", 30).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn("pl_name")));
    }

    #[test]
    fn test_invalid_utf8_row_is_csv_error() {
        let bytes: &[u8] = b"pl_name,sy_dist\nA\xff\xfe,1.0\n";
        let err = load_planets_from_reader(bytes, 30, &mut rng()).unwrap_err();
        assert!(matches!(err, DataSourceError::Csv(_)));
    }

    #[test]
    fn test_broken_row_past_limit_still_fails() {
        let bytes: &[u8] = b"pl_name,sy_dist\nA,1.0\nB\xff,2.0\n";
        let err = load_planets_from_reader(bytes, 1, &mut rng()).unwrap_err();
        assert!(matches!(err, DataSourceError::Csv(_)));
    }

    #[test]
    fn test_water_column_only_false_and_zero_mean_dry() {
        let csv = "pl_name,sy_dist,water_presence\nA,1,no\nB,2,yes\nC,3,\nD,4,0\nE,5,FALSE\n";
        let planets = load(csv, 30).unwrap();
        let water: Vec<bool> = planets.iter().map(|p| p.has_water).collect();
        assert_eq!(water, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_planets("/nonexistent/spacedata.csv", 30).unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }));
    }

    #[test]
    fn test_comment_lines_and_extra_columns_ignored() {
        let csv = "# exported from archive\npl_name,hostname,sy_dist\nProxima Cen b,Proxima Cen,1.30\n";
        let planets = load(csv, 30).unwrap();
        assert_eq!(planets.len(), 1);
        assert_eq!(planets[0].name, "Proxima Cen b");
        assert_eq!(planets[0].distance_parsecs, 1.30);
    }

    #[test]
    fn test_synthesis_is_reproducible_with_seeded_rng() {
        let csv = "pl_name,sy_dist\nA,1\nB,2\n";
        let first = load(csv, 30).unwrap();
        let second = load(csv, 30).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_water_flag_parsing() {
        assert!(!parse_flag("False"));
        assert!(!parse_flag(" 0 "));
        assert!(parse_flag("no"));
        assert!(parse_flag("n"));
        assert!(parse_flag("f"));
        assert!(parse_flag("True"));
        assert!(parse_flag("1"));
        assert!(parse_flag(""));
    }

    #[test]
    fn test_missing_columns_listing() {
        let presence = ColumnPresence {
            habitability: true,
            water: true,
            ..ColumnPresence::default()
        };
        assert_eq!(presence.missing(), vec!["sign_of_life", "temperature"]);
        assert!(ColumnPresence::all().missing().is_empty());
    }

    #[test]
    fn test_distance_ly_conversion() {
        let p = PlanetRecord {
            name: "Kepler-1b".into(),
            distance_parsecs: 10.0,
            habitability_percent: 0.0,
            life_sign_score: 0.0,
            has_water: false,
            temperature_celsius: 0.0,
        };
        assert!((p.distance_ly() - 32.62).abs() < 1e-9);
        assert_eq!(p.distance_ly(), parsecs_to_light_years(p.distance_parsecs));
    }
}
