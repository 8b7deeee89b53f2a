//! Engine configuration: squad types, rotation schemes, holidays, and the
//! duty policy.
//!
//! Configuration is stored at `~/.config/crewrota/config.json` (overridable
//! with the `CREWROTA_CONFIG` env var). When no file exists, the defaults
//! seed the four standard rotations and the national holiday list.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::HolidayCalendar;
use crate::models::{HolidayEntry, PeriodUnit, RotationScheme, SquadType};
use crate::roster::RosterStore;
use crate::rotation::SchemeRegistry;

/// Application name used for config/data directory paths
const APP_NAME: &str = "crewrota";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Env var overriding the config file path
const CONFIG_ENV: &str = "CREWROTA_CONFIG";

/// One squad type with its rotation scheme and initial squad list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadTypeConfig {
    pub name: String,
    pub description: String,
    pub squads: Vec<String>,
    pub scheme: RotationScheme,
}

/// The externally-decided duty boundaries: which weekdays bracket the
/// weekend, when the evening shift starts, and which squad type each duty
/// slot draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyPolicy {
    pub evening_start: NaiveTime,
    pub rest_day: Weekday,
    pub pre_rest_day: Weekday,
    pub fortnight_night_day: Weekday,
    pub evening_type: String,
    pub weekday_night_type: String,
    pub friday_night_type: String,
    pub weekend_type: String,
}

impl Default for DutyPolicy {
    fn default() -> Self {
        Self {
            evening_start: NaiveTime::from_hms_opt(20, 0, 0).expect("valid literal time"),
            rest_day: Weekday::Sun,
            pre_rest_day: Weekday::Sat,
            fortnight_night_day: Weekday::Fri,
            evening_type: "evening".to_string(),
            weekday_night_type: "weekday-night".to_string(),
            friday_night_type: "friday-night".to_string(),
            weekend_type: "weekend".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub squad_types: Vec<SquadTypeConfig>,
    pub holidays: Vec<HolidayEntry>,
    #[serde(default)]
    pub policy: DutyPolicy,
}

impl Default for RosterConfig {
    /// The standard setup: weekly weekend squads A-D, daily weekday-night
    /// squads, fortnightly Friday-night squads, daily evening squads
    /// S1-S7, and the Italian national holidays.
    fn default() -> Self {
        let epoch = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid literal date");
        let date = |m: u32, d: u32| NaiveDate::from_ymd_opt(2025, m, d).expect("valid literal date");

        let squad_type = |name: &str, description: &str, squads: &[&str], unit: PeriodUnit| {
            SquadTypeConfig {
                name: name.to_string(),
                description: description.to_string(),
                squads: squads.iter().map(|s| s.to_string()).collect(),
                scheme: RotationScheme::new(unit, epoch),
            }
        };

        Self {
            squad_types: vec![
                squad_type(
                    "weekend",
                    "Weekend squads A-D",
                    &["A", "B", "C", "D"],
                    PeriodUnit::Week,
                ),
                squad_type(
                    "weekday-night",
                    "Weekday night squads",
                    &["An", "Bn", "Cn"],
                    PeriodUnit::Day,
                ),
                squad_type(
                    "friday-night",
                    "Friday night squads",
                    &["S1n", "S2n"],
                    PeriodUnit::Fortnight,
                ),
                squad_type(
                    "evening",
                    "Weekday evening squads S1-S7",
                    &["S1", "S2", "S3", "S4", "S5", "S6", "S7"],
                    PeriodUnit::Day,
                ),
            ],
            holidays: vec![
                HolidayEntry::new(date(1, 1), "New Year's Day", true),
                HolidayEntry::new(date(1, 6), "Epiphany", true),
                HolidayEntry::new(date(4, 21), "Easter Monday", false),
                HolidayEntry::new(date(4, 25), "Liberation Day", true),
                HolidayEntry::new(date(5, 1), "Labour Day", true),
                HolidayEntry::new(date(6, 2), "Republic Day", true),
                HolidayEntry::new(date(8, 15), "Assumption Day", true),
                HolidayEntry::new(date(11, 1), "All Saints' Day", true),
                HolidayEntry::new(date(12, 8), "Immaculate Conception", true),
                HolidayEntry::new(date(12, 25), "Christmas Day", true),
                HolidayEntry::new(date(12, 26), "St. Stephen's Day", true),
            ],
            policy: DutyPolicy::default(),
        }
    }
}

impl RosterConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the roster snapshot lives by default.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Build the store, scheme registry, and holiday calendar this
    /// configuration describes.
    pub fn bootstrap(&self) -> Result<(RosterStore, SchemeRegistry, HolidayCalendar)> {
        let store = RosterStore::new();
        let mut registry = SchemeRegistry::new();

        for ty in &self.squad_types {
            if ty.squads.is_empty() {
                bail!("Squad type '{}' declares no squads", ty.name);
            }
            store.register_squad_type(SquadType {
                name: ty.name.clone(),
                description: ty.description.clone(),
                squad_count: ty.squads.len(),
            });
            store.register_squads(&ty.name, &ty.squads)?;
            registry.bind(&ty.name, ty.scheme.clone());
        }

        let calendar = HolidayCalendar::new(self.holidays.clone(), self.policy.rest_day);
        info!(
            squad_types = self.squad_types.len(),
            holidays = self.holidays.len(),
            "Roster configuration bootstrapped"
        );
        Ok((store, registry, calendar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_bootstraps() {
        let config = RosterConfig::default();
        let (store, registry, calendar) = config.bootstrap().unwrap();

        assert_eq!(store.squads_of("weekend").len(), 4);
        assert_eq!(store.squads_of("evening").len(), 7);
        assert!(registry.is_bound("friday-night"));
        // Assumption Day is seeded
        assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()));
    }

    #[test]
    fn test_default_policy_boundaries() {
        let policy = DutyPolicy::default();
        assert_eq!(policy.evening_start, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(policy.rest_day, Weekday::Sun);
        assert_eq!(policy.pre_rest_day, Weekday::Sat);
        assert_eq!(policy.fortnight_night_day, Weekday::Fri);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = RosterConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: RosterConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.squad_types.len(), config.squad_types.len());
        assert_eq!(restored.holidays, config.holidays);
        assert_eq!(restored.policy, config.policy);
    }

    #[test]
    fn test_empty_squad_type_rejected() {
        let mut config = RosterConfig::default();
        config.squad_types[0].squads.clear();
        assert!(config.bootstrap().is_err());
    }
}
