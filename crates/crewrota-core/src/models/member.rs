//! Domain models for crew members.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Two-valued qualification. Senior members lead squads and are listed
/// before standard members everywhere a roster is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Senior,
    Standard,
}

impl Rank {
    /// Presentation weight: senior sorts first.
    fn sort_weight(self) -> u8 {
        match self {
            Rank::Senior => 0,
            Rank::Standard => 1,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Senior => write!(f, "senior"),
            Rank::Standard => write!(f, "standard"),
        }
    }
}

/// Driver qualification, ordered lowest to highest.
///
/// Rosters list the highest class first, so sorting uses this ordering
/// reversed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DriverClass {
    #[default]
    None,
    ClassI,
    ClassII,
    ClassIII,
}

impl fmt::Display for DriverClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverClass::None => write!(f, "-"),
            DriverClass::ClassI => write!(f, "I"),
            DriverClass::ClassII => write!(f, "II"),
            DriverClass::ClassIII => write!(f, "III"),
        }
    }
}

/// A crew member. Owned by the roster store; mutated only through an
/// explicit edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub rank: Rank,
    pub driver_class: DriverClass,
    pub family_name: String,
    pub given_name: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.family_name, self.given_name)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.family_name, self.given_name)
    }

    /// The fixed presentation sort key: rank (senior first), driver class
    /// descending, then family and given name ascending, case-normalized.
    ///
    /// Every roster listing sorts by this single key so two callers always
    /// see the same order.
    pub fn sort_key(&self) -> (u8, Reverse<DriverClass>, String, String) {
        (
            self.rank.sort_weight(),
            Reverse(self.driver_class),
            self.family_name.to_lowercase(),
            self.given_name.to_lowercase(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, rank: Rank, driver: DriverClass, family: &str, given: &str) -> Member {
        Member {
            id,
            rank,
            driver_class: driver,
            family_name: family.to_string(),
            given_name: given.to_string(),
        }
    }

    #[test]
    fn test_driver_class_ordering() {
        assert!(DriverClass::ClassIII > DriverClass::ClassII);
        assert!(DriverClass::ClassII > DriverClass::ClassI);
        assert!(DriverClass::ClassI > DriverClass::None);
    }

    #[test]
    fn test_sort_key_rank_before_driver_class() {
        // A senior without a licence still lists before a class-III standard
        let senior = member(1, Rank::Senior, DriverClass::None, "Verdi", "Anna");
        let standard = member(2, Rank::Standard, DriverClass::ClassIII, "Bianchi", "Luca");
        assert!(senior.sort_key() < standard.sort_key());
    }

    #[test]
    fn test_sort_key_driver_class_descending() {
        let iii = member(1, Rank::Standard, DriverClass::ClassIII, "Rossi", "Marco");
        let i = member(2, Rank::Standard, DriverClass::ClassI, "Alberti", "Aldo");
        assert!(iii.sort_key() < i.sort_key());
    }

    #[test]
    fn test_sort_key_name_case_normalized() {
        let lower = member(1, Rank::Standard, DriverClass::None, "rossi", "marco");
        let upper = member(2, Rank::Standard, DriverClass::None, "ROSSI", "MARCO");
        let (_, _, fam_a, giv_a) = lower.sort_key();
        let (_, _, fam_b, giv_b) = upper.sort_key();
        assert_eq!(fam_a, fam_b);
        assert_eq!(giv_a, giv_b);
    }

    #[test]
    fn test_sort_key_family_then_given() {
        let a = member(1, Rank::Standard, DriverClass::None, "Rossi", "Anna");
        let b = member(2, Rank::Standard, DriverClass::None, "Rossi", "Bruno");
        let c = member(3, Rank::Standard, DriverClass::None, "Sala", "Anna");
        assert!(a.sort_key() < b.sort_key());
        assert!(b.sort_key() < c.sort_key());
    }

    #[test]
    fn test_display_names() {
        let m = member(1, Rank::Senior, DriverClass::ClassII, "Rossi", "Marco");
        assert_eq!(m.full_name(), "Rossi Marco");
        assert_eq!(m.display_name(), "Rossi, Marco");
        assert_eq!(m.rank.to_string(), "senior");
        assert_eq!(m.driver_class.to_string(), "II");
    }
}
