//! Years → level resolution.

use crate::level::{LevelRange, LevelTable, NormalizedTable};

/// The active level whose closed interval contains `years`.
///
/// If several match (only possible in a table the validator would reject), the one
/// with the largest `min_years` wins, earliest inserted on exact ties.
pub fn resolve(years: f64, table: &LevelTable) -> Option<&LevelRange> {
    resolve_in(years, &table.normalized())
}

/// Same as [`resolve`] over an already normalized table
pub fn resolve_in<'a>(years: f64, table: &NormalizedTable<'a>) -> Option<&'a LevelRange> {
    let mut best: Option<&'a LevelRange> = None;
    for &range in table.entries() {
        if !range.contains(years) {
            continue;
        }
        match best {
            Some(current) if range.min_years <= current.min_years => {}
            _ => best = Some(range),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LevelTable {
        LevelTable::new(vec![
            LevelRange::new("Senior", 5.1, 10.0),
            LevelRange::new("Junior", 0.6, 2.0),
            LevelRange::new("Mid", 2.1, 5.0),
        ])
    }

    #[test]
    fn test_resolve_boundaries() {
        let table = sample();
        assert_eq!(resolve(5.1, &table).unwrap().label, "Senior");
        assert_eq!(resolve(10.0, &table).unwrap().label, "Senior");
        assert_eq!(resolve(5.09, &table).map(|r| r.label.as_str()), None);
        assert!(resolve(10.01, &table).is_none());
    }

    #[test]
    fn test_resolve_gap_and_empty() {
        let table = sample();
        // 2.05 sits between Junior (..2.0) and Mid (2.1..)
        assert!(resolve(2.05, &table).is_none());
        assert!(resolve(0.3, &table).is_none());
        assert!(resolve(1.0, &LevelTable::default()).is_none());
    }

    #[test]
    fn test_inactive_never_resolves() {
        let table = LevelTable::new(vec![LevelRange::new("Junior", 0.6, 2.0).inactive()]);
        assert!(resolve(1.0, &table).is_none());
    }

    #[test]
    fn test_overlap_prefers_highest_start() {
        let table = LevelTable::new(vec![
            LevelRange::new("Wide", 0.0, 10.0),
            LevelRange::new("Narrow", 4.0, 6.0),
        ]);
        assert_eq!(resolve(5.0, &table).unwrap().label, "Narrow");
        assert_eq!(resolve(7.0, &table).unwrap().label, "Wide");
    }

    #[test]
    fn test_equal_starts_keep_first_inserted() {
        let table = LevelTable::new(vec![
            LevelRange::new("First", 1.0, 3.0),
            LevelRange::new("Second", 1.0, 5.0),
        ]);
        assert_eq!(resolve(2.0, &table).unwrap().label, "First");
        assert_eq!(resolve(4.0, &table).unwrap().label, "Second");
    }
}
