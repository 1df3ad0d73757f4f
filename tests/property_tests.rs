//! Property tests for size units, column selection and location parsing.

use proptest::prelude::*;

use ionosctl::api::location;
use ionosctl::output::table::{col, select_columns, Column};
use ionosctl::util::units::{self, Unit};
use ionosctl::util::uuidgen;

const COLUMNS: &[Column] = &[
    col("Id", "id"),
    col("Name", "properties.name"),
    col("State", "metadata.state"),
];

fn unit() -> impl Strategy<Value = Unit> {
    prop::sample::select(Unit::ALL.to_vec())
}

proptest! {
    /// Converting to a smaller unit and back is lossless.
    #[test]
    fn convert_down_and_up_roundtrip(value in -1000i64..1000, a in unit(), b in unit()) {
        let (big, small) = if a >= b { (a, b) } else { (b, a) };
        let down = units::convert(value, big, small);
        prop_assert_eq!(units::convert(down, small, big), value);
    }

    /// Converting to a larger unit never grows the magnitude.
    #[test]
    fn convert_up_truncates(value in 0i64..i64::MAX / 2, a in unit(), b in unit()) {
        let (big, small) = if a >= b { (a, b) } else { (b, a) };
        prop_assert!(units::convert(value, small, big) <= value);
    }

    /// "<n><unit>" parses to the same number as converting directly.
    #[test]
    fn parsed_sizes_match_convert(value in 0i64..100_000, from in unit(), to in unit(), spaced in any::<bool>()) {
        let text = if spaced { format!("{} {}", value, from) } else { format!("{}{}", value, from) };
        prop_assert_eq!(units::from_string_ok(&text, to), (units::convert(value, from, to), true));
    }

    /// A bare number is already in the target unit.
    #[test]
    fn bare_number_is_target_unit(value in 0i64..1_000_000, to in unit()) {
        prop_assert_eq!(units::from_string_ok(&value.to_string(), to), (value, true));
    }

    /// Column selection never comes back empty and never repeats a column.
    #[test]
    fn selected_columns_are_unique_and_non_empty(requested in prop::collection::vec("[A-Za-z]{0,6}", 0..6)) {
        let selected = select_columns(COLUMNS, &["Id", "Name"], &requested);
        prop_assert!(!selected.is_empty());
        for (i, column) in selected.iter().enumerate() {
            prop_assert!(!selected[i + 1..].contains(column));
        }
    }

    /// Normalizing a normalized location changes nothing.
    #[test]
    fn location_normalize_is_idempotent(country in "[a-z]{2}", code in "[a-z]{2,4}", sep in prop::sample::select(vec!["/", "-", "_"])) {
        let first = location::normalize(&format!("{}{}{}", country.to_uppercase(), sep, code)).unwrap();
        let second = location::normalize(&first.to_string()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Generated IDs depend only on the names given.
    #[test]
    fn generated_ids_are_deterministic(names in prop::collection::vec("[a-z/]{1,12}", 1..4)) {
        prop_assert_eq!(uuidgen::must(&names), uuidgen::must(&names));
    }
}
