//! Client-side resource IDs for APIs that create via PUT

use uuid::Uuid;

/// Root namespace for every generated ID
pub const NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_9d3b_5e87_a210_c4f9_1b7d_03e6);

/// Generate a UUIDv5 by folding `names` into [`NAMESPACE`].
///
/// With no names a random v4 seeds the fold, so the result is random.
/// The same non-empty sequence always gives the same ID.
pub fn must<S: AsRef<str>>(names: &[S]) -> Uuid {
    let seed;
    let names: Vec<&str> = if names.is_empty() {
        seed = Uuid::new_v4().to_string();
        vec![seed.as_str()]
    } else {
        names.iter().map(AsRef::as_ref).collect()
    };

    names
        .into_iter()
        .fold(NAMESPACE, |ns, name| Uuid::new_v5(&ns, name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_names_same_id() {
        assert_eq!(must(&["de/fra", "cache"]), must(&["de/fra", "cache"]));
    }

    #[test]
    fn test_different_names_different_id() {
        assert_ne!(must(&["a"]), must(&["b"]));
        assert_ne!(must(&["a", "b"]), must(&["b", "a"]));
    }

    #[test]
    fn test_no_names_is_random() {
        let empty: [&str; 0] = [];
        assert_ne!(must(&empty), must(&empty));
    }

    #[test]
    fn test_generated_ids_are_v5() {
        assert_eq!(must(&["x"]).get_version_num(), 5);
    }
}
