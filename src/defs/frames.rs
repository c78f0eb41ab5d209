//! Frame-field expansion
//!
//! Normalizes the authored frame field: range strings become literal index
//! sequences and one array level is flattened so each animation frame is a
//! flat index list. Expansion is pure and idempotent; the registry caches
//! the result per definition so the hot path never re-parses.

use crate::core::error::{Result, SceneError};
use crate::defs::FrameField;

/// Expand a frame field into its normalized form.
///
/// Literal indices pass through unchanged. `"A-B"` becomes the inclusive
/// sequence from A to B, descending when A > B. Inside a list, a range
/// splices its indices inline; a nested list (one animation frame) is
/// flattened to literal indices.
pub fn expand(frames: &FrameField) -> Result<FrameField> {
    match frames {
        FrameField::Index(n) => Ok(FrameField::Index(*n)),
        FrameField::Range(s) => Ok(FrameField::List(
            parse_range(s)?.into_iter().map(FrameField::Index).collect(),
        )),
        FrameField::List(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    FrameField::Index(n) => out.push(FrameField::Index(*n)),
                    FrameField::Range(s) => {
                        out.extend(parse_range(s)?.into_iter().map(FrameField::Index));
                    }
                    FrameField::List(group) => {
                        out.push(FrameField::List(flatten_group(group)?));
                    }
                }
            }
            Ok(FrameField::List(out))
        }
    }
}

/// Flatten one animation-frame group to literal indices.
fn flatten_group(group: &[FrameField]) -> Result<Vec<FrameField>> {
    let mut out = Vec::with_capacity(group.len());
    for entry in group {
        match entry {
            FrameField::Index(n) => out.push(FrameField::Index(*n)),
            FrameField::Range(s) => {
                out.extend(parse_range(s)?.into_iter().map(FrameField::Index));
            }
            FrameField::List(nested) => out.extend(flatten_group(nested)?),
        }
    }
    Ok(out)
}

/// Parse an inclusive `"A-B"` range string. `A > B` yields a descending
/// sequence.
pub fn parse_range(s: &str) -> Result<Vec<u32>> {
    let malformed = || SceneError::MalformedRange(s.to_string());

    let (a, b) = s.split_once('-').ok_or_else(malformed)?;
    let a: u32 = a.trim().parse().map_err(|_| malformed())?;
    let b: u32 = b.trim().parse().map_err(|_| malformed())?;

    if a <= b {
        Ok((a..=b).collect())
    } else {
        Ok((b..=a).rev().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(v: &[u32]) -> FrameField {
        FrameField::List(v.iter().copied().map(FrameField::Index).collect())
    }

    #[test]
    fn test_range_ascending() {
        assert_eq!(parse_range("2-5").unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_range_descending() {
        assert_eq!(parse_range("5-2").unwrap(), vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_range_single_value() {
        assert_eq!(parse_range("3-3").unwrap(), vec![3]);
    }

    #[test]
    fn test_malformed_ranges_rejected() {
        assert!(parse_range("five-two").is_err());
        assert!(parse_range("5").is_err());
        assert!(parse_range("5-").is_err());
        assert!(parse_range("-5").is_err());
        assert!(parse_range("1-2-3").is_err());
    }

    #[test]
    fn test_literal_passes_through() {
        let field = FrameField::Index(7);
        assert_eq!(expand(&field).unwrap(), field);
    }

    #[test]
    fn test_range_string_expands() {
        let field = FrameField::Range("5-2".into());
        assert_eq!(expand(&field).unwrap(), indices(&[5, 4, 3, 2]));
    }

    #[test]
    fn test_range_splices_inline_in_list() {
        let field = FrameField::List(vec![
            FrameField::Index(0),
            FrameField::Range("2-4".into()),
            FrameField::Index(9),
        ]);
        assert_eq!(expand(&field).unwrap(), indices(&[0, 2, 3, 4, 9]));
    }

    #[test]
    fn test_animation_groups_flatten() {
        let field = FrameField::List(vec![
            FrameField::List(vec![FrameField::Range("0-1".into()), FrameField::Index(5)]),
            FrameField::List(vec![FrameField::Index(6), FrameField::Index(7)]),
        ]);
        let expanded = expand(&field).unwrap();
        assert_eq!(
            expanded,
            FrameField::List(vec![indices(&[0, 1, 5]), indices(&[6, 7])])
        );
    }

    #[test]
    fn test_expand_is_idempotent() {
        let fields = [
            FrameField::Index(3),
            FrameField::Range("7-4".into()),
            FrameField::List(vec![
                FrameField::Range("0-2".into()),
                FrameField::Index(10),
            ]),
            FrameField::List(vec![
                FrameField::List(vec![FrameField::Range("3-1".into())]),
                FrameField::List(vec![FrameField::Index(4)]),
            ]),
        ];

        for field in &fields {
            let once = expand(field).unwrap();
            let twice = expand(&once).unwrap();
            assert_eq!(once, twice, "expansion not idempotent for {:?}", field);
        }
    }

    #[test]
    fn test_malformed_range_inside_list_fails() {
        let field = FrameField::List(vec![FrameField::Range("bad".into())]);
        assert!(expand(&field).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_leaf() -> impl Strategy<Value = FrameField> {
            prop_oneof![
                (0u32..64).prop_map(FrameField::Index),
                (0u32..16, 0u32..16).prop_map(|(a, b)| FrameField::Range(format!("{}-{}", a, b))),
            ]
        }

        fn arb_field() -> impl Strategy<Value = FrameField> {
            prop_oneof![
                arb_leaf(),
                prop::collection::vec(arb_leaf(), 1..4).prop_map(FrameField::List),
                prop::collection::vec(
                    prop::collection::vec(arb_leaf(), 1..4).prop_map(FrameField::List),
                    1..4
                )
                .prop_map(FrameField::List),
            ]
        }

        proptest! {
            #[test]
            fn expand_idempotent(field in arb_field()) {
                let once = expand(&field).unwrap();
                let twice = expand(&once).unwrap();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn expand_pure(field in arb_field()) {
                prop_assert_eq!(expand(&field).unwrap(), expand(&field).unwrap());
            }
        }
    }
}
