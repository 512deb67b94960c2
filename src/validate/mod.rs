//! Index-range validation.
//!
//! Every index-into attribute must hold either the no-relation sentinel `-1`
//! or a value in `0..=max`, where `max` is the last valid element of its
//! target. [`ValidationMode`] selects whether the first violation aborts or
//! all of them are collected.

use std::fmt;

use crate::geometry::{index_relation, GeometryAttributes};
use crate::relation::NO_RELATION;
use crate::util::{Error, Result};

/// What to do on the first out-of-range value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Return the first violation as [`Error::IndexOutOfRange`].
    #[default]
    FailFast,
    /// Keep going and return every violation.
    Collect,
}

/// One out-of-range index value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexViolation {
    /// Descriptor string of the offending attribute.
    pub name: String,
    /// Element position within the attribute.
    pub position: usize,
    pub value: i64,
    /// Largest valid value at the time of the check.
    pub max: i64,
}

impl fmt::Display for IndexViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] = {} is out of range (max index {})",
            self.name, self.position, self.value, self.max
        )
    }
}

impl From<IndexViolation> for Error {
    fn from(v: IndexViolation) -> Self {
        Error::IndexOutOfRange {
            name: v.name,
            position: v.position,
            value: v.value,
            max: v.max,
        }
    }
}

/// Check one relation's values against `max`.
///
/// In [`ValidationMode::Collect`] violations are pushed onto `out` and the
/// call always succeeds.
pub fn check_relation(
    name: &str,
    values: &[i64],
    max: i64,
    mode: ValidationMode,
    out: &mut Vec<IndexViolation>,
) -> Result<()> {
    for (position, &value) in values.iter().enumerate() {
        if value == NO_RELATION || (0..=max).contains(&value) {
            continue;
        }
        let violation = IndexViolation { name: name.to_string(), position, value, max };
        match mode {
            ValidationMode::FailFast => return Err(violation.into()),
            ValidationMode::Collect => out.push(violation),
        }
    }
    Ok(())
}

/// Validate every inferred relation of an open collection.
///
/// Offset tables may point one past the end of their target so that empty
/// trailing sub-geometries stay valid.
pub fn validate_geometry(
    geometry: &GeometryAttributes,
    mode: ValidationMode,
) -> Result<Vec<IndexViolation>> {
    let counts = geometry.counts();
    let mut violations = Vec::new();
    for attr in geometry.attributes() {
        let Some(rel) = index_relation(attr.descriptor()) else {
            continue;
        };
        let max = rel.max_index(counts.get(rel.target));
        check_relation(&attr.name(), &attr.to_integers()?, max, mode, &mut violations)?;
    }
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::descriptor::common;
    use crate::util::{Mat4, Vec3};

    fn geometry(indices: &[i32], parents: &[i32]) -> GeometryAttributes {
        GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 3]).unwrap(),
            Attribute::from_data(common::index(), indices).unwrap(),
            Attribute::from_data(common::instance_transform(), &vec![Mat4::IDENTITY; parents.len()])
                .unwrap(),
            Attribute::from_data(common::instance_parent(), parents).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_geometry() {
        let g = geometry(&[0, 1, 2], &[-1, 0]);
        assert!(validate_geometry(&g, ValidationMode::FailFast).unwrap().is_empty());
    }

    #[test]
    fn test_fail_fast_reports_first() {
        let g = geometry(&[0, 3, 2, 7, 1, 2], &[-1]);
        let err = validate_geometry(&g, ValidationMode::FailFast).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { position: 1, value: 3, max: 2, .. }));
    }

    #[test]
    fn test_collect_reports_all() {
        let g = geometry(&[0, 3, 2, 7, 1, -2], &[-1, 5]);
        let v = validate_geometry(&g, ValidationMode::Collect).unwrap();
        let found: Vec<(usize, i64)> = v.iter().map(|v| (v.position, v.value)).collect();
        assert_eq!(found, vec![(1, 3), (3, 7), (5, -2), (1, 5)]);
        assert_eq!(v[3].name, common::instance_parent().to_string());
        assert_eq!(v[3].max, 1);
    }

    #[test]
    fn test_check_relation_sentinel() {
        let mut out = Vec::new();
        check_relation("x", &[-1, 0, 4], 4, ValidationMode::FailFast, &mut out).unwrap();
        assert!(check_relation("x", &[5], 4, ValidationMode::FailFast, &mut out).is_err());
        check_relation("x", &[5, -1, -3], 4, ValidationMode::Collect, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].to_string().contains("x[0] = 5"));
    }

    #[test]
    fn test_offset_table_end_is_valid() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 3]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2]).unwrap(),
            Attribute::from_data(common::subgeometry_index_offset(), &[0i32, 3]).unwrap(),
            Attribute::from_data(common::subgeometry_vertex_offset(), &[0i32, 3]).unwrap(),
        ])
        .unwrap();
        assert!(validate_geometry(&g, ValidationMode::FailFast).unwrap().is_empty());
    }

    #[test]
    fn test_group_offsets_accept_end_like_construction() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 3]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2]).unwrap(),
            Attribute::from_data(common::group_index_offset(), &[0i32, 3]).unwrap(),
        ])
        .unwrap();
        assert!(validate_geometry(&g, ValidationMode::FailFast).unwrap().is_empty());

        let past_end = g
            .add_attributes([Attribute::from_data(common::group_vertex_offset(), &[0i32, 4]).unwrap()])
            .unwrap();
        let v = validate_geometry(&past_end, ValidationMode::Collect).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!((v[0].value, v[0].max), (4, 3));
    }
}
