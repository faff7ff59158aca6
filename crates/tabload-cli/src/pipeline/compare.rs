//! Type-aware attribute comparison
//!
//! Each declared type has its own [`ValueComparator`]. All of them compare the
//! canonical string forms of the two values:
//!
//! - `date`: only the date portion (anything before `T` or a space)
//! - `number`: when the local form ends in `.0`, integer-truncated values;
//!   otherwise exact
//! - everything else: exact

use tabload_common::types::{Attribute, AttributeValue, FieldType};

/// Equality rule for one declared type
pub trait ValueComparator: Send + Sync {
    fn matches(&self, local: &AttributeValue, remote: &AttributeValue) -> bool;
}

/// Exact string-form equality
pub struct ExactComparator;

/// Tolerates remote formatting that drops a trailing `.0`
pub struct NumberComparator;

/// Ignores any time-of-day component
pub struct DateComparator;

impl ValueComparator for ExactComparator {
    fn matches(&self, local: &AttributeValue, remote: &AttributeValue) -> bool {
        local.to_string() == remote.to_string()
    }
}

impl ValueComparator for NumberComparator {
    fn matches(&self, local: &AttributeValue, remote: &AttributeValue) -> bool {
        let local = local.to_string();
        let remote = remote.to_string();

        if !local.ends_with(".0") {
            return local == remote;
        }

        match (local.parse::<f64>(), remote.trim().parse::<f64>()) {
            (Ok(l), Ok(r)) => l.trunc() == r.trunc(),
            _ => false,
        }
    }
}

impl ValueComparator for DateComparator {
    fn matches(&self, local: &AttributeValue, remote: &AttributeValue) -> bool {
        date_portion(&local.to_string()) == date_portion(&remote.to_string())
    }
}

fn date_portion(value: &str) -> &str {
    value.split(['T', ' ']).next().unwrap_or(value)
}

/// Comparator for a declared type
pub fn comparator_for(field_type: FieldType) -> &'static dyn ValueComparator {
    match field_type {
        FieldType::Number => &NumberComparator,
        FieldType::Date => &DateComparator,
        FieldType::String | FieldType::Boolean | FieldType::Other => &ExactComparator,
    }
}

/// First difference found between a local and a remote attribute list
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMismatch {
    /// No remote attribute has this local attribute's name
    Missing { name: String },
    /// Remote returned an attribute the local record does not have
    Unexpected { name: String },
    TypeMismatch {
        name: String,
        expected: FieldType,
        actual: FieldType,
    },
    ValueMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

impl AttributeMismatch {
    pub fn attribute(&self) -> &str {
        match self {
            AttributeMismatch::Missing { name }
            | AttributeMismatch::Unexpected { name }
            | AttributeMismatch::TypeMismatch { name, .. }
            | AttributeMismatch::ValueMismatch { name, .. } => name,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AttributeMismatch::Missing { .. } => "missing from remote item".to_string(),
            AttributeMismatch::Unexpected { .. } => "not present in local record".to_string(),
            AttributeMismatch::TypeMismatch {
                expected, actual, ..
            } => format!("expected type {}, remote has {}", expected, actual),
            AttributeMismatch::ValueMismatch {
                expected, actual, ..
            } => format!("expected '{}', remote has '{}'", expected, actual),
        }
    }
}

/// Compare a local record's attributes with the remote store's copy
///
/// Every local attribute needs a remote attribute with the same name, the
/// same type and a matching value; every remote attribute needs a local
/// attribute of the same name.
pub fn compare_rows(local: &[Attribute], remote: &[Attribute]) -> Result<(), AttributeMismatch> {
    for attr in local {
        let candidates: Vec<&Attribute> = remote.iter().filter(|r| r.name == attr.name).collect();

        if candidates.is_empty() {
            return Err(AttributeMismatch::Missing {
                name: attr.name.clone(),
            });
        }

        let comparator = comparator_for(attr.attr_type);
        let same_type: Vec<&&Attribute> = candidates
            .iter()
            .filter(|r| r.attr_type == attr.attr_type)
            .collect();

        if same_type
            .iter()
            .any(|r| comparator.matches(&attr.value, &r.value))
        {
            continue;
        }

        return Err(match same_type.first() {
            Some(r) => AttributeMismatch::ValueMismatch {
                name: attr.name.clone(),
                expected: attr.value.to_string(),
                actual: r.value.to_string(),
            },
            None => AttributeMismatch::TypeMismatch {
                name: attr.name.clone(),
                expected: attr.attr_type,
                actual: candidates[0].attr_type,
            },
        });
    }

    if let Some(extra) = remote
        .iter()
        .find(|r| !local.iter().any(|l| l.name == r.name))
    {
        return Err(AttributeMismatch::Unexpected {
            name: extra.name.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn attr(name: &str, ty: FieldType, value: AttributeValue) -> Attribute {
        Attribute::new(name, ty, value)
    }

    #[test]
    fn test_number_trailing_zero_matches_truncated_remote() {
        let local = [attr("Units", FieldType::Number, AttributeValue::Float(5.0))];
        let remote = [attr("Units", FieldType::Number, AttributeValue::text("5"))];
        assert_eq!(compare_rows(&local, &remote), Ok(()));

        let remote_int = [attr("Units", FieldType::Number, AttributeValue::Integer(5))];
        assert_eq!(compare_rows(&local, &remote_int), Ok(()));
    }

    #[test]
    fn test_number_without_trailing_zero_is_exact() {
        let c = NumberComparator;
        assert!(c.matches(&AttributeValue::Float(2.5), &AttributeValue::text("2.5")));
        assert!(!c.matches(&AttributeValue::Float(2.5), &AttributeValue::text("2")));
        assert!(!c.matches(&AttributeValue::Float(5.0), &AttributeValue::text("6")));
        assert!(!c.matches(&AttributeValue::Float(5.0), &AttributeValue::text("five")));
        assert!(c.matches(&AttributeValue::empty(), &AttributeValue::Null));
    }

    #[test]
    fn test_date_ignores_time_of_day() {
        let local = [attr(
            "OrderDate",
            FieldType::Date,
            AttributeValue::text("2024-01-01T00:00:00"),
        )];
        let remote = [attr(
            "OrderDate",
            FieldType::Date,
            AttributeValue::text("2024-01-01T08:00:00"),
        )];
        assert_eq!(compare_rows(&local, &remote), Ok(()));

        let c = DateComparator;
        assert!(c.matches(
            &AttributeValue::text("2024-01-01T00:00:00"),
            &AttributeValue::text("2024-01-01 23:59:59")
        ));
        assert!(!c.matches(
            &AttributeValue::text("2024-01-01T00:00:00"),
            &AttributeValue::text("2024-01-02T00:00:00")
        ));
    }

    #[test]
    fn test_type_mismatch_on_same_name() {
        let local = [attr("Units", FieldType::Number, AttributeValue::Float(5.0))];
        let remote = [attr("Units", FieldType::String, AttributeValue::text("5.0"))];
        assert_eq!(
            compare_rows(&local, &remote),
            Err(AttributeMismatch::TypeMismatch {
                name: "Units".to_string(),
                expected: FieldType::Number,
                actual: FieldType::String,
            })
        );
    }

    #[test]
    fn test_string_is_exact() {
        let local = [attr("Month", FieldType::String, AttributeValue::text("01"))];
        let remote = [attr("Month", FieldType::String, AttributeValue::text("1"))];
        let mismatch = compare_rows(&local, &remote).unwrap_err();
        assert_eq!(mismatch.attribute(), "Month");
        assert_eq!(mismatch.detail(), "expected '01', remote has '1'");
    }

    #[test]
    fn test_missing_and_unexpected_attributes() {
        let local = [attr("A", FieldType::String, AttributeValue::text("x"))];
        let remote = [attr("B", FieldType::String, AttributeValue::text("x"))];
        assert_eq!(
            compare_rows(&local, &remote),
            Err(AttributeMismatch::Missing {
                name: "A".to_string()
            })
        );

        let remote = [
            attr("A", FieldType::String, AttributeValue::text("x")),
            attr("Extra", FieldType::String, AttributeValue::text("y")),
        ];
        assert_eq!(
            compare_rows(&local, &remote),
            Err(AttributeMismatch::Unexpected {
                name: "Extra".to_string()
            })
        );
    }

    #[test]
    fn test_empty_values_match() {
        let local = [attr("Product", FieldType::String, AttributeValue::empty())];
        let remote = [attr("Product", FieldType::String, AttributeValue::text(""))];
        assert_eq!(compare_rows(&local, &remote), Ok(()));
    }

    #[test]
    fn test_boolean_is_exact() {
        let c = comparator_for(FieldType::Boolean);
        assert!(c.matches(&AttributeValue::Boolean(true), &AttributeValue::Boolean(true)));
        assert!(c.matches(&AttributeValue::Boolean(false), &AttributeValue::text("false")));
        assert!(!c.matches(&AttributeValue::Boolean(true), &AttributeValue::Boolean(false)));
    }
}
