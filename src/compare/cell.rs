//! Cell-level value equality

use crate::config::CompareOptions;
use crate::model::CellValue;

/// Compares two cell values under the configured tolerance and string rules
pub struct ValueComparator {
    abs_tol: f64,
    rel_tol: f64,
    ignore_spaces: bool,
    case_insensitive: bool,
}

impl ValueComparator {
    pub fn new(options: &CompareOptions) -> Self {
        Self {
            abs_tol: options.abs_tol,
            rel_tol: options.rel_tol,
            ignore_spaces: options.ignore_spaces,
            case_insensitive: options.case_insensitive,
        }
    }

    /// Two values are equal if both are missing, or both are present and
    /// equal under the configured rules. A float NaN counts as missing; a
    /// value missing on one side only is never equal.
    pub fn equal(&self, a: &CellValue, b: &CellValue) -> bool {
        match (a.is_null(), b.is_null()) {
            (true, true) => true,
            (true, false) | (false, true) => false,
            (false, false) => {
                if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                    // |v1 - v2| <= abs_tol + rel_tol * |v2|
                    return (x - y).abs() <= self.abs_tol + self.rel_tol * y.abs();
                }
                if let (CellValue::String(x), CellValue::String(y)) = (a, b) {
                    return self.strings_equal(x, y);
                }
                a == b
            }
        }
    }

    fn strings_equal(&self, a: &str, b: &str) -> bool {
        let a = if self.ignore_spaces { a.trim() } else { a };
        let b = if self.ignore_spaces { b.trim() } else { b };
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

impl Default for ValueComparator {
    fn default() -> Self {
        Self::new(&CompareOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_equality() {
        let cmp = ValueComparator::default();
        assert!(cmp.equal(&CellValue::Int(42), &CellValue::Int(42)));
        assert!(!cmp.equal(&CellValue::Int(42), &CellValue::Int(43)));
        assert!(cmp.equal(&CellValue::from("hello"), &CellValue::from("hello")));
        assert!(!cmp.equal(&CellValue::from("hello"), &CellValue::from("Hello")));
    }

    #[test]
    fn missing_values() {
        let cmp = ValueComparator::default();
        assert!(cmp.equal(&CellValue::Null, &CellValue::Null));
        assert!(!cmp.equal(&CellValue::Null, &CellValue::Int(0)));
        assert!(!cmp.equal(&CellValue::from(""), &CellValue::Null));
    }

    #[test]
    fn nan_counts_as_missing() {
        let cmp = ValueComparator::default();
        assert!(cmp.equal(&CellValue::Float(f64::NAN), &CellValue::Float(f64::NAN)));
        assert!(cmp.equal(&CellValue::Float(f64::NAN), &CellValue::Null));
        assert!(!cmp.equal(&CellValue::Float(f64::NAN), &CellValue::Float(1.0)));
    }

    #[test]
    fn absolute_tolerance() {
        let cmp = ValueComparator::new(&CompareOptions::new().with_abs_tol(0.01));
        assert!(cmp.equal(&CellValue::Float(1.0), &CellValue::Float(1.005)));
        assert!(!cmp.equal(&CellValue::Float(1.0), &CellValue::Float(1.02)));
        // cross-type int/float coercion
        assert!(cmp.equal(&CellValue::Int(1), &CellValue::Float(1.005)));
    }

    #[test]
    fn relative_tolerance_scales_with_rhs() {
        let cmp = ValueComparator::new(&CompareOptions::new().with_rel_tol(0.01));
        assert!(cmp.equal(&CellValue::Float(100.0), &CellValue::Float(100.9)));
        assert!(!cmp.equal(&CellValue::Float(100.0), &CellValue::Float(102.0)));
    }

    #[test]
    fn string_flags() {
        let cmp = ValueComparator::new(
            &CompareOptions::new()
                .with_ignore_spaces(true)
                .with_case_insensitive(true),
        );
        assert!(cmp.equal(&CellValue::from("  Foo "), &CellValue::from("foo")));
        assert!(!cmp.equal(&CellValue::from("foo"), &CellValue::from("bar")));
    }

    #[test]
    fn type_mismatch_is_unequal() {
        let cmp = ValueComparator::default();
        assert!(!cmp.equal(&CellValue::from("1"), &CellValue::Int(1)));
        assert!(!cmp.equal(&CellValue::Bool(true), &CellValue::Int(1)));
    }
}
