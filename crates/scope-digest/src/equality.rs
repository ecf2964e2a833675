//! Value comparison used by the change detector.

use std::rc::Rc;

use crate::value::Value;

/// Compare a freshly computed value with a watcher's last value.
///
/// `deep` selects structural comparison; otherwise lists and objects are
/// compared by identity.
pub fn are_equal(new_value: &Value, old_value: &Value, deep: bool) -> bool {
    if deep {
        deep_equal(new_value, old_value)
    } else {
        identical(new_value, old_value)
    }
}

/// Identity comparison. Two NaN floats count as identical, otherwise a
/// watch on NaN would be dirty on every pass.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) if x.is_nan() && y.is_nan() => true,
        (Value::List(x), Value::List(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        _ => scalar_equal(a, b),
    }
}

/// Structural comparison over nested lists and objects.
///
/// NaN equals NaN at any depth, so an unchanged structure holding NaN
/// compares equal to its own deep copy.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) if x.is_nan() && y.is_nan() => true,
        (Value::List(x), Value::List(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && deep_equal(va, vb))
        }
        _ => scalar_equal(a, b),
    }
}

fn scalar_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        // Int and Float share one numeric domain
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
            int_equals_float(*i, *f)
        }
        _ => false,
    }
}

/// Exact comparison: only an integral float inside the i64 range can
/// equal an Int, and then only its exact value.
fn int_equals_float(i: i64, f: f64) -> bool {
    // 2^63; i64::MAX itself is not representable as f64
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) && f as i64 == i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_identical_to_nan() {
        assert!(are_equal(&Value::nan(), &Value::nan(), false));
        assert!(!are_equal(&Value::nan(), &Value::float(1.0), false));
    }

    #[test]
    fn test_nan_is_deep_equal_to_nan() {
        assert!(are_equal(&Value::nan(), &Value::nan(), true));
        assert!(!are_equal(&Value::nan(), &Value::float(0.0), true));

        let point = Value::object([("x", Value::nan()), ("y", Value::int(1))]);
        assert!(deep_equal(&point, &point.deep_clone()));
    }

    #[test]
    fn test_numbers_share_a_domain() {
        assert!(identical(&Value::int(1), &Value::float(1.0)));
        assert!(!identical(&Value::int(1), &Value::string("1")));
        assert!(identical(&Value::float(-3.0), &Value::int(-3)));
        assert!(!identical(&Value::int(1), &Value::float(1.5)));
    }

    #[test]
    fn test_large_ints_compare_exactly() {
        // 2^53 + 1 rounds to 2^53 as f64
        let big = Value::int(9_007_199_254_740_993);
        assert!(!identical(&big, &Value::float(9_007_199_254_740_992.0)));
        assert!(identical(&Value::int(1 << 53), &Value::float(9_007_199_254_740_992.0)));
        assert!(identical(&Value::int(i64::MIN), &Value::float(-9_223_372_036_854_775_808.0)));
        assert!(!identical(&Value::int(i64::MAX), &Value::float(9_223_372_036_854_775_808.0)));
        assert!(!identical(&Value::int(0), &Value::float(f64::INFINITY)));
    }

    #[test]
    fn test_undefined_is_not_null() {
        assert!(!identical(&Value::Undefined, &Value::Null));
        assert!(identical(&Value::Undefined, &Value::Undefined));
    }

    #[test]
    fn test_reference_mode_ignores_contents() {
        let a = Value::list([Value::int(1), Value::int(2)]);
        let b = Value::list([Value::int(1), Value::int(2)]);
        assert!(!are_equal(&a, &b, false));
        assert!(are_equal(&a, &a.clone(), false));
    }

    #[test]
    fn test_value_mode_compares_structure() {
        let a = Value::object([
            ("xs", Value::list([Value::int(1), Value::int(2)])),
            ("name", Value::string("Jane")),
        ]);
        let b = a.deep_clone();
        assert!(are_equal(&a, &b, true));

        b.get("xs").push(Value::int(3));
        assert!(!are_equal(&a, &b, true));
    }

    #[test]
    fn test_value_mode_checks_keys() {
        let a = Value::object([("a", Value::int(1))]);
        let b = Value::object([("b", Value::int(1))]);
        assert!(!deep_equal(&a, &b));
    }
}
