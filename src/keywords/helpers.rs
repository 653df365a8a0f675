use num_cmp::NumCmp;
use serde_json::Number;
use std::cmp::Ordering;

#[derive(Clone, Copy)]
enum Num {
    U(u64),
    I(i64),
    F(f64),
}

fn classify(number: &Number) -> Num {
    if let Some(value) = number.as_u64() {
        Num::U(value)
    } else if let Some(value) = number.as_i64() {
        Num::I(value)
    } else {
        Num::F(number.as_f64().expect("Always representable"))
    }
}

/// Exact comparison of two JSON numbers regardless of their internal representation.
/// JSON numbers are never NaN, so the ordering always exists.
fn compare(left: &Number, right: &Number) -> Ordering {
    let ordering = match (classify(left), classify(right)) {
        (Num::U(l), Num::U(r)) => l.partial_cmp(&r),
        (Num::U(l), Num::I(r)) => NumCmp::num_cmp(l, r),
        (Num::U(l), Num::F(r)) => NumCmp::num_cmp(l, r),
        (Num::I(l), Num::U(r)) => NumCmp::num_cmp(l, r),
        (Num::I(l), Num::I(r)) => l.partial_cmp(&r),
        (Num::I(l), Num::F(r)) => NumCmp::num_cmp(l, r),
        (Num::F(l), Num::U(r)) => NumCmp::num_cmp(l, r),
        (Num::F(l), Num::I(r)) => NumCmp::num_cmp(l, r),
        (Num::F(l), Num::F(r)) => l.partial_cmp(&r),
    };
    ordering.expect("JSON numbers are always comparable")
}

#[inline]
pub(crate) fn num_lt(left: &Number, right: &Number) -> bool {
    compare(left, right) == Ordering::Less
}

#[inline]
pub(crate) fn num_le(left: &Number, right: &Number) -> bool {
    compare(left, right) != Ordering::Greater
}

#[inline]
pub(crate) fn num_gt(left: &Number, right: &Number) -> bool {
    compare(left, right) == Ordering::Greater
}

#[inline]
pub(crate) fn num_ge(left: &Number, right: &Number) -> bool {
    compare(left, right) != Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(value: serde_json::Value) -> Number {
        match value {
            serde_json::Value::Number(number) => number,
            _ => panic!("not a number"),
        }
    }

    #[test]
    fn mixed_representation_comparisons() {
        let int = number(json!(10));
        let float = number(json!(10.0));
        let negative = number(json!(-1));
        let big = number(json!(u64::MAX));
        assert!(num_le(&int, &float));
        assert!(num_ge(&int, &float));
        assert!(num_lt(&negative, &int));
        assert!(num_gt(&big, &int));
        assert!(!num_lt(&big, &negative));
    }
}
