//! Scalar-or-sequence numeric values with broadcasting arithmetic.
//!
//! Every formula evaluates over [`Vector`]: a plain number or an ordered
//! sequence of numbers. Binary operations combine index-wise up to the longer
//! operand, broadcasting a scalar to every index. When both operands are
//! sequences of unequal length, reads past the shorter one saturate to its
//! last element, so the result is always defined.
//!
//! Reductions (`max`, `min`, `sum`) fold a sequence down to a scalar. On a
//! scalar they degenerate: `max`/`min` are the identity, `sum` is the scalar
//! itself.

// =============================================================================
// Vector
// =============================================================================

/// A scalar or an ordered sequence of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Scalar(f64),
    Seq(Vec<f64>),
}

impl Vector {
    /// Sequence length; 0 for a scalar.
    pub fn size(&self) -> usize {
        match self {
            Vector::Scalar(_) => 0,
            Vector::Seq(v) => v.len(),
        }
    }

    /// Element read with broadcast semantics: a scalar yields itself at every
    /// index; a sequence saturates to its last element past the end. An empty
    /// sequence has no element to saturate to and reads NaN.
    fn item(&self, i: usize) -> f64 {
        match self {
            Vector::Scalar(v) => *v,
            Vector::Seq(v) => v.get(i).or_else(|| v.last()).copied().unwrap_or(f64::NAN),
        }
    }

    /// The single value of a scalar or single-element sequence, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Vector::Scalar(v) => Some(*v),
            Vector::Seq(v) if v.len() == 1 => Some(v[0]),
            Vector::Seq(_) => None,
        }
    }

    /// Flatten to a plain `Vec`, splatting a scalar to a single element.
    pub fn into_seq(self) -> Vec<f64> {
        match self {
            Vector::Scalar(v) => vec![v],
            Vector::Seq(v) => v,
        }
    }

    fn broadcast(&self, rhs: &Vector, op: impl Fn(f64, f64) -> f64) -> Vector {
        let (ls, rs) = (self.size(), rhs.size());
        if ls == 0 && rs == 0 {
            return Vector::Scalar(op(self.item(0), rhs.item(0)));
        }
        let len = ls.max(rs);
        Vector::Seq((0..len).map(|i| op(self.item(i), rhs.item(i))).collect())
    }

    pub fn add(&self, rhs: &Vector) -> Vector {
        self.broadcast(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Vector) -> Vector {
        self.broadcast(rhs, |a, b| a - b)
    }

    pub fn mul(&self, rhs: &Vector) -> Vector {
        self.broadcast(rhs, |a, b| a * b)
    }

    pub fn div(&self, rhs: &Vector) -> Vector {
        self.broadcast(rhs, |a, b| a / b)
    }

    /// Largest element; identity on a scalar, NaN on an empty sequence.
    pub fn max(&self) -> Vector {
        match self {
            Vector::Scalar(v) => Vector::Scalar(*v),
            Vector::Seq(v) => {
                Vector::Scalar(v.iter().copied().fold(f64::NAN, |acc, x| {
                    if acc.is_nan() || x > acc { x } else { acc }
                }))
            }
        }
    }

    /// Smallest element; identity on a scalar, NaN on an empty sequence.
    pub fn min(&self) -> Vector {
        match self {
            Vector::Scalar(v) => Vector::Scalar(*v),
            Vector::Seq(v) => {
                Vector::Scalar(v.iter().copied().fold(f64::NAN, |acc, x| {
                    if acc.is_nan() || x < acc { x } else { acc }
                }))
            }
        }
    }

    /// Sum of all elements; a scalar sums to itself, an empty sequence to 0.
    pub fn sum(&self) -> Vector {
        match self {
            Vector::Scalar(v) => Vector::Scalar(*v),
            Vector::Seq(v) => Vector::Scalar(v.iter().sum()),
        }
    }
}

impl From<f64> for Vector {
    fn from(v: f64) -> Self {
        Vector::Scalar(v)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(v: Vec<f64>) -> Self {
        Vector::Seq(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_size() {
        assert_eq!(Vector::Scalar(3.0).size(), 0);
        assert_eq!(Vector::Seq(vec![]).size(), 0);
        assert_eq!(Vector::Seq(vec![1.0, 2.0]).size(), 2);
    }

    #[test]
    fn test_scalar_broadcast() {
        let seq = Vector::Seq(vec![1.0, 2.0, 3.0]);
        let s = Vector::Scalar(2.0);

        assert_eq!(seq.mul(&s), Vector::Seq(vec![2.0, 4.0, 6.0]));
        assert_eq!(s.mul(&seq), Vector::Seq(vec![2.0, 4.0, 6.0]));
        assert_eq!(seq.div(&s), Vector::Seq(vec![0.5, 1.0, 1.5]));
        assert_eq!(s.div(&seq), Vector::Seq(vec![2.0, 1.0, 2.0 / 3.0]));
    }

    #[test]
    fn test_scalar_scalar() {
        assert_eq!(Vector::Scalar(6.0).div(&Vector::Scalar(3.0)), Vector::Scalar(2.0));
        assert_eq!(Vector::Scalar(6.0).mul(&Vector::Scalar(3.0)), Vector::Scalar(18.0));
    }

    #[test]
    fn test_ragged_saturates_to_last() {
        let long = Vector::Seq(vec![10.0, 20.0, 30.0, 40.0]);
        let short = Vector::Seq(vec![1.0, 2.0]);

        // Indices past the shorter sequence keep reading its last element.
        assert_eq!(long.mul(&short), Vector::Seq(vec![10.0, 40.0, 60.0, 80.0]));
        assert_eq!(short.mul(&long), Vector::Seq(vec![10.0, 40.0, 60.0, 80.0]));
    }

    #[test]
    fn test_ragged_empty_reads_nan() {
        let seq = Vector::Seq(vec![1.0, 2.0]);
        let empty = Vector::Seq(vec![]);

        let out = seq.mul(&empty);
        assert_eq!(out.size(), 2);
        if let Vector::Seq(v) = out {
            assert!(v.iter().all(|x| x.is_nan()));
        } else {
            panic!("expected sequence");
        }
    }

    #[test]
    fn test_reductions() {
        let seq = Vector::Seq(vec![3.0, 9.0, 1.0]);
        assert_eq!(seq.max(), Vector::Scalar(9.0));
        assert_eq!(seq.min(), Vector::Scalar(1.0));
        assert_eq!(seq.sum(), Vector::Scalar(13.0));
    }

    #[test]
    fn test_reduction_degenerate_on_scalar() {
        let s = Vector::Scalar(7.0);
        assert_eq!(s.max(), Vector::Scalar(7.0));
        assert_eq!(s.min(), Vector::Scalar(7.0));
        assert_eq!(s.sum(), Vector::Scalar(7.0));
    }

    #[test]
    fn test_singleton_reductions() {
        let v = Vector::Seq(vec![5.0]);
        assert_eq!(v.max(), Vector::Scalar(5.0));
        assert_eq!(v.min(), Vector::Scalar(5.0));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(Vector::Seq(vec![]).sum(), Vector::Scalar(0.0));
    }

    #[test]
    fn test_empty_max_is_nan() {
        match Vector::Seq(vec![]).max() {
            Vector::Scalar(v) => assert!(v.is_nan()),
            _ => panic!("expected scalar"),
        }
    }

    #[test]
    fn test_as_scalar() {
        assert_eq!(Vector::Scalar(2.0).as_scalar(), Some(2.0));
        assert_eq!(Vector::Seq(vec![4.0]).as_scalar(), Some(4.0));
        assert_eq!(Vector::Seq(vec![1.0, 2.0]).as_scalar(), None);
    }

    fn equal_len_pairs() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (1usize..24).prop_flat_map(|n| {
            (
                prop::collection::vec(-1e6f64..1e6, n..=n),
                prop::collection::vec(1e-3f64..1e6, n..=n),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_mul_is_elementwise((a, b) in equal_len_pairs()) {
            let out = Vector::Seq(a.clone()).mul(&Vector::Seq(b.clone()));
            let Vector::Seq(out) = out else { panic!("expected sequence") };
            for i in 0..a.len() {
                prop_assert_eq!(out[i], a[i] * b[i]);
            }
        }

        #[test]
        fn prop_div_is_elementwise((a, b) in equal_len_pairs()) {
            let out = Vector::Seq(a.clone()).div(&Vector::Seq(b.clone()));
            let Vector::Seq(out) = out else { panic!("expected sequence") };
            for i in 0..a.len() {
                prop_assert_eq!(out[i], a[i] / b[i]);
            }
        }

        #[test]
        fn prop_scalar_broadcast_mul(a in prop::collection::vec(-1e6f64..1e6, 1..24), s in -1e3f64..1e3) {
            let out = Vector::Seq(a.clone()).mul(&Vector::Scalar(s));
            let Vector::Seq(out) = out else { panic!("expected sequence") };
            for i in 0..a.len() {
                prop_assert_eq!(out[i], a[i] * s);
            }
        }

        #[test]
        fn prop_sum_matches_fold(a in prop::collection::vec(-1e3f64..1e3, 0..24)) {
            let expected: f64 = a.iter().sum();
            prop_assert_eq!(Vector::Seq(a).sum(), Vector::Scalar(expected));
        }
    }
}
