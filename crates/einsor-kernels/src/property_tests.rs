//! Property-based tests for the kernel engine
//!
//! Checks the SIMD-chunked passes against scalar references and the plan
//! walkers against naive nested loops, across randomly generated operands.

#[cfg(test)]
mod tests {
    use crate::contraction::contraction;
    use crate::product::inner_product;
    use crate::reductions::{max, min, sum};
    use crate::simd::{vadd, vsum};
    use einsor_core::{RowMajor, Tensor, TensorMut};
    use einsor_planner::{contraction_parse, inner_product_parse};
    use proptest::prelude::*;

    // Lengths straddling the lane-chunk threshold for i64 (LANES = 4).
    fn len_strategy() -> impl Strategy<Value = usize> {
        prop_oneof![1usize..8, 8usize..40, Just(4), Just(8), Just(16)]
    }

    proptest! {
        #[test]
        fn prop_vsum_matches_scalar_fold(
            data in prop::collection::vec(-1000i64..1000, 1..200)
        ) {
            let scalar: i64 = data.iter().sum();
            prop_assert_eq!(vsum(&data), scalar);
        }

        #[test]
        fn prop_vadd_matches_scalar(len in len_strategy()) {
            let x: Vec<i64> = (0..len as i64).map(|v| v * 3 - 7).collect();
            let y: Vec<i64> = (0..len as i64).map(|v| v * v).collect();
            let mut dst = vec![0i64; len];
            vadd(&x, &y, &mut dst);
            for i in 0..len {
                prop_assert_eq!(dst[i], x[i] + y[i]);
            }
        }

        #[test]
        fn prop_reductions_match_iterators(
            data in prop::collection::vec(-500i32..500, 1..100)
        ) {
            let x = Tensor::<i32, 1, RowMajor>::new(&data, [data.len() as u32]).unwrap();
            prop_assert_eq!(sum(&x).unwrap(), data.iter().sum::<i32>());
            prop_assert_eq!(min(&x).unwrap(), *data.iter().min().unwrap());
            prop_assert_eq!(max(&x).unwrap(), *data.iter().max().unwrap());
        }

        #[test]
        fn prop_contraction_matches_naive_row_sums(
            rows in 1u32..6,
            cols in 1u32..6,
        ) {
            let total = (rows * cols) as i64;
            let data: Vec<i64> = (0..total).map(|v| v * v - 3).collect();
            let x = Tensor::<i64, 2, RowMajor>::new(&data, [rows, cols]).unwrap();

            let mut out = vec![0i64; rows as usize];
            let mut z = TensorMut::<i64, 1, RowMajor>::new(&mut out, [rows]).unwrap();
            contraction(&contraction_parse("ij->i"), &x, &mut z).unwrap();

            for r in 0..rows {
                let naive: i64 = (0..cols).map(|c| x.get_value(&[r, c])).sum();
                prop_assert_eq!(z.get_value(&[r]), naive);
            }
        }

        #[test]
        fn prop_inner_product_matches_naive_matmul(
            m in 1u32..5,
            k in 1u32..5,
            n in 1u32..5,
        ) {
            let a: Vec<i64> = (0..(m * k) as i64).map(|v| v - 3).collect();
            let b: Vec<i64> = (0..(k * n) as i64).map(|v| 2 * v + 1).collect();
            let x = Tensor::<i64, 2, RowMajor>::new(&a, [m, k]).unwrap();
            let y = Tensor::<i64, 2, RowMajor>::new(&b, [k, n]).unwrap();

            let mut out = vec![0i64; (m * n) as usize];
            let mut z = TensorMut::<i64, 2, RowMajor>::new(&mut out, [m, n]).unwrap();
            inner_product(&inner_product_parse("ij,jk->ik"), &x, &y, &mut z).unwrap();

            for i in 0..m {
                for j in 0..n {
                    let naive: i64 =
                        (0..k).map(|t| x.get_value(&[i, t]) * y.get_value(&[t, j])).sum();
                    prop_assert_eq!(z.get_value(&[i, j]), naive);
                }
            }
        }

        #[test]
        fn prop_contraction_is_layout_blind_sum(
            rows in 1u32..5,
            cols in 1u32..5,
        ) {
            // Summing everything out must equal the flat reduction.
            let total = (rows * cols) as i64;
            let data: Vec<i64> = (0..total).map(|v| 7 - v).collect();
            let x = Tensor::<i64, 2, RowMajor>::new(&data, [rows, cols]).unwrap();

            let mut out = vec![0i64; rows as usize];
            let mut z = TensorMut::<i64, 1, RowMajor>::new(&mut out, [rows]).unwrap();
            contraction(&contraction_parse("ij->i"), &x, &mut z).unwrap();

            let folded: i64 = (0..rows).map(|r| z.get_value(&[r])).sum();
            prop_assert_eq!(folded, data.iter().sum::<i64>());
        }
    }
}
