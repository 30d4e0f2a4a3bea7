/*
Pivot-reduce: Gauss-Jordan elimination of a square sub-block of the linearization matrix with
implicit (row-scaled) pivoting. Columns to the right of the sub-block are transformed along with it
and copied into the coefficient tensor c at the given mesh slot, rows ordered by the pivot column
each row was assigned. Row scales are computed once, before the elimination starts, as in the
classical algorithm.
*/
use crate::numerical::Relaxation::block_partition::PivotBlock;
use crate::numerical::Relaxation::relaxation_error::SingularPivot;
use nalgebra::DMatrix;
use ndarray::Array3;

/// Diagonalize `block` of `s` and store the recursion coefficients in `c[.., .., k]`.
/// `indxr` and `pscl` are scratch buffers at least `block.size()` long.
pub fn pinvs(
    s: &mut DMatrix<f64>,
    c: &mut Array3<f64>,
    block: &PivotBlock,
    k: usize,
    indxr: &mut [Option<usize>],
    pscl: &mut [f64],
) -> Result<(), SingularPivot> {
    let ie1 = block.rows.start;
    let iesize = block.size();
    let je1 = block.first_col;
    let je2 = je1 + iesize;
    let jsf = block.last_col;
    let indxr = &mut indxr[..iesize];
    let pscl = &mut pscl[..iesize];

    // implicit pivoting: remember the largest element of every row
    for (r, i) in block.rows.clone().enumerate() {
        let big = (je1..je2).fold(0.0_f64, |big, j| big.max(s[(i, j)].abs()));
        if big == 0.0 {
            return Err(SingularPivot {
                mesh_index: k,
                row: i,
            });
        }
        pscl[r] = 1.0 / big;
        indxr[r] = None;
    }

    for _ in 0..iesize {
        // find the pivot among rows not used yet
        let mut piv = 0.0;
        let mut pivot: Option<(usize, usize)> = None;
        for (r, i) in block.rows.clone().enumerate() {
            if indxr[r].is_some() {
                continue;
            }
            let mut big = 0.0;
            let mut jp = je1;
            for j in je1..je2 {
                if s[(i, j)].abs() > big {
                    jp = j;
                    big = s[(i, j)].abs();
                }
            }
            if big * pscl[r] > piv {
                pivot = Some((i, jp));
                piv = big * pscl[r];
            }
        }
        let (ipiv, jpiv) = match pivot {
            Some(p) => p,
            None => {
                // every remaining row has lost its non-zero entries during elimination
                let row = block
                    .rows
                    .clone()
                    .zip(indxr.iter())
                    .find(|(_, assigned)| assigned.is_none())
                    .map(|(i, _)| i)
                    .unwrap_or(ie1);
                return Err(SingularPivot { mesh_index: k, row });
            }
        };
        indxr[ipiv - ie1] = Some(jpiv);

        // normalize the pivot row
        let pivinv = 1.0 / s[(ipiv, jpiv)];
        for j in je1..=jsf {
            s[(ipiv, j)] *= pivinv;
        }
        s[(ipiv, jpiv)] = 1.0;

        // reduce the non-pivot rows
        for (r, i) in block.rows.clone().enumerate() {
            if indxr[r] == Some(jpiv) {
                continue;
            }
            let dum = s[(i, jpiv)];
            if dum != 0.0 {
                for j in je1..=jsf {
                    s[(i, j)] -= dum * s[(ipiv, j)];
                }
                s[(i, jpiv)] = 0.0;
            }
        }
    }

    // sort the rows by pivot column while storing them into c
    for (r, i) in block.rows.clone().enumerate() {
        if let Some(jpiv) = indxr[r] {
            let irow = jpiv - je1 + ie1;
            for j in block.coefficient_cols() {
                c[[irow, j - je2 + block.c_col, k]] = s[(i, j)];
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn full_block(n: usize, rhs_cols: usize) -> PivotBlock {
        PivotBlock {
            rows: 0..n,
            first_col: 0,
            last_col: n + rhs_cols - 1,
            c_col: 0,
        }
    }

    #[test]
    fn test_pinvs_solves_2x2_block() {
        // [1 2; 3 4] x = [5; 6]  =>  x = [-4; 4.5]
        let mut s = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 5.0, 3.0, 4.0, 6.0]);
        let mut c = Array3::<f64>::zeros((2, 1, 1));
        let mut indxr = vec![None; 2];
        let mut pscl = vec![0.0; 2];
        pinvs(&mut s, &mut c, &full_block(2, 1), 0, &mut indxr, &mut pscl).unwrap();
        assert_relative_eq!(c[[0, 0, 0]], -4.0, epsilon = 1e-12);
        assert_relative_eq!(c[[1, 0, 0]], 4.5, epsilon = 1e-12);
        // each row was reduced to a unit vector in the square part
        for i in 0..2 {
            let ones = (0..2).filter(|&j| s[(i, j)] == 1.0).count();
            let zeros = (0..2).filter(|&j| s[(i, j)] == 0.0).count();
            assert_eq!((ones, zeros), (1, 1));
        }
    }

    #[test]
    fn test_pinvs_rows_stored_by_pivot_column() {
        // rows come in swapped order: row 0 only touches column 1
        let mut s = DMatrix::from_row_slice(2, 4, &[0.0, 2.0, 4.0, 1.0, 5.0, 0.0, 10.0, 2.0]);
        let mut c = Array3::<f64>::zeros((2, 2, 3));
        let mut indxr = vec![None; 2];
        let mut pscl = vec![0.0; 2];
        pinvs(&mut s, &mut c, &full_block(2, 2), 2, &mut indxr, &mut pscl).unwrap();
        assert_eq!(indxr, vec![Some(1), Some(0)]);
        assert_relative_eq!(c[[0, 0, 2]], 2.0);
        assert_relative_eq!(c[[0, 1, 2]], 0.4);
        assert_relative_eq!(c[[1, 0, 2]], 2.0);
        assert_relative_eq!(c[[1, 1, 2]], 0.5);
        // other mesh slots untouched
        assert_eq!(c[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_pinvs_sub_block_with_offsets() {
        // 1 row at row 1, pivot column 2, coefficients written from c column 1
        let mut s = DMatrix::from_row_slice(
            2,
            5,
            &[9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 0.0, 4.0, 2.0, 8.0],
        );
        let block = PivotBlock {
            rows: 1..2,
            first_col: 2,
            last_col: 4,
            c_col: 0,
        };
        let mut c = Array3::<f64>::zeros((2, 2, 1));
        let mut indxr = vec![None; 2];
        let mut pscl = vec![0.0; 2];
        pinvs(&mut s, &mut c, &block, 0, &mut indxr, &mut pscl).unwrap();
        // row index in c = pivot column - first_col + first row = 1
        assert_relative_eq!(c[[1, 0, 0]], 0.5);
        assert_relative_eq!(c[[1, 1, 0]], 2.0);
        // the row outside of the block is left alone
        assert_eq!(s[(0, 0)], 9.0);
    }

    #[test]
    fn test_pinvs_zero_row_is_singular() {
        let mut s = DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 1.0, 3.0, 4.0, 6.0]);
        let mut c = Array3::<f64>::zeros((2, 1, 5));
        let mut indxr = vec![None; 2];
        let mut pscl = vec![0.0; 2];
        let err = pinvs(&mut s, &mut c, &full_block(2, 1), 4, &mut indxr, &mut pscl).unwrap_err();
        assert_eq!(err, SingularPivot { mesh_index: 4, row: 0 });
    }

    #[test]
    fn test_pinvs_dependent_rows_are_singular() {
        // second row is twice the first one, it vanishes after the first pivot
        let mut s = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 5.0, 2.0, 4.0, 6.0]);
        let mut c = Array3::<f64>::zeros((2, 1, 1));
        let mut indxr = vec![None; 2];
        let mut pscl = vec![0.0; 2];
        let err = pinvs(&mut s, &mut c, &full_block(2, 1), 0, &mut indxr, &mut pscl).unwrap_err();
        assert_eq!(err.mesh_index, 0);
        assert_eq!(err.row, 1);
    }

    #[test]
    fn test_pinvs_empty_block_is_noop() {
        let mut s = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
        let block = PivotBlock {
            rows: 0..0,
            first_col: 2,
            last_col: 2,
            c_col: 1,
        };
        let mut c = Array3::<f64>::zeros((1, 1, 1));
        let mut indxr = vec![None; 1];
        let mut pscl = vec![0.0; 1];
        pinvs(&mut s, &mut c, &block, 0, &mut indxr, &mut pscl).unwrap();
        assert_eq!(s, DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]));
    }
}
