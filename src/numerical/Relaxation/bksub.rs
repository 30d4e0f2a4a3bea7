use ndarray::Array3;

/// Back-substitution over the mesh.
///
/// Sweeps mesh slots from `k2 - 1` down to `k1`, resolving the residual column `jf = ne - nb` of
/// `c` with the already resolved values of the next slot. At `k1` only the rows reduced by the
/// first boundary block (`ne - nb..ne`) take part. Afterwards the corrections are relabeled so that
/// `c[i, 0, k]`, `k1 <= k < k2`, holds the correction of the variable sitting in column `i` at mesh
/// point `k`.
pub fn bksub(c: &mut Array3<f64>, ne: usize, nb: usize, k1: usize, k2: usize) {
    let nbf = ne - nb;
    let jf = nbf;
    let mut im = 0;
    for k in (k1..k2).rev() {
        if k == k1 {
            im = nbf;
        }
        let kp = k + 1;
        for j in 0..nbf {
            let xx = c[[j, jf, kp]];
            for i in im..ne {
                c[[i, jf, k]] -= c[[i, j, k]] * xx;
            }
        }
    }
    for k in k1..k2 {
        // conditions at the first point were solved for the first nb columns
        for i in 0..nb {
            c[[i, 0, k]] = c[[nbf + i, jf, k]];
        }
        // the rest comes from the following slot, shifted by one mesh point
        for i in 0..nbf {
            c[[nb + i, 0, k]] = c[[i, jf, k + 1]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// ne = 2, nb = 1, three mesh points, c has 2 columns and 4 slots
    fn three_point_tensor() -> Array3<f64> {
        let mut c = Array3::<f64>::zeros((2, 2, 4));
        // sentinel slot written by the last boundary block
        c[[0, 1, 3]] = 2.0;
        // slot 2
        c[[0, 0, 2]] = 0.5;
        c[[1, 0, 2]] = 1.0;
        c[[0, 1, 2]] = 2.0;
        c[[1, 1, 2]] = 3.0;
        // slot 1
        c[[0, 0, 1]] = 2.0;
        c[[1, 0, 1]] = -1.0;
        c[[0, 1, 1]] = 4.0;
        c[[1, 1, 1]] = 0.0;
        // slot 0, row 0 is never read at the first point
        c[[0, 0, 0]] = 7.0;
        c[[0, 1, 0]] = 9.0;
        c[[1, 0, 0]] = 3.0;
        c[[1, 1, 0]] = 5.0;
        c
    }

    #[test]
    fn test_bksub_three_points_by_hand() {
        let mut c = three_point_tensor();
        bksub(&mut c, 2, 1, 0, 3);
        // k = 2: c[0,1,2] = 2 - 0.5*2 = 1,  c[1,1,2] = 3 - 1*2 = 1
        // k = 1: c[0,1,1] = 4 - 2*1 = 2,    c[1,1,1] = 0 - (-1)*1 = 1
        // k = 0: c[1,1,0] = 5 - 3*2 = -1
        // relabel: c[0,0,k] = c[1,1,k], c[1,0,k] = c[0,1,k+1]
        let expected_first = [-1.0, 1.0, 1.0];
        let expected_second = [2.0, 1.0, 2.0];
        for k in 0..3 {
            assert_relative_eq!(c[[0, 0, k]], expected_first[k], epsilon = 1e-14);
            assert_relative_eq!(c[[1, 0, k]], expected_second[k], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_bksub_all_conditions_at_first_point_is_relabel_only() {
        // ne = nb: nothing propagates backwards, corrections are the stored residuals
        let mut c = Array3::<f64>::zeros((2, 1, 4));
        for k in 0..4 {
            c[[0, 0, k]] = k as f64;
            c[[1, 0, k]] = 10.0 * k as f64;
        }
        let before = c.clone();
        bksub(&mut c, 2, 2, 0, 3);
        assert_eq!(c, before);
    }
}
