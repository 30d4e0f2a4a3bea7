use crate::numerical::Relaxation::block_partition::ReduceBlock;
use nalgebra::DMatrix;
use ndarray::Array3;

/// Column-reduce: eliminate `block.zeroed_cols` of `s` using the coefficients stored for mesh slot
/// `kc - 1`. Only `block.modified_cols` and the residual column of `s` are affected by the prior
/// results.
pub fn red(s: &mut DMatrix<f64>, c: &Array3<f64>, block: &ReduceBlock, kc: usize) {
    let kprev = kc - 1;
    for (ic, j) in (block.c_row..).zip(block.zeroed_cols.clone()) {
        for (lc, l) in (block.c_col..).zip(block.modified_cols.clone()) {
            let vx = c[[ic, lc, kprev]];
            for i in block.rows.clone() {
                s[(i, l)] -= s[(i, j)] * vx;
            }
        }
        let vx = c[[ic, block.c_residual_col, kprev]];
        for i in block.rows.clone() {
            s[(i, block.residual_col)] -= s[(i, j)] * vx;
        }
    }
}
