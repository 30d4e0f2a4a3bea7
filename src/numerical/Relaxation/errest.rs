use ndarray::Array3;

/// Sum of scaled absolute corrections over all variables and mesh points `k1..k2`.
/// `c[.., 0, ..]` must already hold the output of bksub; the caller normalizes by `ne * m`.
pub fn errest(c: &Array3<f64>, indexv: &[usize], scalv: &[f64], k1: usize, k2: usize) -> f64 {
    indexv
        .iter()
        .zip(scalv.iter())
        .map(|(&jv, &scale)| {
            let errj: f64 = (k1..k2).map(|k| c[[jv, 0, k]].abs()).sum();
            errj / scale
        })
        .sum()
}

/// Largest correction of one variable, scaled, and where it happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorstCorrection {
    pub ermax: f64,
    pub kmax: usize,
}

/// Per-variable worst scaled correction, used for iteration diagnostics
pub fn worst_corrections(
    c: &Array3<f64>,
    indexv: &[usize],
    scalv: &[f64],
    k1: usize,
    k2: usize,
) -> Vec<WorstCorrection> {
    indexv
        .iter()
        .zip(scalv.iter())
        .map(|(&jv, &scale)| {
            let mut vmax = 0.0;
            let mut km = k1;
            for k in k1..k2 {
                let vz = c[[jv, 0, k]].abs();
                if vz > vmax {
                    vmax = vz;
                    km = k;
                }
            }
            WorstCorrection {
                ermax: c[[jv, 0, km]] / scale,
                kmax: km,
            }
        })
        .collect()
}
