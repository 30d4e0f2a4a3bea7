/*
Row/column bookkeeping of the relaxation sweep. The linearization matrix s has ne rows and 2*ne+1
columns: block A (columns 0..ne) holds derivatives with respect to the variables at mesh point k-1,
block B (columns ne..2ne) with respect to the variables at mesh point k, the last column holds
residuals. Every stage of the sweep (first boundary, interior interval, last boundary) works on its
own rows and columns of s and writes into its own columns of the coefficient tensor c. All offsets
are derived once from ne and nb.
*/
use std::ops::Range;

/// Square sub-block of s diagonalized by pinvs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotBlock {
    /// rows of the sub-block (ie1..ie2)
    pub rows: Range<usize>,
    /// first column of the square part (je1); the block is rows.len() wide
    pub first_col: usize,
    /// last column of s taking part in the elimination (jsf, the residual column)
    pub last_col: usize,
    /// first column of c receiving the coefficients (jc1)
    pub c_col: usize,
}

impl PivotBlock {
    pub fn size(&self) -> usize {
        self.rows.len()
    }
    /// columns of the square part (je1..je2)
    pub fn pivot_cols(&self) -> Range<usize> {
        self.first_col..self.first_col + self.size()
    }
    /// columns copied into c after the elimination (je2..=jsf)
    pub fn coefficient_cols(&self) -> std::ops::RangeInclusive<usize> {
        self.first_col + self.size()..=self.last_col
    }
}

/// Part of s corrected by red with coefficients of the previous mesh point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceBlock {
    /// rows of s to modify (iz1..iz2)
    pub rows: Range<usize>,
    /// columns being zeroed out (jz1..jz2)
    pub zeroed_cols: Range<usize>,
    /// columns affected by the prior results (jm1..jm2)
    pub modified_cols: Range<usize>,
    /// residual column of s (jmf)
    pub residual_col: usize,
    /// first row of c matching zeroed_cols.start (ic1)
    pub c_row: usize,
    /// first column of c matching modified_cols.start (jc1)
    pub c_col: usize,
    /// residual column of c (jcf)
    pub c_residual_col: usize,
}

/// One stage of the forward sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepStage {
    /// rows the equation provider must fill
    pub rows: Range<usize>,
    pub reduce: Option<ReduceBlock>,
    pub pivot: PivotBlock,
}

/// Offsets of the three sweep stages, computed once per solve from ne and nb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPartition {
    pub ne: usize,
    pub nb: usize,
    pub first: SweepStage,
    pub interior: SweepStage,
    pub last: SweepStage,
}

impl BlockPartition {
    pub fn new(ne: usize, nb: usize) -> BlockPartition {
        assert!(nb <= ne, "nb = {} must not exceed ne = {}", nb, ne);
        let nbf = ne - nb;
        // residual column of s
        let jsf = 2 * ne;
        // c has columns 0..nbf for coefficients plus the residual column nbf
        let jcf = nbf;
        // the nb conditions at the first point sit in the last rows and are solved for
        // the first nb columns of block B
        let first = SweepStage {
            rows: nbf..ne,
            reduce: None,
            pivot: PivotBlock {
                rows: nbf..ne,
                first_col: ne,
                last_col: jsf,
                c_col: 0,
            },
        };
        // interior: columns 0..nb of block A are known from the previous point, the
        // remaining ne columns (nb..ne+nb) are diagonalized
        let interior = SweepStage {
            rows: 0..ne,
            reduce: Some(ReduceBlock {
                rows: 0..ne,
                zeroed_cols: 0..nb,
                modified_cols: nb..ne,
                residual_col: jsf,
                c_row: nbf,
                c_col: 0,
                c_residual_col: jcf,
            }),
            pivot: PivotBlock {
                rows: 0..ne,
                first_col: nb,
                last_col: jsf,
                c_col: 0,
            },
        };
        // last point: nbf conditions, the first nb columns of block B are reduced away,
        // the rest is diagonalized and only the residual column is stored
        let last = SweepStage {
            rows: 0..nbf,
            reduce: Some(ReduceBlock {
                rows: 0..nbf,
                zeroed_cols: ne..ne + nb,
                modified_cols: ne + nb..jsf,
                residual_col: jsf,
                c_row: nbf,
                c_col: 0,
                c_residual_col: jcf,
            }),
            pivot: PivotBlock {
                rows: 0..nbf,
                first_col: ne + nb,
                last_col: jsf,
                c_col: nbf,
            },
        };
        BlockPartition {
            ne,
            nb,
            first,
            interior,
            last,
        }
    }
    /// number of columns of s
    pub fn s_cols(&self) -> usize {
        2 * self.ne + 1
    }
    /// number of columns of c
    pub fn c_cols(&self) -> usize {
        self.ne - self.nb + 1
    }
    /// column of c holding right-hand sides and, after bksub, the corrections source
    pub fn c_residual_col(&self) -> usize {
        self.ne - self.nb
    }
}
