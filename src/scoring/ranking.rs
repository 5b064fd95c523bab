/// A ranked position: index into the input slice plus its competition rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedIndex {
    pub index: usize,
    pub rank: u32,
}

/// Competition ranks ("1224" ranking) for `totals`, in input order.
///
/// A total's rank is 1 plus the number of totals strictly greater than it by
/// more than `epsilon`, so vendors within `epsilon` of each other share a rank
/// and the next distinct total skips the tied positions.
pub fn competition_ranks(totals: &[f64], epsilon: f64) -> Vec<u32> {
    let mut descending = totals.to_vec();
    descending.sort_by(|a, b| b.total_cmp(a));

    totals
        .iter()
        .map(|total| {
            let greater = descending.partition_point(|other| *other > total + epsilon);
            greater as u32 + 1
        })
        .collect()
}

/// Presentation order: by rank, then by input position. Inputs are expected in
/// `Vendor.order`, so tied vendors keep their display order.
pub fn rank_order(totals: &[f64], epsilon: f64) -> Vec<RankedIndex> {
    let ranks = competition_ranks(totals, epsilon);
    let mut ranked: Vec<RankedIndex> = ranks
        .into_iter()
        .enumerate()
        .map(|(index, rank)| RankedIndex { index, rank })
        .collect();
    ranked.sort_by_key(|r| (r.rank, r.index));
    ranked
}
