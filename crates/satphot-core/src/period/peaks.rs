/// Indices of local maxima.
///
/// A flat top counts once, at its middle sample (rounded down). The first
/// and last samples are never peaks.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }
    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Local maxima at least `height` high.
pub fn peaks_above(values: &[f64], height: f64) -> Vec<usize> {
    local_maxima(values)
        .into_iter()
        .filter(|&i| values[i] >= height)
        .collect()
}

/// The highest of `peaks`, if any.
pub fn highest(values: &[f64], peaks: &[usize]) -> Option<usize> {
    peaks
        .iter()
        .copied()
        .max_by(|&a, &b| values[a].total_cmp(&values[b]))
}
