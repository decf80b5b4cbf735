//! Flip / support / resistance extraction from an exposure curve

use crate::exposure::ExposureRow;

use super::ExposureLevels;

/// First strike whose value is optimal under `better`; ties keep the earlier strike
fn first_best<F>(rows: &[ExposureRow], value: F, better: fn(f64, f64) -> bool) -> Option<f64>
where
    F: Fn(&ExposureRow) -> f64,
{
    let mut best: Option<(f64, f64)> = None;
    for row in rows {
        let v = value(row);
        match best {
            Some((_, current)) if !better(v, current) => {}
            _ => best = Some((row.strike, v)),
        }
    }
    best.map(|(strike, _)| strike)
}

/// Strike where the running cumulative net exposure is closest to zero
///
/// Rows must be ascending by strike, as produced by the aggregator.
/// Returns `None` for an empty curve.
pub fn find_flip_strike(rows: &[ExposureRow]) -> Option<f64> {
    let mut cumulative = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for row in rows {
        cumulative += row.net_exposure;
        let distance = cumulative.abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((row.strike, distance)),
        }
    }

    best.map(|(strike, _)| strike)
}

/// Extract key levels from an exposure curve
///
/// # Arguments
/// * `rows` - Exposure rows, ascending by strike
/// * `spot` - Spot price; the flip falls back to it when `rows` is empty
pub fn extract_levels(rows: &[ExposureRow], spot: f64) -> ExposureLevels {
    let total_gex: f64 = rows.iter().map(|r| r.net_exposure).sum();
    let gex_above_spot: f64 = rows
        .iter()
        .filter(|r| r.strike > spot)
        .map(|r| r.net_exposure)
        .sum();
    let gex_below_spot: f64 = rows
        .iter()
        .filter(|r| !(r.strike > spot))
        .map(|r| r.net_exposure)
        .sum();

    ExposureLevels {
        flip_strike: find_flip_strike(rows).unwrap_or(spot),
        support_strike: first_best(rows, |r| r.net_exposure, |a, b| a > b),
        resistance_strike: first_best(rows, |r| r.net_exposure, |a, b| a < b),
        total_gex,
        gex_above_spot,
        gex_below_spot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::GammaRegime;

    fn row(strike: f64, net: f64) -> ExposureRow {
        // Split the net across sides so the additivity invariant holds
        let call = -net.abs();
        let put = net - call;
        ExposureRow {
            strike,
            call_open_interest: 0,
            put_open_interest: 0,
            call_gamma: 0.0,
            put_gamma: 0.0,
            call_exposure: call,
            put_exposure: put,
            net_exposure: net,
        }
    }

    #[test]
    fn test_levels_on_simple_curve() {
        let rows = vec![
            row(90.0, 50.0),
            row(95.0, 120.0),
            row(100.0, -30.0),
            row(105.0, -150.0),
            row(110.0, 20.0),
        ];
        let levels = extract_levels(&rows, 100.0);

        // Cumulative: 50, 170, 140, -10, 10 -> |-10| at 105 comes first
        assert_eq!(levels.flip_strike, 105.0);
        assert_eq!(levels.support_strike, Some(95.0));
        assert_eq!(levels.resistance_strike, Some(105.0));
        assert_eq!(levels.total_gex, 10.0);
        assert_eq!(levels.gex_above_spot, -130.0);
        assert_eq!(levels.gex_below_spot, 140.0);
        assert_eq!(levels.regime(), GammaRegime::Positive);
    }

    #[test]
    fn test_ties_take_first_occurrence() {
        let rows = vec![row(90.0, 10.0), row(95.0, -20.0), row(100.0, 10.0), row(105.0, -20.0)];
        let levels = extract_levels(&rows, 100.0);

        // Cumulative: 10, -10, 0, -20
        assert_eq!(levels.flip_strike, 100.0);
        assert_eq!(levels.support_strike, Some(90.0));
        assert_eq!(levels.resistance_strike, Some(95.0));

        // Equal |cumulative| at 90 and 95 -> 90
        let rows = vec![row(90.0, 10.0), row(95.0, -20.0), row(100.0, 40.0)];
        assert_eq!(find_flip_strike(&rows), Some(90.0));
    }

    #[test]
    fn test_empty_rows_fall_back_to_spot() {
        let levels = extract_levels(&[], 23500.0);
        assert_eq!(levels.flip_strike, 23500.0);
        assert_eq!(levels.support_strike, None);
        assert_eq!(levels.resistance_strike, None);
        assert_eq!(levels.total_gex, 0.0);
        assert_eq!(levels.gex_above_spot, 0.0);
        assert_eq!(levels.gex_below_spot, 0.0);
    }

    #[test]
    fn test_conservation() {
        let rows: Vec<ExposureRow> = (0..25)
            .map(|i| row(80.0 + 2.0 * i as f64, ((i * 37) % 11) as f64 - 5.3))
            .collect();
        let sum: f64 = rows.iter().map(|r| r.net_exposure).sum();

        for &spot in &[50.0, 80.0, 97.0, 100.0, 101.5, 200.0] {
            let levels = extract_levels(&rows, spot);
            assert!((levels.total_gex - sum).abs() < 1e-9);
            assert!((levels.gex_above_spot + levels.gex_below_spot - levels.total_gex).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strike_at_spot_counts_below() {
        let rows = vec![row(100.0, 7.0), row(105.0, 3.0)];
        let levels = extract_levels(&rows, 100.0);
        assert_eq!(levels.gex_below_spot, 7.0);
        assert_eq!(levels.gex_above_spot, 3.0);
    }
}
