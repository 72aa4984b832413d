use crate::appraisal::YearRecord;

/// First point where cumulative discounted ENPV turns non-negative, linearly
/// interpolated between the two bracketing years.
pub fn payback_period(records: &[YearRecord]) -> Option<f64> {
    let first = records.first()?;
    if first.cumulative_enpv >= 0.0 {
        return Some(f64::from(first.year));
    }
    records.windows(2).find_map(|pair| {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.cumulative_enpv < 0.0 && next.cumulative_enpv >= 0.0 {
            let span = next.cumulative_enpv - prev.cumulative_enpv;
            let fraction = -prev.cumulative_enpv / span;
            Some(f64::from(prev.year) + fraction * f64::from(next.year - prev.year))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::fixtures::flat_input;
    use crate::appraisal::schedule::build_schedule;

    #[test]
    fn interpolates_between_bracketing_years() {
        let records = build_schedule(1_000.0, &flat_input());
        let payback = payback_period(&records).expect("pays back");
        // Cumulative is about -3.05 after year 8 and +6.62 after year 9.
        assert!(payback > 8.0 && payback < 9.0);
        assert!((payback - 8.3156).abs() < 1e-3);
    }

    #[test]
    fn undiscounted_flows_pay_back_sooner() {
        let mut input = flat_input();
        input.discount_rate = 0.0;
        let payback = payback_period(&build_schedule(1_000.0, &input)).expect("pays back");
        assert!((payback - 100.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn never_paying_back_is_none() {
        let mut input = flat_input();
        input.benefits.vehicle_fleet = 0.0;
        input.benefits.transport_cost = 0.0;
        assert_eq!(payback_period(&build_schedule(1_000.0, &input)), None);
        assert_eq!(payback_period(&[]), None);
    }
}
