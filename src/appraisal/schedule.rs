use crate::appraisal::{AppraisalInput, YearRecord};

/// Builds the year 0..=horizon cash-flow schedule.
///
/// Year 0 carries the whole capital outlay and no benefit. Later years earn
/// the flat annual benefit and pay the post-investment maintenance. Traffic is
/// projected for reporting only. Expects an input that passed validation.
pub fn build_schedule(base_traffic: f64, input: &AppraisalInput) -> Vec<YearRecord> {
    let annual_benefit = input.benefits.total();
    let mut records = Vec::with_capacity(input.horizon_years as usize + 1);
    let mut cumulative = 0.0;

    for year in 0..=input.horizon_years {
        let (capital_outlay, maintenance_outlay, benefit) = if year == 0 {
            (input.investment_cost, 0.0, 0.0)
        } else {
            (0.0, input.maintenance_cost_after, annual_benefit)
        };
        let net_effect = benefit - capital_outlay - maintenance_outlay;
        let discount_factor = discount_factor(input.discount_rate, year);
        let discounted_value = net_effect * discount_factor;
        cumulative += discounted_value;

        records.push(YearRecord {
            year,
            calendar_year: input.start_year + year as i32,
            traffic: base_traffic * (1.0 + input.traffic_growth_rate).powi(year as i32),
            capital_outlay,
            maintenance_outlay,
            benefit,
            net_effect,
            discount_factor,
            discounted_value,
            cumulative_enpv: cumulative,
        });
    }
    records
}

pub fn discount_factor(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(-(year as i32))
}

/// Net present value of a yearly flow series at `rate`, year 0 undiscounted.
pub fn npv_at(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(year, flow)| flow * discount_factor(rate, year as u32))
        .sum()
}
