use tracing::debug;

use crate::appraisal::schedule::npv_at;
use crate::appraisal::IrrSettings;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolution {
    pub rate: f64,
    pub iterations: u32,
}

const MAX_BRACKET_STEPS: u32 = 64;

/// Finds the rate where the NPV of `flows` is zero by bisection over the
/// configured bracket.
///
/// Long horizons overflow the NPV near the lower bound, so a non-finite end is
/// first pulled toward the other end until the NPV there is finite. Errors with
/// [`EngineError::IrrBracketOverflow`] when that fails, with
/// [`EngineError::IrrNoSignChange`] when NPV has the same sign at both ends,
/// and with [`EngineError::NonConvergentIrr`] when the iteration budget runs out.
pub fn solve_irr(flows: &[f64], settings: &IrrSettings) -> Result<IrrSolution, EngineError> {
    let mut lo = settings.lower_bound;
    let mut hi = settings.upper_bound;
    let mut f_lo = npv_at(flows, lo);
    let mut f_hi = npv_at(flows, hi);

    let mut steps = 0;
    while !f_lo.is_finite() && lo < hi && steps < MAX_BRACKET_STEPS {
        // Doubling the distance to -1 halves every discount base.
        lo = (2.0 * (1.0 + lo) - 1.0).min(hi);
        f_lo = npv_at(flows, lo);
        steps += 1;
    }
    while !f_hi.is_finite() && lo < hi && steps < MAX_BRACKET_STEPS {
        hi = 0.5 * (lo + hi);
        f_hi = npv_at(flows, hi);
        steps += 1;
    }
    if steps > 0 {
        debug!(lower = lo, upper = hi, steps, "EIRR bracket narrowed to finite NPV");
    }
    if !f_lo.is_finite() || !f_hi.is_finite() || lo >= hi {
        return Err(EngineError::IrrBracketOverflow {
            lower: lo,
            upper: hi,
        });
    }
    if f_lo == 0.0 {
        return Ok(IrrSolution { rate: lo, iterations: 0 });
    }
    if f_hi == 0.0 {
        return Ok(IrrSolution { rate: hi, iterations: 0 });
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(EngineError::IrrNoSignChange);
    }

    for iteration in 1..=settings.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv_at(flows, mid);
        let half_width = 0.5 * (hi - lo);
        if f_mid == 0.0 || half_width <= settings.tolerance * mid.abs().max(1.0) {
            debug!(rate = mid, iterations = iteration, "EIRR converged");
            return Ok(IrrSolution {
                rate: mid,
                iterations: iteration,
            });
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(EngineError::NonConvergentIrr {
        iterations: settings.max_iterations,
        last_estimate: 0.5 * (lo + hi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_flows(investment: f64, annual: f64, years: usize) -> Vec<f64> {
        let mut flows = vec![-investment];
        flows.extend(std::iter::repeat(annual).take(years));
        flows
    }

    #[test]
    fn finds_rate_of_a_simple_project() {
        // -100 now, +110 next year: exactly 10 %.
        let solution = solve_irr(&[-100.0, 110.0], &IrrSettings::default()).expect("irr");
        assert!((solution.rate - 0.10).abs() < 1e-5);
        assert!(solution.iterations <= 100);
    }

    #[test]
    fn root_zeroes_the_npv() {
        let flows = flat_flows(100.0, 15.0, 15);
        let solution = solve_irr(&flows, &IrrSettings::default()).expect("irr");
        assert!(solution.rate > 0.10 && solution.rate < 0.13);
        assert!(npv_at(&flows, solution.rate).abs() < 1e-3);
    }

    #[test]
    fn project_that_never_recoups_has_no_root() {
        let flows = flat_flows(100.0, -2.0, 10);
        assert_eq!(
            solve_irr(&flows, &IrrSettings::default()),
            Err(EngineError::IrrNoSignChange)
        );
    }

    #[test]
    fn loss_making_project_has_negative_rate() {
        let flows = flat_flows(100.0, 5.0, 10);
        let solution = solve_irr(&flows, &IrrSettings::default()).expect("irr");
        assert!(solution.rate > -0.12 && solution.rate < -0.10);
    }

    #[test]
    fn long_horizon_still_brackets_the_root() {
        // 100^200 overflows at the default lower bound.
        let flows = flat_flows(100.0, 15.0, 200);
        assert!(!npv_at(&flows, -0.99).is_finite());
        let solution = solve_irr(&flows, &IrrSettings::default()).expect("irr");
        assert!((solution.rate - 0.15).abs() < 1e-4, "rate {}", solution.rate);
    }

    #[test]
    fn bracket_that_overflows_everywhere_is_not_a_missing_sign_change() {
        let settings = IrrSettings {
            lower_bound: -0.999_999,
            upper_bound: -0.999_99,
            ..IrrSettings::default()
        };
        let flows = flat_flows(100.0, 15.0, 200);
        assert!(matches!(
            solve_irr(&flows, &settings),
            Err(EngineError::IrrBracketOverflow { .. })
        ));
    }

    #[test]
    fn exhausted_budget_is_reported_distinctly() {
        let settings = IrrSettings {
            max_iterations: 3,
            ..IrrSettings::default()
        };
        let flows = flat_flows(100.0, 15.0, 15);
        assert!(matches!(
            solve_irr(&flows, &settings),
            Err(EngineError::NonConvergentIrr { iterations: 3, .. })
        ));
    }
}
