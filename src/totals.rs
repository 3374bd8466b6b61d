//! Totals-market math: American odds to implied probability,
//! proportional devigging, per-quote implied totals, and the median
//! consensus across matching market events.

use std::cmp::Ordering;

use crate::odds_fetch::{OddsEvent, OddsMarket};
use crate::teams::{Team, TeamDirectory};

/// Converts probability skew into a run adjustment on top of the quoted
/// line. Empirically chosen damping, not a derived quantity.
pub const SKEW_DAMPING: f64 = 0.2;

const TOTALS_MARKET_KEY: &str = "totals";
const OVER_NAME: &str = "Over";
const UNDER_NAME: &str = "Under";

/// Implied win probability of a single American-odds price. `None` when
/// the price is missing from the quote or not a finite number.
pub fn american_to_prob(price: f64) -> Option<f64> {
    if !price.is_finite() {
        return None;
    }
    if price >= 0.0 {
        Some(100.0 / (price + 100.0))
    } else {
        Some(-price / (-price + 100.0))
    }
}

/// Removes the overround from a two-sided quote by scaling both raw
/// probabilities to sum to 1. A degenerate zero-sum pair devigs to the
/// neutral (0.5, 0.5) rather than dividing by zero.
pub fn devig_pair(over_raw: f64, under_raw: f64) -> (f64, f64) {
    let denom = over_raw + under_raw;
    if denom == 0.0 {
        return (0.5, 0.5);
    }
    let over = over_raw / denom;
    (over, 1.0 - over)
}

/// Estimated true total implied by one totals market. `None` when the
/// market is unusable: missing Over/Under outcome, mismatched line
/// points, or a price that fails probability conversion.
pub fn implied_total_from_market(market: &OddsMarket) -> Option<f64> {
    if market.outcomes.len() < 2 {
        return None;
    }
    let over = market.outcomes.iter().find(|o| o.name == OVER_NAME)?;
    let under = market.outcomes.iter().find(|o| o.name == UNDER_NAME)?;
    if over.point != under.point {
        return None;
    }
    let over_raw = american_to_prob(over.price?)?;
    let under_raw = american_to_prob(under.price?)?;
    let (fair_over, _) = devig_pair(over_raw, under_raw);
    let skew = fair_over - 0.5;
    Some(over.point.unwrap_or(0.0) + skew * SKEW_DAMPING)
}

/// Median of the finite values, averaging the two middle values for an
/// even count. `None` when nothing finite remains.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Consensus full-game total for one matchup: filter events to those
/// whose labels reconcile to both teams, take each matching event's
/// first bookmaker's totals market, and median the usable estimates.
/// Intentionally no cross-bookmaker blending within an event. `None`
/// means no usable market; the caller owns any zero-fallback policy.
pub fn collect_game_totals(
    directory: &TeamDirectory,
    events: &[OddsEvent],
    home: Team,
    away: Team,
) -> Option<f64> {
    let mut totals = Vec::new();
    for event in events {
        if !(directory.matches(home, &event.home_team) && directory.matches(away, &event.away_team))
        {
            continue;
        }
        let Some(market) = event
            .bookmakers
            .first()
            .and_then(|bookmaker| bookmaker.markets.iter().find(|m| m.key == TOTALS_MARKET_KEY))
        else {
            continue;
        };
        if let Some(total) = implied_total_from_market(market) {
            if total.is_finite() {
                totals.push(total);
            }
        }
    }
    median(&totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds_fetch::{OddsBookmaker, OddsOutcome};

    fn totals_market(line: f64, over_price: f64, under_price: f64) -> OddsMarket {
        OddsMarket {
            key: TOTALS_MARKET_KEY.to_string(),
            outcomes: vec![
                OddsOutcome {
                    name: OVER_NAME.to_string(),
                    price: Some(over_price),
                    point: Some(line),
                },
                OddsOutcome {
                    name: UNDER_NAME.to_string(),
                    price: Some(under_price),
                    point: Some(line),
                },
            ],
        }
    }

    fn event_for(home: &str, away: &str, market: OddsMarket) -> OddsEvent {
        OddsEvent {
            home_team: home.to_string(),
            away_team: away.to_string(),
            bookmakers: vec![OddsBookmaker {
                markets: vec![market],
            }],
        }
    }

    #[test]
    fn even_money_prices_convert_to_half() {
        assert_eq!(american_to_prob(100.0), Some(0.5));
        assert_eq!(american_to_prob(-100.0), Some(0.5));
    }

    #[test]
    fn conversion_stays_inside_unit_interval() {
        for price in [-10000.0, -450.0, -110.0, 100.0, 125.0, 2500.0] {
            let prob = american_to_prob(price).expect("finite price");
            assert!(prob > 0.0 && prob < 1.0, "price {price} gave {prob}");
        }
    }

    #[test]
    fn non_finite_price_is_invalid() {
        assert_eq!(american_to_prob(f64::NAN), None);
        assert_eq!(american_to_prob(f64::INFINITY), None);
    }

    #[test]
    fn devig_sums_to_one() {
        let (over, under) = devig_pair(0.5238, 0.5238);
        assert!((over + under - 1.0).abs() < 1e-12);
        assert!((over - 0.5).abs() < 1e-12);

        let (over, under) = devig_pair(0.55, 0.50);
        assert!((over + under - 1.0).abs() < 1e-12);
        assert!(over > under);
    }

    #[test]
    fn devig_of_degenerate_pair_is_neutral() {
        assert_eq!(devig_pair(0.0, 0.0), (0.5, 0.5));
    }

    #[test]
    fn balanced_market_implies_exactly_the_line() {
        let market = totals_market(8.5, -110.0, -110.0);
        assert_eq!(implied_total_from_market(&market), Some(8.5));
    }

    #[test]
    fn over_heavy_market_implies_above_the_line() {
        let market = totals_market(9.0, -120.0, 100.0);
        let total = implied_total_from_market(&market).expect("usable market");
        assert!(total > 9.0);
        assert!((total - 9.004347826086957).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lines_are_unusable() {
        let mut market = totals_market(8.5, -110.0, -110.0);
        market.outcomes[1].point = Some(9.0);
        assert_eq!(implied_total_from_market(&market), None);
    }

    #[test]
    fn missing_side_or_price_is_unusable() {
        let mut missing_under = totals_market(8.5, -110.0, -110.0);
        missing_under.outcomes.truncate(1);
        assert_eq!(implied_total_from_market(&missing_under), None);

        let mut missing_price = totals_market(8.5, -110.0, -110.0);
        missing_price.outcomes[0].price = None;
        assert_eq!(implied_total_from_market(&missing_price), None);
    }

    #[test]
    fn absent_points_fall_back_to_zero_line() {
        let mut market = totals_market(0.0, -110.0, -110.0);
        market.outcomes[0].point = None;
        market.outcomes[1].point = None;
        assert_eq!(implied_total_from_market(&market), Some(0.0));
    }

    #[test]
    fn median_odd_even_and_empty() {
        assert_eq!(median(&[10.5, 11.0, 11.5]), Some(11.0));
        assert_eq!(median(&[11.0, 10.0]), Some(10.5));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn consensus_filters_by_both_team_labels() {
        let directory = TeamDirectory::standard();
        let events = vec![
            event_for("LA Dodgers", "NYY", totals_market(8.5, -110.0, -110.0)),
            // Same home team, wrong away team: must be excluded.
            event_for("LA Dodgers", "BOS", totals_market(12.0, -110.0, -110.0)),
            event_for(
                "Los Angeles Dodgers",
                "New York Yankees",
                totals_market(9.5, -110.0, -110.0),
            ),
        ];
        let total = collect_game_totals(&directory, &events, Team::Dodgers, Team::Yankees)
            .expect("two matching events");
        assert!((total - 9.0).abs() < 1e-12);
    }

    #[test]
    fn consensus_uses_first_bookmaker_only() {
        let directory = TeamDirectory::standard();
        let mut event = event_for("LAD", "NYY", totals_market(8.5, -110.0, -110.0));
        event.bookmakers.push(OddsBookmaker {
            markets: vec![totals_market(11.5, -110.0, -110.0)],
        });
        let total = collect_game_totals(&directory, &[event], Team::Dodgers, Team::Yankees);
        assert_eq!(total, Some(8.5));
    }

    #[test]
    fn consensus_without_matching_events_is_unknown() {
        let directory = TeamDirectory::standard();
        let events = vec![event_for("ATL", "MIA", totals_market(8.0, -110.0, -110.0))];
        assert_eq!(
            collect_game_totals(&directory, &events, Team::Dodgers, Team::Yankees),
            None
        );
    }

    #[test]
    fn unusable_markets_are_skipped_not_fatal() {
        let directory = TeamDirectory::standard();
        let mut broken = totals_market(8.5, -110.0, -110.0);
        broken.outcomes[1].point = Some(9.5);
        let events = vec![
            event_for("LAD", "NYY", broken),
            event_for("LAD", "NYY", totals_market(10.0, -110.0, -110.0)),
        ];
        assert_eq!(
            collect_game_totals(&directory, &events, Team::Dodgers, Team::Yankees),
            Some(10.0)
        );
    }
}
