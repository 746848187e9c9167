use crate::models::{ExtractedParameter, HealthScore, ScoreTier};

/// Share of normal results as an integer percentage, truncated.
pub fn health_score(params: &[ExtractedParameter]) -> HealthScore {
    if params.is_empty() {
        return HealthScore::new(0, ScoreTier::Unknown);
    }
    let normal = params.iter().filter(|p| p.is_normal()).count();
    // normal <= len, so the result fits in 0..=100
    let score = (100 * normal / params.len()) as u8;
    HealthScore::new(score, tier_for(score))
}

pub fn tier_for(score: u8) -> ScoreTier {
    match score {
        90.. => ScoreTier::Green,
        70..=89 => ScoreTier::Yellow,
        _ => ScoreTier::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Status};

    fn with_statuses(statuses: &[Status]) -> Vec<ExtractedParameter> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| ExtractedParameter {
                test_name: format!("T{i}"),
                value: 1.0,
                unit: String::new(),
                range_low: 0.0,
                range_high: 2.0,
                category: Category::Periodic,
                status: *s,
                explanation: String::new(),
            })
            .collect()
    }

    #[test]
    fn empty_is_unknown_zero() {
        let score = health_score(&[]);
        assert_eq!(score.score, 0);
        assert_eq!(score.tier, ScoreTier::Unknown);
        assert_eq!(score.label, "No Data");
    }

    #[test]
    fn all_normal_is_green_100() {
        let score = health_score(&with_statuses(&[Status::Normal; 4]));
        assert_eq!(score.score, 100);
        assert_eq!(score.tier, ScoreTier::Green);
    }

    #[test]
    fn none_normal_is_red_zero() {
        let score = health_score(&with_statuses(&[Status::Low, Status::High]));
        assert_eq!(score.score, 0);
        assert_eq!(score.tier, ScoreTier::Red);
    }

    #[test]
    fn truncates() {
        // 2 of 3 normal = 66.67 -> 66
        let score = health_score(&with_statuses(&[Status::Normal, Status::Normal, Status::High]));
        assert_eq!(score.score, 66);
        assert_eq!(score.tier, ScoreTier::Red);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for(100), ScoreTier::Green);
        assert_eq!(tier_for(90), ScoreTier::Green);
        assert_eq!(tier_for(89), ScoreTier::Yellow);
        assert_eq!(tier_for(70), ScoreTier::Yellow);
        assert_eq!(tier_for(69), ScoreTier::Red);
        assert_eq!(tier_for(0), ScoreTier::Red);
    }

    #[test]
    fn monotone_in_normal_count() {
        let total = 7;
        let mut previous = 0;
        for normal in 0..=total {
            let mut statuses = vec![Status::Normal; normal];
            statuses.resize(total, Status::High);
            let score = health_score(&with_statuses(&statuses)).score;
            assert!(score >= previous);
            previous = score;
        }
        assert_eq!(previous, 100);
    }
}
