use serde::{Deserialize, Serialize};

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetrics {
    pub total_chats: u64,
    pub total_escalations: u64,
    /// Mean of per-chat average confidence, rounded to two decimals.
    pub avg_confidence: f64,
}

impl ChatMetrics {
    /// Build metrics from the per-chat averages of chats that have one.
    pub fn from_averages(total_chats: u64, total_escalations: u64, averages: &[f64]) -> Self {
        let mean = if averages.is_empty() {
            0.0
        } else {
            averages.iter().sum::<f64>() / averages.len() as f64
        };
        Self {
            total_chats,
            total_escalations,
            avg_confidence: round_two_places(mean),
        }
    }
}

/// Round half away from zero to two decimals.
///
/// Values are first snapped to six decimals so that a mean stored as
/// `0.7849999999999999` rounds to `0.79`, not `0.78`.
pub fn round_two_places(value: f64) -> f64 {
    let snapped = (value * 1_000_000.0).round() / 10_000.0;
    snapped.round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_float_noise_upwards() {
        let mean = (0.85 + 0.72) / 2.0;
        assert!(mean < 0.785); // binary representation lands just below
        assert_eq!(round_two_places(mean), 0.79);
    }

    #[test]
    fn rounds_ordinary_values() {
        assert_eq!(round_two_places(0.0), 0.0);
        assert_eq!(round_two_places(0.25), 0.25);
        assert_eq!(round_two_places(0.6666), 0.67);
        assert_eq!(round_two_places(0.444), 0.44);
    }

    #[test]
    fn metrics_without_averages_report_zero() {
        let metrics = ChatMetrics::from_averages(3, 1, &[]);
        assert_eq!(metrics.avg_confidence, 0.0);
        assert_eq!(metrics.total_chats, 3);
    }

    #[test]
    fn metrics_mean_of_chat_averages() {
        let metrics = ChatMetrics::from_averages(2, 0, &[0.85, 0.72]);
        assert_eq!(metrics.avg_confidence, 0.79);

        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["totalChats"], 2);
        assert_eq!(json["totalEscalations"], 0);
    }
}
