// THEORY:
// The decision stage reduces the smoothed distance map to two numbers,
// the mean and the population standard deviation, and compares the deviation
// against the operator's sensitivity threshold. The test is deliberately
// memoryless: every cycle is judged on its own against the live signal,
// with no hysteresis or debounce, so a single-cycle sensor spike can
// trigger exactly as a sustained change would. The threshold is read
// fresh each cycle, which is what makes sensitivity changes take effect
// on the very next evaluation.

use crate::core_modules::distance_map::DistanceMap;

/// Operator-tunable cutoff compared against the smoothed map's standard
/// deviation. Unbounded in both directions.
pub type Sensitivity = i32;

/// The outcome of one cycle's statistical test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionVerdict {
    pub is_motion: bool,
    pub mean: f64,
    pub std_dev: f64,
}

/// Evaluates a smoothed distance map against the threshold in effect.
/// Motion is declared only on a strict exceedance; equality is quiet.
pub fn evaluate(map: &DistanceMap, threshold: Sensitivity) -> MotionVerdict {
    let (mean, std_dev) = mean_std_dev(map.values());
    MotionVerdict {
        is_motion: std_dev > threshold as f64,
        mean,
        std_dev,
    }
}

/// Arithmetic mean and population standard deviation of the map's values.
fn mean_std_dev(values: &[u8]) -> (f64, f64) {
    let count = values.len() as f64;
    if count < 1.0 {
        return (0.0, 0.0);
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    let mean = sum / count;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / count;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_map_has_zero_deviation() {
        let map = DistanceMap::new(4, 4, vec![40u8; 16]);
        let verdict = evaluate(&map, 0);
        assert_eq!(verdict.mean, 40.0);
        assert_eq!(verdict.std_dev, 0.0);
        assert!(!verdict.is_motion, "0 > 0 must not hold");
    }

    #[test]
    fn known_statistics() {
        // Half zeros, half twos: mean 1, variance 1, std dev 1.
        let map = DistanceMap::new(4, 1, vec![0, 0, 2, 2]);
        let verdict = evaluate(&map, 0);
        assert_eq!(verdict.mean, 1.0);
        assert_eq!(verdict.std_dev, 1.0);
        assert!(verdict.is_motion);
    }

    #[test]
    fn equality_is_no_motion() {
        // std dev is exactly 1; a threshold of 1 must stay quiet.
        let map = DistanceMap::new(4, 1, vec![0, 0, 2, 2]);
        assert!(!evaluate(&map, 1).is_motion);
    }

    #[test]
    fn threshold_is_monotonic() {
        let map = DistanceMap::new(8, 1, vec![0, 30, 60, 90, 120, 150, 180, 210]);
        let mut previous = true;
        for threshold in -2..200 {
            let now = evaluate(&map, threshold).is_motion;
            assert!(
                previous || !now,
                "raising the threshold turned a quiet verdict into motion at {threshold}"
            );
            previous = now;
        }
    }

    #[test]
    fn empty_map_is_quiet() {
        let map = DistanceMap::new(0, 0, Vec::new());
        let verdict = evaluate(&map, -1);
        assert_eq!(verdict.mean, 0.0);
        assert_eq!(verdict.std_dev, 0.0);
        // A negative threshold still declares motion on the zero signal.
        assert!(verdict.is_motion);
    }
}
