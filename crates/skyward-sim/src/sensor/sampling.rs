//! Hit aggregation: group raw hits per obstacle, reduce each group to one
//! distance, sort nearest-first.

use skyward_core::enums::ReductionPolicy;
use skyward_core::state::{SensorContact, SensorResult};

use crate::collision::HitMark;

/// Build a sensor result from one query's raw hits.
///
/// Hits are grouped by obstacle-handle equality; each group reduces to a
/// single distance per the policy, optionally quantized to the sensor's
/// accuracy step; groups are reported ascending by reduced distance.
pub fn reduce_hits(
    sensor: &str,
    hits: &[HitMark],
    policy: ReductionPolicy,
    accuracy: f64,
) -> SensorResult {
    let mut groups: Vec<(skyward_core::types::ObstacleId, Vec<f64>)> = Vec::new();
    for hit in hits {
        match groups.iter_mut().find(|(id, _)| *id == hit.obstacle) {
            Some((_, distances)) => distances.push(hit.distance),
            None => groups.push((hit.obstacle, vec![hit.distance])),
        }
    }

    let mut contacts: Vec<SensorContact> = groups
        .into_iter()
        .map(|(obstacle, distances)| {
            let reduced = match policy {
                ReductionPolicy::Nearest => {
                    distances.iter().copied().fold(f64::INFINITY, f64::min)
                }
                ReductionPolicy::Farthest => {
                    distances.iter().copied().fold(f64::NEG_INFINITY, f64::max)
                }
                ReductionPolicy::Average => {
                    distances.iter().sum::<f64>() / distances.len() as f64
                }
            };
            let distance = if accuracy > 0.0 {
                (reduced / accuracy).round() * accuracy
            } else {
                reduced
            };
            SensorContact { obstacle, distance }
        })
        .collect();

    contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    SensorResult {
        sensor: sensor.to_string(),
        contacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyward_core::types::{ObstacleId, Vector3};

    fn hit(obstacle: u32, distance: f64) -> HitMark {
        HitMark {
            distance,
            world_point: Vector3::ZERO,
            relative_point: Vector3::ZERO,
            obstacle: ObstacleId(obstacle),
        }
    }

    #[test]
    fn test_groups_by_obstacle_equality() {
        let hits = [hit(1, 10.0), hit(2, 5.0), hit(1, 12.0), hit(2, 7.0)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Nearest, 0.0);

        assert_eq!(result.contacts.len(), 2);
    }

    #[test]
    fn test_nearest_takes_group_minimum() {
        let hits = [hit(1, 10.0), hit(1, 4.0), hit(1, 12.0)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Nearest, 0.0);
        assert_eq!(result.contacts[0].distance, 4.0);
    }

    #[test]
    fn test_farthest_takes_group_maximum() {
        let hits = [hit(1, 10.0), hit(1, 4.0), hit(1, 12.0)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Farthest, 0.0);
        assert_eq!(result.contacts[0].distance, 12.0);
    }

    #[test]
    fn test_average_is_arithmetic_mean() {
        let hits = [hit(1, 10.0), hit(1, 4.0), hit(1, 13.0)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Average, 0.0);
        assert_eq!(result.contacts[0].distance, 9.0);
    }

    #[test]
    fn test_contacts_sorted_ascending() {
        let hits = [hit(3, 30.0), hit(1, 10.0), hit(2, 20.0)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Nearest, 0.0);

        let distances: Vec<f64> = result.contacts.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![10.0, 20.0, 30.0]);
        assert_eq!(result.contacts[0].obstacle, ObstacleId(1));
    }

    #[test]
    fn test_accuracy_quantizes_reported_distance() {
        let hits = [hit(1, 10.34)];
        let result = reduce_hits("fwd", &hits, ReductionPolicy::Nearest, 0.5);
        assert!((result.contacts[0].distance - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_hits_empty_result() {
        let result = reduce_hits("fwd", &[], ReductionPolicy::Average, 0.0);
        assert!(result.contacts.is_empty());
        assert_eq!(result.sensor, "fwd");
    }
}
