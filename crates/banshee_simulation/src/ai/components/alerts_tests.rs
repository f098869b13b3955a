//! Tests for the pending alert queue.

#[cfg(test)]
mod tests {
    use bevy::prelude::Vec3;

    use super::super::alerts::PendingAlerts;

    #[test]
    fn test_push_deduplicates() {
        let mut alerts = PendingAlerts::default();

        assert!(alerts.push(Vec3::new(1.0, 0.0, 1.0)));
        assert!(!alerts.push(Vec3::new(1.0, 0.0, 1.0)));
        assert!(!alerts.push(Vec3::new(1.0001, 0.0, 1.0))); // в пределах epsilon
        assert!(alerts.push(Vec3::new(2.0, 0.0, 1.0)));

        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn test_nearest_by_distance() {
        let mut alerts = PendingAlerts::default();
        alerts.push(Vec3::new(5.0, 0.0, 0.0));
        alerts.push(Vec3::new(0.0, 0.0, 2.0));

        assert_eq!(alerts.nearest(Vec3::ZERO), Some(Vec3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn test_nearest_tie_uses_insertion_order() {
        let mut alerts = PendingAlerts::default();
        alerts.push(Vec3::new(3.0, 0.0, 0.0));
        alerts.push(Vec3::new(-3.0, 0.0, 0.0));
        alerts.push(Vec3::new(0.0, 0.0, 3.0));

        assert_eq!(alerts.nearest(Vec3::ZERO), Some(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_remove_and_empty() {
        let mut alerts = PendingAlerts::default();
        assert_eq!(alerts.nearest(Vec3::ZERO), None);

        alerts.push(Vec3::X);
        assert!(alerts.remove(Vec3::X));
        assert!(!alerts.remove(Vec3::X));
        assert!(alerts.is_empty());
    }
}
