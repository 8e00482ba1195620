//! Tests for score types.

use super::*;

mod simple_score {
    use super::*;

    #[test]
    fn test_creation() {
        let score = SimpleScore::of(-5);
        assert_eq!(score.score(), -5);
    }

    #[test]
    fn test_feasibility() {
        assert!(SimpleScore::of(0).is_feasible());
        assert!(SimpleScore::of(10).is_feasible());
        assert!(!SimpleScore::of(-1).is_feasible());
    }

    #[test]
    fn test_arithmetic() {
        let s1 = SimpleScore::of(10);
        let s2 = SimpleScore::of(3);

        assert_eq!(s1 + s2, SimpleScore::of(13));
        assert_eq!(s1 - s2, SimpleScore::of(7));
        assert_eq!(-s1, SimpleScore::of(-10));
        assert_eq!(s2.scale(4), SimpleScore::of(12));
    }
}

mod hard_soft_score {
    use super::*;

    #[test]
    fn test_lexicographic_ordering() {
        let infeasible = HardSoftScore::of(-1, 0);
        let poor_soft = HardSoftScore::of(0, -100);
        let good_soft = HardSoftScore::of(0, -10);

        // Hard dominates soft
        assert!(poor_soft > infeasible);
        assert!(good_soft > poor_soft);

        // Equal only when every level matches
        assert_ne!(HardSoftScore::of(0, -1), HardSoftScore::of(-1, 0));
        assert_eq!(HardSoftScore::of(-2, 5), HardSoftScore::of(-2, 5));
    }

    #[test]
    fn test_feasibility() {
        assert!(HardSoftScore::of(0, -999).is_feasible());
        assert!(!HardSoftScore::of(-1, 999).is_feasible());
    }

    #[test]
    fn test_arithmetic() {
        let s1 = HardSoftScore::of(-1, -10);
        let s2 = HardSoftScore::of(-2, 5);

        assert_eq!(s1 + s2, HardSoftScore::of(-3, -5));
        assert_eq!(s1 - s2, HardSoftScore::of(1, -15));
        assert_eq!(-s1, HardSoftScore::of(1, 10));
        assert_eq!(s1.scale(3), HardSoftScore::of(-3, -30));
    }

    #[test]
    fn test_level_numbers_round_trip() {
        let score = HardSoftScore::of(-7, 42);
        let levels = score.to_level_numbers();
        assert_eq!(levels, vec![-7, 42]);
        assert_eq!(HardSoftScore::from_level_numbers(&levels), score);
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(HardSoftScore::level_label(0), ScoreLevel::Hard);
        assert_eq!(HardSoftScore::level_label(1), ScoreLevel::Soft);
    }

    #[test]
    fn test_display() {
        assert_eq!(HardSoftScore::of(-2, -30).to_string(), "-2hard/-30soft");
    }
}

mod hard_medium_soft_score {
    use super::*;

    #[test]
    fn test_lexicographic_ordering() {
        let a = HardMediumSoftScore::of(0, -5, 100);
        let b = HardMediumSoftScore::of(0, -4, -100);
        let c = HardMediumSoftScore::of(-1, 100, 100);

        assert!(b > a); // medium decides when hard is equal
        assert!(a > c); // hard dominates everything
    }

    #[test]
    fn test_feasibility() {
        assert!(HardMediumSoftScore::of(0, -1, -1).is_feasible());
        assert!(!HardMediumSoftScore::of(-1, 0, 0).is_feasible());
    }

    #[test]
    fn test_level_numbers_round_trip() {
        let score = HardMediumSoftScore::of(-1, 2, -3);
        assert_eq!(
            HardMediumSoftScore::from_level_numbers(&score.to_level_numbers()),
            score
        );
    }
}
