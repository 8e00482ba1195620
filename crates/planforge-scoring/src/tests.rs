//! Tests for constraint evaluation and score analysis.

use std::sync::Arc;

use planforge_core::{EntityId, HardSoftScore, PlanningProblem, Score};

use super::*;

/// Tiny fixture: talks that may share a room slot.
#[derive(Debug, Clone)]
struct Talk {
    id: EntityId,
    slot: Option<u32>,
}

#[derive(Clone)]
struct Timetable {
    talks: Vec<Talk>,
    score: Option<HardSoftScore>,
}

impl Timetable {
    fn new(slots: &[Option<u32>]) -> Self {
        let talks = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| Talk {
                id: EntityId::new(format!("talk-{i}")),
                slot: *slot,
            })
            .collect();
        Self { talks, score: None }
    }
}

impl PlanningProblem for Timetable {
    type Score = HardSoftScore;

    fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.talks.iter().map(|t| t.id.clone()).collect()
    }

    fn is_assigned(&self, entity: &EntityId) -> bool {
        self.talks
            .iter()
            .any(|t| &t.id == entity && t.slot.is_some())
    }
}

fn slot_conflict() -> Constraint<Timetable> {
    Constraint::penalize("SlotConflict", HardSoftScore::ONE_HARD, |p: &Timetable| {
        let mut hits = Vec::new();
        for (i, a) in p.talks.iter().enumerate() {
            for b in &p.talks[i + 1..] {
                if a.slot.is_some() && a.slot == b.slot {
                    hits.push(ConstraintHit::new(ConstraintJustification::new(vec![
                        EntityRef::new(a),
                        EntityRef::new(b),
                    ])));
                }
            }
        }
        Ok(hits)
    })
}

fn assigned_reward() -> Constraint<Timetable> {
    Constraint::reward("TalkScheduled", HardSoftScore::ONE_SOFT, |p: &Timetable| {
        Ok(p.talks
            .iter()
            .filter(|t| t.slot.is_some())
            .map(|t| ConstraintHit::new(ConstraintJustification::new(vec![EntityRef::new(t)])))
            .collect())
    })
}

fn constraint_set() -> Arc<ConstraintSet<Timetable>> {
    Arc::new(
        ConstraintSet::new()
            .with(slot_conflict())
            .with(assigned_reward()),
    )
}

#[test]
fn test_evaluate_aggregates_all_constraints() {
    let problem = Timetable::new(&[Some(1), Some(1), Some(2)]);
    let score = constraint_set().evaluate(&problem).unwrap();

    // One conflicting pair, three scheduled talks.
    assert_eq!(score, HardSoftScore::of(-1, 3));
}

#[test]
fn test_shallow_and_full_agree_on_aggregates() {
    let problem = Timetable::new(&[Some(1), Some(1), Some(1), None]);
    let set = constraint_set();

    let full = set.analyze(&problem, FetchPolicy::Full).unwrap();
    let shallow = set.analyze(&problem, FetchPolicy::Shallow).unwrap();

    assert_eq!(full.score, shallow.score);
    assert_eq!(full.constraints.len(), shallow.constraints.len());
    for (f, s) in full.constraints.iter().zip(&shallow.constraints) {
        assert_eq!(f.constraint_ref, s.constraint_ref);
        assert_eq!(f.score, s.score);
        assert_eq!(f.match_count, s.match_count);
    }
}

#[test]
fn test_full_collects_matches_shallow_does_not() {
    let problem = Timetable::new(&[Some(1), Some(1)]);
    let set = constraint_set();

    let full = set.analyze(&problem, FetchPolicy::Full).unwrap();
    for analysis in full.non_zero_constraints() {
        let matches = analysis.matches.as_ref().expect("full keeps matches");
        assert!(!matches.is_empty());
        assert_eq!(matches.len(), analysis.match_count);
    }

    let shallow = set.analyze(&problem, FetchPolicy::Shallow).unwrap();
    assert!(shallow.constraints.iter().all(|a| a.matches.is_none()));
    assert!(shallow.constraints.iter().any(|a| a.match_count > 0));
}

#[test]
fn test_match_justification_names_the_entities() {
    let problem = Timetable::new(&[Some(7), Some(7), Some(8)]);
    let analysis = constraint_set()
        .analyze(&problem, FetchPolicy::Full)
        .unwrap();

    let conflict = analysis.constraint("SlotConflict").unwrap();
    assert_eq!(conflict.match_count, 1);
    let matches = conflict.matches.as_ref().unwrap();
    let talks: Vec<&Talk> = matches[0]
        .justification
        .entities
        .iter()
        .filter_map(|e| e.as_entity::<Talk>())
        .collect();
    assert_eq!(talks.len(), 2);
    assert!(talks.iter().all(|t| t.slot == Some(7)));
    assert_eq!(matches[0].score, HardSoftScore::of_hard(-1));
}

#[test]
fn test_custom_display_carries_into_matches() {
    let constraint: Constraint<Timetable> =
        Constraint::penalize("Unscheduled", HardSoftScore::ONE_HARD, |p: &Timetable| {
            Ok(p.talks
                .iter()
                .filter(|t| t.slot.is_none())
                .map(|t| {
                    ConstraintHit::new(ConstraintJustification::new(vec![
                        EntityRef::with_display(t, format!("{} needs a slot", t.id)),
                    ]))
                })
                .collect())
        });
    let problem = Timetable::new(&[Some(1), None]);

    let analysis = constraint.analyze(&problem, FetchPolicy::Full).unwrap();
    let matches = analysis.matches.as_ref().unwrap();
    assert_eq!(matches.len(), 1);

    let entity = &matches[0].justification.entities[0];
    assert_eq!(entity.display, "talk-1 needs a slot");
    assert_eq!(matches[0].justification.description, "talk-1 needs a slot");
    // Downcast works regardless of the display override
    assert_eq!(entity.as_entity::<Talk>().unwrap().slot, None);
}

#[test]
fn test_quantity_scales_the_weight() {
    let constraint: Constraint<Timetable> =
        Constraint::penalize("Overload", HardSoftScore::ONE_HARD, |_| {
            Ok(vec![ConstraintHit::weighted(
                ConstraintJustification::new(vec![]),
                3,
            )])
        });
    let problem = Timetable::new(&[]);

    let analysis = constraint.analyze(&problem, FetchPolicy::Shallow).unwrap();
    assert_eq!(analysis.score, HardSoftScore::of_hard(-3));
    assert_eq!(analysis.match_count, 1);
}

#[test]
fn test_matcher_failure_surfaces_as_evaluation_error() {
    let broken: Constraint<Timetable> =
        Constraint::penalize("Broken", HardSoftScore::ONE_HARD, |_| {
            Err(ConstraintFailure::new("talk references unknown room"))
        });
    let set = ConstraintSet::new().with(broken);
    let problem = Timetable::new(&[Some(1)]);

    let err = set.evaluate(&problem).unwrap_err();
    assert_eq!(err.constraint, "Broken");
    assert!(err.message.contains("unknown room"));
}

#[test]
fn test_analyzer_does_not_mutate_the_problem() {
    let problem = Timetable::new(&[Some(1), Some(2)]);
    let analyzer = ScoreAnalyzer::new(constraint_set());

    let before: Vec<Option<u32>> = problem.talks.iter().map(|t| t.slot).collect();
    analyzer.analyze(&problem, FetchPolicy::Full).unwrap();
    let after: Vec<Option<u32>> = problem.talks.iter().map(|t| t.slot).collect();

    assert_eq!(before, after);
    assert!(problem.score().is_none());
}

#[test]
fn test_analyzer_score_matches_analysis_total() {
    let problem = Timetable::new(&[Some(1), Some(1), None]);
    let analyzer = ScoreAnalyzer::new(constraint_set());

    let score = analyzer.score(&problem).unwrap();
    let analysis = analyzer.analyze(&problem, FetchPolicy::Full).unwrap();
    assert_eq!(score, analysis.score);

    let summed = analysis
        .constraints
        .iter()
        .fold(HardSoftScore::zero(), |acc, a| acc + a.score);
    assert_eq!(summed, analysis.score);
}
