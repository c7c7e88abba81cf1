use proptest::prelude::*;

use kitchen_sched::builder::{EquipmentMap, TaskModelBuilder};
use kitchen_sched::pool::Capacities;
use kitchen_sched::scheduler::feasibility::{serial_lower_bound, serial_sum};
use kitchen_sched::scheduler::KitchenScheduler;
use kitchen_sched::task::{RawStep, RecipeInput, ATTENTION};

// "oven", "bowl" and "blender" are never given a capacity below, so they are
// always unconstrained.
const EQUIPMENT: &[Option<&str>] = &[
    None,
    Some("stove"),
    Some("board"),
    Some("oven"),
    Some("bowl"),
    Some("blender"),
];

fn step_strategy() -> impl Strategy<Value = RawStep> {
    (0i64..300, any::<bool>(), 0..EQUIPMENT.len()).prop_map(|(duration, active, eq)| {
        let mut step = RawStep::new("step", duration);
        step.requires_attention = active;
        step.equipment = EQUIPMENT[eq].map(str::to_string);
        step
    })
}

fn recipes_strategy() -> impl Strategy<Value = Vec<RecipeInput>> {
    proptest::collection::vec(proptest::collection::vec(step_strategy(), 0..6), 0..6).prop_map(
        |recipes| {
            recipes
                .into_iter()
                .enumerate()
                .map(|(i, steps)| RecipeInput::new(format!("recipe_{i}"), steps))
                .collect()
        },
    )
}

fn capacities_strategy() -> impl Strategy<Value = Capacities> {
    (1u32..3, 1u32..4, 1u32..3).prop_map(|(attention, stove, board)| {
        [
            (ATTENTION.to_string(), attention),
            ("stove".to_string(), stove),
            ("board".to_string(), board),
        ]
        .into_iter()
        .collect()
    })
}

proptest! {
    #[test]
    fn timeline_respects_precedence_and_exclusivity(
        recipes in recipes_strategy(),
        capacities in capacities_strategy(),
    ) {
        let timeline = KitchenScheduler::new(capacities).schedule(&recipes).unwrap();
        let graph = TaskModelBuilder::new(EquipmentMap::new()).build(&recipes).unwrap();

        let violations = timeline.verify(&graph);
        prop_assert!(violations.is_empty(), "violations: {:?}", violations);
        prop_assert_eq!(timeline.len(), graph.task_count());
    }

    #[test]
    fn makespan_is_between_serial_bounds(
        recipes in recipes_strategy(),
        capacities in capacities_strategy(),
    ) {
        let timeline = KitchenScheduler::new(capacities).schedule(&recipes).unwrap();
        let graph = TaskModelBuilder::new(EquipmentMap::new()).build(&recipes).unwrap();

        prop_assert!(timeline.makespan() >= serial_lower_bound(&graph));
        prop_assert!(timeline.makespan() <= serial_sum(&graph));
    }

    #[test]
    fn identical_input_gives_identical_timeline(
        recipes in recipes_strategy(),
        capacities in capacities_strategy(),
    ) {
        let scheduler = KitchenScheduler::new(capacities);
        let first = scheduler.schedule(&recipes).unwrap();
        let second = scheduler.schedule(&recipes).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_yaml::to_string(&first).unwrap(),
            serde_yaml::to_string(&second).unwrap()
        );
    }

    #[test]
    fn unconstrained_class_never_makes_tasks_wait(
        durations in proptest::collection::vec(0i64..500, 1..12),
    ) {
        let recipes: Vec<RecipeInput> = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                RecipeInput::new(format!("r{i}"), vec![RawStep::new("blend", d).with_equipment("blender")])
            })
            .collect();
        let capacities: Capacities = [(ATTENTION.to_string(), 1)].into_iter().collect();

        let timeline = KitchenScheduler::new(capacities).schedule(&recipes).unwrap();

        prop_assert!(timeline.blocks().iter().all(|b| b.start == 0));
        prop_assert_eq!(timeline.makespan(), *durations.iter().max().unwrap() as u64);
        prop_assert_eq!(timeline.unbounded_blocks("blender").len(), durations.len());
    }

    #[test]
    fn single_cook_never_multitasks(recipes in recipes_strategy()) {
        let capacities: Capacities = [(ATTENTION.to_string(), 1)].into_iter().collect();
        let timeline = KitchenScheduler::new(capacities).schedule(&recipes).unwrap();

        let mut active: Vec<(u64, u64)> = timeline
            .blocks()
            .iter()
            .filter(|b| b.task.requires_attention)
            .map(|b| (b.start, b.end))
            .collect();
        active.sort();
        for pair in active.windows(2) {
            prop_assert!(pair[1].0 >= pair[0].1, "cook double-booked: {:?}", pair);
        }
    }
}
