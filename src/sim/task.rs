//! Arithmetic task generation
//!
//! A task is one question (`a + b = ?` or `a - b = ?`) with three candidate
//! answers, one per lane. Exactly one candidate is correct and all three are
//! distinct values inside the configured range.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CANDIDATE_ATTEMPTS, MAX_PERTURBATION};
use crate::error::TaskError;

/// Upper bound for operands and solutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NumberRange {
    #[serde(rename = "10")]
    Ten,
    #[default]
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "100")]
    Hundred,
}

impl NumberRange {
    pub const ALL: [NumberRange; 3] = [NumberRange::Ten, NumberRange::Twenty, NumberRange::Hundred];

    /// Largest value a solution (or candidate answer) may take
    pub fn max(&self) -> i32 {
        match self {
            NumberRange::Ten => 10,
            NumberRange::Twenty => 20,
            NumberRange::Hundred => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberRange::Ten => "10",
            NumberRange::Twenty => "20",
            NumberRange::Hundred => "100",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "10" => Some(NumberRange::Ten),
            "20" => Some(NumberRange::Twenty),
            "100" => Some(NumberRange::Hundred),
            _ => None,
        }
    }
}

/// Which operators a session asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationMode {
    #[serde(rename = "plus")]
    Addition,
    #[serde(rename = "minus")]
    Subtraction,
    #[default]
    #[serde(rename = "mixed")]
    Mixed,
}

impl OperationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Addition => "plus",
            OperationMode::Subtraction => "minus",
            OperationMode::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "plus" | "add" | "addition" | "+" => Some(OperationMode::Addition),
            "minus" | "sub" | "subtraction" | "-" => Some(OperationMode::Subtraction),
            "mixed" | "mix" | "both" => Some(OperationMode::Mixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,
    Minus,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
        }
    }

    pub fn apply(&self, a: i32, b: i32) -> i32 {
        match self {
            Operator::Plus => a + b,
            Operator::Minus => a - b,
        }
    }
}

/// One of the three parallel tracks, ordered left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

/// Single-step lane movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Neighbouring lane in `dir`, clamped at the outer lanes
    pub fn step(self, dir: Direction) -> Lane {
        match (self, dir) {
            (Lane::Left, Direction::Left) => Lane::Left,
            (Lane::Center, Direction::Left) => Lane::Left,
            (Lane::Right, Direction::Left) => Lane::Center,
            (Lane::Left, Direction::Right) => Lane::Center,
            (Lane::Center, Direction::Right) => Lane::Right,
            (Lane::Right, Direction::Right) => Lane::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(pub u32);

/// A candidate answer shown on one lane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub value: i32,
    pub lane: Lane,
    pub is_correct: bool,
}

/// One arithmetic question with its three candidate answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathTask {
    pub id: TaskId,
    pub operand_a: i32,
    pub operand_b: i32,
    pub operator: Operator,
    pub solution: i32,
    /// Display form, e.g. `"7 + 5 = ?"`
    pub question: String,
    pub options: [AnswerOption; 3],
}

impl MathTask {
    /// Option displayed on `lane` (every lane carries exactly one)
    pub fn option_at(&self, lane: Lane) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.lane == lane)
    }

    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    pub fn correct_lane(&self) -> Option<Lane> {
        self.correct_option().map(|o| o.lane)
    }

    /// Solved equation, e.g. `"7 + 5 = 12"`
    pub fn equation(&self) -> String {
        format!(
            "{} {} {} = {}",
            self.operand_a,
            self.operator.symbol(),
            self.operand_b,
            self.solution
        )
    }
}

/// Seeded task source
///
/// Holds nothing but its RNG and an id counter, so two generators built from
/// the same seed hand out identical task sequences.
#[derive(Debug, Clone)]
pub struct TaskGenerator {
    rng: Pcg32,
    next_id: u32,
}

impl TaskGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Generate the next task for a session configuration
    pub fn generate(
        &mut self,
        range: NumberRange,
        mode: OperationMode,
    ) -> Result<MathTask, TaskError> {
        self.generate_up_to(range.max(), mode)
    }

    /// Generate a task whose solution and candidates lie in `0..=max`
    pub(crate) fn generate_up_to(
        &mut self,
        max: i32,
        mode: OperationMode,
    ) -> Result<MathTask, TaskError> {
        let (operator, operand_a, operand_b, solution) = loop {
            let operator = self.pick_operator(mode);
            let (a, b, solution) = self.operands(max, operator);
            // Always true by construction
            if (0..=max).contains(&solution) {
                break (operator, a, b, solution);
            }
        };

        let mut values = self.candidate_values(solution, max)?;
        let mut lanes = Lane::ALL;
        lanes.shuffle(&mut self.rng);
        values.shuffle(&mut self.rng);

        let task_id = TaskId(self.next_entity_id());
        let options = std::array::from_fn(|i| AnswerOption {
            id: OptionId(self.next_entity_id()),
            value: values[i],
            lane: lanes[i],
            is_correct: values[i] == solution,
        });

        Ok(MathTask {
            id: task_id,
            operand_a,
            operand_b,
            operator,
            solution,
            question: format!("{} {} {} = ?", operand_a, operator.symbol(), operand_b),
            options,
        })
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn pick_operator(&mut self, mode: OperationMode) -> Operator {
        match mode {
            OperationMode::Addition => Operator::Plus,
            OperationMode::Subtraction => Operator::Minus,
            OperationMode::Mixed => {
                if self.rng.random_bool(0.5) {
                    Operator::Plus
                } else {
                    Operator::Minus
                }
            }
        }
    }

    /// Returns `(a, b, solution)` with everything inside `0..=max`
    fn operands(&mut self, max: i32, operator: Operator) -> (i32, i32, i32) {
        match operator {
            Operator::Plus => {
                let solution = self.rng.random_range(0..=max);
                let a = self.rng.random_range(0..=solution);
                (a, solution - a, solution)
            }
            Operator::Minus => {
                let a = self.rng.random_range(0..=max);
                let b = self.rng.random_range(0..=a);
                (a, b, a - b)
            }
        }
    }

    /// Solution plus two distinct nearby distractors, solution first
    fn candidate_values(&mut self, solution: i32, max: i32) -> Result<[i32; 3], TaskError> {
        let mut values = vec![solution];
        let mut attempts = 0;

        while values.len() < 3 {
            if attempts >= MAX_CANDIDATE_ATTEMPTS {
                log::warn!(
                    "Gave up on distinct answers for solution {} in 0..={} after {} attempts",
                    solution,
                    max,
                    attempts
                );
                return Err(TaskError::CandidateExhausted { max, attempts });
            }
            attempts += 1;

            let delta = self.rng.random_range(1..=MAX_PERTURBATION);
            let signed = if self.rng.random_bool(0.5) { delta } else { -delta };
            let drawn = (solution + signed).clamp(0, max);

            // Nudge off a collision, first up then down
            let candidate = [drawn, (drawn + 1).min(max), (drawn - 1).max(0)]
                .into_iter()
                .find(|v| !values.contains(v));

            if let Some(v) = candidate {
                values.push(v);
            }
        }

        Ok([values[0], values[1], values[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn assert_well_formed(task: &MathTask, max: i32) {
        assert_eq!(task.operator.apply(task.operand_a, task.operand_b), task.solution);
        assert!((0..=max).contains(&task.solution), "solution {} out of range", task.solution);
        assert!(task.operand_a >= 0 && task.operand_b >= 0);

        let values: HashSet<i32> = task.options.iter().map(|o| o.value).collect();
        assert_eq!(values.len(), 3, "values not distinct: {:?}", task.options);
        assert!(task.options.iter().all(|o| (0..=max).contains(&o.value)));

        let correct: Vec<_> = task.options.iter().filter(|o| o.is_correct).collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].value, task.solution);

        let lanes: HashSet<Lane> = task.options.iter().map(|o| o.lane).collect();
        assert_eq!(lanes.len(), 3);
    }

    fn range_strategy() -> impl Strategy<Value = NumberRange> {
        prop_oneof![
            Just(NumberRange::Ten),
            Just(NumberRange::Twenty),
            Just(NumberRange::Hundred),
        ]
    }

    fn mode_strategy() -> impl Strategy<Value = OperationMode> {
        prop_oneof![
            Just(OperationMode::Addition),
            Just(OperationMode::Subtraction),
            Just(OperationMode::Mixed),
        ]
    }

    proptest! {
        #[test]
        fn prop_generated_tasks_are_well_formed(
            seed in any::<u64>(),
            range in range_strategy(),
            mode in mode_strategy(),
        ) {
            let mut generator = TaskGenerator::new(seed);
            for _ in 0..20 {
                let task = generator.generate(range, mode).unwrap();
                assert_well_formed(&task, range.max());
            }
        }

        #[test]
        fn prop_lane_step_stays_adjacent(lane_idx in 0usize..3, right in any::<bool>()) {
            let lane = Lane::ALL[lane_idx];
            let dir = if right { Direction::Right } else { Direction::Left };
            let next = lane.step(dir);
            let next_idx = Lane::ALL.iter().position(|l| *l == next).unwrap();
            prop_assert!((next_idx as i32 - lane_idx as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_range_ten_mixed_stress() {
        let mut generator = TaskGenerator::new(7);
        for _ in 0..1000 {
            let task = generator.generate(NumberRange::Ten, OperationMode::Mixed).unwrap();
            assert_well_formed(&task, 10);
        }
    }

    #[test]
    fn test_fixed_operator_modes() {
        let mut generator = TaskGenerator::new(3);
        for _ in 0..100 {
            let plus = generator.generate(NumberRange::Twenty, OperationMode::Addition).unwrap();
            assert_eq!(plus.operator, Operator::Plus);
            let minus = generator.generate(NumberRange::Twenty, OperationMode::Subtraction).unwrap();
            assert_eq!(minus.operator, Operator::Minus);
        }
    }

    #[test]
    fn test_mixed_mode_uses_both_operators() {
        let mut generator = TaskGenerator::new(11);
        let ops: HashSet<Operator> = (0..200)
            .map(|_| generator.generate(NumberRange::Hundred, OperationMode::Mixed).unwrap().operator)
            .collect();
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_question_text() {
        let mut generator = TaskGenerator::new(5);
        let task = generator.generate(NumberRange::Twenty, OperationMode::Mixed).unwrap();
        let expected = format!(
            "{} {} {} = ?",
            task.operand_a,
            task.operator.symbol(),
            task.operand_b
        );
        assert_eq!(task.question, expected);
        assert!(task.equation().ends_with(&format!("= {}", task.solution)));
    }

    #[test]
    fn test_determinism() {
        let mut gen1 = TaskGenerator::new(99999);
        let mut gen2 = TaskGenerator::new(99999);
        for _ in 0..50 {
            let a = gen1.generate(NumberRange::Hundred, OperationMode::Mixed).unwrap();
            let b = gen2.generate(NumberRange::Hundred, OperationMode::Mixed).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut generator = TaskGenerator::new(1);
        let mut task_ids = HashSet::new();
        let mut option_ids = HashSet::new();
        for _ in 0..100 {
            let task = generator.generate(NumberRange::Twenty, OperationMode::Mixed).unwrap();
            assert!(task_ids.insert(task.id));
            for option in &task.options {
                assert!(option_ids.insert(option.id));
            }
        }
    }

    #[test]
    fn test_lane_and_order_both_vary() {
        let mut generator = TaskGenerator::new(21);
        let mut correct_lanes = HashSet::new();
        let mut first_is_solution = HashSet::new();
        let mut index_and_lane = HashSet::new();
        let mut lane_orders = HashSet::new();
        for _ in 0..200 {
            let task = generator.generate(NumberRange::Hundred, OperationMode::Mixed).unwrap();
            let correct_index = task.options.iter().position(|o| o.is_correct).unwrap();
            correct_lanes.insert(task.correct_lane().unwrap());
            first_is_solution.insert(task.options[0].is_correct);
            index_and_lane.insert((correct_index, task.correct_lane().unwrap()));
            lane_orders.insert(task.options.map(|o| o.lane));
        }
        assert_eq!(correct_lanes.len(), 3);
        assert_eq!(first_is_solution.len(), 2);
        // Lanes are not left in display order
        assert!(lane_orders.iter().any(|order| *order != Lane::ALL));
        // Value order and lane order are drawn independently
        assert_eq!(index_and_lane.len(), 9);
    }

    #[test]
    fn test_smallest_workable_range() {
        let mut generator = TaskGenerator::new(8);
        for _ in 0..200 {
            let task = generator.generate_up_to(2, OperationMode::Mixed).unwrap();
            assert_well_formed(&task, 2);
        }
    }

    #[test]
    fn test_degenerate_range_faults() {
        let mut generator = TaskGenerator::new(8);
        let err = generator.generate_up_to(1, OperationMode::Addition).unwrap_err();
        assert_eq!(
            err,
            TaskError::CandidateExhausted {
                max: 1,
                attempts: MAX_CANDIDATE_ATTEMPTS
            }
        );
    }

    #[test]
    fn test_lane_step_clamps() {
        assert_eq!(Lane::Left.step(Direction::Left), Lane::Left);
        assert_eq!(Lane::Right.step(Direction::Right), Lane::Right);
        assert_eq!(Lane::Center.step(Direction::Left), Lane::Left);
        assert_eq!(Lane::Center.step(Direction::Right), Lane::Right);
    }

    #[test]
    fn test_range_and_mode_parsing() {
        for range in NumberRange::ALL {
            assert_eq!(NumberRange::from_str(range.as_str()), Some(range));
        }
        assert_eq!(NumberRange::from_str("50"), None);
        assert_eq!(OperationMode::from_str("Plus"), Some(OperationMode::Addition));
        assert_eq!(OperationMode::from_str("-"), Some(OperationMode::Subtraction));
        assert_eq!(OperationMode::from_str("MIXED"), Some(OperationMode::Mixed));
        assert_eq!(OperationMode::from_str("times"), None);
    }

    #[test]
    fn test_task_serializes_with_range_names() {
        let json = serde_json::to_string(&NumberRange::Hundred).unwrap();
        assert_eq!(json, "\"100\"");
        let json = serde_json::to_string(&OperationMode::Addition).unwrap();
        assert_eq!(json, "\"plus\"");
        let json = serde_json::to_string(&OperationMode::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
    }
}
