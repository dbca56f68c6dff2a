//src/app/viewer.rs
//! State of the student-facing "my workouts" screen: workout and block
//! selection plus the data-saver behavior for demonstration media.
use coach_desk_lib::{resolve_block, Exercise, ResolvedExercise, Student, Workout};
use ratatui::widgets::ListState;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerFocus {
    Workouts,
    Blocks,
    Exercises,
}

pub struct ViewerState {
    pub student: Option<Student>,
    pub workouts: Vec<Workout>,
    pub catalog: Vec<Exercise>,
    pub workout_index: Option<usize>,
    pub block_index: Option<usize>,
    pub resolved: Vec<ResolvedExercise>,
    pub low_bandwidth: bool,
    pub focus: ViewerFocus,
    pub exercise_list_state: ListState,
    // Entries whose media the student explicitly revealed while in
    // low-bandwidth mode, keyed by position in the resolved list
    revealed: HashSet<usize>,
}

impl ViewerState {
    pub fn new(low_bandwidth: bool) -> Self {
        Self {
            student: None,
            workouts: Vec::new(),
            catalog: Vec::new(),
            workout_index: None,
            block_index: None,
            resolved: Vec::new(),
            low_bandwidth,
            focus: ViewerFocus::Workouts,
            exercise_list_state: ListState::default(),
            revealed: HashSet::new(),
        }
    }

    /// Replaces the loaded data and resets every selection.
    pub fn reset(&mut self, student: Student, workouts: Vec<Workout>, catalog: Vec<Exercise>) {
        self.student = Some(student);
        self.workouts = workouts;
        self.catalog = catalog;
        self.workout_index = None;
        self.block_index = None;
        self.resolved.clear();
        self.revealed.clear();
        self.focus = ViewerFocus::Workouts;
        self.exercise_list_state.select(None);
    }

    pub fn selected_workout(&self) -> Option<&Workout> {
        self.workout_index.and_then(|i| self.workouts.get(i))
    }

    pub fn selected_block(&self) -> Option<&coach_desk_lib::Block> {
        let workout = self.selected_workout()?;
        self.block_index.and_then(|i| workout.blocks.get(i))
    }

    /// Picks a workout and resets the block selection for it.
    pub fn select_workout(&mut self, index: usize) {
        if index >= self.workouts.len() {
            return;
        }
        self.workout_index = Some(index);
        self.block_index = None;
        self.resolved.clear();
        self.revealed.clear();
        self.exercise_list_state.select(None);
    }

    /// Picks a block and resolves its entries against the catalog.
    pub fn select_block(&mut self, index: usize) {
        let Some(workout) = self.selected_workout() else {
            return;
        };
        let Some(block) = workout.blocks.get(index) else {
            return;
        };
        self.resolved = resolve_block(block, &self.catalog);
        self.block_index = Some(index);
        self.revealed.clear();
        self.exercise_list_state
            .select(if self.resolved.is_empty() { None } else { Some(0) });
    }

    pub fn cycle_workout(&mut self, forward: bool) {
        if self.workouts.is_empty() {
            return;
        }
        let next = match self.workout_index {
            None => 0,
            Some(i) if forward => (i + 1) % self.workouts.len(),
            Some(i) => (i + self.workouts.len() - 1) % self.workouts.len(),
        };
        self.select_workout(next);
    }

    pub fn cycle_block(&mut self, forward: bool) {
        let len = self.selected_workout().map_or(0, |w| w.blocks.len());
        if len == 0 {
            return;
        }
        let next = match self.block_index {
            None => 0,
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
        };
        self.select_block(next);
    }

    /// Turning the mode on hides every entry's media again; turning it off
    /// shows everything unconditionally.
    pub fn set_low_bandwidth(&mut self, enabled: bool) {
        self.low_bandwidth = enabled;
        self.revealed.clear();
    }

    pub fn toggle_low_bandwidth(&mut self) {
        let enabled = !self.low_bandwidth;
        self.set_low_bandwidth(enabled);
    }

    /// Reveals one entry's media; other entries stay hidden.
    pub fn reveal(&mut self, index: usize) {
        if index < self.resolved.len() {
            self.revealed.insert(index);
        }
    }

    pub fn media_visible(&self, index: usize) -> bool {
        !self.low_bandwidth || self.revealed.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_desk_lib::{Block, ExerciseInPlan, Weekday};

    fn sample_state() -> ViewerState {
        let catalog = vec![Exercise {
            id: Some("ex-1".to_string()),
            name: "Bench Press".to_string(),
            muscle_groups: "chest".to_string(),
            description: String::new(),
            media_url: "file:///media/bench.gif".to_string(),
        }];
        let block = Block {
            name: "Block A".to_string(),
            muscle_groups: "chest".to_string(),
            notes: String::new(),
            exercises: vec![
                ExerciseInPlan { exercise_id: "ex-1".to_string(), sets: 3, reps: 10 },
                ExerciseInPlan { exercise_id: "gone".to_string(), sets: 4, reps: 8 },
                ExerciseInPlan { exercise_id: "ex-1".to_string(), sets: 2, reps: 15 },
            ],
        };
        let workout = Workout {
            id: Some("w-1".to_string()),
            name: "Workout A".to_string(),
            goal: "Strength".to_string(),
            weekdays: vec![Weekday::Monday],
            blocks: vec![block],
        };
        let student = Student {
            id: Some("s-1".to_string()),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            goal: String::new(),
            physical_limitation: String::new(),
            notes: String::new(),
        };
        let mut state = ViewerState::new(false);
        state.reset(student, vec![workout], catalog);
        state
    }

    #[test]
    fn selecting_a_workout_resets_block_selection() {
        let mut state = sample_state();
        state.select_workout(0);
        state.select_block(0);
        assert_eq!(state.resolved.len(), 3);

        state.select_workout(0);
        assert!(state.block_index.is_none());
        assert!(state.resolved.is_empty());
    }

    #[test]
    fn dangling_reference_resolves_to_placeholder() {
        let mut state = sample_state();
        state.select_workout(0);
        state.select_block(0);
        assert!(state.resolved[0].exercise.is_some());
        assert!(state.resolved[1].exercise.is_none());
        assert!(state.resolved[2].exercise.is_some());
    }

    #[test]
    fn low_bandwidth_hides_until_revealed_per_entry() {
        let mut state = sample_state();
        state.select_workout(0);
        state.select_block(0);

        // Off: everything visible
        assert!(state.media_visible(0) && state.media_visible(2));

        // On: everything hidden
        state.set_low_bandwidth(true);
        assert!(!state.media_visible(0));
        assert!(!state.media_visible(2));

        // Revealing one entry does not reveal any other
        state.reveal(2);
        assert!(!state.media_visible(0));
        assert!(state.media_visible(2));

        // Disabling the mode reveals all unconditionally
        state.set_low_bandwidth(false);
        assert!(state.media_visible(0) && state.media_visible(1) && state.media_visible(2));
    }

    #[test]
    fn re_enabling_low_bandwidth_hides_previous_reveals() {
        let mut state = sample_state();
        state.select_workout(0);
        state.select_block(0);

        state.set_low_bandwidth(true);
        state.reveal(0);
        assert!(state.media_visible(0));

        state.set_low_bandwidth(false);
        state.set_low_bandwidth(true);
        assert!(!state.media_visible(0));
    }
}
