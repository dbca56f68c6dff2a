// coach-desk-tui/src/ui/viewer.rs
use crate::app::viewer::ViewerFocus;
use crate::app::App;
use crate::ui::layout::header_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render_viewer(f: &mut Frame, app: &mut App, area: Rect) {
    let header = Style::new().bold().fg(header_color(&app.service));
    let viewer = &mut app.viewer;

    let student_name = viewer
        .student
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "Student".to_string());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // welcome
            Constraint::Length(1), // data saver line
            Constraint::Length(3), // workout + block selectors
            Constraint::Length(4), // about the block
            Constraint::Min(0),    // exercise list
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(format!("Welcome, {student_name}")).style(header),
        chunks[0],
    );

    let saver = if viewer.low_bandwidth { "on" } else { "off" };
    f.render_widget(
        Paragraph::new(format!("Data saver: {saver}  (b toggles, Tab moves focus)"))
            .style(Style::new().italic()),
        chunks[1],
    );

    // Workout / block selectors
    let selector_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let workout_label = viewer
        .selected_workout()
        .map(|w| w.name.clone())
        .unwrap_or_else(|| "Select the workout".to_string());
    let workout_border = if viewer.focus == ViewerFocus::Workouts {
        Style::new().yellow()
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(workout_label).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Workout ({})", viewer.workouts.len()))
                .border_style(workout_border),
        ),
        selector_chunks[0],
    );

    let block_count = viewer.selected_workout().map_or(0, |w| w.blocks.len());
    let block_label = viewer
        .selected_block()
        .map(|b| b.name.clone())
        .unwrap_or_else(|| "Select the block".to_string());
    let block_border = if viewer.focus == ViewerFocus::Blocks {
        Style::new().yellow()
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(block_label).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Block ({block_count})"))
                .border_style(block_border),
        ),
        selector_chunks[1],
    );

    // About the selected workout/block
    let mut about_lines: Vec<Line> = Vec::new();
    if let Some(workout) = viewer.selected_workout() {
        about_lines.push(Line::from(format!("Goal: {}", workout.goal)));
    }
    if let Some(block) = viewer.selected_block() {
        about_lines.push(Line::from(format!(
            "Muscle groups: {}",
            block.muscle_groups
        )));
        if !block.notes.is_empty() {
            about_lines.push(Line::from(format!("Notes: {}", block.notes)));
        }
    }
    f.render_widget(Paragraph::new(about_lines), chunks[3]);

    // Exercise list with per-entry media visibility
    let items: Vec<ListItem> = viewer
        .resolved
        .iter()
        .enumerate()
        .map(|(index, resolved)| {
            let mut lines: Vec<Line> = Vec::new();
            match &resolved.exercise {
                Some(exercise) => {
                    lines.push(Line::from(Span::styled(
                        exercise.name.clone(),
                        Style::new().bold(),
                    )));
                    lines.push(Line::from(format!(
                        "  {} sets x {} reps",
                        resolved.entry.sets, resolved.entry.reps
                    )));
                    if !exercise.description.is_empty() {
                        lines.push(Line::from(format!("  {}", exercise.description)));
                    }
                    let media_line = if exercise.media_url.is_empty() {
                        "  (no demonstration media)".to_string()
                    } else if viewer.media_visible(index) {
                        format!("  demo: {}", exercise.media_url)
                    } else {
                        "  [image hidden - press Enter to show]".to_string()
                    };
                    lines.push(Line::from(media_line));
                }
                // Dangling catalog reference: placeholder, not a failure
                None => {
                    lines.push(Line::from(Span::styled(
                        "Not found",
                        Style::new().fg(Color::Red),
                    )));
                    lines.push(Line::from(format!(
                        "  {} sets x {} reps",
                        resolved.entry.sets, resolved.entry.reps
                    )));
                }
            }
            ListItem::new(lines)
        })
        .collect();

    let exercises_border = if viewer.focus == ViewerFocus::Exercises {
        Style::new().yellow()
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Exercises")
                .border_style(exercises_border),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, chunks[4], &mut viewer.exercise_list_state);
}
