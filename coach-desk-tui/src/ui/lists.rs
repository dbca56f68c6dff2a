// coach-desk-tui/src/ui/lists.rs
use crate::app::App;
use crate::ui::layout::header_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

fn header_style(app: &App) -> Style {
    Style::new().bold().fg(header_color(&app.service))
}

pub fn render_students(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // Search bar (prefix search, not substring)
    let search_style = if app.students.search_focused {
        Style::default().reversed()
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.students.search_input.as_str())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title("Search students (/)"));
    f.render_widget(search, chunks[0]);
    if app.students.search_focused {
        f.set_cursor(
            chunks[0].x + 1 + app.students.search_input.chars().count() as u16,
            chunks[0].y + 1,
        );
    }

    let more = if app.students.next_cursor.is_some() {
        " - m: more results"
    } else {
        ""
    };
    let title = format!("Students ({}){}", app.students.list.len(), more);

    let rows: Vec<Row> = app
        .students
        .list
        .iter()
        .map(|student| {
            Row::new(vec![
                Cell::from(student.name.clone()),
                Cell::from(student.email.clone()),
                Cell::from(student.goal.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new(vec!["Name", "E-mail", "Goal"]).style(header_style(app)))
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, chunks[1], &mut app.students.table_state);
}

pub fn render_exercises(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .exercises
        .list
        .iter()
        .map(|exercise| {
            let media = if exercise.media_url.is_empty() {
                "-"
            } else {
                "yes"
            };
            Row::new(vec![
                Cell::from(exercise.name.clone()),
                Cell::from(exercise.muscle_groups.clone()),
                Cell::from(media),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(45),
            Constraint::Percentage(15),
        ],
    )
    .header(Row::new(vec!["Exercise", "Muscle groups", "Media"]).style(header_style(app)))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Exercise catalog ({})", app.exercises.list.len())),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.exercises.table_state);
}

pub fn render_workouts(f: &mut Frame, app: &mut App, area: Rect) {
    let student_name = app
        .workouts
        .student
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_default();

    let rows: Vec<Row> = app
        .workouts
        .list
        .iter()
        .map(|workout| {
            let days: Vec<String> = workout.weekdays.iter().map(|d| d.to_string()).collect();
            Row::new(vec![
                Cell::from(workout.name.clone()),
                Cell::from(workout.goal.clone()),
                Cell::from(days.join(", ")),
                Cell::from(workout.blocks.len().to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(10),
        ],
    )
    .header(Row::new(vec!["Workout", "Goal", "Weekdays", "Blocks"]).style(header_style(app)))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Workouts of {student_name}")),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.workouts.table_state);
}
