// coach-desk-tui/src/ui/editors.rs
use crate::app::state::{BlockField, WorkoutField};
use crate::app::App;
use crate::ui::layout::header_color;
use coach_desk_lib::Weekday;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

fn focused(style_on: bool) -> Style {
    if style_on {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

pub fn render_workout_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(editor) = app.workout_editor.as_mut() else {
        return;
    };
    let header = Style::new().bold().fg(header_color(&app.service));

    let block = Block::default()
        .title(format!("Workout for {}", editor.student.name))
        .borders(Borders::ALL)
        .title_style(header);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // name label
            Constraint::Length(1), // name input
            Constraint::Length(1), // goal label
            Constraint::Length(1), // goal input
            Constraint::Length(1), // weekday label
            Constraint::Length(1), // weekday row
            Constraint::Min(4),    // blocks table
            Constraint::Length(1), // buttons
        ])
        .split(area);

    f.render_widget(Paragraph::new("Workout name:"), chunks[0]);
    f.render_widget(
        Paragraph::new(editor.draft.name.as_str())
            .style(focused(editor.focused_field == WorkoutField::Name)),
        chunks[1],
    );
    f.render_widget(Paragraph::new("Goal:"), chunks[2]);
    f.render_widget(
        Paragraph::new(editor.draft.goal.as_str())
            .style(focused(editor.focused_field == WorkoutField::Goal)),
        chunks[3],
    );

    f.render_widget(Paragraph::new("Weekdays (space toggles):"), chunks[4]);
    let weekday_spans: Vec<Span> = Weekday::ALL
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let selected = editor.draft.weekdays.contains(day);
            let marker = if selected { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if editor.focused_field == WorkoutField::Weekdays && i == editor.weekday_cursor {
                style = style.reversed();
            }
            Span::styled(format!(" {marker} {day} "), style)
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(weekday_spans)), chunks[5]);

    let rows: Vec<Row> = editor
        .draft
        .blocks
        .iter()
        .map(|block| {
            Row::new(vec![
                Cell::from(block.name.clone()),
                Cell::from(block.muscle_groups.clone()),
                Cell::from(block.exercises.len().to_string()),
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
    .header(Row::new(vec!["Block", "Muscle groups", "Exercises"]).style(header))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Blocks (a: new, e: edit, d: remove)")
            .border_style(focused_border(editor.focused_field == WorkoutField::Blocks)),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(table, chunks[6], &mut editor.block_table_state);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[7]);
    f.render_widget(
        Paragraph::new(" Save workout ")
            .alignment(ratatui::layout::Alignment::Center)
            .style(focused(editor.focused_field == WorkoutField::Save)),
        buttons[0],
    );
    f.render_widget(
        Paragraph::new(" Cancel ")
            .alignment(ratatui::layout::Alignment::Center)
            .style(focused(editor.focused_field == WorkoutField::Cancel)),
        buttons[1],
    );

    match editor.focused_field {
        WorkoutField::Name => f.set_cursor(
            chunks[1].x + editor.draft.name.chars().count() as u16,
            chunks[1].y,
        ),
        WorkoutField::Goal => f.set_cursor(
            chunks[3].x + editor.draft.goal.chars().count() as u16,
            chunks[3].y,
        ),
        _ => {}
    }
}

pub fn render_block_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(editor) = app.block_editor.as_mut() else {
        return;
    };
    let header = Style::new().bold().fg(header_color(&app.service));

    let title = match editor.editing_index {
        Some(index) => format!("Edit block {} of '{}'", index + 1, editor.workout.name),
        None => format!("New block of '{}'", editor.workout.name),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .title_style(header);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // name label
            Constraint::Length(1), // name input
            Constraint::Length(1), // muscles label
            Constraint::Length(1), // muscles input
            Constraint::Length(1), // notes label
            Constraint::Length(1), // notes input
            Constraint::Min(4),    // exercise table
            Constraint::Length(1), // buttons
        ])
        .split(area);

    f.render_widget(Paragraph::new("Block name:"), chunks[0]);
    f.render_widget(
        Paragraph::new(editor.block.name.as_str())
            .style(focused(editor.focused_field == BlockField::Name)),
        chunks[1],
    );
    f.render_widget(Paragraph::new("Muscle groups:"), chunks[2]);
    f.render_widget(
        Paragraph::new(editor.block.muscle_groups.as_str())
            .style(focused(editor.focused_field == BlockField::Muscles)),
        chunks[3],
    );
    f.render_widget(Paragraph::new("Notes:"), chunks[4]);
    f.render_widget(
        Paragraph::new(editor.block.notes.as_str())
            .style(focused(editor.focused_field == BlockField::Notes)),
        chunks[5],
    );

    // Entries are shown with the catalog name resolved by id; a deleted
    // catalog entry renders as "Not found"
    let rows: Vec<Row> = editor
        .block
        .exercises
        .iter()
        .map(|entry| {
            let name = editor
                .catalog
                .iter()
                .find(|e| e.id.as_deref() == Some(entry.exercise_id.as_str()))
                .map(|e| e.name.clone())
                .unwrap_or_else(|| "Not found".to_string());
            Row::new(vec![
                Cell::from(name),
                Cell::from(entry.sets.to_string()),
                Cell::from(entry.reps.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(Row::new(vec!["Exercise", "Sets", "Reps"]).style(header))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Exercises (a: add, e: edit, d: remove)")
            .border_style(focused_border(editor.focused_field == BlockField::Exercises)),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(table, chunks[6], &mut editor.exercise_table_state);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[7]);
    f.render_widget(
        Paragraph::new(" Save block ")
            .alignment(ratatui::layout::Alignment::Center)
            .style(focused(editor.focused_field == BlockField::Save)),
        buttons[0],
    );
    f.render_widget(
        Paragraph::new(" Cancel ")
            .alignment(ratatui::layout::Alignment::Center)
            .style(focused(editor.focused_field == BlockField::Cancel)),
        buttons[1],
    );

    match editor.focused_field {
        BlockField::Name => f.set_cursor(
            chunks[1].x + editor.block.name.chars().count() as u16,
            chunks[1].y,
        ),
        BlockField::Muscles => f.set_cursor(
            chunks[3].x + editor.block.muscle_groups.chars().count() as u16,
            chunks[3].y,
        ),
        BlockField::Notes => f.set_cursor(
            chunks[5].x + editor.block.notes.chars().count() as u16,
            chunks[5].y,
        ),
        _ => {}
    }
}

fn focused_border(style_on: bool) -> Style {
    if style_on {
        Style::new().yellow()
    } else {
        Style::default()
    }
}
