// coach-desk-tui/src/ui/modals.rs
use crate::app::state::{ActiveModal, ExerciseField, PickerField, StudentField};
use crate::app::App;
use crate::ui::layout::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &mut App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::StudentForm { .. } => render_student_form_modal(f, app),
        ActiveModal::ExerciseForm { .. } => render_exercise_form_modal(f, app),
        ActiveModal::ExercisePicker { .. } => render_exercise_picker_modal(f, app),
        ActiveModal::ConfirmDeleteStudent { name, .. } => {
            render_confirm_modal(f, "Delete student", name);
        }
        ActiveModal::ConfirmDeleteExercise { name, .. } => {
            render_confirm_modal(f, "Delete exercise", name);
        }
        ActiveModal::ConfirmDeleteWorkout { name, .. } => {
            render_confirm_modal(f, "Delete workout", name);
        }
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn focused(style_on: bool) -> Style {
    if style_on {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Students ---").style(Style::new().bold().underlined()),
        Line::from(" /: Search (prefix match)   m: More results"),
        Line::from(" n: New   e/Enter: Edit   d: Delete (with workouts)"),
        Line::from(" w: Workouts of student   v: Preview student view"),
        Line::from(" x: Exercise catalog   o: Sign out   q: Quit"),
        Line::from(""),
        Line::from("--- Exercises ---").style(Style::new().bold().underlined()),
        Line::from(" n: New   e/Enter: Edit   d: Delete   Esc: Back"),
        Line::from(""),
        Line::from("--- Workouts ---").style(Style::new().bold().underlined()),
        Line::from(" n: New workout   e/Enter: Edit   d: Delete   Esc: Back"),
        Line::from(""),
        Line::from("--- Workout / Block editors ---").style(Style::new().bold().underlined()),
        Line::from(" Tab/Enter: Next field   Up: Previous field"),
        Line::from(" Blocks/Exercises list: a: Add  e: Edit  d: Remove"),
        Line::from(" Esc: Cancel and go back (edits are discarded)"),
        Line::from(""),
        Line::from("--- My workouts ---").style(Style::new().bold().underlined()),
        Line::from(" Tab: Focus workout/block/exercises   j/k: Select"),
        Line::from(" b: Toggle data saver   Enter: Show hidden image"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&ratatui::layout::Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_student_form_modal(f: &mut Frame, app: &App) {
    if let ActiveModal::StudentForm {
        id,
        name_input,
        email_input,
        goal_input,
        has_limitation,
        limitation_input,
        notes_input,
        focused_field,
        error_message,
    } = &app.active_modal
    {
        let title = if id.is_some() {
            "Edit Student"
        } else {
            "New Student"
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::new().yellow());
        let area = centered_rect(60, 70, f.size());
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // name label
                Constraint::Length(1), // name
                Constraint::Length(1), // email label
                Constraint::Length(1), // email
                Constraint::Length(1), // goal label
                Constraint::Length(1), // goal
                Constraint::Length(1), // limitation toggle
                Constraint::Length(1), // limitation label
                Constraint::Length(1), // limitation
                Constraint::Length(1), // notes label
                Constraint::Length(1), // notes
                Constraint::Length(1), // buttons
                Constraint::Length(1), // error
            ])
            .split(area.inner(&ratatui::layout::Margin {
                vertical: 1,
                horizontal: 1,
            }));

        f.render_widget(Paragraph::new("Name:"), chunks[0]);
        f.render_widget(
            Paragraph::new(name_input.as_str())
                .style(focused(*focused_field == StudentField::Name)),
            chunks[1],
        );
        f.render_widget(Paragraph::new("E-mail (login key):"), chunks[2]);
        f.render_widget(
            Paragraph::new(email_input.as_str())
                .style(focused(*focused_field == StudentField::Email)),
            chunks[3],
        );
        f.render_widget(Paragraph::new("Goal:"), chunks[4]);
        f.render_widget(
            Paragraph::new(goal_input.as_str())
                .style(focused(*focused_field == StudentField::Goal)),
            chunks[5],
        );

        let marker = if *has_limitation { "[x]" } else { "[ ]" };
        f.render_widget(
            Paragraph::new(format!("{marker} Has a physical limitation (space toggles)"))
                .style(focused(*focused_field == StudentField::HasLimitation)),
            chunks[6],
        );
        f.render_widget(Paragraph::new("Limitation description:"), chunks[7]);
        f.render_widget(
            Paragraph::new(limitation_input.as_str())
                .style(focused(*focused_field == StudentField::Limitation)),
            chunks[8],
        );
        f.render_widget(Paragraph::new("Notes:"), chunks[9]);
        f.render_widget(
            Paragraph::new(notes_input.as_str())
                .style(focused(*focused_field == StudentField::Notes)),
            chunks[10],
        );

        render_ok_cancel(
            f,
            chunks[11],
            *focused_field == StudentField::Confirm,
            *focused_field == StudentField::Cancel,
        );

        if let Some(err) = error_message {
            f.render_widget(
                Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
                chunks[12],
            );
        }

        match focused_field {
            StudentField::Name => {
                f.set_cursor(chunks[1].x + name_input.chars().count() as u16, chunks[1].y);
            }
            StudentField::Email => {
                f.set_cursor(chunks[3].x + email_input.chars().count() as u16, chunks[3].y);
            }
            StudentField::Goal => {
                f.set_cursor(chunks[5].x + goal_input.chars().count() as u16, chunks[5].y);
            }
            StudentField::Limitation => f.set_cursor(
                chunks[8].x + limitation_input.chars().count() as u16,
                chunks[8].y,
            ),
            StudentField::Notes => {
                f.set_cursor(chunks[10].x + notes_input.chars().count() as u16, chunks[10].y);
            }
            _ => {}
        }
    }
}

fn render_exercise_form_modal(f: &mut Frame, app: &App) {
    if let ActiveModal::ExerciseForm {
        id,
        name_input,
        muscles_input,
        description_input,
        media_path_input,
        current_media_url,
        focused_field,
        error_message,
    } = &app.active_modal
    {
        let title = if id.is_some() {
            "Edit Exercise"
        } else {
            "New Exercise"
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::new().yellow());
        let area = centered_rect(60, 60, f.size());
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // name label
                Constraint::Length(1), // name
                Constraint::Length(1), // muscles label
                Constraint::Length(1), // muscles
                Constraint::Length(1), // description label
                Constraint::Length(1), // description
                Constraint::Length(1), // media label
                Constraint::Length(1), // media path
                Constraint::Length(1), // current media
                Constraint::Length(1), // buttons
                Constraint::Length(1), // error
            ])
            .split(area.inner(&ratatui::layout::Margin {
                vertical: 1,
                horizontal: 1,
            }));

        f.render_widget(Paragraph::new("Name:"), chunks[0]);
        f.render_widget(
            Paragraph::new(name_input.as_str())
                .style(focused(*focused_field == ExerciseField::Name)),
            chunks[1],
        );
        f.render_widget(Paragraph::new("Muscle groups:"), chunks[2]);
        f.render_widget(
            Paragraph::new(muscles_input.as_str())
                .style(focused(*focused_field == ExerciseField::Muscles)),
            chunks[3],
        );
        f.render_widget(Paragraph::new("Description:"), chunks[4]);
        f.render_widget(
            Paragraph::new(description_input.as_str())
                .style(focused(*focused_field == ExerciseField::Description)),
            chunks[5],
        );
        f.render_widget(
            Paragraph::new("GIF file path (blank keeps current, '-' removes):"),
            chunks[6],
        );
        f.render_widget(
            Paragraph::new(media_path_input.as_str())
                .style(focused(*focused_field == ExerciseField::Media)),
            chunks[7],
        );
        let current = if current_media_url.is_empty() {
            "current media: none".to_string()
        } else {
            format!("current media: {current_media_url}")
        };
        f.render_widget(
            Paragraph::new(current).style(Style::new().italic()),
            chunks[8],
        );

        render_ok_cancel(
            f,
            chunks[9],
            *focused_field == ExerciseField::Confirm,
            *focused_field == ExerciseField::Cancel,
        );

        if let Some(err) = error_message {
            f.render_widget(
                Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
                chunks[10],
            );
        }

        match focused_field {
            ExerciseField::Name => {
                f.set_cursor(chunks[1].x + name_input.chars().count() as u16, chunks[1].y);
            }
            ExerciseField::Muscles => f.set_cursor(
                chunks[3].x + muscles_input.chars().count() as u16,
                chunks[3].y,
            ),
            ExerciseField::Description => f.set_cursor(
                chunks[5].x + description_input.chars().count() as u16,
                chunks[5].y,
            ),
            ExerciseField::Media => f.set_cursor(
                chunks[7].x + media_path_input.chars().count() as u16,
                chunks[7].y,
            ),
            _ => {}
        }
    }
}

fn render_exercise_picker_modal(f: &mut Frame, app: &mut App) {
    let catalog: Vec<String> = app
        .block_editor
        .as_ref()
        .map(|editor| editor.catalog.iter().map(|e| e.name.clone()).collect())
        .unwrap_or_default();

    if let ActiveModal::ExercisePicker {
        editing_position,
        sets_input,
        reps_input,
        catalog_state,
        focused_field,
        error_message,
    } = &mut app.active_modal
    {
        let title = if editing_position.is_some() {
            "Edit Exercise Entry"
        } else {
            "Add Exercise"
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::new().yellow());
        let area = centered_rect(50, 60, f.size());
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(5),    // catalog list
                Constraint::Length(1), // sets label + input
                Constraint::Length(1), // reps label + input
                Constraint::Length(1), // buttons
                Constraint::Length(1), // error
            ])
            .split(area.inner(&ratatui::layout::Margin {
                vertical: 1,
                horizontal: 1,
            }));

        let items: Vec<ListItem> = catalog.iter().map(|name| ListItem::new(name.as_str())).collect();
        let list_border = if *focused_field == PickerField::Exercise {
            Style::new().yellow()
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Exercise (j/k selects)")
                    .border_style(list_border),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(list, chunks[0], catalog_state);

        let sets_line = Line::from(vec![
            Span::raw("Sets: "),
            Span::styled(
                sets_input.clone(),
                focused(*focused_field == PickerField::Sets),
            ),
        ]);
        f.render_widget(Paragraph::new(sets_line), chunks[1]);

        let reps_line = Line::from(vec![
            Span::raw("Reps: "),
            Span::styled(
                reps_input.clone(),
                focused(*focused_field == PickerField::Reps),
            ),
        ]);
        f.render_widget(Paragraph::new(reps_line), chunks[2]);

        render_ok_cancel(
            f,
            chunks[3],
            *focused_field == PickerField::Confirm,
            *focused_field == PickerField::Cancel,
        );

        if let Some(err) = error_message {
            f.render_widget(
                Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
                chunks[4],
            );
        }
    }
}

fn render_confirm_modal(f: &mut Frame, title: &str, name: &str) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::new().red());
    let area = centered_rect(40, 20, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    f.render_widget(
        Paragraph::new(format!("Delete '{name}'?")).alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new("Enter/y: confirm   Esc/n: cancel")
            .alignment(Alignment::Center)
            .style(Style::new().italic()),
        chunks[1],
    );
}

fn render_ok_cancel(f: &mut Frame, area: Rect, ok_focused: bool, cancel_focused: bool) {
    let button_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ok_button = Paragraph::new(" OK ")
        .alignment(Alignment::Center)
        .style(focused(ok_focused));
    f.render_widget(ok_button, button_layout[0]);

    let cancel_button = Paragraph::new(" Cancel ")
        .alignment(Alignment::Center)
        .style(focused(cancel_focused));
    f.render_widget(cancel_button, button_layout[1]);
}
