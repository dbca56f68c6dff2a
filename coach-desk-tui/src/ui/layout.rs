// coach-desk-tui/src/ui/layout.rs
use crate::app::{state::ActiveModal, state::ActiveScreen, App};
use crate::ui::{
    auth::{render_admin_sign_in, render_register_admin, render_student_sign_in},
    editors::{render_block_editor, render_workout_editor},
    lists::{render_exercises, render_students, render_workouts},
    modals::render_modal,
    status_bar::render_status_bar,
    viewer::render_viewer,
};
use coach_desk_lib::{parse_color, AppService, StandardColor};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    Frame,
};

// Main UI rendering function
pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Content above, status bar at the bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    render_main_content(f, app, main_chunks[0]);
    render_status_bar(f, app, main_chunks[1]);

    // Render modal last if active
    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    match app.screen {
        ActiveScreen::StudentSignIn => render_student_sign_in(f, app, area),
        ActiveScreen::AdminSignIn => render_admin_sign_in(f, app, area),
        ActiveScreen::RegisterAdmin => render_register_admin(f, app, area),
        ActiveScreen::Students => render_students(f, app, area),
        ActiveScreen::Exercises => render_exercises(f, app, area),
        ActiveScreen::Workouts => render_workouts(f, app, area),
        ActiveScreen::WorkoutEditor => render_workout_editor(f, app, area),
        ActiveScreen::BlockEditor => render_block_editor(f, app, area),
        ActiveScreen::MyWorkouts => render_viewer(f, app, area),
    }
}

/// The configured header color, falling back to green on a bad name.
pub fn header_color(service: &AppService) -> Color {
    match parse_color(&service.config.theme.header_color) {
        Ok(color) => standard_to_color(color),
        Err(_) => Color::Green,
    }
}

fn standard_to_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::Red,
        StandardColor::Green => Color::Green,
        StandardColor::Yellow => Color::Yellow,
        StandardColor::Blue => Color::Blue,
        StandardColor::Magenta => Color::Magenta,
        StandardColor::Cyan => Color::Cyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::Grey => Color::Gray,
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
