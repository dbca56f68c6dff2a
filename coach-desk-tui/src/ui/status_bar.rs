// coach-desk-tui/src/ui/status_bar.rs
use crate::app::state::ActiveScreen;
use crate::app::App;
use coach_desk_lib::Session;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    // Errors and one-shot notices win over the hint line
    if let Some(err) = &app.last_error {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            area,
        );
        return;
    }

    let who = match &app.session {
        Some(Session::Administrator { name, .. }) => format!("admin: {name}"),
        Some(Session::Student { name, .. }) => format!("student: {name}"),
        None => "not signed in".to_string(),
    };

    let hint = match app.screen {
        ActiveScreen::StudentSignIn | ActiveScreen::AdminSignIn | ActiveScreen::RegisterAdmin => {
            "Enter: confirm  Tab: next  Esc: back"
        }
        ActiveScreen::Students => "n: new  e: edit  d: delete  w: workouts  x: exercises  ?: help",
        ActiveScreen::Exercises => "n: new  e: edit  d: delete  Esc: back  ?: help",
        ActiveScreen::Workouts => "n: new  e: edit  d: delete  Esc: back  ?: help",
        ActiveScreen::WorkoutEditor | ActiveScreen::BlockEditor => {
            "Tab: next field  Esc: cancel  ?: help"
        }
        ActiveScreen::MyWorkouts => "Tab: focus  b: data saver  o: sign out  ?: help",
    };

    f.render_widget(
        Paragraph::new(format!(" {who} | {hint}")).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
