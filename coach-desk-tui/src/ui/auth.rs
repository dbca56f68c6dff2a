// coach-desk-tui/src/ui/auth.rs
use crate::app::state::{AdminSignInField, RegisterAdminField};
use crate::app::App;
use crate::ui::layout::{centered_rect, header_color};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn focused(style_on: bool) -> Style {
    if style_on {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

pub fn render_student_sign_in(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Coach Desk - Student Sign-in")
        .borders(Borders::ALL)
        .title_style(Style::new().bold().fg(header_color(&app.service)));
    let form_area = centered_rect(50, 35, area);
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(form_area);

    f.render_widget(Paragraph::new("Student e-mail:"), chunks[0]);
    f.render_widget(
        Paragraph::new(app.student_sign_in.email_input.as_str()).style(Style::default().reversed()),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new("Enter: sign in   Tab: I am an administrator   Esc: quit")
            .alignment(Alignment::Center)
            .style(Style::new().italic()),
        chunks[3],
    );

    f.set_cursor(
        chunks[1].x + app.student_sign_in.email_input.chars().count() as u16,
        chunks[1].y,
    );
}

pub fn render_admin_sign_in(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Coach Desk - Administrator Sign-in")
        .borders(Borders::ALL)
        .title_style(Style::new().bold().fg(header_color(&app.service)));
    let form_area = centered_rect(50, 50, area);
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // email label
            Constraint::Length(1), // email input
            Constraint::Length(1), // password label
            Constraint::Length(1), // password input
            Constraint::Length(1),
            Constraint::Length(1), // buttons
            Constraint::Length(2), // hint
        ])
        .split(form_area);

    let form = &app.admin_sign_in;
    f.render_widget(Paragraph::new("E-mail:"), chunks[0]);
    f.render_widget(
        Paragraph::new(form.email_input.as_str())
            .style(focused(form.focused_field == AdminSignInField::Email)),
        chunks[1],
    );
    f.render_widget(Paragraph::new("Password:"), chunks[2]);
    let masked: String = form.password_input.chars().map(|_| '*').collect();
    f.render_widget(
        Paragraph::new(masked)
            .style(focused(form.focused_field == AdminSignInField::Password)),
        chunks[3],
    );

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[5]);
    f.render_widget(
        Paragraph::new(" Sign in ")
            .alignment(Alignment::Center)
            .style(focused(form.focused_field == AdminSignInField::Confirm)),
        buttons[0],
    );
    f.render_widget(
        Paragraph::new(" Forgot password ")
            .alignment(Alignment::Center)
            .style(focused(form.focused_field == AdminSignInField::Reset)),
        buttons[1],
    );
    f.render_widget(
        Paragraph::new(" Register ")
            .alignment(Alignment::Center)
            .style(focused(form.focused_field == AdminSignInField::Register)),
        buttons[2],
    );

    f.render_widget(
        Paragraph::new("Esc: back to student sign-in")
            .alignment(Alignment::Center)
            .style(Style::new().italic()),
        chunks[6],
    );

    match form.focused_field {
        AdminSignInField::Email => f.set_cursor(
            chunks[1].x + form.email_input.chars().count() as u16,
            chunks[1].y,
        ),
        AdminSignInField::Password => f.set_cursor(
            chunks[3].x + form.password_input.chars().count() as u16,
            chunks[3].y,
        ),
        _ => {}
    }
}

pub fn render_register_admin(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Register Administrator")
        .borders(Borders::ALL)
        .title_style(Style::new().bold().fg(header_color(&app.service)));
    let form_area = centered_rect(50, 60, area);
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(form_area);

    let form = &app.register_admin;
    f.render_widget(Paragraph::new("Name:"), chunks[0]);
    f.render_widget(
        Paragraph::new(form.name_input.as_str())
            .style(focused(form.focused_field == RegisterAdminField::Name)),
        chunks[1],
    );
    f.render_widget(Paragraph::new("E-mail:"), chunks[2]);
    f.render_widget(
        Paragraph::new(form.email_input.as_str())
            .style(focused(form.focused_field == RegisterAdminField::Email)),
        chunks[3],
    );
    f.render_widget(Paragraph::new("Password (min 6 characters):"), chunks[4]);
    let masked: String = form.password_input.chars().map(|_| '*').collect();
    f.render_widget(
        Paragraph::new(masked)
            .style(focused(form.focused_field == RegisterAdminField::Password)),
        chunks[5],
    );
    f.render_widget(Paragraph::new("Repeat password:"), chunks[6]);
    let masked_repeat: String = form.password_repeat_input.chars().map(|_| '*').collect();
    f.render_widget(
        Paragraph::new(masked_repeat)
            .style(focused(form.focused_field == RegisterAdminField::PasswordRepeat)),
        chunks[7],
    );

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[9]);
    f.render_widget(
        Paragraph::new(" Register ")
            .alignment(Alignment::Center)
            .style(focused(form.focused_field == RegisterAdminField::Confirm)),
        buttons[0],
    );
    f.render_widget(
        Paragraph::new(" Cancel ")
            .alignment(Alignment::Center)
            .style(focused(form.focused_field == RegisterAdminField::Cancel)),
        buttons[1],
    );

    match form.focused_field {
        RegisterAdminField::Name => f.set_cursor(
            chunks[1].x + form.name_input.chars().count() as u16,
            chunks[1].y,
        ),
        RegisterAdminField::Email => f.set_cursor(
            chunks[3].x + form.email_input.chars().count() as u16,
            chunks[3].y,
        ),
        RegisterAdminField::Password => f.set_cursor(
            chunks[5].x + form.password_input.chars().count() as u16,
            chunks[5].y,
        ),
        RegisterAdminField::PasswordRepeat => f.set_cursor(
            chunks[7].x + form.password_repeat_input.chars().count() as u16,
            chunks[7].y,
        ),
        _ => {}
    }
}
