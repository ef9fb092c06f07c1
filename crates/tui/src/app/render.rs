use super::*;
use carbon_signal_api::IntensityBand;
use crate::input::FormField;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const STATUS_HEIGHT: u16 = 1;

impl App<Screen> {
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)])
            .split(area);

        let panel = self.centered_rect(70, 60, layout[0]);
        match self.view.kind {
            ScreenKind::Form => self.render_form(frame, panel),
            ScreenKind::Loading => self.render_loading(frame, panel),
            ScreenKind::Result(ref report) => self.render_result(frame, panel, report),
            ScreenKind::Error(ref message) => self.render_error(frame, panel, message),
        }

        self.render_status(frame, layout[1]);

        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let form = &self.view.form;
        let field_style = |field: FormField| {
            if form.focused == field {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }
        };
        let cursor = |field: FormField| if form.focused == field { "█" } else { "" };

        let lines = vec![
            Line::from(""),
            Line::from("  Enter your API key and region code:"),
            Line::from(""),
            Line::from(vec![
                Span::raw("  API key: "),
                Span::styled(
                    format!("{}{}", form.masked_api_key(), cursor(FormField::ApiKey)),
                    field_style(FormField::ApiKey),
                ),
            ]),
            Line::from(vec![
                Span::raw("  Region:  "),
                Span::styled(
                    format!("{}{}", form.region, cursor(FormField::Region)),
                    field_style(FormField::Region),
                ),
            ]),
            Line::from(""),
            Line::from("  Region codes look like DK, DE or US-CAL-CISO."),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" carbon-signal - Setup "),
            ),
            area,
        );
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new("\n\n  Loading...  \n\n")
            .block(Block::default().borders(Borders::ALL).title(" carbon-signal "))
            .centered();
        frame.render_widget(paragraph, area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect, report: &RegionReport) {
        let band_style = Style::default()
            .fg(band_color(report.band))
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  Region: "),
                Span::styled(report.region_label.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("  Carbon usage: "),
                Span::styled(report.usage_text.clone(), band_style),
            ]),
            Line::from(format!("  Fossil fuel percentage: {}", report.fossil_text)),
            Line::from(vec![
                Span::raw("  Intensity: "),
                Span::styled(report.band.label(), band_style),
            ]),
        ];
        if let Some(measured_at) = report.measured_at {
            lines.push(Line::from(format!(
                "  Measured at: {}",
                measured_at.format("%Y-%m-%d %H:%M UTC")
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" carbon-signal ")),
            area,
        );
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let paragraph = Paragraph::new(format!("\n\n  {message}\n"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" carbon-signal - Error "));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.last_error {
            Some(ref error) => Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                self.keybinds.hint(self.view.reset_visible),
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help_text = self.keybinds.help_text();
        let popup_area = self.centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press Esc to close "),
            ),
            popup_area,
        );
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
}

fn band_color(band: IntensityBand) -> Color {
    match band {
        IntensityBand::VeryLow => Color::Green,
        IntensityBand::Low => Color::LightGreen,
        IntensityBand::Moderate => Color::Yellow,
        IntensityBand::High => Color::LightRed,
        IntensityBand::VeryHigh => Color::Red,
    }
}
