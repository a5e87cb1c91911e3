use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let total = app.manager.wallpapers().len();
    let count_info = if total == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", app.selected.min(total - 1) + 1, total)
    };

    let spans = vec![
        Span::styled(
            " wallpick ",
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.fg_muted)),
        Span::styled(count_info, Style::default().fg(theme.accent)),
        Span::styled(" │ ", Style::default().fg(theme.fg_muted)),
        Span::styled(
            format!("[{}]", app.ui.view.display_name()),
            Style::default().fg(theme.accent),
        ),
        Span::styled(" │ ", Style::default().fg(theme.fg_muted)),
        Span::styled(
            app.manager.wallpaper_dir().display().to_string(),
            Style::default().fg(theme.fg_primary),
        ),
        Span::styled(" │ ", Style::default().fg(theme.fg_muted)),
        Span::styled(
            app.previews.protocol_label(),
            Style::default().fg(theme.fg_secondary),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Last action result and thumbnail progress.
pub(super) fn draw_status(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let mut spans = Vec::new();
    if let Some(message) = &app.ui.status_message {
        let color = if message.starts_with("Failed") || message.contains("failed") {
            theme.warning
        } else {
            theme.success
        };
        spans.push(Span::styled(message.clone(), Style::default().fg(color)));
    }
    if let Some(progress) = app.prewarm_status() {
        if !spans.is_empty() {
            spans.push(Span::styled(" · ", Style::default().fg(theme.fg_muted)));
        }
        spans.push(Span::styled(progress, Style::default().fg(theme.fg_muted)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub(super) fn draw_footer(f: &mut Frame, area: Rect, theme: &Theme) {
    let hints = [
        ("←→/hl", "move"),
        ("↑↓/jk", "row"),
        ("Enter", "apply"),
        ("Tab", "view"),
        ("r", "rescan"),
        ("q", "quit"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, action) in hints {
        spans.push(Span::styled(key, Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(theme.fg_muted),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
