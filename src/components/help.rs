use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{action::ActionState, config::{key_event_to_string, PageKeyBindings}};

const COLUMN_SPACING: u16 = 5;
const MARGIN_VERTICAL: u16 = 1;
const MARGIN_HORIZONTAL: u16 = 2;

/// Overlay listing the active keybindings, one bordered table per
/// binding group (global, then the current page).
#[derive(Debug)]
pub struct Help {
    groups: Vec<(String, Vec<(String, String)>)>,
}

impl Help {
    pub fn new(keybinding_groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = keybinding_groups
            .into_iter()
            .map(|(group_name, keybindings)| {
                let mut keybindings: Vec<(String, String)> = keybindings
                    .0
                    .into_iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(&event), action.command.string()))
                    .collect();
                keybindings.sort_by(|(a, _), (b, _)| a.cmp(b));
                (group_name, keybindings)
            })
            .collect();

        Self { groups }
    }

    fn render_group(&self, area: Rect, buf: &mut Buffer, name: &str, bindings: &[(String, String)], widths: (u16, u16)) {
        let rows: Vec<Row> = bindings.iter().map(|(key, val)| Row::new(vec![key.clone(), val.clone()])).collect();

        let table = Table::new(rows, [Constraint::Length(widths.0), Constraint::Min(widths.1)])
            .column_spacing(COLUMN_SPACING)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(name.to_string())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().bold().fg(Color::Cyan))
                    .padding(Padding::symmetric(MARGIN_HORIZONTAL, MARGIN_VERTICAL)),
            );

        Clear.render(area, buf);
        table.render(area, buf);
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_width = self
            .groups
            .iter()
            .flat_map(|(_, bindings)| bindings.iter().map(|(key, _)| key.len()))
            .max()
            .unwrap_or(0) as u16;
        let val_width = self
            .groups
            .iter()
            .flat_map(|(_, bindings)| bindings.iter().map(|(_, val)| val.len()))
            .max()
            .unwrap_or(0) as u16;

        // Column spacing, padding and borders around the table body.
        let width = key_width + val_width + COLUMN_SPACING + (MARGIN_HORIZONTAL * 2) + 2;
        let heights: Vec<u16> = self
            .groups
            .iter()
            // Rows plus padding, header and borders.
            .map(|(_, bindings)| bindings.len() as u16 + (MARGIN_VERTICAL * 2) + 2 + 2)
            .collect();

        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let areas = Layout::vertical(heights.iter().map(|h| Constraint::Length(*h)).collect::<Vec<_>>())
            .flex(Flex::Center)
            .split(area);

        for (i, (name, bindings)) in self.groups.iter().enumerate() {
            self.render_group(areas[i], buf, name, bindings, (key_width, val_width));
        }
    }
}
