use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Multi-line ASCII art positioned by a cell offset inside the render
/// area. Negative offsets let art slide off any edge (cells outside the
/// area are clipped) and whitespace can be made transparent so layered
/// sprites do not punch holes in whatever is behind them.
#[derive(Debug, Default, Clone)]
pub struct Sprite {
    lines: Vec<String>,
    origin: (i32, i32),
    style: Style,
    transparent: bool,
}

impl Sprite {
    /// Builds from a raw-string block, dropping empty lines the way
    /// art constants are written.
    pub fn new(art: &str) -> Self {
        let lines = art.lines().filter(|line| !line.is_empty()).map(str::to_string).collect();
        Sprite { lines, origin: (0, 0), style: Style::default(), transparent: false }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Sprite { lines, origin: (0, 0), style: Style::default(), transparent: false }
    }

    pub fn origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// (width, height) in cells.
    pub fn size(&self) -> (u16, u16) {
        let width = self.lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        (width, self.lines.len() as u16)
    }
}

impl Widget for Sprite {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, line) in self.lines.iter().enumerate() {
            let y = self.origin.1 + row as i32;
            if y < 0 || y >= area.height as i32 {
                continue;
            }
            for (col, ch) in line.chars().enumerate() {
                if self.transparent && ch.is_whitespace() {
                    continue;
                }
                let x = self.origin.0 + col as i32;
                if x < 0 || x >= area.width as i32 {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + x as u16, area.y + y as u16)) {
                    cell.set_char(ch);
                    cell.set_style(self.style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::buffer::Buffer;

    use super::*;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.cell((x, y)).unwrap().symbol()
    }

    #[test]
    fn test_renders_at_origin() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        Sprite::new("ab\ncd").origin(2, 1).render(Rect::new(0, 0, 10, 4), &mut buf);
        assert_eq!(symbol(&buf, 2, 1), "a");
        assert_eq!(symbol(&buf, 3, 1), "b");
        assert_eq!(symbol(&buf, 2, 2), "c");
        assert_eq!(symbol(&buf, 3, 2), "d");
    }

    #[test]
    fn test_clips_negative_origin() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        Sprite::new("xyz").origin(-2, 0).render(Rect::new(0, 0, 10, 4), &mut buf);
        // Only the last column survives the clip.
        assert_eq!(symbol(&buf, 0, 0), "z");
        assert_eq!(symbol(&buf, 1, 0), " ");
    }

    #[test]
    fn test_transparent_whitespace_preserves_underlying_cells() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        Sprite::new("###").origin(0, 0).render(area, &mut buf);
        Sprite::new("o o").origin(0, 0).transparent(true).render(area, &mut buf);
        assert_eq!(symbol(&buf, 0, 0), "o");
        assert_eq!(symbol(&buf, 1, 0), "#");
        assert_eq!(symbol(&buf, 2, 0), "o");
    }

    #[test]
    fn test_size_reports_widest_line() {
        let sprite = Sprite::new("ab\nabcd\na");
        assert_eq!(sprite.size(), (4, 3));
    }
}
