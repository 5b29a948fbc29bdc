use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Chart, Clear, Dataset, GraphType, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use super::widgets::{accent_color, tint_color, DOWNLOAD_COLOR, TICKER_COLOR, UPLOAD_COLOR};
use crate::core::dashboard::{ChartView, Glyph, PanelView, Scene, TickerView};

/// Rows reserved for the network chart at the bottom of the screen.
pub const CHART_HEIGHT: u16 = 8;

/// Main render function
pub fn render_scene(frame: &mut Frame, scene: &Scene) {
    frame.render_widget(SceneView::new(scene), frame.area());
}

/// A whole dashboard frame: rain, chart, panel, ticker (back to front).
pub struct SceneView<'a> {
    scene: &'a Scene,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scene = self.scene;

        RainLayer {
            glyphs: &scene.glyphs,
            cell_width: scene.cell_width,
            cell_height: scene.cell_height,
        }
        .render(area, buf);

        render_chart(&scene.chart, chart_area(area), buf);
        render_panel(&scene.panel, area, buf);
        render_ticker(&scene.ticker, area, buf);
    }
}

/// Glyphs of the current rain tick, painted without clearing.
struct RainLayer<'a> {
    glyphs: &'a [Glyph],
    cell_width: u16,
    cell_height: u16,
}

impl Widget for RainLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for glyph in self.glyphs {
            let x = area.x as usize + glyph.column * self.cell_width.max(1) as usize;
            let y = area.y as usize + glyph.row * self.cell_height.max(1) as usize;
            if x >= area.right() as usize || y >= area.bottom() as usize {
                continue;
            }

            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                cell.set_char(glyph.ch).set_fg(tint_color(glyph.tint));
            }
        }
    }
}

fn chart_area(area: Rect) -> Rect {
    let height = CHART_HEIGHT.min(area.height);
    Rect {
        x: area.x,
        y: area.bottom() - height,
        width: area.width,
        height,
    }
}

fn render_chart(chart: &ChartView, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }

    let download = points(&chart.download);
    let upload = points(&chart.upload);
    let x_max = chart.capacity.saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(DOWNLOAD_COLOR))
            .data(&download),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(UPLOAD_COLOR))
            .data(&upload),
    ];

    Chart::new(datasets)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(Axis::default().bounds([0.0, chart.peak.max(1.0)]))
        .render(area, buf);

    buf.set_stringn(
        area.x,
        area.y,
        &chart.caption,
        area.width as usize,
        Style::default().fg(Color::White),
    );
}

fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn render_panel(panel: &PanelView, area: Rect, buf: &mut Buffer) {
    let width = panel
        .lines
        .iter()
        .map(|l| Line::from(l.as_str()).width())
        .max()
        .unwrap_or(0) as u16;
    let height = panel.lines.len() as u16;

    let rect = Rect {
        x: area.x.saturating_add(panel.x),
        y: area.y.saturating_add(panel.y),
        width,
        height,
    }
    .intersection(area);
    if rect.is_empty() {
        return;
    }

    let text: Vec<Line> = panel.lines.iter().map(|l| Line::from(l.as_str())).collect();

    Clear.render(rect, buf);
    Paragraph::new(text)
        .style(Style::default().fg(accent_color(panel.accent)))
        .render(rect, buf);
}

fn render_ticker(ticker: &TickerView, area: Rect, buf: &mut Buffer) {
    if ticker.row >= area.height {
        return;
    }

    if let Some((column, visible)) = visible_ticker(&ticker.text, ticker.x, area.width) {
        buf.set_stringn(
            area.x + column,
            area.y + ticker.row,
            &visible,
            (area.width - column) as usize,
            Style::default().fg(TICKER_COLOR),
        );
    }
}

/// Part of `text` visible when it starts at column `x` of a row `width`
/// cells wide, with the column it starts at.
///
/// Characters cut by either edge are dropped whole.
pub fn visible_ticker(text: &str, x: i32, width: u16) -> Option<(u16, String)> {
    let width = width as i64;
    let mut column = x as i64;
    let mut start = None;
    let mut visible = String::new();

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0) as i64;
        if column >= width {
            break;
        }
        if column >= 0 && column + ch_width <= width {
            start.get_or_insert(column);
            visible.push(ch);
        }
        column += ch_width;
    }

    start.map(|column| (column as u16, visible))
}
