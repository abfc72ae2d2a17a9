//! Ratatui-based terminal UI.
//!
//! Shows the series with the fitted polynomial of the selected method, the
//! per-method metrics, and a bar chart of solve times. The polynomial order and
//! method can be changed live; synthetic series can be reseeded.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::{fit_series, load_series, RunOutput};
use crate::domain::{FitConfig, Method, SourceKind};
use crate::error::AppError;
use crate::math::evaluate;
use crate::report::{fmt_coeffs, fmt_duration};

mod plotters_chart;

use plotters_chart::FitPlottersChart;

/// Start the TUI.
pub fn run(config: FitConfig) -> Result<(), AppError> {
    // Load before touching the terminal so errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: FitConfig,
    status: String,
    run: RunOutput,
}

impl App {
    fn new(config: FitConfig) -> Result<Self, AppError> {
        let series = load_series(&config)?;
        let run = fit_series(series, config.order.max(1))?;
        Ok(Self {
            status: format!("Loaded {} points.", run.series.len()),
            config,
            run,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Left => self.set_order(self.config.order.saturating_sub(1))?,
            KeyCode::Right => self.set_order(self.config.order.saturating_add(1))?,
            KeyCode::Char('m') => {
                self.config.method = self.config.method.next();
                self.status = format!("method: {}", self.config.method.display_name());
            }
            KeyCode::Char('r') => self.reseed()?,
            _ => {}
        }
        Ok(false)
    }

    fn set_order(&mut self, order: usize) -> Result<(), AppError> {
        let order = order.clamp(1, self.run.split.train.len().max(1));
        if order == self.config.order {
            self.status = format!("order stays at {order}");
            return Ok(());
        }
        self.config.order = order;
        self.refit()?;
        self.status = format!("order: {order} (degree {})", order - 1);
        Ok(())
    }

    fn reseed(&mut self) -> Result<(), AppError> {
        if self.config.source != SourceKind::Synthetic {
            self.status = "Reseeding only applies to the synthetic source.".to_string();
            return Ok(());
        }
        self.config.seed = self.config.seed.wrapping_add(1);
        match load_series(&self.config) {
            Ok(series) => {
                self.run = fit_series(series, self.config.order)?;
                self.status = format!("Resampled with seed {}.", self.config.seed);
                log::debug!("tui reseeded to {}", self.config.seed);
            }
            Err(err) => self.status = format!("Resample failed: {err}"),
        }
        Ok(())
    }

    fn refit(&mut self) -> Result<(), AppError> {
        self.run = fit_series(self.run.series.clone(), self.config.order)?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("plsq", Style::default().fg(Color::Cyan)),
            Span::raw(" - normal equations vs Householder QR"),
        ]));

        let series = &self.run.series;
        let dates = series
            .stats()
            .and_then(|s| s.first_date.zip(s.last_date))
            .map(|(a, b)| format!(" | {a}..{b}"))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!(
                "{} | n={} (train {} / validation {}){dates} | order: {} | showing: {}",
                series.label,
                series.len(),
                self.run.split.train.len(),
                self.run.split.validation.len(),
                self.config.order,
                self.config.method.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)])
            .split(chunks[1]);
        self.draw_metrics(frame, side[0]);
        self.draw_timings(frame, side[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Fit ({})", self.config.method.short_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let data = chart_data(&self.run, self.config.method, 200);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = FitPlottersChart {
            curve: &data.curve,
            train: &data.train,
            validation: &data.validation,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, data.x_bounds, data.y_bounds);
        }
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for outcome in &self.run.comparison.outcomes {
            let selected = outcome.method == self.config.method;
            let title_style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled(outcome.method.display_name(), title_style)));
            match &outcome.result {
                Ok(fit) => {
                    lines.push(Line::from(format!("  MSE  {:.6}", fit.validation.mse)));
                    lines.push(Line::from(format!("  x    {}", fmt_coeffs(&fit.coeffs))));
                    if let Some(dev) = fit.reference_deviation {
                        lines.push(Line::from(format!("  svd  {dev:.2e}")));
                    }
                }
                Err(err) => lines.push(Line::from(Span::styled(
                    format!("  failed: {err}"),
                    Style::default().fg(Color::Red),
                ))),
            }
            lines.push(Line::from(format!("  time {}", fmt_duration(outcome.elapsed))));
        }
        if let Some(diff) = self.run.comparison.method_agreement() {
            lines.push(Line::from(Span::styled(
                format!("max |Δx| = {diff:.2e}"),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Methods").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_timings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bars: Vec<Bar> = self
            .run
            .comparison
            .outcomes
            .iter()
            .map(|o| {
                let color = if o.result.is_ok() { Color::Cyan } else { Color::Red };
                Bar::default()
                    .value(o.elapsed.as_micros().min(u128::from(u64::MAX)) as u64)
                    .label(Line::from(o.method.short_name()))
                    .text_value(fmt_duration(o.elapsed))
                    .style(Style::default().fg(color))
            })
            .collect();

        let inner_width = area.width.saturating_sub(2);
        let bar_width = (inner_width.saturating_sub(2) / 2).clamp(3, 14);
        let chart = BarChart::default()
            .block(Block::default().title("Solve time (µs)").borders(Borders::ALL))
            .bar_width(bar_width)
            .bar_gap(2)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ order  m method  r reseed  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart series and bounds for one frame.
#[derive(Debug, Clone)]
struct ChartData {
    curve: Vec<(f64, f64)>,
    train: Vec<(f64, f64)>,
    validation: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters.
///
/// Bounds follow the observations only; high-order curves may leave the chart.
fn chart_data(run: &RunOutput, method: Method, samples: usize) -> ChartData {
    let pairs = |t: &[f64], y: &[f64]| t.iter().copied().zip(y.iter().copied()).collect::<Vec<_>>();
    let train = pairs(&run.split.train.t, &run.split.train.y);
    let validation = pairs(&run.split.validation.t, &run.split.validation.y);

    let (mut t0, mut t1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(t, y) in train.iter().chain(&validation) {
        t0 = t0.min(t);
        t1 = t1.max(t);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !t0.is_finite() || !t1.is_finite() || t1 <= t0 {
        t0 = 0.0;
        t1 = 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    let curve = match run.comparison.outcome(method).and_then(|o| o.fit()) {
        Some(fit) => {
            let n = samples.max(2);
            (0..n)
                .map(|i| {
                    let u = i as f64 / (n as f64 - 1.0);
                    let t = t0 + u * (t1 - t0);
                    (t, evaluate(&fit.coeffs, t))
                })
                .collect()
        }
        None => Vec::new(),
    };

    ChartData {
        curve,
        train,
        validation,
        x_bounds: [t0, t1],
        y_bounds: [y_min - pad, y_max + pad],
    }
}

fn fmt_axis(v: f64) -> String {
    if v.abs() >= 1e4 {
        format!("{v:.1e}")
    } else {
        format!("{v:.1}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("t")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("y")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
