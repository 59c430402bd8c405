use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Candle;

/// Chart errors
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("Chart surface '{surface}' is still bound to instance #{existing}")]
    SurfaceBusy { surface: String, existing: u64 },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// A candle in the renderer's point shape: OHLC keyed to a time axis
#[derive(Debug, Clone, PartialEq)]
pub struct CandlePoint {
    pub x: DateTime<Utc>,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

/// Convert candles to chart points, dropping bars that cannot be plotted
pub fn to_points(candles: &[Candle]) -> Vec<CandlePoint> {
    let mut points = Vec::with_capacity(candles.len());
    for candle in candles {
        let finite = [candle.open, candle.high, candle.low, candle.close]
            .iter()
            .all(|v| v.is_finite());
        let x = DateTime::<Utc>::from_timestamp_millis(candle.time);

        match (x, finite) {
            (Some(x), true) => points.push(CandlePoint {
                x,
                o: candle.open,
                h: candle.high,
                l: candle.low,
                c: candle.close,
            }),
            _ => warn!("Dropping unplottable candle at {}", candle.time),
        }
    }
    points
}

/// The fixed element the chart is drawn into.
///
/// Exactly one instance may be bound at a time; binding a second one while
/// the first is live fails, the same way a canvas refuses a second chart.
#[derive(Debug)]
pub struct ChartSurface {
    id: String,
    bound: Option<u64>,
    listeners: usize,
    disposed: u64,
    markup: String,
}

impl ChartSurface {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bound: None,
            listeners: 0,
            disposed: 0,
            markup: String::new(),
        }
    }

    fn bind(&mut self, instance_id: u64, markup: String) -> Result<(), ChartError> {
        if let Some(existing) = self.bound {
            return Err(ChartError::SurfaceBusy {
                surface: self.id.clone(),
                existing,
            });
        }
        self.bound = Some(instance_id);
        self.listeners += 1;
        self.markup = markup;
        Ok(())
    }

    fn release(&mut self, instance_id: u64) {
        if self.bound == Some(instance_id) {
            self.bound = None;
            self.listeners -= 1;
            self.disposed += 1;
            self.markup.clear();
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of chart instances currently bound (0 or 1)
    pub fn live_instances(&self) -> usize {
        usize::from(self.bound.is_some())
    }

    /// Listeners registered on the surface by live instances
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    /// How many instances have been torn down so far
    pub fn disposed_count(&self) -> u64 {
        self.disposed
    }

    /// Current SVG markup, empty when nothing is bound
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// A drawn chart bound to the surface
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    points: Vec<CandlePoint>,
}

impl ChartInstance {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn points(&self) -> &[CandlePoint] {
        &self.points
    }

    /// Unbind from the surface. Consumes the instance so it cannot be reused.
    fn dispose(self, surface: &mut ChartSurface) {
        debug!("Disposing chart instance #{}", self.id);
        surface.release(self.id);
    }
}

/// Sole owner of the chart surface and of the instance drawn on it
#[derive(Debug)]
pub struct ChartRenderer {
    surface: ChartSurface,
    current: Option<ChartInstance>,
    next_id: u64,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(surface_id: &str, width: u32, height: u32) -> Self {
        Self {
            surface: ChartSurface::new(surface_id),
            current: None,
            next_id: 1,
            size: (width, height),
        }
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    /// Replace the chart with one showing `candles`.
    ///
    /// Drawing happens off-surface first, so a drawing failure leaves the
    /// previous chart in place. Then the previous instance is disposed and the
    /// new one bound. An empty sequence yields an empty chart.
    pub fn render_candles(&mut self, candles: &[Candle]) -> Result<u64, ChartError> {
        let points = to_points(candles);
        let markup = draw_svg(&points, self.size)?;

        if let Some(previous) = self.current.take() {
            previous.dispose(&mut self.surface);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.surface.bind(id, markup)?;
        debug!("Bound chart instance #{} with {} candles", id, points.len());
        self.current = Some(ChartInstance { id, points });

        Ok(id)
    }
}

fn price_bounds(points: &[CandlePoint]) -> (f64, f64) {
    let min_price = points.iter().map(|p| p.l).fold(f64::INFINITY, f64::min);
    let max_price = points.iter().map(|p| p.h).fold(f64::NEG_INFINITY, f64::max);

    // Add some padding to the price range
    let price_range = (max_price - min_price).max(1e-8);
    let padding = price_range * 0.1;
    ((min_price - padding).max(0.0), max_price + padding)
}

/// Draw a candlestick chart as an SVG document
pub fn draw_svg(points: &[CandlePoint], size: (u32, u32)) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Draw(format!("Failed to fill canvas: {}", e)))?;

        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            let (y_min, y_max) = price_bounds(points);

            let x_min = first.x;
            let mut x_max = last.x;
            if x_max <= x_min {
                x_max = x_min + Duration::minutes(1);
            }

            let bar_width = ((size.0 as usize * 6 / 10) / points.len()).clamp(1, 12) as u32;

            let mut chart = ChartBuilder::on(&root)
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(|e| ChartError::Draw(format!("Failed to build chart: {}", e)))?;

            chart
                .configure_mesh()
                .x_labels(8)
                .x_label_formatter(&|t: &DateTime<Utc>| t.format("%m-%d %H:%M").to_string())
                .y_label_formatter(&|p: &f64| format!("{:.2}", p))
                .draw()
                .map_err(|e| ChartError::Draw(format!("Failed to draw mesh: {}", e)))?;

            chart
                .draw_series(points.iter().map(|p| {
                    CandleStick::new(p.x, p.o, p.h, p.l, p.c, GREEN.filled(), RED.filled(), bar_width)
                }))
                .map_err(|e| ChartError::Draw(format!("Failed to draw candles: {}", e)))?;
        }

        root.present()
            .map_err(|e| ChartError::Draw(format!("Failed to render chart: {}", e)))?;
    }

    Ok(svg)
}
