use anyhow::Context as _;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Vec2};
use quakemap::{
    ui::controls::LayerKind, FeedRefresher, HexColor, HttpFeed, LayerControl, LayerControlEntry,
    LegendEntry, MapBuilder, MapSurface, MapView, MarkerStyle, Point, Popup, Position,
    QuakeMapConfig, SceneRecorder, TilePlacement, Viewport,
};
use std::sync::{Arc, Mutex, MutexGuard};

const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
const CONTROL_MARGIN: f32 = 10.0;

/// Earthquake map viewer
///
/// Usage: `quakemap-app [config.json] [--headless]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config_path = None;
    let mut headless = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--headless" => headless = true,
            _ => config_path = Some(arg),
        }
    }

    let config = match &config_path {
        Some(path) => QuakeMapConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => QuakeMapConfig::default(),
    };
    let feed = Arc::new(HttpFeed::new(config.feed_url.clone()));
    let mut map = MapBuilder::new()
        .with_config(config)
        .build()
        .context("invalid map configuration")?;

    if headless {
        // One fetch, one render pass, display list on stdout
        if let Err(err) = map.load(feed.as_ref()).await {
            log::warn!("rendering without earthquakes: {}", err);
        }
        let viewport = map.initial_viewport(Point::new(WINDOW_SIZE[0] as f64, WINDOW_SIZE[1] as f64));
        let mut recorder = SceneRecorder::new();
        map.render(&mut recorder, &viewport)?;
        println!("{}", recorder.to_json()?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title("Earthquake Map"),
        ..Default::default()
    };

    let map = Arc::new(Mutex::new(map));
    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |cc| Box::new(QuakeMapApp::new(cc, map, feed))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))?;

    Ok(())
}

enum LayerAction {
    SelectBase(String),
    SetOverlay(bool),
}

/// The main application struct
struct QuakeMapApp {
    map: Arc<Mutex<MapView>>,
    viewport: Viewport,
    _refresher: FeedRefresher,
}

impl QuakeMapApp {
    fn new(cc: &eframe::CreationContext<'_>, map: Arc<Mutex<MapView>>, feed: Arc<HttpFeed>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let (viewport, interval) = {
            let map = lock(&map);
            (
                map.initial_viewport(Point::new(WINDOW_SIZE[0] as f64, WINDOW_SIZE[1] as f64)),
                map.config().refresh_interval(),
            )
        };

        let refresher = FeedRefresher::spawn_with_notify(
            map.clone(),
            feed,
            interval,
            Some(Arc::new(move || ctx.request_repaint())),
        );

        Self {
            map,
            viewport,
            _refresher: refresher,
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, rect: Rect) {
        if response.dragged() {
            let delta = response.drag_delta();
            self.viewport.pan(Point::new(delta.x as f64, delta.y as f64));
        }

        let (zoom_delta, hover) = ui.input(|i| (i.zoom_delta(), i.pointer.hover_pos()));
        if response.hovered() && (zoom_delta - 1.0).abs() > f32::EPSILON {
            let focus = hover.map(|p| to_point(p, rect));
            let zoom = self.viewport.zoom + (zoom_delta as f64).log2();
            self.viewport.zoom_to(zoom, focus);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let point = to_point(pos, rect);
                let mut map = lock(&self.map);
                if let Some(id) = map.click(&self.viewport, &point) {
                    log::debug!("opened popup for {}", id);
                }
            }
        }
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgb(230, 230, 230)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.allocate_rect(rect, Sense::click_and_drag());
                self.viewport
                    .set_size(Point::new(rect.width() as f64, rect.height() as f64));
                self.handle_input(ui, &response, rect);

                let map = lock(&self.map);
                let mut surface = EguiSurface::new(ui.painter_at(rect), rect);
                if let Err(err) = map.render(&mut surface, &self.viewport) {
                    log::error!("render failed: {}", err);
                }
                drop(map);

                action = surface.show_layer_control(ctx);
                surface.show_attribution(ctx);
            });

        match action {
            Some(LayerAction::SelectBase(name)) => {
                if let Err(err) = lock(&self.map).select_base_layer(&name) {
                    log::warn!("{}", err);
                }
            }
            Some(LayerAction::SetOverlay(visible)) => lock(&self.map).set_overlay_visible(visible),
            None => {}
        }
    }
}

fn lock(map: &Mutex<MapView>) -> MutexGuard<'_, MapView> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn to_point(pos: Pos2, rect: Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn color(c: HexColor, opacity: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Tile attributions are HTML; show them as plain text
fn plain_attribution(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&copy;", "\u{a9}")
}

/// Paints the map with an egui painter. The layer control and attribution
/// are kept aside and shown as interactive areas once painting is done.
struct EguiSurface {
    painter: egui::Painter,
    rect: Rect,
    layer_control: Option<(Position, bool, Vec<LayerControlEntry>)>,
    attribution: String,
}

impl EguiSurface {
    fn new(painter: egui::Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            layer_control: None,
            attribution: String::new(),
        }
    }

    fn to_screen(&self, p: Point) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x as f32, self.rect.min.y + p.y as f32)
    }

    fn show_layer_control(&self, ctx: &egui::Context) -> Option<LayerAction> {
        let (position, collapsed, entries) = self.layer_control.as_ref()?;
        let (align, offset) = match position {
            Position::TopLeft => (Align2::LEFT_TOP, [CONTROL_MARGIN, CONTROL_MARGIN]),
            Position::TopRight => (Align2::RIGHT_TOP, [-CONTROL_MARGIN, CONTROL_MARGIN]),
            Position::BottomLeft => (Align2::LEFT_BOTTOM, [CONTROL_MARGIN, -CONTROL_MARGIN]),
            Position::BottomRight => (Align2::RIGHT_BOTTOM, [-CONTROL_MARGIN, -CONTROL_MARGIN]),
        };

        let mut action = None;
        egui::Area::new(egui::Id::new("layer_control"))
            .anchor(align, offset)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let mut rows = |ui: &mut egui::Ui| {
                        for entry in entries {
                            match entry.kind {
                                LayerKind::Base => {
                                    if ui.radio(entry.active, entry.name.as_str()).clicked() {
                                        action = Some(LayerAction::SelectBase(entry.name.clone()));
                                    }
                                }
                                LayerKind::Overlay => {
                                    let mut checked = entry.active;
                                    if ui.checkbox(&mut checked, entry.name.as_str()).changed() {
                                        action = Some(LayerAction::SetOverlay(checked));
                                    }
                                }
                            }
                        }
                    };
                    if *collapsed {
                        ui.collapsing("Layers", |ui| rows(ui));
                    } else {
                        rows(ui);
                    }
                });
            });
        action
    }

    fn show_attribution(&self, ctx: &egui::Context) {
        if self.attribution.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("attribution"))
            .anchor(Align2::LEFT_BOTTOM, [2.0, -2.0])
            .show(ctx, |ui| {
                ui.small(plain_attribution(&self.attribution));
            });
    }
}

impl MapSurface for EguiSurface {
    fn draw_tiles(
        &mut self,
        _layer: &str,
        tiles: &[TilePlacement],
        attribution: &str,
        opacity: f32,
    ) -> quakemap::Result<()> {
        // Imagery is not fetched; outline the tile grid instead
        let stroke = Stroke::new(1.0, Color32::from_gray(200).gamma_multiply(opacity));
        for tile in tiles {
            let min = self.to_screen(tile.origin);
            let rect = Rect::from_min_size(min, Vec2::splat(tile.size as f32));
            self.painter.rect_stroke(rect, Rounding::ZERO, stroke);
        }
        self.attribution = attribution.to_string();
        Ok(())
    }

    fn draw_circle_marker(
        &mut self,
        _id: &str,
        center: Point,
        style: &MarkerStyle,
        opacity: f32,
    ) -> quakemap::Result<()> {
        self.painter.circle(
            self.to_screen(center),
            style.radius as f32,
            color(style.fill_color, style.fill_opacity * opacity as f64),
            Stroke::new(style.stroke_weight as f32, color(style.stroke_color, opacity as f64)),
        );
        Ok(())
    }

    fn draw_layer_control(
        &mut self,
        control: &LayerControl,
        entries: &[LayerControlEntry],
    ) -> quakemap::Result<()> {
        self.layer_control = Some((control.position, control.collapsed, entries.to_vec()));
        Ok(())
    }

    fn draw_legend(
        &mut self,
        position: Position,
        title: &str,
        entries: &[LegendEntry],
    ) -> quakemap::Result<()> {
        let row_height = 20.0;
        let title_font = FontId::proportional(16.0);
        let row_font = FontId::proportional(13.0);
        let size = Point::new(170.0, 36.0 + row_height * entries.len() as f64);

        let container = Point::new(self.rect.width() as f64, self.rect.height() as f64);
        let top_left = self.to_screen(position.anchor(container, size, CONTROL_MARGIN as f64));
        let frame = Rect::from_min_size(top_left, Vec2::new(size.x as f32, size.y as f32));

        self.painter
            .rect_filled(frame, Rounding::same(5.0), Color32::from_white_alpha(220));
        self.painter.text(
            top_left + Vec2::new(8.0, 8.0),
            Align2::LEFT_TOP,
            title,
            title_font,
            Color32::BLACK,
        );

        for (i, entry) in entries.iter().enumerate() {
            let y = top_left.y + 34.0 + i as f32 * row_height as f32;
            let swatch = Rect::from_min_size(Pos2::new(top_left.x + 8.0, y), Vec2::new(18.0, 14.0));
            self.painter
                .rect_filled(swatch, Rounding::ZERO, color(entry.color, 1.0));
            self.painter.text(
                Pos2::new(swatch.max.x + 8.0, swatch.center().y),
                Align2::LEFT_CENTER,
                &entry.label,
                row_font.clone(),
                Color32::BLACK,
            );
        }
        Ok(())
    }

    fn draw_popup(&mut self, anchor: Point, popup: &Popup) -> quakemap::Result<()> {
        let text = popup.text();
        let font = FontId::proportional(13.0);
        let galley = self
            .painter
            .layout_no_wrap(text.clone(), font.clone(), Color32::BLACK);
        let padding = Vec2::splat(8.0);
        let size = galley.size() + padding * 2.0;

        let tip = self.to_screen(anchor);
        let rect = Rect::from_min_size(Pos2::new(tip.x - size.x / 2.0, tip.y - 12.0 - size.y), size);
        self.painter
            .rect(rect, Rounding::same(6.0), Color32::WHITE, Stroke::new(1.0, Color32::GRAY));
        self.painter.text(
            rect.min + padding,
            Align2::LEFT_TOP,
            text,
            font,
            Color32::BLACK,
        );
        Ok(())
    }

    fn draw_status(&mut self, message: &str) -> quakemap::Result<()> {
        let pos = Pos2::new(self.rect.center().x, self.rect.min.y + 24.0);
        let font = FontId::proportional(15.0);
        let galley = self
            .painter
            .layout_no_wrap(message.to_string(), font.clone(), Color32::WHITE);
        let bg = Rect::from_center_size(pos, galley.size() + Vec2::new(20.0, 10.0));
        self.painter
            .rect_filled(bg, Rounding::same(4.0), Color32::from_black_alpha(180));
        self.painter
            .text(pos, Align2::CENTER_CENTER, message, font, Color32::WHITE);
        Ok(())
    }
}
