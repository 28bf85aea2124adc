#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use alcohol_dilution_calculator::{
    app,
    config::{self, Config, InputLayout},
    i18n::{self, keys, Language, Translator},
    logging,
    mixing::{MixtureForm, MixtureRequest, MixtureResult, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C},
};
use clap::Parser;
use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 알코올 희석 계산기 데스크톱 버전.
#[derive(Debug, Parser)]
#[command(name = "alcohol_dilution_calculator", version, about)]
struct Args {
    /// 언어 코드 (auto/en/ko/de)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 디버그 로그 출력
    #[arg(short, long)]
    verbose: bool,
}

const LANGUAGE_CHOICES: [&str; 4] = ["auto", "en-us", "ko-kr", "de-de"];

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    logging::init(args.verbose);
    tracing::info!("starting desktop calculator");

    let app_cfg = match config::load_or_default_at(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "config unavailable, using defaults");
            Config::default()
        }
    };
    let tr = app::build_translator(&args.lang, &app_cfg);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let config_path = args.config;
    let cli_lang = args.lang;
    eframe::run_native(
        "Alcohol Dilution Calculator",
        options,
        Box::new(move |cc| {
            let font = match app_cfg.gui.font_path.as_deref() {
                Some(path) => load_custom_font(&cc.egui_ctx, path),
                None => setup_fonts(&cc.egui_ctx),
            };
            let font_loaded = match font {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "font setup failed");
                    false
                }
            };
            let mut app = GuiApp::new(app_cfg, config_path, tr, cli_lang);
            app.font_loaded = font_loaded;
            Box::new(app)
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["assets/icon.png", "icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 배경 이미지 파일을 egui 텍스처용 이미지로 읽는다.
fn load_background_image(path: &str) -> Result<egui::ColorImage, String> {
    let bytes = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let img = image::load_from_memory(&bytes).map_err(|e| format!("{path}: {e}"))?;
    let (w, h) = img.dimensions();
    let rgba = img.to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_raw(),
    ))
}

/// 폰트 바이트를 기본 글꼴 뒤에 대체 글꼴로 등록한다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(font_name.clone());
    }
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾아 등록한다.
/// 1) assets/fonts/
/// 2) Windows 시스템 폰트(맑은 고딕/굴림)
/// 3) 리눅스 나눔 폰트
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = vec![
        PathBuf::from("assets/fonts/malgun.ttf"),
        PathBuf::from("assets/fonts/NanumGothic.ttf"),
    ];
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.push(fonts.join("malgun.ttf"));
        candidates.push(fonts.join("gulim.ttc"));
    }
    candidates.push(PathBuf::from(
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    ));

    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            tracing::debug!(path = %p.display(), "korean font loaded");
            return Ok(());
        }
    }
    Err("Korean font not found. Set gui.font_path in config.toml.".into())
}

/// 사용자가 지정한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read font file {path}: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

fn rgb(c: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

/// 결과 표시 대기 중인 요청.
struct PendingResult {
    request: MixtureRequest,
    ready_at: Instant,
}

struct GuiApp {
    config: Config,
    config_path: PathBuf,
    /// `--lang`로 받은 언어. 설정 창에서 언어를 고르면 "auto"로 바뀐다.
    cli_lang: String,
    tr: Translator,
    /// 한글 글리프가 있는 폰트가 등록되었는지 여부.
    font_loaded: bool,
    /// 다음 프레임에서 한글 폰트를 찾아 등록해야 함.
    font_requested: bool,
    form: MixtureForm,
    pending: Option<PendingResult>,
    result: Option<MixtureResult>,
    error: Option<String>,
    show_settings: bool,
    show_about: bool,
    pack_dir_input: String,
    status: Option<String>,
    background: Option<egui::TextureHandle>,
    background_dirty: bool,
    background_error: Option<String>,
}

impl GuiApp {
    fn new(config: Config, config_path: PathBuf, tr: Translator, cli_lang: String) -> Self {
        let d = &config.defaults;
        let form = MixtureForm::new(
            d.water_ml.clone(),
            d.ethanol_ml.clone(),
            f64::from(d.temperature_c),
        );
        let pack_dir_input = config.language_pack_dir.clone().unwrap_or_default();
        Self {
            config,
            config_path,
            cli_lang,
            tr,
            font_loaded: false,
            font_requested: false,
            form,
            pending: None,
            result: None,
            error: None,
            show_settings: false,
            show_about: false,
            pack_dir_input,
            status: None,
            background: None,
            background_dirty: true,
            background_error: None,
        }
    }

    /// 계산 버튼 처리. 지연 시간이 있으면 대기열에 넣는다.
    fn request_calculation(&mut self, now: Instant) {
        self.result = None;
        self.error = None;
        let request = match self.form.to_request() {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "volume input rejected");
                self.error = Some(self.tr.t(keys::MIXER_INVALID_INPUT));
                return;
            }
        };
        let delay = Duration::from_millis(self.config.gui.result_delay_ms);
        if delay.is_zero() {
            self.finish(request);
        } else {
            self.pending = Some(PendingResult {
                request,
                ready_at: now + delay,
            });
        }
    }

    /// 대기 중인 결과를 확인한다. 아직 남았으면 남은 시간을 돌려준다.
    fn poll_pending(&mut self, now: Instant) -> Option<Duration> {
        let ready_at = self.pending.as_ref()?.ready_at;
        if now >= ready_at {
            if let Some(p) = self.pending.take() {
                self.finish(p.request);
            }
            None
        } else {
            Some(ready_at - now)
        }
    }

    fn finish(&mut self, request: MixtureRequest) {
        match self.config.contraction.compute(&request) {
            Ok(res) => self.result = Some(res),
            Err(e) => {
                tracing::warn!(error = %e, "calculation rejected");
                self.error = Some(self.tr.tf(keys::ERROR_CALCULATION, &[("error", e.to_string())]));
            }
        }
    }

    /// 입력이 바뀌면 이전 결과는 화면에서 내린다.
    fn on_form_changed(&mut self) {
        self.result = None;
        self.pending = None;
        self.error = None;
    }

    fn result_text(&self) -> Option<String> {
        self.result
            .as_ref()
            .map(|r| i18n::result_message(&self.tr, r))
    }

    fn apply_language(&mut self, code: &str) {
        self.config.language = code.to_string();
        self.cli_lang = "auto".into();
        self.rebuild_translator();
    }

    fn rebuild_translator(&mut self) {
        self.tr = app::build_translator(&self.cli_lang, &self.config);
        if self.tr.language() == Language::Ko && !self.font_loaded {
            self.font_requested = true;
        }
    }

    fn ensure_fonts(&mut self, ctx: &egui::Context) {
        if !std::mem::take(&mut self.font_requested) {
            return;
        }
        match setup_fonts(ctx) {
            Ok(()) => self.font_loaded = true,
            Err(e) => tracing::warn!(error = %e, "font setup failed"),
        }
    }

    fn save_settings(&mut self) {
        let dir = self.pack_dir_input.trim();
        self.config.language_pack_dir = if dir.is_empty() {
            None
        } else {
            Some(dir.to_string())
        };
        self.rebuild_translator();
        self.status = Some(match self.config.save_to(&self.config_path) {
            Ok(()) => {
                tracing::info!(path = %self.config_path.display(), "settings saved");
                self.tr.t(keys::GUI_SAVED)
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings save failed");
                self.tr.tf(keys::GUI_SAVE_FAILED, &[("error", e.to_string())])
            }
        });
    }

    fn ensure_background(&mut self, ctx: &egui::Context) {
        if !self.background_dirty {
            return;
        }
        self.background_dirty = false;
        self.background = None;
        self.background_error = None;
        let Some(path) = self.config.gui.background_image.clone() else {
            return;
        };
        match load_background_image(&path) {
            Ok(img) => {
                self.background =
                    Some(ctx.load_texture("background", img, egui::TextureOptions::LINEAR));
            }
            Err(e) => {
                tracing::warn!(error = %e, "background image load failed");
                self.background_error =
                    Some(self.tr.tf(keys::GUI_BACKGROUND_FAILED, &[("error", e)]));
            }
        }
    }

    /// 중앙 패널 좌상단에 폭 95%, 높이 90%로 배경을 그린다.
    fn paint_background(&self, ui: &egui::Ui) {
        if let Some(tex) = &self.background {
            let rect = ui.max_rect();
            let area = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * 0.95, rect.height() * 0.90),
            );
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(tex.id(), area, uv, egui::Color32::WHITE);
        }
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let mut changed = false;
        ui.label(tr.t(keys::MIXER_WATER_LABEL));
        changed |= ui.text_edit_singleline(&mut self.form.water_text).changed();
        ui.add_space(4.0);
        ui.label(tr.t(keys::MIXER_ETHANOL_LABEL));
        changed |= ui.text_edit_singleline(&mut self.form.ethanol_text).changed();
        ui.add_space(4.0);
        ui.label(tr.t(keys::MIXER_TEMPERATURE_LABEL));
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut self.form.temperature_c,
                    f64::from(TEMPERATURE_MIN_C)..=f64::from(TEMPERATURE_MAX_C),
                )
                .step_by(1.0)
                .suffix(" °C"),
            )
            .changed();
        if changed {
            self.on_form_changed();
        }
    }

    fn ui_action(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let text_color = rgb(self.config.gui.text_color);
        let heading_color = rgb(self.config.gui.heading_color);
        if self.form.is_valid() {
            if ui.button(tr.t(keys::MIXER_CALCULATE)).clicked() {
                self.request_calculation(Instant::now());
                ui.ctx().request_repaint();
            }
        } else {
            ui.label(egui::RichText::new(tr.t(keys::MIXER_INVALID_INPUT)).color(text_color));
        }
        ui.add_space(8.0);
        if self.pending.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new(tr.t(keys::MIXER_CALCULATING)).color(text_color));
            });
        }
        if let Some(text) = self.result_text() {
            ui.heading(egui::RichText::new(text).color(heading_color).strong());
        }
        if let Some(res) = &self.result {
            ui.label(
                egui::RichText::new(tr.tf(
                    keys::MIXER_CONTRACTION,
                    &[
                        ("contraction", format!("{:.2}", res.contraction_ml)),
                        ("k", format!("{:.4}", res.coefficient_k)),
                    ],
                ))
                .color(text_color)
                .small(),
            );
        }
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
    }

    fn ui_statement(&self, ui: &mut egui::Ui) {
        let text_color = rgb(self.config.gui.text_color);
        ui.add(
            egui::Label::new(
                egui::RichText::new(self.tr.t(keys::PROBLEM_STATEMENT)).color(text_color),
            )
            .wrap(true),
        );
        if let Some(err) = &self.background_error {
            ui.colored_label(egui::Color32::YELLOW, err);
        }
        ui.add_space(12.0);
    }

    fn ui_settings(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();

        ui.strong(tr.t(keys::GUI_LAYOUT));
        ui.horizontal(|ui| {
            ui.radio_value(
                &mut self.config.gui.layout,
                InputLayout::Sidebar,
                tr.t(keys::GUI_LAYOUT_SIDEBAR),
            );
            ui.radio_value(
                &mut self.config.gui.layout,
                InputLayout::Inline,
                tr.t(keys::GUI_LAYOUT_INLINE),
            );
        });
        ui.separator();

        ui.strong(tr.t(keys::GUI_LANGUAGE));
        let mut picked: Option<&str> = None;
        egui::ComboBox::from_id_source("language_combo")
            .selected_text(self.config.language.clone())
            .show_ui(ui, |ui| {
                for code in LANGUAGE_CHOICES {
                    if ui
                        .selectable_label(self.config.language == code, code)
                        .clicked()
                    {
                        picked = Some(code);
                    }
                }
            });
        if let Some(code) = picked {
            self.apply_language(code);
        }
        ui.small(tr.t(keys::GUI_LANGUAGE_NOTE));
        ui.horizontal(|ui| {
            ui.label(tr.t(keys::GUI_LANGUAGE_PACK_DIR));
            ui.text_edit_singleline(&mut self.pack_dir_input);
            if ui.button(tr.t(keys::GUI_BROWSE)).clicked() {
                if let Some(dir) = FileDialog::new().pick_folder() {
                    self.pack_dir_input = dir.display().to_string();
                }
            }
        });
        ui.separator();

        ui.strong(tr.t(keys::GUI_BACKGROUND));
        ui.horizontal(|ui| {
            let current = self
                .config
                .gui
                .background_image
                .clone()
                .unwrap_or_else(|| "-".into());
            ui.label(current);
            if ui.button(tr.t(keys::GUI_BROWSE)).clicked() {
                if let Some(file) = FileDialog::new()
                    .add_filter("image", &["png", "jpg", "jpeg"])
                    .pick_file()
                {
                    self.config.gui.background_image = Some(file.display().to_string());
                    self.background_dirty = true;
                }
            }
            if ui.button(tr.t(keys::GUI_CLEAR)).clicked() {
                self.config.gui.background_image = None;
                self.background_dirty = true;
            }
        });
        ui.horizontal(|ui| {
            ui.color_edit_button_srgb(&mut self.config.gui.heading_color);
            ui.color_edit_button_srgb(&mut self.config.gui.text_color);
        });
        ui.separator();

        ui.horizontal(|ui| {
            ui.label(tr.t(keys::GUI_RESULT_DELAY));
            ui.add(
                egui::DragValue::new(&mut self.config.gui.result_delay_ms)
                    .clamp_range(0..=5000)
                    .suffix(" ms"),
            );
        });
        ui.separator();

        if ui.button(tr.t(keys::GUI_SAVE)).clicked() {
            self.save_settings();
        }
        if let Some(status) = &self.status {
            ui.small(status);
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if let Some(remaining) = self.poll_pending(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
        self.ensure_fonts(ctx);
        self.ensure_background(ctx);

        let tr = self.tr.clone();
        let heading_color = rgb(self.config.gui.heading_color);

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new(tr.t(keys::APP_TITLE)).color(heading_color));
                ui.separator();
                if ui.button(tr.t(keys::GUI_SETTINGS)).clicked() {
                    self.show_settings = true;
                }
                if ui.button(tr.t(keys::GUI_ABOUT)).clicked() {
                    self.show_about = true;
                }
            });
        });

        match self.config.gui.layout {
            InputLayout::Sidebar => {
                egui::SidePanel::left("inputs")
                    .resizable(true)
                    .default_width(240.0)
                    .show(ctx, |ui| {
                        ui.heading(tr.t(keys::MIXER_INPUTS));
                        ui.add_space(8.0);
                        self.ui_inputs(ui);
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.paint_background(ui);
                    self.ui_statement(ui);
                    self.ui_action(ui);
                });
            }
            InputLayout::Inline => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.paint_background(ui);
                    self.ui_statement(ui);
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        self.ui_inputs(ui);
                    });
                    ui.add_space(8.0);
                    self.ui_action(ui);
                });
            }
        }

        if self.show_settings {
            let mut open = true;
            egui::Window::new(tr.t(keys::GUI_SETTINGS))
                .collapsible(false)
                .resizable(true)
                .open(&mut open)
                .show(ctx, |ui| self.ui_settings(ui));
            self.show_settings = open;
        }

        if self.show_about {
            let mut open = true;
            egui::Window::new(tr.t(keys::GUI_ABOUT))
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(tr.t(keys::GUI_ABOUT_BODY));
                });
            self.show_about = open;
        }
    }
}
