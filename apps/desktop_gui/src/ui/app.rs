use std::collections::HashMap;

use chrono::Local;
use client_core::{
    content,
    fetch::FetchState,
    form::{ContactForm, Field},
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{Post, PostId},
    error::ApiRejection,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_fetch_failure, UiError, UiErrorCategory, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;

const EXCERPT_MAX_CHARS: usize = 160;
const CONTENT_MAX_WIDTH: f32 = 720.0;

const CHIP_COLOR: egui::Color32 = egui::Color32::from_rgb(86, 130, 220);
const ERROR_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Home,
    Detail(PostId),
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: BannerSeverity,
    message: String,
}

/// Downscaled RGBA thumbnail, decoded on the backend worker.
#[derive(Clone, Debug)]
pub struct ThumbnailImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum ThumbnailState {
    Loading,
    Ready {
        image: ThumbnailImage,
        texture: Option<egui::TextureHandle>,
    },
    Failed(String),
}

pub struct BlogdeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view: View,

    posts: FetchState<Vec<Post>>,
    detail: FetchState<Post>,
    /// Tag of the detail fetch whose completion is still welcome;
    /// anything else is a superseded request and gets dropped.
    detail_request_id: u64,
    next_request_id: u64,
    thumbnails: HashMap<PostId, ThumbnailState>,

    form: ContactForm,

    banner: Option<StatusBanner>,
    status: String,
}

impl BlogdeskApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: View::Home,
            posts: FetchState::NotStarted,
            detail: FetchState::NotStarted,
            detail_request_id: 0,
            next_request_id: 0,
            thumbnails: HashMap::new(),
            form: ContactForm::new(),
            banner: None,
            status: "Starting backend worker...".to_string(),
        }
    }

    // ------------------------- event intake -------------------------

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::PostsLoaded(posts) => {
                    self.status = if posts.is_empty() {
                        "No posts found".to_string()
                    } else {
                        format!("Loaded {} posts", posts.len())
                    };
                    self.posts = FetchState::from_items(posts);
                }
                UiEvent::PostLoaded { request_id, post } => {
                    if request_id != self.detail_request_id {
                        tracing::debug!(
                            request_id,
                            current = self.detail_request_id,
                            "dropping superseded post detail"
                        );
                        continue;
                    }
                    if let Some(post) = &post {
                        self.request_thumbnail(post.id, post.thumbnail_url.clone());
                    }
                    self.detail = FetchState::from_optional(post);
                }
                UiEvent::ThumbnailLoaded { post_id, image } => {
                    self.thumbnails.insert(
                        post_id,
                        ThumbnailState::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::ThumbnailFailed { post_id, reason } => {
                    tracing::debug!(post_id = post_id.0, reason = %reason, "thumbnail fetch failed");
                    self.thumbnails
                        .insert(post_id, ThumbnailState::Failed(reason));
                }
                UiEvent::ContactAccepted => {
                    self.form.complete_submission();
                    self.form.reset();
                    self.banner = Some(StatusBanner {
                        severity: BannerSeverity::Info,
                        message: "Message sent. Thank you!".to_string(),
                    });
                    self.status = "Contact message delivered".to_string();
                }
                UiEvent::ContactRejected { status, message } => {
                    self.form.complete_submission();
                    let detail = ApiRejection::new(status, message).display_message();
                    self.banner = Some(StatusBanner {
                        severity: BannerSeverity::Error,
                        message: format!("Submission failed: {detail}"),
                    });
                    self.status = format!("Contact submission rejected (HTTP {status})");
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => self.apply_error(err),
            }
        }
    }

    fn apply_error(&mut self, err: UiError) {
        match err.context() {
            UiErrorContext::WorkerStartup => {
                self.banner = Some(StatusBanner {
                    severity: BannerSeverity::Error,
                    message: err.message().to_string(),
                });
                self.status = err.message().to_string();
            }
            UiErrorContext::PostList => {
                self.posts = FetchState::Failed(classify_fetch_failure(err.message()));
                self.status = format!("Post list failed: {}", err.message());
            }
            UiErrorContext::PostDetail { request_id } => {
                if request_id == self.detail_request_id {
                    self.detail = FetchState::Failed(classify_fetch_failure(err.message()));
                }
                self.status = format!("Post detail failed: {}", err.message());
            }
            UiErrorContext::ContactSubmit => {
                self.form.complete_submission();
                let message = if err.category() == UiErrorCategory::Transport {
                    "Sending failed. Please try again.".to_string()
                } else {
                    format!("Sending failed: {}", err.message())
                };
                self.banner = Some(StatusBanner {
                    severity: BannerSeverity::Error,
                    message,
                });
                self.status = format!("Contact submission failed: {}", err.message());
            }
        }
    }

    // ------------------------ command issuing ------------------------

    fn ensure_posts_requested(&mut self) {
        if matches!(self.posts, FetchState::NotStarted) {
            self.refresh_posts();
        }
    }

    fn refresh_posts(&mut self) {
        self.posts = FetchState::Loading;
        let queued =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::ListPosts, &mut self.status);
        if !queued {
            self.posts = FetchState::Failed(self.status.clone());
        }
    }

    fn go_home(&mut self) {
        self.view = View::Home;
        // The original site refetches the listing on every view entry.
        self.refresh_posts();
    }

    fn open_detail(&mut self, post_id: PostId) {
        self.view = View::Detail(post_id);
        self.start_detail_fetch(post_id);
    }

    fn start_detail_fetch(&mut self, post_id: PostId) {
        self.next_request_id += 1;
        self.detail_request_id = self.next_request_id;
        self.detail = FetchState::Loading;
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchPost {
                post_id,
                request_id: self.detail_request_id,
            },
            &mut self.status,
        );
        if !queued {
            self.detail = FetchState::Failed(self.status.clone());
        }
    }

    fn request_thumbnail(&mut self, post_id: PostId, url: String) {
        if url.trim().is_empty() || self.thumbnails.contains_key(&post_id) {
            return;
        }
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchThumbnail { post_id, url },
            &mut self.status,
        );
        if queued {
            self.thumbnails.insert(post_id, ThumbnailState::Loading);
        }
    }

    fn try_submit_contact(&mut self) {
        let Some(request) = self.form.begin_submission() else {
            self.status = "Fix the highlighted fields and resubmit".to_string();
            return;
        };
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SubmitContact { request },
            &mut self.status,
        );
        if !queued {
            // The worker will never answer; don't leave the form stuck.
            self.form.complete_submission();
        }
    }

    // --------------------------- rendering ---------------------------

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header_nav")
            .exact_height(40.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new("Blogdesk").strong().size(16.0));
                    ui.separator();

                    let blog_active = matches!(self.view, View::Home | View::Detail(_));
                    if ui.selectable_label(blog_active, "Blog").clicked() && self.view != View::Home
                    {
                        self.go_home();
                    }
                    if ui
                        .selectable_label(self.view == View::Contact, "Contact")
                        .clicked()
                    {
                        self.view = View::Contact;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.view == View::Home && ui.button("Refresh").clicked() {
                            self.refresh_posts();
                        }
                    });
                });
            });
    }

    fn show_status_line(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_line")
            .exact_height(22.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.banner.clone() {
            let (fill, stroke) = match banner.severity {
                BannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
                BannerSeverity::Info => (
                    egui::Color32::from_rgb(47, 92, 57),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(89, 158, 101)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_home_view(&mut self, ui: &mut egui::Ui) {
        let mut open_request = None;

        match &self.posts {
            FetchState::NotStarted | FetchState::Loading => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.weak("Loading posts...");
                });
            }
            FetchState::Empty => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label("No posts found.");
                });
            }
            FetchState::Failed(reason) => {
                let reason = reason.clone();
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(ERROR_TEXT_COLOR, reason);
                    if ui.button("Retry").clicked() {
                        self.refresh_posts();
                    }
                });
            }
            FetchState::Loaded(posts) => {
                for post in posts {
                    post_card(ui, post, &mut open_request);
                    ui.add_space(10.0);
                }
            }
        }

        if let Some(post_id) = open_request {
            self.open_detail(post_id);
        }
    }

    fn show_detail_view(&mut self, ui: &mut egui::Ui, post_id: PostId) {
        if ui.button("Back to posts").clicked() {
            self.go_home();
            return;
        }
        ui.add_space(8.0);

        match &self.detail {
            FetchState::NotStarted | FetchState::Loading => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.weak("Loading post...");
                });
            }
            FetchState::Empty => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label("Post not found.");
                });
            }
            FetchState::Failed(reason) => {
                let reason = reason.clone();
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(ERROR_TEXT_COLOR, reason);
                    if ui.button("Retry").clicked() {
                        self.start_detail_fetch(post_id);
                    }
                });
            }
            FetchState::Loaded(post) => {
                let post = post.clone();
                self.show_post_body(ui, &post);
            }
        }
    }

    fn show_post_body(&mut self, ui: &mut egui::Ui, post: &Post) {
        let ctx = ui.ctx().clone();
        ui.set_max_width(CONTENT_MAX_WIDTH);

        match self.thumbnail_texture(&ctx, post.id) {
            Some(texture) => {
                ui.image(&texture);
                ui.add_space(8.0);
            }
            None => {
                if matches!(self.thumbnails.get(&post.id), Some(ThumbnailState::Loading)) {
                    ui.weak("Loading thumbnail...");
                    ui.add_space(8.0);
                }
            }
        }

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format_post_date(post))
                    .weak()
                    .size(11.0),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for category in post.categories.iter().rev() {
                    category_chip(ui, category);
                }
            });
        });
        ui.label(egui::RichText::new(&post.title).strong().size(24.0));
        ui.add_space(8.0);
        ui.label(content::plain_text(&post.content));
    }

    fn thumbnail_texture(
        &mut self,
        ctx: &egui::Context,
        post_id: PostId,
    ) -> Option<egui::TextureHandle> {
        match self.thumbnails.get_mut(&post_id) {
            Some(ThumbnailState::Ready { image, texture }) => {
                if texture.is_none() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ctx.load_texture(
                        format!("thumbnail:{}", post_id.0),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                texture.clone()
            }
            _ => None,
        }
    }

    fn show_contact_view(&mut self, ui: &mut egui::Ui) {
        ui.set_max_width(CONTENT_MAX_WIDTH);
        ui.label(egui::RichText::new("Contact").strong().size(20.0));
        ui.add_space(10.0);

        let submitting = self.form.is_submitting();

        ui.add_enabled_ui(!submitting, |ui| {
            ui.label(egui::RichText::new("Name").strong());
            ui.add(
                egui::TextEdit::singleline(&mut self.form.name)
                    .id_salt("contact_name")
                    .hint_text("Your name")
                    .desired_width(f32::INFINITY),
            );
            if let Some(error) = self.form.errors().get(Field::Name) {
                field_error_label(ui, error);
            }
            ui.add_space(6.0);

            ui.label(egui::RichText::new("Email").strong());
            ui.add(
                egui::TextEdit::singleline(&mut self.form.email)
                    .id_salt("contact_email")
                    .hint_text("you@example.com")
                    .desired_width(f32::INFINITY),
            );
            if let Some(error) = self.form.errors().get(Field::Email) {
                field_error_label(ui, error);
            }
            ui.add_space(6.0);

            ui.label(egui::RichText::new("Message").strong());
            ui.add(
                egui::TextEdit::multiline(&mut self.form.message)
                    .id_salt("contact_message")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            if let Some(error) = self.form.errors().get(Field::Message) {
                field_error_label(ui, error);
            }
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let submit_label = if submitting { "Sending..." } else { "Send" };
            if ui
                .add_enabled(!submitting, egui::Button::new(submit_label))
                .clicked()
            {
                self.try_submit_contact();
            }
            if ui
                .add_enabled(!submitting, egui::Button::new("Clear"))
                .clicked()
            {
                self.form.reset();
                self.status = "Form cleared".to_string();
            }
        });
    }
}

impl eframe::App for BlogdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if self.view == View::Home {
            self.ensure_posts_requested();
        }

        self.show_header(ctx);
        self.show_status_line(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_banner(ui);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.view {
                    View::Home => self.show_home_view(ui),
                    View::Detail(post_id) => self.show_detail_view(ui, post_id),
                    View::Contact => self.show_contact_view(ui),
                });
        });

        // Keep draining worker events even while the user is idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn post_card(ui: &mut egui::Ui, post: &Post, open_request: &mut Option<PostId>) {
    egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width().min(CONTENT_MAX_WIDTH));
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format_post_date(post))
                        .weak()
                        .size(11.0),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    for category in post.categories.iter().rev() {
                        category_chip(ui, category);
                    }
                });
            });
            if ui
                .link(egui::RichText::new(&post.title).strong().size(20.0))
                .clicked()
            {
                *open_request = Some(post.id);
            }
            ui.label(
                egui::RichText::new(content::excerpt(&post.content, EXCERPT_MAX_CHARS)).weak(),
            );
        });
}

fn category_chip(ui: &mut egui::Ui, label: &str) {
    egui::Frame::NONE
        .stroke(egui::Stroke::new(1.0, CHIP_COLOR))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(label).size(11.0).color(CHIP_COLOR));
        });
}

fn field_error_label(ui: &mut egui::Ui, error: &str) {
    ui.label(
        egui::RichText::new(error)
            .color(ERROR_TEXT_COLOR)
            .size(12.0),
    );
}

fn format_post_date(post: &Post) -> String {
    post.created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}
