//! Backend worker: a dedicated thread owning the tokio runtime and the
//! HTTP client. Commands arrive over the bounded queue; every command
//! resolves to exactly one UI event, success or failure.

use std::thread;

use client_core::{ApiClient, SubmitError};
use crossbeam_channel::{Receiver, Sender};
use image::GenericImageView;
use tracing::error;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::settings::Settings;
use crate::ui::app::ThumbnailImage;

const THUMBNAIL_MAX_DIMENSION: f32 = 640.0;

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = ApiClient::new(settings.api_base_url);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::ListPosts => match client.list_posts().await {
                        Ok(posts) => {
                            let _ = ui_tx.try_send(UiEvent::PostsLoaded(posts));
                        }
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::PostList,
                                err.to_string(),
                            )));
                        }
                    },
                    BackendCommand::FetchPost {
                        post_id,
                        request_id,
                    } => match client.fetch_post(post_id).await {
                        Ok(post) => {
                            let _ = ui_tx.try_send(UiEvent::PostLoaded { request_id, post });
                        }
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::PostDetail { request_id },
                                err.to_string(),
                            )));
                        }
                    },
                    BackendCommand::FetchThumbnail { post_id, url } => {
                        match client.fetch_image(&url).await {
                            Ok(bytes) => match decode_thumbnail(&bytes) {
                                Ok(image) => {
                                    let _ =
                                        ui_tx.try_send(UiEvent::ThumbnailLoaded { post_id, image });
                                }
                                Err(reason) => {
                                    let _ =
                                        ui_tx.try_send(UiEvent::ThumbnailFailed { post_id, reason });
                                }
                            },
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::ThumbnailFailed {
                                    post_id,
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::SubmitContact { request } => {
                        match client.submit_contact(&request).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::ContactAccepted);
                            }
                            Err(SubmitError::Rejected(rejection)) => {
                                let _ = ui_tx.try_send(UiEvent::ContactRejected {
                                    status: rejection.status,
                                    message: rejection.message,
                                });
                            }
                            Err(err @ SubmitError::Transport(_)) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::ContactSubmit,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                }
            }
        });
    });
}

/// Decodes and downscales thumbnail bytes on the worker so the UI
/// thread only ever uploads ready-made RGBA data.
fn decode_thumbnail(bytes: &[u8]) -> Result<ThumbnailImage, String> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| format!("undecodable image: {err}"))?;

    let (orig_w, orig_h) = decoded.dimensions();
    let scale = (THUMBNAIL_MAX_DIMENSION / (orig_w.max(orig_h) as f32)).min(1.0);
    let resized = if scale < 1.0 {
        decoded.resize(
            (orig_w as f32 * scale).max(1.0) as u32,
            (orig_h as f32 * scale).max(1.0) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    Ok(ThumbnailImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_thumbnail_rejects_garbage_bytes() {
        let err = decode_thumbnail(b"not an image").expect_err("garbage must not decode");
        assert!(err.contains("undecodable image"));
    }

    #[test]
    fn decode_thumbnail_keeps_small_images_unscaled() {
        let mut png = Vec::new();
        let buffer = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode fixture");

        let thumb = decode_thumbnail(&png).expect("decode fixture");
        assert_eq!((thumb.width, thumb.height), (4, 2));
        assert_eq!(thumb.rgba.len(), 4 * 2 * 4);
    }
}
