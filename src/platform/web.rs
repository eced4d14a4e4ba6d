//! Browser bindings: `deviceorientation` events and microphone record/replay

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Blob, DeviceOrientationEvent, HtmlAudioElement, MediaRecorder, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, Url, Window,
};

use crate::audio::{self, ClipUrl, LossFeedback, RecordingError, RecordingStage};
use crate::sensor::{AccessGate, SensorFeed, SensorReading, SensorSource, Subscription};

/// Gesture events that may carry a permission prompt
const GESTURE_EVENTS: [&str; 2] = ["click", "touchend"];

thread_local! {
    /// Answer to the orientation permission prompt, reused by later sessions
    static PERMISSION: Cell<Option<bool>> = const { Cell::new(None) };
}

/// Orientation events in degrees, converted to the radians the tilt
/// mapping expects
#[derive(Debug, Default)]
pub struct OrientationSource;

impl SensorSource for OrientationSource {
    fn subscribe(&mut self, feed: SensorFeed, interval_ms: u32) -> Subscription {
        let Some(window) = web_sys::window() else {
            feed.resolve_availability(false);
            return Subscription::detached();
        };

        let resolved = access_gate(&window).apply(&feed, PERMISSION.with(Cell::get));
        match resolved {
            Some(available) => log_availability(available),
            None => log::info!("Orientation access waits for a tap"),
        }

        let mut last_ms = f64::NEG_INFINITY;
        let interval = f64::from(interval_ms);
        let listener_feed = feed.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            // The browser ignores requested rates, so thin the stream here
            let now = event.time_stamp();
            if now - last_ms < interval {
                return;
            }
            last_ms = now;

            let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() else {
                return;
            };
            let beta = event.beta().map_or(f64::NAN, f64::to_radians);
            let gamma = event.gamma().map_or(f64::NAN, f64::to_radians);
            listener_feed.publish(SensorReading::new(beta as f32, gamma as f32));
        });

        if window
            .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for deviceorientation");
            return Subscription::detached();
        }

        let prompt = resolved.is_none().then(|| prompt_on_gesture(&window, feed));

        Subscription::new(move || {
            let _ = window.remove_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            drop(closure);
            drop(prompt);
            log::debug!("deviceorientation listener removed");
        })
    }
}

fn access_gate(window: &Window) -> AccessGate {
    let Some(ctor) = Reflect::get(window, &JsValue::from_str("DeviceOrientationEvent"))
        .ok()
        .filter(|v| !v.is_undefined())
    else {
        return AccessGate::Missing;
    };
    match Reflect::get(&ctor, &JsValue::from_str("requestPermission")) {
        Ok(request) if request.is_function() => AccessGate::UserGesture,
        _ => AccessGate::Open,
    }
}

fn log_availability(available: bool) {
    if available {
        log::info!("Orientation sensor available");
    } else {
        log::info!("No access to the orientation sensor; paddle stays at its default");
    }
}

/// `DeviceOrientationEvent.requestPermission()`; only honoured inside a
/// user gesture
fn request_permission() -> Result<Promise, JsValue> {
    let window = web_sys::window().ok_or(JsValue::UNDEFINED)?;
    let ctor = Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent"))?;
    let request: Function =
        Reflect::get(&ctor, &JsValue::from_str("requestPermission"))?.dyn_into()?;
    Ok(Promise::resolve(&request.call0(&ctor)?))
}

/// Ask for orientation access on the first tap or click, then resolve `feed`
fn prompt_on_gesture(window: &Window, feed: SensorFeed) -> Subscription {
    let asked = Rc::new(Cell::new(false));
    let handler = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if asked.replace(true) {
            return;
        }
        // Called synchronously: awaiting first would leave the gesture
        let promise = match request_permission() {
            Ok(promise) => promise,
            Err(e) => {
                log::warn!("Orientation permission request failed: {}", js_message(&e));
                feed.resolve_availability(false);
                return;
            }
        };
        let feed = feed.clone();
        spawn_local(async move {
            let granted = JsFuture::from(promise)
                .await
                .ok()
                .and_then(|state| state.as_string())
                .is_some_and(|state| state == "granted");
            PERMISSION.with(|p| p.set(Some(granted)));
            feed.resolve_availability(granted);
            log_availability(granted);
        });
    });

    for name in GESTURE_EVENTS {
        if window
            .add_event_listener_with_callback(name, handler.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for {name}");
        }
    }

    let window = window.clone();
    Subscription::new(move || {
        for name in GESTURE_EVENTS {
            let _ = window.remove_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
        }
        drop(handler);
    })
}

/// Records the microphone for a fixed window after a loss, then replays it
#[derive(Debug, Clone, Copy)]
pub struct WebRecorder {
    window_ms: u32,
}

impl WebRecorder {
    pub fn new(window_ms: u32) -> Self {
        Self { window_ms }
    }
}

impl LossFeedback for WebRecorder {
    fn trigger(&mut self) {
        let window_ms = self.window_ms;
        spawn_local(async move {
            audio::report(record_and_replay(window_ms).await);
        });
    }
}

fn js_message(value: &JsValue) -> String {
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn device_error(stage: RecordingStage) -> impl Fn(JsValue) -> RecordingError {
    move |e| RecordingError::device(stage, js_message(&e))
}

fn permission_error(e: JsValue) -> RecordingError {
    let name = Reflect::get(&e, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    match name.as_deref() {
        Some("NotAllowedError") | Some("SecurityError") => RecordingError::PermissionDenied,
        Some("NotFoundError") => RecordingError::Unsupported,
        _ => RecordingError::device(RecordingStage::RequestPermission, js_message(&e)),
    }
}

/// Timer-backed wait; yields to the event loop instead of blocking
async fn sleep_ms(window: &Window, ms: u32) -> Result<(), JsValue> {
    let mut scheduled = Ok(0);
    let promise = Promise::new(&mut |resolve, _reject| {
        scheduled = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, audio::timer_delay_ms(ms));
    });
    scheduled?;
    JsFuture::from(promise).await.map(|_| ())
}

async fn record_and_replay(window_ms: u32) -> Result<(), RecordingError> {
    let window = web_sys::window().ok_or(RecordingError::Unsupported)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| RecordingError::Unsupported)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(permission_error)?;
    let stream: MediaStream = JsFuture::from(request)
        .await
        .map_err(permission_error)?
        .dyn_into()
        .map_err(device_error(RecordingStage::RequestPermission))?;

    let result = record_stream(&window, &stream, window_ms).await;

    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
    result
}

async fn record_stream(
    window: &Window,
    stream: &MediaStream,
    window_ms: u32,
) -> Result<(), RecordingError> {
    let recorder = MediaRecorder::new_with_media_stream(stream)
        .map_err(device_error(RecordingStage::StartRecording))?;

    let chunks = Array::new();
    let on_data = {
        let chunks = chunks.clone();
        Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            if let Ok(data) = Reflect::get(&event, &JsValue::from_str("data")) {
                if !data.is_undefined() && !data.is_null() {
                    chunks.push(&data);
                }
            }
        })
    };
    recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
    let stopped = Promise::new(&mut |resolve, _reject| recorder.set_onstop(Some(&resolve)));

    recorder
        .start()
        .map_err(device_error(RecordingStage::StartRecording))?;
    log::debug!("Recording for {window_ms} ms");

    sleep_ms(window, window_ms)
        .await
        .map_err(device_error(RecordingStage::StopRecording))?;
    recorder
        .stop()
        .map_err(device_error(RecordingStage::StopRecording))?;
    JsFuture::from(stopped)
        .await
        .map_err(device_error(RecordingStage::StopRecording))?;

    recorder.set_ondataavailable(None);
    recorder.set_onstop(None);
    drop(on_data);

    let blob = Blob::new_with_blob_sequence(&chunks)
        .map_err(device_error(RecordingStage::Playback))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(device_error(RecordingStage::Playback))?;
    log::debug!("Replaying {url}");

    // The URL pins the blob until revoked
    let clip = ClipUrl::new(url, |url: &str| {
        let _ = Url::revoke_object_url(url);
    });
    play_to_end(clip.as_str()).await
}

/// Play `url` and wait for the `ended` (or `error`) event
async fn play_to_end(url: &str) -> Result<(), RecordingError> {
    let player =
        HtmlAudioElement::new_with_src(url).map_err(device_error(RecordingStage::Playback))?;

    let mut listening = Ok(());
    let finished = Promise::new(&mut |resolve, reject| {
        listening = player
            .add_event_listener_with_callback("ended", &resolve)
            .and_then(|_| player.add_event_listener_with_callback("error", &reject));
    });
    listening.map_err(device_error(RecordingStage::Playback))?;

    let playing = player.play().map_err(device_error(RecordingStage::Playback))?;
    JsFuture::from(playing)
        .await
        .map_err(device_error(RecordingStage::Playback))?;
    JsFuture::from(finished)
        .await
        .map_err(device_error(RecordingStage::Playback))?;
    Ok(())
}
