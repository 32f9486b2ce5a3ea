// Page hooks, colors and asset locations used by the web frontend.

// DOM
pub const VIDEO_ID: &str = "video";
pub const TROLLEY_SELECTOR: &str = ".trolley";
pub const GAME_OVER_ID: &str = "game-over";
pub const HIDDEN_CLASS: &str = "hidden";
pub const CONFIG_ATTR_PREFIX: &str = "data-"; // e.g. data-face-step="0.5"

// Page mood
pub const ALARM_COLOR: &str = "red";
pub const CALM_COLOR: &str = "white";

// Terminal overlay, used when the page has no #game-over element of its own
pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const GAME_OVER_STYLE: &str = "position:fixed;inset:0;display:flex;align-items:center;\
justify-content:center;font:bold 12vmin system-ui;color:#fff;background:rgba(0,0,0,0.8);z-index:10";

// Assets
pub const AUDIO_DIR: &str = "assets/audio";
pub const MODEL_URI: &str = "./models";
pub const FACE_API_NETS: [&str; 4] = [
    "tinyFaceDetector",
    "faceLandmark68Net",
    "faceRecognitionNet",
    "faceExpressionNet",
];

// Prefixed callback-style camera APIs for browsers without mediaDevices
pub const LEGACY_GET_USER_MEDIA: [&str; 3] =
    ["getUserMedia", "webkitGetUserMedia", "mozGetUserMedia"];

// Camera readiness polling after the stream starts playing
pub const VIDEO_READY_POLL_MS: i32 = 100;

// Oldest one-shot clip is cut when more than this many overlap
pub const MAX_LIVE_ONE_SHOTS: usize = 4;

#[inline]
pub fn asset_url(file_name: &str) -> String {
    format!("{}/{}", AUDIO_DIR, file_name)
}
