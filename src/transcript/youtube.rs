use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::transcript::backend::{
    TranscriptDescriptor, TranscriptFetcher, TranscriptLister, TranscriptSegment,
};
use crate::transcript::error::TranscriptError;
use crate::transcript::video_id::VideoId;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());

/// Transcript listing and fetching against YouTube's caption tracks.
#[derive(Debug)]
pub struct YouTubeClient {
    client: reqwest::blocking::Client,
}

impl YouTubeClient {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        let url = format!("{}{}", WATCH_URL, video_id);
        tracing::debug!("Fetching watch page: {}", url);

        let response = self.client.get(&url).send()?;
        check_status(&response, video_id)?;
        Ok(response.text()?)
    }

    fn fetch_player_data(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self
            .client
            .post(format!("{}{}", INNERTUBE_PLAYER_URL, api_key))
            .json(&body)
            .send()?;
        check_status(&response, video_id)?;

        response
            .json()
            .map_err(|e| TranscriptError::MalformedResponse(format!("player response: {}", e)))
    }
}

impl TranscriptLister for YouTubeClient {
    fn list(&self, video_id: &VideoId) -> Result<Vec<TranscriptDescriptor>, TranscriptError> {
        let html = self.fetch_watch_page(video_id)?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player_data(video_id, &api_key)?;
        parse_caption_tracks(video_id, &player)
    }
}

impl TranscriptFetcher for YouTubeClient {
    fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let listed = self.list(video_id)?;
        let descriptor = find_transcript(&listed, languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound(video_id.to_string(), languages.to_vec())
        })?;
        self.fetch_one(descriptor)
    }

    fn fetch_one(
        &self,
        descriptor: &TranscriptDescriptor,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let url = json3_url(&descriptor.fetch_url);
        tracing::debug!("Fetching {} transcript", descriptor.language_code);

        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RequestBlocked(descriptor.language_code.clone()));
        }
        if !response.status().is_success() {
            return Err(TranscriptError::Http(format!(
                "HTTP {} fetching {} transcript",
                response.status(),
                descriptor.language_code
            )));
        }

        let body = response.text()?;
        parse_json3(&body)
    }
}

fn check_status(
    response: &reqwest::blocking::Response,
    video_id: &VideoId,
) -> Result<(), TranscriptError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }
    if !status.is_success() {
        return Err(TranscriptError::Http(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(())
}

fn extract_api_key(html: &str, video_id: &VideoId) -> Result<String, TranscriptError> {
    if html.contains("g-recaptcha") {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }

    INNERTUBE_API_KEY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            TranscriptError::MalformedResponse(format!(
                "could not parse watch page for video {}",
                video_id
            ))
        })
}

fn assert_playability(video_id: &VideoId, player: &Value) -> Result<(), TranscriptError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability.get("status").and_then(Value::as_str).unwrap_or("");
    if status == "OK" {
        return Ok(());
    }
    let reason = playability.get("reason").and_then(Value::as_str).unwrap_or("");

    match status {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(TranscriptError::RequestBlocked(video_id.to_string()))
        }
        "LOGIN_REQUIRED" if reason.contains("inappropriate") => {
            Err(TranscriptError::AgeRestricted(video_id.to_string()))
        }
        "LOGIN_REQUIRED" if reason.contains("private") => {
            Err(TranscriptError::VideoUnavailable(video_id.to_string()))
        }
        "ERROR" if reason.contains("unavailable") => {
            Err(TranscriptError::VideoUnavailable(video_id.to_string()))
        }
        _ => Err(TranscriptError::VideoUnplayable(
            video_id.to_string(),
            reason.to_string(),
        )),
    }
}

/// Turn an innertube player response into descriptors, in the order listed.
fn parse_caption_tracks(
    video_id: &VideoId,
    player: &Value,
) -> Result<Vec<TranscriptDescriptor>, TranscriptError> {
    assert_playability(video_id, player)?;

    let tracks = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(Value::as_array)
        .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

    let descriptors: Vec<TranscriptDescriptor> = tracks
        .iter()
        .filter_map(|track| {
            let language_code = track.get("languageCode")?.as_str()?.to_string();
            let fetch_url = track.get("baseUrl")?.as_str()?.replace("&fmt=srv3", "");
            let language = track
                .get("name")
                .and_then(|n| {
                    n.get("simpleText").or_else(|| {
                        n.get("runs")
                            .and_then(Value::as_array)
                            .and_then(|runs| runs.first())
                            .and_then(|run| run.get("text"))
                    })
                })
                .and_then(Value::as_str)
                .unwrap_or(language_code.as_str())
                .to_string();
            let is_generated = track.get("kind").and_then(Value::as_str) == Some("asr");
            let is_translatable = track
                .get("isTranslatable")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            Some(TranscriptDescriptor {
                language,
                language_code,
                is_generated,
                is_translatable,
                fetch_url,
            })
        })
        .collect();

    if descriptors.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }
    Ok(descriptors)
}

/// First requested language wins; within a language a manual track beats a
/// generated one.
fn find_transcript<'a>(
    listed: &'a [TranscriptDescriptor],
    languages: &[String],
) -> Option<&'a TranscriptDescriptor> {
    languages.iter().find_map(|code| {
        listed
            .iter()
            .find(|d| !d.is_generated && d.language_code == *code)
            .or_else(|| listed.iter().find(|d| d.is_generated && d.language_code == *code))
    })
}

fn json3_url(base_url: &str) -> String {
    if base_url.contains("fmt=json3") {
        base_url.to_string()
    } else if base_url.contains('?') {
        format!("{}&fmt=json3", base_url)
    } else {
        format!("{}?fmt=json3", base_url)
    }
}

#[derive(Debug, Deserialize)]
struct Json3Transcript {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a `fmt=json3` timed-text body into chronological segments.
fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    if body.trim().is_empty() {
        return Err(TranscriptError::MalformedResponse(
            "no element found: empty transcript body".to_string(),
        ));
    }

    let transcript: Json3Transcript = serde_json::from_str(body)
        .map_err(|e| TranscriptError::MalformedResponse(format!("transcript body: {}", e)))?;

    let mut segments: Vec<TranscriptSegment> = transcript
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text,
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(segments)
}
