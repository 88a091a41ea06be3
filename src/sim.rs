//! Remote simulation service client.
//!
//! Sends launch parameters to the backend's `/simulate` endpoint and
//! parses the returned trajectory, summary, and debris report. Requests
//! run on a background thread and report back over a channel polled from
//! the update loop; a request generation stamps every result so a stale
//! response from a superseded request is dropped instead of overwriting
//! newer playback state.

use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("malformed simulation response: {0}")]
    Malformed(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Risky,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::Risky => "Risky",
        }
    }

    pub const ALL: [RiskLevel; 3] = [Self::Safe, Self::Caution, Self::Risky];
}

#[derive(Clone, Debug, Serialize)]
pub struct LaunchRequest {
    pub site: String,
    pub velocity: f64,
    pub angle: f64,
    pub orbit: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub fuel: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Summary {
    pub max_altitude: f64,
    pub final_distance: f64,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DebrisObject {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub risk: RiskLevel,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SimResponse {
    pub trajectory: Vec<TrajectoryPoint>,
    pub summary: Summary,
    #[serde(default)]
    risk: Option<RiskLevel>,
    #[serde(default)]
    pub debris: Vec<DebrisObject>,
}

impl SimResponse {
    /// The summary's risk classification. Older backend builds report it
    /// at the top level instead, so that is accepted as a fallback.
    pub fn risk_level(&self) -> RiskLevel {
        self.summary.risk.or(self.risk).unwrap_or(RiskLevel::Safe)
    }
}

pub fn parse_response(body: &str) -> Result<SimResponse, SimError> {
    serde_json::from_str(body).map_err(|e| SimError::Malformed(e.to_string()))
}

pub fn fetch_simulation(base_url: &str, request: &LaunchRequest) -> Result<SimResponse, SimError> {
    let url = format!("{}/simulate", base_url.trim_end_matches('/'));
    let body = serde_json::to_string(request).map_err(|e| SimError::Malformed(e.to_string()))?;

    let response = ureq::post(&url)
        .set("Content-Type", "application/json")
        .send_string(&body)
        .map_err(|e| SimError::Transport(e.to_string()))?;

    let text = response
        .into_string()
        .map_err(|e| SimError::Transport(e.to_string()))?;

    parse_response(&text)
}

type SimResult = Result<SimResponse, SimError>;

pub struct SimClient {
    base_url: String,
    generation: u64,
    in_flight: bool,
    result_tx: mpsc::Sender<(u64, SimResult)>,
    result_rx: mpsc::Receiver<(u64, SimResult)>,
}

impl SimClient {
    pub fn new(base_url: String) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            base_url,
            generation: 0,
            in_flight: false,
            result_tx,
            result_rx,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url;
    }

    /// Fires a request on a background thread. Any still-outstanding
    /// request is superseded: its eventual result will carry an older
    /// generation and be discarded by `poll`.
    pub fn request(&mut self, request: LaunchRequest, ctx: &egui::Context) {
        self.generation += 1;
        self.in_flight = true;
        let generation = self.generation;
        let base_url = self.base_url.clone();
        let tx = self.result_tx.clone();
        let ctx = ctx.clone();
        log::info!(
            "simulation request #{} ({} -> {} / {})",
            generation,
            request.site,
            request.orbit,
            base_url
        );
        std::thread::spawn(move || {
            let result = fetch_simulation(&base_url, &request);
            let _ = tx.send((generation, result));
            ctx.request_repaint();
        });
    }

    /// Drains the result channel, dropping anything from a superseded
    /// request, and returns the current request's outcome if it arrived.
    pub fn poll(&mut self) -> Option<SimResult> {
        while let Ok((generation, result)) = self.result_rx.try_recv() {
            if generation != self.generation {
                log::debug!("dropping stale simulation result #{}", generation);
                continue;
            }
            self.in_flight = false;
            return Some(result);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_BODY: &str = r#"{
        "site": "ISRO",
        "orbit": "LEO",
        "trajectory": [
            {"time": 0, "x": 0.0, "y": 0.0, "z": 1.5, "speed": 7500.0, "fuel": 100},
            {"time": 10, "x": 53033.0, "y": 52543.0, "speed": 7402.1, "fuel": 90}
        ],
        "debris": [
            {"id": "DEBRIS-1", "x": -120, "y": 400, "z": 33, "risk": "caution"}
        ],
        "risk": "caution",
        "summary": {"max_altitude": 52543.0, "final_distance": 530330.0}
    }"#;

    #[test]
    fn parses_backend_shape() {
        let resp = parse_response(GOOD_BODY).unwrap();
        assert_eq!(resp.trajectory.len(), 2);
        assert_eq!(resp.trajectory[0].z, 1.5);
        assert_eq!(resp.trajectory[1].z, 0.0);
        assert_eq!(resp.trajectory[1].fuel, Some(90.0));
        assert_eq!(resp.summary.max_altitude, 52543.0);
        assert_eq!(resp.debris.len(), 1);
        assert_eq!(resp.debris[0].risk, RiskLevel::Caution);
    }

    #[test]
    fn risk_prefers_summary_then_top_level() {
        let resp = parse_response(GOOD_BODY).unwrap();
        assert_eq!(resp.risk_level(), RiskLevel::Caution);

        let body = r#"{
            "trajectory": [],
            "summary": {"max_altitude": 0, "final_distance": 0, "risk": "risky"},
            "risk": "safe"
        }"#;
        assert_eq!(parse_response(body).unwrap().risk_level(), RiskLevel::Risky);

        let body = r#"{"trajectory": [], "summary": {"max_altitude": 0, "final_distance": 0}}"#;
        assert_eq!(parse_response(body).unwrap().risk_level(), RiskLevel::Safe);
    }

    #[test]
    fn missing_trajectory_is_malformed() {
        let body = r#"{"summary": {"max_altitude": 1, "final_distance": 2}}"#;
        match parse_response(body) {
            Err(SimError::Malformed(_)) => {}
            other => panic!("expected Malformed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let body = r#"{
            "trajectory": [{"time": "soon", "x": 0, "y": 0}],
            "summary": {"max_altitude": 1, "final_distance": 2}
        }"#;
        assert!(matches!(parse_response(body), Err(SimError::Malformed(_))));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut client = SimClient::new("http://127.0.0.1:9".to_string());
        client.generation = 2;
        client.in_flight = true;

        // Late result from request #1 arrives after request #2 was issued.
        client
            .result_tx
            .send((1, parse_response(GOOD_BODY)))
            .unwrap();
        assert!(client.poll().is_none());
        assert!(client.in_flight());

        // The current request's result still lands.
        client.result_tx.send((2, parse_response(GOOD_BODY))).unwrap();
        let result = client.poll().expect("current result delivered");
        assert!(result.is_ok());
        assert!(!client.in_flight());
    }

    #[test]
    fn request_bumps_generation_and_marks_in_flight() {
        let ctx = egui::Context::default();
        let mut client = SimClient::new("http://127.0.0.1:9".to_string());
        let request = LaunchRequest {
            site: "ISRO".into(),
            velocity: 7500.0,
            angle: 45.0,
            orbit: "LEO".into(),
        };
        client.request(request.clone(), &ctx);
        client.request(request, &ctx);
        assert_eq!(client.generation, 2);
        assert!(client.in_flight());
    }
}
