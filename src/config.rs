//! Launch parameters and application configuration.
//!
//! Defines the launch-site and orbit presets, the input block sent to
//! the simulation backend, and app-level settings (backend URL,
//! playback duration).

use crate::sim::LaunchRequest;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LaunchSite {
    Isro,
    Kennedy,
    Baikonur,
    Kourou,
    Vandenberg,
}

impl LaunchSite {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Isro => "ISRO",
            Self::Kennedy => "Kennedy",
            Self::Baikonur => "Baikonur",
            Self::Kourou => "Kourou",
            Self::Vandenberg => "Vandenberg",
        }
    }

    pub const ALL: [LaunchSite; 5] = [
        Self::Isro,
        Self::Kennedy,
        Self::Baikonur,
        Self::Kourou,
        Self::Vandenberg,
    ];
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrbitTarget {
    Leo,
    Meo,
    Geo,
}

impl OrbitTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Leo => "LEO",
            Self::Meo => "MEO",
            Self::Geo => "GEO",
        }
    }

    pub const ALL: [OrbitTarget; 3] = [Self::Leo, Self::Meo, Self::Geo];
}

/// The launch parameters the user edits in the side panel.
#[derive(Clone, Debug)]
pub struct LaunchInputs {
    pub site: LaunchSite,
    pub velocity: f64,
    pub angle: f64,
    pub orbit: OrbitTarget,
}

impl Default for LaunchInputs {
    fn default() -> Self {
        Self {
            site: LaunchSite::Isro,
            velocity: 7500.0,
            angle: 45.0,
            orbit: OrbitTarget::Leo,
        }
    }
}

impl LaunchInputs {
    pub fn to_request(&self) -> LaunchRequest {
        LaunchRequest {
            site: self.site.label().to_string(),
            velocity: self.velocity,
            angle: self.angle,
            orbit: self.orbit.label().to_string(),
        }
    }
}

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

pub struct AppConfig {
    pub backend_url: String,
    /// Seconds one playback takes. Deliberately independent of the
    /// samples' own time fields; the backend's timeline is compressed
    /// into whatever the user picked here.
    pub playback_seconds: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend_url = std::env::var("LAUNCH_VIZ_BACKEND")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self {
            backend_url,
            playback_seconds: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_match_backend_expectations() {
        let req = LaunchInputs::default().to_request();
        assert_eq!(req.site, "ISRO");
        assert_eq!(req.velocity, 7500.0);
        assert_eq!(req.angle, 45.0);
        assert_eq!(req.orbit, "LEO");
    }
}
