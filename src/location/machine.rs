//! Location acquisition state machine
//!
//! `Disconnected → Connecting → SettingsCheck → PermissionCheck → Requesting`
//! then `Resolved` or `Failed`. Transitions are a pure function of the
//! current state and one event.

use crate::error::{Error, Result};
use crate::pagination::SearchQuery;
use std::fmt;
use tracing::debug;

/// A resolved device position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a search query at this position
    pub fn search_query(&self, term: impl Into<String>) -> SearchQuery {
        SearchQuery::new(
            term,
            self.latitude.to_string(),
            self.longitude.to_string(),
        )
    }
}

/// Why location acquisition stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Location service is not installed
    ServiceMissing,
    /// Location service is too old
    ServiceOutOfDate,
    /// Connecting to the location service failed with another code
    ConnectionFailed(i32),
    /// Connection dropped mid-flow
    ConnectionSuspended,
    /// Device location is switched off and cannot be switched on
    SettingsUnavailable,
    /// The user refused location permission
    PermissionDenied,
    /// The caller gave up
    Cancelled,
}

impl FailureReason {
    /// Map a connection error code to a reason
    pub fn from_connection_code(code: i32) -> Self {
        match code {
            1 => Self::ServiceMissing,
            2 => Self::ServiceOutOfDate,
            other => Self::ConnectionFailed(other),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceMissing => f.write_str("location service is missing on this device"),
            Self::ServiceOutOfDate => f.write_str("location service is out of date"),
            Self::ConnectionFailed(code) => {
                write!(f, "location service connection failed, error code {code}")
            }
            Self::ConnectionSuspended => f.write_str("location service connection suspended"),
            Self::SettingsUnavailable => f.write_str("device location is disabled"),
            Self::PermissionDenied => f.write_str("location permission denied"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Where the flow currently is
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    /// Not started
    Disconnected,
    /// Waiting for the location service connection
    Connecting,
    /// Checking device location settings
    SettingsCheck,
    /// Checking location permission
    PermissionCheck,
    /// Waiting for a position fix
    Requesting,
    /// Done, with a position
    Resolved(Coordinates),
    /// Done, without a position
    Failed(FailureReason),
}

impl LocationState {
    /// Whether the flow has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("Disconnected"),
            Self::Connecting => f.write_str("Connecting"),
            Self::SettingsCheck => f.write_str("SettingsCheck"),
            Self::PermissionCheck => f.write_str("PermissionCheck"),
            Self::Requesting => f.write_str("Requesting"),
            Self::Resolved(_) => f.write_str("Resolved"),
            Self::Failed(_) => f.write_str("Failed"),
        }
    }
}

/// Something that happened to the flow
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// Start (or restart) acquisition
    Connect,
    /// Location service connected
    Connected,
    /// Location service connection failed with a code
    ConnectionFailed(i32),
    /// Location service connection dropped
    ConnectionSuspended,
    /// Location settings are fine
    SettingsSatisfied,
    /// Location settings cannot be satisfied
    SettingsUnavailable,
    /// Permission granted
    PermissionGranted,
    /// Permission refused
    PermissionDenied,
    /// A position fix arrived
    LocationReceived(Coordinates),
    /// Abandon the flow
    Cancel,
}

impl fmt::Display for LocationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connect => "Connect",
            Self::Connected => "Connected",
            Self::ConnectionFailed(_) => "ConnectionFailed",
            Self::ConnectionSuspended => "ConnectionSuspended",
            Self::SettingsSatisfied => "SettingsSatisfied",
            Self::SettingsUnavailable => "SettingsUnavailable",
            Self::PermissionGranted => "PermissionGranted",
            Self::PermissionDenied => "PermissionDenied",
            Self::LocationReceived(_) => "LocationReceived",
            Self::Cancel => "Cancel",
        };
        f.write_str(name)
    }
}

/// Compute the state after `event`
pub fn transition(state: &LocationState, event: LocationEvent) -> Result<LocationState> {
    use LocationEvent as E;
    use LocationState as S;

    let next = match (state, event) {
        (S::Disconnected | S::Resolved(_) | S::Failed(_), E::Connect) => S::Connecting,

        (s, E::Cancel) if !s.is_terminal() => S::Failed(FailureReason::Cancelled),
        (S::Connecting, E::ConnectionFailed(code)) => {
            S::Failed(FailureReason::from_connection_code(code))
        }
        (
            S::SettingsCheck | S::PermissionCheck | S::Requesting,
            E::ConnectionSuspended,
        ) => S::Failed(FailureReason::ConnectionSuspended),

        (S::Connecting, E::Connected) => S::SettingsCheck,
        (S::SettingsCheck, E::SettingsSatisfied) => S::PermissionCheck,
        (S::SettingsCheck, E::SettingsUnavailable) => {
            S::Failed(FailureReason::SettingsUnavailable)
        }
        (S::PermissionCheck, E::PermissionGranted) => S::Requesting,
        (S::PermissionCheck, E::PermissionDenied) => S::Failed(FailureReason::PermissionDenied),
        (S::Requesting, E::LocationReceived(coords)) => S::Resolved(coords),

        (s, e) => return Err(Error::invalid_transition(s, e)),
    };
    Ok(next)
}

/// A running location flow
#[derive(Debug, Clone)]
pub struct LocationFlow {
    state: LocationState,
}

impl Default for LocationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationFlow {
    /// Create a flow in `Disconnected`
    pub fn new() -> Self {
        Self {
            state: LocationState::Disconnected,
        }
    }

    /// Current state
    pub fn state(&self) -> &LocationState {
        &self.state
    }

    /// Apply one event; an invalid event leaves the state unchanged
    pub fn apply(&mut self, event: LocationEvent) -> Result<&LocationState> {
        let next = transition(&self.state, event)?;
        debug!(from = %self.state, to = %next, "Location flow transition");
        self.state = next;
        Ok(&self.state)
    }

    /// Resolved position, if any
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.state {
            LocationState::Resolved(coords) => Some(coords),
            _ => None,
        }
    }
}
