use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    CanvasWidth,
    CanvasHeight,
    AsteroidSize,
    AsteroidSpeed,
    TimeScale,
    SpawnInterval,
    ShipSize,
    ShipSpeed,
    StarField,
    MaxFrameDelta,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanvasWidth => write!(f, "canvas_width"),
            Self::CanvasHeight => write!(f, "canvas_height"),
            Self::AsteroidSize => write!(f, "asteroid_size"),
            Self::AsteroidSpeed => write!(f, "asteroid_speed"),
            Self::TimeScale => write!(f, "time_scale"),
            Self::SpawnInterval => write!(f, "spawn_interval"),
            Self::ShipSize => write!(f, "ship_size"),
            Self::ShipSpeed => write!(f, "ship_speed"),
            Self::StarField => write!(f, "star_field"),
            Self::MaxFrameDelta => write!(f, "max_frame_delta"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NotPositive { field: ConfigField, value: f64 },
    Negative { field: ConfigField, value: f64 },
    NotFinite { field: ConfigField },
    CanvasTooShort { canvas_height: f64, required: f64 },
    IntervalBoundsInverted { min: f64, base: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NotFinite { field } => write!(f, "{field} must be a finite number"),
            Self::CanvasTooShort {
                canvas_height,
                required,
            } => write!(
                f,
                "canvas height {canvas_height} is too short: need at least {required}"
            ),
            Self::IntervalBoundsInverted { min, base } => write!(
                f,
                "spawn interval floor ({min}) exceeds the base interval ({base})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure talking to the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreBoardError {
    /// The backend could not be reached or failed internally.
    Unavailable(String),
    /// The backend refused the request (bad name, bad value).
    Rejected(String),
}

impl fmt::Display for ScoreBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "score board unavailable: {reason}"),
            Self::Rejected(reason) => write!(f, "score board rejected request: {reason}"),
        }
    }
}

impl std::error::Error for ScoreBoardError {}

/// Parse failure for catalog enums stored as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}
