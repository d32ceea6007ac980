//! Countdown record and its input shapes.
//!
//! Field names are serialized in camelCase so that every store backend
//! exchanges exactly the same document shape.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CountdownId;

/// Seconds between background rotations when `imageInterval` is absent.
pub const DEFAULT_IMAGE_INTERVAL_SECS: u32 = 5;

/// Which time-engine algorithm applies to a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountType {
    /// Wall-clock time.
    #[default]
    Natural,
    /// Time restricted to the configured working window.
    Working,
}

/// Daily working window, interpreted in the countdown's timezone.
///
/// `start < end` is assumed but not checked; an empty window counts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub exclude_weekends: bool,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime, exclude_weekends: bool) -> Self {
        Self {
            start,
            end,
            exclude_weekends,
        }
    }

    /// Start of the window as minutes since local midnight.
    pub fn start_minute(&self) -> u32 {
        self.start.hour() * 60 + self.start.minute()
    }

    /// End of the window (exclusive) as minutes since local midnight.
    pub fn end_minute(&self) -> u32 {
        self.end.hour() * 60 + self.end.minute()
    }
}

/// Display styling. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub background_color: String,
    pub text_color: String,
    pub title_color: String,
    pub font_family: String,
    pub font_size: String,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#1a1a1a".to_string(),
            title_color: "#000000".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: "18px".to_string(),
        }
    }
}

/// One entry of the rotating background. `data` is the encoded image as sent
/// by the client (typically a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub id: String,
    pub data: String,
    pub name: String,
}

/// Everything a caller supplies to create a countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCountdown {
    pub title: String,
    pub target_date: DateTime<Utc>,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub count_type: CountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    #[serde(default)]
    pub customization: Customization,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background_images: Vec<BackgroundImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_interval: Option<u32>,
}

impl NewCountdown {
    /// Natural-time countdown with default styling.
    pub fn natural(
        title: impl Into<String>,
        target_date: DateTime<Utc>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            target_date,
            timezone: timezone.into(),
            location: None,
            count_type: CountType::Natural,
            working_hours: None,
            customization: Customization::default(),
            background_images: Vec::new(),
            image_interval: None,
        }
    }

    /// Working-time countdown with default styling.
    pub fn working(
        title: impl Into<String>,
        target_date: DateTime<Utc>,
        timezone: impl Into<String>,
        working_hours: WorkingHours,
    ) -> Self {
        Self {
            count_type: CountType::Working,
            working_hours: Some(working_hours),
            ..Self::natural(title, target_date, timezone)
        }
    }

    /// Stamp the input into a full record.
    pub fn into_countdown(self, id: CountdownId, now: DateTime<Utc>) -> Countdown {
        Countdown {
            id,
            title: self.title,
            target_date: self.target_date,
            timezone: self.timezone,
            location: self.location,
            count_type: self.count_type,
            working_hours: self.working_hours,
            customization: self.customization,
            background_images: self.background_images,
            image_interval: self.image_interval,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves a field untouched.
///
/// `working_hours` is doubly optional: `Some(None)` clears the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownPatch {
    pub title: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub location: Option<Option<String>>,
    pub count_type: Option<CountType>,
    pub working_hours: Option<Option<WorkingHours>>,
    pub customization: Option<Customization>,
    pub background_images: Option<Vec<BackgroundImage>>,
    pub image_interval: Option<Option<u32>>,
}

impl CountdownPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The stored countdown record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub id: CountdownId,
    pub title: String,
    pub target_date: DateTime<Utc>,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub count_type: CountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    #[serde(default)]
    pub customization: Customization,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background_images: Vec<BackgroundImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_interval: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Countdown {
    /// Merge a patch into the record. Timestamps are left to the caller.
    pub fn apply(&mut self, patch: CountdownPatch) {
        let CountdownPatch {
            title,
            target_date,
            timezone,
            location,
            count_type,
            working_hours,
            customization,
            background_images,
            image_interval,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(target_date) = target_date {
            self.target_date = target_date;
        }
        if let Some(timezone) = timezone {
            self.timezone = timezone;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(count_type) = count_type {
            self.count_type = count_type;
        }
        if let Some(working_hours) = working_hours {
            self.working_hours = working_hours;
        }
        if let Some(customization) = customization {
            self.customization = customization;
        }
        if let Some(background_images) = background_images {
            self.background_images = background_images;
        }
        if let Some(image_interval) = image_interval {
            self.image_interval = image_interval;
        }
    }

    /// Refresh `updated_at`, always moving it strictly forward.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::milliseconds(1)
        };
    }

    /// Rotation period of the background images.
    pub fn image_interval(&self) -> Duration {
        let secs = match self.image_interval {
            Some(0) | None => DEFAULT_IMAGE_INTERVAL_SECS,
            Some(secs) => secs,
        };
        Duration::from_secs(u64::from(secs))
    }

    /// Background image shown after `elapsed` display time.
    pub fn background_image_at(&self, elapsed: Duration) -> Option<&BackgroundImage> {
        if self.background_images.is_empty() {
            return None;
        }
        let step = elapsed.as_secs() / self.image_interval().as_secs();
        let index = (step % self.background_images.len() as u64) as usize;
        self.background_images.get(index)
    }
}

/// `"HH:MM"` (de)serialization for window boundaries.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
